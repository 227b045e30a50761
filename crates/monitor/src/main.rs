//! Lane Congestion Monitor - Main Entry Point

use anyhow::Context;
use detector::VehicleDetector;
use frame_source::{FrameSource, ImageDirSource};
use monitor::{init_logging, MonitorConfig, TrafficMonitor};
use notifier::LogChannel;
use rain_sensor::RainSensorService;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();

    info!("=== Lane Congestion Monitor v{} ===", env!("CARGO_PKG_VERSION"));

    let config_path = std::env::args().nth(1);
    let config = MonitorConfig::load(config_path.as_deref()).context("loading configuration")?;

    let detector = match &config.model_path {
        Some(path) => {
            let mut detector = VehicleDetector::new(path)?;
            detector.load()?;
            detector
        }
        None => VehicleDetector::mock(),
    };

    let mut rain_service = match &config.rain_sensor {
        Some(sensor_config) => match RainSensorService::spawn_sysfs(sensor_config.clone()) {
            Ok(service) => Some(service),
            Err(e) => {
                warn!("continuing without rain sensor: {e}");
                None
            }
        },
        None => None,
    };

    let mut source =
        ImageDirSource::open(&config.source.uri).context("opening frame source")?;
    let mut monitor = TrafficMonitor::new(&config, detector, LogChannel)?;

    info!("monitoring started");

    while let Some(frame) = source.next_frame()? {
        if let Some(service) = rain_service.as_mut() {
            if let Some(raining) = service.latest() {
                monitor.set_raining(raining);
            }
        }

        let Some(report) = monitor.process_frame(&frame)? else {
            continue;
        };

        for (lane, status) in report.analysis.lanes.iter().enumerate() {
            info!(
                "Lane {}: {} ({:.1}%, {} vehicles)",
                lane + 1,
                status.level.as_str(),
                status.percentage,
                status.vehicle_count
            );
        }
        if report.notified {
            info!(sequence = report.sequence, "alert dispatched");
        }
    }

    let stats = monitor.stats();
    info!(
        "frame source drained: {} frames processed, avg {:.2} fps (min {:.2}, max {:.2})",
        stats.processed_frames(),
        stats.average(),
        stats.min(),
        stats.max()
    );
    Ok(())
}
