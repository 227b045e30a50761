//! Congestion Monitoring Pipeline
//!
//! Ties the collaborator seams into a per-frame pipeline:
//! sample -> downscale -> detect -> filter -> classify -> gate -> alert.

mod pipeline;
mod stats;

pub use pipeline::{FrameReport, TrafficMonitor};
pub use stats::FpsStats;

use std::path::PathBuf;

use congestion::{CongestionError, CongestionThresholds, LaneGeometry};
use detector::DetectorError;
use frame_source::{CaptureError, SourceConfig};
use notifier::{Audience, DeliveryError, NotifierConfig};
use rain_sensor::RainSensorConfig;
use serde::{Deserialize, Serialize};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

/// Monitor error types.
///
/// Collaborator failures surface as distinct kinds so callers can tell
/// a capture problem from a model or delivery problem.
#[derive(thiserror::Error, Debug)]
pub enum MonitorError {
    #[error("Capture error: {0}")]
    Capture(#[from] CaptureError),

    #[error("Model error: {0}")]
    Model(#[from] DetectorError),

    #[error("Delivery error: {0}")]
    Delivery(#[from] DeliveryError),

    #[error("Classifier error: {0}")]
    Classifier(#[from] CongestionError),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Monitor configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    /// Frame source settings
    pub source: SourceConfig,
    /// Lane-partitioning strategy
    pub geometry: LaneGeometry,
    /// Occupancy breakpoints
    pub thresholds: CongestionThresholds,
    /// Alert threshold and cooldown
    pub notifier: NotifierConfig,
    /// Alert recipients
    pub audience: Audience,
    /// Detection model path; mock detector when unset
    pub model_path: Option<String>,
    /// Directory for annotated frame snapshots; disabled when unset
    pub snapshot_dir: Option<PathBuf>,
    /// Rain sensor; disabled when unset
    pub rain_sensor: Option<RainSensorConfig>,
}

impl MonitorConfig {
    /// Load configuration from an optional file plus `MONITOR_*`
    /// environment overrides
    pub fn load(path: Option<&str>) -> Result<Self, MonitorError> {
        let mut builder = config::Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(config::File::with_name(path));
        }

        let settings = builder
            .add_source(config::Environment::with_prefix("MONITOR").separator("__"))
            .build()
            .map_err(|e| MonitorError::Config(e.to_string()))?;

        settings
            .try_deserialize()
            .map_err(|e| MonitorError::Config(e.to_string()))
    }
}

/// Initialize logging
pub fn init_logging() {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_target(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .expect("Failed to set tracing subscriber");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_without_file_yields_defaults() {
        let config = MonitorConfig::load(None).unwrap();
        assert_eq!(config.source.width, 640);
        assert_eq!(config.source.height, 480);
        assert_eq!(config.notifier.min_vehicles, 10);
        assert!(config.model_path.is_none());
        assert!(config.rain_sensor.is_none());
    }

    #[test]
    fn test_config_deserializes_geometry_variant() {
        let json = r#"{
            "geometry": {"strategy": "percent", "widths": [30.0, 40.0, 30.0]},
            "notifier": {"min_vehicles": 8, "cooldown_seconds": 30}
        }"#;
        let config: MonitorConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.notifier.min_vehicles, 8);
        assert!(matches!(config.geometry, LaneGeometry::Percent { .. }));
    }
}
