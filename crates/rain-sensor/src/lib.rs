//! Rain Sensor Polling
//!
//! Reads a digital rain sensor exported through sysfs GPIO and publishes
//! readings to the pipeline:
//! - Active-low wiring (pull-up, LOW means rain)
//! - Background polling thread feeding a tokio channel
//! - Static sensor for tests and rigs without the hardware

use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::mpsc;
use tracing::{debug, error, warn};

/// Sensor error types
#[derive(Error, Debug)]
pub enum SensorError {
    #[error("Failed to open sensor: {0}")]
    Open(String),

    #[error("Sensor read failed: {0}")]
    Read(String),
}

/// Rain sensor configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RainSensorConfig {
    /// Exported GPIO value file
    pub value_path: PathBuf,
    /// Pull-up wiring: LOW reads as rain
    pub active_low: bool,
    /// Poll interval in milliseconds
    pub poll_interval_ms: u64,
}

impl Default for RainSensorConfig {
    fn default() -> Self {
        Self {
            value_path: PathBuf::from("/sys/class/gpio/gpio17/value"),
            active_low: true,
            poll_interval_ms: 1000,
        }
    }
}

/// A boolean rain reading supplier
pub trait RainSensor: Send {
    /// Whether rain is currently detected
    fn is_raining(&mut self) -> Result<bool, SensorError>;
}

/// Reads the exported GPIO value file
pub struct SysfsRainSensor {
    config: RainSensorConfig,
}

impl SysfsRainSensor {
    /// Open the sensor, verifying the value file is readable
    pub fn open(config: RainSensorConfig) -> Result<Self, SensorError> {
        fs::read_to_string(&config.value_path)
            .map_err(|e| SensorError::Open(format!("{}: {e}", config.value_path.display())))?;
        Ok(Self { config })
    }
}

impl RainSensor for SysfsRainSensor {
    fn is_raining(&mut self) -> Result<bool, SensorError> {
        let raw = fs::read_to_string(&self.config.value_path)
            .map_err(|e| SensorError::Read(e.to_string()))?;
        let low = raw.trim() == "0";
        Ok(low == self.config.active_low)
    }
}

/// Fixed reading, for tests and rigs without the sensor
pub struct StaticSensor(pub bool);

impl RainSensor for StaticSensor {
    fn is_raining(&mut self) -> Result<bool, SensorError> {
        Ok(self.0)
    }
}

/// Background polling service feeding readings into a tokio channel
pub struct RainSensorService {
    receiver: mpsc::Receiver<bool>,
    _shutdown: std::sync::Arc<std::sync::atomic::AtomicBool>,
}

impl RainSensorService {
    /// Spawn the polling thread over any sensor implementation.
    ///
    /// Read errors are logged and published as "no rain".
    pub fn spawn(mut sensor: impl RainSensor + 'static, poll_interval_ms: u64) -> Self {
        let (tx, rx) = mpsc::channel::<bool>(16);
        let shutdown = std::sync::Arc::new(std::sync::atomic::AtomicBool::new(false));
        let shutdown_clone = shutdown.clone();

        std::thread::spawn(move || {
            let interval = std::time::Duration::from_millis(poll_interval_ms.max(10));

            while !shutdown_clone.load(std::sync::atomic::Ordering::SeqCst) {
                let reading = match sensor.is_raining() {
                    Ok(raining) => raining,
                    Err(e) => {
                        warn!("rain sensor read error: {e}");
                        false
                    }
                };

                if tx.blocking_send(reading).is_err() {
                    debug!("rain sensor receiver dropped");
                    break;
                }
                std::thread::sleep(interval);
            }
        });

        Self {
            receiver: rx,
            _shutdown: shutdown,
        }
    }

    /// Spawn over the sysfs sensor described by `config`
    pub fn spawn_sysfs(config: RainSensorConfig) -> Result<Self, SensorError> {
        let interval = config.poll_interval_ms;
        let sensor = SysfsRainSensor::open(config).map_err(|e| {
            error!("rain sensor unavailable: {e}");
            e
        })?;
        Ok(Self::spawn(sensor, interval))
    }

    /// Most recent reading, draining any backlog; `None` if nothing new
    pub fn latest(&mut self) -> Option<bool> {
        let mut latest = None;
        while let Ok(reading) = self.receiver.try_recv() {
            latest = Some(reading);
        }
        latest
    }

    /// Await the next reading
    pub async fn next(&mut self) -> Option<bool> {
        self.receiver.recv().await
    }
}
