//! Alert gate - threshold and cooldown policy

use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Notifier configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotifierConfig {
    /// Minimum vehicles across all lanes before an alert fires
    pub min_vehicles: usize,
    /// Cooldown period between alerts (seconds)
    pub cooldown_seconds: u64,
}

impl Default for NotifierConfig {
    fn default() -> Self {
        Self {
            min_vehicles: 10,
            cooldown_seconds: 300, // 5 minutes
        }
    }
}

impl NotifierConfig {
    /// Short 30-second cooldown for rapidly changing intersections
    pub fn frequent() -> Self {
        Self {
            cooldown_seconds: 30,
            ..Default::default()
        }
    }
}

/// Gate applying the threshold and cooldown to each observation
pub struct AlertGate {
    config: NotifierConfig,
    last_notification: Option<Instant>,
    fire_count: usize,
}

impl AlertGate {
    /// Create a gate with the given config
    pub fn new(config: NotifierConfig) -> Self {
        info!("Creating alert gate with config: {:?}", config);
        Self {
            config,
            last_notification: None,
            fire_count: 0,
        }
    }

    /// Check whether an alert should fire for this vehicle count
    pub fn should_notify(&self, vehicle_count: usize) -> bool {
        if vehicle_count < self.config.min_vehicles {
            debug!(
                "Alert suppressed: {} vehicles below threshold {}",
                vehicle_count, self.config.min_vehicles
            );
            return false;
        }

        if let Some(last) = self.last_notification {
            let cooldown = Duration::from_secs(self.config.cooldown_seconds);
            if last.elapsed() < cooldown {
                debug!("Alert suppressed: in cooldown period");
                return false;
            }
        }

        true
    }

    /// Record that an alert was sent
    pub fn record_notification(&mut self) {
        self.last_notification = Some(Instant::now());
        self.fire_count += 1;
        info!("Alert recorded (count: {})", self.fire_count);
    }

    /// Update the vehicle threshold at runtime
    pub fn set_min_vehicles(&mut self, min_vehicles: usize) {
        self.config.min_vehicles = min_vehicles;
    }

    /// Current vehicle threshold
    pub fn min_vehicles(&self) -> usize {
        self.config.min_vehicles
    }

    /// Number of alerts fired so far
    pub fn fire_count(&self) -> usize {
        self.fire_count
    }
}

impl Default for AlertGate {
    fn default() -> Self {
        Self::new(NotifierConfig::default())
    }
}
