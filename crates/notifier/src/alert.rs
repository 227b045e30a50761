//! Alert payloads and the delivery seam

use chrono::{DateTime, Utc};
use congestion::LaneStatus;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::DeliveryError;

/// Outbound congestion alert
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CongestionAlert {
    /// Alert identifier
    pub id: Uuid,
    /// When the triggering frame was classified
    pub timestamp: DateTime<Utc>,
    /// Total vehicles across all lanes
    pub vehicle_count: usize,
    /// Per-lane congestion statuses
    pub lanes: Vec<LaneStatus>,
    /// Rain sensor reading at alert time
    pub raining: bool,
    /// Annotated snapshot of the triggering frame, if saved
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snapshot_path: Option<String>,
}

impl CongestionAlert {
    /// Create an alert stamped now
    pub fn new(vehicle_count: usize, lanes: Vec<LaneStatus>, raining: bool) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            vehicle_count,
            lanes,
            raining,
            snapshot_path: None,
        }
    }

    /// Attach a snapshot reference
    pub fn with_snapshot(mut self, path: impl Into<String>) -> Self {
        self.snapshot_path = Some(path.into());
        self
    }

    /// JSON payload for delivery channels
    pub fn to_payload(&self) -> Result<Vec<u8>, DeliveryError> {
        serde_json::to_vec(self).map_err(|e| DeliveryError::Serialize(e.to_string()))
    }
}

/// Delivery seam for the external messaging channel.
///
/// Implementations own their transport and its retries; a failed
/// recipient must not poison the rest of the fan-out.
pub trait NotificationChannel {
    /// Deliver an alert to a single recipient
    fn deliver(&self, recipient: &str, alert: &CongestionAlert) -> Result<(), DeliveryError>;
}

/// Logs alerts instead of sending them, for rigs without a bot
#[derive(Debug, Default)]
pub struct LogChannel;

impl NotificationChannel for LogChannel {
    fn deliver(&self, recipient: &str, alert: &CongestionAlert) -> Result<(), DeliveryError> {
        info!(
            recipient,
            vehicles = alert.vehicle_count,
            raining = alert.raining,
            "congestion alert"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use congestion::{CongestionLevel, LaneStatus};

    #[test]
    fn test_alert_payload_carries_lane_statuses() {
        let alert = CongestionAlert::new(
            12,
            vec![LaneStatus {
                level: CongestionLevel::Congested,
                percentage: 84.2,
                vehicle_count: 12,
            }],
            true,
        );

        let payload = alert.to_payload().unwrap();
        let json: serde_json::Value = serde_json::from_slice(&payload).unwrap();
        assert_eq!(json["vehicle_count"], 12);
        assert_eq!(json["lanes"][0]["level"], "congested");
        assert_eq!(json["raining"], true);
        // No snapshot attached, no field serialized
        assert!(json.get("snapshot_path").is_none());
    }

    #[test]
    fn test_snapshot_attachment() {
        let alert = CongestionAlert::new(3, Vec::new(), false).with_snapshot("frame_42.jpg");
        assert_eq!(alert.snapshot_path.as_deref(), Some("frame_42.jpg"));
    }

    #[test]
    fn test_log_channel_accepts_alert() {
        let channel = LogChannel;
        let alert = CongestionAlert::new(5, Vec::new(), false);
        assert!(channel.deliver("@road-ops", &alert).is_ok());
    }
}
