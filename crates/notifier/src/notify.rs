//! Notifier context and fan-out

use chrono::{DateTime, Utc};
use congestion::FrameAnalysis;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::alert::{CongestionAlert, NotificationChannel};
use crate::audience::Audience;
use crate::gate::{AlertGate, NotifierConfig};
use crate::DeliveryError;

/// Latest observed traffic state, for status queries
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TrafficStatus {
    /// Vehicles counted in the last processed frame
    pub last_vehicle_count: usize,
    /// When the last frame was processed
    pub last_detection_time: Option<DateTime<Utc>>,
    /// Snapshot of the last processed frame, if saved
    pub latest_frame_path: Option<String>,
    /// Rain sensor reading
    pub raining: bool,
}

/// Outcome of observing one frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotifyOutcome {
    /// Below threshold or in cooldown
    Suppressed,
    /// Alert delivered to at least one recipient
    Sent,
}

/// Composes gate, audience, status, and channel into one owned context.
pub struct CongestionNotifier<C: NotificationChannel> {
    gate: AlertGate,
    audience: Audience,
    status: TrafficStatus,
    channel: C,
}

impl<C: NotificationChannel> CongestionNotifier<C> {
    /// Create a notifier over the given delivery channel
    pub fn new(config: NotifierConfig, audience: Audience, channel: C) -> Self {
        Self {
            gate: AlertGate::new(config),
            audience,
            status: TrafficStatus::default(),
            channel,
        }
    }

    /// Latest traffic status
    pub fn status(&self) -> &TrafficStatus {
        &self.status
    }

    /// Audience, for subscription handling
    pub fn audience_mut(&mut self) -> &mut Audience {
        &mut self.audience
    }

    /// Update the rain reading carried on status and alerts
    pub fn set_raining(&mut self, raining: bool) {
        self.status.raining = raining;
    }

    /// Update the vehicle threshold at runtime
    pub fn set_min_vehicles(&mut self, min_vehicles: usize) {
        self.gate.set_min_vehicles(min_vehicles);
    }

    /// Observe one classified frame: update status, and fire an alert
    /// when the gate allows.
    ///
    /// Per-recipient delivery failures are logged and skipped; one dead
    /// group must not block the rest.
    pub fn observe(
        &mut self,
        analysis: &FrameAnalysis,
        snapshot_path: Option<&str>,
    ) -> Result<NotifyOutcome, DeliveryError> {
        let vehicle_count = analysis.total_vehicles();

        self.status.last_vehicle_count = vehicle_count;
        self.status.last_detection_time = Some(Utc::now());
        self.status.latest_frame_path = snapshot_path.map(str::to_string);

        if !self.gate.should_notify(vehicle_count) {
            return Ok(NotifyOutcome::Suppressed);
        }

        let recipients = self.audience.recipients();
        if recipients.is_empty() {
            return Err(DeliveryError::NoRecipients);
        }

        let mut alert =
            CongestionAlert::new(vehicle_count, analysis.lanes.clone(), self.status.raining);
        if let Some(path) = snapshot_path {
            alert = alert.with_snapshot(path);
        }

        let mut delivered = 0usize;
        for recipient in &recipients {
            match self.channel.deliver(recipient, &alert) {
                Ok(()) => delivered += 1,
                Err(e) => warn!("delivery to {recipient} failed: {e}"),
            }
        }

        if delivered == 0 {
            return Err(DeliveryError::Send(format!(
                "all {} recipients failed",
                recipients.len()
            )));
        }

        self.gate.record_notification();
        info!(
            vehicles = vehicle_count,
            delivered,
            total = recipients.len(),
            "congestion alert sent"
        );
        Ok(NotifyOutcome::Sent)
    }
}
