//! Congestion Alerting
//!
//! Decides when a processed frame becomes an outbound alert and to whom:
//! - Cooldown and vehicle-threshold gating, decoupled from classification
//! - Audience fan-out (one fixed chat or a dynamic set of groups)
//! - Traffic status context updated on every processed frame
//! - Delivery-channel seam; the bot protocol itself lives outside

mod alert;
mod audience;
mod gate;
mod notify;

pub use alert::{CongestionAlert, LogChannel, NotificationChannel};
pub use audience::Audience;
pub use gate::{AlertGate, NotifierConfig};
pub use notify::{CongestionNotifier, NotifyOutcome, TrafficStatus};

use thiserror::Error;

/// Delivery error types
#[derive(Error, Debug)]
pub enum DeliveryError {
    #[error("Send failed: {0}")]
    Send(String),

    #[error("Alert serialization failed: {0}")]
    Serialize(String),

    #[error("No recipients configured")]
    NoRecipients,
}
