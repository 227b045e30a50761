//! Alert audiences

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Who receives alerts.
///
/// Either one fixed chat, or a set of groups that subscribe and
/// unsubscribe at runtime. The set is owned here; handler callbacks
/// mutate it through the notifier rather than shared globals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum Audience {
    /// Every alert goes to this one chat
    FixedChat { chat_id: String },
    /// Alerts fan out to the currently subscribed groups
    Groups { subscribed: BTreeSet<String> },
}

impl Default for Audience {
    fn default() -> Self {
        Self::Groups {
            subscribed: BTreeSet::new(),
        }
    }
}

impl Audience {
    /// Subscribe a group; returns false for fixed-chat audiences or
    /// already-subscribed groups
    pub fn subscribe(&mut self, group_id: impl Into<String>) -> bool {
        match self {
            Self::FixedChat { .. } => false,
            Self::Groups { subscribed } => subscribed.insert(group_id.into()),
        }
    }

    /// Unsubscribe a group; returns whether it was subscribed
    pub fn unsubscribe(&mut self, group_id: &str) -> bool {
        match self {
            Self::FixedChat { .. } => false,
            Self::Groups { subscribed } => subscribed.remove(group_id),
        }
    }

    /// Whether a group currently receives alerts
    pub fn is_subscribed(&self, group_id: &str) -> bool {
        match self {
            Self::FixedChat { chat_id } => chat_id == group_id,
            Self::Groups { subscribed } => subscribed.contains(group_id),
        }
    }

    /// Current recipients, in stable order
    pub fn recipients(&self) -> Vec<&str> {
        match self {
            Self::FixedChat { chat_id } => vec![chat_id.as_str()],
            Self::Groups { subscribed } => subscribed.iter().map(String::as_str).collect(),
        }
    }
}
