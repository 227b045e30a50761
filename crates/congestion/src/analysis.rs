//! Congestion levels and per-frame analysis results

use serde::{Deserialize, Serialize};

use crate::CongestionError;

/// Discrete congestion level for one lane
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CongestionLevel {
    #[default]
    Clear,
    Moderate,
    Congested,
}

impl CongestionLevel {
    /// Get string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            CongestionLevel::Clear => "clear",
            CongestionLevel::Moderate => "moderate",
            CongestionLevel::Congested => "congested",
        }
    }
}

/// Occupancy breakpoints, as fractions of the lane reference area.
///
/// Anything at or above `medium` is congested; there is no upper bound.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CongestionThresholds {
    /// Below this fraction the lane is clear
    pub low: f64,
    /// Below this fraction the lane is moderate
    pub medium: f64,
}

impl Default for CongestionThresholds {
    fn default() -> Self {
        Self {
            low: 0.3,
            medium: 0.6,
        }
    }
}

impl CongestionThresholds {
    /// Check that the breakpoints are ordered and positive
    pub fn validate(&self) -> Result<(), CongestionError> {
        if self.low <= 0.0 || self.low >= self.medium {
            return Err(CongestionError::InvalidThresholds {
                low: self.low,
                medium: self.medium,
            });
        }
        Ok(())
    }

    /// Classify an occupancy fraction
    pub fn classify(&self, occupancy: f64) -> CongestionLevel {
        if occupancy < self.low {
            CongestionLevel::Clear
        } else if occupancy < self.medium {
            CongestionLevel::Moderate
        } else {
            CongestionLevel::Congested
        }
    }
}

/// Per-lane, per-frame congestion status
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LaneStatus {
    /// Congestion level
    pub level: CongestionLevel,
    /// Occupied fraction of the lane reference area, as a percentage.
    /// Unclipped box areas can push this past 100.
    pub percentage: f64,
    /// Number of vehicles assigned to the lane
    pub vehicle_count: usize,
}

impl LaneStatus {
    /// Status of a lane with no detections
    pub fn empty() -> Self {
        Self::default()
    }
}

/// Congestion statuses for every lane of one frame
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FrameAnalysis {
    /// Per-lane statuses, indexed by lane
    pub lanes: Vec<LaneStatus>,
}

impl FrameAnalysis {
    /// Total vehicles across all lanes
    pub fn total_vehicles(&self) -> usize {
        self.lanes.iter().map(|lane| lane.vehicle_count).sum()
    }

    /// Check if any lane is congested
    pub fn has_congestion(&self) -> bool {
        self.lanes
            .iter()
            .any(|lane| lane.level == CongestionLevel::Congested)
    }

    /// Index and status of the busiest lane, by occupancy percentage
    pub fn most_congested(&self) -> Option<(usize, &LaneStatus)> {
        self.lanes.iter().enumerate().max_by(|a, b| {
            a.1.percentage
                .partial_cmp(&b.1.percentage)
                .unwrap_or(std::cmp::Ordering::Equal)
        })
    }
}
