//! Lane geometry configuration

use serde::{Deserialize, Serialize};

use crate::geometry::{LaneLayout, LaneLine};
use crate::CongestionError;

/// Lane-partitioning strategy, selected once per run.
///
/// Resolved to a concrete [`LaneLayout`] against the frame width at
/// classifier construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "strategy", rename_all = "snake_case")]
pub enum LaneGeometry {
    /// Equal-width vertical strips across the frame
    Equal { lanes: usize },
    /// Percentage-width strips; each positive, summing to at most 100
    Percent { widths: Vec<f64> },
    /// Angled separator lines; membership by nearest line
    Angled { lines: Vec<LaneLine> },
}

impl Default for LaneGeometry {
    fn default() -> Self {
        Self::Equal { lanes: 3 }
    }
}

impl LaneGeometry {
    /// Resolve to a concrete layout for the given frame width
    pub fn resolve(&self, frame_width: u32) -> Result<LaneLayout, CongestionError> {
        match self {
            Self::Equal { lanes } => LaneLayout::equal_intervals(frame_width, *lanes),
            Self::Percent { widths } => LaneLayout::from_percentages(widths, frame_width),
            Self::Angled { lines } => LaneLayout::angled(lines.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_geometry_is_three_equal_lanes() {
        let layout = LaneGeometry::default().resolve(640).unwrap();
        assert_eq!(layout.lane_count(), 3);
    }

    #[test]
    fn test_percent_geometry_resolves() {
        let geometry = LaneGeometry::Percent {
            widths: vec![30.0, 40.0, 30.0],
        };
        let layout = geometry.resolve(1000).unwrap();
        assert_eq!(layout.lane_count(), 3);
    }

    #[test]
    fn test_geometry_parses_tagged_config() {
        let json = r#"{"strategy":"percent","widths":[30.0,40.0,30.0]}"#;
        let geometry: LaneGeometry = serde_json::from_str(json).unwrap();
        assert_eq!(
            geometry,
            LaneGeometry::Percent {
                widths: vec![30.0, 40.0, 30.0]
            }
        );
    }
}
