//! Lane Congestion Classification
//!
//! Buckets vehicle detections into road lanes and grades each lane's
//! occupancy per frame:
//! - Interval lanes (equal-width or percentage-width vertical strips)
//! - Angled lanes (membership by nearest separator line)
//! - Occupancy ratio mapped to clear / moderate / congested

pub mod analysis;
pub mod config;
pub mod geometry;

pub use analysis::{CongestionLevel, CongestionThresholds, FrameAnalysis, LaneStatus};
pub use config::LaneGeometry;
pub use geometry::{BoundingBox, LaneLayout, LaneLine, PixelInterval};

use thiserror::Error;
use tracing::debug;

/// Classification error types
#[derive(Error, Debug)]
pub enum CongestionError {
    #[error("Malformed bounding box ({x1},{y1})-({x2},{y2})")]
    MalformedBox { x1: i32, y1: i32, x2: i32, y2: i32 },

    #[error("Invalid lane layout: {0}")]
    InvalidLayout(String),

    #[error("Invalid thresholds: low {low} must be positive and below medium {medium}")]
    InvalidThresholds { low: f64, medium: f64 },

    #[error("Invalid frame dimensions {width}x{height}")]
    InvalidFrame { width: u32, height: u32 },
}

/// Per-frame lane congestion classifier.
///
/// The lane layout and thresholds are fixed at construction and the
/// classifier carries no state between frames, so a single instance can
/// be shared across workers processing independent frames.
pub struct CongestionClassifier {
    layout: LaneLayout,
    thresholds: CongestionThresholds,
    frame_width: u32,
    frame_height: u32,
}

impl CongestionClassifier {
    /// Create a classifier for the given layout and frame dimensions
    pub fn new(
        layout: LaneLayout,
        frame_width: u32,
        frame_height: u32,
    ) -> Result<Self, CongestionError> {
        if frame_width == 0 || frame_height == 0 {
            return Err(CongestionError::InvalidFrame {
                width: frame_width,
                height: frame_height,
            });
        }
        if layout.lane_count() == 0 {
            return Err(CongestionError::InvalidLayout("layout has no lanes".into()));
        }

        Ok(Self {
            layout,
            thresholds: CongestionThresholds::default(),
            frame_width,
            frame_height,
        })
    }

    /// Replace the default occupancy breakpoints
    pub fn with_thresholds(
        mut self,
        thresholds: CongestionThresholds,
    ) -> Result<Self, CongestionError> {
        thresholds.validate()?;
        self.thresholds = thresholds;
        Ok(self)
    }

    /// Number of lanes in the configured layout
    pub fn lane_count(&self) -> usize {
        self.layout.lane_count()
    }

    /// The configured layout
    pub fn layout(&self) -> &LaneLayout {
        &self.layout
    }

    /// Lane index for a single detection
    pub fn assign_lane(&self, bbox: &BoundingBox) -> usize {
        self.layout.assign(bbox)
    }

    /// Classify one frame's detections into per-lane congestion statuses
    pub fn classify(&self, boxes: &[BoundingBox]) -> FrameAnalysis {
        let mut lane_boxes: Vec<Vec<&BoundingBox>> = vec![Vec::new(); self.lane_count()];
        for bbox in boxes {
            lane_boxes[self.layout.assign(bbox)].push(bbox);
        }

        let lanes = lane_boxes
            .iter()
            .enumerate()
            .map(|(idx, boxes)| self.lane_status(idx, boxes))
            .collect();

        FrameAnalysis { lanes }
    }

    fn lane_status(&self, lane: usize, boxes: &[&BoundingBox]) -> LaneStatus {
        if boxes.is_empty() {
            return LaneStatus::empty();
        }

        let reference_area =
            self.layout
                .reference_area(lane, self.frame_width, self.frame_height);
        if reference_area <= 0.0 {
            // Degenerate lane (zero-width interval); never divide.
            return LaneStatus::empty();
        }

        // Box areas are summed unclipped: overlapping vehicles double-count.
        let vehicle_area: f64 = boxes.iter().map(|b| b.area()).sum();
        let occupancy = vehicle_area / reference_area;
        debug!(lane, occupancy, count = boxes.len(), "lane classified");

        LaneStatus {
            level: self.thresholds.classify(occupancy),
            percentage: occupancy * 100.0,
            vehicle_count: boxes.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bbox(x1: i32, y1: i32, x2: i32, y2: i32) -> BoundingBox {
        BoundingBox::new(x1, y1, x2, y2).unwrap()
    }

    fn thirds_classifier() -> CongestionClassifier {
        let layout = LaneLayout::equal_intervals(640, 3).unwrap();
        CongestionClassifier::new(layout, 640, 480).unwrap()
    }

    #[test]
    fn test_empty_frame_all_lanes_clear() {
        let classifier = thirds_classifier();
        let analysis = classifier.classify(&[]);

        assert_eq!(analysis.lanes.len(), 3);
        for lane in &analysis.lanes {
            assert_eq!(lane.level, CongestionLevel::Clear);
            assert_eq!(lane.percentage, 0.0);
            assert_eq!(lane.vehicle_count, 0);
        }
    }

    #[test]
    fn test_single_box_stays_clear() {
        // 640x480 thirds: lane 0 spans [0, 213), reference area 213*480.
        let classifier = thirds_classifier();
        let analysis = classifier.classify(&[bbox(50, 100, 150, 300)]);

        let lane = &analysis.lanes[0];
        assert_eq!(lane.level, CongestionLevel::Clear);
        assert_eq!(lane.vehicle_count, 1);
        assert!((lane.percentage - 19.562).abs() < 0.01);
    }

    #[test]
    fn test_second_box_pushes_lane_to_congested() {
        let classifier = thirds_classifier();
        let boxes = [bbox(50, 100, 150, 300), bbox(30, 50, 200, 450)];
        let analysis = classifier.classify(&boxes);

        let lane = &analysis.lanes[0];
        assert_eq!(lane.level, CongestionLevel::Congested);
        assert_eq!(lane.vehicle_count, 2);
        assert!((lane.percentage - 86.07).abs() < 0.1);

        // Other lanes untouched
        assert_eq!(analysis.lanes[1].vehicle_count, 0);
        assert_eq!(analysis.lanes[2].vehicle_count, 0);
        assert_eq!(analysis.total_vehicles(), 2);
    }

    #[test]
    fn test_degenerate_lane_reports_clear() {
        // A zero-width interval has zero reference area; the status must
        // short-circuit instead of dividing.
        let layout = LaneLayout::Intervals(vec![PixelInterval {
            left: 100,
            right: 100,
        }]);
        let classifier = CongestionClassifier::new(layout, 640, 480).unwrap();

        let analysis = classifier.classify(&[bbox(40, 0, 60, 480)]);
        assert_eq!(analysis.lanes[0].level, CongestionLevel::Clear);
        assert_eq!(analysis.lanes[0].percentage, 0.0);
        assert_eq!(analysis.lanes[0].vehicle_count, 0);
    }

    #[test]
    fn test_rejects_zero_frame_dimensions() {
        let layout = LaneLayout::equal_intervals(640, 3).unwrap();
        assert!(CongestionClassifier::new(layout.clone(), 0, 480).is_err());
        assert!(CongestionClassifier::new(layout, 640, 0).is_err());
    }

    #[test]
    fn test_rejects_empty_layout() {
        let layout = LaneLayout::Intervals(Vec::new());
        assert!(CongestionClassifier::new(layout, 640, 480).is_err());
    }

    #[test]
    fn test_classifier_shared_across_threads() {
        use std::sync::Arc;

        let classifier = Arc::new(thirds_classifier());
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let classifier = Arc::clone(&classifier);
                std::thread::spawn(move || {
                    let analysis = classifier.classify(&[bbox(50, 100, 150, 300)]);
                    analysis.lanes[0].vehicle_count
                })
            })
            .collect();

        for handle in handles {
            assert_eq!(handle.join().unwrap(), 1);
        }
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            // Adding a box to a lane never lowers its occupancy.
            #[test]
            fn occupancy_monotonic_in_box_area(
                x1 in 0i32..150,
                y1 in 0i32..400,
                w in 1i32..60,
                h in 1i32..80,
            ) {
                let classifier = thirds_classifier();
                let base = bbox(10, 10, 120, 200);
                let extra = bbox(x1, y1, x1 + w, y1 + h);
                prop_assume!(classifier.assign_lane(&extra) == 0);

                let one = classifier.classify(&[base]);
                let two = classifier.classify(&[base, extra]);
                prop_assert!(two.lanes[0].percentage >= one.lanes[0].percentage);
            }
        }
    }
}
