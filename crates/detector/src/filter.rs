//! Detection filtering

use congestion::BoundingBox;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::classes::VehicleClass;
use crate::RawDetection;

/// A confidence- and class-filtered vehicle detection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VehicleDetection {
    /// Validated bounding box
    pub bbox: BoundingBox,
    /// Vehicle class
    pub class: VehicleClass,
    /// Detection confidence
    pub confidence: f32,
}

/// Filters raw model output down to usable vehicle detections
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectionFilter {
    /// Detections at or below this confidence are discarded
    pub confidence_threshold: f32,
}

impl Default for DetectionFilter {
    fn default() -> Self {
        Self {
            confidence_threshold: 0.3,
        }
    }
}

impl DetectionFilter {
    /// Create a filter with a custom confidence threshold
    pub fn new(confidence_threshold: f32) -> Self {
        Self {
            confidence_threshold,
        }
    }

    /// Keep vehicle-class detections above the confidence threshold.
    ///
    /// Boxes with inverted or empty extents are logged and skipped; a
    /// malformed area must never reach the occupancy math.
    pub fn filter(&self, raw: &[RawDetection]) -> Vec<VehicleDetection> {
        raw.iter()
            .filter(|d| d.confidence > self.confidence_threshold)
            .filter_map(|d| {
                let class = VehicleClass::from_class_id(d.class_id)?;
                let [x1, y1, x2, y2] = d.bbox;
                match BoundingBox::new(x1 as i32, y1 as i32, x2 as i32, y2 as i32) {
                    Ok(bbox) => Some(VehicleDetection {
                        bbox,
                        class,
                        confidence: d.confidence,
                    }),
                    Err(e) => {
                        warn!("dropping malformed detection: {e}");
                        None
                    }
                }
            })
            .collect()
    }

    /// Filter and strip down to the boxes the classifier consumes
    pub fn filter_boxes(&self, raw: &[RawDetection]) -> Vec<BoundingBox> {
        self.filter(raw).into_iter().map(|d| d.bbox).collect()
    }
}
