//! Lane geometry and box-to-lane assignment

use serde::{Deserialize, Serialize};

use crate::CongestionError;

/// Axis-aligned detection box in pixel coordinates.
///
/// Invariant: `x1 < x2` and `y1 < y2`, enforced at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x1: i32,
    pub y1: i32,
    pub x2: i32,
    pub y2: i32,
}

impl BoundingBox {
    /// Create a box, rejecting inverted or empty extents
    pub fn new(x1: i32, y1: i32, x2: i32, y2: i32) -> Result<Self, CongestionError> {
        if x1 >= x2 || y1 >= y2 {
            return Err(CongestionError::MalformedBox { x1, y1, x2, y2 });
        }
        Ok(Self { x1, y1, x2, y2 })
    }

    /// Horizontal center in pixels
    pub fn center_x(&self) -> f64 {
        f64::from(self.x1 + self.x2) / 2.0
    }

    /// Box centroid
    pub fn centroid(&self) -> (f64, f64) {
        (
            f64::from(self.x1 + self.x2) / 2.0,
            f64::from(self.y1 + self.y2) / 2.0,
        )
    }

    /// Covered area in square pixels
    pub fn area(&self) -> f64 {
        f64::from(self.x2 - self.x1) * f64::from(self.y2 - self.y1)
    }
}

/// Half-open horizontal interval `[left, right)` in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PixelInterval {
    pub left: u32,
    pub right: u32,
}

impl PixelInterval {
    /// Interval width in pixels
    pub fn width(&self) -> u32 {
        self.right.saturating_sub(self.left)
    }

    fn contains(&self, x: f64) -> bool {
        x >= f64::from(self.left) && x < f64::from(self.right)
    }

    fn distance_to(&self, x: f64) -> f64 {
        if x < f64::from(self.left) {
            f64::from(self.left) - x
        } else if x >= f64::from(self.right) {
            x - f64::from(self.right)
        } else {
            0.0
        }
    }
}

/// Angled lane separator anchored by two points in pixel space.
///
/// Distance checks treat the segment as an infinite line.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LaneLine {
    pub start: (f64, f64),
    pub end: (f64, f64),
}

impl LaneLine {
    /// Create a separator line, rejecting zero-length segments
    pub fn new(start: (f64, f64), end: (f64, f64)) -> Result<Self, CongestionError> {
        if start == end {
            return Err(CongestionError::InvalidLayout(format!(
                "zero-length lane line at ({}, {})",
                start.0, start.1
            )));
        }
        Ok(Self { start, end })
    }

    /// Perpendicular distance from a point to the infinite line through
    /// this segment
    pub fn distance_to(&self, point: (f64, f64)) -> f64 {
        let (x1, y1) = self.start;
        let (x2, y2) = self.end;
        let (px, py) = point;

        let numerator = ((y2 - y1) * px - (x2 - x1) * py + x2 * y1 - y2 * x1).abs();
        let denominator = ((y2 - y1).powi(2) + (x2 - x1).powi(2)).sqrt();
        numerator / denominator
    }
}

/// Lane-partitioning scheme, fixed for the lifetime of a run.
///
/// Lane indices are stable `0..N-1` in declaration order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum LaneLayout {
    /// Vertical strips; membership by horizontal-center containment
    Intervals(Vec<PixelInterval>),
    /// Angled separator lines; membership by nearest line
    Angled(Vec<LaneLine>),
}

impl LaneLayout {
    /// Split the frame width into `lanes` equal vertical strips.
    ///
    /// The last lane absorbs the integer-division remainder so the strips
    /// always cover `[0, frame_width)`.
    pub fn equal_intervals(frame_width: u32, lanes: usize) -> Result<Self, CongestionError> {
        if lanes == 0 {
            return Err(CongestionError::InvalidLayout("zero lanes".into()));
        }
        let lane_width = frame_width / lanes as u32;
        if lane_width == 0 {
            return Err(CongestionError::InvalidLayout(format!(
                "frame width {frame_width} too narrow for {lanes} lanes"
            )));
        }

        let intervals = (0..lanes)
            .map(|i| PixelInterval {
                left: lane_width * i as u32,
                right: if i == lanes - 1 {
                    frame_width
                } else {
                    lane_width * (i as u32 + 1)
                },
            })
            .collect();
        Ok(Self::Intervals(intervals))
    }

    /// Build vertical strips from percentage widths.
    ///
    /// Each width must be positive and the total must not exceed 100.
    /// Boundaries are placed on the cumulative sum, so widths summing to
    /// exactly 100 partition `[0, frame_width)` with no gaps or overlap.
    pub fn from_percentages(widths: &[f64], frame_width: u32) -> Result<Self, CongestionError> {
        if widths.is_empty() {
            return Err(CongestionError::InvalidLayout("no lane widths".into()));
        }
        if frame_width == 0 {
            return Err(CongestionError::InvalidLayout("zero frame width".into()));
        }
        if widths.iter().any(|w| *w <= 0.0) {
            return Err(CongestionError::InvalidLayout(
                "lane widths must be positive".into(),
            ));
        }
        let total: f64 = widths.iter().sum();
        if total > 100.0 + 1e-9 {
            return Err(CongestionError::InvalidLayout(format!(
                "lane widths sum to {total}, expected at most 100"
            )));
        }

        let mut intervals = Vec::with_capacity(widths.len());
        let mut cumulative = 0.0;
        let mut left = 0u32;
        for width in widths {
            cumulative += width;
            let right = (cumulative / 100.0 * f64::from(frame_width)).round() as u32;
            intervals.push(PixelInterval { left, right });
            left = right;
        }
        Ok(Self::Intervals(intervals))
    }

    /// Build an angled layout from separator lines
    pub fn angled(lines: Vec<LaneLine>) -> Result<Self, CongestionError> {
        if lines.is_empty() {
            return Err(CongestionError::InvalidLayout("no lane lines".into()));
        }
        Ok(Self::Angled(lines))
    }

    /// Number of lanes
    pub fn lane_count(&self) -> usize {
        match self {
            Self::Intervals(intervals) => intervals.len(),
            Self::Angled(lines) => lines.len(),
        }
    }

    /// Map a box to exactly one lane index.
    ///
    /// Interval layouts take the first lane containing the box's
    /// horizontal center; a center outside every interval (rounding at
    /// the last boundary, gaps in partial-percentage layouts) is clamped
    /// to the nearest lane rather than dropped. Angled layouts take the
    /// line nearest the box centroid. Exact ties resolve to the lowest
    /// index.
    pub fn assign(&self, bbox: &BoundingBox) -> usize {
        match self {
            Self::Intervals(intervals) => {
                let cx = bbox.center_x();
                if let Some(idx) = intervals.iter().position(|iv| iv.contains(cx)) {
                    return idx;
                }
                nearest_index(intervals.iter().map(|iv| iv.distance_to(cx)))
            }
            Self::Angled(lines) => {
                let centroid = bbox.centroid();
                nearest_index(lines.iter().map(|line| line.distance_to(centroid)))
            }
        }
    }

    /// Occupancy denominator for a lane, in square pixels.
    ///
    /// Exact for interval lanes. Angled lanes use an equal share of the
    /// frame area, a coarse approximation of the true lane polygon.
    pub fn reference_area(&self, lane: usize, frame_width: u32, frame_height: u32) -> f64 {
        match self {
            Self::Intervals(intervals) => {
                f64::from(intervals[lane].width()) * f64::from(frame_height)
            }
            Self::Angled(lines) => {
                f64::from(frame_width) * f64::from(frame_height) / lines.len() as f64
            }
        }
    }
}

/// Index of the smallest distance; strict comparison keeps the first
/// (lowest) index on exact ties.
fn nearest_index(distances: impl Iterator<Item = f64>) -> usize {
    let mut best = 0;
    let mut best_distance = f64::INFINITY;
    for (idx, distance) in distances.enumerate() {
        if distance < best_distance {
            best = idx;
            best_distance = distance;
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bbox(x1: i32, y1: i32, x2: i32, y2: i32) -> BoundingBox {
        BoundingBox::new(x1, y1, x2, y2).unwrap()
    }

    #[test]
    fn test_rejects_malformed_box() {
        assert!(BoundingBox::new(100, 10, 100, 50).is_err());
        assert!(BoundingBox::new(100, 50, 10, 100).is_err());
        assert!(BoundingBox::new(0, 100, 50, 100).is_err());
        assert!(BoundingBox::new(0, 0, 50, 100).is_ok());
    }

    #[test]
    fn test_equal_thirds_boundaries() {
        let layout = LaneLayout::equal_intervals(640, 3).unwrap();
        let LaneLayout::Intervals(intervals) = &layout else {
            panic!("expected interval layout");
        };
        assert_eq!(intervals[0], PixelInterval { left: 0, right: 213 });
        assert_eq!(
            intervals[1],
            PixelInterval {
                left: 213,
                right: 426
            }
        );
        // Last lane absorbs the remainder up to the frame edge
        assert_eq!(
            intervals[2],
            PixelInterval {
                left: 426,
                right: 640
            }
        );
    }

    #[test]
    fn test_boxes_inside_interval_assign_to_it() {
        let layout = LaneLayout::equal_intervals(640, 3).unwrap();
        assert_eq!(layout.assign(&bbox(10, 0, 100, 50)), 0);
        assert_eq!(layout.assign(&bbox(250, 0, 350, 50)), 1);
        assert_eq!(layout.assign(&bbox(500, 0, 600, 50)), 2);
    }

    #[test]
    fn test_out_of_interval_center_clamps_to_nearest_lane() {
        // Widths summing below 100 leave a gap on the right.
        let layout = LaneLayout::from_percentages(&[30.0, 30.0], 1000).unwrap();
        // Center 900 sits past every interval and clamps to lane 1.
        assert_eq!(layout.assign(&bbox(850, 0, 950, 50)), 1);
        // Center exactly on the shared boundary belongs to lane 1.
        assert_eq!(layout.assign(&bbox(250, 0, 350, 50)), 1);
    }

    #[test]
    fn test_percentage_example_boundaries() {
        let layout = LaneLayout::from_percentages(&[30.0, 40.0, 30.0], 1000).unwrap();
        let LaneLayout::Intervals(intervals) = &layout else {
            panic!("expected interval layout");
        };
        assert_eq!(intervals[0], PixelInterval { left: 0, right: 300 });
        assert_eq!(
            intervals[1],
            PixelInterval {
                left: 300,
                right: 700
            }
        );
        assert_eq!(
            intervals[2],
            PixelInterval {
                left: 700,
                right: 1000
            }
        );
    }

    #[test]
    fn test_percentage_validation() {
        assert!(LaneLayout::from_percentages(&[], 1000).is_err());
        assert!(LaneLayout::from_percentages(&[50.0, -10.0], 1000).is_err());
        assert!(LaneLayout::from_percentages(&[60.0, 50.0], 1000).is_err());
        assert!(LaneLayout::from_percentages(&[30.0, 40.0, 30.0], 0).is_err());
    }

    #[test]
    fn test_angled_assignment_by_nearest_line() {
        let lines = vec![
            LaneLine::new((100.0, 0.0), (100.0, 480.0)).unwrap(),
            LaneLine::new((300.0, 0.0), (300.0, 480.0)).unwrap(),
        ];
        let layout = LaneLayout::angled(lines).unwrap();

        assert_eq!(layout.assign(&bbox(80, 100, 160, 200)), 0);
        assert_eq!(layout.assign(&bbox(240, 100, 320, 200)), 1);
    }

    #[test]
    fn test_angled_tie_resolves_to_lowest_index() {
        let lines = vec![
            LaneLine::new((100.0, 0.0), (100.0, 480.0)).unwrap(),
            LaneLine::new((300.0, 0.0), (300.0, 480.0)).unwrap(),
        ];
        let layout = LaneLayout::angled(lines).unwrap();

        // Centroid x = 200, exactly 100px from both lines.
        assert_eq!(layout.assign(&bbox(150, 100, 250, 200)), 0);
    }

    #[test]
    fn test_infinite_line_distance_ignores_segment_extent() {
        // Short segment; the point sits well past its end.
        let line = LaneLine::new((0.0, 0.0), (0.0, 10.0)).unwrap();
        assert!((line.distance_to((50.0, 400.0)) - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_rejects_zero_length_line() {
        assert!(LaneLine::new((10.0, 20.0), (10.0, 20.0)).is_err());
    }

    #[test]
    fn test_angled_reference_area_is_equal_share() {
        let lines = vec![
            LaneLine::new((100.0, 0.0), (150.0, 480.0)).unwrap(),
            LaneLine::new((300.0, 0.0), (350.0, 480.0)).unwrap(),
            LaneLine::new((500.0, 0.0), (550.0, 480.0)).unwrap(),
        ];
        let layout = LaneLayout::angled(lines).unwrap();
        for lane in 0..3 {
            assert_eq!(layout.reference_area(lane, 640, 480), 640.0 * 480.0 / 3.0);
        }
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            // Percentages summing to 100 tile [0, width) exactly.
            #[test]
            fn full_percentages_partition_frame(width in 1u32..5000) {
                for widths in [
                    &[30.0, 40.0, 30.0][..],
                    &[25.0, 25.0, 25.0, 25.0][..],
                    &[10.0, 20.0, 30.0, 40.0][..],
                ] {
                    let layout = LaneLayout::from_percentages(widths, width).unwrap();
                    let LaneLayout::Intervals(intervals) = &layout else {
                        panic!("expected interval layout");
                    };

                    prop_assert_eq!(intervals[0].left, 0);
                    prop_assert_eq!(intervals[intervals.len() - 1].right, width);
                    for pair in intervals.windows(2) {
                        prop_assert_eq!(pair[0].right, pair[1].left);
                    }
                }
            }
        }
    }
}
