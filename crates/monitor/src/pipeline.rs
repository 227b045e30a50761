//! Per-frame pipeline

use std::fs;

use congestion::{CongestionClassifier, FrameAnalysis};
use detector::{DetectionFilter, VehicleDetector};
use frame_source::{CaptureError, FrameSampler, VideoFrame};
use notifier::{CongestionNotifier, DeliveryError, NotificationChannel, NotifyOutcome};
use tracing::{debug, warn};

use crate::stats::FpsStats;
use crate::{MonitorConfig, MonitorError};

/// Result of processing one admitted frame
#[derive(Debug, Clone)]
pub struct FrameReport {
    /// Source sequence number
    pub sequence: u32,
    /// Total vehicles across all lanes
    pub vehicle_count: usize,
    /// Per-lane congestion statuses
    pub analysis: FrameAnalysis,
    /// Whether an alert went out for this frame
    pub notified: bool,
    /// Processing rate for this frame
    pub fps: f64,
}

/// The per-frame monitoring pipeline.
///
/// Holds no state across frames beyond the sampler counter and the
/// notifier's gate; classification itself is pure per frame.
pub struct TrafficMonitor<C: NotificationChannel> {
    sampler: FrameSampler,
    width: u32,
    height: u32,
    detector: VehicleDetector,
    filter: DetectionFilter,
    classifier: CongestionClassifier,
    notifier: CongestionNotifier<C>,
    snapshot_dir: Option<std::path::PathBuf>,
    stats: FpsStats,
}

impl<C: NotificationChannel> TrafficMonitor<C> {
    /// Build the pipeline from configuration
    pub fn new(
        config: &MonitorConfig,
        detector: VehicleDetector,
        channel: C,
    ) -> Result<Self, MonitorError> {
        let layout = config.geometry.resolve(config.source.width)?;
        let classifier =
            CongestionClassifier::new(layout, config.source.width, config.source.height)?
                .with_thresholds(config.thresholds)?;

        Ok(Self {
            sampler: FrameSampler::new(config.source.sample_interval),
            width: config.source.width,
            height: config.source.height,
            detector,
            filter: DetectionFilter::default(),
            classifier,
            notifier: CongestionNotifier::new(
                config.notifier.clone(),
                config.audience.clone(),
                channel,
            ),
            snapshot_dir: config.snapshot_dir.clone(),
            stats: FpsStats::default(),
        })
    }

    /// Update the rain reading carried on alerts
    pub fn set_raining(&mut self, raining: bool) {
        self.notifier.set_raining(raining);
    }

    /// Notifier, for subscription and threshold handling
    pub fn notifier_mut(&mut self) -> &mut CongestionNotifier<C> {
        &mut self.notifier
    }

    /// Running processing-rate statistics
    pub fn stats(&self) -> &FpsStats {
        &self.stats
    }

    /// Run one frame through the pipeline.
    ///
    /// Returns `None` for frames skipped by the sampler.
    pub fn process_frame(&mut self, frame: &VideoFrame) -> Result<Option<FrameReport>, MonitorError> {
        if !self.sampler.admit() {
            debug!(sequence = frame.sequence, "frame skipped by sampler");
            return Ok(None);
        }
        let started = std::time::Instant::now();

        let resized;
        let frame = if frame.width != self.width || frame.height != self.height {
            resized = frame.resize(self.width, self.height);
            &resized
        } else {
            frame
        };

        let raw = self.detector.detect(frame)?;
        let boxes = self.filter.filter_boxes(&raw);
        let analysis = self.classifier.classify(&boxes);

        let snapshot_path = self.save_snapshot(frame)?;
        let notified = match self.notifier.observe(&analysis, snapshot_path.as_deref()) {
            Ok(outcome) => outcome == NotifyOutcome::Sent,
            // No subscribers yet: log and keep processing
            Err(DeliveryError::NoRecipients) => {
                warn!("congestion detected but no recipients subscribed");
                false
            }
            Err(e) => return Err(e.into()),
        };

        let fps = self.stats.record(started.elapsed());
        debug!(
            "frame {} processed at {:.2} fps (avg {:.2})",
            frame.sequence,
            fps,
            self.stats.average()
        );

        Ok(Some(FrameReport {
            sequence: frame.sequence,
            vehicle_count: analysis.total_vehicles(),
            analysis,
            notified,
            fps,
        }))
    }

    fn save_snapshot(&self, frame: &VideoFrame) -> Result<Option<String>, MonitorError> {
        let Some(dir) = &self.snapshot_dir else {
            return Ok(None);
        };

        let path = dir.join(format!("frame_{}.jpg", frame.sequence));
        let jpeg = frame.to_jpeg(85)?;
        fs::write(&path, jpeg)
            .map_err(|e| MonitorError::Capture(CaptureError::Stream(e.to_string())))?;
        Ok(Some(path.to_string_lossy().into_owned()))
    }
}
