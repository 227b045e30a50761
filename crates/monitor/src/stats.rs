//! Processing-rate statistics

/// Running FPS statistics over processed frames
#[derive(Debug, Clone)]
pub struct FpsStats {
    total_fps: f64,
    processed_frames: usize,
    max_fps: f64,
    min_fps: f64,
}

impl Default for FpsStats {
    fn default() -> Self {
        Self {
            total_fps: 0.0,
            processed_frames: 0,
            max_fps: 0.0,
            min_fps: f64::MAX,
        }
    }
}

impl FpsStats {
    /// Record one frame's processing time
    pub fn record(&mut self, elapsed: std::time::Duration) -> f64 {
        let seconds = elapsed.as_secs_f64();
        let fps = if seconds > 0.0 { 1.0 / seconds } else { 0.0 };

        self.total_fps += fps;
        self.processed_frames += 1;
        self.max_fps = self.max_fps.max(fps);
        self.min_fps = self.min_fps.min(fps);
        fps
    }

    /// Average FPS across processed frames
    pub fn average(&self) -> f64 {
        if self.processed_frames == 0 {
            return 0.0;
        }
        self.total_fps / self.processed_frames as f64
    }

    /// Number of frames recorded
    pub fn processed_frames(&self) -> usize {
        self.processed_frames
    }

    /// Fastest observed frame
    pub fn max(&self) -> f64 {
        self.max_fps
    }

    /// Slowest observed frame; 0 until anything is recorded
    pub fn min(&self) -> f64 {
        if self.processed_frames == 0 {
            0.0
        } else {
            self.min_fps
        }
    }
}
