//! Frame Source Library for the Congestion Pipeline
//!
//! Provides the video-frame data type and the seam behind which real
//! capture hardware lives:
//! - Decoded RGB frames with JPEG encode/decode
//! - Frame sampling (process every Nth frame)
//! - A directory-of-stills source for rigs without a live camera

pub mod frame;
pub mod source;

pub use frame::VideoFrame;
pub use source::{FrameSource, ImageDirSource};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Capture error types
#[derive(Error, Debug)]
pub enum CaptureError {
    #[error("Failed to open source: {0}")]
    Open(String),

    #[error("Frame decode failed: {0}")]
    Decode(String),

    #[error("Streaming error: {0}")]
    Stream(String),

    #[error("Capture timeout")]
    Timeout,
}

/// Frame source configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Source location (device index, file path, or stills directory)
    pub uri: String,
    /// Processing width after downscale
    pub width: u32,
    /// Processing height after downscale
    pub height: u32,
    /// Process every Nth frame
    pub sample_interval: u32,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            uri: "frames".to_string(),
            width: 640,
            height: 480,
            sample_interval: 5,
        }
    }
}

/// Admits every Nth frame and skips the rest
#[derive(Debug)]
pub struct FrameSampler {
    interval: u32,
    counter: u32,
}

impl FrameSampler {
    /// Create a sampler; an interval of 0 or 1 admits every frame
    pub fn new(interval: u32) -> Self {
        Self {
            interval: interval.max(1),
            counter: 0,
        }
    }

    /// Whether the next frame should be processed
    pub fn admit(&mut self) -> bool {
        self.counter += 1;
        self.counter % self.interval == 0
    }
}
