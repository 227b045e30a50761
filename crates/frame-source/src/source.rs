//! Frame sources

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::frame::VideoFrame;
use crate::CaptureError;

/// A sequential supplier of decoded frames.
///
/// Real capture hardware (camera, RTSP stream) lives behind this seam;
/// `Ok(None)` signals end of stream.
pub trait FrameSource {
    /// Fetch the next frame
    fn next_frame(&mut self) -> Result<Option<VideoFrame>, CaptureError>;
}

/// Reads an ordered directory of JPEG stills as a frame stream
pub struct ImageDirSource {
    paths: Vec<PathBuf>,
    cursor: usize,
}

impl ImageDirSource {
    /// Open a directory, collecting `.jpg`/`.jpeg` files in name order
    pub fn open(dir: impl AsRef<Path>) -> Result<Self, CaptureError> {
        let dir = dir.as_ref();
        let entries = fs::read_dir(dir)
            .map_err(|e| CaptureError::Open(format!("{}: {e}", dir.display())))?;

        let mut paths: Vec<PathBuf> = entries
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| {
                path.extension()
                    .and_then(|ext| ext.to_str())
                    .map(|ext| ext.eq_ignore_ascii_case("jpg") || ext.eq_ignore_ascii_case("jpeg"))
                    .unwrap_or(false)
            })
            .collect();
        paths.sort();

        if paths.is_empty() {
            return Err(CaptureError::Open(format!(
                "no JPEG stills in {}",
                dir.display()
            )));
        }

        info!(dir = %dir.display(), frames = paths.len(), "opened still-image source");
        Ok(Self { paths, cursor: 0 })
    }

    /// Number of stills remaining
    pub fn remaining(&self) -> usize {
        self.paths.len() - self.cursor
    }
}

impl FrameSource for ImageDirSource {
    fn next_frame(&mut self) -> Result<Option<VideoFrame>, CaptureError> {
        let Some(path) = self.paths.get(self.cursor) else {
            return Ok(None);
        };

        let bytes = fs::read(path).map_err(|e| CaptureError::Stream(e.to_string()))?;
        let frame = VideoFrame::from_jpeg(&bytes, self.cursor as u32)?;
        debug!(path = %path.display(), sequence = frame.sequence, "decoded still");

        self.cursor += 1;
        Ok(Some(frame))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_rejects_missing_dir() {
        assert!(ImageDirSource::open("/nonexistent/frames").is_err());
    }

    #[test]
    fn test_dir_source_streams_stills_in_order() {
        let dir = std::env::temp_dir().join("frame_source_test_stills");
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();

        for name in ["b.jpg", "a.jpg"] {
            let frame = VideoFrame::new(vec![128; 8 * 8 * 3], 8, 8, 0, 0);
            fs::write(dir.join(name), frame.to_jpeg(90).unwrap()).unwrap();
        }

        let mut source = ImageDirSource::open(&dir).unwrap();
        assert_eq!(source.remaining(), 2);

        let first = source.next_frame().unwrap().unwrap();
        assert_eq!(first.sequence, 0);
        let second = source.next_frame().unwrap().unwrap();
        assert_eq!(second.sequence, 1);
        assert!(source.next_frame().unwrap().is_none());

        let _ = fs::remove_dir_all(&dir);
    }
}
