//! Video frame type and JPEG codec

use image::codecs::jpeg::JpegEncoder;
use image::{ImageFormat, RgbImage};

use crate::CaptureError;

/// Decoded RGB video frame
#[derive(Debug, Clone)]
pub struct VideoFrame {
    /// RGB pixel data (width * height * 3)
    pub data: Vec<u8>,
    /// Frame width
    pub width: u32,
    /// Frame height
    pub height: u32,
    /// Capture timestamp (nanoseconds)
    pub timestamp_ns: u64,
    /// Frame sequence number
    pub sequence: u32,
}

impl VideoFrame {
    /// Create a new video frame from raw RGB data
    pub fn new(data: Vec<u8>, width: u32, height: u32, timestamp_ns: u64, sequence: u32) -> Self {
        Self {
            data,
            width,
            height,
            timestamp_ns,
            sequence,
        }
    }

    /// Get pixel at (x, y)
    pub fn get_pixel(&self, x: u32, y: u32) -> Option<[u8; 3]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = ((y * self.width + x) * 3) as usize;
        Some([self.data[idx], self.data[idx + 1], self.data[idx + 2]])
    }

    /// Resize to the processing resolution, nearest neighbor
    pub fn resize(&self, new_width: u32, new_height: u32) -> VideoFrame {
        let mut resized = Vec::with_capacity((new_width * new_height * 3) as usize);

        let x_ratio = self.width as f32 / new_width as f32;
        let y_ratio = self.height as f32 / new_height as f32;

        for y in 0..new_height {
            for x in 0..new_width {
                let src_x = (x as f32 * x_ratio).floor() as u32;
                let src_y = (y as f32 * y_ratio).floor() as u32;

                if let Some(pixel) =
                    self.get_pixel(src_x.min(self.width - 1), src_y.min(self.height - 1))
                {
                    resized.extend_from_slice(&pixel);
                } else {
                    resized.extend_from_slice(&[0, 0, 0]);
                }
            }
        }

        VideoFrame {
            data: resized,
            width: new_width,
            height: new_height,
            timestamp_ns: self.timestamp_ns,
            sequence: self.sequence,
        }
    }

    /// Encode the frame as JPEG bytes
    pub fn to_jpeg(&self, quality: u8) -> Result<Vec<u8>, CaptureError> {
        let img = RgbImage::from_raw(self.width, self.height, self.data.clone())
            .ok_or_else(|| CaptureError::Decode("frame buffer size mismatch".to_string()))?;

        let mut out = Vec::new();
        let encoder = JpegEncoder::new_with_quality(&mut out, quality);
        img.write_with_encoder(encoder)
            .map_err(|e| CaptureError::Decode(e.to_string()))?;
        Ok(out)
    }

    /// Decode a JPEG still into an RGB frame
    pub fn from_jpeg(data: &[u8], sequence: u32) -> Result<VideoFrame, CaptureError> {
        let img = image::load_from_memory_with_format(data, ImageFormat::Jpeg)
            .map_err(|e| CaptureError::Decode(e.to_string()))?;
        let rgb = img.to_rgb8();

        Ok(VideoFrame {
            width: rgb.width(),
            height: rgb.height(),
            data: rgb.into_raw(),
            timestamp_ns: 0,
            sequence,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solid_frame(width: u32, height: u32, rgb: [u8; 3]) -> VideoFrame {
        let mut data = Vec::with_capacity((width * height * 3) as usize);
        for _ in 0..(width * height) {
            data.extend_from_slice(&rgb);
        }
        VideoFrame::new(data, width, height, 0, 0)
    }

    #[test]
    fn test_get_pixel_bounds() {
        let frame = solid_frame(4, 4, [10, 20, 30]);
        assert_eq!(frame.get_pixel(0, 0), Some([10, 20, 30]));
        assert_eq!(frame.get_pixel(3, 3), Some([10, 20, 30]));
        assert_eq!(frame.get_pixel(4, 0), None);
        assert_eq!(frame.get_pixel(0, 4), None);
    }

    #[test]
    fn test_resize_halves_dimensions() {
        let frame = solid_frame(8, 8, [200, 100, 50]);
        let resized = frame.resize(4, 4);
        assert_eq!(resized.width, 4);
        assert_eq!(resized.height, 4);
        assert_eq!(resized.data.len(), 4 * 4 * 3);
        assert_eq!(resized.get_pixel(2, 2), Some([200, 100, 50]));
    }

    #[test]
    fn test_jpeg_codec() {
        let frame = solid_frame(16, 16, [120, 120, 120]);
        let jpeg = frame.to_jpeg(90).unwrap();
        assert!(!jpeg.is_empty());

        let decoded = VideoFrame::from_jpeg(&jpeg, 7).unwrap();
        assert_eq!(decoded.width, 16);
        assert_eq!(decoded.height, 16);
        assert_eq!(decoded.sequence, 7);
    }

    #[test]
    fn test_from_jpeg_rejects_garbage() {
        assert!(VideoFrame::from_jpeg(&[0, 1, 2, 3], 0).is_err());
    }
}
