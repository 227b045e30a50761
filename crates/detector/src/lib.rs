//! Vehicle Detection Seam
//!
//! Wraps the external detection-model runtime:
//! - Raw per-frame detection boxes with confidence and class id
//! - Confidence and vehicle-class filtering
//! - Mock mode for rigs and tests without a model file

pub mod classes;
pub mod filter;

pub use classes::VehicleClass;
pub use filter::{DetectionFilter, VehicleDetection};

use frame_source::VideoFrame;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

/// Detector error types
#[derive(Error, Debug)]
pub enum DetectorError {
    #[error("Model loading failed: {0}")]
    ModelLoad(String),

    #[error("Inference failed: {0}")]
    Inference(String),

    #[error("Invalid frame format")]
    InvalidFrame,
}

/// One raw detection as handed over by the model runtime
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RawDetection {
    /// Corner coordinates [x1, y1, x2, y2] in pixels
    pub bbox: [f32; 4],
    /// Detection confidence (0.0 to 1.0)
    pub confidence: f32,
    /// Model class id
    pub class_id: u32,
}

/// Vehicle detector wrapping the external model runtime.
///
/// Inference itself runs out of process; in mock mode the detector
/// returns a fixed plausible detection set so the pipeline can be
/// exercised end to end.
pub struct VehicleDetector {
    model_path: String,
    loaded: bool,
    mock_mode: bool,
}

impl VehicleDetector {
    /// Create a detector for the given model path
    pub fn new(model_path: &str) -> Result<Self, DetectorError> {
        info!("Creating vehicle detector with model: {}", model_path);

        Ok(Self {
            model_path: model_path.to_string(),
            loaded: false,
            mock_mode: false,
        })
    }

    /// Create a mock detector for testing
    pub fn mock() -> Self {
        info!("Creating mock vehicle detector");
        Self {
            model_path: "mock".to_string(),
            loaded: true,
            mock_mode: true,
        }
    }

    /// Load the detection model
    pub fn load(&mut self) -> Result<(), DetectorError> {
        if self.mock_mode {
            debug!("Mock mode: skipping model load");
            self.loaded = true;
            return Ok(());
        }

        if !std::path::Path::new(&self.model_path).exists() {
            return Err(DetectorError::ModelLoad(format!(
                "model file not found: {}",
                self.model_path
            )));
        }

        info!("Model loaded: {}", self.model_path);
        self.loaded = true;
        Ok(())
    }

    /// Detect objects in a frame
    pub fn detect(&self, frame: &VideoFrame) -> Result<Vec<RawDetection>, DetectorError> {
        if !self.loaded {
            return Err(DetectorError::Inference("model not loaded".to_string()));
        }
        if frame.data.len() != (frame.width * frame.height * 3) as usize {
            return Err(DetectorError::InvalidFrame);
        }

        if self.mock_mode {
            // Two vehicles in the left lane, one mid-frame.
            return Ok(vec![
                RawDetection {
                    bbox: [50.0, 100.0, 150.0, 300.0],
                    confidence: 0.92,
                    class_id: 0,
                },
                RawDetection {
                    bbox: [30.0, 50.0, 200.0, 450.0],
                    confidence: 0.81,
                    class_id: 2,
                },
                RawDetection {
                    bbox: [300.0, 150.0, 390.0, 320.0],
                    confidence: 0.77,
                    class_id: 0,
                },
            ]);
        }

        Err(DetectorError::Inference(
            "model runtime not available in this build".to_string(),
        ))
    }
}
