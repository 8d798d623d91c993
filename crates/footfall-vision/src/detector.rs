//! Person detection over a YOLOv8 ONNX model.

use std::path::Path;
use std::sync::Mutex;

use image::DynamicImage;
use ndarray::Array;
use ort::session::builder::GraphOptimizationLevel;
use ort::session::Session;
use ort::value::{Tensor, Value};
use tracing::{debug, info};

use crate::error::{VisionError, VisionResult};

/// Default confidence threshold for person detections.
pub const DEFAULT_CONFIDENCE_THRESHOLD: f32 = 0.7;

/// A person found in one frame, before track-id assignment.
///
/// Coordinates are corner-format pixel values clamped to the frame.
#[derive(Debug, Clone, PartialEq)]
pub struct RawDetection {
    pub x1: i64,
    pub y1: i64,
    pub x2: i64,
    pub y2: i64,
    /// Detection confidence [0, 1]
    pub confidence: f32,
}

impl RawDetection {
    /// Integer box center.
    pub fn center(&self) -> (i64, i64) {
        ((self.x1 + self.x2) / 2, (self.y1 + self.y2) / 2)
    }

    /// Corner-format box as stored on person records.
    pub fn bbox(&self) -> [i64; 4] {
        [self.x1, self.y1, self.x2, self.y2]
    }
}

/// Frame-level person detector.
///
/// Implementations filter a multi-class model's output down to the person
/// category and drop detections at or below the threshold. A failed model
/// run yields an error, never partial results.
pub trait PersonDetector: Send + Sync {
    /// Detect people in one decoded frame.
    ///
    /// Returns detections in model output order (post-NMS).
    fn detect(
        &self,
        frame: &DynamicImage,
        confidence_threshold: f32,
    ) -> VisionResult<Vec<RawDetection>>;

    /// Detector name for logging.
    fn name(&self) -> &'static str;
}

/// Configuration for the YOLOv8 person detector.
#[derive(Debug, Clone)]
pub struct YoloConfig {
    /// Path to ONNX model file
    pub model_path: String,
    /// IoU threshold for NMS
    pub nms_threshold: f32,
    /// Input image size (model expects square input)
    pub input_size: u32,
}

impl Default for YoloConfig {
    fn default() -> Self {
        Self {
            model_path: "models/yolov8n.onnx".to_string(),
            nms_threshold: 0.45,
            input_size: 640,
        }
    }
}

/// YOLOv8 person detector backed by ONNX Runtime.
///
/// The model is multi-class; only the person class (COCO class 0) survives
/// postprocessing.
pub struct YoloPersonDetector {
    session: Mutex<Session>,
    config: YoloConfig,
}

// YOLOv8 output layout: [1, 84, 8400] = 4 bbox coords + 80 class scores,
// 8400 candidate boxes.
const NUM_FEATURES: usize = 84;
const NUM_BOXES: usize = 8400;
const PERSON_CLASS_OFFSET: usize = 4;

impl YoloPersonDetector {
    /// Load the model from config.
    ///
    /// Returns [`VisionError::ModelNotFound`] if the model file is missing.
    pub fn new(config: YoloConfig) -> VisionResult<Self> {
        let model_path = Path::new(&config.model_path);
        if !model_path.exists() {
            return Err(VisionError::ModelNotFound(config.model_path.clone()));
        }

        let session = Mutex::new(create_session(model_path)?);
        info!(
            model_path = %config.model_path,
            input_size = config.input_size,
            "person detector initialized"
        );

        Ok(Self { session, config })
    }

    /// Preprocess to the model's square input: resize, normalize to [0, 1],
    /// NCHW layout.
    fn preprocess(&self, img: &DynamicImage) -> VisionResult<Value> {
        let input_size = self.config.input_size;

        let resized = img.resize_exact(
            input_size,
            input_size,
            image::imageops::FilterType::Triangle,
        );
        let rgb = resized.to_rgb8();
        let (w, h) = (input_size as usize, input_size as usize);

        let mut chw_data: Vec<f32> = Vec::with_capacity(3 * h * w);
        for c in 0..3 {
            for y in 0..h {
                for x in 0..w {
                    let pixel = rgb.get_pixel(x as u32, y as u32);
                    chw_data.push(pixel[c] as f32 / 255.0);
                }
            }
        }

        let shape = vec![1usize, 3, h, w];
        Tensor::from_array((shape, chw_data.into_boxed_slice()))
            .map(Value::from)
            .map_err(|e| VisionError::inference(format!("failed to create input tensor: {}", e)))
    }

    fn run_inference(&self, input: Value) -> VisionResult<Vec<f32>> {
        let mut session = self
            .session
            .lock()
            .map_err(|_| VisionError::inference("session lock poisoned"))?;

        let outputs = session
            .run(ort::inputs![input])
            .map_err(|e| VisionError::inference(format!("ONNX inference failed: {}", e)))?;

        let output = outputs
            .get("output0")
            .ok_or_else(|| VisionError::inference("missing output0 tensor"))?;

        let tensor = output
            .try_extract_tensor::<f32>()
            .map_err(|e| VisionError::inference(format!("failed to extract tensor: {}", e)))?;

        Ok(tensor.1.iter().copied().collect())
    }

    /// Parse raw model output, keep person candidates over the threshold,
    /// apply NMS, and scale boxes back to source pixels.
    fn postprocess(
        &self,
        outputs: &[f32],
        orig_width: u32,
        orig_height: u32,
        confidence_threshold: f32,
    ) -> VisionResult<Vec<RawDetection>> {
        if outputs.len() != NUM_FEATURES * NUM_BOXES {
            return Err(VisionError::inference(format!(
                "unexpected output size: expected {}, got {}",
                NUM_FEATURES * NUM_BOXES,
                outputs.len()
            )));
        }

        let output_array = Array::from_shape_vec((NUM_FEATURES, NUM_BOXES), outputs.to_vec())
            .map_err(|e| VisionError::inference(format!("failed to reshape output: {}", e)))?;
        let transposed = output_array.t(); // [8400, 84]

        let input_size = self.config.input_size as f32;
        let scale_w = orig_width as f32 / input_size;
        let scale_h = orig_height as f32 / input_size;

        let mut candidates: Vec<RawDetection> = Vec::new();
        for i in 0..NUM_BOXES {
            let score = transposed[[i, PERSON_CLASS_OFFSET]];
            if score <= confidence_threshold {
                continue;
            }

            // Center format in model coordinates
            let cx = transposed[[i, 0]];
            let cy = transposed[[i, 1]];
            let w = transposed[[i, 2]];
            let h = transposed[[i, 3]];

            let x1 = ((cx - w / 2.0) * scale_w).max(0.0);
            let y1 = ((cy - h / 2.0) * scale_h).max(0.0);
            let x2 = ((cx + w / 2.0) * scale_w).min(orig_width as f32);
            let y2 = ((cy + h / 2.0) * scale_h).min(orig_height as f32);

            candidates.push(RawDetection {
                x1: x1 as i64,
                y1: y1 as i64,
                x2: x2 as i64,
                y2: y2 as i64,
                confidence: score,
            });
        }

        Ok(non_maximum_suppression(candidates, self.config.nms_threshold))
    }
}

impl PersonDetector for YoloPersonDetector {
    fn detect(
        &self,
        frame: &DynamicImage,
        confidence_threshold: f32,
    ) -> VisionResult<Vec<RawDetection>> {
        let (width, height) = (frame.width(), frame.height());
        if width == 0 || height == 0 {
            return Err(VisionError::invalid_image("zero-sized frame"));
        }

        let input = self.preprocess(frame)?;
        let outputs = self.run_inference(input)?;
        let detections = self.postprocess(&outputs, width, height, confidence_threshold)?;

        debug!(count = detections.len(), "person detection completed");
        Ok(detections)
    }

    fn name(&self) -> &'static str {
        "yolov8"
    }
}

/// Remove overlapping detections, keeping the highest-confidence one.
fn non_maximum_suppression(mut detections: Vec<RawDetection>, threshold: f32) -> Vec<RawDetection> {
    if detections.is_empty() {
        return detections;
    }

    detections.sort_by(|a, b| b.confidence.partial_cmp(&a.confidence).unwrap());

    let mut keep = Vec::new();
    let mut suppressed = vec![false; detections.len()];

    for i in 0..detections.len() {
        if suppressed[i] {
            continue;
        }
        keep.push(detections[i].clone());

        for j in (i + 1)..detections.len() {
            if !suppressed[j] && compute_iou(&detections[i], &detections[j]) > threshold {
                suppressed[j] = true;
            }
        }
    }

    keep
}

/// Intersection over Union of two corner-format boxes.
fn compute_iou(a: &RawDetection, b: &RawDetection) -> f32 {
    let x1 = a.x1.max(b.x1);
    let y1 = a.y1.max(b.y1);
    let x2 = a.x2.min(b.x2);
    let y2 = a.y2.min(b.y2);

    let intersection = ((x2 - x1).max(0) * (y2 - y1).max(0)) as f32;
    let area_a = ((a.x2 - a.x1) * (a.y2 - a.y1)) as f32;
    let area_b = ((b.x2 - b.x1) * (b.y2 - b.y1)) as f32;
    let union = area_a + area_b - intersection;

    if union > 0.0 {
        intersection / union
    } else {
        0.0
    }
}

/// Create an ONNX Runtime session for the model file.
fn create_session(model_path: &Path) -> VisionResult<Session> {
    let model_bytes = std::fs::read(model_path)?;

    Session::builder()
        .map_err(|e| VisionError::inference(format!("failed to create session builder: {}", e)))?
        .with_optimization_level(GraphOptimizationLevel::Level3)
        .map_err(|e| VisionError::inference(format!("failed to set optimization level: {}", e)))?
        .commit_from_memory(&model_bytes)
        .map_err(|e| VisionError::inference(format!("failed to load ONNX model: {}", e)))
}

/// Detector that returns a fixed list regardless of input.
///
/// Used by tests and as a fallback when no model file is available; the rest
/// of the pipeline cannot tell it apart from a real detector.
#[derive(Debug, Default)]
pub struct StubDetector {
    detections: Vec<RawDetection>,
}

impl StubDetector {
    /// Stub that sees nobody.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Stub that reports the given detections on every frame.
    pub fn with_detections(detections: Vec<RawDetection>) -> Self {
        Self { detections }
    }
}

impl PersonDetector for StubDetector {
    fn detect(
        &self,
        _frame: &DynamicImage,
        confidence_threshold: f32,
    ) -> VisionResult<Vec<RawDetection>> {
        Ok(self
            .detections
            .iter()
            .filter(|d| d.confidence > confidence_threshold)
            .cloned()
            .collect())
    }

    fn name(&self) -> &'static str {
        "stub"
    }
}
