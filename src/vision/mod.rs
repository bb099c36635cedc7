//! Live video input through `OpenCV` and `ONNX` Runtime.
//!
//! Faces are located with `OpenCV`'s `YuNet` detector, each box is expanded to
//! a square crop, and a 68-point landmark model runs on the crop.

/// Camera and video file frame source
pub mod camera;

/// Facial landmark detection module for finding 68 key points
pub mod mark_detection;

pub use camera::{CameraSource, VideoSource};
pub use mark_detection::MarkDetector;

use crate::{
    config::Config,
    landmarks::LandmarkSet,
    source::{landmarks_per_face, LandmarkProvider},
    Error, Result,
};
use opencv::{
    core::{Mat, Ptr, Rect, Size},
    objdetect::FaceDetectorYN,
    prelude::*,
};

/// Candidate boxes kept by `YuNet` before NMS
const YUNET_TOP_K: i32 = 5000;

/// Face boxes from `YuNet` followed by ONNX landmark detection
pub struct OnnxLandmarkProvider {
    face_detector: Ptr<FaceDetectorYN>,
    mark_detector: MarkDetector,
    input_size: Size,
    bbox_expansion: f32,
    max_faces: usize,
}

impl OnnxLandmarkProvider {
    /// Load both models named in the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if a model file is missing or fails to load
    pub fn new(config: &Config) -> Result<Self> {
        config.validate_models()?;

        let detector_path = config.models.face_detector.to_str().ok_or_else(|| {
            Error::ConfigError(format!(
                "Face detector path is not valid UTF-8: {}",
                config.models.face_detector.display()
            ))
        })?;
        let input_size = Size::new(config.video.frame_width, config.video.frame_height);

        log::info!("Initializing YuNet face detector with model: {detector_path}");
        let face_detector = FaceDetectorYN::create(
            detector_path,
            "",
            input_size,
            config.face_detection.confidence_threshold,
            config.face_detection.nms_threshold,
            YUNET_TOP_K,
            0,
            0,
        )?;

        Ok(Self {
            face_detector,
            mark_detector: MarkDetector::new(&config.models.face_landmarks)?,
            input_size,
            bbox_expansion: config.face_detection.bbox_expansion,
            max_faces: config.face_detection.max_faces,
        })
    }

    /// Face boxes in frame coordinates, best first as reported by the detector
    #[allow(clippy::cast_possible_truncation)]
    fn detect_boxes(&mut self, frame: &Mat) -> Result<Vec<Rect>> {
        let size = frame.size()?;
        if size != self.input_size {
            self.face_detector.set_input_size(size)?;
            self.input_size = size;
        }

        let mut faces = Mat::default();
        self.face_detector.detect(frame, &mut faces)?;

        let mut boxes = Vec::with_capacity(faces.rows().max(0) as usize);
        for row in 0..faces.rows() {
            let x = *faces.at_2d::<f32>(row, 0)?;
            let y = *faces.at_2d::<f32>(row, 1)?;
            let w = *faces.at_2d::<f32>(row, 2)?;
            let h = *faces.at_2d::<f32>(row, 3)?;
            let bbox = Rect::new(x as i32, y as i32, w as i32, h as i32);
            if let Some(expanded) = expand_box(bbox, size.width, size.height, self.bbox_expansion) {
                boxes.push(expanded);
            }
        }
        Ok(boxes)
    }
}

impl LandmarkProvider<Mat> for OnnxLandmarkProvider {
    fn detect_faces(&mut self, frame: &Mat) -> Result<Vec<LandmarkSet>> {
        let boxes = self.detect_boxes(frame)?.into_iter().take(self.max_faces);
        let mark_detector = &self.mark_detector;
        Ok(landmarks_per_face(boxes, |bbox| mark_detector.detect(frame, *bbox)))
    }
}

/// Expand a face box by `shift` of its size on every side, make it square and
/// keep it inside the image. Returns `None` if nothing of it is left.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
pub fn expand_box(bbox: Rect, max_width: i32, max_height: i32, shift: f32) -> Option<Rect> {
    let x_shift = (bbox.width as f32 * shift).round() as i32;
    let y_shift = (bbox.height as f32 * shift).round() as i32;

    let side = (bbox.width + 2 * x_shift)
        .max(bbox.height + 2 * y_shift)
        .min(max_width)
        .min(max_height);
    if side <= 0 {
        return None;
    }

    let cx = bbox.x + bbox.width / 2;
    let cy = bbox.y + bbox.height / 2;
    let x = (cx - side / 2).clamp(0, max_width - side);
    let y = (cy - side / 2).clamp(0, max_height - side);

    Some(Rect::new(x, y, side, side))
}
