use crate::{
    constants::NUM_FACIAL_LANDMARKS,
    landmarks::{LandmarkSet, Point2},
    Error, Result,
};
use ndarray::{Array4, CowArray};
use opencv::core::{Mat, Rect, Size, Vec3f, CV_32F};
use opencv::imgproc::{self, InterpolationFlags};
use opencv::prelude::*;
use ort::{Environment, Session, Value};
use std::path::Path;
use std::sync::Arc;

/// Default landmark detector input size
const DEFAULT_LANDMARK_INPUT_SIZE: i32 = 128;

/// 68-point facial landmark detector using `ONNX` Runtime
pub struct MarkDetector {
    session: Session,
    input_size: i32,
}

impl MarkDetector {
    /// Create a new landmark detector from an `ONNX` model file
    ///
    /// # Errors
    ///
    /// Returns an error if the model cannot be loaded or has no inputs/outputs
    pub fn new<P: AsRef<Path>>(model_path: P) -> Result<Self> {
        log::info!(
            "Initializing MarkDetector with model: {}",
            model_path.as_ref().display()
        );
        let environment = Arc::new(
            Environment::builder()
                .with_name("mark_detector")
                .with_log_level(ort::LoggingLevel::Warning)
                .build()?,
        );

        let session = ort::SessionBuilder::new(&environment)?
            .with_optimization_level(ort::GraphOptimizationLevel::Level3)?
            .with_model_from_file(model_path)?;

        if session.inputs.is_empty() {
            return Err(Error::ModelError("Landmark model has no inputs".to_string()));
        }
        if session.outputs.is_empty() {
            return Err(Error::ModelOutputError("Landmark model has no outputs".to_string()));
        }

        Ok(Self {
            session,
            input_size: DEFAULT_LANDMARK_INPUT_SIZE,
        })
    }

    /// Detect landmarks inside `face_box` of `frame`, returned in frame coordinates
    ///
    /// # Errors
    ///
    /// Returns an error if cropping, preprocessing or inference fails
    pub fn detect(&self, frame: &Mat, face_box: Rect) -> Result<LandmarkSet> {
        let face_roi = Mat::roi(frame, face_box)?.try_clone()?;
        let input = self.preprocess(&face_roi)?;
        let marks = self.forward(input)?;
        Ok(self.postprocess(&marks, face_box))
    }

    #[allow(clippy::cast_sign_loss)] // OpenCV dimensions are positive
    fn preprocess(&self, face: &Mat) -> Result<Array4<f32>> {
        let size = self.input_size as usize;
        let channels = 3;

        let mut resized = Mat::default();
        imgproc::resize(
            face,
            &mut resized,
            Size::new(self.input_size, self.input_size),
            0.0,
            0.0,
            InterpolationFlags::INTER_LINEAR as i32,
        )?;

        let mut rgb_image = Mat::default();
        imgproc::cvt_color(&resized, &mut rgb_image, imgproc::COLOR_BGR2RGB, 0)?;

        let mut float_image = Mat::default();
        rgb_image.convert_to(&mut float_image, CV_32F, 1.0 / 255.0, 0.0)?;

        let mut data = Vec::with_capacity(size * size * channels);
        for row in 0..self.input_size {
            for col in 0..self.input_size {
                let pixel = float_image.at_2d::<Vec3f>(row, col)?;
                data.extend_from_slice(&pixel.0);
            }
        }

        // NHWC, as the landmark model expects
        Array4::from_shape_vec((1, size, size, channels), data)
            .map_err(|e| Error::ModelError(format!("Failed to create input array: {e}")))
    }

    fn forward(&self, input: Array4<f32>) -> Result<Vec<f32>> {
        let cow_array = CowArray::from(input.into_dyn());
        let input_tensor = Value::from_array(self.session.allocator(), &cow_array)?;

        let outputs = self.session.run(vec![input_tensor])?;
        let marks_output = outputs
            .into_iter()
            .next()
            .ok_or_else(|| Error::ModelOutputError("No output from model".to_string()))?;

        let marks_tensor = marks_output.try_extract::<f32>()?;
        let marks_view = marks_tensor.view();
        let marks = marks_view
            .as_slice()
            .ok_or_else(|| Error::ModelOutputError("Failed to get output data".to_string()))?;

        Ok(marks.to_vec())
    }

    /// Scale model-space marks to the face box and offset into the frame
    #[allow(clippy::cast_precision_loss)]
    fn postprocess(&self, marks: &[f32], face_box: Rect) -> LandmarkSet {
        let scale_x = f64::from(face_box.width) / f64::from(self.input_size);
        let scale_y = f64::from(face_box.height) / f64::from(self.input_size);

        // A short output yields a short set, which the monitor rejects per face
        let points = marks
            .chunks_exact(2)
            .take(NUM_FACIAL_LANDMARKS)
            .map(|xy| {
                Point2::new(
                    f64::from(face_box.x) + f64::from(xy[0]) * scale_x,
                    f64::from(face_box.y) + f64::from(xy[1]) * scale_y,
                )
            })
            .collect();

        LandmarkSet::new(points)
    }
}
