use crate::{config::VideoConfig, source::FrameSource, Error, Result};
use log::info;
use std::io;
use opencv::{
    core::{Mat, Size},
    imgproc,
    prelude::*,
    videoio::{self, VideoCapture, CAP_PROP_BUFFERSIZE},
};

/// Video source type
#[derive(Debug, Clone)]
pub enum VideoSource {
    /// Webcam index
    Camera(i32),
    /// Video file path
    File(String),
}

/// Frames from a webcam or video file, resized to the processing size
pub struct CameraSource {
    source: VideoSource,
    capture: VideoCapture,
    frame_size: Size,
}

impl CameraSource {
    /// Open a camera or video file
    ///
    /// # Errors
    ///
    /// Returns an error if the device or file cannot be opened
    pub fn open(source: VideoSource, video: &VideoConfig) -> Result<Self> {
        let capture = match &source {
            VideoSource::Camera(index) => {
                info!("Opening camera {}", index);
                let mut cap = VideoCapture::new(*index, videoio::CAP_ANY)?;

                // Reduce buffer size for lower latency (webcam only)
                cap.set(CAP_PROP_BUFFERSIZE, 1.0)?;
                cap
            }
            VideoSource::File(path) => {
                info!("Opening video file: {}", path);
                VideoCapture::from_file(path, videoio::CAP_ANY)?
            }
        };

        if !capture.is_opened()? {
            return Err(Error::Io(io::Error::new(
                io::ErrorKind::NotFound,
                format!("Could not open video source {source:?}"),
            )));
        }

        Ok(Self {
            source,
            capture,
            frame_size: Size::new(video.frame_width, video.frame_height),
        })
    }
}

impl FrameSource for CameraSource {
    type Frame = Mat;

    fn next_frame(&mut self) -> Result<Option<Mat>> {
        let mut frame = Mat::default();
        if !self.capture.read(&mut frame)? || frame.empty() {
            return match self.source {
                VideoSource::File(_) => Ok(None),
                VideoSource::Camera(index) => Err(Error::Io(io::Error::other(format!(
                    "Camera {index} returned no frame"
                )))),
            };
        }

        let mut resized = Mat::default();
        imgproc::resize(&frame, &mut resized, self.frame_size, 0.0, 0.0, imgproc::INTER_LINEAR)?;
        Ok(Some(resized))
    }

    fn describe(&self) -> String {
        match &self.source {
            VideoSource::Camera(index) => format!("camera {index}"),
            VideoSource::File(path) => format!("video file {path}"),
        }
    }
}
