//! Landmark replay files.
//!
//! A replay is JSON lines: one line per frame, each line an array of faces and
//! each face an array of `[x, y]` points in the 68-point layout. A blank line
//! is a frame with no faces. Recorded sessions can be fed through the monitor
//! without a camera or models.

use crate::{
    landmarks::LandmarkSet,
    source::{FrameSource, LandmarkProvider},
    Error, Result,
};
use std::fs::File;
use std::io::{BufRead, BufReader, Lines};
use std::path::{Path, PathBuf};

/// One replayed frame
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReplayFrame {
    /// 1-based line number in the replay file
    pub line: usize,
    /// Faces recorded for this frame
    pub faces: Vec<LandmarkSet>,
}

/// Parse one replay line
///
/// # Errors
///
/// Returns `Replay` if the line is not an array of point arrays
pub fn parse_frame(line_no: usize, line: &str) -> Result<ReplayFrame> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Ok(ReplayFrame {
            line: line_no,
            faces: Vec::new(),
        });
    }

    let faces: Vec<LandmarkSet> = serde_json::from_str(trimmed).map_err(|e| Error::Replay {
        line: line_no,
        message: e.to_string(),
    })?;
    Ok(ReplayFrame { line: line_no, faces })
}

/// Serialize one frame's faces as a replay line
///
/// # Errors
///
/// Returns `Replay` if serialization fails
pub fn format_frame(faces: &[LandmarkSet]) -> Result<String> {
    serde_json::to_string(faces).map_err(|e| Error::Replay {
        line: 0,
        message: e.to_string(),
    })
}

/// Frame source reading a replay file line by line
pub struct ReplaySource<R: BufRead> {
    path: PathBuf,
    lines: Lines<R>,
    line_no: usize,
}

impl ReplaySource<BufReader<File>> {
    /// Open a replay file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        log::info!("Opening landmark replay: {}", path.display());
        let file = File::open(path)?;
        Ok(Self::from_reader(BufReader::new(file), path))
    }
}

impl<R: BufRead> ReplaySource<R> {
    /// Replay from any buffered reader; `path` is only used in logs
    pub fn from_reader<P: AsRef<Path>>(reader: R, path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            lines: reader.lines(),
            line_no: 0,
        }
    }
}

impl<R: BufRead> FrameSource for ReplaySource<R> {
    type Frame = ReplayFrame;

    fn next_frame(&mut self) -> Result<Option<ReplayFrame>> {
        match self.lines.next() {
            None => Ok(None),
            Some(line) => {
                self.line_no += 1;
                let line = line?;
                parse_frame(self.line_no, &line).map(Some)
            }
        }
    }

    fn describe(&self) -> String {
        format!("replay {}", self.path.display())
    }
}

/// Provider returning the faces stored in each replayed frame
#[derive(Debug, Clone, Copy, Default)]
pub struct ReplayLandmarks;

impl LandmarkProvider<ReplayFrame> for ReplayLandmarks {
    fn detect_faces(&mut self, frame: &ReplayFrame) -> Result<Vec<LandmarkSet>> {
        Ok(frame.faces.clone())
    }
}
