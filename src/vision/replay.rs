use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use super::capture::FrameSource;
use super::landmark::Landmark;
use crate::error::CaptureError;

/// Plays back recorded landmark frames in a loop.
///
/// The file holds one JSON array of `[x, y, z]` triples per line; `[]` is a
/// frame with no hand. Blank lines are skipped.
#[derive(Debug, Clone)]
pub struct LandmarkReplay {
    frames: Vec<Vec<Landmark>>,
    cursor: usize,
}

impl LandmarkReplay {
    pub fn open(path: &Path) -> Result<Self, CaptureError> {
        let file = File::open(path).map_err(|source| CaptureError::Open {
            path: path.to_path_buf(),
            source,
        })?;

        let mut frames = Vec::new();
        for (number, line) in BufReader::new(file).lines().enumerate() {
            let line = line.map_err(|source| CaptureError::Open {
                path: path.to_path_buf(),
                source,
            })?;
            if line.trim().is_empty() {
                continue;
            }

            let frame = serde_json::from_str(&line).map_err(|source| CaptureError::Malformed {
                line: number + 1,
                source,
            })?;
            frames.push(frame);
        }

        if frames.is_empty() {
            return Err(CaptureError::Empty(path.to_path_buf()));
        }

        tracing::info!(path = %path.display(), frames = frames.len(), "loaded landmark recording");
        Ok(Self::from_frames(frames))
    }

    pub fn from_frames(frames: Vec<Vec<Landmark>>) -> Self {
        Self { frames, cursor: 0 }
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

impl FrameSource for LandmarkReplay {
    type Frame = Vec<Landmark>;

    fn read_frame(&mut self) -> Option<Vec<Landmark>> {
        let frame = self.frames.get(self.cursor)?.clone();
        self.cursor = (self.cursor + 1) % self.frames.len();
        Some(frame)
    }
}
