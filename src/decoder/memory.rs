use super::frame_data::{Frame, FrameData};
use super::{FrameSource, SourceInfo};
use crate::error::{RenderError, RenderResult};
use crate::sync::FrameRateHints;

/// A source whose frames are all decoded up front.
///
/// Used for still images and GIF animations. A decode failure part way
/// through an animation keeps the frames that did decode and reports the
/// failure once they are exhausted.
pub struct MemorySource {
    info: SourceInfo,
    frames: Vec<FrameData>,
    next: usize,
    trailing_error: Option<String>,
}

impl MemorySource {
    pub fn new(frames: Vec<FrameData>, frame_rate: FrameRateHints) -> Self {
        let (width, height, has_alpha) = frames
            .first()
            .map(|f| (f.width, f.height, f.channels == 4))
            .unwrap_or((0, 0, false));

        Self {
            info: SourceInfo {
                width,
                height,
                has_alpha,
                frame_rate,
                frame_count: Some(frames.len()),
            },
            frames,
            next: 0,
            trailing_error: None,
        }
    }

    /// Report `reason` as a decode error after the last frame.
    pub fn with_trailing_error(mut self, reason: impl Into<String>) -> Self {
        self.trailing_error = Some(reason.into());
        self
    }
}

impl FrameSource for MemorySource {
    fn info(&self) -> &SourceInfo {
        &self.info
    }

    fn next_frame(&mut self) -> RenderResult<Option<Frame<'_>>> {
        if let Some(frame) = self.frames.get(self.next) {
            self.next += 1;
            return Ok(Some(frame.as_frame()));
        }
        match self.trailing_error.take() {
            Some(reason) => Err(RenderError::decode(reason)),
            None => Ok(None),
        }
    }
}
