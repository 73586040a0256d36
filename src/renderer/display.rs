use serde::Serialize;
use std::io::Write;

use super::cell::{render_cell, Pixel};
use crate::decoder::{Frame, FrameSource};
use crate::error::RenderResult;
use crate::shared::constants::{CURSOR_HOME, SGR_RESET};

/// Which escape sequence family cells are colored with.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum RenderMode {
    /// 256-color palette codes
    #[default]
    Indexed,
    /// 24-bit RGB codes
    #[value(name = "24bit")]
    #[serde(rename = "24bit")]
    TrueColor,
    /// Palette codes followed by 24-bit codes
    Both,
}

impl RenderMode {
    pub fn indexed(self) -> bool {
        matches!(self, RenderMode::Indexed | RenderMode::Both)
    }

    pub fn true_color(self) -> bool {
        matches!(self, RenderMode::TrueColor | RenderMode::Both)
    }
}

/// Result of asking the renderer for the next frame of a source.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RenderOutcome {
    /// A frame was drawn and more may follow.
    Continue,
    /// The source ended after at least one frame.
    Done,
    /// The source produced nothing usable.
    Failed,
}

/// Draws frames as rows of half-block cells.
///
/// Every cell row covers two pixel rows. Frames after the first are drawn
/// over the previous one by homing the cursor instead of scrolling.
pub struct FrameRenderer<W: Write> {
    out: W,
    mode: RenderMode,
    /// 1-based terminal column each row starts at; 0 leaves the cursor alone.
    column_offset: u32,
    frames_rendered: u64,
    render_buffer: Vec<u8>,
}

impl<W: Write> FrameRenderer<W> {
    pub fn new(out: W, mode: RenderMode, column_offset: u32) -> Self {
        Self {
            out,
            mode,
            column_offset,
            frames_rendered: 0,
            render_buffer: Vec::with_capacity(64 * 1024),
        }
    }

    pub fn frames_rendered(&self) -> u64 {
        self.frames_rendered
    }

    /// Pull the next frame from `source` and draw it.
    ///
    /// Only output failures are returned as errors. Decode errors end the
    /// source, as `Done` when something was already drawn and `Failed`
    /// otherwise.
    pub fn render_next(&mut self, source: &mut dyn FrameSource) -> RenderResult<RenderOutcome> {
        let frame = match source.next_frame() {
            Ok(Some(frame)) => frame,
            Ok(None) => return Ok(self.end_of_stream()),
            Err(e) if e.is_fatal() => return Err(e),
            Err(e) => {
                crate::utils::logger::error(&format!(
                    "decode failed after {} frames: {}",
                    self.frames_rendered, e
                ));
                return Ok(self.end_of_stream());
            }
        };

        let is_first = self.frames_rendered == 0;
        self.render_frame(frame, is_first)?;
        Ok(RenderOutcome::Continue)
    }

    /// Draw one frame and flush it to the terminal.
    pub fn render_frame(&mut self, frame: Frame<'_>, is_first_frame: bool) -> RenderResult<()> {
        self.render_buffer.clear();
        let buffer = &mut self.render_buffer;

        if !is_first_frame {
            buffer.extend_from_slice(CURSOR_HOME);
        }

        let has_alpha = frame.has_alpha();
        for y in (0..frame.height).step_by(2) {
            if self.column_offset > 0 {
                write!(buffer, "\x1b[{}G", self.column_offset)?;
            }

            for x in 0..frame.width {
                let upper = frame.pixel(x, y).unwrap_or(Pixel::TRANSPARENT);
                let lower = frame.pixel(x, y + 1);
                render_cell(buffer, lower, upper, has_alpha, self.mode);
            }

            buffer.extend_from_slice(SGR_RESET);
            buffer.push(b'\n');
        }

        self.out.write_all(&self.render_buffer)?;
        self.out.flush()?;

        if frame.width > 0 {
            self.frames_rendered += 1;
        }
        Ok(())
    }

    fn end_of_stream(&self) -> RenderOutcome {
        if self.frames_rendered > 0 {
            RenderOutcome::Done
        } else {
            RenderOutcome::Failed
        }
    }
}

#[cfg(test)]
impl<W: Write> FrameRenderer<W> {
    pub(crate) fn writer(&self) -> &W {
        &self.out
    }
}
