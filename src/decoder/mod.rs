pub mod frame_data;
pub mod memory;
pub mod picture;
pub mod scale;
#[cfg(feature = "video")]
pub mod video;

use std::path::Path;

pub use frame_data::Frame;

use crate::error::{RenderError, RenderResult};
use crate::renderer::SizeRequest;
use crate::shared::constants::{STDIN_PATH, VIDEO_EXTENSIONS};
use crate::sync::FrameRateHints;
use crate::utils::file_utils;

/// What a source reports about itself once opened.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SourceInfo {
    /// Size of the frames handed out, after scaling.
    pub width: u32,
    pub height: u32,
    pub has_alpha: bool,
    pub frame_rate: FrameRateHints,
    /// Known number of frames, if the source can tell.
    pub frame_count: Option<usize>,
}

/// A decoded stream of fixed-size frames.
pub trait FrameSource {
    fn info(&self) -> &SourceInfo;

    /// The next frame, `None` once the stream is exhausted.
    ///
    /// The frame borrows the source's buffer and must be dropped before the
    /// next call.
    fn next_frame(&mut self) -> RenderResult<Option<Frame<'_>>>;
}

/// Open `path` (or stdin for `-`) and size it for the terminal.
pub fn open_source(path: &str, request: &SizeRequest) -> RenderResult<Box<dyn FrameSource>> {
    if is_video_path(path) {
        return open_video(path, request);
    }

    let bytes = if path == STDIN_PATH {
        file_utils::read_stdin()
    } else {
        file_utils::read_file(Path::new(path))
    }
    .map_err(|e| RenderError::source_open(path, format!("{:#}", e)))?;

    let source = picture::decode(path, &bytes, request)?;
    Ok(Box::new(source))
}

fn is_video_path(path: &str) -> bool {
    Path::new(path)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            let ext = ext.to_ascii_lowercase();
            VIDEO_EXTENSIONS.iter().any(|v| *v == ext)
        })
        .unwrap_or(false)
}

#[cfg(feature = "video")]
fn open_video(path: &str, request: &SizeRequest) -> RenderResult<Box<dyn FrameSource>> {
    Ok(Box::new(video::VideoSource::open(path, request)?))
}

#[cfg(not(feature = "video"))]
fn open_video(path: &str, _request: &SizeRequest) -> RenderResult<Box<dyn FrameSource>> {
    Err(RenderError::source_open(
        path,
        "video playback needs the `video` feature",
    ))
}
