use opencv::{core, imgproc, prelude::*, videoio};

use super::frame_data::{Frame, FrameData};
use super::scale::scale_frame;
use super::{FrameSource, SourceInfo};
use crate::error::{RenderError, RenderResult};
use crate::renderer::{Geometry, SizeRequest};
use crate::sync::FrameRateHints;

/// Streams frames from a video file through OpenCV.
///
/// Frames are decoded one at a time; the RGB buffer is reused between calls.
pub struct VideoSource {
    capture: videoio::VideoCapture,
    info: SourceInfo,
    target: Geometry,
    current: Option<FrameData>,
}

impl VideoSource {
    pub fn open(path: &str, request: &SizeRequest) -> RenderResult<Self> {
        let open_err = |e: opencv::Error| RenderError::source_open(path, e);

        // CAP_ANY lets OpenCV pick the backend
        let mut capture =
            videoio::VideoCapture::from_file(path, videoio::CAP_ANY).map_err(open_err)?;
        let _ = capture.set(
            videoio::CAP_PROP_HW_ACCELERATION,
            videoio::VIDEO_ACCELERATION_ANY as f64,
        );

        if !capture.is_opened().map_err(open_err)? {
            return Err(RenderError::source_open(path, "failed to open video file"));
        }

        let fps = capture.get(videoio::CAP_PROP_FPS).map_err(open_err)?;
        let width = capture.get(videoio::CAP_PROP_FRAME_WIDTH).map_err(open_err)? as u32;
        let height = capture.get(videoio::CAP_PROP_FRAME_HEIGHT).map_err(open_err)? as u32;
        let target = request.resolve(width, height);

        crate::utils::logger::info(&format!(
            "{}: video {}x{} -> {}x{}, reported fps {}",
            path, width, height, target.width, target.height, fps
        ));

        Ok(Self {
            capture,
            info: SourceInfo {
                width: target.width,
                height: target.height,
                has_alpha: false,
                frame_rate: FrameRateHints {
                    real: Some(fps),
                    ..FrameRateHints::default()
                },
                frame_count: None,
            },
            target,
            current: None,
        })
    }

    fn read_rgb(&mut self) -> opencv::Result<Option<FrameData>> {
        let mut frame = Mat::default();
        if !self.capture.read(&mut frame)? || frame.empty() {
            return Ok(None);
        }

        let mut rgb = Mat::default();
        #[cfg(target_os = "macos")]
        imgproc::cvt_color(
            &frame,
            &mut rgb,
            imgproc::COLOR_BGR2RGB,
            0,
            core::AlgorithmHint::ALGO_HINT_DEFAULT,
        )?;
        #[cfg(not(target_os = "macos"))]
        imgproc::cvt_color(&frame, &mut rgb, imgproc::COLOR_BGR2RGB, 0)?;

        if !rgb.is_continuous() {
            return Err(opencv::Error::new(
                core::StsError,
                "frame is not continuous".to_string(),
            ));
        }

        Ok(Some(FrameData::new(
            rgb.data_bytes()?.to_vec(),
            rgb.cols() as u32,
            rgb.rows() as u32,
            3,
        )))
    }
}

impl FrameSource for VideoSource {
    fn info(&self) -> &SourceInfo {
        &self.info
    }

    fn next_frame(&mut self) -> RenderResult<Option<Frame<'_>>> {
        let decoded = self.read_rgb().map_err(RenderError::decode)?;
        self.current = match decoded {
            Some(frame) => Some(scale_frame(frame, self.target)?),
            None => None,
        };
        Ok(self.current.as_ref().map(FrameData::as_frame))
    }
}
