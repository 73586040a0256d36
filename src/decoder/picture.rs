use image::codecs::gif::GifDecoder;
use image::{AnimationDecoder, ImageDecoder, ImageFormat, ImageReader};
use std::io::Cursor;

use super::frame_data::FrameData;
use super::memory::MemorySource;
use super::scale::scale_frame;
use crate::error::{RenderError, RenderResult};
use crate::renderer::SizeRequest;
use crate::shared::constants::GIF_DEFAULT_DELAY_SECS;
use crate::sync::{FrameRateHints, Rational};

/// Decode an in-memory image. GIFs become animations, everything else a
/// single frame.
pub fn decode(path: &str, bytes: &[u8], request: &SizeRequest) -> RenderResult<MemorySource> {
    let reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| RenderError::source_open(path, e))?;

    match reader.format() {
        Some(ImageFormat::Gif) => decode_gif(path, bytes, request),
        Some(_) => decode_still(path, reader, request),
        None => Err(RenderError::source_open(path, "unrecognized image format")),
    }
}

fn decode_still(
    path: &str,
    reader: ImageReader<Cursor<&[u8]>>,
    request: &SizeRequest,
) -> RenderResult<MemorySource> {
    let img = reader
        .decode()
        .map_err(|e| RenderError::source_open(path, e))?;
    let (width, height) = (img.width(), img.height());

    let frame = if img.color().has_alpha() {
        FrameData::new(img.to_rgba8().into_raw(), width, height, 4)
    } else {
        FrameData::new(img.to_rgb8().into_raw(), width, height, 3)
    };

    let target = request.resolve(width, height);
    crate::utils::logger::debug(&format!(
        "{}: {}x{} -> {}x{}",
        path, width, height, target.width, target.height
    ));

    let frame = scale_frame(frame, target)?;
    Ok(MemorySource::new(vec![frame], FrameRateHints::default()))
}

fn decode_gif(path: &str, bytes: &[u8], request: &SizeRequest) -> RenderResult<MemorySource> {
    let decoder =
        GifDecoder::new(Cursor::new(bytes)).map_err(|e| RenderError::source_open(path, e))?;
    let (width, height) = decoder.dimensions();
    let target = request.resolve(width, height);

    let mut frames = Vec::new();
    let mut delays_ms = Vec::new();
    let mut failure = None;

    for frame in decoder.into_frames() {
        let frame = match frame {
            Ok(frame) => frame,
            Err(e) => {
                failure = Some(e.to_string());
                break;
            }
        };

        let (numer, denom) = frame.delay().numer_denom_ms();
        delays_ms.push(if denom > 0 { numer as f64 / denom as f64 } else { 0.0 });

        let canvas = frame.into_buffer();
        let (w, h) = canvas.dimensions();
        frames.push(scale_frame(FrameData::new(canvas.into_raw(), w, h, 4), target)?);
    }

    if frames.is_empty() {
        let reason = failure.unwrap_or_else(|| "no frames".to_string());
        return Err(RenderError::source_open(path, reason));
    }

    crate::utils::logger::debug(&format!(
        "{}: gif {}x{} -> {}x{}, {} frames",
        path,
        width,
        height,
        target.width,
        target.height,
        frames.len()
    ));

    let hints = gif_frame_rate(&delays_ms);
    let source = MemorySource::new(frames, hints);
    Ok(match failure {
        Some(reason) => source.with_trailing_error(reason),
        None => source,
    })
}

/// GIFs carry per-frame delays instead of a rate: the first delay stands in
/// for the real rate and the mean delay for the average rate.
fn gif_frame_rate(delays_ms: &[f64]) -> FrameRateHints {
    let rate = |ms: f64| (ms > 0.0).then(|| 1000.0 / ms);
    let total: f64 = delays_ms.iter().sum();
    let (num, den) = GIF_DEFAULT_DELAY_SECS;

    FrameRateHints {
        real: delays_ms.first().copied().and_then(rate),
        average: rate(total / delays_ms.len().max(1) as f64),
        time_base: Some(Rational::new(num, den)),
    }
}
