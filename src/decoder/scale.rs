use fast_image_resize as fr;
use fr::images::Image;

use super::frame_data::FrameData;
use crate::error::{RenderError, RenderResult};
use crate::renderer::Geometry;

/// Resize `frame` to `target` with a bilinear filter (SIMD when available).
///
/// Frames already at the target size are returned untouched.
pub fn scale_frame(frame: FrameData, target: Geometry) -> RenderResult<FrameData> {
    if frame.width == target.width && frame.height == target.height {
        return Ok(frame);
    }

    let pixel_type = if frame.channels == 4 {
        fr::PixelType::U8x4
    } else {
        fr::PixelType::U8x3
    };

    let src_image = Image::from_vec_u8(frame.width, frame.height, frame.buffer, pixel_type)
        .map_err(RenderError::decode)?;
    let mut dst_image = Image::new(target.width, target.height, pixel_type);

    let options = fr::ResizeOptions::new()
        .resize_alg(fr::ResizeAlg::Convolution(fr::FilterType::Bilinear));
    let mut resizer = fr::Resizer::new();
    resizer
        .resize(&src_image, &mut dst_image, &options)
        .map_err(RenderError::decode)?;

    Ok(FrameData::new(
        dst_image.buffer().to_vec(),
        target.width,
        target.height,
        frame.channels,
    ))
}
