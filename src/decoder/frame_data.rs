use crate::renderer::cell::Pixel;

/// A borrowed, row-major frame of RGB (3 channel) or RGBA (4 channel) pixels.
///
/// The buffer belongs to the source; a `Frame` only lives for one render call.
#[derive(Clone, Copy, Debug)]
pub struct Frame<'a> {
    pub buffer: &'a [u8],
    pub width: u32,
    pub height: u32,
    pub channels: usize,
}

impl<'a> Frame<'a> {
    pub fn new(buffer: &'a [u8], width: u32, height: u32, channels: usize) -> Self {
        debug_assert!(channels == 3 || channels == 4);
        Self { buffer, width, height, channels }
    }

    pub fn has_alpha(&self) -> bool {
        self.channels == 4
    }

    /// Pixel at `(x, y)`, or `None` past the end of the buffer.
    #[inline]
    pub fn pixel(&self, x: u32, y: u32) -> Option<Pixel> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let offset = (y as usize * self.width as usize + x as usize) * self.channels;
        self.buffer
            .get(offset..offset + self.channels)
            .map(Pixel::from_slice)
    }
}

/// Decoded pixels owned by a source, handed out as [`Frame`]s.
#[derive(Clone, Debug)]
pub struct FrameData {
    pub buffer: Vec<u8>,
    pub width: u32,
    pub height: u32,
    pub channels: usize,
}

impl FrameData {
    pub fn new(buffer: Vec<u8>, width: u32, height: u32, channels: usize) -> Self {
        Self { buffer, width, height, channels }
    }

    pub fn as_frame(&self) -> Frame<'_> {
        Frame::new(&self.buffer, self.width, self.height, self.channels)
    }
}
