use super::display::RenderMode;
use super::quantizer::nearest_palette_index;
use crate::shared::constants::{LOWER_HALF_BLOCK, SGR_RESET, UPPER_HALF_BLOCK};

/// One source pixel. RGB input is stored with `a = 255`.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct Pixel {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Pixel {
    /// Fully transparent black, used below the last row of an odd-height frame.
    pub const TRANSPARENT: Pixel = Pixel { r: 0, g: 0, b: 0, a: 0 };

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Read a pixel from a 3 or 4 byte slice.
    #[inline]
    pub fn from_slice(px: &[u8]) -> Self {
        match px {
            [r, g, b, a, ..] => Self::rgba(*r, *g, *b, *a),
            [r, g, b] => Self::rgb(*r, *g, *b),
            _ => Self::TRANSPARENT,
        }
    }

    #[inline]
    fn is_transparent(self) -> bool {
        self.a == 0
    }
}

/// What a cell looks like once transparency is taken into account.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum CellKind {
    BothTransparent,
    /// Only the upper pixel is drawn, with the upper-half glyph.
    LowerTransparent(Pixel),
    /// Only the lower pixel is drawn, with the lower-half glyph.
    UpperTransparent(Pixel),
    Opaque { lower: Pixel, upper: Pixel },
}

impl CellKind {
    pub fn classify(lower: Pixel, upper: Pixel, has_alpha: bool) -> Self {
        if !has_alpha {
            return CellKind::Opaque { lower, upper };
        }
        match (lower.is_transparent(), upper.is_transparent()) {
            (true, true) => CellKind::BothTransparent,
            (true, false) => CellKind::LowerTransparent(upper),
            (false, true) => CellKind::UpperTransparent(lower),
            (false, false) => CellKind::Opaque { lower, upper },
        }
    }
}

/// Append one terminal cell holding `upper` stacked on `lower`.
///
/// A missing `lower` pixel (the row past the end of an odd-height frame) is
/// transparent black. In the opaque case the lower pixel is the foreground
/// and the upper pixel the background of `▄`.
pub fn render_cell(
    buffer: &mut Vec<u8>,
    lower: Option<Pixel>,
    upper: Pixel,
    has_alpha: bool,
    mode: RenderMode,
) {
    let lower = lower.unwrap_or(Pixel::TRANSPARENT);

    match CellKind::classify(lower, upper, has_alpha) {
        CellKind::BothTransparent => {
            buffer.extend_from_slice(SGR_RESET);
            buffer.push(b' ');
        }
        CellKind::LowerTransparent(px) => {
            buffer.extend_from_slice(SGR_RESET);
            write_foreground(buffer, px, mode);
            buffer.extend_from_slice(UPPER_HALF_BLOCK.as_bytes());
        }
        CellKind::UpperTransparent(px) => {
            buffer.extend_from_slice(SGR_RESET);
            write_foreground(buffer, px, mode);
            buffer.extend_from_slice(LOWER_HALF_BLOCK.as_bytes());
        }
        CellKind::Opaque { lower, upper } => {
            // Indexed codes go first; terminals with 24-bit support let the
            // later true-color codes win.
            if mode.indexed() {
                write_indexed(buffer, b"\x1b[38;5;", nearest_palette_index(lower));
                write_indexed(buffer, b"\x1b[48;5;", nearest_palette_index(upper));
            }
            if mode.true_color() {
                write_true_color(buffer, b"\x1b[38;2;", lower);
                write_true_color(buffer, b"\x1b[48;2;", upper);
            }
            buffer.extend_from_slice(LOWER_HALF_BLOCK.as_bytes());
        }
    }
}

fn write_foreground(buffer: &mut Vec<u8>, px: Pixel, mode: RenderMode) {
    if mode.indexed() {
        write_indexed(buffer, b"\x1b[38;5;", nearest_palette_index(px));
    }
    if mode.true_color() {
        write_true_color(buffer, b"\x1b[38;2;", px);
    }
}

#[inline]
fn write_indexed(buffer: &mut Vec<u8>, prefix: &[u8], index: u8) {
    buffer.extend_from_slice(prefix);
    write_u8_fast(buffer, index);
    buffer.push(b'm');
}

#[inline]
fn write_true_color(buffer: &mut Vec<u8>, prefix: &[u8], px: Pixel) {
    buffer.extend_from_slice(prefix);
    write_u8_fast(buffer, px.r);
    buffer.push(b';');
    write_u8_fast(buffer, px.g);
    buffer.push(b';');
    write_u8_fast(buffer, px.b);
    buffer.push(b'm');
}

// Zero-allocation decimal writer
#[inline(always)]
pub(crate) fn write_u8_fast(buffer: &mut Vec<u8>, n: u8) {
    if n >= 100 {
        buffer.push(b'0' + n / 100);
        buffer.push(b'0' + (n / 10) % 10);
        buffer.push(b'0' + n % 10);
    } else if n >= 10 {
        buffer.push(b'0' + n / 10);
        buffer.push(b'0' + n % 10);
    } else {
        buffer.push(b'0' + n);
    }
}
