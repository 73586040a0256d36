use super::cell::Pixel;
use super::palette::{self, SEARCHABLE_COLORS};

/// Find the palette index closest to `pixel` in RGB space.
///
/// Squared Euclidean distance over the searchable entries; the comparison is
/// strictly-less, so ties go to the lowest index.
pub fn nearest_palette_index(pixel: Pixel) -> u8 {
    let mut best = 0usize;
    let mut best_distance = u32::MAX;

    for index in 0..SEARCHABLE_COLORS {
        let d = distance(pixel, index);
        if d < best_distance {
            best_distance = d;
            best = index;
        }
    }

    best as u8
}

#[inline]
fn distance(pixel: Pixel, index: usize) -> u32 {
    let (r, g, b) = palette::channels(index);
    let dr = r as i32 - pixel.r as i32;
    let dg = g as i32 - pixel.g as i32;
    let db = b as i32 - pixel.b as i32;
    (dr * dr + dg * dg + db * db) as u32
}
