//! Placeholder texture synthesis and the registry of substitutions.
//!
//! A placeholder is a solid-color square with the failing asset's name
//! stamped across the middle: a broken load shows up in the scene as a
//! labeled gray panel.

use std::collections::HashMap;

use atelier_core::{Color, ColorSpace};
use image::{Rgba, RgbaImage};

use crate::texture::{ImageData, PixelFormat, TextureHandle};

/// Edge length of generated placeholders. A multiple of 4, so the
/// placeholder itself passes block-alignment validation.
pub const FALLBACK_EDGE: u32 = 512;

/// Registry of placeholder textures keyed by the asset name they replaced.
///
/// An entry is created the first time a name fails; regenerating for the
/// same name overwrites it. Entries survive diagnostic clears and are only
/// removed by a full reset.
#[derive(Default)]
pub struct FallbackRegistry {
    entries: HashMap<String, TextureHandle>,
}

impl FallbackRegistry {
    pub fn insert(&mut self, name: impl Into<String>, handle: TextureHandle) {
        self.entries.insert(name.into(), handle);
    }

    /// The stored placeholder for `name`. Repeated lookups return the same
    /// instance until it is explicitly regenerated.
    pub fn get(&self, name: &str) -> Option<&TextureHandle> {
        self.entries.get(name)
    }

    /// Names of every asset a placeholder was generated for, sorted for
    /// deterministic reports.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.entries.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

/// Synthesize a solid-color placeholder with `name` stamped across the
/// middle, tagged for display color space and ready for upload.
pub fn generate_placeholder(name: &str, color: Color) -> TextureHandle {
    let [r, g, b, a] = color.to_rgba8();
    let mut canvas = RgbaImage::from_pixel(FALLBACK_EDGE, FALLBACK_EDGE, Rgba([r, g, b, a]));
    stamp_label(&mut canvas, &format!("FALLBACK: {name}"));

    let mut handle = TextureHandle::from_image(
        ImageData {
            width: FALLBACK_EDGE,
            height: FALLBACK_EDGE,
            pixels: canvas.into_raw(),
        },
        PixelFormat::Rgba8,
    );
    handle.color_space = ColorSpace::Display;
    handle.needs_upload = true;
    handle
}

const GLYPH_SCALE: u32 = 3;
const GLYPH_ADVANCE: u32 = 6 * GLYPH_SCALE;

/// Stamp `text` centered on the canvas with the embedded 5x7 glyph set.
/// Characters outside the set render as '?'.
fn stamp_label(canvas: &mut RgbaImage, text: &str) {
    let max_chars = ((FALLBACK_EDGE - 2 * GLYPH_ADVANCE) / GLYPH_ADVANCE) as usize;
    let label: String = text.to_ascii_uppercase().chars().take(max_chars).collect();
    let label_width = label.chars().count() as u32 * GLYPH_ADVANCE;

    let x0 = (FALLBACK_EDGE - label_width.min(FALLBACK_EDGE)) / 2;
    let y0 = FALLBACK_EDGE / 2 - (7 * GLYPH_SCALE) / 2;
    let ink = Rgba([255, 255, 255, 255]);

    for (index, ch) in label.chars().enumerate() {
        let glyph = glyph_rows(ch);
        let gx = x0 + index as u32 * GLYPH_ADVANCE;
        for (row, bits) in glyph.iter().enumerate() {
            for col in 0..5u32 {
                if bits & (0x10 >> col) == 0 {
                    continue;
                }
                for dy in 0..GLYPH_SCALE {
                    for dx in 0..GLYPH_SCALE {
                        let x = gx + col * GLYPH_SCALE + dx;
                        let y = y0 + row as u32 * GLYPH_SCALE + dy;
                        if x < FALLBACK_EDGE && y < FALLBACK_EDGE {
                            canvas.put_pixel(x, y, ink);
                        }
                    }
                }
            }
        }
    }
}

/// 5x7 bitmap rows for one character, low 5 bits per row.
fn glyph_rows(ch: char) -> [u8; 7] {
    match ch {
        'A' => [0x0E, 0x11, 0x11, 0x1F, 0x11, 0x11, 0x11],
        'B' => [0x1E, 0x11, 0x11, 0x1E, 0x11, 0x11, 0x1E],
        'C' => [0x0E, 0x11, 0x10, 0x10, 0x10, 0x11, 0x0E],
        'D' => [0x1E, 0x11, 0x11, 0x11, 0x11, 0x11, 0x1E],
        'E' => [0x1F, 0x10, 0x10, 0x1E, 0x10, 0x10, 0x1F],
        'F' => [0x1F, 0x10, 0x10, 0x1E, 0x10, 0x10, 0x10],
        'G' => [0x0E, 0x11, 0x10, 0x17, 0x11, 0x11, 0x0F],
        'H' => [0x11, 0x11, 0x11, 0x1F, 0x11, 0x11, 0x11],
        'I' => [0x0E, 0x04, 0x04, 0x04, 0x04, 0x04, 0x0E],
        'J' => [0x07, 0x02, 0x02, 0x02, 0x02, 0x12, 0x0C],
        'K' => [0x11, 0x12, 0x14, 0x18, 0x14, 0x12, 0x11],
        'L' => [0x10, 0x10, 0x10, 0x10, 0x10, 0x10, 0x1F],
        'M' => [0x11, 0x1B, 0x15, 0x15, 0x11, 0x11, 0x11],
        'N' => [0x11, 0x19, 0x15, 0x13, 0x11, 0x11, 0x11],
        'O' => [0x0E, 0x11, 0x11, 0x11, 0x11, 0x11, 0x0E],
        'P' => [0x1E, 0x11, 0x11, 0x1E, 0x10, 0x10, 0x10],
        'Q' => [0x0E, 0x11, 0x11, 0x11, 0x15, 0x12, 0x0D],
        'R' => [0x1E, 0x11, 0x11, 0x1E, 0x14, 0x12, 0x11],
        'S' => [0x0F, 0x10, 0x10, 0x0E, 0x01, 0x01, 0x1E],
        'T' => [0x1F, 0x04, 0x04, 0x04, 0x04, 0x04, 0x04],
        'U' => [0x11, 0x11, 0x11, 0x11, 0x11, 0x11, 0x0E],
        'V' => [0x11, 0x11, 0x11, 0x11, 0x11, 0x0A, 0x04],
        'W' => [0x11, 0x11, 0x11, 0x15, 0x15, 0x15, 0x0A],
        'X' => [0x11, 0x11, 0x0A, 0x04, 0x0A, 0x11, 0x11],
        'Y' => [0x11, 0x11, 0x0A, 0x04, 0x04, 0x04, 0x04],
        'Z' => [0x1F, 0x01, 0x02, 0x04, 0x08, 0x10, 0x1F],
        '0' => [0x0E, 0x11, 0x13, 0x15, 0x19, 0x11, 0x0E],
        '1' => [0x04, 0x0C, 0x04, 0x04, 0x04, 0x04, 0x0E],
        '2' => [0x0E, 0x11, 0x01, 0x02, 0x04, 0x08, 0x1F],
        '3' => [0x1F, 0x02, 0x04, 0x02, 0x01, 0x11, 0x0E],
        '4' => [0x02, 0x06, 0x0A, 0x12, 0x1F, 0x02, 0x02],
        '5' => [0x1F, 0x10, 0x1E, 0x01, 0x01, 0x11, 0x0E],
        '6' => [0x06, 0x08, 0x10, 0x1E, 0x11, 0x11, 0x0E],
        '7' => [0x1F, 0x01, 0x02, 0x04, 0x08, 0x08, 0x08],
        '8' => [0x0E, 0x11, 0x11, 0x0E, 0x11, 0x11, 0x0E],
        '9' => [0x0E, 0x11, 0x11, 0x0F, 0x01, 0x02, 0x0C],
        '-' => [0x00, 0x00, 0x00, 0x1F, 0x00, 0x00, 0x00],
        '_' => [0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x1F],
        ':' => [0x00, 0x04, 0x00, 0x00, 0x00, 0x04, 0x00],
        '.' => [0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x04],
        ' ' => [0x00; 7],
        _ => [0x0E, 0x11, 0x01, 0x02, 0x04, 0x00, 0x04],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placeholder_is_block_aligned() {
        let handle = generate_placeholder("starduster", Color::from_hex(0x808080));
        assert_eq!(handle.dimensions(), Some((FALLBACK_EDGE, FALLBACK_EDGE)));
        assert_eq!(FALLBACK_EDGE % 4, 0);
        assert_eq!(handle.color_space, ColorSpace::Display);
        assert!(handle.needs_upload);
    }

    #[test]
    fn label_is_stamped_over_the_fill() {
        let handle = generate_placeholder("starduster", Color::from_hex(0x808080));
        let pixels = &handle.image.as_ref().unwrap().pixels;

        // Corner pixel keeps the fill; somewhere in the middle band the
        // label ink must differ from it.
        assert_eq!(&pixels[0..4], &[128, 128, 128, 255]);
        let row_band = (FALLBACK_EDGE / 2) as usize * FALLBACK_EDGE as usize * 4;
        let band = &pixels[row_band..row_band + FALLBACK_EDGE as usize * 4];
        assert!(band.chunks(4).any(|px| px == [255, 255, 255, 255]));
    }

    #[test]
    fn registry_returns_the_stored_instance() {
        let mut registry = FallbackRegistry::default();
        registry.insert("wall", generate_placeholder("wall", Color::GRAY));

        let first = registry.get("wall").unwrap() as *const TextureHandle;
        let second = registry.get("wall").unwrap() as *const TextureHandle;
        assert_eq!(first, second);
    }

    #[test]
    fn names_are_sorted() {
        let mut registry = FallbackRegistry::default();
        registry.insert("zebra", generate_placeholder("zebra", Color::GRAY));
        registry.insert("apple", generate_placeholder("apple", Color::GRAY));
        assert_eq!(registry.names(), ["apple", "zebra"]);
    }
}
