//! Fonts and label measurement.
//!
//! Real glyph metrics belong to the host renderer. The scene only needs a
//! label box for hit testing and bounds, so measurement goes through the
//! [`TextMetrics`] trait with a character-average default.

use serde::{Deserialize, Serialize};

use crate::geom::{Rect, Size};

pub const DEFAULT_FONT_FAMILY: &str = "Arial";
pub const DEFAULT_FONT_PIXEL_SIZE: f32 = 13.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Font {
    pub family: String,
    pub pixel_size: f32,
    /// CSS-style weight, 100..=900 with 400 as normal.
    pub weight: u16,
    pub italic: bool,
    pub small_caps: bool,
}

impl Default for Font {
    fn default() -> Self {
        Self {
            family: DEFAULT_FONT_FAMILY.to_string(),
            pixel_size: DEFAULT_FONT_PIXEL_SIZE,
            weight: 400,
            italic: false,
            small_caps: false,
        }
    }
}

impl Font {
    pub fn new(family: &str, pixel_size: f32) -> Self {
        Self {
            family: family.into(),
            pixel_size,
            ..Default::default()
        }
    }

    pub fn is_bold(&self) -> bool {
        self.weight >= 600
    }
}

pub trait TextMetrics {
    fn text_size(&self, text: &str, font: &Font) -> Size;

    /// Label box centered on the origin.
    fn label_rect(&self, text: &str, font: &Font) -> Rect {
        let size = self.text_size(text, font);
        crate::geom::rect(-size.width / 2.0, -size.height / 2.0, size.width, size.height)
    }
}

/// Estimates text size from the character count.
#[derive(Debug, Clone, Copy, Default)]
pub struct AverageCharMetrics;

impl TextMetrics for AverageCharMetrics {
    fn text_size(&self, text: &str, font: &Font) -> Size {
        let advance = if font.is_bold() { 0.66 } else { 0.6 };
        let chars = text.chars().count() as f32;
        Size::new(chars * advance * font.pixel_size, 1.25 * font.pixel_size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wider_text_gives_wider_box() {
        let m = AverageCharMetrics;
        let f = Font::default();
        let a = m.text_size("1", &f);
        let b = m.text_size("very long label", &f);
        assert!(b.width > a.width);
        assert_eq!(a.height, b.height);
    }

    #[test]
    fn test_label_rect_is_centered() {
        let r = AverageCharMetrics.label_rect("abcd", &Font::new("Times", 10.0));
        assert_eq!(r.origin.x, -r.size.width / 2.0);
        assert_eq!(r.origin.y, -r.size.height / 2.0);
    }

    #[test]
    fn test_bigger_font_gives_bigger_box() {
        let m = AverageCharMetrics;
        let small = m.text_size("label", &Font::new("Times", 4.0));
        let big = m.text_size("label", &Font::new("Times", 32.0));
        assert!(big.width > small.width);
    }

    #[test]
    fn test_empty_text_has_zero_width() {
        assert_eq!(AverageCharMetrics.text_size("", &Font::default()).width, 0.0);
    }
}
