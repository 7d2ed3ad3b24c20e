//! Color definitions for tags and happiness markers

use std::collections::BTreeMap;

use crate::core::types::Tag;

/// RGBA color (0.0 to 1.0 per channel)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Composite this color over an opaque `base`
    pub fn over(&self, base: Color) -> Self {
        let a = self.a.clamp(0.0, 1.0);
        Self {
            r: self.r * a + base.r * (1.0 - a),
            g: self.g * a + base.g * (1.0 - a),
            b: self.b * a + base.b * (1.0 - a),
            a: 1.0,
        }
    }

    /// Opaque color from 8-bit channels
    pub fn from_rgb8([r, g, b]: [u8; 3]) -> Self {
        Self::new(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0, 1.0)
    }

    pub fn to_rgba8(&self) -> [u8; 4] {
        let channel = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        [channel(self.r), channel(self.g), channel(self.b), channel(self.a)]
    }
}

/// Vacant cell color (off-white)
pub const EMPTY: Color = Color::new(0.988, 1.0, 0.906, 1.0);

/// Marker drawn on satisfied occupants (translucent green)
pub const HAPPY_MARK: Color = Color::new(0.184, 0.827, 0.118, 0.667);

/// Marker drawn on unsatisfied occupants (translucent near-black)
pub const UNHAPPY_MARK: Color = Color::new(0.098, 0.114, 0.098, 0.784);

/// Get the base color for a tag
pub fn tag_color(tag: Tag) -> Color {
    match tag {
        Tag::Red => Color::new(0.922, 0.271, 0.373, 1.0),
        Tag::Blue => Color::new(0.169, 0.2, 0.404, 1.0),
        Tag::Green => Color::new(0.235, 0.549, 0.275, 1.0),
        Tag::Orange => Color::new(0.941, 0.588, 0.196, 1.0),
        Tag::Purple => Color::new(0.51, 0.314, 0.627, 1.0),
    }
}

/// Tag to color mapping handed to the renderer
#[derive(Debug, Clone, PartialEq)]
pub struct Palette {
    overrides: BTreeMap<Tag, Color>,
    pub empty: Color,
    pub happy_mark: Color,
    pub unhappy_mark: Color,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            overrides: BTreeMap::new(),
            empty: EMPTY,
            happy_mark: HAPPY_MARK,
            unhappy_mark: UNHAPPY_MARK,
        }
    }
}

impl Palette {
    /// Default palette with the configured per-tag overrides applied
    pub fn from_rgb8(overrides: &BTreeMap<Tag, [u8; 3]>) -> Self {
        overrides
            .iter()
            .fold(Self::default(), |palette, (&tag, &rgb)| {
                palette.with_color(tag, Color::from_rgb8(rgb))
            })
    }

    pub fn with_color(mut self, tag: Tag, color: Color) -> Self {
        self.overrides.insert(tag, color);
        self
    }

    pub fn color_for(&self, tag: Tag) -> Color {
        self.overrides.get(&tag).copied().unwrap_or_else(|| tag_color(tag))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_colors_unique() {
        let tags = [Tag::Red, Tag::Blue, Tag::Green, Tag::Orange, Tag::Purple];
        for (i, a) in tags.iter().enumerate() {
            for b in &tags[i + 1..] {
                assert_ne!(tag_color(*a).to_rgba8(), tag_color(*b).to_rgba8());
            }
        }
    }

    #[test]
    fn test_tag_colors_differ_from_empty() {
        assert_ne!(tag_color(Tag::Red).to_rgba8(), EMPTY.to_rgba8());
    }

    #[test]
    fn test_rgba8_conversion() {
        assert_eq!(Color::new(1.0, 0.0, 0.5, 1.0).to_rgba8(), [255, 0, 128, 255]);
        assert_eq!(Color::new(2.0, -1.0, 0.0, 0.0).to_rgba8(), [255, 0, 0, 0]);
    }

    #[test]
    fn test_over_opaque_replaces_base() {
        let top = Color::new(0.2, 0.4, 0.6, 1.0);
        assert_eq!(top.over(EMPTY), top);
    }

    #[test]
    fn test_over_transparent_keeps_base() {
        let top = Color::new(0.2, 0.4, 0.6, 0.0);
        assert_eq!(top.over(EMPTY).to_rgba8(), EMPTY.to_rgba8());
    }

    #[test]
    fn test_palette_override() {
        let custom = Color::new(0.0, 0.0, 0.0, 1.0);
        let palette = Palette::default().with_color(Tag::Red, custom);
        assert_eq!(palette.color_for(Tag::Red), custom);
        assert_eq!(palette.color_for(Tag::Blue), tag_color(Tag::Blue));
    }

    #[test]
    fn test_palette_from_configured_rgb() {
        let mut overrides = BTreeMap::new();
        overrides.insert(Tag::Blue, [10, 20, 30]);
        let palette = Palette::from_rgb8(&overrides);

        assert_eq!(palette.color_for(Tag::Blue).to_rgba8(), [10, 20, 30, 255]);
        assert_eq!(palette.color_for(Tag::Red), tag_color(Tag::Red));
        assert_eq!(palette.empty, EMPTY);
    }
}
