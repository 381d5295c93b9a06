//! Text run types produced by the layout tokenizer.

use serde::{Deserialize, Serialize};

/// Font weight/style of a text run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FontStyle {
    /// Regular weight, upright
    #[default]
    Regular,
    /// Bold weight
    Bold,
    /// Italic or oblique
    Italic,
    /// Bold and italic
    BoldItalic,
}

impl FontStyle {
    /// Derive the style from a PostScript font name such as
    /// "Helvetica-BoldOblique" or "TimesNewRoman,Italic".
    pub fn from_font_name(name: &str) -> Self {
        let lower = name.to_lowercase();
        let bold =
            lower.contains("bold") || lower.contains("black") || lower.contains("heavy");
        let italic = lower.contains("italic") || lower.contains("oblique");
        match (bold, italic) {
            (true, true) => FontStyle::BoldItalic,
            (true, false) => FontStyle::Bold,
            (false, true) => FontStyle::Italic,
            (false, false) => FontStyle::Regular,
        }
    }

    /// Whether this style carries bold weight.
    pub fn is_bold(self) -> bool {
        matches!(self, FontStyle::Bold | FontStyle::BoldItalic)
    }
}

/// Axis-aligned bounding box in page coordinates (PDF user space, y up).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BoundingBox {
    /// Left edge
    pub x0: f32,
    /// Bottom edge
    pub y0: f32,
    /// Right edge
    pub x1: f32,
    /// Top edge
    pub y1: f32,
}

impl BoundingBox {
    /// Create a bounding box from its four edges.
    pub fn new(x0: f32, y0: f32, x1: f32, y1: f32) -> Self {
        Self { x0, y0, x1, y1 }
    }

    /// Vertical center of the box.
    pub fn y_center(&self) -> f32 {
        (self.y0 + self.y1) / 2.0
    }

    /// Height of the box.
    pub fn height(&self) -> f32 {
        self.y1 - self.y0
    }

    /// Width of the box.
    pub fn width(&self) -> f32 {
        self.x1 - self.x0
    }

    /// Smallest box covering both `self` and `other`.
    pub fn union(&self, other: &BoundingBox) -> BoundingBox {
        BoundingBox {
            x0: self.x0.min(other.x0),
            y0: self.y0.min(other.y0),
            x1: self.x1.max(other.x1),
            y1: self.y1.max(other.y1),
        }
    }
}

/// A single glyph run extracted from a page, with geometry and font
/// attributes. Immutable once produced by the tokenizer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextRun {
    /// Decoded text content
    pub text: String,
    /// 1-indexed page number
    pub page: u32,
    /// Effective font size in points
    pub font_size: f32,
    /// Font weight/style
    pub style: FontStyle,
    /// Bounding geometry in page coordinates
    pub bbox: BoundingBox,
}

impl TextRun {
    /// Create a new text run.
    pub fn new(
        text: impl Into<String>,
        page: u32,
        font_size: f32,
        style: FontStyle,
        bbox: BoundingBox,
    ) -> Self {
        Self {
            text: text.into(),
            page,
            font_size,
            style,
            bbox,
        }
    }

    /// Number of characters in the run.
    pub fn char_count(&self) -> usize {
        self.text.chars().count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_style_from_font_name() {
        assert_eq!(
            FontStyle::from_font_name("Helvetica-Bold"),
            FontStyle::Bold
        );
        assert_eq!(
            FontStyle::from_font_name("Times-BoldItalic"),
            FontStyle::BoldItalic
        );
        assert_eq!(
            FontStyle::from_font_name("Helvetica-Oblique"),
            FontStyle::Italic
        );
        assert_eq!(FontStyle::from_font_name("Arial-Black"), FontStyle::Bold);
        assert_eq!(FontStyle::from_font_name("Courier"), FontStyle::Regular);
    }

    #[test]
    fn test_is_bold() {
        assert!(FontStyle::Bold.is_bold());
        assert!(FontStyle::BoldItalic.is_bold());
        assert!(!FontStyle::Italic.is_bold());
        assert!(!FontStyle::Regular.is_bold());
    }

    #[test]
    fn test_bbox_geometry() {
        let a = BoundingBox::new(10.0, 700.0, 100.0, 712.0);
        assert_eq!(a.y_center(), 706.0);
        assert_eq!(a.height(), 12.0);
        assert_eq!(a.width(), 90.0);

        let b = BoundingBox::new(50.0, 690.0, 150.0, 705.0);
        let u = a.union(&b);
        assert_eq!(u, BoundingBox::new(10.0, 690.0, 150.0, 712.0));
    }
}
