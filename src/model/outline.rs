//! Outline records, the externally visible unit of extraction.

use std::fmt;

use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize, Serializer};

use crate::error::Result;

/// A heading level expressed as ordinal depth: H1 is the most prominent.
///
/// Levels are assigned by relative style prominence within a document,
/// never by absolute font-size thresholds. The depth is unbounded but
/// documents rarely exceed H6. Serialized as `"H1"`, `"H2"`, ...
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct HeadingLevel(u8);

impl HeadingLevel {
    /// Most prominent level.
    pub const H1: HeadingLevel = HeadingLevel(1);
    /// Second level.
    pub const H2: HeadingLevel = HeadingLevel(2);
    /// Third level.
    pub const H3: HeadingLevel = HeadingLevel(3);

    /// Create a level from its 1-based depth. Depth 0 is clamped to 1.
    pub fn new(depth: u8) -> Self {
        HeadingLevel(depth.max(1))
    }

    /// The 1-based depth of this level.
    pub fn depth(self) -> u8 {
        self.0
    }
}

impl fmt::Display for HeadingLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "H{}", self.0)
    }
}

impl Serialize for HeadingLevel {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for HeadingLevel {
    fn deserialize<D: Deserializer<'de>>(
        deserializer: D,
    ) -> std::result::Result<Self, D::Error> {
        struct LevelVisitor;

        impl Visitor<'_> for LevelVisitor {
            type Value = HeadingLevel;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a heading level such as \"H1\"")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> std::result::Result<HeadingLevel, E> {
                let depth = v
                    .strip_prefix('H')
                    .and_then(|d| d.parse::<u8>().ok())
                    .filter(|d| *d >= 1)
                    .ok_or_else(|| E::custom(format!("invalid heading level: {v:?}")))?;
                Ok(HeadingLevel(depth))
            }
        }

        deserializer.deserialize_str(LevelVisitor)
    }
}

/// One heading in the extracted outline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutlineRecord {
    /// Assigned hierarchy level
    pub level: HeadingLevel,
    /// Full heading text, possibly merged from several runs or lines
    pub text: String,
    /// 1-indexed page the heading starts on
    pub page: u32,
}

impl OutlineRecord {
    /// Create a new outline record.
    pub fn new(level: HeadingLevel, text: impl Into<String>, page: u32) -> Self {
        Self {
            level,
            text: text.into(),
            page,
        }
    }
}

/// The per-document extraction result: a title plus headings in document
/// reading order.
///
/// Page numbers are monotonically non-decreasing across `outline`. Levels
/// are not required to form a strictly valid tree; a document may jump
/// from H1 to H3.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Outline {
    /// Document title ("" when none could be determined)
    pub title: String,
    /// Headings in document reading order
    pub outline: Vec<OutlineRecord>,
}

impl Outline {
    /// Create an empty outline with a title.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            outline: Vec::new(),
        }
    }

    /// Whether the outline has no headings. An empty outline is a valid
    /// result, not a failure.
    pub fn is_empty(&self) -> bool {
        self.outline.is_empty()
    }

    /// Number of headings.
    pub fn len(&self) -> usize {
        self.outline.len()
    }

    /// Serialize to pretty-printed JSON (the persisted format).
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Deserialize from persisted JSON.
    pub fn from_json(data: &str) -> Result<Self> {
        Ok(serde_json::from_str(data)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_ordering() {
        assert!(HeadingLevel::H1 < HeadingLevel::H2);
        assert!(HeadingLevel::H2 < HeadingLevel::new(7));
        assert_eq!(HeadingLevel::new(0), HeadingLevel::H1);
    }

    #[test]
    fn test_level_serde() {
        let json = serde_json::to_string(&HeadingLevel::H2).unwrap();
        assert_eq!(json, "\"H2\"");

        let level: HeadingLevel = serde_json::from_str("\"H4\"").unwrap();
        assert_eq!(level.depth(), 4);

        assert!(serde_json::from_str::<HeadingLevel>("\"h1\"").is_err());
        assert!(serde_json::from_str::<HeadingLevel>("\"H0\"").is_err());
        assert!(serde_json::from_str::<HeadingLevel>("\"heading\"").is_err());
    }

    #[test]
    fn test_outline_json_shape() {
        let mut outline = Outline::new("Sample Report");
        outline
            .outline
            .push(OutlineRecord::new(HeadingLevel::H1, "Introduction", 1));
        outline
            .outline
            .push(OutlineRecord::new(HeadingLevel::H2, "Scope", 2));

        let json = outline.to_json().unwrap();
        assert!(json.contains("\"title\": \"Sample Report\""));
        assert!(json.contains("\"level\": \"H1\""));
        assert!(json.contains("\"page\": 2"));

        let back = Outline::from_json(&json).unwrap();
        assert_eq!(back, outline);
    }

    #[test]
    fn test_empty_outline_is_valid() {
        let outline = Outline::new("");
        assert!(outline.is_empty());
        let back = Outline::from_json(&outline.to_json().unwrap()).unwrap();
        assert_eq!(back.len(), 0);
    }
}
