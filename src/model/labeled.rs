//! Labeled outline records: extraction output augmented with semantic
//! categories from a fixed taxonomy.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::model::{HeadingLevel, OutlineRecord};

/// Semantic category assigned by the labeler.
///
/// This is a closed taxonomy shared by all label rules; serialized as
/// kebab-case strings in the persisted format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    /// The document's title heading
    DocumentTitle,
    /// A numbered or vocabulary-matched section heading
    SectionTitle,
    /// A figure caption ("Figure 3: ...")
    FigureCaption,
    /// A table caption ("Table 1. ...")
    TableCaption,
    /// Author or affiliation line on the first page
    AuthorAffiliation,
    /// No rule matched
    #[default]
    Unclassified,
}

impl Category {
    /// The canonical string form, as persisted.
    pub fn as_str(self) -> &'static str {
        match self {
            Category::DocumentTitle => "document-title",
            Category::SectionTitle => "section-title",
            Category::FigureCaption => "figure-caption",
            Category::TableCaption => "table-caption",
            Category::AuthorAffiliation => "author-affiliation",
            Category::Unclassified => "unclassified",
        }
    }
}

/// An outline record augmented with a category and rule confidence.
///
/// The labeler copies `level`/`text`/`page` verbatim; it never mutates
/// extraction output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabeledOutlineRecord {
    /// Assigned hierarchy level
    pub level: HeadingLevel,
    /// Heading text
    pub text: String,
    /// 1-indexed page
    pub page: u32,
    /// Semantic category (always present; `unclassified` when no rule matched)
    pub category: Category,
    /// Confidence of the matching rule, 0.0 when unclassified
    pub confidence: f64,
}

impl LabeledOutlineRecord {
    /// Attach a category to an outline record.
    pub fn from_record(record: &OutlineRecord, category: Category, confidence: f64) -> Self {
        Self {
            level: record.level,
            text: record.text.clone(),
            page: record.page,
            category,
            confidence,
        }
    }
}

/// The labeled variant of [`crate::model::Outline`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LabeledOutline {
    /// Document title
    pub title: String,
    /// Labeled headings in document reading order
    pub outline: Vec<LabeledOutlineRecord>,
}

impl LabeledOutline {
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
    fn test_category_serde() {
        let json = serde_json::to_string(&Category::SectionTitle).unwrap();
        assert_eq!(json, "\"section-title\"");

        let cat: Category = serde_json::from_str("\"figure-caption\"").unwrap();
        assert_eq!(cat, Category::FigureCaption);
    }

    #[test]
    fn test_category_as_str_matches_serde() {
        for cat in [
            Category::DocumentTitle,
            Category::SectionTitle,
            Category::FigureCaption,
            Category::TableCaption,
            Category::AuthorAffiliation,
            Category::Unclassified,
        ] {
            let json = serde_json::to_string(&cat).unwrap();
            assert_eq!(json, format!("\"{}\"", cat.as_str()));
        }
    }

    #[test]
    fn test_labeled_record_preserves_fields() {
        let record = OutlineRecord::new(HeadingLevel::H2, "3.1 Results", 7);
        let labeled =
            LabeledOutlineRecord::from_record(&record, Category::SectionTitle, 0.9);
        assert_eq!(labeled.level, record.level);
        assert_eq!(labeled.text, record.text);
        assert_eq!(labeled.page, record.page);
        assert_eq!(labeled.category, Category::SectionTitle);
    }
}
