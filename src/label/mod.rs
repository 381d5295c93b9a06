//! Semantic labeling of extracted outlines.
//!
//! The labeler runs independently of extraction: it accepts any
//! [`Outline`], whether just built or reloaded from persisted JSON, which
//! is what makes a labeling-only re-run possible. It is pure — records
//! are copied with a category attached; level, text, and page are never
//! touched — and therefore idempotent.

mod rules;

pub use rules::{LabelRule, RuleSet};

use crate::error::Result;
use crate::model::{LabeledOutline, LabeledOutlineRecord, Outline};

/// Rule-driven outline labeler.
#[derive(Debug, Clone)]
pub struct Labeler {
    rules: RuleSet,
}

impl Labeler {
    /// Create a labeler with a custom rule table.
    pub fn new(rules: RuleSet) -> Self {
        Self { rules }
    }

    /// Create a labeler with the built-in rule table.
    ///
    /// Fails with [`Error::RuleConfig`](crate::error::Error::RuleConfig)
    /// if a rule pattern does not compile.
    pub fn with_builtin_rules() -> Result<Self> {
        Ok(Self::new(RuleSet::builtin()?))
    }

    /// Label every record of an outline.
    pub fn label(&self, outline: &Outline) -> LabeledOutline {
        let records = outline
            .outline
            .iter()
            .map(|record| {
                let (category, confidence) = self.rules.classify(record);
                LabeledOutlineRecord::from_record(record, category, confidence)
            })
            .collect();

        LabeledOutline {
            title: outline.title.clone(),
            outline: records,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Category, HeadingLevel, OutlineRecord};

    fn sample_outline() -> Outline {
        Outline {
            title: "Sample".to_string(),
            outline: vec![
                OutlineRecord::new(HeadingLevel::H1, "Introduction", 1),
                OutlineRecord::new(HeadingLevel::H2, "2.1 Design", 3),
                OutlineRecord::new(HeadingLevel::H3, "Figure 1: Architecture", 4),
                OutlineRecord::new(HeadingLevel::H2, "Some odd heading", 6),
            ],
        }
    }

    #[test]
    fn test_label_assigns_categories() {
        let labeler = Labeler::with_builtin_rules().unwrap();
        let labeled = labeler.label(&sample_outline());

        assert_eq!(labeled.outline[0].category, Category::SectionTitle);
        assert_eq!(labeled.outline[1].category, Category::SectionTitle);
        assert_eq!(labeled.outline[2].category, Category::FigureCaption);
        assert_eq!(labeled.outline[3].category, Category::Unclassified);
        assert_eq!(labeled.outline[3].confidence, 0.0);
    }

    #[test]
    fn test_label_never_mutates_extraction_fields() {
        let outline = sample_outline();
        let labeler = Labeler::with_builtin_rules().unwrap();
        let labeled = labeler.label(&outline);

        assert_eq!(labeled.title, outline.title);
        for (original, labeled) in outline.outline.iter().zip(&labeled.outline) {
            assert_eq!(labeled.level, original.level);
            assert_eq!(labeled.text, original.text);
            assert_eq!(labeled.page, original.page);
        }
    }

    #[test]
    fn test_labeling_is_idempotent() {
        let outline = sample_outline();
        let labeler = Labeler::with_builtin_rules().unwrap();
        let first = labeler.label(&outline);
        let second = labeler.label(&outline);
        assert_eq!(first, second);
    }

    #[test]
    fn test_empty_outline_labels_to_empty() {
        let labeler = Labeler::with_builtin_rules().unwrap();
        let labeled = labeler.label(&Outline::new("Untitled"));
        assert!(labeled.outline.is_empty());
        assert_eq!(labeled.title, "Untitled");
    }
}
