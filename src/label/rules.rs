//! Label rule definitions.
//!
//! Classification is a data-driven table: an ordered list of rules, each
//! pairing a predicate (text pattern plus optional page/level constraints)
//! with a category and a confidence reflecting the rule's specificity.
//! The first matching rule wins. Rules are static configuration, so a
//! malformed pattern fails construction rather than surfacing per document.

use regex::Regex;

use crate::error::{Error, Result};
use crate::model::{Category, HeadingLevel, OutlineRecord};

/// One classification rule.
#[derive(Debug, Clone)]
pub struct LabelRule {
    name: String,
    category: Category,
    confidence: f64,
    pattern: Option<Regex>,
    first_page_only: bool,
    level: Option<HeadingLevel>,
}

impl LabelRule {
    /// Create a rule that matches unconditionally (constraints are added
    /// with the builder methods).
    pub fn new(name: impl Into<String>, category: Category, confidence: f64) -> Self {
        Self {
            name: name.into(),
            category,
            confidence,
            pattern: None,
            first_page_only: false,
            level: None,
        }
    }

    /// Require the record text to match a regex pattern.
    pub fn with_pattern(mut self, pattern: &str) -> Result<Self> {
        let regex = Regex::new(pattern).map_err(|e| Error::RuleConfig {
            name: self.name.clone(),
            reason: e.to_string(),
        })?;
        self.pattern = Some(regex);
        Ok(self)
    }

    /// Require the record to sit on the document's first page.
    pub fn on_first_page(mut self) -> Self {
        self.first_page_only = true;
        self
    }

    /// Require an exact hierarchy level.
    pub fn at_level(mut self, level: HeadingLevel) -> Self {
        self.level = Some(level);
        self
    }

    /// Rule name, for logging and diagnostics.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The category this rule assigns.
    pub fn category(&self) -> Category {
        self.category
    }

    /// The confidence this rule assigns.
    pub fn confidence(&self) -> f64 {
        self.confidence
    }

    /// Evaluate the rule's predicate against a record.
    pub fn matches(&self, record: &OutlineRecord) -> bool {
        if self.first_page_only && record.page != 1 {
            return false;
        }
        if let Some(level) = self.level {
            if record.level != level {
                return false;
            }
        }
        match &self.pattern {
            Some(regex) => regex.is_match(record.text.trim()),
            None => true,
        }
    }
}

/// An ordered rule table; first match wins.
#[derive(Debug, Clone)]
pub struct RuleSet {
    rules: Vec<LabelRule>,
}

impl RuleSet {
    /// Build a rule set from an ordered list of rules.
    pub fn new(rules: Vec<LabelRule>) -> Self {
        Self { rules }
    }

    /// The built-in rule table.
    ///
    /// Ordered from most to least specific: caption markers, explicit
    /// section markers, numbering prefixes, section vocabulary, and
    /// first-page heuristics last.
    pub fn builtin() -> Result<Self> {
        let rules = vec![
            LabelRule::new("figure-caption", Category::FigureCaption, 0.95)
                .with_pattern(r"(?i)^(figure|fig\.?)\s*\d")?,
            LabelRule::new("table-caption", Category::TableCaption, 0.95)
                .with_pattern(r"(?i)^(table|tbl\.?)\s*\d")?,
            LabelRule::new("appendix", Category::SectionTitle, 0.9)
                .with_pattern(r"(?i)^appendix\s+[a-z0-9]")?,
            LabelRule::new("section-marker", Category::SectionTitle, 0.9)
                .with_pattern(r"(?i)^(chapter|section|part)\s+\S")?,
            // Multi-level decimals ("2.3.1 Method"), single enumerators
            // with punctuation ("1. Intro", "IV. Scope", "B) Goals").
            LabelRule::new("numbered-heading", Category::SectionTitle, 0.9)
                .with_pattern(r"^\s*(?:(?:\d+\.)+\d+\.?|\d+[.)]|[IVXLCDM]+[.)]|[A-Za-z][.)])\s+\S")?,
            LabelRule::new("section-vocabulary", Category::SectionTitle, 0.85)
                .with_pattern(
                    r"(?i)^(abstract|introduction|background|related work|methodology|methods?|materials and methods|results|discussion|conclusions?|references|bibliography|acknowledge?ments|summary|glossary|index)\b",
                )?,
            LabelRule::new("author-affiliation", Category::AuthorAffiliation, 0.6)
                .on_first_page()
                .with_pattern(
                    r"(?i)(university|institute|department|laboratory|college|school of|academy|\S+@\S+\.\S+)",
                )?,
            LabelRule::new("first-page-title", Category::DocumentTitle, 0.5)
                .on_first_page()
                .at_level(HeadingLevel::H1),
        ];
        Ok(Self::new(rules))
    }

    /// Classify one record: the first matching rule's category and
    /// confidence, or `unclassified` with confidence 0.
    pub fn classify(&self, record: &OutlineRecord) -> (Category, f64) {
        for rule in &self.rules {
            if rule.matches(record) {
                return (rule.category, rule.confidence);
            }
        }
        (Category::Unclassified, 0.0)
    }

    /// Number of rules in the table.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(text: &str, page: u32, level: HeadingLevel) -> OutlineRecord {
        OutlineRecord::new(level, text, page)
    }

    #[test]
    fn test_builtin_rules_compile() {
        let rules = RuleSet::builtin().unwrap();
        assert!(!rules.is_empty());
    }

    #[test]
    fn test_malformed_pattern_is_rule_config_error() {
        let result = LabelRule::new("bad", Category::SectionTitle, 0.5).with_pattern("([unclosed");
        assert!(matches!(result, Err(Error::RuleConfig { .. })));
    }

    #[test]
    fn test_caption_rules() {
        let rules = RuleSet::builtin().unwrap();
        let (cat, conf) = rules.classify(&record("Figure 3: Throughput", 4, HeadingLevel::H3));
        assert_eq!(cat, Category::FigureCaption);
        assert!(conf > 0.9);

        let (cat, _) = rules.classify(&record("Table 1. Results", 5, HeadingLevel::H3));
        assert_eq!(cat, Category::TableCaption);

        let (cat, _) = rules.classify(&record("Fig. 2 overview", 2, HeadingLevel::H3));
        assert_eq!(cat, Category::FigureCaption);
    }

    #[test]
    fn test_numbered_headings() {
        let rules = RuleSet::builtin().unwrap();
        for text in ["1. Introduction", "2.3.1 Evaluation", "IV. Scope", "B) Goals"] {
            let (cat, _) = rules.classify(&record(text, 3, HeadingLevel::H2));
            assert_eq!(cat, Category::SectionTitle, "text: {text}");
        }
        // A plain year is not a numbering prefix.
        let (cat, _) = rules.classify(&record("2020 vision statement", 3, HeadingLevel::H2));
        assert_eq!(cat, Category::Unclassified);
    }

    #[test]
    fn test_section_vocabulary() {
        let rules = RuleSet::builtin().unwrap();
        for text in ["Introduction", "Related Work", "References", "Conclusions"] {
            let (cat, _) = rules.classify(&record(text, 2, HeadingLevel::H1));
            assert_eq!(cat, Category::SectionTitle, "text: {text}");
        }
    }

    #[test]
    fn test_first_page_constraints() {
        let rules = RuleSet::builtin().unwrap();

        let (cat, _) = rules.classify(&record(
            "Department of Computer Science, Example University",
            1,
            HeadingLevel::H3,
        ));
        assert_eq!(cat, Category::AuthorAffiliation);

        // Same text off the first page does not match the heuristic.
        let (cat, _) = rules.classify(&record(
            "Department of Computer Science, Example University",
            4,
            HeadingLevel::H3,
        ));
        assert_eq!(cat, Category::Unclassified);

        let (cat, conf) =
            rules.classify(&record("A Survey of Layout Analysis", 1, HeadingLevel::H1));
        assert_eq!(cat, Category::DocumentTitle);
        assert_eq!(conf, 0.5);

        // H1 beyond page 1 is not title-like.
        let (cat, _) = rules.classify(&record("A Survey of Layout Analysis", 2, HeadingLevel::H1));
        assert_eq!(cat, Category::Unclassified);
    }

    #[test]
    fn test_first_match_wins() {
        let rules = RuleSet::builtin().unwrap();
        // Matches both the numbering rule and the vocabulary rule; the
        // numbering rule comes first.
        let (cat, conf) = rules.classify(&record("1. Introduction", 1, HeadingLevel::H1));
        assert_eq!(cat, Category::SectionTitle);
        assert_eq!(conf, 0.9);
    }

    #[test]
    fn test_no_match_is_unclassified_with_zero_confidence() {
        let rules = RuleSet::builtin().unwrap();
        let (cat, conf) = rules.classify(&record("Some odd heading", 9, HeadingLevel::new(4)));
        assert_eq!(cat, Category::Unclassified);
        assert_eq!(conf, 0.0);
    }
}
