//! # pdftoc
//!
//! Structured outline extraction from PDF documents.
//!
//! pdftoc reads a PDF, detects heading-like lines from layout signals
//! (font size relative to body text, boldness, vertical isolation),
//! infers a hierarchy by ranking the document's style clusters by
//! prominence, and emits an ordered outline of heading records. A second,
//! independent pass labels outline records with semantic categories from
//! a fixed taxonomy using an ordered rule table.
//!
//! ## Quick Start
//!
//! ```no_run
//! use pdftoc::{extract_outline, label_outline};
//!
//! fn main() -> pdftoc::Result<()> {
//!     let outline = extract_outline("document.pdf")?;
//!     let labeled = label_outline(&outline)?;
//!     println!("{}", labeled.to_json()?);
//!     Ok(())
//! }
//! ```
//!
//! ## Design
//!
//! - **Relative prominence**: heading levels come from ranking the
//!   (font size, weight) clusters observed in each document, never from
//!   absolute size thresholds.
//! - **Valid empty output**: a document with uniform styling produces an
//!   empty outline, not an error.
//! - **Page-scoped failures**: a corrupt page is skipped (and logged);
//!   the rest of the document still processes.
//! - **Decoupled labeling**: the labeler consumes any outline, freshly
//!   built or reloaded from persisted JSON, enabling labeling-only runs.

pub mod analyze;
pub mod detect;
pub mod error;
pub mod label;
pub mod model;
pub mod parser;

pub use analyze::{
    assign_levels, build_outline, detect_candidates, ClassifiedCandidate, DetectorConfig,
    FontStatistics, HeadingCandidate, StyleCluster,
};
pub use error::{Error, Result};
pub use label::{LabelRule, Labeler, RuleSet};
pub use model::{
    BoundingBox, Category, FontStyle, HeadingLevel, LabeledOutline, LabeledOutlineRecord,
    Outline, OutlineRecord, TextRun,
};
pub use parser::{ErrorMode, ParseOptions, Tokenizer};

use std::path::Path;

/// Extract the outline of a PDF file with default options.
///
/// # Example
///
/// ```no_run
/// let outline = pdftoc::extract_outline("report.pdf").unwrap();
/// for record in &outline.outline {
///     println!("{} {} (p.{})", record.level, record.text, record.page);
/// }
/// ```
pub fn extract_outline<P: AsRef<Path>>(path: P) -> Result<Outline> {
    OutlineExtractor::new().extract(path)
}

/// Extract the outline of a PDF held in memory.
pub fn extract_outline_bytes(data: &[u8]) -> Result<Outline> {
    OutlineExtractor::new().extract_bytes(data)
}

/// Label an outline with the built-in rule table.
///
/// Works on freshly extracted outlines as well as outlines reloaded from
/// persisted JSON (labeling-only mode).
pub fn label_outline(outline: &Outline) -> Result<LabeledOutline> {
    Ok(Labeler::with_builtin_rules()?.label(outline))
}

/// Builder for outline extraction.
///
/// # Example
///
/// ```no_run
/// use pdftoc::{DetectorConfig, OutlineExtractor};
///
/// let outline = OutlineExtractor::new()
///     .strict()
///     .with_detector_config(DetectorConfig::new().with_accept_threshold(0.5))
///     .extract("document.pdf")?;
/// # Ok::<(), pdftoc::Error>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct OutlineExtractor {
    parse_options: ParseOptions,
    detector_config: DetectorConfig,
}

impl OutlineExtractor {
    /// Create an extractor with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail the document on the first undecodable page instead of
    /// skipping it.
    pub fn strict(mut self) -> Self {
        self.parse_options = self.parse_options.strict();
        self
    }

    /// Set the candidate detector configuration.
    pub fn with_detector_config(mut self, config: DetectorConfig) -> Self {
        self.detector_config = config;
        self
    }

    /// Extract the outline of a PDF file.
    pub fn extract<P: AsRef<Path>>(&self, path: P) -> Result<Outline> {
        let tokenizer = Tokenizer::open_with_options(path, self.parse_options.clone())?;
        self.run(&tokenizer)
    }

    /// Extract the outline of a PDF held in memory.
    pub fn extract_bytes(&self, data: &[u8]) -> Result<Outline> {
        let tokenizer = Tokenizer::from_bytes_with_options(data, self.parse_options.clone())?;
        self.run(&tokenizer)
    }

    fn run(&self, tokenizer: &Tokenizer) -> Result<Outline> {
        let runs = tokenizer.document_runs()?;
        let candidates = detect_candidates(&runs, &self.detector_config);
        let classified = assign_levels(candidates);
        Ok(build_outline(classified, tokenizer.info_title()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extractor_builder() {
        let extractor = OutlineExtractor::new()
            .strict()
            .with_detector_config(DetectorConfig::new().with_accept_threshold(0.5));
        assert_eq!(extractor.parse_options.error_mode, ErrorMode::Strict);
        assert_eq!(extractor.detector_config.accept_threshold, 0.5);
    }

    #[test]
    fn test_extract_bytes_rejects_garbage() {
        assert!(extract_outline_bytes(b"definitely not a pdf").is_err());
    }

    #[test]
    fn test_label_outline_uses_builtin_rules() {
        let mut outline = Outline::new("T");
        outline
            .outline
            .push(OutlineRecord::new(HeadingLevel::H1, "References", 9));
        let labeled = label_outline(&outline).unwrap();
        assert_eq!(labeled.outline[0].category, Category::SectionTitle);
    }
}
