//! Heading candidate detection.
//!
//! Groups adjacent text runs into visual lines and scores each line as
//! heading-like using font size relative to body text, boldness, vertical
//! isolation, and a length penalty. Everything is relative to statistics
//! gathered from the document itself, so the detector works across
//! documents with very different base font sizes.

use std::collections::HashMap;

use crate::model::{BoundingBox, TextRun};

/// Configuration for heading candidate detection.
///
/// All weights contribute to a score clamped to `[0, 1]`; a line becomes a
/// candidate when its score exceeds `accept_threshold`.
#[derive(Debug, Clone)]
pub struct DetectorConfig {
    /// Weight of the font-size ratio component (ratio 2.0 earns the full
    /// weight)
    pub size_weight: f32,
    /// Bonus for lines bolder than the document's body text
    pub bold_bonus: f32,
    /// Maximum bonus for vertical whitespace above the line
    pub isolation_weight: f32,
    /// Lines longer than this many characters are penalized
    pub max_line_chars: usize,
    /// Penalty applied to over-long lines
    pub length_penalty: f32,
    /// Minimum score for acceptance (exclusive)
    pub accept_threshold: f32,
    /// Vertical-center tolerance for grouping runs into one line, as a
    /// fraction of line height
    pub line_tolerance: f32,
}

impl DetectorConfig {
    /// Create a config with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the acceptance threshold.
    pub fn with_accept_threshold(mut self, threshold: f32) -> Self {
        self.accept_threshold = threshold;
        self
    }

    /// Set the long-line character threshold.
    pub fn with_max_line_chars(mut self, chars: usize) -> Self {
        self.max_line_chars = chars;
        self
    }
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            size_weight: 0.5,
            bold_bonus: 0.2,
            isolation_weight: 0.2,
            max_line_chars: 100,
            length_penalty: 0.3,
            accept_threshold: 0.35,
            line_tolerance: 0.6,
        }
    }
}

/// A line-level segment accepted as heading-like.
#[derive(Debug, Clone, PartialEq)]
pub struct HeadingCandidate {
    /// Concatenated text of the merged runs
    pub text: String,
    /// 1-indexed page
    pub page: u32,
    /// Heading-likelihood score in [0, 1]
    pub score: f32,
    /// Dominant font size of the line
    pub font_size: f32,
    /// Whether the line is predominantly bold
    pub bold: bool,
    /// Bounding geometry of the whole line
    pub bbox: BoundingBox,
}

/// Document-wide font statistics used as the baseline for scoring.
///
/// The body size is the statistical mode of observed font sizes weighted
/// by character count, bucketed at 0.1 pt.
#[derive(Debug, Clone, Default)]
pub struct FontStatistics {
    size_histogram: HashMap<i32, usize>,
    bold_chars: usize,
    total_chars: usize,
}

impl FontStatistics {
    /// Gather statistics from a run sequence.
    pub fn from_runs(runs: &[TextRun]) -> Self {
        let mut stats = Self::default();
        for run in runs {
            stats.add_run(run);
        }
        stats
    }

    /// Record one run.
    pub fn add_run(&mut self, run: &TextRun) {
        let chars = run.char_count();
        *self
            .size_histogram
            .entry(size_bucket(run.font_size))
            .or_insert(0) += chars;
        if run.style.is_bold() {
            self.bold_chars += chars;
        }
        self.total_chars += chars;
    }

    /// The document's body text size. Falls back to 12 pt for documents
    /// with no text at all.
    pub fn body_size(&self) -> f32 {
        self.size_histogram
            .iter()
            .max_by_key(|(bucket, count)| (**count, -**bucket))
            .map(|(bucket, _)| *bucket as f32 / 10.0)
            .unwrap_or(12.0)
    }

    /// Whether the document's body text is itself predominantly bold, in
    /// which case boldness is not a distinguishing signal.
    pub fn body_is_bold(&self) -> bool {
        self.total_chars > 0 && self.bold_chars * 2 > self.total_chars
    }
}

fn size_bucket(size: f32) -> i32 {
    (size * 10.0).round() as i32
}

/// A visual line: consecutive runs on the same page whose vertical centers
/// coincide within tolerance.
#[derive(Debug, Clone)]
struct Line {
    runs: Vec<TextRun>,
    page: u32,
    bbox: BoundingBox,
}

impl Line {
    fn new(first: TextRun) -> Self {
        Self {
            page: first.page,
            bbox: first.bbox,
            runs: vec![first],
        }
    }

    fn push(&mut self, run: TextRun) {
        self.bbox = self.bbox.union(&run.bbox);
        self.runs.push(run);
    }

    fn accepts(&self, run: &TextRun, tolerance: f32) -> bool {
        if run.page != self.page {
            return false;
        }
        let line_height = self.bbox.height().max(run.bbox.height());
        (run.bbox.y_center() - self.bbox.y_center()).abs() <= line_height * tolerance
    }

    /// Dominant font size: the size bucket covering the most characters.
    fn dominant_size(&self) -> f32 {
        let mut by_bucket: HashMap<i32, usize> = HashMap::new();
        for run in &self.runs {
            *by_bucket.entry(size_bucket(run.font_size)).or_insert(0) += run.char_count();
        }
        by_bucket
            .into_iter()
            .max_by_key(|(bucket, count)| (*count, -*bucket))
            .map(|(bucket, _)| bucket as f32 / 10.0)
            .unwrap_or(0.0)
    }

    /// Whether the majority of characters are bold.
    fn is_bold(&self) -> bool {
        let bold: usize = self
            .runs
            .iter()
            .filter(|r| r.style.is_bold())
            .map(|r| r.char_count())
            .sum();
        let total: usize = self.runs.iter().map(|r| r.char_count()).sum();
        total > 0 && bold * 2 > total
    }

    /// Concatenated text, space-joined; runs arrive in reading order.
    fn text(&self) -> String {
        let mut out = String::new();
        for run in &self.runs {
            let piece = run.text.trim();
            if piece.is_empty() {
                continue;
            }
            if !out.is_empty() && !out.ends_with(' ') {
                out.push(' ');
            }
            out.push_str(piece);
        }
        out
    }

    fn char_count(&self) -> usize {
        self.runs.iter().map(|r| r.char_count()).sum()
    }
}

/// Group an ordered run sequence into visual lines.
fn group_lines(runs: &[TextRun], tolerance: f32) -> Vec<Line> {
    let mut lines: Vec<Line> = Vec::new();
    for run in runs {
        match lines.last_mut() {
            Some(line) if line.accepts(run, tolerance) => line.push(run.clone()),
            _ => lines.push(Line::new(run.clone())),
        }
    }
    lines
}

/// Median vertical spacing between consecutive line centers on one page.
fn median_spacing(lines: &[Line]) -> f32 {
    let mut gaps: Vec<f32> = lines
        .windows(2)
        .filter(|w| w[0].page == w[1].page)
        .map(|w| (w[0].bbox.y_center() - w[1].bbox.y_center()).abs())
        .filter(|g| *g > 0.1)
        .collect();

    if gaps.is_empty() {
        return 12.0;
    }
    gaps.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    gaps[gaps.len() / 2]
}

/// Detect heading candidates across a whole document's run sequence.
///
/// A document with uniform single-style text produces zero candidates;
/// that is a valid outcome, not a failure.
pub fn detect_candidates(runs: &[TextRun], config: &DetectorConfig) -> Vec<HeadingCandidate> {
    let stats = FontStatistics::from_runs(runs);
    let body_size = stats.body_size();
    let body_bold = stats.body_is_bold();

    let lines = group_lines(runs, config.line_tolerance);
    let spacing = median_spacing(&lines);

    let mut candidates = Vec::new();
    for (i, line) in lines.iter().enumerate() {
        let text = line.text();
        // Single characters (page numbers, bullets) are never headings.
        if text.chars().count() <= 1 {
            continue;
        }

        let gap_above = match i.checked_sub(1).map(|p| &lines[p]) {
            Some(prev) if prev.page == line.page => {
                (prev.bbox.y0 - line.bbox.y1).max(0.0)
            }
            // First line of a page sits below pure whitespace.
            _ => f32::MAX,
        };

        let score = score_line(line, body_size, body_bold, gap_above, spacing, config);
        if score > config.accept_threshold {
            candidates.push(HeadingCandidate {
                text,
                page: line.page,
                score,
                font_size: line.dominant_size(),
                bold: line.is_bold(),
                bbox: line.bbox,
            });
        }
    }

    log::debug!(
        "Detected {} heading candidates ({} lines, body size {:.1}pt)",
        candidates.len(),
        lines.len(),
        body_size
    );

    candidates
}

fn score_line(
    line: &Line,
    body_size: f32,
    body_bold: bool,
    gap_above: f32,
    spacing: f32,
    config: &DetectorConfig,
) -> f32 {
    let mut score = 0.0f32;

    // Size ratio: body-sized text earns nothing, 2x body earns the full
    // weight.
    let ratio = if body_size > 0.0 {
        line.dominant_size() / body_size
    } else {
        1.0
    };
    score += (ratio - 1.0).clamp(0.0, 1.0) * config.size_weight;

    // Boldness only counts when the body text is not itself bold.
    if line.is_bold() && !body_bold {
        score += config.bold_bonus;
    }

    // Isolation: whitespace above the line relative to local line spacing.
    let isolation = if gap_above == f32::MAX {
        1.0
    } else if spacing > 0.0 {
        (gap_above / spacing - 1.0).clamp(0.0, 1.0)
    } else {
        0.0
    };
    score += isolation * config.isolation_weight;

    // Long lines resemble paragraph text even at large sizes.
    if line.char_count() > config.max_line_chars {
        score -= config.length_penalty;
    }

    score.clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::FontStyle;

    fn run(text: &str, page: u32, size: f32, style: FontStyle, x: f32, y: f32) -> TextRun {
        let width = size * 0.5 * text.chars().count() as f32;
        TextRun::new(
            text,
            page,
            size,
            style,
            BoundingBox::new(x, y - size * 0.2, x + width, y + size * 0.8),
        )
    }

    /// A page of uniform body text with a line every 14pt.
    fn body_page(page: u32, lines: usize) -> Vec<TextRun> {
        (0..lines)
            .map(|i| {
                run(
                    "The quick brown fox jumps over the lazy dog near the river bank",
                    page,
                    10.0,
                    FontStyle::Regular,
                    72.0,
                    700.0 - i as f32 * 14.0,
                )
            })
            .collect()
    }

    #[test]
    fn test_body_size_is_char_weighted_mode() {
        let mut runs = body_page(1, 10);
        runs.push(run("Big", 1, 24.0, FontStyle::Bold, 72.0, 730.0));
        let stats = FontStatistics::from_runs(&runs);
        assert!((stats.body_size() - 10.0).abs() < 0.01);
        assert!(!stats.body_is_bold());
    }

    #[test]
    fn test_uniform_document_yields_no_candidates() {
        let runs = body_page(1, 20);
        let candidates = detect_candidates(&runs, &DetectorConfig::default());
        assert!(candidates.is_empty());
    }

    #[test]
    fn test_uniform_bold_document_yields_no_candidates() {
        let runs: Vec<TextRun> = (0..20)
            .map(|i| {
                run(
                    "Uniformly bold body text keeps the detector quiet here",
                    1,
                    10.0,
                    FontStyle::Bold,
                    72.0,
                    700.0 - i as f32 * 14.0,
                )
            })
            .collect();
        let candidates = detect_candidates(&runs, &DetectorConfig::default());
        assert!(candidates.is_empty());
    }

    #[test]
    fn test_double_size_bold_line_is_accepted() {
        let mut runs = vec![run("Introduction", 1, 20.0, FontStyle::Bold, 72.0, 740.0)];
        runs.extend(body_page(1, 10).into_iter().map(|mut r| {
            r.bbox.y0 -= 60.0;
            r.bbox.y1 -= 60.0;
            r
        }));
        let candidates = detect_candidates(&runs, &DetectorConfig::default());
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].text, "Introduction");
        assert_eq!(candidates[0].page, 1);
        assert!(candidates[0].bold);
        assert!(candidates[0].score > 0.35);
    }

    #[test]
    fn test_long_line_is_penalized() {
        let long_text = "x".repeat(150);
        let mut runs = vec![run(&long_text, 1, 13.0, FontStyle::Regular, 72.0, 740.0)];
        runs.extend(body_page(1, 10).into_iter().map(|mut r| {
            r.bbox.y0 -= 60.0;
            r.bbox.y1 -= 60.0;
            r
        }));
        let candidates = detect_candidates(&runs, &DetectorConfig::default());
        assert!(candidates.is_empty());
    }

    #[test]
    fn test_runs_merge_into_one_line() {
        let runs = vec![
            run("Related", 1, 18.0, FontStyle::Bold, 72.0, 700.0),
            run("Work", 1, 18.0, FontStyle::Bold, 160.0, 700.0),
        ];
        let lines = group_lines(&runs, 0.6);
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].text(), "Related Work");
    }

    #[test]
    fn test_lines_split_across_pages() {
        let runs = vec![
            run("End of page", 1, 10.0, FontStyle::Regular, 72.0, 100.0),
            run("Top of page", 2, 10.0, FontStyle::Regular, 72.0, 100.0),
        ];
        let lines = group_lines(&runs, 0.6);
        assert_eq!(lines.len(), 2);
    }

    #[test]
    fn test_single_char_lines_skipped() {
        let mut runs = body_page(1, 10);
        // A lone large page number must not become a candidate.
        runs.push(run("7", 1, 20.0, FontStyle::Bold, 300.0, 40.0));
        let candidates = detect_candidates(&runs, &DetectorConfig::default());
        assert!(candidates.is_empty());
    }
}
