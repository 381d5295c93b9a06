//! Outline assembly.
//!
//! Consumes hierarchy-classified candidates in document order and emits
//! the canonical outline record list, merging continuation lines that
//! belong to the same heading. The merge looks back exactly one record,
//! so the builder stays streaming-friendly.

use crate::model::{BoundingBox, Outline, OutlineRecord};

use super::hierarchy::ClassifiedCandidate;

/// Same-page continuation lines must sit within this many line heights of
/// the previous heading line.
const MERGE_GAP_FACTOR: f32 = 0.8;

/// Assemble classified candidates into an [`Outline`].
///
/// Document order is preserved strictly; records are never reordered by
/// level and output pages are non-decreasing. An empty candidate set
/// produces an empty outline, which is a valid result. `info_title` is
/// the title from document metadata when available; otherwise the first
/// H1 record's text is used.
pub fn build_outline(
    candidates: Vec<ClassifiedCandidate>,
    info_title: Option<String>,
) -> Outline {
    let mut records: Vec<OutlineRecord> = Vec::new();
    // Geometry of the line behind the last record, for the merge check.
    let mut last: Option<ClassifiedCandidate> = None;

    for current in candidates {
        let merged = match (records.last_mut(), &last) {
            (Some(record), Some(prev)) if is_continuation(record, prev, &current) => {
                record.text.push(' ');
                record.text.push_str(current.candidate.text.trim());
                true
            }
            _ => false,
        };

        if !merged {
            records.push(OutlineRecord::new(
                current.level,
                current.candidate.text.trim(),
                current.candidate.page,
            ));
        }
        last = Some(current);
    }

    let title = info_title
        .or_else(|| {
            records
                .iter()
                .find(|r| r.level.depth() == 1)
                .map(|r| r.text.clone())
        })
        .unwrap_or_default();

    Outline { title, outline: records }
}

/// A candidate continues the previous record when the levels match and
/// the geometry says the same heading was split: either stacked lines on
/// one page, or a page/column break where the text clearly runs on.
fn is_continuation(
    record: &OutlineRecord,
    prev: &ClassifiedCandidate,
    current: &ClassifiedCandidate,
) -> bool {
    if current.level != record.level {
        return false;
    }

    let prev_box = &prev.candidate.bbox;
    let cur_box = &current.candidate.bbox;

    if current.candidate.page == prev.candidate.page {
        if cur_box.y_center() < prev_box.y_center() {
            // Directly below the previous line, tightly stacked.
            let gap = prev_box.y0 - cur_box.y1;
            return gap <= line_height(prev_box) * MERGE_GAP_FACTOR;
        }
        // Jumped back up the page: a column break.
        return runs_on(&record.text, &current.candidate.text);
    }

    if current.candidate.page == prev.candidate.page + 1 {
        // Page break: merge only with a clear textual continuation signal.
        return runs_on(&record.text, &current.candidate.text);
    }

    false
}

fn line_height(bbox: &BoundingBox) -> f32 {
    bbox.height().max(1.0)
}

/// Textual continuation: the previous text has no terminal punctuation
/// and the next fragment starts lowercase.
fn runs_on(prev_text: &str, next_text: &str) -> bool {
    let open_ended = !prev_text
        .trim_end()
        .ends_with(['.', ':', ';', '!', '?']);
    let starts_lower = next_text
        .trim_start()
        .chars()
        .next()
        .map(|c| c.is_lowercase())
        .unwrap_or(false);
    open_ended && starts_lower
}
