//! Hierarchy classification.
//!
//! Maps accepted heading candidates to discrete levels by clustering the
//! distinct (font size, weight) signatures observed in the document and
//! ranking the clusters by prominence. Levels are purely relative: the
//! most prominent cluster is H1 no matter its absolute size, so documents
//! with very different base fonts classify consistently.

use std::collections::HashMap;

use crate::model::HeadingLevel;

use super::detector::HeadingCandidate;

/// A distinct (font size, weight) signature with its prominence rank.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StyleCluster {
    /// Font size in tenths of a point
    pub size_decipoints: i32,
    /// Bold weight
    pub bold: bool,
    /// Assigned level (rank 0 = H1)
    pub level: HeadingLevel,
}

/// A heading candidate with its assigned hierarchy level.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassifiedCandidate {
    /// The detected candidate
    pub candidate: HeadingCandidate,
    /// Level assigned by relative prominence
    pub level: HeadingLevel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct StyleKey {
    size_decipoints: i32,
    bold: bool,
}

impl StyleKey {
    fn of(candidate: &HeadingCandidate) -> Self {
        Self {
            size_decipoints: (candidate.font_size * 10.0).round() as i32,
            bold: candidate.bold,
        }
    }
}

/// Rank the style clusters present among `candidates`, most prominent
/// first: descending font size, bold above regular at equal size.
pub fn rank_clusters(candidates: &[HeadingCandidate]) -> Vec<StyleCluster> {
    let mut keys: Vec<StyleKey> = Vec::new();
    for candidate in candidates {
        let key = StyleKey::of(candidate);
        if !keys.contains(&key) {
            keys.push(key);
        }
    }

    keys.sort_by(|a, b| {
        b.size_decipoints
            .cmp(&a.size_decipoints)
            .then(b.bold.cmp(&a.bold))
    });

    keys.into_iter()
        .enumerate()
        .map(|(rank, key)| StyleCluster {
            size_decipoints: key.size_decipoints,
            bold: key.bold,
            // Depth saturates; clusters past the deepest representable
            // level all share it rather than wrapping back to H1.
            level: HeadingLevel::new(u8::try_from(rank + 1).unwrap_or(u8::MAX)),
        })
        .collect()
}

/// Assign a level to every candidate from its cluster's prominence rank.
///
/// Candidates sharing an identical (size, weight) signature share a level
/// regardless of where they occur; a document with a single distinct
/// cluster assigns everything H1. Input order is preserved.
pub fn assign_levels(candidates: Vec<HeadingCandidate>) -> Vec<ClassifiedCandidate> {
    let clusters = rank_clusters(&candidates);
    let by_key: HashMap<StyleKey, HeadingLevel> = clusters
        .iter()
        .map(|c| {
            (
                StyleKey {
                    size_decipoints: c.size_decipoints,
                    bold: c.bold,
                },
                c.level,
            )
        })
        .collect();

    log::debug!("Ranked {} style clusters", clusters.len());

    candidates
        .into_iter()
        .map(|candidate| {
            let level = by_key[&StyleKey::of(&candidate)];
            ClassifiedCandidate { candidate, level }
        })
        .collect()
}
