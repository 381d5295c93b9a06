//! Heading analysis: candidate detection, hierarchy classification, and
//! outline assembly.
//!
//! The stages are pure functions over [`TextRun`](crate::model::TextRun)
//! sequences; no I/O happens here.

mod builder;
mod detector;
mod hierarchy;

pub use builder::build_outline;
pub use detector::{detect_candidates, DetectorConfig, FontStatistics, HeadingCandidate};
pub use hierarchy::{assign_levels, rank_clusters, ClassifiedCandidate, StyleCluster};
