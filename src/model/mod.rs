//! Data model for outline extraction and labeling.

mod labeled;
mod outline;
mod run;

pub use labeled::{Category, LabeledOutline, LabeledOutlineRecord};
pub use outline::{HeadingLevel, Outline, OutlineRecord};
pub use run::{BoundingBox, FontStyle, TextRun};
