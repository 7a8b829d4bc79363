//! Comparisons over the unified table: weighted scores and signature overlap.

pub mod expand;
pub mod scoring;
pub mod venn;
