//! Weighted feature scoring and signature-overlap comparison for decisions.
//!
//! A [`model::decision::Decision`] ties features, their importance weights,
//! options and per-option ratings together and keeps a unified table in sync
//! with them. [`compare`] turns that table into ranked scores and Venn
//! partitions; [`report`] renders the results.

pub mod compare;
pub mod config;
pub mod elicit;
pub mod error;
pub mod model;
pub mod report;
pub mod types;
