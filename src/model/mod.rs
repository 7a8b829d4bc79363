pub mod decision;
pub mod ratings;
pub mod table;
pub mod weighting;
