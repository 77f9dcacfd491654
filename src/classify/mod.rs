//! Keyword heuristics that label an ingredient by function and common use.
//!
//! - [`tables`] — the ordered keyword tables. Order decides ties.
//! - [`classifier`] — table scans that map a name to a category.

pub mod classifier;
pub mod tables;
