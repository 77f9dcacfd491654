//! Report renderers for analysis results.
//!
//! - [`terminal`] — colored summary box and an ingredient table in input order; respects `--verbose` / `--quiet`.

pub mod terminal;
