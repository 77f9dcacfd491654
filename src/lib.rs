//! `ingredient-checkr` — analyze ingredient lists and report safety concerns.
//!
//! # Flow
//! 1. Split the pasted list into candidate names ([`tokenizer`]).
//! 2. Look each name up in the safety-data service ([`safety`]); failures fall
//!    back to default data instead of erroring.
//! 3. Classify function and common use by keyword ([`classify`]).
//! 4. Build one [`models::Ingredient`] per name ([`assembler`]).
//! 5. Count safety levels and derive the overall verdict ([`aggregate`]).
//!
//! [`pipeline`] wires these together with bounded concurrency and
//! per-submission cancellation.

pub mod aggregate;
pub mod assembler;
pub mod classify;
pub mod config;
pub mod errors;
pub mod models;
pub mod pipeline;
pub mod report;
pub mod safety;
pub mod tokenizer;

pub use errors::AnalyzeError;
pub use models::{AnalysisResult, Ingredient};
pub use pipeline::{AnalysisSession, Pipeline, PipelineState};
