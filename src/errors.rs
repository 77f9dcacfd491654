//! Error types for the analysis pipeline.
//!
//! Lookup failures never leave the resolver; [`LookupError`] exists so the
//! resolver can log why it fell back. Everything the caller can observe is an
//! [`AnalyzeError`].

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnalyzeError {
    #[error("Please enter at least one ingredient")]
    EmptyInput,

    #[error("No ingredients found in input (names must be at least two characters)")]
    NoIngredients,

    #[error("Analysis was cancelled")]
    Cancelled,

    #[error("Analysis was superseded by a newer submission")]
    Superseded,
}

/// Reasons a single safety lookup produced no data.
#[derive(Error, Debug)]
pub enum LookupError {
    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Lookup service returned status {0}")]
    Status(reqwest::StatusCode),

    #[error("Lookup service reported an error: {0}")]
    Service(String),

    #[error("Lookup service returned no result markup")]
    EmptyBody,

    #[error("Invalid lookup URL: {0}")]
    InvalidUrl(String),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Invalid config: {0}")]
    Invalid(String),

    #[error("Failed to build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),
}
