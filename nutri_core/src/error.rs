//! Error types for the nutri_core library.
//!
//! The macro engine and recipe matcher never fail; these errors come from
//! configuration, persistence and catalog lookups.

use std::io;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for nutri_core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// TOML parsing error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Configuration validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Catalog validation error
    #[error("Catalog validation error: {0}")]
    CatalogValidation(String),

    /// Recipe id not present in the catalog
    #[error("Unknown recipe: {0}")]
    UnknownRecipe(String),

    /// Ingredient id not present in the catalog
    #[error("Unknown ingredient: {0}")]
    UnknownIngredient(String),

    /// User input rejected before reaching the engine
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}
