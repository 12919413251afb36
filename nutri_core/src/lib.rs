#![forbid(unsafe_code)]

//! Core domain model and business logic for nutri.
//!
//! This crate provides:
//! - Domain types (metrics, macro targets, ingredients, recipes)
//! - The macro engine (BMR, TDEE, goal calories, macro split)
//! - The recipe matcher (overlap ranking, recipe nutrition)
//! - The built-in catalog
//! - Persistence (calculation history, food diary, profile, CSV export)

pub mod types;
pub mod error;
pub mod catalog;
pub mod config;
pub mod logging;
pub mod engine;
pub mod matcher;
pub mod store;
pub mod history;
pub mod diary;
pub mod profile;
pub mod export;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;
pub use catalog::{build_default_catalog, get_default_catalog};
pub use config::Config;
pub use engine::{compute_macros, compute_macros_with, estimate_energy, EnergyEstimate};
pub use matcher::{per_serving, rank_recipes, recipe_nutrition, score_recipes, RecipeMatch};
pub use store::{JsonlSink, RecordSink};
pub use history::CalculationRecord;
pub use diary::{DailyProgress, DiaryEntry, DiarySource};
pub use profile::UserProfile;
