//! Core domain types for the nutrition calculator.
//!
//! This module defines the fundamental types used throughout the system:
//! - Body metrics, activity levels and goals
//! - Macro targets and nutrition values
//! - Ingredients, recipes and the catalog that holds them

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

// ============================================================================
// Body Metrics
// ============================================================================

/// Biological sex as used by the Mifflin-St Jeor equation
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Sex {
    Male,
    Female,
}

impl Sex {
    /// Constant term added to the Mifflin-St Jeor BMR
    pub fn bmr_offset(self) -> f64 {
        match self {
            Sex::Male => 5.0,
            Sex::Female => -161.0,
        }
    }
}

impl FromStr for Sex {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "male" | "m" => Ok(Sex::Male),
            "female" | "f" => Ok(Sex::Female),
            other => Err(format!("unknown sex '{}' (expected male or female)", other)),
        }
    }
}

impl fmt::Display for Sex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sex::Male => write!(f, "male"),
            Sex::Female => write!(f, "female"),
        }
    }
}

/// Labelled activity multipliers, sedentary through extra-active
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ActivityLevel {
    Sedentary,
    Light,
    Moderate,
    Active,
    ExtraActive,
}

impl ActivityLevel {
    pub const ALL: [ActivityLevel; 5] = [
        ActivityLevel::Sedentary,
        ActivityLevel::Light,
        ActivityLevel::Moderate,
        ActivityLevel::Active,
        ActivityLevel::ExtraActive,
    ];

    /// TDEE multiplier applied to BMR
    pub fn multiplier(self) -> f64 {
        match self {
            ActivityLevel::Sedentary => 1.2,
            ActivityLevel::Light => 1.375,
            ActivityLevel::Moderate => 1.55,
            ActivityLevel::Active => 1.725,
            ActivityLevel::ExtraActive => 1.9,
        }
    }

    /// Find the label for a multiplier, if it is one of the known values
    pub fn from_multiplier(multiplier: f64) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|level| (level.multiplier() - multiplier).abs() < 1e-9)
    }

    pub fn label(self) -> &'static str {
        match self {
            ActivityLevel::Sedentary => "sedentary",
            ActivityLevel::Light => "light",
            ActivityLevel::Moderate => "moderate",
            ActivityLevel::Active => "active",
            ActivityLevel::ExtraActive => "extra_active",
        }
    }
}

impl FromStr for ActivityLevel {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "sedentary" => Ok(ActivityLevel::Sedentary),
            "light" | "lightly_active" => Ok(ActivityLevel::Light),
            "moderate" | "moderately_active" => Ok(ActivityLevel::Moderate),
            "active" | "very_active" => Ok(ActivityLevel::Active),
            "extra_active" | "extra" => Ok(ActivityLevel::ExtraActive),
            other => Err(format!("unknown activity level '{}'", other)),
        }
    }
}

/// Direction of the daily calorie adjustment
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Goal {
    Lose,
    Maintain,
    Gain,
}

impl FromStr for Goal {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "lose" | "cut" => Ok(Goal::Lose),
            "maintain" => Ok(Goal::Maintain),
            "gain" | "bulk" => Ok(Goal::Gain),
            other => Err(format!("unknown goal '{}' (expected lose, maintain or gain)", other)),
        }
    }
}

impl fmt::Display for Goal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Goal::Lose => write!(f, "lose"),
            Goal::Maintain => write!(f, "maintain"),
            Goal::Gain => write!(f, "gain"),
        }
    }
}

/// Body metrics entered by the user
///
/// The engine accepts any values; use [`UserMetrics::validate`] before
/// computing if the input comes from outside the program.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct UserMetrics {
    pub weight_kg: f64,
    pub height_cm: f64,
    pub age_years: u32,
    pub sex: Sex,
    pub activity_multiplier: f64,
    pub goal: Goal,
}

/// Plausible human ranges used by [`UserMetrics::validate`]
pub const WEIGHT_RANGE_KG: (f64, f64) = (30.0, 300.0);
pub const HEIGHT_RANGE_CM: (f64, f64) = (100.0, 250.0);
pub const AGE_RANGE_YEARS: (u32, u32) = (18, 120);

impl UserMetrics {
    /// Check the metrics against plausible human ranges
    ///
    /// Returns a list of problems, or empty Vec if the metrics are usable.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if !(WEIGHT_RANGE_KG.0..=WEIGHT_RANGE_KG.1).contains(&self.weight_kg) {
            errors.push(format!(
                "weight {} kg outside {}-{} kg",
                self.weight_kg, WEIGHT_RANGE_KG.0, WEIGHT_RANGE_KG.1
            ));
        }
        if !(HEIGHT_RANGE_CM.0..=HEIGHT_RANGE_CM.1).contains(&self.height_cm) {
            errors.push(format!(
                "height {} cm outside {}-{} cm",
                self.height_cm, HEIGHT_RANGE_CM.0, HEIGHT_RANGE_CM.1
            ));
        }
        if !(AGE_RANGE_YEARS.0..=AGE_RANGE_YEARS.1).contains(&self.age_years) {
            errors.push(format!(
                "age {} outside {}-{} years",
                self.age_years, AGE_RANGE_YEARS.0, AGE_RANGE_YEARS.1
            ));
        }
        if !self.activity_multiplier.is_finite() || self.activity_multiplier <= 0.0 {
            errors.push(format!(
                "activity multiplier {} must be positive",
                self.activity_multiplier
            ));
        }

        errors
    }

    /// Semantic label for the activity multiplier, if it has one
    pub fn activity_level(&self) -> Option<ActivityLevel> {
        ActivityLevel::from_multiplier(self.activity_multiplier)
    }
}

// ============================================================================
// Macro Targets and Nutrition
// ============================================================================

/// How goal calories are divided between protein, carbs and fats
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum MacroSplit {
    /// 30% protein, 40% carbs, 30% fats by calories
    #[default]
    Percentage,
    /// 2.2 g/kg protein, goal-dependent fat share, carbs fill the rest
    WeightBased,
}

impl FromStr for MacroSplit {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "percentage" | "percent" => Ok(MacroSplit::Percentage),
            "weight_based" | "weight" => Ok(MacroSplit::WeightBased),
            other => Err(format!("unknown macro split '{}'", other)),
        }
    }
}

impl fmt::Display for MacroSplit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MacroSplit::Percentage => write!(f, "percentage"),
            MacroSplit::WeightBased => write!(f, "weight_based"),
        }
    }
}

/// Daily calorie and macro targets (grams)
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
pub struct MacroResult {
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fats: f64,
}

impl MacroResult {
    /// Whole-number copy for display
    pub fn rounded(&self) -> Self {
        Self {
            calories: self.calories.round(),
            protein: self.protein.round(),
            carbs: self.carbs.round(),
            fats: self.fats.round(),
        }
    }
}

/// Calories and macros for a quantity of food
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct Nutrition {
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fats: f64,
}

impl Nutrition {
    pub fn zero() -> Self {
        Self::default()
    }

    /// Scale nutrition values by a multiplier
    pub fn scale(&self, multiplier: f64) -> Self {
        Self {
            calories: self.calories * multiplier,
            protein: self.protein * multiplier,
            carbs: self.carbs * multiplier,
            fats: self.fats * multiplier,
        }
    }

    pub fn rounded(&self) -> Self {
        Self {
            calories: self.calories.round(),
            protein: self.protein.round(),
            carbs: self.carbs.round(),
            fats: self.fats.round(),
        }
    }
}

impl std::ops::Add for Nutrition {
    type Output = Nutrition;

    fn add(self, other: Nutrition) -> Nutrition {
        Nutrition {
            calories: self.calories + other.calories,
            protein: self.protein + other.protein,
            carbs: self.carbs + other.carbs,
            fats: self.fats + other.fats,
        }
    }
}

impl std::iter::Sum for Nutrition {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Nutrition::zero(), |acc, n| acc + n)
    }
}

impl From<MacroResult> for Nutrition {
    fn from(result: MacroResult) -> Self {
        Nutrition {
            calories: result.calories,
            protein: result.protein,
            carbs: result.carbs,
            fats: result.fats,
        }
    }
}

// ============================================================================
// Ingredients and Recipes
// ============================================================================

/// Broad grouping of an ingredient
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum IngredientCategory {
    Protein,
    Carb,
    Fat,
    Vegetable,
    Fruit,
    Dairy,
    Spice,
    Other,
}

/// A catalog ingredient with macros per 100 g
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Ingredient {
    pub id: String,
    pub name: String,
    pub category: IngredientCategory,
    pub per_100g: Nutrition,
}

/// One line of a recipe: an ingredient reference and its weight
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct RecipeIngredient {
    pub ingredient_id: String,
    pub amount_grams: f64,
}

/// Meal slot a recipe is intended for
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MealType {
    Breakfast,
    Lunch,
    Dinner,
    Snack,
}

/// A catalog recipe
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Recipe {
    pub id: String,
    pub name: String,
    pub meal_type: MealType,
    pub servings: u32,
    pub ingredients: Vec<RecipeIngredient>,
    #[serde(default)]
    pub instructions: Vec<String>,
}

impl Recipe {
    /// Ingredient ids in recipe order
    pub fn ingredient_ids(&self) -> impl Iterator<Item = &str> {
        self.ingredients.iter().map(|i| i.ingredient_id.as_str())
    }
}

// ============================================================================
// Catalog Type
// ============================================================================

/// Ingredients keyed by id, plus recipes in catalog order
///
/// Recipe order matters: the matcher keeps it for equal scores.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Catalog {
    pub ingredients: HashMap<String, Ingredient>,
    pub recipes: Vec<Recipe>,
}
