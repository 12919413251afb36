//! Macro engine: body metrics to daily calorie and macro targets.
//!
//! The pipeline is:
//! 1. BMR via Mifflin-St Jeor
//! 2. TDEE = BMR x activity multiplier
//! 3. Goal adjustment of a fixed 500 kcal
//! 4. Split calories into protein, carbs and fats
//!
//! Every function here is pure. Nothing is validated and nothing is rounded;
//! callers check input with [`UserMetrics::validate`] and round for display
//! with [`MacroResult::rounded`].

use crate::{Goal, MacroResult, MacroSplit, Sex, UserMetrics};

/// Daily calorie offset applied for lose/gain goals
pub const GOAL_CALORIE_OFFSET: f64 = 500.0;

/// Energy density in kcal per gram
pub const KCAL_PER_GRAM_PROTEIN: f64 = 4.0;
pub const KCAL_PER_GRAM_CARBS: f64 = 4.0;
pub const KCAL_PER_GRAM_FAT: f64 = 9.0;

/// Protein target of the weight-based split, grams per kg bodyweight
pub const PROTEIN_GRAMS_PER_KG: f64 = 2.2;

/// Calorie shares of the percentage split
const PERCENT_PROTEIN: f64 = 0.30;
const PERCENT_CARBS: f64 = 0.40;
const PERCENT_FATS: f64 = 0.30;

/// Intermediate energy figures, useful for display
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EnergyEstimate {
    pub bmr: f64,
    pub tdee: f64,
    pub target_calories: f64,
}

/// Basal metabolic rate (Mifflin-St Jeor), kcal/day
pub fn bmr(weight_kg: f64, height_cm: f64, age_years: u32, sex: Sex) -> f64 {
    10.0 * weight_kg + 6.25 * height_cm - 5.0 * f64::from(age_years) + sex.bmr_offset()
}

/// Total daily energy expenditure
pub fn tdee(bmr: f64, activity_multiplier: f64) -> f64 {
    bmr * activity_multiplier
}

/// Apply the fixed goal offset to TDEE
///
/// The result is floored at zero. This departs from an exact -500 on a cut
/// when TDEE is below 500 kcal, which the smallest plausible bodies reach
/// (30 kg, 100 cm, 120 years, female, sedentary is about 197 kcal), so the
/// non-negative output guarantee wins over the offset there.
pub fn adjust_for_goal(tdee: f64, goal: Goal) -> f64 {
    let adjusted = match goal {
        Goal::Lose => tdee - GOAL_CALORIE_OFFSET,
        Goal::Maintain => tdee,
        Goal::Gain => tdee + GOAL_CALORIE_OFFSET,
    };
    adjusted.max(0.0)
}

/// Fat share of calories used by the weight-based split
pub fn weight_based_fat_share(goal: Goal) -> f64 {
    match goal {
        Goal::Lose => 0.20,
        Goal::Maintain => 0.225,
        Goal::Gain => 0.25,
    }
}

/// Divide goal calories into macro grams
///
/// With [`MacroSplit::WeightBased`] protein is fixed by bodyweight, so
/// `4p + 4c + 9f` only matches `calories` while carbs stay above zero.
pub fn split_macros(calories: f64, weight_kg: f64, goal: Goal, split: MacroSplit) -> MacroResult {
    match split {
        MacroSplit::Percentage => MacroResult {
            calories,
            protein: calories * PERCENT_PROTEIN / KCAL_PER_GRAM_PROTEIN,
            carbs: calories * PERCENT_CARBS / KCAL_PER_GRAM_CARBS,
            fats: calories * PERCENT_FATS / KCAL_PER_GRAM_FAT,
        },
        MacroSplit::WeightBased => {
            let protein = PROTEIN_GRAMS_PER_KG * weight_kg;
            let fat_calories = calories * weight_based_fat_share(goal);
            let remaining = calories - protein * KCAL_PER_GRAM_PROTEIN - fat_calories;

            MacroResult {
                calories,
                protein,
                carbs: (remaining / KCAL_PER_GRAM_CARBS).max(0.0),
                fats: fat_calories / KCAL_PER_GRAM_FAT,
            }
        }
    }
}

/// BMR, TDEE and goal calories for a set of metrics
pub fn estimate_energy(metrics: &UserMetrics) -> EnergyEstimate {
    let bmr = bmr(
        metrics.weight_kg,
        metrics.height_cm,
        metrics.age_years,
        metrics.sex,
    );
    let tdee = tdee(bmr, metrics.activity_multiplier);

    EnergyEstimate {
        bmr,
        tdee,
        target_calories: adjust_for_goal(tdee, metrics.goal),
    }
}

/// Compute macro targets using the canonical percentage split
pub fn compute_macros(metrics: &UserMetrics) -> MacroResult {
    compute_macros_with(metrics, MacroSplit::default())
}

/// Compute macro targets with an explicit split
pub fn compute_macros_with(metrics: &UserMetrics, split: MacroSplit) -> MacroResult {
    let energy = estimate_energy(metrics);
    split_macros(energy.target_calories, metrics.weight_kg, metrics.goal, split)
}
