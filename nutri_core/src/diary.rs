//! Food diary: what was eaten on which day, and how it compares to targets.
//!
//! Entries carry the nutrition computed when they were logged, so later
//! catalog edits do not rewrite the past.

use crate::matcher::per_serving;
use crate::store::read_records;
use crate::{Catalog, Error, MacroResult, Nutrition, Result};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;
use uuid::Uuid;

/// What a diary entry refers to
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DiarySource {
    Recipe { recipe_id: String, servings: f64 },
    Ingredient { ingredient_id: String, grams: f64 },
}

/// One logged portion of food
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DiaryEntry {
    pub id: Uuid,
    pub logged_at: DateTime<Utc>,
    pub date: NaiveDate,
    pub source: DiarySource,
    pub nutrition: Nutrition,
}

impl DiaryEntry {
    fn new(date: NaiveDate, source: DiarySource, nutrition: Nutrition) -> Self {
        Self {
            id: Uuid::new_v4(),
            logged_at: Utc::now(),
            date,
            source,
            nutrition,
        }
    }
}

/// Build a diary entry for a number of servings of a catalog recipe
pub fn entry_for_recipe(
    catalog: &Catalog,
    recipe_id: &str,
    servings: f64,
    date: NaiveDate,
) -> Result<DiaryEntry> {
    if !(servings.is_finite() && servings > 0.0) {
        return Err(Error::InvalidInput(format!(
            "servings must be positive, got {}",
            servings
        )));
    }

    let recipe = catalog
        .recipe(recipe_id)
        .ok_or_else(|| Error::UnknownRecipe(recipe_id.to_string()))?;
    let nutrition = per_serving(recipe, &catalog.ingredients).scale(servings);

    Ok(DiaryEntry::new(
        date,
        DiarySource::Recipe {
            recipe_id: recipe_id.to_string(),
            servings,
        },
        nutrition,
    ))
}

/// Build a diary entry for a weighed amount of a catalog ingredient
pub fn entry_for_ingredient(
    catalog: &Catalog,
    ingredient_id: &str,
    grams: f64,
    date: NaiveDate,
) -> Result<DiaryEntry> {
    if !(grams.is_finite() && grams > 0.0) {
        return Err(Error::InvalidInput(format!(
            "grams must be positive, got {}",
            grams
        )));
    }

    let ingredient = catalog
        .ingredient(ingredient_id)
        .ok_or_else(|| Error::UnknownIngredient(ingredient_id.to_string()))?;
    let nutrition = ingredient.per_100g.scale(grams / 100.0);

    Ok(DiaryEntry::new(
        date,
        DiarySource::Ingredient {
            ingredient_id: ingredient_id.to_string(),
            grams,
        },
        nutrition,
    ))
}

/// Load all diary entries in logging order
pub fn load_entries(path: &Path) -> Result<Vec<DiaryEntry>> {
    read_records(path)
}

/// Entries for a single day
pub fn entries_on(entries: &[DiaryEntry], date: NaiveDate) -> Vec<&DiaryEntry> {
    entries.iter().filter(|e| e.date == date).collect()
}

/// Sum of everything logged on a day
pub fn daily_totals(entries: &[DiaryEntry], date: NaiveDate) -> Nutrition {
    entries
        .iter()
        .filter(|e| e.date == date)
        .map(|e| e.nutrition)
        .sum()
}

/// Consumption for a day measured against macro targets
#[derive(Clone, Copy, Debug)]
pub struct DailyProgress {
    pub targets: MacroResult,
    pub consumed: Nutrition,
    /// Targets minus consumed; negative means over target
    pub remaining: Nutrition,
}

impl DailyProgress {
    pub fn new(targets: MacroResult, consumed: Nutrition) -> Self {
        let remaining = Nutrition::from(targets) + consumed.scale(-1.0);
        Self {
            targets,
            consumed,
            remaining,
        }
    }

    /// Percent of the calorie target eaten so far (0 when the target is 0)
    pub fn calorie_percent(&self) -> f64 {
        percent_of(self.consumed.calories, self.targets.calories)
    }

    pub fn protein_percent(&self) -> f64 {
        percent_of(self.consumed.protein, self.targets.protein)
    }

    pub fn carbs_percent(&self) -> f64 {
        percent_of(self.consumed.carbs, self.targets.carbs)
    }

    pub fn fats_percent(&self) -> f64 {
        percent_of(self.consumed.fats, self.targets.fats)
    }
}

fn percent_of(value: f64, target: f64) -> f64 {
    if target > 0.0 {
        value / target * 100.0
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::build_default_catalog;
    use crate::store::{JsonlSink, RecordSink};

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
    }

    #[test]
    fn test_ingredient_entry_scales_per_100g() {
        let catalog = build_default_catalog();
        let entry = entry_for_ingredient(&catalog, "chicken-breast", 150.0, day(1)).unwrap();

        assert!((entry.nutrition.protein - 46.5).abs() < 1e-9);
        assert!((entry.nutrition.calories - 247.5).abs() < 1e-9);
        assert!(matches!(entry.source, DiarySource::Ingredient { .. }));
    }

    #[test]
    fn test_recipe_entry_uses_servings() {
        let catalog = build_default_catalog();
        let recipe = catalog.recipe("beef-pasta").unwrap();
        let one = per_serving(recipe, &catalog.ingredients);

        let entry = entry_for_recipe(&catalog, "beef-pasta", 1.5, day(1)).unwrap();
        assert!((entry.nutrition.calories - one.calories * 1.5).abs() < 1e-9);
    }

    #[test]
    fn test_unknown_ids_are_errors() {
        let catalog = build_default_catalog();

        let err = entry_for_recipe(&catalog, "nope", 1.0, day(1)).unwrap_err();
        assert!(matches!(err, Error::UnknownRecipe(ref id) if id == "nope"));

        let err = entry_for_ingredient(&catalog, "nope", 10.0, day(1)).unwrap_err();
        assert!(matches!(err, Error::UnknownIngredient(_)));
    }

    #[test]
    fn test_non_positive_amounts_rejected() {
        let catalog = build_default_catalog();
        assert!(matches!(
            entry_for_ingredient(&catalog, "oats", 0.0, day(1)),
            Err(Error::InvalidInput(_))
        ));
        assert!(matches!(
            entry_for_recipe(&catalog, "overnight-oats", -1.0, day(1)),
            Err(Error::InvalidInput(_))
        ));
    }

    #[test]
    fn test_daily_totals_only_count_that_day() {
        let catalog = build_default_catalog();
        let entries = vec![
            entry_for_ingredient(&catalog, "chicken-breast", 100.0, day(1)).unwrap(),
            entry_for_ingredient(&catalog, "chicken-breast", 100.0, day(1)).unwrap(),
            entry_for_ingredient(&catalog, "chicken-breast", 100.0, day(2)).unwrap(),
        ];

        let totals = daily_totals(&entries, day(1));
        assert!((totals.calories - 330.0).abs() < 1e-9);
        assert_eq!(entries_on(&entries, day(2)).len(), 1);
        assert_eq!(daily_totals(&entries, day(3)), Nutrition::zero());
    }

    #[test]
    fn test_progress_remaining_and_percent() {
        let targets = MacroResult {
            calories: 2000.0,
            protein: 150.0,
            carbs: 200.0,
            fats: 60.0,
        };
        let consumed = Nutrition {
            calories: 500.0,
            protein: 160.0,
            carbs: 50.0,
            fats: 15.0,
        };

        let progress = DailyProgress::new(targets, consumed);
        assert_eq!(progress.remaining.calories, 1500.0);
        assert_eq!(progress.remaining.protein, -10.0);
        assert_eq!(progress.calorie_percent(), 25.0);
        assert_eq!(progress.fats_percent(), 25.0);
    }

    #[test]
    fn test_zero_target_percent() {
        let targets = MacroResult {
            calories: 0.0,
            protein: 0.0,
            carbs: 0.0,
            fats: 0.0,
        };
        let progress = DailyProgress::new(targets, Nutrition::zero());
        assert_eq!(progress.calorie_percent(), 0.0);
    }

    #[test]
    fn test_entries_persist_through_jsonl() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("diary.jsonl");
        let catalog = build_default_catalog();

        let mut sink = JsonlSink::new(&path);
        sink.append(&entry_for_recipe(&catalog, "overnight-oats", 1.0, day(4)).unwrap())
            .unwrap();
        sink.append(&entry_for_ingredient(&catalog, "banana", 120.0, day(4)).unwrap())
            .unwrap();

        let entries = load_entries(&path).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(
            entries[0].source,
            DiarySource::Recipe {
                recipe_id: "overnight-oats".into(),
                servings: 1.0
            }
        );
    }
}
