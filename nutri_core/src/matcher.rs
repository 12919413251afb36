//! Recipe matcher: rank recipes by overlap with a set of selected ingredients.
//!
//! Scoring combines two coverage ratios:
//! - recipe coverage: matched / distinct ingredients in the recipe
//! - selection coverage: matched / selected ingredients
//!
//! `score = 0.4 * recipe_coverage * 100 + 0.6 * selection_coverage * 100`
//!
//! Selection coverage weighs more, so a recipe that uses more of what the
//! user picked outranks a small recipe that happens to be fully covered.

use crate::{Ingredient, Nutrition, Recipe};
use std::collections::{HashMap, HashSet};

pub const RECIPE_COVERAGE_WEIGHT: f64 = 0.4;
pub const SELECTION_COVERAGE_WEIGHT: f64 = 0.6;

/// A recipe that shares at least one ingredient with the selection
#[derive(Clone, Debug)]
pub struct RecipeMatch<'a> {
    pub recipe: &'a Recipe,
    /// Distinct recipe ingredients present in the selection
    pub matched: usize,
    pub score: f64,
}

/// Score every recipe against the selection, best first
///
/// Recipes with no selected ingredient are dropped. Equal scores keep
/// catalog order.
pub fn score_recipes<'a>(selected: &HashSet<String>, recipes: &'a [Recipe]) -> Vec<RecipeMatch<'a>> {
    if selected.is_empty() {
        return Vec::new();
    }

    let mut matches: Vec<RecipeMatch<'a>> = recipes
        .iter()
        .filter_map(|recipe| {
            let ids: HashSet<&str> = recipe.ingredient_ids().collect();
            let matched = ids.iter().filter(|id| selected.contains(**id)).count();
            if matched == 0 {
                return None;
            }

            let recipe_coverage = matched as f64 / ids.len() as f64;
            let selection_coverage = matched as f64 / selected.len() as f64;
            let score = RECIPE_COVERAGE_WEIGHT * recipe_coverage * 100.0
                + SELECTION_COVERAGE_WEIGHT * selection_coverage * 100.0;

            Some(RecipeMatch {
                recipe,
                matched,
                score,
            })
        })
        .collect();

    // sort_by is stable
    matches.sort_by(|a, b| b.score.total_cmp(&a.score));

    tracing::debug!(
        "Scored {} of {} recipes against {} selected ingredients",
        matches.len(),
        recipes.len(),
        selected.len()
    );

    matches
}

/// Rank recipes by relevance to the selected ingredient ids
///
/// Returns an empty list for an empty selection or empty catalog.
pub fn rank_recipes<'a>(selected: &HashSet<String>, recipes: &'a [Recipe]) -> Vec<&'a Recipe> {
    score_recipes(selected, recipes)
        .into_iter()
        .map(|m| m.recipe)
        .collect()
}

/// Total nutrition of a recipe as written
///
/// Ingredient ids missing from `ingredients` contribute nothing; each one is
/// reported with a warning.
pub fn recipe_nutrition(recipe: &Recipe, ingredients: &HashMap<String, Ingredient>) -> Nutrition {
    recipe
        .ingredients
        .iter()
        .filter_map(|line| match ingredients.get(&line.ingredient_id) {
            Some(ingredient) => Some(ingredient.per_100g.scale(line.amount_grams / 100.0)),
            None => {
                tracing::warn!(
                    "Recipe '{}' references unknown ingredient '{}', skipping",
                    recipe.id,
                    line.ingredient_id
                );
                None
            }
        })
        .sum()
}

/// Nutrition of one serving; zero servings counts as one
pub fn per_serving(recipe: &Recipe, ingredients: &HashMap<String, Ingredient>) -> Nutrition {
    let servings = recipe.servings.max(1);
    recipe_nutrition(recipe, ingredients).scale(1.0 / f64::from(servings))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{build_default_catalog, IngredientCategory, MealType, RecipeIngredient};

    fn selection(ids: &[&str]) -> HashSet<String> {
        ids.iter().map(|s| s.to_string()).collect()
    }

    fn test_recipe(id: &str, ingredient_ids: &[&str]) -> Recipe {
        Recipe {
            id: id.into(),
            name: id.into(),
            meal_type: MealType::Lunch,
            servings: 1,
            ingredients: ingredient_ids
                .iter()
                .map(|i| RecipeIngredient {
                    ingredient_id: (*i).into(),
                    amount_grams: 100.0,
                })
                .collect(),
            instructions: vec![],
        }
    }

    fn chicken() -> Ingredient {
        Ingredient {
            id: "chicken-breast".into(),
            name: "Chicken breast".into(),
            category: IngredientCategory::Protein,
            per_100g: Nutrition {
                calories: 165.0,
                protein: 31.0,
                carbs: 0.0,
                fats: 3.6,
            },
        }
    }

    #[test]
    fn test_empty_selection_returns_nothing() {
        let catalog = build_default_catalog();
        assert!(rank_recipes(&HashSet::new(), &catalog.recipes).is_empty());
    }

    #[test]
    fn test_empty_catalog_returns_nothing() {
        assert!(rank_recipes(&selection(&["eggs"]), &[]).is_empty());
    }

    #[test]
    fn test_only_recipes_with_selected_ingredient() {
        let catalog = build_default_catalog();
        let ranked = rank_recipes(&selection(&["chicken-breast"]), &catalog.recipes);

        assert!(!ranked.is_empty());
        for recipe in &ranked {
            assert!(recipe.ingredient_ids().any(|id| id == "chicken-breast"));
        }
        let total = catalog
            .recipes
            .iter()
            .filter(|r| r.ingredient_ids().any(|id| id == "chicken-breast"))
            .count();
        assert_eq!(ranked.len(), total);
    }

    #[test]
    fn test_score_formula() {
        let recipes = vec![test_recipe("a", &["x", "y", "z", "w"])];
        let matches = score_recipes(&selection(&["x", "y", "q"]), &recipes);

        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].matched, 2);
        // 0.4 * 2/4 * 100 + 0.6 * 2/3 * 100
        assert!((matches[0].score - 60.0).abs() < 1e-9);
    }

    #[test]
    fn test_selection_coverage_outweighs_recipe_coverage() {
        // "small" is fully covered but uses one of three picks;
        // "big" uses all three picks but is only half covered.
        let recipes = vec![
            test_recipe("small", &["x"]),
            test_recipe("big", &["x", "y", "z", "a", "b", "c"]),
        ];
        let ranked = rank_recipes(&selection(&["x", "y", "z"]), &recipes);

        let ids: Vec<_> = ranked.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["big", "small"]);
    }

    #[test]
    fn test_ties_keep_catalog_order() {
        let recipes = vec![
            test_recipe("first", &["x", "y"]),
            test_recipe("second", &["x", "z"]),
            test_recipe("third", &["x", "q"]),
        ];
        let ranked = rank_recipes(&selection(&["x"]), &recipes);

        let ids: Vec<_> = ranked.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["first", "second", "third"]);
    }

    #[test]
    fn test_duplicate_ingredient_lines_count_once() {
        let recipes = vec![test_recipe("dup", &["x", "x", "y"])];
        let matches = score_recipes(&selection(&["x"]), &recipes);

        assert_eq!(matches[0].matched, 1);
        // 0.4 * 1/2 * 100 + 0.6 * 1/1 * 100
        assert!((matches[0].score - 80.0).abs() < 1e-9);
    }

    #[test]
    fn test_ranking_is_deterministic() {
        let catalog = build_default_catalog();
        let picks = selection(&["chicken-breast", "broccoli", "olive-oil", "tomato"]);

        let first: Vec<_> = rank_recipes(&picks, &catalog.recipes)
            .iter()
            .map(|r| r.id.clone())
            .collect();
        let second: Vec<_> = rank_recipes(&picks, &catalog.recipes)
            .iter()
            .map(|r| r.id.clone())
            .collect();

        assert_eq!(first, second);
    }

    #[test]
    fn test_recipe_nutrition_single_ingredient() {
        let mut ingredients = HashMap::new();
        ingredients.insert("chicken-breast".to_string(), chicken());

        let mut recipe = test_recipe("grilled", &["chicken-breast"]);
        recipe.ingredients[0].amount_grams = 150.0;

        let n = recipe_nutrition(&recipe, &ingredients);
        assert!((n.protein - 46.5).abs() < 1e-9);
        assert_eq!(n.carbs, 0.0);
        assert!((n.fats - 5.4).abs() < 1e-9);
        assert!((n.calories - 247.5).abs() < 1e-9);
    }

    #[test]
    fn test_missing_ingredient_is_skipped() {
        crate::logging::init_test();

        let mut ingredients = HashMap::new();
        ingredients.insert("chicken-breast".to_string(), chicken());

        let recipe = test_recipe("mystery", &["chicken-breast", "dragon-fruit-jerky"]);
        let n = recipe_nutrition(&recipe, &ingredients);

        assert!((n.calories - 165.0).abs() < 1e-9);
        assert!((n.protein - 31.0).abs() < 1e-9);
    }

    #[test]
    fn test_per_serving_divides_by_servings() {
        let catalog = build_default_catalog();
        let recipe = catalog.recipe("chicken-rice-bowl").unwrap();

        let total = recipe_nutrition(recipe, &catalog.ingredients);
        let one = per_serving(recipe, &catalog.ingredients);
        assert!((one.calories * 2.0 - total.calories).abs() < 1e-9);
    }

    #[test]
    fn test_per_serving_zero_servings_counts_as_one() {
        let mut ingredients = HashMap::new();
        ingredients.insert("chicken-breast".to_string(), chicken());

        let mut recipe = test_recipe("grilled", &["chicken-breast"]);
        recipe.servings = 0;

        let one = per_serving(&recipe, &ingredients);
        assert!((one.calories - 165.0).abs() < 1e-9);
    }
}
