//! Default catalog of ingredients and recipes.
//!
//! Macros are per 100 g (raw or as typically weighed). A custom catalog
//! with the same JSON layout can be loaded with [`Catalog::load_from`].

use crate::types::*;
use crate::Result;
use once_cell::sync::Lazy;
use std::collections::{HashMap, HashSet};
use std::path::Path;

/// Cached default catalog - built once and reused across all operations
static DEFAULT_CATALOG: Lazy<Catalog> = Lazy::new(build_default_catalog);

/// Get a reference to the cached default catalog
pub fn get_default_catalog() -> &'static Catalog {
    &DEFAULT_CATALOG
}

fn ingredient(
    id: &str,
    name: &str,
    category: IngredientCategory,
    protein: f64,
    carbs: f64,
    fats: f64,
    calories: f64,
) -> Ingredient {
    Ingredient {
        id: id.into(),
        name: name.into(),
        category,
        per_100g: Nutrition {
            calories,
            protein,
            carbs,
            fats,
        },
    }
}

fn recipe(
    id: &str,
    name: &str,
    meal_type: MealType,
    servings: u32,
    ingredients: &[(&str, f64)],
    instructions: &[&str],
) -> Recipe {
    Recipe {
        id: id.into(),
        name: name.into(),
        meal_type,
        servings,
        ingredients: ingredients
            .iter()
            .map(|(ingredient_id, amount_grams)| RecipeIngredient {
                ingredient_id: (*ingredient_id).into(),
                amount_grams: *amount_grams,
            })
            .collect(),
        instructions: instructions.iter().map(|s| (*s).into()).collect(),
    }
}

/// Builds the default catalog with built-in ingredients and recipes
///
/// Prefer [`get_default_catalog`] outside of tests.
pub fn build_default_catalog() -> Catalog {
    use crate::types::IngredientCategory::*;

    // ========================================================================
    // Ingredients (protein, carbs, fats, kcal per 100 g)
    // ========================================================================

    let ingredients = vec![
        ingredient("chicken-breast", "Chicken breast", Protein, 31.0, 0.0, 3.6, 165.0),
        ingredient("salmon", "Salmon fillet", Protein, 20.0, 0.0, 13.0, 208.0),
        ingredient("lean-beef", "Lean ground beef", Protein, 26.0, 0.0, 10.0, 199.0),
        ingredient("eggs", "Whole eggs", Protein, 13.0, 1.1, 11.0, 155.0),
        ingredient("tofu", "Firm tofu", Protein, 17.0, 3.0, 9.0, 144.0),
        ingredient("tuna", "Tuna in water", Protein, 26.0, 0.0, 1.0, 116.0),
        ingredient("white-rice", "White rice (cooked)", Carb, 2.7, 28.0, 0.3, 130.0),
        ingredient("brown-rice", "Brown rice (cooked)", Carb, 2.6, 23.0, 0.9, 111.0),
        ingredient("oats", "Rolled oats", Carb, 13.0, 68.0, 7.0, 389.0),
        ingredient("sweet-potato", "Sweet potato", Carb, 1.6, 20.0, 0.1, 86.0),
        ingredient("pasta", "Pasta (cooked)", Carb, 5.8, 31.0, 0.9, 158.0),
        ingredient("quinoa", "Quinoa (cooked)", Carb, 4.4, 21.0, 1.9, 120.0),
        ingredient("whole-wheat-bread", "Whole wheat bread", Carb, 13.0, 41.0, 3.4, 247.0),
        ingredient("olive-oil", "Olive oil", Fat, 0.0, 0.0, 100.0, 884.0),
        ingredient("avocado", "Avocado", Fat, 2.0, 9.0, 15.0, 160.0),
        ingredient("almonds", "Almonds", Fat, 21.0, 22.0, 49.0, 579.0),
        ingredient("peanut-butter", "Peanut butter", Fat, 25.0, 20.0, 50.0, 588.0),
        ingredient("broccoli", "Broccoli", Vegetable, 2.8, 7.0, 0.4, 34.0),
        ingredient("spinach", "Spinach", Vegetable, 2.9, 3.6, 0.4, 23.0),
        ingredient("bell-pepper", "Bell pepper", Vegetable, 1.0, 6.0, 0.3, 31.0),
        ingredient("tomato", "Tomato", Vegetable, 0.9, 3.9, 0.2, 18.0),
        ingredient("onion", "Onion", Vegetable, 1.1, 9.3, 0.1, 40.0),
        ingredient("banana", "Banana", Fruit, 1.1, 23.0, 0.3, 89.0),
        ingredient("blueberries", "Blueberries", Fruit, 0.7, 14.0, 0.3, 57.0),
        ingredient("greek-yogurt", "Greek yogurt (plain, low fat)", Dairy, 10.0, 3.6, 0.4, 59.0),
        ingredient("milk", "Milk (semi-skimmed)", Dairy, 3.4, 5.0, 1.5, 46.0),
        ingredient("cheddar", "Cheddar cheese", Dairy, 25.0, 1.3, 33.0, 403.0),
        ingredient("garlic", "Garlic", Spice, 6.4, 33.0, 0.5, 149.0),
        ingredient("paprika", "Paprika", Spice, 14.0, 54.0, 13.0, 282.0),
        ingredient("soy-sauce", "Soy sauce", Other, 8.1, 4.9, 0.6, 53.0),
    ];

    // ========================================================================
    // Recipes
    // ========================================================================

    let recipes = vec![
        recipe(
            "chicken-rice-bowl",
            "Chicken & rice bowl",
            MealType::Lunch,
            2,
            &[
                ("chicken-breast", 300.0),
                ("white-rice", 300.0),
                ("broccoli", 200.0),
                ("olive-oil", 10.0),
                ("soy-sauce", 15.0),
            ],
            &[
                "Cook the rice.",
                "Sear the chicken in olive oil until cooked through.",
                "Steam the broccoli and serve everything with soy sauce.",
            ],
        ),
        recipe(
            "salmon-sweet-potato",
            "Baked salmon with sweet potato",
            MealType::Dinner,
            2,
            &[
                ("salmon", 300.0),
                ("sweet-potato", 400.0),
                ("spinach", 100.0),
                ("olive-oil", 10.0),
                ("garlic", 6.0),
            ],
            &[
                "Roast cubed sweet potato at 200C for 25 minutes.",
                "Add the salmon for the last 12 minutes.",
                "Wilt the spinach with garlic and serve.",
            ],
        ),
        recipe(
            "overnight-oats",
            "Overnight oats",
            MealType::Breakfast,
            1,
            &[
                ("oats", 60.0),
                ("milk", 200.0),
                ("greek-yogurt", 100.0),
                ("blueberries", 80.0),
            ],
            &["Mix everything in a jar and refrigerate overnight."],
        ),
        recipe(
            "veggie-omelette",
            "Vegetable omelette",
            MealType::Breakfast,
            1,
            &[
                ("eggs", 150.0),
                ("spinach", 50.0),
                ("bell-pepper", 50.0),
                ("onion", 30.0),
                ("cheddar", 20.0),
            ],
            &[
                "Soften the onion and pepper.",
                "Pour over the beaten eggs, add spinach and cheese, fold.",
            ],
        ),
        recipe(
            "beef-pasta",
            "Beef & tomato pasta",
            MealType::Dinner,
            3,
            &[
                ("lean-beef", 400.0),
                ("pasta", 450.0),
                ("tomato", 400.0),
                ("onion", 100.0),
                ("garlic", 10.0),
                ("olive-oil", 10.0),
            ],
            &[
                "Brown the beef with onion and garlic.",
                "Add chopped tomato and simmer for 15 minutes.",
                "Toss with the cooked pasta.",
            ],
        ),
        recipe(
            "tofu-stir-fry",
            "Tofu stir-fry",
            MealType::Dinner,
            2,
            &[
                ("tofu", 300.0),
                ("brown-rice", 300.0),
                ("broccoli", 150.0),
                ("bell-pepper", 150.0),
                ("soy-sauce", 30.0),
                ("garlic", 6.0),
            ],
            &[
                "Press and cube the tofu, then fry until golden.",
                "Stir-fry the vegetables with garlic and soy sauce.",
                "Serve over brown rice.",
            ],
        ),
        recipe(
            "tuna-salad",
            "Tuna & avocado salad",
            MealType::Lunch,
            1,
            &[
                ("tuna", 120.0),
                ("avocado", 70.0),
                ("tomato", 100.0),
                ("spinach", 60.0),
                ("olive-oil", 5.0),
            ],
            &["Combine everything and dress with olive oil."],
        ),
        recipe(
            "chicken-quinoa-salad",
            "Chicken quinoa salad",
            MealType::Lunch,
            2,
            &[
                ("chicken-breast", 250.0),
                ("quinoa", 300.0),
                ("bell-pepper", 100.0),
                ("tomato", 150.0),
                ("olive-oil", 15.0),
                ("paprika", 3.0),
            ],
            &[
                "Season the chicken with paprika and grill.",
                "Mix with cooked quinoa and chopped vegetables.",
            ],
        ),
        recipe(
            "pb-banana-toast",
            "Peanut butter banana toast",
            MealType::Snack,
            1,
            &[
                ("whole-wheat-bread", 60.0),
                ("peanut-butter", 30.0),
                ("banana", 100.0),
            ],
            &["Toast the bread, spread peanut butter and top with banana."],
        ),
        recipe(
            "yogurt-parfait",
            "Greek yogurt parfait",
            MealType::Snack,
            1,
            &[
                ("greek-yogurt", 200.0),
                ("blueberries", 80.0),
                ("almonds", 20.0),
                ("oats", 20.0),
            ],
            &["Layer yogurt, berries, oats and chopped almonds."],
        ),
    ];

    Catalog {
        ingredients: ingredients
            .into_iter()
            .map(|i| (i.id.clone(), i))
            .collect::<HashMap<_, _>>(),
        recipes,
    }
}

impl Catalog {
    /// Load a catalog from a JSON file
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let catalog: Catalog = serde_json::from_str(&contents)?;
        tracing::info!(
            "Loaded catalog from {:?} ({} ingredients, {} recipes)",
            path,
            catalog.ingredients.len(),
            catalog.recipes.len()
        );
        Ok(catalog)
    }

    /// Look up a recipe by id
    pub fn recipe(&self, id: &str) -> Option<&Recipe> {
        self.recipes.iter().find(|r| r.id == id)
    }

    /// Look up an ingredient by id
    pub fn ingredient(&self, id: &str) -> Option<&Ingredient> {
        self.ingredients.get(id)
    }

    /// Validate the catalog for consistency and completeness
    ///
    /// Returns a list of validation errors, or empty Vec if valid.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        for (id, ingredient) in &self.ingredients {
            if id.is_empty() || ingredient.id.is_empty() {
                errors.push("Ingredient has empty ID".to_string());
            }
            if id != &ingredient.id {
                errors.push(format!(
                    "Ingredient key '{}' doesn't match ingredient.id '{}'",
                    id, ingredient.id
                ));
            }
            if ingredient.name.is_empty() {
                errors.push(format!("Ingredient '{}' has empty name", id));
            }
            let n = &ingredient.per_100g;
            if n.calories < 0.0 || n.protein < 0.0 || n.carbs < 0.0 || n.fats < 0.0 {
                errors.push(format!("Ingredient '{}' has negative macros", id));
            }
        }

        let mut seen = HashSet::new();
        for recipe in &self.recipes {
            let id = &recipe.id;
            if id.is_empty() {
                errors.push("Recipe has empty ID".to_string());
            }
            if !seen.insert(id.as_str()) {
                errors.push(format!("Duplicate recipe ID '{}'", id));
            }
            if recipe.name.is_empty() {
                errors.push(format!("Recipe '{}' has empty name", id));
            }
            if recipe.servings == 0 {
                errors.push(format!("Recipe '{}' has zero servings", id));
            }
            if recipe.ingredients.is_empty() {
                errors.push(format!("Recipe '{}' has no ingredients", id));
            }

            for line in &recipe.ingredients {
                if line.amount_grams <= 0.0 {
                    errors.push(format!(
                        "Recipe '{}': ingredient '{}' has non-positive amount {}",
                        id, line.ingredient_id, line.amount_grams
                    ));
                }
            }
        }

        errors
    }

    /// Problems that do not block use of the catalog
    ///
    /// Recipe lines pointing at ingredients the catalog no longer has are
    /// skipped when computing nutrition, so they are only reported here.
    pub fn warnings(&self) -> Vec<String> {
        self.recipes
            .iter()
            .flat_map(|recipe| {
                recipe
                    .ingredients
                    .iter()
                    .filter(|line| !self.ingredients.contains_key(&line.ingredient_id))
                    .map(move |line| {
                        format!(
                            "Recipe '{}' references non-existent ingredient '{}'",
                            recipe.id, line.ingredient_id
                        )
                    })
            })
            .collect()
    }
}
