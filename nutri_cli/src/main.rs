use chrono::{Local, NaiveDate};
use clap::{ArgAction, Parser, Subcommand};
use nutri_core::config::DataConfig;
use nutri_core::diary::{self, DailyProgress};
use nutri_core::history::{self, CalculationRecord};
use nutri_core::*;
use std::collections::HashSet;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "nutri")]
#[command(about = "Macro calculator and recipe planner", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Override data directory
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Use this config file instead of the default location
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// More log output (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Calculate daily calorie and macro targets
    Macros {
        /// Body weight in kg
        #[arg(long)]
        weight: Option<f64>,

        /// Height in cm
        #[arg(long)]
        height: Option<f64>,

        /// Age in years
        #[arg(long)]
        age: Option<u32>,

        /// male or female
        #[arg(long)]
        sex: Option<Sex>,

        /// Activity level name (sedentary..extra_active) or multiplier
        #[arg(long, value_parser = parse_activity)]
        activity: Option<f64>,

        /// lose, maintain or gain
        #[arg(long)]
        goal: Option<Goal>,

        /// Macro split (percentage, weight_based); defaults to config
        #[arg(long)]
        split: Option<MacroSplit>,

        /// Save the calculation to history and the metrics to the profile
        #[arg(long)]
        save: bool,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Suggest recipes for the ingredients you have
    Suggest {
        /// Ingredient ids (space or comma separated)
        #[arg(required = true, num_args = 1.., value_delimiter = ',')]
        ingredients: Vec<String>,

        /// Maximum number of recipes to show
        #[arg(long)]
        limit: Option<usize>,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Show a recipe with its nutrition
    Recipe {
        id: String,
    },

    /// List catalog ingredients
    Ingredients,

    /// Add food to the diary
    Log {
        #[command(subcommand)]
        target: LogTarget,
    },

    /// Diary totals for a day against your latest saved targets
    Today {
        /// Day to show (YYYY-MM-DD), defaults to today
        #[arg(long)]
        date: Option<NaiveDate>,
    },

    /// Show saved calculations
    History {
        /// How many days back to show
        #[arg(long, default_value_t = 30)]
        days: i64,
    },

    /// Save a recipe to your list
    SaveRecipe { id: String },

    /// Remove a recipe from your list
    UnsaveRecipe { id: String },

    /// Show saved recipes
    Saved,

    /// Export calculation history to CSV
    Export,
}

#[derive(Subcommand)]
enum LogTarget {
    /// Servings of a catalog recipe
    Recipe {
        id: String,

        #[arg(long, default_value_t = 1.0)]
        servings: f64,

        /// Day to log on (YYYY-MM-DD), defaults to today
        #[arg(long)]
        date: Option<NaiveDate>,
    },

    /// Grams of a catalog ingredient
    Ingredient {
        id: String,

        #[arg(long)]
        grams: f64,

        /// Day to log on (YYYY-MM-DD), defaults to today
        #[arg(long)]
        date: Option<NaiveDate>,
    },
}

fn parse_activity(s: &str) -> std::result::Result<f64, String> {
    if let Ok(level) = s.parse::<ActivityLevel>() {
        return Ok(level.multiplier());
    }
    s.parse::<f64>()
        .map_err(|_| format!("'{}' is neither an activity level nor a number", s))
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    nutri_core::logging::init_with_verbosity(cli.verbose);

    let config = match &cli.config {
        Some(path) => Config::load_or_default(path)?,
        None => Config::load()?,
    };
    let data = DataConfig {
        data_dir: cli
            .data_dir
            .clone()
            .unwrap_or_else(|| config.data.data_dir.clone()),
    };
    tracing::debug!(
        "Using data dir {:?}, config {:?}",
        data.data_dir,
        cli.config.clone().unwrap_or_else(Config::default_config_path)
    );

    match cli.command {
        Commands::Macros {
            weight,
            height,
            age,
            sex,
            activity,
            goal,
            split,
            save,
            json,
        } => {
            let input = MetricsInput {
                weight,
                height,
                age,
                sex,
                activity,
                goal,
            };
            let split = split.unwrap_or(config.calculator.macro_split);
            cmd_macros(&data, input, split, save, json)
        }
        Commands::Suggest {
            ingredients,
            limit,
            json,
        } => {
            let catalog = config.load_catalog()?;
            let limit = limit.unwrap_or(config.suggestions.limit);
            cmd_suggest(&catalog, ingredients, limit, json)
        }
        Commands::Recipe { id } => cmd_recipe(&config.load_catalog()?, &id),
        Commands::Ingredients => {
            cmd_ingredients(&config.load_catalog()?);
            Ok(())
        }
        Commands::Log { target } => cmd_log(&data, &config.load_catalog()?, target),
        Commands::Today { date } => cmd_today(&data, date.unwrap_or_else(today)),
        Commands::History { days } => cmd_history(&data, days),
        Commands::SaveRecipe { id } => cmd_save_recipe(&data, &config.load_catalog()?, &id),
        Commands::UnsaveRecipe { id } => cmd_unsave_recipe(&data, &id),
        Commands::Saved => cmd_saved(&data, &config.load_catalog()?),
        Commands::Export => cmd_export(&data),
    }
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Metrics as given on the command line; gaps are filled from the profile
struct MetricsInput {
    weight: Option<f64>,
    height: Option<f64>,
    age: Option<u32>,
    sex: Option<Sex>,
    activity: Option<f64>,
    goal: Option<Goal>,
}

impl MetricsInput {
    fn resolve(self, saved: Option<&UserMetrics>) -> Result<UserMetrics> {
        fn pick<T: Copy>(given: Option<T>, saved: Option<T>, flag: &str) -> Result<T> {
            given.or(saved).ok_or_else(|| {
                Error::InvalidInput(format!("--{} is required (no saved profile)", flag))
            })
        }

        Ok(UserMetrics {
            weight_kg: pick(self.weight, saved.map(|m| m.weight_kg), "weight")?,
            height_cm: pick(self.height, saved.map(|m| m.height_cm), "height")?,
            age_years: pick(self.age, saved.map(|m| m.age_years), "age")?,
            sex: pick(self.sex, saved.map(|m| m.sex), "sex")?,
            activity_multiplier: pick(
                self.activity,
                saved.map(|m| m.activity_multiplier),
                "activity",
            )?,
            goal: self
                .goal
                .or(saved.map(|m| m.goal))
                .unwrap_or(Goal::Maintain),
        })
    }
}

fn cmd_macros(
    data: &DataConfig,
    input: MetricsInput,
    split: MacroSplit,
    save: bool,
    json: bool,
) -> Result<()> {
    let profile_path = data.profile_path();
    let profile = UserProfile::load(&profile_path)?;
    let metrics = input.resolve(profile.metrics.as_ref())?;

    let problems = metrics.validate();
    if !problems.is_empty() {
        eprintln!("Invalid metrics:");
        for problem in &problems {
            eprintln!("  - {}", problem);
        }
        return Err(Error::InvalidInput(problems.join("; ")));
    }

    let energy = estimate_energy(&metrics);
    let targets = compute_macros_with(&metrics, split);
    let shown = targets.rounded();

    if json {
        let output = serde_json::json!({
            "bmr": energy.bmr.round(),
            "tdee": energy.tdee.round(),
            "calories": shown.calories,
            "protein": shown.protein,
            "carbs": shown.carbs,
            "fats": shown.fats,
            "split": split,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        let activity = metrics
            .activity_level()
            .map(|l| l.label().to_string())
            .unwrap_or_else(|| format!("x{}", metrics.activity_multiplier));

        println!("\n╭─────────────────────────────────────────╮");
        println!("│  DAILY TARGETS ({})", metrics.goal);
        println!("╰─────────────────────────────────────────╯");
        println!();
        println!(
            "  {} kg · {} cm · {} y · {} · {}",
            metrics.weight_kg, metrics.height_cm, metrics.age_years, metrics.sex, activity
        );
        println!();
        println!("  BMR:      {:>6.0} kcal", energy.bmr);
        println!("  TDEE:     {:>6.0} kcal", energy.tdee);
        println!("  Calories: {:>6.0} kcal", shown.calories);
        println!("  Protein:  {:>6.0} g", shown.protein);
        println!("  Carbs:    {:>6.0} g", shown.carbs);
        println!("  Fats:     {:>6.0} g", shown.fats);
        println!();
    }

    if save {
        let record = CalculationRecord::new(metrics.clone(), split, targets, chrono::Utc::now());
        let mut sink = JsonlSink::new(data.history_path());
        sink.append(&record)?;

        UserProfile::update(&profile_path, |p| {
            p.metrics = Some(metrics);
            Ok(())
        })?;

        if !json {
            println!("✓ Calculation saved");
        }
    }

    Ok(())
}

fn cmd_suggest(catalog: &Catalog, ingredients: Vec<String>, limit: usize, json: bool) -> Result<()> {
    let mut selected = HashSet::new();
    for id in ingredients {
        let id = id.trim().to_string();
        if id.is_empty() {
            continue;
        }
        if catalog.ingredient(&id).is_none() {
            eprintln!("Unknown ingredient: {}", id);
        }
        selected.insert(id);
    }

    let matches = score_recipes(&selected, &catalog.recipes);

    if json {
        let output: Vec<_> = matches
            .iter()
            .take(limit)
            .map(|m| {
                serde_json::json!({
                    "id": m.recipe.id,
                    "name": m.recipe.name,
                    "matched": m.matched,
                    "score": (m.score * 10.0).round() / 10.0,
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    if matches.is_empty() {
        println!("No recipes use those ingredients.");
        return Ok(());
    }

    println!();
    for (rank, m) in matches.iter().take(limit).enumerate() {
        let serving = per_serving(m.recipe, &catalog.ingredients).rounded();
        let distinct = m.recipe.ingredient_ids().collect::<HashSet<_>>().len();
        println!(
            "  {}. {} [{}]  score {:.1}, {}/{} ingredients",
            rank + 1,
            m.recipe.name,
            m.recipe.id,
            m.score,
            m.matched,
            distinct
        );
        println!(
            "     per serving: {} kcal · P {} g · C {} g · F {} g",
            serving.calories, serving.protein, serving.carbs, serving.fats
        );
    }
    println!();

    Ok(())
}

fn cmd_recipe(catalog: &Catalog, id: &str) -> Result<()> {
    let recipe = catalog
        .recipe(id)
        .ok_or_else(|| Error::UnknownRecipe(id.to_string()))?;

    let total = recipe_nutrition(recipe, &catalog.ingredients).rounded();
    let serving = per_serving(recipe, &catalog.ingredients).rounded();

    println!("\n  {} ({:?}, {} servings)", recipe.name, recipe.meal_type, recipe.servings);
    println!();
    for line in &recipe.ingredients {
        let name = catalog
            .ingredient(&line.ingredient_id)
            .map(|i| i.name.as_str())
            .unwrap_or("(unknown ingredient)");
        println!("  → {:>5} g  {}", line.amount_grams, name);
    }
    println!();
    for (step, text) in recipe.instructions.iter().enumerate() {
        println!("  {}. {}", step + 1, text);
    }
    println!();
    println!(
        "  Total:       {} kcal · P {} g · C {} g · F {} g",
        total.calories, total.protein, total.carbs, total.fats
    );
    println!(
        "  Per serving: {} kcal · P {} g · C {} g · F {} g",
        serving.calories, serving.protein, serving.carbs, serving.fats
    );
    println!();

    Ok(())
}

fn cmd_ingredients(catalog: &Catalog) {
    let mut ingredients: Vec<_> = catalog.ingredients.values().collect();
    ingredients.sort_by(|a, b| a.category.cmp(&b.category).then_with(|| a.id.cmp(&b.id)));

    for ingredient in ingredients {
        let n = &ingredient.per_100g;
        println!(
            "  {:<20} {:<10} {:>4} kcal  P {:>4} C {:>4} F {:>5}  (per 100 g)",
            ingredient.id,
            format!("{:?}", ingredient.category).to_lowercase(),
            n.calories,
            n.protein,
            n.carbs,
            n.fats
        );
    }
}

fn cmd_log(data: &DataConfig, catalog: &Catalog, target: LogTarget) -> Result<()> {
    let entry = match target {
        LogTarget::Recipe { id, servings, date } => {
            diary::entry_for_recipe(catalog, &id, servings, date.unwrap_or_else(today))?
        }
        LogTarget::Ingredient { id, grams, date } => {
            diary::entry_for_ingredient(catalog, &id, grams, date.unwrap_or_else(today))?
        }
    };

    let mut sink = JsonlSink::new(data.diary_path());
    sink.append(&entry)?;

    let n = entry.nutrition.rounded();
    println!(
        "✓ Logged for {}: {} kcal · P {} g · C {} g · F {} g",
        entry.date, n.calories, n.protein, n.carbs, n.fats
    );
    Ok(())
}

fn cmd_today(data: &DataConfig, date: NaiveDate) -> Result<()> {
    let entries = diary::load_entries(&data.diary_path())?;
    let consumed = diary::daily_totals(&entries, date);
    let count = diary::entries_on(&entries, date).len();

    println!("\n  Diary for {} ({} entries)", date, count);
    println!();

    let eaten = consumed.rounded();
    match history::latest_calculation(&data.history_path())? {
        Some(record) => {
            let progress = DailyProgress::new(record.targets, consumed);
            let targets = record.targets.rounded();
            let left = progress.remaining.rounded();
            println!("             eaten / target   left");
            println!(
                "  Calories: {:>6} / {:<6} {:>6}  ({:.0}%)",
                eaten.calories, targets.calories, left.calories, progress.calorie_percent()
            );
            println!(
                "  Protein:  {:>6} / {:<6} {:>6}  ({:.0}%)",
                eaten.protein, targets.protein, left.protein, progress.protein_percent()
            );
            println!(
                "  Carbs:    {:>6} / {:<6} {:>6}  ({:.0}%)",
                eaten.carbs, targets.carbs, left.carbs, progress.carbs_percent()
            );
            println!(
                "  Fats:     {:>6} / {:<6} {:>6}  ({:.0}%)",
                eaten.fats, targets.fats, left.fats, progress.fats_percent()
            );
        }
        None => {
            println!(
                "  Eaten: {} kcal · P {} g · C {} g · F {} g",
                eaten.calories, eaten.protein, eaten.carbs, eaten.fats
            );
            println!();
            println!("  No saved targets yet - run `nutri macros --save`.");
        }
    }
    println!();

    Ok(())
}

fn cmd_history(data: &DataConfig, days: i64) -> Result<()> {
    let records = history::load_recent_calculations(&data.history_path(), days)?;

    if records.is_empty() {
        println!("No saved calculations in the last {} days.", days);
        return Ok(());
    }

    for record in &records {
        let t = record.targets.rounded();
        println!(
            "  {}  {} kg {:<8} {} kcal · P {} g · C {} g · F {} g",
            record.recorded_at.with_timezone(&Local).format("%Y-%m-%d %H:%M"),
            record.metrics.weight_kg,
            record.metrics.goal.to_string(),
            t.calories,
            t.protein,
            t.carbs,
            t.fats
        );
    }

    Ok(())
}

fn cmd_save_recipe(data: &DataConfig, catalog: &Catalog, id: &str) -> Result<()> {
    if catalog.recipe(id).is_none() {
        return Err(Error::UnknownRecipe(id.to_string()));
    }

    let mut added = false;
    UserProfile::update(&data.profile_path(), |p| {
        added = p.save_recipe(id);
        Ok(())
    })?;

    if added {
        println!("✓ Saved {}", id);
    } else {
        println!("{} is already saved", id);
    }
    Ok(())
}

fn cmd_unsave_recipe(data: &DataConfig, id: &str) -> Result<()> {
    let mut removed = false;
    UserProfile::update(&data.profile_path(), |p| {
        removed = p.remove_recipe(id);
        Ok(())
    })?;

    if removed {
        println!("✓ Removed {}", id);
    } else {
        println!("{} was not saved", id);
    }
    Ok(())
}

fn cmd_saved(data: &DataConfig, catalog: &Catalog) -> Result<()> {
    let profile = UserProfile::load(&data.profile_path())?;

    if profile.saved_recipes.is_empty() {
        println!("No saved recipes.");
        return Ok(());
    }

    for id in &profile.saved_recipes {
        match catalog.recipe(id) {
            Some(recipe) => {
                let serving = per_serving(recipe, &catalog.ingredients).rounded();
                println!(
                    "  {:<22} {} ({} kcal per serving)",
                    recipe.id, recipe.name, serving.calories
                );
            }
            None => println!("  {:<22} (no longer in catalog)", id),
        }
    }
    Ok(())
}

fn cmd_export(data: &DataConfig) -> Result<()> {
    let csv_path = data.export_path();
    let count = nutri_core::export::export_calculations_csv(&data.history_path(), &csv_path)?;

    if count == 0 {
        println!("No saved calculations - nothing to export.");
        return Ok(());
    }

    println!("✓ Exported {} calculations", count);
    println!("  CSV: {}", csv_path.display());
    Ok(())
}
