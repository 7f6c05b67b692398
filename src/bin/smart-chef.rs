//! Command-line front end for the smart_chef library.
//!
//! ```bash
//! smart-chef recipes "دجاج، أرز، طماطم" --restrictions "بدون بصل" --save 1
//! smart-chef plan --goal weight_loss
//! smart-chef profile set-health --age 30 --weight 75 --height 170 --gender male --activity moderate
//! smart-chef image <recipe-id>
//! smart-chef edit-image <recipe-id> "أضف البقدونس"
//! smart-chef favorites
//! ```

use std::path::PathBuf;

use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::info;
use tracing_subscriber::EnvFilter;

use smart_chef::image::ImageSource;
use smart_chef::models::{
    ActivityLevel, Gender, PlanGoalId, Recipe, UserHealthData, WeeklyPlan, PLAN_GOALS,
};
use smart_chef::profile::{FavoriteChange, FileStore, ProfileStore};
use smart_chef::prompts::merge_restrictions;
use smart_chef::{ChefClient, ChefConfig};

#[derive(Parser)]
#[command(name = "smart-chef", about = "Recipes and weekly meal plans from what you have")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Profile storage directory
    #[arg(long, global = true, env = "SMART_CHEF_DATA_DIR")]
    data_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Command {
    /// Suggest recipes from the listed ingredients
    Recipes {
        ingredients: String,

        /// Restrictions for this search only, added to the saved ones
        #[arg(long, default_value = "")]
        restrictions: String,

        /// Favorite the Nth result (1-based); may be repeated
        #[arg(long)]
        save: Vec<usize>,
    },

    /// Build a seven-day meal plan
    Plan {
        #[arg(long, value_enum, default_value_t = GoalArg::Healthy)]
        goal: GoalArg,
    },

    /// Generate a photo for a favorited recipe
    Image { recipe_id: String },

    /// Edit the generated photo of a favorited recipe
    EditImage {
        recipe_id: String,
        instruction: String,
    },

    /// List favorited recipes
    Favorites,

    /// Remove a recipe from favorites
    Unfavorite { recipe_id: String },

    /// Show or change the saved profile
    Profile {
        #[command(subcommand)]
        action: ProfileCommand,
    },
}

#[derive(Subcommand)]
enum ProfileCommand {
    Show,
    SetRestrictions {
        restrictions: String,
    },
    SetHealth {
        #[arg(long)]
        age: Option<u32>,
        #[arg(long)]
        weight: Option<f64>,
        #[arg(long)]
        height: Option<f64>,
        #[arg(long, value_enum)]
        gender: Option<GenderArg>,
        #[arg(long, value_enum)]
        activity: Option<ActivityArg>,
    },
    ClearHealth,
    SetImages {
        #[arg(action = clap::ArgAction::Set)]
        show: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum GoalArg {
    WeightLoss,
    WeightGain,
    Maintain,
    Healthy,
}

impl From<GoalArg> for PlanGoalId {
    fn from(goal: GoalArg) -> Self {
        match goal {
            GoalArg::WeightLoss => PlanGoalId::WeightLoss,
            GoalArg::WeightGain => PlanGoalId::WeightGain,
            GoalArg::Maintain => PlanGoalId::Maintain,
            GoalArg::Healthy => PlanGoalId::Healthy,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum GenderArg {
    Male,
    Female,
}

#[derive(Clone, Copy, ValueEnum)]
enum ActivityArg {
    Sedentary,
    Light,
    Moderate,
    Active,
    VeryActive,
}

impl From<ActivityArg> for ActivityLevel {
    fn from(level: ActivityArg) -> Self {
        match level {
            ActivityArg::Sedentary => ActivityLevel::Sedentary,
            ActivityArg::Light => ActivityLevel::Light,
            ActivityArg::Moderate => ActivityLevel::Moderate,
            ActivityArg::Active => ActivityLevel::Active,
            ActivityArg::VeryActive => ActivityLevel::VeryActive,
        }
    }
}

fn print_recipe(index: usize, recipe: &Recipe, show_images: bool, favorite: bool) {
    let star = if favorite { " ♥" } else { "" };
    println!("{}. {} [{}]{}", index, recipe.name, recipe.id, star);
    let calories = recipe
        .calories
        .map(|c| format!(" · {} سعرة", c))
        .unwrap_or_default();
    println!("   {} · {}{}", recipe.time, recipe.difficulty.label(), calories);
    if !recipe.description.is_empty() {
        println!("   {}", recipe.description);
    }
    match recipe.image_source(show_images) {
        Some(ImageSource::Custom(_)) => println!("   صورة: مولدة"),
        Some(ImageSource::Placeholder(url)) => println!("   صورة: {}", url),
        None => {}
    }
    println!("   المكونات:");
    for ingredient in &recipe.ingredients {
        println!("     - {}", ingredient);
    }
    if let Some(subs) = recipe.substitutes.as_ref().filter(|s| !s.is_empty()) {
        println!("   البدائل:");
        for sub in subs {
            println!("     - {} ← {}", sub.original, sub.replacement);
        }
    }
    println!("   الخطوات:");
    for (step, instruction) in recipe.instructions.iter().enumerate() {
        println!("     {}. {}", step + 1, instruction);
    }
    println!();
}

fn print_plan(plan: &WeeklyPlan) {
    if let Some(summary) = &plan.nutrition_summary {
        if let (Some(bmr), Some(tdee)) = (summary.bmr, summary.tdee) {
            println!("BMR: {}  TDEE: {}", bmr, tdee);
        }
        println!("السعرات المستهدفة يومياً: {}", summary.target_daily_calories);
        println!("{}", summary.macro_advice);
        println!();
    }
    for day in &plan.days {
        println!("{} ({} سعرة)", day.day, day.total_calories);
        for meal in &day.meals {
            println!(
                "  {}: {} ({} سعرة) {}",
                meal.meal_type.label(),
                meal.name,
                meal.calories,
                meal.description
            );
        }
    }
}

/// The recipe at 1-based position `n`.
fn nth_recipe(recipes: &[Recipe], n: usize) -> Option<&Recipe> {
    n.checked_sub(1).and_then(|i| recipes.get(i))
}

fn favorite_recipe(store: &ProfileStore<FileStore>, recipe_id: &str) -> Result<Recipe> {
    store
        .profile()
        .favorite(recipe_id)
        .cloned()
        .ok_or_else(|| anyhow!("no favorite recipe with id {}", recipe_id))
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("smart_chef=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut config = ChefConfig::from_env();
    if let Some(dir) = cli.data_dir {
        config.data_dir = dir;
    }

    let mut store = ProfileStore::open(FileStore::new(&config.data_dir));
    store.subscribe(|profile| {
        info!(
            favorites = profile.favorites.len(),
            health_complete = profile.is_health_data_complete(),
            "profile updated"
        );
    });
    let client = ChefClient::new(config);

    match cli.command {
        Command::Recipes {
            ingredients,
            restrictions,
            save,
        } => {
            let merged = merge_restrictions(&store.profile().saved_restrictions, &restrictions);
            let recipes = client.generate_recipes(&ingredients, &merged).await?;
            for (idx, recipe) in recipes.iter().enumerate() {
                let favorite = store.profile().is_favorite(&recipe.id);
                print_recipe(idx + 1, recipe, store.profile().show_images, favorite);
            }
            for n in save {
                let recipe = nth_recipe(&recipes, n)
                    .ok_or_else(|| anyhow!("no recipe number {}", n))?;
                if !store.profile().is_favorite(&recipe.id) {
                    store.toggle_favorite(recipe)?;
                    println!("تم حفظ \"{}\" في المفضلة", recipe.name);
                }
            }
        }
        Command::Plan { goal } => {
            let goal = PlanGoalId::from(goal);
            if !store.profile().is_health_data_complete() {
                eprintln!("يفضل إكمال بياناتك الصحية في الملف الشخصي للحصول على خطة أدق.");
            }
            let profile = store.profile();
            println!("{}: {}", goal.goal().label, goal.goal().description);
            let plan = client
                .generate_weekly_plan(goal, &profile.saved_restrictions, profile.health_data.as_ref())
                .await?;
            print_plan(&plan);
        }
        Command::Image { recipe_id } => {
            let mut recipe = favorite_recipe(&store, &recipe_id)?;
            client.generate_recipe_image(&mut recipe).await?;
            store.set_favorite_image(&recipe.id, recipe.custom_image.clone())?;
            println!("تم توليد صورة لـ \"{}\"", recipe.name);
        }
        Command::EditImage {
            recipe_id,
            instruction,
        } => {
            let mut recipe = favorite_recipe(&store, &recipe_id)?;
            client.edit_recipe_image(&mut recipe, &instruction).await?;
            store.set_favorite_image(&recipe.id, recipe.custom_image.clone())?;
            println!("تم تعديل صورة \"{}\"", recipe.name);
        }
        Command::Favorites => {
            let profile = store.profile();
            if profile.favorites.is_empty() {
                println!("لا توجد وصفات مفضلة بعد.");
            }
            for (idx, recipe) in profile.favorites.iter().enumerate() {
                print_recipe(idx + 1, recipe, profile.show_images, true);
            }
        }
        Command::Unfavorite { recipe_id } => {
            let recipe = favorite_recipe(&store, &recipe_id)?;
            if store.toggle_favorite(&recipe)? == FavoriteChange::Removed {
                println!("تمت إزالة \"{}\" من المفضلة", recipe.name);
            }
        }
        Command::Profile { action } => match action {
            ProfileCommand::Show => {
                let profile = store.profile();
                println!("القيود المحفوظة: {}", profile.saved_restrictions);
                println!("المفضلة: {}", profile.favorites.len());
                println!("عرض الصور: {}", profile.show_images);
                match &profile.health_data {
                    Some(h) => println!(
                        "البيانات الصحية: العمر {:?}، الوزن {:?}، الطول {:?}، الجنس {:?}، النشاط {}",
                        h.age,
                        h.weight,
                        h.height,
                        h.gender.map(|g| g.label()),
                        h.activity_level.map(|a| a.label()).unwrap_or("-")
                    ),
                    None => println!("البيانات الصحية: غير مكتملة"),
                }
                println!();
                for goal in &PLAN_GOALS {
                    println!("{} ({}): {}", goal.label, goal.id.as_str(), goal.description);
                }
            }
            ProfileCommand::SetRestrictions { restrictions } => {
                store.set_saved_restrictions(restrictions.trim())?;
            }
            ProfileCommand::SetHealth {
                age,
                weight,
                height,
                gender,
                activity,
            } => {
                let mut health = store.profile().health_data.clone().unwrap_or_default();
                health.age = age.or(health.age);
                health.weight = weight.or(health.weight);
                health.height = height.or(health.height);
                health.gender = gender
                    .map(|g| match g {
                        GenderArg::Male => Gender::Male,
                        GenderArg::Female => Gender::Female,
                    })
                    .or(health.gender);
                health.activity_level = activity.map(ActivityLevel::from).or(health.activity_level);
                store.set_health_data(Some(health))?;
            }
            ProfileCommand::ClearHealth => {
                store.set_health_data(None::<UserHealthData>)?;
            }
            ProfileCommand::SetImages { show } => {
                store.set_show_images(show)?;
            }
        },
    }

    Ok(())
}
