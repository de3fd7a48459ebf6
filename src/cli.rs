use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::models::{MealType, Tier};

/// where_to_eat — pick a restaurant from your own tier list, weighted by how much you like it.
#[derive(Parser, Debug)]
#[command(name = "where_to_eat")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Path to the picker state JSON file.
    #[arg(short, long, default_value = "picker_state.json")]
    pub file: PathBuf,

    /// Optional JSON file overriding selection knobs.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Log debug output to stderr (overridden by WHERE_TO_EAT_LOG).
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Get a recommendation and walk through rerolls until you accept one.
    Pick {
        #[arg(short, long, default_value = "lunch")]
        meal: MealType,
    },

    /// List restaurants with their current weights.
    List {
        /// Only show restaurants serving this meal.
        #[arg(short, long)]
        meal: Option<MealType>,
    },

    /// Add a restaurant. Prompts for anything not given.
    Add {
        #[arg(short, long)]
        name: Option<String>,

        #[arg(short, long)]
        tier: Option<Tier>,

        /// Meal types served (repeatable).
        #[arg(short, long = "meal")]
        meals: Vec<MealType>,
    },

    /// Delete a restaurant.
    Remove { name: String },

    /// Rename a restaurant.
    Rename { name: String, new_name: String },

    /// Move a restaurant to another tier.
    Retier { name: String, tier: Tier },

    /// Tell the picker how a visit went.
    Feedback {
        name: String,

        /// The visit was good.
        #[arg(long, conflicts_with = "bad", required_unless_present = "bad")]
        good: bool,

        /// The visit was bad.
        #[arg(long)]
        bad: bool,
    },

    /// Show recent picks.
    History {
        #[arg(short, long, default_value = "10")]
        limit: usize,
    },

    /// Draw many recommendations and show how often each restaurant comes up.
    Simulate {
        #[arg(short, long, default_value = "lunch")]
        meal: MealType,

        #[arg(short, long, default_value = "1000")]
        draws: u32,

        /// Random seed for reproducibility.
        #[arg(short, long, default_value = "123")]
        seed: u64,
    },

    /// Export restaurants to CSV.
    Export { path: PathBuf },
}

impl Default for Command {
    fn default() -> Self {
        Command::Pick {
            meal: MealType::Lunch,
        }
    }
}
