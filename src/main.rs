use std::collections::{HashMap, HashSet};
use std::path::Path;

use chrono::Utc;
use clap::Parser;
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::info;
use tracing_subscriber::EnvFilter;

use where_to_eat_rs::cli::{Cli, Command};
use where_to_eat_rs::config::{SelectionConfig, load_config};
use where_to_eat_rs::error::{PickError, Result};
use where_to_eat_rs::interface::{
    Decision, display_history, display_offer, display_restaurants, display_simulation,
    prompt_decision, prompt_meal_types, prompt_option_choice, prompt_restaurant_name, prompt_tier,
    prompt_yes_no, resolve_restaurant,
};
use where_to_eat_rs::models::{HistoryEntry, MealType, Restaurant, Tier};
use where_to_eat_rs::selection::{
    Acceptance, Offer, ReselectionSession, ReselectionStep, on_negative_feedback,
    on_positive_feedback, recommend,
};
use where_to_eat_rs::state::{
    RestaurantRepository, RestaurantStore, export_csv, open_store, save_store,
};

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Logs go to stderr; `WHERE_TO_EAT_LOG` takes precedence over `--verbose`.
fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_env("WHERE_TO_EAT_LOG").unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<()> {
    let config = load_config(cli.config.as_deref())?;
    let command = cli.command.unwrap_or_default();
    let path = cli.file.as_path();

    match command {
        Command::Pick { meal } => cmd_pick(path, meal, &config),
        Command::List { meal } => cmd_list(path, meal, &config),
        Command::Add { name, tier, meals } => cmd_add(path, name, tier, meals),
        Command::Remove { name } => cmd_remove(path, &name),
        Command::Rename { name, new_name } => cmd_rename(path, &name, &new_name),
        Command::Retier { name, tier } => cmd_retier(path, &name, tier),
        Command::Feedback { name, good, .. } => cmd_feedback(path, &name, good),
        Command::History { limit } => cmd_history(path, limit),
        Command::Simulate { meal, draws, seed } => cmd_simulate(path, meal, draws, seed, &config),
        Command::Export { path: out } => cmd_export(path, &out),
    }
}

/// Look up a restaurant id by name, with fuzzy matching.
fn lookup(store: &RestaurantStore, name: &str) -> Result<Option<String>> {
    if let Some(r) = store.find_by_name(name) {
        return Ok(Some(r.id.clone()));
    }
    resolve_restaurant(&store.get_all(), name)
}

/// Interactive recommendation flow: single pick, reroll, two options, all options.
fn cmd_pick(path: &Path, meal: MealType, config: &SelectionConfig) -> Result<()> {
    let mut store = open_store(path)?;
    if store.is_empty() {
        println!("No restaurants yet. Add one with `where_to_eat add`.");
        return Ok(());
    }

    let mut rng = StdRng::from_entropy();
    let mut session = ReselectionSession::new(meal);
    let mut offer = session.start(&store.get_all(), Utc::now(), config, &mut rng);

    let acceptance: Option<Acceptance> = loop {
        display_offer(&offer);

        match &offer {
            Offer::Exhausted => break None,
            Offer::Single(restaurant) => match prompt_decision(restaurant)? {
                Decision::Accept => break Some(session.accept(&store.get_all(), Utc::now())?),
                Decision::Quit => break None,
                Decision::Reject => {}
            },
            Offer::Options(options) => {
                let allow_skip = session.step() == ReselectionStep::TwoOptions;
                match prompt_option_choice(options, allow_skip)? {
                    Some(i) => {
                        let id = options[i].id.clone();
                        break Some(session.choose(&id, &store.get_all(), Utc::now(), config)?);
                    }
                    None if allow_skip => {}
                    None => break None,
                }
            }
        }

        let outcome = session.reject(&store.get_all(), Utc::now(), config, &mut rng)?;
        store.apply_updates(outcome.updates);
        save_store(path, &store)?;
        offer = outcome.offer;
    };

    if let Some(Acceptance { accepted, updates }) = acceptance {
        println!("Enjoy your {} at {}!", meal, accepted.name);
        info!(id = %accepted.id, %meal, "pick accepted");
        store.record_history(HistoryEntry::new(&accepted, meal, Utc::now()));
        store.apply_updates(updates);
        store.upsert(accepted);
    }

    save_store(path, &store)
}

fn cmd_list(path: &Path, meal: Option<MealType>, config: &SelectionConfig) -> Result<()> {
    let store = open_store(path)?;
    let restaurants: Vec<Restaurant> = store
        .get_all()
        .into_iter()
        .filter(|r| meal.is_none_or(|m| r.serves(m)))
        .collect();

    let title = match meal {
        Some(m) => format!("Restaurants for {}", m),
        None => "Restaurants".to_string(),
    };
    display_restaurants(&restaurants, &title, Utc::now(), config);
    Ok(())
}

fn cmd_add(
    path: &Path,
    name: Option<String>,
    tier: Option<Tier>,
    meals: Vec<MealType>,
) -> Result<()> {
    let mut store = open_store(path)?;

    let name = match name {
        Some(n) => n,
        None => prompt_restaurant_name()?,
    };
    let tier = match tier {
        Some(t) => t,
        None => prompt_tier()?,
    };
    let meals = if meals.is_empty() {
        prompt_meal_types()?
    } else {
        meals
    };

    let restaurant = Restaurant::new(name.trim(), tier, meals);
    let added = format!(
        "Added {} ({}, {}).",
        restaurant.name,
        restaurant.tier,
        restaurant.meal_types_label()
    );
    store.add(restaurant)?;
    save_store(path, &store)?;
    println!("{}", added);
    Ok(())
}

fn cmd_remove(path: &Path, name: &str) -> Result<()> {
    let mut store = open_store(path)?;
    let Some(id) = lookup(&store, name)? else {
        return Ok(());
    };

    let Some(restaurant) = store.get_by_id(&id) else {
        return Err(PickError::RestaurantNotFound(name.to_string()));
    };
    if !prompt_yes_no(&format!("Delete {}?", restaurant.name), false)? {
        return Ok(());
    }

    if let Some(removed) = store.delete(&id) {
        println!("Deleted {}.", removed.name);
    }
    save_store(path, &store)
}

fn cmd_rename(path: &Path, name: &str, new_name: &str) -> Result<()> {
    let mut store = open_store(path)?;
    let Some(id) = lookup(&store, name)? else {
        return Ok(());
    };

    store.rename(&id, new_name)?;
    println!("Renamed to {}.", new_name.trim());
    save_store(path, &store)
}

fn cmd_retier(path: &Path, name: &str, tier: Tier) -> Result<()> {
    let mut store = open_store(path)?;
    let Some(id) = lookup(&store, name)? else {
        return Ok(());
    };

    store.retier(&id, tier)?;
    println!("Moved to {}.", tier);
    save_store(path, &store)
}

fn cmd_feedback(path: &Path, name: &str, good: bool) -> Result<()> {
    let mut store = open_store(path)?;
    let Some(id) = lookup(&store, name)? else {
        return Ok(());
    };
    let restaurant = store
        .get_by_id(&id)
        .ok_or_else(|| PickError::RestaurantNotFound(name.to_string()))?;

    let updated = if good {
        on_positive_feedback(restaurant, Utc::now())
    } else {
        on_negative_feedback(restaurant, Utc::now())
    };

    if updated.tier != restaurant.tier {
        println!("{} moved from {} to {}.", updated.name, restaurant.tier, updated.tier);
    } else {
        println!("Feedback recorded for {}.", updated.name);
    }

    store.upsert(updated);
    save_store(path, &store)
}

fn cmd_history(path: &Path, limit: usize) -> Result<()> {
    let store = open_store(path)?;
    display_history(store.history(), limit);
    Ok(())
}

/// Run `recommend` many times with a seeded RNG and tally the picks.
fn cmd_simulate(
    path: &Path,
    meal: MealType,
    draws: u32,
    seed: u64,
    config: &SelectionConfig,
) -> Result<()> {
    let store = open_store(path)?;
    let all = store.get_all();
    let mut rng = StdRng::seed_from_u64(seed);
    let now = Utc::now();
    let none = HashSet::new();

    let mut counts: HashMap<&str, u32> = HashMap::new();
    let mut completed = 0;
    for _ in 0..draws {
        let Some(r) = recommend(&all, meal, &none, now, config, &mut rng) else {
            break;
        };
        *counts.entry(r.id.as_str()).or_insert(0) += 1;
        completed += 1;
    }

    let mut tally: Vec<(Restaurant, u32)> = all
        .iter()
        .filter_map(|r| counts.get(r.id.as_str()).map(|&c| (r.clone(), c)))
        .collect();
    tally.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.tier.cmp(&b.0.tier)));

    display_simulation(&tally, completed);
    Ok(())
}

fn cmd_export(path: &Path, out: &Path) -> Result<()> {
    let store = open_store(path)?;
    let all = store.get_all();
    export_csv(out, &all)?;
    println!("Exported {} restaurants to {}.", all.len(), out.display());
    Ok(())
}
