use dialoguer::{Confirm, Input, MultiSelect, Select};
use strsim::jaro_winkler;

use crate::error::{PickError, Result};
use crate::models::{MealType, Restaurant, Tier};

/// Minimum Jaro-Winkler similarity for a fuzzy name match.
const FUZZY_MATCH_THRESHOLD: f64 = 0.7;

/// What the user wants to do with a single recommendation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Accept,
    Reject,
    Quit,
}

/// Prompt for a restaurant name.
pub fn prompt_restaurant_name() -> Result<String> {
    let input: String = Input::new()
        .with_prompt("Restaurant name")
        .interact_text()?;

    let name = input.trim();
    if name.is_empty() {
        return Err(PickError::InvalidInput("name cannot be empty".to_string()));
    }
    Ok(name.to_string())
}

/// Prompt for a tier, defaulting to NPC.
pub fn prompt_tier() -> Result<Tier> {
    let options: Vec<String> = Tier::ALL
        .iter()
        .map(|t| format!("{} (weight {})", t, t.base_weight()))
        .collect();

    let selection = Select::new()
        .with_prompt("Which tier?")
        .items(&options)
        .default(Tier::Npc.rank())
        .interact()?;

    Ok(Tier::ALL[selection])
}

/// Prompt for one or more meal types.
pub fn prompt_meal_types() -> Result<Vec<MealType>> {
    let options: Vec<&str> = MealType::ALL.iter().map(|m| m.name()).collect();

    let selections = MultiSelect::new()
        .with_prompt("Which meals does it serve? (space to toggle)")
        .items(&options)
        .interact()?;

    if selections.is_empty() {
        return Err(PickError::InvalidInput(
            "pick at least one meal type".to_string(),
        ));
    }
    Ok(selections.into_iter().map(|i| MealType::ALL[i]).collect())
}

/// Resolve a typed name to a restaurant id, with fuzzy matching.
///
/// Returns `None` when the user declines every suggestion.
pub fn resolve_restaurant(restaurants: &[Restaurant], input: &str) -> Result<Option<String>> {
    let needle = input.trim().to_lowercase();

    if let Some(exact) = restaurants.iter().find(|r| r.name_key() == needle) {
        return Ok(Some(exact.id.clone()));
    }

    let mut candidates: Vec<(&Restaurant, f64)> = restaurants
        .iter()
        .map(|r| (r, jaro_winkler(&r.name_key(), &needle)))
        .filter(|(_, score)| *score > FUZZY_MATCH_THRESHOLD)
        .collect();

    candidates.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

    match candidates.as_slice() {
        [] => Err(PickError::RestaurantNotFound(input.to_string())),
        [(only, _)] => {
            let confirm = Confirm::new()
                .with_prompt(format!("Did you mean '{}'?", only.name))
                .default(true)
                .interact()?;
            Ok(confirm.then(|| only.id.clone()))
        }
        many => {
            let options: Vec<&Restaurant> = many.iter().take(5).map(|(r, _)| *r).collect();

            let mut labels: Vec<String> = options.iter().map(|r| r.name.clone()).collect();
            labels.push("None of these".to_string());

            let selection = Select::new()
                .with_prompt("Which did you mean?")
                .items(&labels)
                .default(0)
                .interact()?;

            Ok(options.get(selection).map(|r| r.id.clone()))
        }
    }
}

/// Ask whether to go with a single recommendation.
pub fn prompt_decision(restaurant: &Restaurant) -> Result<Decision> {
    let options = ["Sounds good, let's go", "Not feeling it", "Quit"];

    let selection = Select::new()
        .with_prompt(format!("How about {} ({})?", restaurant.name, restaurant.tier))
        .items(&options)
        .default(0)
        .interact()?;

    Ok(match selection {
        0 => Decision::Accept,
        1 => Decision::Reject,
        _ => Decision::Quit,
    })
}

/// Let the user pick from several options.
///
/// Returns `Ok(Some(index))` for a pick, `Ok(None)` to skip them all.
pub fn prompt_option_choice(options: &[Restaurant], allow_skip: bool) -> Result<Option<usize>> {
    let mut labels: Vec<String> = options
        .iter()
        .map(|r| format!("{} ({})", r.name, r.tier))
        .collect();
    if allow_skip {
        labels.push("None of these".to_string());
    }

    let selection = Select::new()
        .with_prompt("Pick one")
        .items(&labels)
        .default(0)
        .interact()?;

    Ok((selection < options.len()).then_some(selection))
}

/// Prompt for yes/no confirmation.
pub fn prompt_yes_no(prompt: &str, default: bool) -> Result<bool> {
    Ok(Confirm::new()
        .with_prompt(prompt)
        .default(default)
        .interact()?)
}
