use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::Result;
use crate::models::{HistoryEntry, Restaurant};
use crate::state::manager::{RestaurantRepository, RestaurantStore};

/// On-disk layout: one JSON document with both collections.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct PickerState {
    #[serde(default)]
    pub restaurants: Vec<Restaurant>,

    #[serde(default)]
    pub history: Vec<HistoryEntry>,
}

fn dedup_by_id(restaurants: Vec<Restaurant>) -> Vec<Restaurant> {
    let mut order: Vec<String> = Vec::new();
    let mut seen: HashMap<String, Restaurant> = HashMap::new();
    for restaurant in restaurants {
        if !seen.contains_key(&restaurant.id) {
            order.push(restaurant.id.clone());
        }
        seen.insert(restaurant.id.clone(), restaurant);
    }
    order
        .into_iter()
        .filter_map(|id| seen.remove(&id))
        .collect()
}

/// Load picker state from a JSON file.
///
/// A missing file is an empty state. Duplicate ids collapse to the last occurrence.
pub fn load_state<P: AsRef<Path>>(path: P) -> Result<PickerState> {
    let path = path.as_ref();
    if !path.exists() {
        debug!(path = %path.display(), "state file missing, starting empty");
        return Ok(PickerState::default());
    }

    let content = fs::read_to_string(path)?;
    let mut state: PickerState = serde_json::from_str(&content)?;
    state.restaurants = dedup_by_id(state.restaurants);

    let malformed = state.restaurants.iter().filter(|r| !r.is_valid()).count();
    if malformed > 0 {
        warn!(malformed, "state contains malformed restaurant records");
    }

    Ok(state)
}

/// Save picker state to a JSON file.
pub fn save_state<P: AsRef<Path>>(path: P, state: &PickerState) -> Result<()> {
    let json = serde_json::to_string_pretty(state)?;
    fs::write(path, json)?;
    Ok(())
}

/// Load the state file straight into a store.
pub fn open_store<P: AsRef<Path>>(path: P) -> Result<RestaurantStore> {
    let state = load_state(path)?;
    Ok(RestaurantStore::new(state.restaurants, state.history))
}

/// Write the store's current catalog and history; the store stays usable.
pub fn save_store<P: AsRef<Path>>(path: P, store: &RestaurantStore) -> Result<()> {
    save_state(
        path,
        &PickerState {
            restaurants: store.get_all(),
            history: store.history().to_vec(),
        },
    )
}

/// Export restaurants to CSV, one row per restaurant.
pub fn export_csv<P: AsRef<Path>>(path: P, restaurants: &[Restaurant]) -> Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;

    wtr.write_record([
        "id",
        "name",
        "tier",
        "original_tier",
        "meal_types",
        "dynamic_weight",
        "selection_count",
        "last_selected",
    ])?;

    for r in restaurants {
        wtr.write_record([
            r.id.clone(),
            r.name.clone(),
            r.tier.to_string(),
            r.original_tier.to_string(),
            r.meal_types_label(),
            format!("{:.3}", r.dynamic_weight),
            r.selection_count.to_string(),
            r.last_selected.map(|t| t.to_rfc3339()).unwrap_or_default(),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{MealType, Tier};
    use std::io::Write;
    use tempfile::{NamedTempFile, tempdir};

    #[test]
    fn test_load_and_save_roundtrip() {
        let json = r#"{
            "restaurants": [
                {"id": "a1", "name": "Pho 88", "tier": "Top", "mealTypes": ["lunch", "dinner"],
                 "dynamicWeight": 0.5, "originalTier": "NPC", "lastSelected": null,
                 "selectionCount": 3, "feedbackHistory": []}
            ],
            "history": []
        }"#;

        let mut file = NamedTempFile::new().unwrap();
        file.write_all(json.as_bytes()).unwrap();

        let state = load_state(file.path()).unwrap();
        assert_eq!(state.restaurants.len(), 1);
        assert_eq!(state.restaurants[0].original_tier, Tier::Npc);
        assert_eq!(state.restaurants[0].selection_count, 3);

        let out_file = NamedTempFile::new().unwrap();
        save_state(out_file.path(), &state).unwrap();

        let reloaded = load_state(out_file.path()).unwrap();
        assert_eq!(reloaded.restaurants, state.restaurants);
    }

    #[test]
    fn test_deduplication_last_wins() {
        let json = r#"{"restaurants": [
            {"id": "a1", "name": "Pho 88", "tier": "Top", "mealTypes": ["lunch"], "originalTier": "Top"},
            {"id": "b2", "name": "Deli", "tier": "NPC", "mealTypes": ["lunch"], "originalTier": "NPC"},
            {"id": "a1", "name": "Pho 88", "tier": "Hang", "mealTypes": ["lunch"], "originalTier": "Top"}
        ]}"#;

        let mut file = NamedTempFile::new().unwrap();
        file.write_all(json.as_bytes()).unwrap();

        let state = load_state(file.path()).unwrap();
        assert_eq!(state.restaurants.len(), 2);
        assert_eq!(state.restaurants[0].id, "a1");
        assert_eq!(state.restaurants[0].tier, Tier::Hang);
    }

    #[test]
    fn test_runaway_weight_loads_as_malformed() {
        let json = r#"{"restaurants": [
            {"id": "a1", "name": "Pho 88", "tier": "Top", "mealTypes": ["lunch"],
             "originalTier": "Top", "dynamicWeight": 1e308}
        ]}"#;

        let mut file = NamedTempFile::new().unwrap();
        file.write_all(json.as_bytes()).unwrap();

        let state = load_state(file.path()).unwrap();
        assert_eq!(state.restaurants.len(), 1);
        assert!(!state.restaurants[0].is_valid());
    }

    #[test]
    fn test_save_store_keeps_updates_between_steps() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("state.json");
        let mut store = RestaurantStore::new(
            vec![Restaurant::with_id("a1", "Pho 88", Tier::Top, [MealType::Lunch])],
            Vec::new(),
        );

        let mut penalized = store.get_by_id("a1").unwrap().clone();
        penalized.dynamic_weight = -0.5;
        store.apply_updates([penalized]);
        save_store(&path, &store).unwrap();

        // The in-memory store is gone before the flow finishes.
        drop(store);

        let reopened = open_store(&path).unwrap();
        assert_eq!(reopened.get_by_id("a1").unwrap().dynamic_weight, -0.5);
        assert_eq!(reopened.len(), 1);
    }

    #[test]
    fn test_missing_file_is_empty() {
        let dir = tempdir().unwrap();
        let state = load_state(dir.path().join("nope.json")).unwrap();
        assert!(state.restaurants.is_empty());
        assert!(state.history.is_empty());
    }

    #[test]
    fn test_export_csv() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.csv");
        let mut r = Restaurant::with_id("a1", "Pho 88", Tier::Top, [MealType::Lunch, MealType::Dinner]);
        r.tier = Tier::Hang;

        export_csv(&path, &[r]).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("id,name,tier,original_tier"));
        assert!(lines[1].starts_with("a1,Pho 88,Hang,Top,\"lunch,dinner\""));
    }
}
