use std::collections::HashMap;

use tracing::debug;

use crate::error::{PickError, Result};
use crate::models::{HistoryEntry, Restaurant, Tier};

/// Storage capabilities the selection flow relies on.
///
/// The core never calls this directly; callers load a snapshot with
/// `get_all` and write back whatever a transition returns.
pub trait RestaurantRepository {
    fn get_all(&self) -> Vec<Restaurant>;
    fn get_by_id(&self, id: &str) -> Option<&Restaurant>;
    fn upsert(&mut self, restaurant: Restaurant);
    fn delete(&mut self, id: &str) -> Option<Restaurant>;
}

/// In-memory restaurant catalog plus pick history.
#[derive(Debug, Default)]
pub struct RestaurantStore {
    /// Restaurants keyed by id.
    restaurants: HashMap<String, Restaurant>,
    history: Vec<HistoryEntry>,
}

impl RestaurantStore {
    pub fn new(restaurants: Vec<Restaurant>, history: Vec<HistoryEntry>) -> Self {
        let restaurants = restaurants
            .into_iter()
            .map(|r| (r.id.clone(), r))
            .collect();
        Self {
            restaurants,
            history,
        }
    }

    /// Find a restaurant by name (case-insensitive).
    pub fn find_by_name(&self, name: &str) -> Option<&Restaurant> {
        let key = name.trim().to_lowercase();
        self.restaurants.values().find(|r| r.name_key() == key)
    }

    /// Add a new restaurant; names must be unique (case-insensitive).
    pub fn add(&mut self, restaurant: Restaurant) -> Result<()> {
        if !restaurant.is_valid() {
            return Err(PickError::InvalidInput(format!(
                "'{}' needs a name and at least one meal type",
                restaurant.name
            )));
        }
        if self.find_by_name(&restaurant.name).is_some() {
            return Err(PickError::InvalidInput(format!(
                "a restaurant named '{}' already exists",
                restaurant.name
            )));
        }
        self.upsert(restaurant);
        Ok(())
    }

    pub fn rename(&mut self, id: &str, new_name: &str) -> Result<()> {
        let new_name = new_name.trim();
        if new_name.is_empty() {
            return Err(PickError::InvalidInput("name cannot be empty".to_string()));
        }
        if self
            .find_by_name(new_name)
            .is_some_and(|other| other.id != id)
        {
            return Err(PickError::InvalidInput(format!(
                "a restaurant named '{}' already exists",
                new_name
            )));
        }
        let restaurant = self.get_mut(id)?;
        restaurant.name = new_name.to_string();
        Ok(())
    }

    /// Manually move a restaurant to `tier`; accumulated momentum is dropped.
    pub fn retier(&mut self, id: &str, tier: Tier) -> Result<()> {
        let restaurant = self.get_mut(id)?;
        debug!(id, from = %restaurant.tier, to = %tier, "manual retier");
        restaurant.tier = tier;
        restaurant.dynamic_weight = 0.0;
        Ok(())
    }

    /// Persist every record returned by a weight update or reselection step.
    pub fn apply_updates(&mut self, updates: impl IntoIterator<Item = Restaurant>) {
        for restaurant in updates {
            self.upsert(restaurant);
        }
    }

    pub fn record_history(&mut self, entry: HistoryEntry) {
        self.history.push(entry);
    }

    /// History, oldest first.
    pub fn history(&self) -> &[HistoryEntry] {
        &self.history
    }

    pub fn len(&self) -> usize {
        self.restaurants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.restaurants.is_empty()
    }

    fn get_mut(&mut self, id: &str) -> Result<&mut Restaurant> {
        self.restaurants
            .get_mut(id)
            .ok_or_else(|| PickError::RestaurantNotFound(id.to_string()))
    }
}

impl RestaurantRepository for RestaurantStore {
    /// Snapshot sorted by tier (highest first), then name.
    fn get_all(&self) -> Vec<Restaurant> {
        let mut all: Vec<Restaurant> = self.restaurants.values().cloned().collect();
        all.sort_by(|a, b| a.tier.cmp(&b.tier).then_with(|| a.name_key().cmp(&b.name_key())));
        all
    }

    fn get_by_id(&self, id: &str) -> Option<&Restaurant> {
        self.restaurants.get(id)
    }

    fn upsert(&mut self, restaurant: Restaurant) {
        self.restaurants.insert(restaurant.id.clone(), restaurant);
    }

    fn delete(&mut self, id: &str) -> Option<Restaurant> {
        self.restaurants.remove(id)
    }
}
