use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{MealType, Restaurant};

/// One accepted recommendation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub restaurant_id: String,

    /// Name at the time of the pick; the restaurant may be renamed or deleted later.
    pub restaurant_name: String,

    pub meal_type: MealType,

    pub timestamp: DateTime<Utc>,
}

impl HistoryEntry {
    pub fn new(restaurant: &Restaurant, meal_type: MealType, timestamp: DateTime<Utc>) -> Self {
        Self {
            restaurant_id: restaurant.id.clone(),
            restaurant_name: restaurant.name.clone(),
            meal_type,
            timestamp,
        }
    }
}
