use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::Tier;

/// Meal slot a restaurant can be recommended for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MealType {
    Breakfast,
    Lunch,
    Dinner,
    Snack,
}

impl MealType {
    pub const ALL: [MealType; 4] = [
        MealType::Breakfast,
        MealType::Lunch,
        MealType::Dinner,
        MealType::Snack,
    ];

    pub fn name(self) -> &'static str {
        match self {
            MealType::Breakfast => "breakfast",
            MealType::Lunch => "lunch",
            MealType::Dinner => "dinner",
            MealType::Snack => "snack",
        }
    }
}

impl fmt::Display for MealType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for MealType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MealType::ALL
            .into_iter()
            .find(|m| m.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                format!("unknown meal type '{s}' (expected breakfast, lunch, dinner or snack)")
            })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Feedback {
    Positive,
    Negative,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedbackEntry {
    pub feedback: Feedback,
    pub timestamp: DateTime<Utc>,
}

/// A restaurant the user can be sent to, with its ranking state.
///
/// `dynamic_weight` is the sub-tier momentum left over after feedback has been
/// converted into whole tier steps; see [`crate::selection::apply_weight_adjustment`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Restaurant {
    pub id: String,

    pub name: String,

    pub tier: Tier,

    /// Missing in malformed records; an empty set never matches a meal filter.
    #[serde(default)]
    pub meal_types: BTreeSet<MealType>,

    #[serde(default)]
    pub dynamic_weight: f64,

    /// Tier at creation time, kept for export only.
    pub original_tier: Tier,

    #[serde(default)]
    pub last_selected: Option<DateTime<Utc>>,

    #[serde(default)]
    pub selection_count: u32,

    #[serde(default)]
    pub feedback_history: Vec<FeedbackEntry>,
}

impl Restaurant {
    /// Create a fresh restaurant with a random id and neutral ranking state.
    pub fn new(
        name: impl Into<String>,
        tier: Tier,
        meal_types: impl IntoIterator<Item = MealType>,
    ) -> Self {
        Self::with_id(Uuid::new_v4().to_string(), name, tier, meal_types)
    }

    /// Create a restaurant with a caller-chosen id.
    pub fn with_id(
        id: impl Into<String>,
        name: impl Into<String>,
        tier: Tier,
        meal_types: impl IntoIterator<Item = MealType>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            tier,
            meal_types: meal_types.into_iter().collect(),
            dynamic_weight: 0.0,
            original_tier: tier,
            last_selected: None,
            selection_count: 0,
            feedback_history: Vec::new(),
        }
    }

    #[inline]
    pub fn serves(&self, meal_type: MealType) -> bool {
        self.meal_types.contains(&meal_type)
    }

    /// Well-formedness check for records coming from storage or user input.
    ///
    /// The residual must sit strictly inside (-1, 1); anything else was not
    /// produced by a weight adjustment.
    pub fn is_valid(&self) -> bool {
        !self.id.is_empty()
            && !self.name.trim().is_empty()
            && !self.meal_types.is_empty()
            && self.dynamic_weight.abs() < 1.0
    }

    /// Canonical key for name lookups (lowercase, trimmed).
    pub fn name_key(&self) -> String {
        self.name.trim().to_lowercase()
    }

    /// Comma-separated meal types for display and export.
    pub fn meal_types_label(&self) -> String {
        self.meal_types
            .iter()
            .map(|m| m.name())
            .collect::<Vec<_>>()
            .join(",")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_defaults() {
        let r = Restaurant::new("Noodle Bar", Tier::Top, [MealType::Lunch, MealType::Dinner]);
        assert!(!r.id.is_empty());
        assert_eq!(r.original_tier, Tier::Top);
        assert_eq!(r.dynamic_weight, 0.0);
        assert_eq!(r.selection_count, 0);
        assert!(r.last_selected.is_none());
        assert!(r.serves(MealType::Lunch));
        assert!(!r.serves(MealType::Breakfast));
    }

    #[test]
    fn test_ids_unique() {
        let a = Restaurant::new("A", Tier::Npc, [MealType::Lunch]);
        let b = Restaurant::new("A", Tier::Npc, [MealType::Lunch]);
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_is_valid() {
        let r = Restaurant::with_id("r1", "Deli", Tier::Npc, [MealType::Lunch]);
        assert!(r.is_valid());

        let mut blank = r.clone();
        blank.name = "   ".to_string();
        assert!(!blank.is_valid());

        let no_meals = Restaurant::with_id("r2", "Deli", Tier::Npc, Vec::<MealType>::new());
        assert!(!no_meals.is_valid());

        let mut runaway = r.clone();
        runaway.dynamic_weight = 1e308;
        assert!(!runaway.is_valid());
        runaway.dynamic_weight = -1.0;
        assert!(!runaway.is_valid());
        runaway.dynamic_weight = f64::NAN;
        assert!(!runaway.is_valid());
        runaway.dynamic_weight = -0.5;
        assert!(runaway.is_valid());
    }

    #[test]
    fn test_missing_meal_types_deserializes_empty() {
        let json = r#"{"id": "x", "name": "Ghost", "tier": "Top", "originalTier": "Top"}"#;
        let r: Restaurant = serde_json::from_str(json).unwrap();
        assert!(r.meal_types.is_empty());
        assert!(!r.is_valid());
        assert!(!r.serves(MealType::Lunch));
    }

    #[test]
    fn test_camel_case_keys() {
        let r = Restaurant::with_id("r1", "Deli", Tier::Npc, [MealType::Lunch]);
        let json = serde_json::to_value(&r).unwrap();
        assert!(json.get("mealTypes").is_some());
        assert!(json.get("dynamicWeight").is_some());
        assert!(json.get("feedbackHistory").is_some());
        assert_eq!(json["tier"], "NPC");
    }

    #[test]
    fn test_meal_type_parse() {
        assert_eq!("Dinner".parse::<MealType>().unwrap(), MealType::Dinner);
        assert!("brunch".parse::<MealType>().is_err());
    }
}
