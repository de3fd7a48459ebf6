use std::collections::HashSet;
use std::fmt;

use chrono::{DateTime, Utc};
use rand::Rng;
use tracing::{debug, info, warn};

use crate::config::SelectionConfig;
use crate::error::{PickError, Result};
use crate::models::{MealType, Restaurant};
use crate::selection::pool::{recommend, top_tiers_shortlist};
use crate::selection::weights::{apply_weight_adjustment, record_selection};

/// Where the user is in the "didn't like it" flow. Only ever moves forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum ReselectionStep {
    #[default]
    Initial,
    Reroll,
    TwoOptions,
    AllOptions,
}

impl ReselectionStep {
    pub fn index(self) -> u8 {
        self as u8
    }

    pub fn name(self) -> &'static str {
        match self {
            ReselectionStep::Initial => "initial",
            ReselectionStep::Reroll => "reroll",
            ReselectionStep::TwoOptions => "two options",
            ReselectionStep::AllOptions => "all options",
        }
    }
}

impl fmt::Display for ReselectionStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// What the UI should show next.
#[derive(Debug, Clone, PartialEq)]
pub enum Offer {
    Single(Restaurant),
    Options(Vec<Restaurant>),
    /// Nothing left for this meal type; the user should add restaurants.
    Exhausted,
}

/// Result of advancing the flow.
#[derive(Debug, Clone)]
pub struct StepOutcome {
    pub offer: Offer,
    /// Penalized restaurants the caller must persist.
    pub updates: Vec<Restaurant>,
}

/// Result of ending the flow with a pick.
#[derive(Debug, Clone)]
pub struct Acceptance {
    pub accepted: Restaurant,
    /// Restaurants passed over in the final round, already penalized.
    pub updates: Vec<Restaurant>,
}

/// Session state of one recommendation flow.
///
/// The session never touches storage: every transition takes a catalog
/// snapshot and hands back the records the caller has to persist. One
/// active session per catalog is assumed; ids that disappear from the
/// catalog mid-flow are skipped.
#[derive(Debug, Clone)]
pub struct ReselectionSession {
    meal_type: MealType,
    step: ReselectionStep,
    shown_ids: HashSet<String>,
    current: Option<String>,
    current_options: Vec<String>,
}

impl ReselectionSession {
    pub fn new(meal_type: MealType) -> Self {
        Self {
            meal_type,
            step: ReselectionStep::Initial,
            shown_ids: HashSet::new(),
            current: None,
            current_options: Vec::new(),
        }
    }

    pub fn meal_type(&self) -> MealType {
        self.meal_type
    }

    pub fn step(&self) -> ReselectionStep {
        self.step
    }

    /// Every id presented since the flow started.
    pub fn shown_ids(&self) -> &HashSet<String> {
        &self.shown_ids
    }

    /// The single restaurant on display at `Initial` and `Reroll`.
    pub fn current(&self) -> Option<&str> {
        self.current.as_deref()
    }

    /// The options on display at `TwoOptions` and `AllOptions`.
    pub fn current_options(&self) -> &[String] {
        &self.current_options
    }

    /// Abandon the flow.
    pub fn reset(&mut self) {
        self.step = ReselectionStep::Initial;
        self.shown_ids.clear();
        self.current = None;
        self.current_options.clear();
    }

    /// Begin a fresh flow with one weighted recommendation.
    pub fn start<R: Rng + ?Sized>(
        &mut self,
        catalog: &[Restaurant],
        now: DateTime<Utc>,
        config: &SelectionConfig,
        rng: &mut R,
    ) -> Offer {
        self.reset();
        self.draw_single(catalog, now, config, rng)
    }

    /// The user turned down what is on display: penalize it and move one step on.
    pub fn reject<R: Rng + ?Sized>(
        &mut self,
        catalog: &[Restaurant],
        now: DateTime<Utc>,
        config: &SelectionConfig,
        rng: &mut R,
    ) -> Result<StepOutcome> {
        let rejected: Vec<String> = match self.step {
            ReselectionStep::Initial | ReselectionStep::Reroll => {
                if self.step == ReselectionStep::Initial && self.current.is_none() {
                    return Err(self.invalid("reject"));
                }
                self.current.take().into_iter().collect()
            }
            ReselectionStep::TwoOptions => std::mem::take(&mut self.current_options),
            ReselectionStep::AllOptions => return Err(self.invalid("reject")),
        };

        let updates = soft_penalize(catalog, &rejected, config);

        let offer = match self.step {
            ReselectionStep::Initial => {
                self.step = ReselectionStep::Reroll;
                self.draw_single(catalog, now, config, rng)
            }
            ReselectionStep::Reroll => {
                self.step = ReselectionStep::TwoOptions;
                self.draw_options(catalog, config.two_option_count)
            }
            _ => {
                self.step = ReselectionStep::AllOptions;
                self.draw_options(catalog, config.all_option_count)
            }
        };

        info!(
            step = %self.step,
            rejected = rejected.len(),
            shown = self.shown_ids.len(),
            "reselection advanced"
        );
        Ok(StepOutcome { offer, updates })
    }

    /// Accept the single restaurant on display at `Initial` or `Reroll`.
    pub fn accept(&mut self, catalog: &[Restaurant], now: DateTime<Utc>) -> Result<Acceptance> {
        let id = match (self.step, &self.current) {
            (ReselectionStep::Initial | ReselectionStep::Reroll, Some(id)) => id.clone(),
            _ => return Err(self.invalid("accept")),
        };
        let accepted = record_selection(find(catalog, &id)?, now);

        info!(id = %accepted.id, step = %self.step, "recommendation accepted");
        self.reset();
        Ok(Acceptance {
            accepted,
            updates: Vec::new(),
        })
    }

    /// Pick one of the offered options at `TwoOptions` or `AllOptions`.
    ///
    /// In the two-option round the option not chosen is soft-penalized.
    pub fn choose(
        &mut self,
        id: &str,
        catalog: &[Restaurant],
        now: DateTime<Utc>,
        config: &SelectionConfig,
    ) -> Result<Acceptance> {
        if !matches!(
            self.step,
            ReselectionStep::TwoOptions | ReselectionStep::AllOptions
        ) {
            return Err(self.invalid("choose an option"));
        }
        if !self.current_options.iter().any(|o| o == id) {
            return Err(PickError::NotOffered(id.to_string()));
        }

        let accepted = record_selection(find(catalog, id)?, now);

        let updates = if self.step == ReselectionStep::TwoOptions {
            let passed_over: Vec<String> = self
                .current_options
                .iter()
                .filter(|o| o.as_str() != id)
                .cloned()
                .collect();
            soft_penalize(catalog, &passed_over, config)
        } else {
            Vec::new()
        };

        info!(id = %accepted.id, step = %self.step, "option chosen");
        self.reset();
        Ok(Acceptance { accepted, updates })
    }

    fn draw_single<R: Rng + ?Sized>(
        &mut self,
        catalog: &[Restaurant],
        now: DateTime<Utc>,
        config: &SelectionConfig,
        rng: &mut R,
    ) -> Offer {
        match recommend(catalog, self.meal_type, &self.shown_ids, now, config, rng) {
            Some(r) => {
                self.shown_ids.insert(r.id.clone());
                self.current = Some(r.id.clone());
                Offer::Single(r.clone())
            }
            None => {
                debug!(meal_type = %self.meal_type, step = %self.step, "no restaurant left to draw");
                Offer::Exhausted
            }
        }
    }

    fn draw_options(&mut self, catalog: &[Restaurant], max_count: usize) -> Offer {
        let options = top_tiers_shortlist(catalog, self.meal_type, max_count, &self.shown_ids);
        if options.is_empty() {
            debug!(meal_type = %self.meal_type, step = %self.step, "no options left");
            return Offer::Exhausted;
        }

        self.current_options = options.iter().map(|r| r.id.clone()).collect();
        self.shown_ids.extend(self.current_options.iter().cloned());
        Offer::Options(options.into_iter().cloned().collect())
    }

    fn invalid(&self, action: &'static str) -> PickError {
        PickError::InvalidTransition {
            step: self.step.name(),
            action,
        }
    }
}

fn find<'a>(catalog: &'a [Restaurant], id: &str) -> Result<&'a Restaurant> {
    catalog
        .iter()
        .find(|r| r.id == id)
        .ok_or_else(|| PickError::RestaurantNotFound(id.to_string()))
}

fn soft_penalize(catalog: &[Restaurant], ids: &[String], config: &SelectionConfig) -> Vec<Restaurant> {
    ids.iter()
        .filter_map(|id| match catalog.iter().find(|r| &r.id == id) {
            Some(r) => Some(apply_weight_adjustment(r, -config.soft_penalty)),
            None => {
                warn!(%id, "shown restaurant no longer in catalog, skipping penalty");
                None
            }
        })
        .collect()
}
