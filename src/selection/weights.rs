use chrono::{DateTime, Duration, Utc};
use tracing::debug;

use crate::config::SelectionConfig;
use crate::models::{Feedback, FeedbackEntry, Restaurant};
use crate::selection::constants::*;

/// Whether the restaurant was accepted inside the recency window.
///
/// A window too large for `Duration` counts as no window at all.
pub fn is_recent(restaurant: &Restaurant, now: DateTime<Utc>, config: &SelectionConfig) -> bool {
    let Some(window) = Duration::try_hours(config.recency_window_hours) else {
        return false;
    };
    restaurant
        .last_selected
        .is_some_and(|last| now - last < window)
}

/// Calculate the weight used for sampling.
///
/// Formula: max(floor, base(tier) + dynamic_weight - recency_penalty)
pub fn effective_weight(restaurant: &Restaurant, now: DateTime<Utc>, config: &SelectionConfig) -> f64 {
    let mut weight = restaurant.tier.base_weight() as f64 + restaurant.dynamic_weight;

    if is_recent(restaurant, now, config) {
        weight = (weight - config.recency_penalty).max(config.min_effective_weight);
    }

    weight.max(config.min_effective_weight)
}

/// Add `delta` to the dynamic weight and cash whole units in as tier steps.
///
/// Steps past `Hang` or `Trash` are dropped, so the residual always lies in (-1, 1).
///
/// # Panics
///
/// Panics if `delta` is NaN or infinite.
pub fn apply_weight_adjustment(restaurant: &Restaurant, delta: f64) -> Restaurant {
    assert!(delta.is_finite(), "weight adjustment must be finite, got {delta}");

    let mut updated = restaurant.clone();
    let new_weight = restaurant.dynamic_weight + delta;

    if new_weight <= -1.0 {
        let steps = new_weight.abs().floor();
        for _ in 0..steps as u64 {
            updated.tier = updated.tier.demote();
        }
        updated.dynamic_weight = new_weight + steps;
    } else if new_weight >= 1.0 {
        let steps = new_weight.floor();
        for _ in 0..steps as u64 {
            updated.tier = updated.tier.promote();
        }
        updated.dynamic_weight = new_weight - steps;
    } else {
        updated.dynamic_weight = new_weight;
    }

    if updated.tier != restaurant.tier {
        debug!(
            id = %restaurant.id,
            from = %restaurant.tier,
            to = %updated.tier,
            residual = updated.dynamic_weight,
            "tier changed"
        );
    }

    updated
}

/// Full penalty for an outright rejection.
pub fn on_rejection(restaurant: &Restaurant) -> Restaurant {
    apply_weight_adjustment(restaurant, -REJECTION_PENALTY)
}

/// Record positive feedback; the bump needs 2 positives in the last 3 entries.
pub fn on_positive_feedback(restaurant: &Restaurant, now: DateTime<Utc>) -> Restaurant {
    let mut updated = restaurant.clone();
    updated.feedback_history.push(FeedbackEntry {
        feedback: Feedback::Positive,
        timestamp: now,
    });

    let positives = updated
        .feedback_history
        .iter()
        .rev()
        .take(FEEDBACK_WINDOW)
        .filter(|e| e.feedback == Feedback::Positive)
        .count();

    if positives >= POSITIVE_FEEDBACK_REQUIRED {
        apply_weight_adjustment(&updated, POSITIVE_FEEDBACK_BONUS)
    } else {
        debug!(id = %restaurant.id, positives, "positive feedback not yet confirmed");
        updated
    }
}

/// Record negative feedback; always penalized immediately.
pub fn on_negative_feedback(restaurant: &Restaurant, now: DateTime<Utc>) -> Restaurant {
    let mut updated = restaurant.clone();
    updated.feedback_history.push(FeedbackEntry {
        feedback: Feedback::Negative,
        timestamp: now,
    });
    apply_weight_adjustment(&updated, -NEGATIVE_FEEDBACK_PENALTY)
}

/// Stamp an acceptance.
pub fn record_selection(restaurant: &Restaurant, now: DateTime<Utc>) -> Restaurant {
    let mut updated = restaurant.clone();
    updated.last_selected = Some(now);
    updated.selection_count += 1;
    updated
}
