/// Hours after an acceptance during which the recency penalty applies.
pub const RECENCY_WINDOW_HOURS: i64 = 24;

/// Weight subtracted from a recently accepted restaurant.
pub const RECENCY_PENALTY: f64 = 1.0;

/// Floor for effective weight; every candidate keeps a chance to be drawn.
pub const MIN_EFFECTIVE_WEIGHT: f64 = 1.0;

// ─────────────────────────────────────────────────────────────────────────────
// Feedback adjustments (fractions of one tier step)
// ─────────────────────────────────────────────────────────────────────────────

/// Full penalty for an outright rejection.
pub const REJECTION_PENALTY: f64 = 1.0;

/// Soft penalty for being passed over during reselection.
pub const SOFT_PENALTY: f64 = 0.5;

/// Bump granted by confirmed positive feedback.
pub const POSITIVE_FEEDBACK_BONUS: f64 = 0.5;

/// Penalty applied by every negative feedback.
pub const NEGATIVE_FEEDBACK_PENALTY: f64 = 1.0;

/// How many of the most recent feedback entries are inspected.
pub const FEEDBACK_WINDOW: usize = 3;

/// Positive entries required inside the window before the bump is granted.
pub const POSITIVE_FEEDBACK_REQUIRED: usize = 2;

// ─────────────────────────────────────────────────────────────────────────────
// Pool sizing (by number of matching restaurants)
// ─────────────────────────────────────────────────────────────────────────────

/// Up to this many matches, every tier is eligible.
pub const SMALL_POOL_MAX: usize = 3;

/// Up to this many matches, everything but Trash is preferred.
pub const MEDIUM_POOL_MAX: usize = 6;

/// Up to this many matches, the top three tiers are preferred.
pub const LARGE_POOL_MAX: usize = 10;

// ─────────────────────────────────────────────────────────────────────────────
// Reselection
// ─────────────────────────────────────────────────────────────────────────────

pub const TWO_OPTION_COUNT: usize = 2;

pub const ALL_OPTION_COUNT: usize = 10;
