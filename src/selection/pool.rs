use std::collections::HashSet;

use chrono::{DateTime, Utc};
use rand::Rng;
use tracing::debug;

use crate::config::SelectionConfig;
use crate::models::{MealType, Restaurant, Tier};
use crate::selection::constants::{LARGE_POOL_MAX, MEDIUM_POOL_MAX, SMALL_POOL_MAX};
use crate::selection::sampler::select_weighted;

use Tier::*;

/// Restaurants serving `meal_type` that are not excluded, in catalog order.
///
/// Malformed records (see [`Restaurant::is_valid`]) never match.
pub fn filter_candidates<'a>(
    all: &'a [Restaurant],
    meal_type: MealType,
    exclude_ids: &HashSet<String>,
) -> Vec<&'a Restaurant> {
    all.iter()
        .filter(|r| r.is_valid() && r.serves(meal_type) && !exclude_ids.contains(&r.id))
        .collect()
}

const SMALL_POOL: &[&[Tier]] = &[&[Hang, Top, RenShangRen, Npc, Trash]];
const MEDIUM_POOL: &[&[Tier]] = &[&[Hang, Top, RenShangRen, Npc], &[Trash]];
const LARGE_POOL: &[&[Tier]] = &[&[Hang, Top, RenShangRen], &[Npc, Trash]];
const HUGE_POOL: &[&[Tier]] = &[&[Hang, Top], &[RenShangRen, Npc], &[Trash]];

/// Preferred tier sets for a pool of `n` matches, tried in order.
fn tier_preferences(n: usize) -> &'static [&'static [Tier]] {
    if n <= SMALL_POOL_MAX {
        SMALL_POOL
    } else if n <= MEDIUM_POOL_MAX {
        MEDIUM_POOL
    } else if n <= LARGE_POOL_MAX {
        LARGE_POOL
    } else {
        HUGE_POOL
    }
}

/// Build the pool the sampler draws from.
///
/// Larger catalogs narrow to the higher tiers; smaller ones widen so low-tier
/// restaurants stay reachable. Empty only when nothing matches at all.
pub fn build_candidate_pool<'a>(
    all: &'a [Restaurant],
    meal_type: MealType,
    exclude_ids: &HashSet<String>,
) -> Vec<&'a Restaurant> {
    let filtered = filter_candidates(all, meal_type, exclude_ids);
    let n = filtered.len();

    for tiers in tier_preferences(n) {
        let pool: Vec<&Restaurant> = filtered
            .iter()
            .filter(|r| tiers.contains(&r.tier))
            .copied()
            .collect();
        if !pool.is_empty() {
            debug!(%meal_type, matched = n, pool = pool.len(), ?tiers, "candidate pool built");
            return pool;
        }
    }

    // Unreachable for n > 0: the fallbacks together cover every tier.
    debug!(%meal_type, matched = n, "no candidates");
    Vec::new()
}

/// Up to `max_count` restaurants taken tier by tier, highest first.
pub fn top_tiers_shortlist<'a>(
    all: &'a [Restaurant],
    meal_type: MealType,
    max_count: usize,
    exclude_ids: &HashSet<String>,
) -> Vec<&'a Restaurant> {
    let filtered = filter_candidates(all, meal_type, exclude_ids);

    let mut shortlist = Vec::with_capacity(max_count);
    for tier in Tier::ALL {
        if shortlist.len() >= max_count {
            break;
        }
        shortlist.extend(filtered.iter().filter(|r| r.tier == tier).copied());
    }
    shortlist.truncate(max_count);
    shortlist
}

/// Build the pool and draw one restaurant from it.
pub fn recommend<'a, R: Rng + ?Sized>(
    all: &'a [Restaurant],
    meal_type: MealType,
    exclude_ids: &HashSet<String>,
    now: DateTime<Utc>,
    config: &SelectionConfig,
    rng: &mut R,
) -> Option<&'a Restaurant> {
    let pool = build_candidate_pool(all, meal_type, exclude_ids);
    select_weighted(&pool, now, config, rng)
}
