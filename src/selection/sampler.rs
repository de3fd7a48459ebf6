use chrono::{DateTime, Utc};
use rand::Rng;
use tracing::debug;

use crate::config::SelectionConfig;
use crate::models::Restaurant;
use crate::selection::weights::effective_weight;

/// Draw one candidate with probability proportional to its effective weight.
///
/// Returns `None` for an empty slice or when the weights do not sum to a
/// finite positive total.
pub fn select_weighted<'a, R: Rng + ?Sized>(
    candidates: &[&'a Restaurant],
    now: DateTime<Utc>,
    config: &SelectionConfig,
    rng: &mut R,
) -> Option<&'a Restaurant> {
    let weights: Vec<f64> = candidates
        .iter()
        .map(|r| effective_weight(r, now, config))
        .collect();
    let total: f64 = weights.iter().sum();

    if candidates.is_empty() || !total.is_finite() || total <= 0.0 {
        return None;
    }

    let mut remainder = rng.gen_range(0.0..total);
    for (candidate, weight) in candidates.iter().zip(&weights) {
        remainder -= weight;
        if remainder <= 0.0 {
            debug!(id = %candidate.id, weight, total, "weighted draw");
            return Some(*candidate);
        }
    }

    // Rounding can leave a sliver of remainder after the last candidate.
    candidates.last().copied()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{MealType, Tier};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn restaurant(id: &str, tier: Tier) -> Restaurant {
        Restaurant::with_id(id, id, tier, [MealType::Dinner])
    }

    #[test]
    fn test_empty_returns_none() {
        let mut rng = StdRng::seed_from_u64(1);
        let picked = select_weighted(&[], Utc::now(), &SelectionConfig::default(), &mut rng);
        assert!(picked.is_none());
    }

    #[test]
    fn test_single_candidate_always_chosen() {
        let only = restaurant("only", Tier::Trash);
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..50 {
            let picked =
                select_weighted(&[&only], Utc::now(), &SelectionConfig::default(), &mut rng);
            assert_eq!(picked.map(|r| r.id.as_str()), Some("only"));
        }
    }

    #[test]
    fn test_proportional_to_weight() {
        let heavy = restaurant("heavy", Tier::Hang);
        let light = restaurant("light", Tier::Trash);
        let candidates = [&heavy, &light];
        let config = SelectionConfig::default();
        let now = Utc::now();
        let mut rng = StdRng::seed_from_u64(42);

        let mut heavy_count = 0u32;
        let mut light_count = 0u32;
        for _ in 0..10_000 {
            match select_weighted(&candidates, now, &config, &mut rng).map(|r| r.id.as_str()) {
                Some("heavy") => heavy_count += 1,
                Some("light") => light_count += 1,
                other => panic!("unexpected pick {:?}", other),
            }
        }

        let ratio = heavy_count as f64 / light_count as f64;
        assert!(
            (3.5..=6.5).contains(&ratio),
            "expected roughly 5:1, got {} vs {}",
            heavy_count,
            light_count
        );
    }

    #[test]
    fn test_overflowing_weights_return_none() {
        let mut a = restaurant("a", Tier::Top);
        let mut b = restaurant("b", Tier::Top);
        a.dynamic_weight = 1e308;
        b.dynamic_weight = 1e308;
        let mut rng = StdRng::seed_from_u64(9);
        let picked = select_weighted(&[&a, &b], Utc::now(), &SelectionConfig::default(), &mut rng);
        assert!(picked.is_none());
    }
}
