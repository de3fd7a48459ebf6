use chrono::{DateTime, Duration, TimeZone, Utc};
use proptest::prelude::*;

use where_to_eat_rs::SelectionConfig;
use where_to_eat_rs::models::{MealType, Restaurant, Tier};
use where_to_eat_rs::selection::{apply_weight_adjustment, effective_weight, on_rejection};

fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap()
}

fn make_restaurant(tier: Tier, dynamic_weight: f64) -> Restaurant {
    let mut r = Restaurant::with_id("r", "Hot Pot", tier, [MealType::Dinner]);
    r.dynamic_weight = dynamic_weight;
    r
}

fn any_tier() -> impl Strategy<Value = Tier> {
    prop::sample::select(Tier::ALL.to_vec())
}

proptest! {
    #[test]
    fn effective_weight_never_below_one(
        tier in any_tier(),
        dynamic_weight in -0.999f64..0.999,
        hours_ago in prop::option::of(0i64..96),
    ) {
        let now = base_time();
        let mut r = make_restaurant(tier, dynamic_weight);
        r.last_selected = hours_ago.map(|h| now - Duration::hours(h));

        let weight = effective_weight(&r, now, &SelectionConfig::default());
        prop_assert!(weight >= 1.0);
    }

    #[test]
    fn residual_stays_inside_unit_interval(
        tier in any_tier(),
        start in -0.999f64..0.999,
        delta in -10.0f64..10.0,
    ) {
        let r = apply_weight_adjustment(&make_restaurant(tier, start), delta);
        prop_assert!(r.dynamic_weight > -1.0 && r.dynamic_weight < 1.0);
    }

    #[test]
    fn tier_moves_at_most_the_whole_steps(
        tier in any_tier(),
        start in -0.999f64..0.999,
        delta in -10.0f64..10.0,
    ) {
        let r = apply_weight_adjustment(&make_restaurant(tier, start), delta);
        let moved = (r.tier.rank() as i64 - tier.rank() as i64).abs();
        let total = start + delta;
        let whole = total.abs().floor() as i64;
        prop_assert!(moved <= whole);
        if total >= 1.0 {
            prop_assert!(r.tier <= tier);
        } else if total <= -1.0 {
            prop_assert!(r.tier >= tier);
        } else {
            prop_assert_eq!(r.tier, tier);
        }
    }
}

#[test]
fn test_repeated_demotion_stops_at_trash() {
    let mut r = make_restaurant(Tier::Trash, 0.0);
    for _ in 0..5 {
        r = apply_weight_adjustment(&r, -5.0);
        assert_eq!(r.tier, Tier::Trash);
    }
}

#[test]
fn test_repeated_promotion_stops_at_hang() {
    let mut r = make_restaurant(Tier::Hang, 0.0);
    for _ in 0..5 {
        r = apply_weight_adjustment(&r, 5.0);
        assert_eq!(r.tier, Tier::Hang);
    }
}

#[test]
fn test_rejections_walk_down_the_tiers() {
    let mut r = make_restaurant(Tier::Hang, 0.0);
    let mut seen = vec![r.tier];
    for _ in 0..4 {
        r = on_rejection(&r);
        seen.push(r.tier);
    }
    assert_eq!(seen, Tier::ALL.to_vec());
}

#[test]
fn test_recency_penalty_expires_after_window() {
    let now = base_time();
    let config = SelectionConfig::default();
    let mut r = make_restaurant(Tier::RenShangRen, 0.0);

    r.last_selected = Some(now - Duration::hours(23));
    assert_eq!(effective_weight(&r, now, &config), 2.0);

    r.last_selected = Some(now - Duration::hours(24));
    assert_eq!(effective_weight(&r, now, &config), 3.0);
}
