use chrono::{DateTime, Local, Utc};

use crate::config::SelectionConfig;
use crate::models::{HistoryEntry, Restaurant};
use crate::selection::{Offer, effective_weight, is_recent};

/// Display restaurants in a formatted table with their effective weights.
pub fn display_restaurants(
    restaurants: &[Restaurant],
    title: &str,
    now: DateTime<Utc>,
    config: &SelectionConfig,
) {
    if restaurants.is_empty() {
        println!("{}: (none)", title);
        return;
    }

    println!();
    println!("=== {} ({} restaurants) ===", title, restaurants.len());
    println!();

    let max_name_len = restaurants.iter().map(|r| r.name.len()).max().unwrap_or(10);

    for r in restaurants {
        let mut tags = Vec::new();
        if is_recent(r, now, config) {
            tags.push("recent".to_string());
        }
        if r.tier != r.original_tier {
            tags.push(format!("was {}", r.original_tier));
        }
        if !r.is_valid() {
            tags.push("malformed".to_string());
        }

        let tags_str = if tags.is_empty() {
            String::new()
        } else {
            format!("  [{}]", tags.join(", "))
        };

        println!(
            "  {:<width$}  {:<11} {:+.2}  weight {:>5.2}  picked {:>3}x  {}{}",
            r.name,
            r.tier.name(),
            r.dynamic_weight,
            effective_weight(r, now, config),
            r.selection_count,
            r.meal_types_label(),
            tags_str,
            width = max_name_len
        );
    }

    println!();
}

/// Display what the reselection flow is offering.
pub fn display_offer(offer: &Offer) {
    match offer {
        Offer::Single(r) => println!("Recommendation: {} ({})", r.name, r.tier),
        Offer::Options(options) => {
            println!("Options:");
            for (i, r) in options.iter().enumerate() {
                println!("{:>3}. {} ({})", i + 1, r.name, r.tier);
            }
        }
        Offer::Exhausted => {
            println!("No restaurant left for this meal. Add more with `where_to_eat add`.")
        }
    }
}

/// Display the most recent `limit` picks, newest first.
pub fn display_history(history: &[HistoryEntry], limit: usize) {
    if history.is_empty() {
        println!("No picks recorded yet.");
        return;
    }

    println!();
    println!("=== Recent picks ===");
    println!();

    for entry in history.iter().rev().take(limit) {
        let local: DateTime<Local> = entry.timestamp.with_timezone(&Local);
        println!(
            "  {}  {:<9}  {}",
            local.format("%Y-%m-%d %H:%M"),
            entry.meal_type.name(),
            entry.restaurant_name
        );
    }

    println!();
}

/// Display pick frequencies from a simulation run, most picked first.
pub fn display_simulation(counts: &[(Restaurant, u32)], draws: u32) {
    if counts.is_empty() || draws == 0 {
        println!("Nothing to simulate: no restaurant matches this meal.");
        return;
    }

    println!();
    println!("=== Simulation ({} draws) ===", draws);
    println!();

    let max_name_len = counts.iter().map(|(r, _)| r.name.len()).max().unwrap_or(10);

    for (r, count) in counts {
        let share = *count as f64 / draws as f64 * 100.0;
        println!(
            "  {:<width$}  {:<11} {:>6} picks  {:>5.1}%",
            r.name,
            r.tier.name(),
            count,
            share,
            width = max_name_len
        );
    }

    println!();
}
