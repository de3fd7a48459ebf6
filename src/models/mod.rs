mod history;
mod restaurant;
mod tier;

pub use history::HistoryEntry;
pub use restaurant::{Feedback, FeedbackEntry, MealType, Restaurant};
pub use tier::Tier;
