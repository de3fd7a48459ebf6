pub mod cli;
pub mod config;
pub mod error;
pub mod interface;
pub mod models;
pub mod selection;
pub mod state;

pub use config::SelectionConfig;
pub use error::{PickError, Result};
pub use models::{MealType, Restaurant, Tier};
