mod manager;
mod persistence;

pub use manager::{RestaurantRepository, RestaurantStore};
pub use persistence::{PickerState, export_csv, load_state, open_store, save_state, save_store};
