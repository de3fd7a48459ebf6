pub mod prompts;
pub mod render;

pub use prompts::{
    Decision, prompt_decision, prompt_meal_types, prompt_option_choice, prompt_restaurant_name,
    prompt_tier, prompt_yes_no, resolve_restaurant,
};
pub use render::{display_history, display_offer, display_restaurants, display_simulation};
