use thiserror::Error;

#[derive(Debug, Error)]
pub enum PickError {
    #[error("Restaurant not found: {0}")]
    RestaurantNotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Prompt error: {0}")]
    Prompt(#[from] dialoguer::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Cannot {action} during the {step} step")]
    InvalidTransition {
        step: &'static str,
        action: &'static str,
    },

    #[error("Restaurant {0} was not among the offered options")]
    NotOffered(String),
}

pub type Result<T> = std::result::Result<T, PickError>;
