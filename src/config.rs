use std::fs;
use std::path::Path;

use chrono::Duration;
use serde::{Deserialize, Serialize};

use crate::error::{PickError, Result};
use crate::selection::constants::{
    ALL_OPTION_COUNT, MIN_EFFECTIVE_WEIGHT, RECENCY_PENALTY, RECENCY_WINDOW_HOURS, SOFT_PENALTY,
    TWO_OPTION_COUNT,
};

/// Tunable knobs for weighting and the reselection flow.
///
/// Every field falls back to its default when missing from a config file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectionConfig {
    /// A restaurant accepted within this many hours gets the recency penalty.
    pub recency_window_hours: i64,
    pub recency_penalty: f64,
    pub min_effective_weight: f64,
    /// Penalty for being shown and passed over during reselection.
    pub soft_penalty: f64,
    pub two_option_count: usize,
    pub all_option_count: usize,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            recency_window_hours: RECENCY_WINDOW_HOURS,
            recency_penalty: RECENCY_PENALTY,
            min_effective_weight: MIN_EFFECTIVE_WEIGHT,
            soft_penalty: SOFT_PENALTY,
            two_option_count: TWO_OPTION_COUNT,
            all_option_count: ALL_OPTION_COUNT,
        }
    }
}

impl SelectionConfig {
    pub fn validate(&self) -> Result<()> {
        if self.recency_window_hours < 0 || Duration::try_hours(self.recency_window_hours).is_none() {
            return Err(PickError::InvalidInput(format!(
                "recency_window_hours must be between 0 and {}, got {}",
                Duration::MAX.num_hours(),
                self.recency_window_hours
            )));
        }
        for (name, value) in [
            ("recency_penalty", self.recency_penalty),
            ("soft_penalty", self.soft_penalty),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(PickError::InvalidInput(format!(
                    "{name} must be a finite non-negative number, got {value}"
                )));
            }
        }
        // The sampler needs strictly positive weights.
        if !self.min_effective_weight.is_finite() || self.min_effective_weight <= 0.0 {
            return Err(PickError::InvalidInput(format!(
                "min_effective_weight must be > 0, got {}",
                self.min_effective_weight
            )));
        }
        if self.two_option_count == 0 || self.all_option_count == 0 {
            return Err(PickError::InvalidInput(
                "option counts must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Load a config file, or the defaults when no path is given.
pub fn load_config<P: AsRef<Path>>(path: Option<P>) -> Result<SelectionConfig> {
    let config = match path {
        Some(path) => {
            let content = fs::read_to_string(path)?;
            serde_json::from_str(&content)?
        }
        None => SelectionConfig::default(),
    };
    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults_valid() {
        let config = SelectionConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.recency_window_hours, 24);
        assert_eq!(config.two_option_count, 2);
        assert_eq!(config.all_option_count, 10);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(br#"{"soft_penalty": 0.25}"#).unwrap();

        let config = load_config(Some(file.path())).unwrap();
        assert_eq!(config.soft_penalty, 0.25);
        assert_eq!(config.recency_penalty, RECENCY_PENALTY);
    }

    #[test]
    fn test_rejects_zero_floor() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(br#"{"min_effective_weight": 0}"#).unwrap();

        assert!(matches!(
            load_config(Some(file.path())),
            Err(PickError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_rejects_out_of_range_window() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(br#"{"recency_window_hours": 9000000000000}"#).unwrap();
        assert!(matches!(
            load_config(Some(file.path())),
            Err(PickError::InvalidInput(_))
        ));

        let negative = SelectionConfig {
            recency_window_hours: -1,
            ..SelectionConfig::default()
        };
        assert!(negative.validate().is_err());
    }

    #[test]
    fn test_no_path_is_default() {
        let config = load_config(None::<&Path>).unwrap();
        assert_eq!(config, SelectionConfig::default());
    }
}
