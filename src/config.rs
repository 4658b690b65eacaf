//! Hyperparameters for stochastic gradient descent.

use ndarray_rand::rand::{SeedableRng, rngs::StdRng};
use serde::Deserialize;

use crate::error::{NetworkError, Result};

/// Hyperparameters for a training run.
///
/// Every field has a default, so a JSON document only needs the values it wants to change:
///
/// ```json
/// { "epochs": 5, "mini_batch_size": 4, "learning_rate": 0.5, "seed": 42 }
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TrainingConfig {
    /// Number of full passes over the training data.
    pub epochs: usize,
    /// Number of examples averaged into each weight update. The last batch of an epoch may be
    /// smaller.
    pub mini_batch_size: usize,
    /// Step size (eta) applied to the averaged gradient.
    pub learning_rate: f64,
    /// Seed for initialization and shuffling. Without one the generator is seeded from the OS.
    pub seed: Option<u64>,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        TrainingConfig {
            epochs: 30,
            mini_batch_size: 10,
            learning_rate: 3.0,
            seed: None,
        }
    }
}

impl TrainingConfig {
    /// Parses a config from JSON and validates it.
    pub fn from_json(json: &str) -> Result<TrainingConfig> {
        let config: TrainingConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.epochs == 0 {
            return Err(NetworkError::InvalidConfig(
                "epochs must be at least 1".to_string(),
            ));
        }

        if self.mini_batch_size == 0 {
            return Err(NetworkError::InvalidConfig(
                "mini_batch_size must be at least 1".to_string(),
            ));
        }

        if !self.learning_rate.is_finite() || self.learning_rate <= 0.0 {
            return Err(NetworkError::InvalidConfig(format!(
                "learning_rate must be a positive finite number, got {}",
                self.learning_rate
            )));
        }

        Ok(())
    }

    /// Builds the random generator used for initialization and shuffling.
    pub fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray_rand::rand::RngCore;

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let config = TrainingConfig::from_json(r#"{ "epochs": 5 }"#).unwrap();

        assert_eq!(
            config,
            TrainingConfig {
                epochs: 5,
                ..TrainingConfig::default()
            }
        );
    }

    #[test]
    fn zero_mini_batch_size_is_rejected() {
        let err = TrainingConfig::from_json(r#"{ "mini_batch_size": 0 }"#).unwrap_err();

        assert!(matches!(err, NetworkError::InvalidConfig(_)));
    }

    #[test]
    fn zero_epochs_are_rejected() {
        let config = TrainingConfig {
            epochs: 0,
            ..TrainingConfig::default()
        };

        assert!(config.validate().is_err());
    }

    #[test]
    fn non_positive_learning_rates_are_rejected() {
        for learning_rate in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            let config = TrainingConfig {
                learning_rate,
                ..TrainingConfig::default()
            };

            assert!(config.validate().is_err(), "accepted {learning_rate}");
        }
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let err = TrainingConfig::from_json(r#"{ "momentum": 0.9 }"#).unwrap_err();

        assert!(matches!(err, NetworkError::Json(_)));
    }

    #[test]
    fn seeded_configs_produce_identical_generators() {
        let config = TrainingConfig {
            seed: Some(7),
            ..TrainingConfig::default()
        };

        let (mut a, mut b) = (config.rng(), config.rng());

        assert_eq!(a.next_u64(), b.next_u64());
    }
}
