//! A feedforward network of sigmoid neurons trained with mini-batch stochastic gradient descent
//! and backpropagation.

pub mod activation;
pub mod config;
pub mod data;
pub mod error;
pub mod network;

pub use config::TrainingConfig;
pub use data::{LabeledExample, TrainingExample};
pub use error::{NetworkError, Result};
pub use network::{EpochReport, Gradient, Network};
