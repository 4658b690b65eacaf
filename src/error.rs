use std::{
    error::Error,
    fmt::{self, Display},
};

use ndarray::ShapeError;

/// The result type used throughout the crate.
pub type Result<T> = std::result::Result<T, NetworkError>;

/// Everything that can go wrong while building, running or training a network.
#[derive(Debug)]
pub enum NetworkError {
    /// The layer sizes don't describe a usable network: fewer than two layers, or a layer with no
    /// neurons.
    InvalidTopology { sizes: Vec<usize> },
    /// An array handed to the network doesn't have the shape its topology requires.
    DimensionMismatch {
        what: &'static str,
        expected: (usize, usize),
        got: (usize, usize),
    },
    /// A mini-batch update was requested with no examples to average over.
    EmptyMiniBatch,
    /// A class label doesn't name any neuron of the output layer.
    LabelOutOfRange { label: usize, outputs: usize },
    /// Training hyperparameters were rejected before training started.
    InvalidConfig(String),
    Shape(ShapeError),
    Io(std::io::Error),
    Json(serde_json::Error),
}

impl Display for NetworkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NetworkError::InvalidTopology { sizes } => write!(
                f,
                "invalid topology {sizes:?}: a network needs at least two layers and every layer needs at least one neuron"
            ),
            NetworkError::DimensionMismatch {
                what,
                expected,
                got,
            } => write!(
                f,
                "dimension mismatch for {what}: expected [{} x {}], got [{} x {}]",
                expected.0, expected.1, got.0, got.1
            ),
            NetworkError::EmptyMiniBatch => write!(f, "a mini-batch must hold at least one example"),
            NetworkError::LabelOutOfRange { label, outputs } => write!(
                f,
                "label {label} is out of range for an output layer of {outputs} neurons"
            ),
            NetworkError::InvalidConfig(msg) => write!(f, "invalid config: {msg}"),
            NetworkError::Shape(e) => write!(f, "shape error: {e}"),
            NetworkError::Io(e) => write!(f, "io error: {e}"),
            NetworkError::Json(e) => write!(f, "json error: {e}"),
        }
    }
}

impl Error for NetworkError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            NetworkError::Shape(e) => Some(e),
            NetworkError::Io(e) => Some(e),
            NetworkError::Json(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ShapeError> for NetworkError {
    fn from(e: ShapeError) -> Self {
        NetworkError::Shape(e)
    }
}

impl From<std::io::Error> for NetworkError {
    fn from(e: std::io::Error) -> Self {
        NetworkError::Io(e)
    }
}

impl From<serde_json::Error> for NetworkError {
    fn from(e: serde_json::Error) -> Self {
        NetworkError::Json(e)
    }
}
