use ndarray::{Array, Array2};

use crate::error::{NetworkError, Result};

// An input paired with the activations the output layer should produce for it. Both are column
// vectors: the input is [sizes[0] x 1] and the target is [sizes[last] x 1].
#[derive(Debug, Clone, PartialEq)]
pub struct TrainingExample {
    pub input: Array2<f64>,
    pub target: Array2<f64>,
}

impl TrainingExample {
    pub fn new(input: Array2<f64>, target: Array2<f64>) -> TrainingExample {
        TrainingExample { input, target }
    }
}

// An input paired with the index of the output neuron that should fire hardest for it. This is the
// shape evaluation works with.
#[derive(Debug, Clone, PartialEq)]
pub struct LabeledExample {
    pub input: Array2<f64>,
    pub label: usize,
}

impl LabeledExample {
    pub fn new(input: Array2<f64>, label: usize) -> LabeledExample {
        LabeledExample { input, label }
    }

    /// Turns the label into an [outputs x 1] target where every value is 0.0 except the one at the
    /// label's position, which is 1.0.
    pub fn one_hot(&self, outputs: usize) -> Result<TrainingExample> {
        if self.label >= outputs {
            return Err(NetworkError::LabelOutOfRange {
                label: self.label,
                outputs,
            });
        }

        let target = Array::from_shape_fn([outputs, 1], |(i, _j)| {
            if i == self.label { 1.0 } else { 0.0 }
        });

        Ok(TrainingExample {
            input: self.input.clone(),
            target,
        })
    }
}
