use std::{fmt, io::Write};

use itertools::Itertools;
use log::{debug, info, trace};
use ndarray::{Array, Array2, Axis, concatenate};
use ndarray_rand::{
    RandomExt,
    rand::{Rng, seq::SliceRandom},
    rand_distr::StandardNormal,
};

use crate::{
    activation::{sigmoid, sigmoid_prime},
    config::TrainingConfig,
    data::{LabeledExample, TrainingExample},
    error::{NetworkError, Result},
};

#[derive(Debug, Clone, PartialEq)]
pub struct Network {
    num_layers: usize,
    sizes: Vec<usize>,
    biases: Vec<Array2<f64>>,
    weights: Vec<Array2<f64>>,
}

/// The partial derivatives of the cost with respect to every bias and weight, laid out exactly like
/// [`Network::biases`] and [`Network::weights`].
#[derive(Debug, Clone, PartialEq)]
pub struct Gradient {
    pub nabla_biases: Vec<Array2<f64>>,
    pub nabla_weights: Vec<Array2<f64>>,
}

/// What happened during one epoch of training. Its `Display` form is the progress line written
/// after the epoch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EpochReport {
    Evaluated {
        epoch: usize,
        correct: usize,
        total: usize,
    },
    Completed {
        epoch: usize,
    },
}

impl fmt::Display for EpochReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EpochReport::Evaluated {
                epoch,
                correct,
                total,
            } => write!(f, "Epoch {epoch}: {correct} / {total}"),
            EpochReport::Completed { epoch } => write!(f, "Epoch {epoch} complete"),
        }
    }
}

impl Network {
    /// Creates a network whose layer `i` has `sizes[i]` neurons. The first layer is the input layer
    /// and gets no biases. Every bias and weight is drawn from a standard normal distribution
    /// (mean 0, variance 1) using `rng`.
    pub fn new<R: Rng + ?Sized>(sizes: Vec<usize>, rng: &mut R) -> Result<Network> {
        check_topology(&sizes)?;
        debug!("initializing network with layer sizes {sizes:?}");

        Ok(Network {
            num_layers: sizes.len(),
            biases: sizes
                // For each size in sizes, except the first one, make a [size x 1] array of
                // normally distributed numbers.
                .iter()
                .skip(1)
                .map(|&size| Array::random_using((size, 1), StandardNormal, &mut *rng))
                .collect(),
            weights: sizes
                // For each size paired with the following size, make a [next_size x current_size]
                // array of normally distributed numbers.
                .iter()
                .zip(sizes.iter().skip(1))
                .map(|(&current_size, &next_size)| {
                    Array::random_using((next_size, current_size), StandardNormal, &mut *rng)
                })
                .collect(),
            sizes,
        })
    }

    /// Builds a network from known parameters. The layer sizes are read off the weight matrices,
    /// and every matrix and bias vector must agree with them.
    pub fn from_parameters(
        biases: Vec<Array2<f64>>,
        weights: Vec<Array2<f64>>,
    ) -> Result<Network> {
        let Some(first) = weights.first() else {
            return Err(NetworkError::InvalidTopology { sizes: Vec::new() });
        };

        let mut sizes = vec![first.ncols()];
        sizes.extend(weights.iter().map(|weight| weight.nrows()));
        check_topology(&sizes)?;

        if biases.len() != weights.len() {
            return Err(NetworkError::DimensionMismatch {
                what: "bias vector count",
                expected: (weights.len(), 1),
                got: (biases.len(), 1),
            });
        }

        for (i, (bias, weight)) in biases.iter().zip(weights.iter()).enumerate() {
            expect_shape("weights", weight, (sizes[i + 1], sizes[i]))?;
            expect_shape("biases", bias, (sizes[i + 1], 1))?;
        }

        Ok(Network {
            num_layers: sizes.len(),
            sizes,
            biases,
            weights,
        })
    }

    pub fn sizes(&self) -> &[usize] {
        &self.sizes
    }

    pub fn num_layers(&self) -> usize {
        self.num_layers
    }

    pub fn biases(&self) -> &[Array2<f64>] {
        &self.biases
    }

    pub fn weights(&self) -> &[Array2<f64>] {
        &self.weights
    }

    // Calculates the activations of the output layer, given the activations of the input layer. The
    // input must be a [sizes[0] x 1] array.
    pub fn feedforward(&self, input_activation: &Array2<f64>) -> Result<Array2<f64>> {
        self.check_input(input_activation)?;

        // Each layer computes a' = σ(w.a + b) from the previous layer's activation. Only the
        // previous activation is needed, so it's overwritten as the loop moves forward.
        let mut activation = input_activation.clone();
        for (biases, weights) in self.biases.iter().zip(self.weights.iter()) {
            activation = weights.dot(&activation) + biases;
            activation.mapv_inplace(sigmoid);
        }

        Ok(activation)
    }

    /// Returns the index of the output neuron with the highest activation for `input_activation`.
    /// Ties go to the lowest index.
    pub fn predict(&self, input_activation: &Array2<f64>) -> Result<usize> {
        let output = self.feedforward(input_activation)?;

        // position_max_by returns the last of several equal maxima, so search for the minimum of
        // the reversed ordering instead, which returns the first.
        output
            .iter()
            .position_min_by(|a, b| b.total_cmp(a))
            .ok_or_else(|| NetworkError::InvalidTopology {
                sizes: self.sizes.clone(),
            })
    }

    /// Computes the gradient of the quadratic cost for a single example. The network is left
    /// untouched.
    pub fn backprop(&self, example: &TrainingExample) -> Result<Gradient> {
        self.check_example(example)?;
        Ok(self.backpropagate(&example.input, &example.target))
    }

    // Adjust the network's biases and weights by one gradient descent step, using the gradient
    // averaged over every example in the mini-batch.
    pub fn update_mini_batch(
        &mut self,
        mini_batch: &[TrainingExample],
        learning_rate: f64,
    ) -> Result<()> {
        if mini_batch.is_empty() {
            return Err(NetworkError::EmptyMiniBatch);
        }
        for example in mini_batch {
            self.check_example(example)?;
        }

        // Combine each input and each target into a single matrix where each column corresponds to
        // a separate example.
        let training_input_matrix = concatenate(
            Axis(1),
            &mini_batch
                .iter()
                .map(|example| example.input.view())
                .collect::<Vec<_>>(),
        )?;
        let training_target_matrix = concatenate(
            Axis(1),
            &mini_batch
                .iter()
                .map(|example| example.target.view())
                .collect::<Vec<_>>(),
        )?;

        let Gradient {
            nabla_biases,
            nabla_weights,
        } = self.backpropagate(&training_input_matrix, &training_target_matrix);

        let step = learning_rate / mini_batch.len() as f64;
        for (bias, mut nabla_bias) in self.biases.iter_mut().zip(nabla_biases) {
            nabla_bias.mapv_inplace(|nb| nb * step);
            *bias -= &nabla_bias;
        }
        for (weight, mut nabla_weight) in self.weights.iter_mut().zip(nabla_weights) {
            nabla_weight.mapv_inplace(|nw| nw * step);
            *weight -= &nabla_weight;
        }

        trace!("applied mini-batch of {} examples", mini_batch.len());
        Ok(())
    }

    /// Trains the network with mini-batch stochastic gradient descent.
    ///
    /// Every epoch shuffles `training_data` **in place**, so the caller's slice is left in the order
    /// of the last epoch. The shuffled data is split into consecutive mini-batches of
    /// `config.mini_batch_size` examples (the last one may be shorter) and each batch is applied in
    /// order. After each epoch one progress line is written to `progress`: the number of correctly
    /// classified `test_data` examples when test data is given, or a completion notice otherwise.
    /// An empty test set is treated as no test set.
    pub fn stochastic_gradient_descent<R, W>(
        &mut self,
        training_data: &mut [TrainingExample],
        config: &TrainingConfig,
        test_data: Option<&[LabeledExample]>,
        rng: &mut R,
        progress: &mut W,
    ) -> Result<Vec<EpochReport>>
    where
        R: Rng + ?Sized,
        W: Write + ?Sized,
    {
        config.validate()?;
        // Reject bad data before the first update rather than partway through an epoch.
        for example in training_data.iter() {
            self.check_example(example)?;
        }
        let test_data = test_data.filter(|test_data| !test_data.is_empty());

        let mut reports = Vec::with_capacity(config.epochs);
        for epoch in 0..config.epochs {
            training_data.shuffle(rng);

            let mut batches = 0;
            for mini_batch in training_data.chunks(config.mini_batch_size) {
                self.update_mini_batch(mini_batch, config.learning_rate)?;
                batches += 1;
            }
            debug!("epoch {epoch}: applied {batches} mini-batch updates");

            let report = match test_data {
                Some(test_data) => EpochReport::Evaluated {
                    epoch,
                    correct: self.evaluate(test_data)?,
                    total: test_data.len(),
                },
                None => EpochReport::Completed { epoch },
            };

            info!("{report}");
            writeln!(progress, "{report}")?;
            reports.push(report);
        }

        Ok(reports)
    }

    // Run the network on all test data and count how many examples it labels correctly.
    pub fn evaluate(&self, test_data: &[LabeledExample]) -> Result<usize> {
        let mut correct_answers = 0;
        for example in test_data {
            if self.predict(&example.input)? == example.label {
                correct_answers += 1;
            }
        }

        Ok(correct_answers)
    }

    // Calculate the gradient for a batch of examples, one per column of the input and target
    // matrices. The returned gradient is the sum of the per-example gradients. Callers must have
    // checked the row counts already.
    fn backpropagate(
        &self,
        training_input_matrix: &Array2<f64>,
        training_target_matrix: &Array2<f64>,
    ) -> Gradient {
        let mut nabla_biases: Vec<Array2<f64>> = self
            .biases
            .iter()
            .map(|bias| Array::zeros(bias.raw_dim()))
            .collect();
        let mut nabla_weights: Vec<Array2<f64>> = self
            .weights
            .iter()
            .map(|weight| Array::zeros(weight.raw_dim()))
            .collect();

        // activations[l] is the input to weights[l], so the output layer's activation is never
        // pushed and activations ends up the same length as zs.
        let mut activation = training_input_matrix.clone();
        let mut activations = Vec::with_capacity(self.num_layers - 1);
        let mut zs = Vec::with_capacity(self.num_layers - 1);
        for (bias, weight) in self.biases.iter().zip(self.weights.iter()) {
            let z = weight.dot(&activation) + bias;
            activations.push(activation);
            activation = z.mapv(sigmoid);
            zs.push(z);
        }

        let last = self.num_layers - 2;
        let mut delta =
            cost_derivative(&activation, training_target_matrix) * zs[last].mapv(sigmoid_prime);

        // Every column of delta belongs to one example. Summing the columns gives the summed bias
        // gradient, and the matrix product with the activations sums the weight gradients.
        nabla_biases[last] = delta.sum_axis(Axis(1)).insert_axis(Axis(1));
        nabla_weights[last] = delta.dot(&activations[last].t());

        for l in (0..last).rev() {
            delta = self.weights[l + 1].t().dot(&delta) * zs[l].mapv(sigmoid_prime);
            nabla_biases[l] = delta.sum_axis(Axis(1)).insert_axis(Axis(1));
            nabla_weights[l] = delta.dot(&activations[l].t());
        }

        Gradient {
            nabla_biases,
            nabla_weights,
        }
    }

    fn check_input(&self, input: &Array2<f64>) -> Result<()> {
        expect_shape("input", input, (self.sizes[0], 1))
    }

    fn check_example(&self, example: &TrainingExample) -> Result<()> {
        self.check_input(&example.input)?;
        expect_shape("target", &example.target, (self.sizes[self.num_layers - 1], 1))
    }
}

/// The partial derivatives of the quadratic cost with respect to the output activations.
pub fn cost_derivative(output_activations: &Array2<f64>, target: &Array2<f64>) -> Array2<f64> {
    output_activations - target
}

fn check_topology(sizes: &[usize]) -> Result<()> {
    if sizes.len() < 2 || sizes.contains(&0) {
        return Err(NetworkError::InvalidTopology {
            sizes: sizes.to_vec(),
        });
    }
    Ok(())
}

fn expect_shape(what: &'static str, array: &Array2<f64>, expected: (usize, usize)) -> Result<()> {
    let got = array.dim();
    if got != expected {
        return Err(NetworkError::DimensionMismatch {
            what,
            expected,
            got,
        });
    }
    Ok(())
}
