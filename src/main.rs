use std::{fs, io};

use log::info;
use ndarray::array;
use sigmoid_mlp::{LabeledExample, Network, Result, TrainingConfig};

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    const INPUT_NEURONS: usize = 2;
    const OUTPUT_NEURONS: usize = 2;

    // An optional path to a JSON training config is the only argument.
    let config = match std::env::args().nth(1) {
        Some(path) => TrainingConfig::from_json(&fs::read_to_string(path)?)?,
        None => TrainingConfig {
            epochs: 1000,
            mini_batch_size: 4,
            learning_rate: 3.0,
            seed: Some(1),
        },
    };
    info!("training with {config:?}");

    // The XOR truth table, labelled by the output neuron that should fire.
    let test_data = vec![
        LabeledExample::new(array![[0.0], [0.0]], 0),
        LabeledExample::new(array![[0.0], [1.0]], 1),
        LabeledExample::new(array![[1.0], [0.0]], 1),
        LabeledExample::new(array![[1.0], [1.0]], 0),
    ];
    let mut training_data = test_data
        .iter()
        .map(|example| example.one_hot(OUTPUT_NEURONS))
        .collect::<Result<Vec<_>>>()?;

    let mut rng = config.rng();
    let mut network = Network::new(vec![INPUT_NEURONS, 3, OUTPUT_NEURONS], &mut rng)?;

    network.stochastic_gradient_descent(
        &mut training_data,
        &config,
        Some(test_data.as_slice()),
        &mut rng,
        &mut io::stdout().lock(),
    )?;

    Ok(())
}
