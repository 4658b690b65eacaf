/// The logistic function σ(z) = 1 / (1 + e^-z).
pub fn sigmoid(z: f64) -> f64 {
    1.0 / (1.0 + f64::exp(-z))
}

/// Derivative of the sigmoid with respect to its pre-activation input, σ'(z) = σ(z)(1 - σ(z)).
pub fn sigmoid_prime(z: f64) -> f64 {
    let s = sigmoid(z);
    s * (1.0 - s)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLES: [f64; 5] = [-10.0, -1.0, 0.0, 1.0, 10.0];

    #[test]
    fn sigmoid_is_one_half_at_zero() {
        assert_eq!(sigmoid(0.0), 0.5);
        assert_eq!(sigmoid_prime(0.0), 0.25);
    }

    #[test]
    fn sigmoid_is_monotonically_increasing() {
        for pair in SAMPLES.windows(2) {
            assert!(sigmoid(pair[0]) < sigmoid(pair[1]));
        }
    }

    #[test]
    fn sigmoid_stays_inside_the_unit_interval() {
        for z in SAMPLES {
            let s = sigmoid(z);
            assert!(s > 0.0 && s < 1.0, "sigmoid({z}) = {s}");
        }
    }

    #[test]
    fn sigmoid_prime_matches_its_closed_form() {
        for z in SAMPLES {
            let expected = sigmoid(z) * (1.0 - sigmoid(z));
            assert!((sigmoid_prime(z) - expected).abs() < 1e-15);
        }
    }

    #[test]
    fn sigmoid_prime_matches_a_central_difference() {
        let h = 1e-6;
        for z in SAMPLES {
            let numeric = (sigmoid(z + h) - sigmoid(z - h)) / (2.0 * h);
            assert!((sigmoid_prime(z) - numeric).abs() < 1e-8);
        }
    }
}
