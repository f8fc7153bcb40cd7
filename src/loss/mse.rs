pub struct MseLoss;

impl MseLoss {
    /// Scalar MSE: mean((predicted - expected)²)
    pub fn loss(predicted: &[f64], expected: &[f64]) -> f64 {
        let n = predicted.len() as f64;
        predicted
            .iter()
            .zip(expected.iter())
            .map(|(a, b)| (a - b).powi(2))
            .sum::<f64>()
            / n
    }

    /// Per-output gradient: predicted - expected
    pub fn derivative(predicted: &[f64], expected: &[f64]) -> Vec<f64> {
        predicted
            .iter()
            .zip(expected.iter())
            .map(|(a, b)| a - b)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_loss_on_match() {
        assert_eq!(MseLoss::loss(&[1.0, 2.0], &[1.0, 2.0]), 0.0);
    }

    #[test]
    fn mean_of_squared_errors() {
        // ((1)² + (3)²) / 2 = 5
        assert_eq!(MseLoss::loss(&[2.0, 0.0], &[1.0, 3.0]), 5.0);
        assert_eq!(MseLoss::derivative(&[2.0, 0.0], &[1.0, 3.0]), vec![1.0, -3.0]);
    }
}
