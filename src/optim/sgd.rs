use crate::error::Result;
use crate::perceptron::{Perceptron, StagedPerceptron};

/// Plain stochastic gradient descent.
pub struct Sgd {
    pub learning_rate: f64,
}

impl Sgd {
    pub fn new(learning_rate: f64) -> Sgd {
        Sgd { learning_rate }
    }

    /// Applies one descent step, reading gradients off the staged parameters.
    pub fn step(&self, model: &mut Perceptron, staged: &StagedPerceptron) -> Result<()> {
        for (i, w) in staged.weights.iter().enumerate() {
            let updated = model.weights().get(0, i)? - self.learning_rate * w.grad();
            model.set_weight(i, updated)?;
        }
        model.set_bias(model.bias() - self.learning_rate * staged.bias.grad());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::activation::ActivationFunction;
    use crate::autodiff::Tape;

    #[test]
    fn step_moves_against_the_gradient() {
        let mut model = Perceptron::new(2, ActivationFunction::Identity).unwrap();
        model.set_weight(0, 1.0).unwrap();
        model.set_weight(1, 1.0).unwrap();
        model.set_bias(0.0);

        let tape = Tape::new();
        let staged = model.stage(&tape).unwrap();
        let y = staged.forward(&[2.0, -3.0]).unwrap();
        y.backprop();

        Sgd::new(0.1).step(&mut model, &staged).unwrap();
        // grads: [2, -3], bias 1
        assert!((model.weights().get(0, 0).unwrap() - 0.8).abs() < 1e-12);
        assert!((model.weights().get(0, 1).unwrap() - 1.3).abs() < 1e-12);
        assert!((model.bias() + 0.1).abs() < 1e-12);
    }
}
