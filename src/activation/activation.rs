use crate::autodiff::Scalar;
use serde::{Deserialize, Serialize};
use std::f64::consts::E;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ActivationFunction {
    Identity,
    ReLU,
    Sigmoid,
    Tanh,
}

impl ActivationFunction {
    /// Element-wise activation on a plain value.
    pub fn function(&self, x: f64) -> f64 {
        match self {
            ActivationFunction::Identity => x,
            ActivationFunction::ReLU => {
                if x > 0.0 {
                    x
                } else {
                    0.0
                }
            }
            ActivationFunction::Sigmoid => 1.0 / (1.0 + E.powf(-x)),
            ActivationFunction::Tanh => x.tanh(),
        }
    }

    /// Element-wise derivative of the activation.
    pub fn derivative(&self, x: f64) -> f64 {
        match self {
            ActivationFunction::Identity => 1.0,
            ActivationFunction::ReLU => {
                if x > 0.0 {
                    1.0
                } else {
                    0.0
                }
            }
            ActivationFunction::Sigmoid => {
                let fx = self.function(x);
                fx * (1.0 - fx)
            }
            ActivationFunction::Tanh => {
                let t = x.tanh();
                1.0 - t * t
            }
        }
    }

    /// Applies the activation as a differentiable node on the input's tape.
    pub fn apply<'t>(&self, x: Scalar<'t>) -> Scalar<'t> {
        match self {
            ActivationFunction::Identity => x,
            ActivationFunction::ReLU => x.relu(),
            ActivationFunction::Sigmoid => x.sigmoid(),
            ActivationFunction::Tanh => x.tanh(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::autodiff::Tape;

    #[test]
    fn forward_values() {
        assert_eq!(ActivationFunction::ReLU.function(-3.0), 0.0);
        assert_eq!(ActivationFunction::ReLU.function(3.0), 3.0);
        assert!((ActivationFunction::Sigmoid.function(0.0) - 0.5).abs() < 1e-12);
        assert_eq!(ActivationFunction::Identity.function(1.5), 1.5);
    }

    #[test]
    fn derivatives_match_scalar_gradients() {
        for act in [
            ActivationFunction::Identity,
            ActivationFunction::ReLU,
            ActivationFunction::Sigmoid,
            ActivationFunction::Tanh,
        ] {
            for x0 in [-1.5, 0.5, 2.0] {
                let tape = Tape::new();
                let x = tape.scalar(x0);
                let y = act.apply(x);
                y.backprop();
                assert!(
                    (x.grad() - act.derivative(x0)).abs() < 1e-12,
                    "{act:?} at {x0}"
                );
            }
        }
    }
}
