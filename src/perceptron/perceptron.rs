use crate::activation::ActivationFunction;
use crate::autodiff::{Scalar, Tape};
use crate::error::{MatrixError, Result};
use crate::math::Matrix;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{self, BufReader, BufWriter};

/// A single-layer perceptron: one weight per input feature plus a bias,
/// squashed through an activation function.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Perceptron {
    weights: Matrix,
    bias: f64,
    activator: ActivationFunction,
}

/// The model's parameters staged as leaf nodes on a gradient tape.
///
/// Holds handles back into the tape so an optimizer can read the gradient
/// of each parameter after a backward pass.
pub struct StagedPerceptron<'t> {
    pub weights: Vec<Scalar<'t>>,
    pub bias: Scalar<'t>,
    activator: ActivationFunction,
}

impl Perceptron {
    /// Creates a perceptron with `n_inputs` randomly initialized weights.
    ///
    /// # Arguments
    ///
    /// * `n_inputs` - Number of input features (must be non-zero)
    /// * `activator` - Activation applied to the weighted sum
    pub fn new(n_inputs: usize, activator: ActivationFunction) -> Result<Perceptron> {
        Ok(Perceptron {
            weights: Matrix::random(1, n_inputs)?,
            bias: 0.0,
            activator,
        })
    }

    pub fn n_inputs(&self) -> usize {
        self.weights.cols()
    }

    pub fn weights(&self) -> &Matrix {
        &self.weights
    }

    pub fn bias(&self) -> f64 {
        self.bias
    }

    pub fn set_weight(&mut self, i: usize, value: f64) -> Result<()> {
        self.weights.set(0, i, value)
    }

    pub fn set_bias(&mut self, value: f64) {
        self.bias = value;
    }

    /// Inference pass: activation(W·x + b), computed with the matrix engine.
    pub fn forward(&self, input: &[f64]) -> Result<f64> {
        if input.len() != self.n_inputs() {
            return Err(MatrixError::DimensionMismatch {
                left: (1, self.n_inputs()),
                right: (input.len(), 1),
            });
        }
        let x = Matrix::new(input.len(), 1, input.to_vec())?;
        let z = self.weights.matmul(&x)?;
        Ok(self.activator.function(z.get(0, 0)? + self.bias))
    }

    /// Copies the parameters onto `tape` as leaves, for a differentiable pass.
    pub fn stage<'t>(&self, tape: &'t Tape) -> Result<StagedPerceptron<'t>> {
        let mut weights = Vec::with_capacity(self.n_inputs());
        for i in 0..self.n_inputs() {
            weights.push(tape.scalar(self.weights.get(0, i)?));
        }
        Ok(StagedPerceptron {
            weights,
            bias: tape.scalar(self.bias),
            activator: self.activator,
        })
    }

    /// Saves the model to a JSON file.
    pub fn save_json(&self, path: &str) -> io::Result<()> {
        let file = File::create(path)?;
        let writer = BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)
            .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;
        Ok(())
    }

    /// Loads a model previously written by [`Perceptron::save_json`].
    pub fn load_json(path: &str) -> io::Result<Perceptron> {
        let file = File::open(path)?;
        let reader = BufReader::new(file);
        let model = serde_json::from_reader(reader)
            .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;
        Ok(model)
    }
}

impl<'t> StagedPerceptron<'t> {
    /// Differentiable forward pass over the staged parameters.
    pub fn forward(&self, input: &[f64]) -> Result<Scalar<'t>> {
        if input.len() != self.weights.len() {
            return Err(MatrixError::DimensionMismatch {
                left: (1, self.weights.len()),
                right: (input.len(), 1),
            });
        }
        let mut sum = self.bias;
        for (w, x) in self.weights.iter().zip(input.iter()) {
            sum = sum.add(w.mul(*x));
        }
        Ok(self.activator.apply(sum))
    }
}
