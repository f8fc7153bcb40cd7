pub mod activation;
pub mod autodiff;
pub mod data;
pub mod error;
pub mod loss;
pub mod math;
pub mod optim;
pub mod perceptron;
pub mod train;

// Convenience re-exports
pub use activation::activation::ActivationFunction;
pub use autodiff::{IntoScalar, Scalar, Tape};
pub use error::{MatrixError, Result};
pub use loss::mse::MseLoss;
pub use math::matrix::Matrix;
pub use optim::sgd::Sgd;
pub use perceptron::perceptron::Perceptron;
pub use train::trainer::{evaluate, mean_loss, train, train_epoch};
