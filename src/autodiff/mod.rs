//! Reverse-mode automatic differentiation over a dynamically built
//! computation graph of scalar values.
//!
//! A [`Tape`] owns an arena of nodes; a [`Scalar`] is a cheap `Copy` handle
//! into it. Arithmetic on scalars records tagged operations, and
//! [`Scalar::backprop`] replays them in reverse to accumulate gradients.

pub mod tape;

pub use tape::{IntoScalar, Scalar, Tape};
