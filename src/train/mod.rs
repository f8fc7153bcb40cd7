pub mod trainer;

pub use trainer::{evaluate, mean_loss, train, train_epoch};
