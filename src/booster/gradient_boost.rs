//! The gradient-boosting machine.
mod gbm;

pub use gbm::GradientBoost;
