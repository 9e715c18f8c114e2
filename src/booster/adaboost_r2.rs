//! The AdaBoost.R2 algorithm.
mod adaboost_r2_algorithm;

pub use adaboost_r2_algorithm::{AdaBoostR2, R2Loss};
