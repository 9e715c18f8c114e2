//! The boosting algorithms.
mod core;
mod adaboost_r2;
mod gradient_boost;
mod hist_gradient_boost;
mod xgboost;

pub use self::core::Booster;
pub use self::adaboost_r2::{AdaBoostR2, R2Loss};
pub use self::gradient_boost::GradientBoost;
pub use self::hist_gradient_boost::HistGradientBoost;
pub use self::xgboost::XgBoost;
