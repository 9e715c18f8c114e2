//! The extreme gradient boosting algorithm.
mod xgboost_algorithm;

pub use xgboost_algorithm::XgBoost;
