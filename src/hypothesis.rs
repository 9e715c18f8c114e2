//! Hypothesis traits and the aggregates
//! returned by the boosting algorithms.
mod hypothesis_traits;
mod weighted_sum;
mod weighted_median;

pub use hypothesis_traits::Regressor;
pub use weighted_sum::WeightedSum;
pub use weighted_median::WeightedMedian;
