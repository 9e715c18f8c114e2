//! The regression-tree weak learner.
mod bin;
mod builder;
mod node;
mod train_node;
mod regression_tree_algorithm;
mod regression_tree_regressor;

pub use builder::{RegressionTreeBuilder, SplitStrategy};
pub use regression_tree_algorithm::RegressionTree;
pub use regression_tree_regressor::RegressionTreeRegressor;
