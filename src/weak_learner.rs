//! Weak learners for the boosting protocol.
//!
//! Every boosting algorithm in this crate drives the same
//! weak learner: a regression tree grown on per-galaxy
//! gradient/hessian statistics.
mod core;
mod common;
mod regression_tree;

pub use self::core::WeakLearner;
pub use common::type_and_struct::GradientHessian;
pub use regression_tree::{
    RegressionTree,
    RegressionTreeBuilder,
    RegressionTreeRegressor,
    SplitStrategy,
};

pub(crate) use common::split_rule;
pub(crate) use common::type_and_struct;
