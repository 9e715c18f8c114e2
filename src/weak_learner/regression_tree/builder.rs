use crate::Sample;
use super::bin::Bins;
use super::regression_tree_algorithm::RegressionTree;

use std::collections::HashMap;


/// The number of histogram bins set as default.
pub const DEFAULT_MAX_BINS: usize = 255;
/// The maximal depth set as default.
pub const DEFAULT_MAX_DEPTH: usize = 3;
/// Default L2-regularization parameter for the leaf values.
pub const DEFAULT_LAMBDA_L2: f64 = 0.01;


/// How candidate split thresholds are generated.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SplitStrategy {
    /// Thresholds at midpoints between consecutive distinct values
    /// (the classical greedy tree).
    Exact,
    /// Equal-width histogram binning capped at the given number of bins.
    Hist(usize),
}


/// A struct that builds `RegressionTree`.
/// `RegressionTreeBuilder` keeps parameters for constructing
/// `RegressionTree`.
///
/// # Example
///
/// ```no_run
/// use photoz_boost::prelude::*;
/// # let sample: Sample = unimplemented!();
///
/// let weak_learner = RegressionTreeBuilder::new(&sample)
///     .max_depth(3)
///     .split_strategy(SplitStrategy::Hist(255))
///     .lambda_l2(0.1)
///     .build();
/// ```
#[derive(Clone)]
pub struct RegressionTreeBuilder<'a> {
    sample: &'a Sample,

    strategy: SplitStrategy,

    max_depth: usize,

    /// L2 regularization for the leaf values.
    lambda_l2: f64,

    /// Minimum gain required to keep a split.
    gamma: f64,

    /// Minimum hessian mass required in each child.
    min_child_weight: f64,
}


impl<'a> RegressionTreeBuilder<'a> {
    /// Construct a new instance of `RegressionTreeBuilder`.
    /// By default,
    /// `RegressionTreeBuilder` sets the parameters as follows;
    /// ```text
    /// strategy: SplitStrategy::Hist(DEFAULT_MAX_BINS == 255),
    /// max_depth: DEFAULT_MAX_DEPTH == 3,
    /// lambda_l2: DEFAULT_LAMBDA_L2 == 0.01,
    /// gamma: 0.0,
    /// min_child_weight: 0.0,
    /// ```
    pub fn new(sample: &'a Sample) -> Self {
        Self {
            sample,
            strategy: SplitStrategy::Hist(DEFAULT_MAX_BINS),
            max_depth: DEFAULT_MAX_DEPTH,
            lambda_l2: DEFAULT_LAMBDA_L2,
            gamma: 0.0,
            min_child_weight: 0.0,
        }
    }


    /// Specify the split strategy. Default is `SplitStrategy::Hist(255)`.
    pub fn split_strategy(mut self, strategy: SplitStrategy) -> Self {
        if let SplitStrategy::Hist(n_bins) = strategy {
            assert!(n_bins > 0);
        }
        self.strategy = strategy;
        self
    }


    /// Specify the maximal depth of the tree.
    /// Default maximal depth is `3`.
    pub fn max_depth(mut self, depth: usize) -> Self {
        assert!(depth > 0);
        self.max_depth = depth;
        self
    }


    /// Set the L2-regularization parameter.
    pub fn lambda_l2(mut self, lambda_l2: f64) -> Self {
        assert!(lambda_l2 >= 0.0);
        self.lambda_l2 = lambda_l2;
        self
    }


    /// Set the minimum gain a split must achieve to be kept.
    pub fn gamma(mut self, gamma: f64) -> Self {
        assert!(gamma >= 0.0);
        self.gamma = gamma;
        self
    }


    /// Set the minimum hessian mass required in each child.
    pub fn min_child_weight(mut self, min_child_weight: f64) -> Self {
        assert!(min_child_weight >= 0.0);
        self.min_child_weight = min_child_weight;
        self
    }


    /// Build a `RegressionTree`.
    /// This method consumes `self`.
    pub fn build(self) -> RegressionTree<'a> {
        let bins = self.sample.features()
            .iter()
            .map(|feature| {
                let bins = match self.strategy {
                    SplitStrategy::Exact => Bins::exact(feature),
                    SplitStrategy::Hist(max_bins) => {
                        let n_bins = feature.distinct_value_count()
                            .clamp(1, max_bins);
                        Bins::cut(feature, n_bins)
                    },
                };
                (feature.name(), bins)
            })
            .collect::<HashMap<_, _>>();


        RegressionTree::from_components(
            bins,
            self.max_depth,
            self.lambda_l2,
            self.gamma,
            self.min_child_weight,
        )
    }
}
