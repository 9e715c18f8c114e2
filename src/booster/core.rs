//! Provides `Booster` trait.

use crate::WeakLearner;
use std::ops::ControlFlow;

/// The trait [`Booster`] defines the standard framework of boosting:
/// a repeated game between **Booster** and **Weak Learner**.
///
/// In each round `t = 1, 2, ...`,
/// 1. Booster assigns first/second-order statistics to
///    the training instances,
/// 2. Weak Learner fits a hypothesis to those statistics.
///
/// After sufficient rounds, Booster aggregates the hypotheses
/// into a single regressor.
///
/// # Required Methods
/// - [`Booster::name`]
/// - [`Booster::preprocess`]
/// - [`Booster::boost`]
/// - [`Booster::postprocess`]
/// - [`Booster::info`] ... optional.
///
/// # Provided Methods
/// - [`Booster::run`]
pub trait Booster<H> {
    /// The final hypothesis output by a boosting algorithm.
    type Output;

    /// Returns the name of the boosting algorithm.
    fn name(&self) -> &str;

    /// Returns the information of boosting algorithm as `String`.
    fn info(&self) -> Option<Vec<(&str, String)>> {
        None
    }

    /// A main function that runs boosting algorithm.
    fn run<W>(&mut self, weak_learner: &W) -> Self::Output
        where W: WeakLearner<Hypothesis = H>
    {
        self.preprocess();

        let _ = (1..).try_for_each(|iter|
            self.boost(weak_learner, iter)
        );

        self.postprocess()
    }

    /// Pre-processing for `self`.
    /// As you can see in [`Booster::run`],
    /// this method is called before the boosting process.
    fn preprocess(&mut self);

    /// Boosting step per iteration.
    fn boost<W>(
        &mut self,
        weak_learner: &W,
        iteration: usize,
    ) -> ControlFlow<usize>
        where W: WeakLearner<Hypothesis = H>;

    /// Post-processing.
    fn postprocess(&mut self) -> Self::Output;
}
