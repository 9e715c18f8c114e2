//! Provides the `WeakLearner` trait.
use crate::Sample;
use super::type_and_struct::GradientHessian;


/// An algorithm that turns per-galaxy first/second-order statistics
/// into a single hypothesis.
/// The boosting algorithm decides what the statistics mean:
/// sample weights for AdaBoost.R2,
/// loss derivatives for the gradient-boosting family.
/// Rows whose gradient and hessian are both zero are ignored,
/// which is how boosters express subsampling and validation holdout.
pub trait WeakLearner {
    /// The type of hypothesis this learner produces.
    type Hypothesis;


    /// Returns the name of the weak learner.
    fn name(&self) -> &str;


    /// Produces a hypothesis for the given statistics.
    fn produce(&self, sample: &Sample, gh: &[GradientHessian])
        -> Self::Hypothesis;
}
