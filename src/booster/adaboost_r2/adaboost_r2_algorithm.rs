//! Provides AdaBoost.R2 by Drucker, 1997.
use crate::{
    common::utils,
    Sample,
    Booster,
    WeakLearner,
    Regressor,
    GradientHessian,
    WeightedMedian,
};

use std::fmt;
use std::ops::ControlFlow;


/// How the absolute prediction errors are mapped to `[0, 1]`
/// before the reweighting step of [`AdaBoostR2`].
/// Every variant first divides the error by the largest error
/// of the round.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum R2Loss {
    /// The relative error itself.
    #[default]
    Linear,
    /// The squared relative error.
    Square,
    /// `1 - exp(-relative error)`.
    Exponential,
}


impl R2Loss {
    fn eval(&self, error: f64, max_error: f64) -> f64 {
        let relative = error / max_error;
        match self {
            Self::Linear => relative,
            Self::Square => relative.powi(2),
            Self::Exponential => 1.0 - (-relative).exp(),
        }
    }
}


impl fmt::Display for R2Loss {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Linear => "Linear",
            Self::Square => "Square",
            Self::Exponential => "Exponential",
        };
        write!(f, "{name}")
    }
}


/// The AdaBoost.R2 algorithm proposed in the following paper:
///
/// [Harris Drucker, 1997 - Improving Regressors using Boosting Techniques](https://citeseerx.ist.psu.edu/doc/10.1.1.31.314)
///
/// AdaBoost.R2 maintains a distribution over the training galaxies.
/// In each round it asks the weak learner for a regressor fitted
/// under that distribution,
/// maps the absolute errors to `[0, 1]`,
/// and shifts the distribution towards the galaxies
/// the round predicted poorly.
/// The final prediction is the weighted median of the member
/// predictions, so a few bad rounds cannot drag the estimate away.
///
/// # Example
///
/// ```no_run
/// use photoz_boost::prelude::*;
///
/// let sample = SampleReader::new()
///     .file("galaxies.csv")
///     .has_header(true)
///     .target_feature("z_spec")
///     .read()
///     .unwrap();
///
/// let mut booster = AdaBoostR2::init(&sample)
///     .loss(R2Loss::Linear)
///     .max_loop(50);
///
/// let weak_learner = RegressionTreeBuilder::new(&sample)
///     .max_depth(3)
///     .build();
///
/// let f = booster.run(&weak_learner);
/// let predictions = f.predict_all(&sample);
/// ```
pub struct AdaBoostR2<'a, F> {
    // Training data
    sample: &'a Sample,

    // Distribution over the training galaxies
    dist: Vec<f64>,

    // How the errors enter the reweighting
    loss: R2Loss,

    // Scales the log model weights and the reweighting exponent
    learning_rate: f64,

    // Maximal number of rounds
    max_iter: usize,

    // Terminated iteration.
    terminated: usize,

    // ln(1 / beta_t) for each kept hypothesis
    weights: Vec<f64>,

    // Hypotheses obtained by the weak learner
    hypotheses: Vec<F>,
}


impl<'a, F> AdaBoostR2<'a, F> {
    /// Construct a new instance of `AdaBoostR2`.
    pub fn init(sample: &'a Sample) -> Self {
        Self {
            sample,
            dist: Vec::new(),
            loss: R2Loss::default(),
            learning_rate: 1.0,
            max_iter: 50,
            terminated: usize::MAX,
            weights: Vec::new(),
            hypotheses: Vec::new(),
        }
    }


    /// Set the error-to-loss mapping. Default is `R2Loss::Linear`.
    pub fn loss(mut self, loss: R2Loss) -> Self {
        self.loss = loss;
        self
    }


    /// Scale the contribution of each round.
    /// Values below one slow the distribution shift down and
    /// flatten the model weights. Default is `1.0`.
    pub fn learning_rate(mut self, learning_rate: f64) -> Self {
        assert!(learning_rate > 0.0);
        self.learning_rate = learning_rate;
        self
    }


    /// Set the maximal number of boosting rounds. Default is `50`.
    pub fn max_loop(mut self, max_iter: usize) -> Self {
        assert!(max_iter > 0);
        self.max_iter = max_iter;
        self
    }


    /// Returns the round at which the boosting stopped.
    pub fn terminated(&self) -> usize {
        self.terminated
    }


    /// A weighted least-squares fit under the current distribution:
    /// each galaxy contributes its weight as curvature and
    /// pulls the leaf value towards its redshift.
    fn weighted_gh(&self) -> Vec<GradientHessian> {
        self.sample.target()
            .iter()
            .zip(&self.dist[..])
            .map(|(y, d)| GradientHessian::new(-d * y, *d))
            .collect()
    }
}


impl<F> Booster<F> for AdaBoostR2<'_, F>
    where F: Regressor + Clone,
{
    type Output = WeightedMedian<F>;


    fn name(&self) -> &str {
        "AdaBoost.R2"
    }


    fn info(&self) -> Option<Vec<(&str, String)>> {
        let (n_sample, n_feature) = self.sample.shape();
        let info = Vec::from([
            ("# of examples", format!("{n_sample}")),
            ("# of features", format!("{n_feature}")),
            ("Loss", format!("{}", self.loss)),
            ("Learning rate", format!("{}", self.learning_rate)),
            ("Max iteration", format!("{}", self.max_iter)),
        ]);
        Some(info)
    }


    fn preprocess(&mut self) {
        self.sample.target_is_specified();
        let n_sample = self.sample.shape().0;
        assert!(n_sample > 0);

        self.dist = vec![1.0 / n_sample as f64; n_sample];
        self.weights = Vec::with_capacity(self.max_iter);
        self.hypotheses = Vec::with_capacity(self.max_iter);
        self.terminated = self.max_iter;
    }


    fn boost<W>(
        &mut self,
        weak_learner: &W,
        iteration: usize,
    ) -> ControlFlow<usize>
        where W: WeakLearner<Hypothesis = F>,
    {
        if self.max_iter < iteration {
            return ControlFlow::Break(self.max_iter);
        }


        let gh = self.weighted_gh();
        let h = weak_learner.produce(self.sample, &gh);

        let predictions = h.predict_all(self.sample);
        let errors = self.sample.target()
            .iter()
            .zip(&predictions[..])
            .map(|(y, p)| (y - p).abs())
            .collect::<Vec<_>>();

        let max_error = errors.iter().copied().fold(f64::MIN, f64::max);

        // A perfect round. Keep it and stop.
        if max_error <= 0.0 {
            self.weights.push(1.0);
            self.hypotheses.push(h);
            self.terminated = iteration;
            return ControlFlow::Break(iteration);
        }


        let avg_loss = errors.iter()
            .zip(&self.dist[..])
            .map(|(&e, &d)| d * self.loss.eval(e, max_error))
            .sum::<f64>();

        // The round is no better than random guessing: terminate.
        // The first round is kept regardless,
        // so the output ensemble is never empty.
        if avg_loss >= 0.5 {
            if self.hypotheses.is_empty() {
                self.weights.push(1.0);
                self.hypotheses.push(h);
            }
            self.terminated = iteration;
            return ControlFlow::Break(iteration);
        }


        let beta = avg_loss / (1.0 - avg_loss);

        self.dist.iter_mut()
            .zip(&errors[..])
            .for_each(|(d, &e)| {
                let exponent =
                    self.learning_rate * (1.0 - self.loss.eval(e, max_error));
                *d *= beta.powf(exponent);
            });
        utils::normalize(&mut self.dist[..]);


        self.weights.push(self.learning_rate * (1.0 / beta).ln());
        self.hypotheses.push(h);

        ControlFlow::Continue(())
    }


    fn postprocess(&mut self) -> Self::Output {
        WeightedMedian::from_slices(&self.weights[..], &self.hypotheses[..])
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::RegressionTreeBuilder;
    use crate::weak_learner::SplitStrategy;

    use polars::prelude::*;


    fn step_sample() -> Sample {
        let df = df!(
            "mag_r" => &[0.0, 1.0, 2.0, 3.0, 4.0, 5.0],
        ).unwrap();
        let target = Series::new(
            "z_spec", &[0.1, 0.1, 0.1, 0.8, 0.8, 0.8],
        );
        Sample::from_dataframe(df, target).unwrap()
    }


    #[test]
    fn fits_a_step_function() {
        let sample = step_sample();
        let weak_learner = RegressionTreeBuilder::new(&sample)
            .max_depth(2)
            .split_strategy(SplitStrategy::Exact)
            .lambda_l2(0.0)
            .build();

        let mut booster = AdaBoostR2::init(&sample).max_loop(10);
        let f = booster.run(&weak_learner);

        assert!(!f.is_empty());
        let predictions = f.predict_all(&sample);
        for (p, y) in predictions.iter().zip(sample.target()) {
            assert!((p - y).abs() < 0.05);
        }
    }


    #[test]
    fn stops_after_a_perfect_round() {
        let sample = step_sample();
        let weak_learner = RegressionTreeBuilder::new(&sample)
            .max_depth(3)
            .split_strategy(SplitStrategy::Exact)
            .lambda_l2(0.0)
            .build();

        let mut booster = AdaBoostR2::init(&sample).max_loop(100);
        let f = booster.run(&weak_learner);

        // A depth-3 exact tree nails the step function in one round.
        assert_eq!(f.len(), 1);
    }


    #[test]
    fn weak_rounds_survive_when_most_galaxies_fit() {
        // One outlying redshift; a constant prediction fits the rest
        // well, so the average loss stays below one half and the
        // round is kept even though it is far from perfect.
        let df = df!(
            "mag_r" => &[0.0, 1.0, 2.0, 3.0, 4.0, 5.0],
        ).unwrap();
        let target = Series::new(
            "z_spec", &[0.1, 0.1, 0.1, 0.1, 0.1, 0.9],
        );
        let sample = Sample::from_dataframe(df, target).unwrap();

        let weak_learner = RegressionTreeBuilder::new(&sample)
            .max_depth(1)
            .lambda_l2(0.0)
            .build();

        let mut booster = AdaBoostR2::init(&sample)
            .loss(R2Loss::Square)
            .max_loop(5);
        let f = booster.run(&weak_learner);

        assert!(!f.is_empty());
    }
}
