//! Provides the extreme gradient boosting algorithm:
//!
//! [Tianqi Chen and Carlos Guestrin, 2016 - XGBoost: A Scalable Tree Boosting System](https://dl.acm.org/doi/10.1145/2939672.2939785)
use rayon::prelude::*;

use crate::{
    Sample,
    Booster,
    WeakLearner,
    Regressor,
    GradientHessian,
    WeightedSum,
};

use std::ops::ControlFlow;


/// The extreme gradient boosting algorithm for the squared loss.
/// Each round hands the weak learner the exact first and second
/// derivatives of the loss at the current predictions;
/// the regularized leaf values of the produced tree are already the
/// Newton step, so the booster only applies the shrinkage `eta`.
///
/// The regularization surface lives in the weak learner:
/// set `lambda_l2`, `gamma` and `min_child_weight` on the
/// `RegressionTreeBuilder` this booster runs with.
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
/// let mut booster = XgBoost::init(&sample)
///     .eta(0.3)
///     .max_loop(100);
///
/// let weak_learner = RegressionTreeBuilder::new(&sample)
///     .max_depth(6)
///     .lambda_l2(1.0)
///     .gamma(0.0)
///     .min_child_weight(1.0)
///     .build();
///
/// let f = booster.run(&weak_learner);
/// ```
pub struct XgBoost<'a, F> {
    // Training data
    sample: &'a Sample,

    // Shrinkage applied to every Newton step
    eta: f64,

    // Maximal number of rounds
    max_iter: usize,

    // Baseline prediction; the target mean unless overridden
    base_score: Option<f64>,

    // Terminated iteration.
    terminated: usize,

    intercept: f64,

    // A prediction vector at a state.
    predictions: Vec<f64>,

    // Weights on hypotheses
    weights: Vec<f64>,

    // Hypotheses obtained by the weak learner
    hypotheses: Vec<F>,
}


impl<'a, F> XgBoost<'a, F> {
    /// Construct a new instance of `XgBoost`.
    pub fn init(sample: &'a Sample) -> Self {
        Self {
            sample,
            eta: 0.3,
            max_iter: 100,
            base_score: None,
            terminated: usize::MAX,
            intercept: 0.0,
            predictions: Vec::new(),
            weights: Vec::new(),
            hypotheses: Vec::new(),
        }
    }


    /// Set the shrinkage. Default is `0.3`.
    pub fn eta(mut self, eta: f64) -> Self {
        assert!(0.0 < eta && eta <= 1.0);
        self.eta = eta;
        self
    }


    /// Set the maximal number of boosting rounds. Default is `100`.
    pub fn max_loop(mut self, max_iter: usize) -> Self {
        assert!(max_iter > 0);
        self.max_iter = max_iter;
        self
    }


    /// Override the baseline prediction.
    /// By default the mean redshift of the training galaxies is used.
    pub fn base_score(mut self, base_score: f64) -> Self {
        self.base_score = Some(base_score);
        self
    }


    /// Returns the round at which the boosting stopped.
    pub fn terminated(&self) -> usize {
        self.terminated
    }
}


impl<F> Booster<F> for XgBoost<'_, F>
    where F: Regressor,
{
    type Output = WeightedSum<F>;


    fn name(&self) -> &str {
        "XGBoost"
    }


    fn info(&self) -> Option<Vec<(&str, String)>> {
        let (n_sample, n_feature) = self.sample.shape();
        let info = Vec::from([
            ("# of examples", format!("{n_sample}")),
            ("# of features", format!("{n_feature}")),
            ("Eta", format!("{}", self.eta)),
            ("Max iteration", format!("{}", self.max_iter)),
        ]);
        Some(info)
    }


    fn preprocess(&mut self) {
        self.sample.target_is_specified();
        let n_sample = self.sample.shape().0;
        assert!(n_sample > 0);

        let target = self.sample.target();
        self.intercept = self.base_score.unwrap_or_else(|| {
            target.iter().sum::<f64>() / n_sample as f64
        });
        self.predictions = vec![self.intercept; n_sample];

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


        // First/second derivatives of the squared loss.
        let gh = self.sample.target()
            .iter()
            .zip(&self.predictions[..])
            .map(|(y, p)| GradientHessian::new(p - y, 1.0))
            .collect::<Vec<_>>();

        let h = weak_learner.produce(self.sample, &gh);
        let tree_predictions = h.predict_all(self.sample);

        self.weights.push(self.eta);
        self.hypotheses.push(h);

        let eta = self.eta;
        self.predictions.par_iter_mut()
            .zip(tree_predictions)
            .for_each(|(p, q)| { *p += eta * q; });

        ControlFlow::Continue(())
    }


    fn postprocess(&mut self) -> Self::Output {
        WeightedSum::from_components(
            self.intercept,
            std::mem::take(&mut self.weights),
            std::mem::take(&mut self.hypotheses),
        )
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::RegressionTreeBuilder;
    use crate::weak_learner::SplitStrategy;

    use polars::prelude::*;


    fn two_band_sample() -> Sample {
        let mag_r: Vec<f64> = (0..40).map(|i| 18.0 + 0.1 * i as f64)
            .collect();
        let mag_i: Vec<f64> = mag_r.iter().map(|m| m - 0.4).collect();
        let z: Vec<f64> = mag_r.iter().map(|m| 0.05 * (m - 18.0))
            .collect();
        let df = df!("mag_r" => &mag_r, "mag_i" => &mag_i).unwrap();
        let target = Series::new("z_spec", &z);
        Sample::from_dataframe(df, target).unwrap()
    }


    #[test]
    fn newton_steps_fit_the_relation() {
        let sample = two_band_sample();
        let weak_learner = RegressionTreeBuilder::new(&sample)
            .max_depth(4)
            .split_strategy(SplitStrategy::Exact)
            .lambda_l2(1.0)
            .build();

        let mut booster = XgBoost::init(&sample)
            .eta(0.3)
            .max_loop(100);
        let f = booster.run(&weak_learner);

        let predictions = f.predict_all(&sample);
        let mse = sample.target()
            .iter()
            .zip(&predictions[..])
            .map(|(y, p)| (y - p).powi(2))
            .sum::<f64>() / 40.0;

        assert!(mse < 1e-3);
    }


    #[test]
    fn large_min_child_weight_forces_a_stump() {
        let sample = two_band_sample();
        // No child can hold 40 units of hessian mass,
        // so every round returns a single leaf.
        let weak_learner = RegressionTreeBuilder::new(&sample)
            .max_depth(4)
            .min_child_weight(40.0)
            .build();

        let mut booster = XgBoost::init(&sample).max_loop(3);
        let f = booster.run(&weak_learner);

        let predictions = f.predict_all(&sample);
        assert!(predictions.windows(2).all(|w| w[0] == w[1]));
    }


    #[test]
    fn base_score_shifts_the_start() {
        let sample = two_band_sample();

        let mut booster: XgBoost<'_, crate::RegressionTreeRegressor> =
            XgBoost::init(&sample).base_score(0.5);
        booster.preprocess();
        let f = booster.postprocess();

        assert_eq!(f.intercept, 0.5);
        assert!(f.is_empty());
    }
}
