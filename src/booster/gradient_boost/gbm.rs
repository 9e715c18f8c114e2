//! Provides the Gradient Boosting Machine by Friedman, 2001.
use rayon::prelude::*;
use rand::prelude::*;
use rand::rngs::StdRng;

use crate::{
    common::{GBMLoss, LossFunction},
    Sample,
    Booster,
    WeakLearner,
    Regressor,
    GradientHessian,
    WeightedSum,
};

use std::ops::ControlFlow;


/// The Gradient Boosting Machine proposed in the following paper:
///
/// [Jerome H. Friedman, 2001 - Greedy Function Approximation: A Gradient Boosting Machine](https://projecteuclid.org/journals/annals-of-statistics/volume-29/issue-5/Greedy-function-approximation-A-gradient-boostingmachine/10.1214/aos/1013203451.full)
///
/// GBM regards boosting as gradient descent over a functional space:
/// each round fits a regression tree to the pseudo-residuals of the
/// loss at the current predictions,
/// then takes the exact line-search step for that tree,
/// shrunk by the learning rate.
/// Setting `subsample` below one gives the stochastic variant,
/// where every round sees a fresh random subset of the galaxies.
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
/// let mut booster = GradientBoost::init_with_loss(&sample, GBMLoss::L2)
///     .learning_rate(0.1)
///     .max_loop(100);
///
/// let weak_learner = RegressionTreeBuilder::new(&sample)
///     .max_depth(3)
///     .split_strategy(SplitStrategy::Exact)
///     .build();
///
/// let f = booster.run(&weak_learner);
/// let predictions = f.predict_all(&sample);
/// ```
pub struct GradientBoost<'a, F> {
    // Training data
    sample: &'a Sample,

    // Some struct that implements `LossFunction` trait
    loss: GBMLoss,

    // Shrinkage applied to every line-search step
    learning_rate: f64,

    // Fraction of galaxies a round trains on
    subsample: f64,

    // Seed for the subsampling draws
    seed: u64,

    rng: Option<StdRng>,

    // Max iteration until GBM guarantees the optimality.
    max_iter: usize,

    // Terminated iteration.
    terminated: usize,

    // The constant baseline prediction
    intercept: f64,

    // A prediction vector at a state.
    predictions: Vec<f64>,

    // Weights on hypotheses
    weights: Vec<f64>,

    // Hypotheses obtained by the weak learner
    hypotheses: Vec<F>,
}


impl<'a, F> GradientBoost<'a, F> {
    /// Initialize the `GradientBoost` with the given loss.
    pub fn init_with_loss(sample: &'a Sample, loss: GBMLoss) -> Self {
        Self {
            sample,
            loss,
            learning_rate: 0.1,
            subsample: 1.0,
            seed: 1234,
            rng: None,
            max_iter: 100,
            terminated: usize::MAX,
            intercept: 0.0,
            predictions: Vec::new(),
            weights: Vec::new(),
            hypotheses: Vec::new(),
        }
    }


    /// Set the loss function.
    pub fn loss(mut self, loss: GBMLoss) -> Self {
        self.loss = loss;
        self
    }


    /// Set the shrinkage. Default is `0.1`.
    pub fn learning_rate(mut self, learning_rate: f64) -> Self {
        assert!(learning_rate > 0.0);
        self.learning_rate = learning_rate;
        self
    }


    /// Set the fraction of galaxies each round trains on.
    /// Default is `1.0`, i.e., no subsampling.
    pub fn subsample(mut self, subsample: f64) -> Self {
        assert!(0.0 < subsample && subsample <= 1.0);
        self.subsample = subsample;
        self
    }


    /// Set the seed of the subsampling draws.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }


    /// Set the maximal number of boosting rounds. Default is `100`.
    pub fn max_loop(mut self, max_iter: usize) -> Self {
        assert!(max_iter > 0);
        self.max_iter = max_iter;
        self
    }


    /// Returns the round at which the boosting stopped.
    pub fn terminated(&self) -> usize {
        self.terminated
    }


    /// Least-squares statistics for the pseudo-residuals,
    /// restricted to the rows of the current round.
    fn residual_gh(&mut self) -> Vec<GradientHessian> {
        let n_sample = self.sample.shape().0;
        let residuals = self.loss.pseudo_residuals(
            &self.predictions[..], self.sample.target(),
        );

        let mut gh = vec![GradientHessian::default(); n_sample];
        if self.subsample < 1.0 {
            let k = ((self.subsample * n_sample as f64).ceil() as usize)
                .clamp(1, n_sample);
            let rng = self.rng.as_mut()
                .expect("Booster::preprocess is not called");
            let chosen = rand::seq::index::sample(rng, n_sample, k);
            for i in chosen {
                gh[i] = GradientHessian::new(-residuals[i], 1.0);
            }
        } else {
            for (g, r) in gh.iter_mut().zip(&residuals[..]) {
                *g = GradientHessian::new(-r, 1.0);
            }
        }
        gh
    }
}


impl<F> Booster<F> for GradientBoost<'_, F>
    where F: Regressor,
{
    type Output = WeightedSum<F>;


    fn name(&self) -> &str {
        "Gradient Boosting Machine"
    }


    fn info(&self) -> Option<Vec<(&str, String)>> {
        let (n_sample, n_feature) = self.sample.shape();
        let info = Vec::from([
            ("# of examples", format!("{n_sample}")),
            ("# of features", format!("{n_feature}")),
            ("Loss", self.loss.name().to_string()),
            ("Learning rate", format!("{}", self.learning_rate)),
            ("Subsample", format!("{}", self.subsample)),
            ("Max iteration", format!("{}", self.max_iter)),
        ]);
        Some(info)
    }


    fn preprocess(&mut self) {
        self.sample.target_is_specified();
        let n_sample = self.sample.shape().0;
        assert!(n_sample > 0);

        self.intercept = self.loss.minimizing_constant(self.sample.target());
        self.predictions = vec![self.intercept; n_sample];
        self.rng = Some(StdRng::seed_from_u64(self.seed));

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


        let gh = self.residual_gh();
        let h = weak_learner.produce(self.sample, &gh);

        let tree_predictions = h.predict_all(self.sample);
        let step = self.loss.best_step(
            self.sample.target(),
            &self.predictions[..],
            &tree_predictions[..],
        );
        let coef = self.learning_rate * step;

        // A zero step means the new tree cannot reduce the loss,
        // so the boosting can terminate here.
        if coef == 0.0 {
            self.terminated = iteration;
            return ControlFlow::Break(iteration);
        }


        self.weights.push(coef);
        self.hypotheses.push(h);


        self.predictions.par_iter_mut()
            .zip(tree_predictions)
            .for_each(|(p, q)| { *p += coef * q; });

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


    fn linear_sample() -> Sample {
        let mag: Vec<f64> = (0..32).map(|i| i as f64).collect();
        let z: Vec<f64> = mag.iter().map(|m| 0.02 * m + 0.1).collect();
        let df = df!("mag_r" => &mag).unwrap();
        let target = Series::new("z_spec", &z);
        Sample::from_dataframe(df, target).unwrap()
    }


    #[test]
    fn l2_boosting_reduces_the_training_loss() {
        let sample = linear_sample();
        let weak_learner = RegressionTreeBuilder::new(&sample)
            .max_depth(3)
            .split_strategy(SplitStrategy::Exact)
            .build();

        let mut booster =
            GradientBoost::init_with_loss(&sample, GBMLoss::L2)
                .learning_rate(0.5)
                .max_loop(50);
        let f = booster.run(&weak_learner);

        let predictions = f.predict_all(&sample);
        let mse = sample.target()
            .iter()
            .zip(&predictions[..])
            .map(|(y, p)| (y - p).powi(2))
            .sum::<f64>() / sample.shape().0 as f64;

        // The intercept alone gives a variance around 0.034.
        assert!(mse < 1e-3);
    }


    #[test]
    fn intercept_is_the_loss_minimizer() {
        let sample = linear_sample();

        let mut booster: GradientBoost<'_, crate::RegressionTreeRegressor> =
            GradientBoost::init_with_loss(&sample, GBMLoss::L1);
        booster.preprocess();

        let f = booster.postprocess();
        let median = {
            let mut z = sample.target().to_vec();
            z.sort_by(|a, b| a.partial_cmp(b).unwrap());
            (z[15] + z[16]) / 2.0
        };
        assert!((f.intercept - median).abs() < 1e-12);
    }


    #[test]
    fn subsampling_is_reproducible() {
        let sample = linear_sample();
        let weak_learner = RegressionTreeBuilder::new(&sample)
            .max_depth(2)
            .split_strategy(SplitStrategy::Exact)
            .build();

        let run = |seed| {
            let mut booster =
                GradientBoost::init_with_loss(&sample, GBMLoss::L2)
                    .subsample(0.5)
                    .seed(seed)
                    .max_loop(10);
            let f = booster.run(&weak_learner);
            f.predict_all(&sample)
        };

        assert_eq!(run(7), run(7));
        assert_ne!(run(7), run(8));
    }
}
