//! Provides a histogram-based gradient boosting machine
//! in the style of LightGBM:
//!
//! [Guolin Ke et al., 2017 - LightGBM: A Highly Efficient Gradient Boosting Decision Tree](https://papers.nips.cc/paper_files/paper/2017/hash/6449f44a102fde848669bdd9eb6b76fa-Abstract.html)
use rayon::prelude::*;
use rand::prelude::*;
use rand::rngs::StdRng;

use crate::{
    Sample,
    Booster,
    WeakLearner,
    Regressor,
    GradientHessian,
    WeightedSum,
};

use std::ops::ControlFlow;


/// A second-order gradient boosting machine for the squared loss,
/// designed to run on a histogram-binned weak learner.
/// Pair it with a `RegressionTreeBuilder` using
/// `SplitStrategy::Hist`, which caps the number of split
/// candidates per feature and makes each round linear in the
/// number of galaxies.
///
/// When early stopping is enabled,
/// a fraction of the galaxies is held out before the first round
/// and the boosting stops once the held-out squared loss has not
/// improved for `n_iter_no_change` consecutive rounds.
/// The held-out galaxies never reach the weak learner.
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
/// let mut booster = HistGradientBoost::init(&sample)
///     .learning_rate(0.1)
///     .early_stopping(10, 1e-7)
///     .max_loop(200);
///
/// let weak_learner = RegressionTreeBuilder::new(&sample)
///     .max_depth(4)
///     .split_strategy(SplitStrategy::Hist(255))
///     .build();
///
/// let f = booster.run(&weak_learner);
/// ```
pub struct HistGradientBoost<'a, F> {
    // Training data
    sample: &'a Sample,

    // Shrinkage applied to every tree
    learning_rate: f64,

    // Maximal number of rounds
    max_iter: usize,

    // Early-stopping configuration; `None` disables it
    n_iter_no_change: Option<usize>,
    tolerance: f64,

    // Fraction of galaxies held out for early stopping
    validation_fraction: f64,

    // Seed for the holdout shuffle
    seed: u64,

    // Rows the weak learner trains on / is validated on
    train_rows: Vec<usize>,
    valid_rows: Vec<usize>,

    // Early-stopping state
    best_valid_loss: f64,
    rounds_without_improvement: usize,

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


impl<'a, F> HistGradientBoost<'a, F> {
    /// Construct a new instance of `HistGradientBoost`.
    pub fn init(sample: &'a Sample) -> Self {
        Self {
            sample,
            learning_rate: 0.1,
            max_iter: 100,
            n_iter_no_change: None,
            tolerance: 1e-7,
            validation_fraction: 0.1,
            seed: 1234,
            train_rows: Vec::new(),
            valid_rows: Vec::new(),
            best_valid_loss: f64::MAX,
            rounds_without_improvement: 0,
            terminated: usize::MAX,
            intercept: 0.0,
            predictions: Vec::new(),
            weights: Vec::new(),
            hypotheses: Vec::new(),
        }
    }


    /// Set the shrinkage. Default is `0.1`.
    pub fn learning_rate(mut self, learning_rate: f64) -> Self {
        assert!(learning_rate > 0.0);
        self.learning_rate = learning_rate;
        self
    }


    /// Set the maximal number of boosting rounds. Default is `100`.
    pub fn max_loop(mut self, max_iter: usize) -> Self {
        assert!(max_iter > 0);
        self.max_iter = max_iter;
        self
    }


    /// Enable early stopping:
    /// stop once the held-out squared loss has not improved by more
    /// than `tolerance` for `n_iter_no_change` consecutive rounds.
    pub fn early_stopping(
        mut self,
        n_iter_no_change: usize,
        tolerance: f64,
    ) -> Self
    {
        assert!(n_iter_no_change > 0);
        assert!(tolerance >= 0.0);
        self.n_iter_no_change = Some(n_iter_no_change);
        self.tolerance = tolerance;
        self
    }


    /// Set the fraction of galaxies held out for early stopping.
    /// Default is `0.1`. Ignored unless early stopping is enabled.
    pub fn validation_fraction(mut self, fraction: f64) -> Self {
        assert!(0.0 < fraction && fraction < 1.0);
        self.validation_fraction = fraction;
        self
    }


    /// Set the seed of the holdout shuffle.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }


    /// Returns the round at which the boosting stopped.
    pub fn terminated(&self) -> usize {
        self.terminated
    }


    fn valid_loss(&self) -> f64 {
        let total = self.valid_rows.iter()
            .map(|&i| {
                let y = self.sample.target()[i];
                (y - self.predictions[i]).powi(2)
            })
            .sum::<f64>();
        total / self.valid_rows.len() as f64
    }
}


impl<F> Booster<F> for HistGradientBoost<'_, F>
    where F: Regressor,
{
    type Output = WeightedSum<F>;


    fn name(&self) -> &str {
        "Histogram Gradient Boosting"
    }


    fn info(&self) -> Option<Vec<(&str, String)>> {
        let (n_sample, n_feature) = self.sample.shape();
        let early_stopping = match self.n_iter_no_change {
            Some(patience) => format!("after {patience} flat rounds"),
            None => "disabled".to_string(),
        };
        let info = Vec::from([
            ("# of examples", format!("{n_sample}")),
            ("# of features", format!("{n_feature}")),
            ("Learning rate", format!("{}", self.learning_rate)),
            ("Early stopping", early_stopping),
            ("Max iteration", format!("{}", self.max_iter)),
        ]);
        Some(info)
    }


    fn preprocess(&mut self) {
        self.sample.target_is_specified();
        let n_sample = self.sample.shape().0;
        assert!(n_sample > 0);

        let mut rows = (0..n_sample).collect::<Vec<_>>();
        if self.n_iter_no_change.is_some() {
            assert!(
                n_sample >= 2,
                "Early stopping needs at least two galaxies \
                 to hold one out",
            );
            let mut rng = StdRng::seed_from_u64(self.seed);
            rows.shuffle(&mut rng);

            let n_valid = ((self.validation_fraction * n_sample as f64)
                .round() as usize)
                .clamp(1, n_sample - 1);
            self.valid_rows = rows.split_off(n_sample - n_valid);
        } else {
            self.valid_rows = Vec::new();
        }
        self.train_rows = rows;

        let target = self.sample.target();
        self.intercept = self.train_rows.iter()
            .map(|&i| target[i])
            .sum::<f64>() / self.train_rows.len() as f64;
        self.predictions = vec![self.intercept; n_sample];

        self.best_valid_loss = f64::MAX;
        self.rounds_without_improvement = 0;
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


        // Second-order statistics of the squared loss,
        // restricted to the training rows.
        let target = self.sample.target();
        let mut gh = vec![GradientHessian::default(); target.len()];
        for &i in &self.train_rows {
            let grad = self.predictions[i] - target[i];
            gh[i] = GradientHessian::new(grad, 1.0);
        }

        let h = weak_learner.produce(self.sample, &gh);
        let tree_predictions = h.predict_all(self.sample);

        self.weights.push(self.learning_rate);
        self.hypotheses.push(h);

        let learning_rate = self.learning_rate;
        self.predictions.par_iter_mut()
            .zip(tree_predictions)
            .for_each(|(p, q)| { *p += learning_rate * q; });


        if let Some(patience) = self.n_iter_no_change {
            let loss = self.valid_loss();
            if loss < self.best_valid_loss - self.tolerance {
                self.best_valid_loss = loss;
                self.rounds_without_improvement = 0;
            } else {
                self.rounds_without_improvement += 1;
                if patience <= self.rounds_without_improvement {
                    self.terminated = iteration;
                    return ControlFlow::Break(iteration);
                }
            }
        }

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
