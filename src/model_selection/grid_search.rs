use rayon::prelude::*;
use colored::Colorize;

use crate::{metrics, Regressor, Sample};
use super::cross_validation::CrossValidation;
use super::param_grid::{ParamGrid, ParamSet};

use std::fmt;


/// What a hyperparameter search maximizes.
/// Every variant is a negated error, so that
/// **larger is always better** and the search can maximize uniformly.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Scoring {
    /// Negative mean squared error.
    #[default]
    NegMse,
    /// Negative normalized median absolute deviation.
    NegNmad,
    /// Negative fraction of catastrophic outliers.
    NegOutlierRate,
}


impl Scoring {
    /// Score the predictions. Larger is better.
    pub fn score(&self, predictions: &[f64], target: &[f64]) -> f64 {
        match self {
            Self::NegMse => {
                -metrics::rmse(predictions, target).powi(2)
            },
            Self::NegNmad => -metrics::nmad(predictions, target),
            Self::NegOutlierRate => {
                -metrics::outlier_rate(predictions, target)
            },
        }
    }
}


impl fmt::Display for Scoring {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::NegMse => "neg. MSE",
            Self::NegNmad => "neg. NMAD",
            Self::NegOutlierRate => "neg. outlier rate",
        };
        write!(f, "{name}")
    }
}


/// The cross-validated score of one candidate.
#[derive(Clone, Debug)]
pub struct CandidateScore {
    /// The hyperparameter assignment that was evaluated.
    pub params: ParamSet,
    /// Mean score over the folds. Larger is better.
    pub mean_score: f64,
    /// Standard deviation of the score over the folds.
    pub std_score: f64,
}


/// The outcome of a hyperparameter search:
/// every evaluated candidate with its cross-validated score,
/// and the index of the winner.
#[derive(Clone, Debug)]
pub struct SearchOutcome {
    candidates: Vec<CandidateScore>,
    best: usize,
}


impl SearchOutcome {
    fn from_candidates(candidates: Vec<CandidateScore>) -> Self {
        assert!(!candidates.is_empty(), "The search evaluated no candidate");

        // On a tied mean score the earlier candidate wins,
        // so the outcome does not depend on the parallel schedule.
        let best = candidates.iter()
            .enumerate()
            .max_by(|(i, a), (j, b)| {
                a.mean_score.partial_cmp(&b.mean_score)
                    .unwrap()
                    .then_with(|| j.cmp(i))
            })
            .map(|(i, _)| i)
            .unwrap();

        Self { candidates, best }
    }


    /// The winning candidate.
    pub fn best(&self) -> &CandidateScore {
        &self.candidates[self.best]
    }


    /// The winning hyperparameter assignment.
    pub fn best_params(&self) -> &ParamSet {
        &self.best().params
    }


    /// The mean cross-validated score of the winner.
    pub fn best_score(&self) -> f64 {
        self.best().mean_score
    }


    /// Every evaluated candidate, in evaluation order.
    pub fn candidates(&self) -> &[CandidateScore] {
        &self.candidates[..]
    }
}


/// Evaluate the candidates over a fixed set of folds.
/// The folds are generated once and shared,
/// so every candidate sees the same train/test splits.
pub(super) fn evaluate_candidates<R, F>(
    sample: &Sample,
    candidates: Vec<ParamSet>,
    n_folds: usize,
    seed: u64,
    scoring: Scoring,
    verbose: bool,
    fit: &F,
) -> SearchOutcome
    where R: Regressor,
          F: Fn(&Sample, &ParamSet) -> R + Sync,
{
    let folds = CrossValidation::new(sample)
        .n_folds(n_folds)
        .seed(seed)
        .shuffle()
        .collect::<Vec<_>>();

    let scored = candidates.into_par_iter()
        .map(|params| {
            let scores = folds.iter()
                .map(|(train, test)| {
                    let f = fit(train, &params);
                    let predictions = f.predict_all(test);
                    scoring.score(&predictions, test.target())
                })
                .collect::<Vec<_>>();

            let n_folds = scores.len() as f64;
            let mean_score = scores.iter().sum::<f64>() / n_folds;
            let std_score = (scores.iter()
                .map(|s| (s - mean_score).powi(2))
                .sum::<f64>() / n_folds)
                .sqrt();

            CandidateScore { params, mean_score, std_score }
        })
        .collect::<Vec<_>>();

    if verbose {
        for candidate in &scored {
            println!(
                "{}    {}",
                format!(
                    "  [{scoring} {: >12.6} (+/- {:.6})]",
                    candidate.mean_score,
                    candidate.std_score,
                ).bold().green(),
                format!("[{}]", candidate.params).yellow(),
            );
        }
    }

    SearchOutcome::from_candidates(scored)
}


/// Exhaustive hyperparameter search:
/// every candidate of a [`ParamGrid`] is scored by k-fold
/// cross validation and the best mean score wins.
/// Candidates are evaluated in parallel.
///
/// The search does not know what the hyperparameters mean;
/// the `fit` closure passed to [`GridSearch::run`] interprets
/// the [`ParamSet`] and returns a trained regressor.
///
/// # Example
/// ```no_run
/// use photoz_boost::prelude::*;
///
/// # let sample: Sample = unimplemented!();
/// let grid = ParamGrid::new()
///     .param("n_estimators", [100i64, 200])
///     .param("eta", [0.1, 0.3]);
///
/// let outcome = GridSearch::init(&sample, grid)
///     .n_folds(5)
///     .scoring(Scoring::NegNmad)
///     .run(|train, params| {
///         let mut booster = XgBoost::init(train)
///             .eta(params.get_float("eta", 0.3))
///             .max_loop(params.get_int("n_estimators", 100) as usize);
///         let tree = RegressionTreeBuilder::new(train)
///             .max_depth(3)
///             .build();
///         booster.run(&tree)
///     });
///
/// println!("best: {}", outcome.best_params());
/// ```
pub struct GridSearch<'a> {
    sample: &'a Sample,
    grid: ParamGrid,
    n_folds: usize,
    seed: u64,
    scoring: Scoring,
    verbose: bool,
}


impl<'a> GridSearch<'a> {
    /// Construct a new instance of `GridSearch`.
    pub fn init(sample: &'a Sample, grid: ParamGrid) -> Self {
        Self {
            sample,
            grid,
            n_folds: 5,
            seed: 1234,
            scoring: Scoring::default(),
            verbose: false,
        }
    }


    /// Set the number of folds. Default value is `5`.
    pub fn n_folds(mut self, n_folds: usize) -> Self {
        self.n_folds = n_folds;
        self
    }


    /// Set the seed of the fold shuffle. Default value is `1234`.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }


    /// Set what the search maximizes. Default is `Scoring::NegMse`.
    pub fn scoring(mut self, scoring: Scoring) -> Self {
        self.scoring = scoring;
        self
    }


    /// Print one line per evaluated candidate.
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }


    /// Run the search.
    pub fn run<R, F>(self, fit: F) -> SearchOutcome
        where R: Regressor,
              F: Fn(&Sample, &ParamSet) -> R + Sync,
    {
        let candidates = self.grid.iter().collect::<Vec<_>>();
        evaluate_candidates(
            self.sample,
            candidates,
            self.n_folds,
            self.seed,
            self.scoring,
            self.verbose,
            &fit,
        )
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::*;


    fn sample() -> Sample {
        let mag: Vec<f64> = (0..30).map(|i| i as f64).collect();
        let z: Vec<f64> = mag.iter().map(|m| 0.01 * m).collect();
        let df = df!("mag_r" => &mag).unwrap();
        let target = Series::new("z_spec", &z);
        Sample::from_dataframe(df, target).unwrap()
    }


    // A fake model family with one hyperparameter `shift`;
    // predicting `z + shift` is best at `shift = 0`.
    struct Shift(f64);
    impl Regressor for Shift {
        fn predict(&self, sample: &Sample, row: usize) -> f64 {
            sample["mag_r"][row] * 0.01 + self.0
        }
    }


    #[test]
    fn the_best_candidate_wins() {
        let sample = sample();
        let grid = ParamGrid::new()
            .param("shift", [0.5, 0.0, -0.3]);

        let outcome = GridSearch::init(&sample, grid)
            .n_folds(3)
            .run(|_train, params| {
                Shift(params.get_float("shift", 1.0))
            });

        assert_eq!(outcome.candidates().len(), 3);
        assert_eq!(outcome.best_params().get_float("shift", 1.0), 0.0);
        assert!((outcome.best_score() - 0.0).abs() < 1e-12);
    }


    #[test]
    fn scoring_variants_agree_on_a_perfect_model() {
        let sample = sample();
        for scoring in [
            Scoring::NegMse,
            Scoring::NegNmad,
            Scoring::NegOutlierRate,
        ] {
            let grid = ParamGrid::new().param("shift", [0.0]);
            let outcome = GridSearch::init(&sample, grid)
                .scoring(scoring)
                .run(|_train, params| {
                    Shift(params.get_float("shift", 1.0))
                });
            assert_eq!(outcome.best_score(), 0.0);
        }
    }


    #[test]
    fn fold_scores_have_zero_spread_for_constant_error() {
        let sample = sample();
        let grid = ParamGrid::new().param("shift", [0.2]);

        let outcome = GridSearch::init(&sample, grid)
            .n_folds(3)
            .run(|_train, params| {
                Shift(params.get_float("shift", 1.0))
            });

        // The squared error is 0.04 on every galaxy,
        // so the fold scores cannot vary.
        let best = outcome.best();
        assert!((best.mean_score + 0.04).abs() < 1e-12);
        assert!(best.std_score < 1e-12);
    }
}
