use crate::{Regressor, Sample};
use super::grid_search::{evaluate_candidates, Scoring, SearchOutcome};
use super::param_grid::{ParamGrid, ParamSet};


/// Randomized hyperparameter search:
/// `n_iter` distinct candidates are drawn uniformly from a
/// [`ParamGrid`] and scored by k-fold cross validation,
/// exactly as [`GridSearch`](super::GridSearch) would score them.
/// Use it when the full grid is too large to enumerate;
/// drawing at least `cardinality()` candidates degenerates to
/// the exhaustive search.
///
/// # Example
/// ```no_run
/// use photoz_boost::prelude::*;
///
/// # let sample: Sample = unimplemented!();
/// let grid = ParamGrid::new()
///     .param("n_estimators", [50i64, 100, 200, 500])
///     .param("learning_rate", [0.01, 0.05, 0.1, 0.3])
///     .param("max_depth", [2i64, 3, 4, 6, 8]);
///
/// let outcome = RandomSearch::init(&sample, grid)
///     .n_iter(20)
///     .scoring(Scoring::NegOutlierRate)
///     .run(|train, params| {
///         let mut booster = GradientBoost::init_with_loss(
///             train, GBMLoss::L2,
///         )
///         .learning_rate(params.get_float("learning_rate", 0.1))
///         .max_loop(params.get_int("n_estimators", 100) as usize);
///         let tree = RegressionTreeBuilder::new(train)
///             .max_depth(params.get_int("max_depth", 3) as usize)
///             .build();
///         booster.run(&tree)
///     });
/// ```
pub struct RandomSearch<'a> {
    sample: &'a Sample,
    grid: ParamGrid,
    n_iter: usize,
    n_folds: usize,
    seed: u64,
    scoring: Scoring,
    verbose: bool,
}


impl<'a> RandomSearch<'a> {
    /// Construct a new instance of `RandomSearch`.
    pub fn init(sample: &'a Sample, grid: ParamGrid) -> Self {
        Self {
            sample,
            grid,
            n_iter: 10,
            n_folds: 5,
            seed: 1234,
            scoring: Scoring::default(),
            verbose: false,
        }
    }


    /// Set the number of candidates to draw. Default value is `10`.
    pub fn n_iter(mut self, n_iter: usize) -> Self {
        assert!(n_iter > 0);
        self.n_iter = n_iter;
        self
    }


    /// Set the number of folds. Default value is `5`.
    pub fn n_folds(mut self, n_folds: usize) -> Self {
        self.n_folds = n_folds;
        self
    }


    /// Set the seed of the candidate draw and the fold shuffle.
    /// Default value is `1234`.
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
        let candidates = self.grid.sample(self.n_iter, self.seed);
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


    struct Shift(f64);
    impl Regressor for Shift {
        fn predict(&self, sample: &Sample, row: usize) -> f64 {
            sample["mag_r"][row] * 0.01 + self.0
        }
    }


    #[test]
    fn draws_the_requested_number_of_candidates() {
        let sample = sample();
        let grid = ParamGrid::new()
            .param("shift", [0.4, 0.3, 0.2, 0.1, 0.0])
            .param("unused", [1i64, 2, 3, 4]);

        let outcome = RandomSearch::init(&sample, grid)
            .n_iter(7)
            .n_folds(3)
            .run(|_train, params| {
                Shift(params.get_float("shift", 1.0))
            });

        assert_eq!(outcome.candidates().len(), 7);
    }


    #[test]
    fn oversampling_degenerates_to_grid_search() {
        let sample = sample();
        let grid = ParamGrid::new().param("shift", [0.3, 0.0]);

        let outcome = RandomSearch::init(&sample, grid)
            .n_iter(50)
            .n_folds(3)
            .run(|_train, params| {
                Shift(params.get_float("shift", 1.0))
            });

        assert_eq!(outcome.candidates().len(), 2);
        assert_eq!(outcome.best_params().get_float("shift", 1.0), 0.0);
    }


    #[test]
    fn the_same_seed_reproduces_the_search() {
        let sample = sample();
        let grid = ParamGrid::new()
            .param("shift", [0.4, 0.3, 0.2, 0.1, 0.0])
            .param("unused", [1i64, 2, 3, 4]);

        let run = |seed| {
            RandomSearch::init(&sample, grid.clone())
                .n_iter(5)
                .n_folds(3)
                .seed(seed)
                .run(|_train, params| {
                    Shift(params.get_float("shift", 1.0))
                })
                .best()
                .params
                .clone()
        };

        assert_eq!(run(3), run(3));
    }
}
