use colored::Colorize;

use crate::{
    metrics,
    model::ModelKind,
    model_selection::{
        cross_val_predict,
        GridSearch,
        ParamSet,
        RandomSearch,
        Scoring,
        SearchOutcome,
    },
    Sample,
};

use std::fmt;
use std::time::Instant;


/// How each family searches its hyperparameter grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SearchStrategy {
    /// Score every candidate of the grid.
    Grid,
    /// Score `n_iter` candidates drawn uniformly from the grid.
    Random {
        /// The number of candidates to draw.
        n_iter: usize,
    },
}


/// One line of the comparison:
/// a family, its winning hyperparameters,
/// and its out-of-fold quality measures
/// averaged over the repetition seeds.
#[derive(Clone, Debug)]
pub struct ComparisonRow {
    /// The boosting family.
    pub kind: ModelKind,
    /// The hyperparameters the search settled on.
    pub best_params: ParamSet,
    /// The mean cross-validated search score of the winner.
    pub search_score: f64,
    /// Mean and spread of the catastrophic-outlier fraction.
    pub outlier_rate: (f64, f64),
    /// Mean and spread of the normalized median absolute deviation.
    pub nmad: (f64, f64),
    /// Mean and spread of the root mean squared error.
    pub rmse: (f64, f64),
    /// Wall-clock seconds spent on this family,
    /// search and repeated evaluations together.
    pub seconds: f64,
}


/// The comparison of all families on one catalog.
#[derive(Clone, Debug)]
pub struct ComparisonTable {
    rows: Vec<ComparisonRow>,
}


impl ComparisonTable {
    /// The rows, one per compared family.
    pub fn rows(&self) -> &[ComparisonRow] {
        &self.rows[..]
    }


    /// The family with the smallest mean NMAD.
    pub fn best_by_nmad(&self) -> &ComparisonRow {
        self.rows.iter()
            .min_by(|a, b| a.nmad.0.partial_cmp(&b.nmad.0).unwrap())
            .expect("The comparison holds no row")
    }
}


impl fmt::Display for ComparisonTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{}",
            format!(
                "  {: <24}  {: >18}  {: >18}  {: >18}  {: >10}",
                "Family", "Outlier rate", "NMAD", "RMSE", "Time",
            ).bold(),
        )?;

        for row in &self.rows {
            writeln!(
                f,
                "  {: <24}  {: >18}  {: >18}  {: >18}  {: >10}",
                row.kind.name().green(),
                format!("{:.4} ± {:.4}", row.outlier_rate.0, row.outlier_rate.1),
                format!("{:.4} ± {:.4}", row.nmad.0, row.nmad.1),
                format!("{:.4} ± {:.4}", row.rmse.0, row.rmse.1),
                format!("{:.2}s", row.seconds),
            )?;
            writeln!(
                f,
                "  {: <24}  [{}]",
                "",
                format!("{}", row.best_params).yellow(),
            )?;
        }
        Ok(())
    }
}


/// Compare the boosting families on one catalog:
/// search each family's hyperparameter grid,
/// then re-fit the winner under several seeds and report
/// the spread of its out-of-fold quality measures.
///
/// The search and the final evaluation use the same number of
/// folds, but the evaluation reshuffles per seed,
/// so a family cannot win by overfitting one particular split.
///
/// # Example
/// ```no_run
/// use photoz_boost::prelude::*;
/// use photoz_boost::research::{ModelComparison, SearchStrategy};
///
/// # let sample: Sample = unimplemented!();
/// let table = ModelComparison::new(&sample)
///     .strategy(SearchStrategy::Random { n_iter: 20 })
///     .scoring(Scoring::NegNmad)
///     .seeds(vec![1, 2, 3])
///     .run();
/// println!("{table}");
/// println!("winner: {}", table.best_by_nmad().kind);
/// ```
pub struct ModelComparison<'a> {
    sample: &'a Sample,
    kinds: Vec<ModelKind>,
    strategy: SearchStrategy,
    scoring: Scoring,
    n_folds: usize,
    seeds: Vec<u64>,
    verbose: bool,
}


impl<'a> ModelComparison<'a> {
    /// Construct a comparison of every family with default grids.
    pub fn new(sample: &'a Sample) -> Self {
        Self {
            sample,
            kinds: ModelKind::all().to_vec(),
            strategy: SearchStrategy::Grid,
            scoring: Scoring::default(),
            n_folds: 5,
            seeds: vec![1234],
            verbose: false,
        }
    }


    /// Compare only the given families.
    pub fn kinds(mut self, kinds: Vec<ModelKind>) -> Self {
        assert!(!kinds.is_empty());
        self.kinds = kinds;
        self
    }


    /// Set the search strategy. Default is `SearchStrategy::Grid`.
    pub fn strategy(mut self, strategy: SearchStrategy) -> Self {
        self.strategy = strategy;
        self
    }


    /// Set what the searches maximize. Default is `Scoring::NegMse`.
    pub fn scoring(mut self, scoring: Scoring) -> Self {
        self.scoring = scoring;
        self
    }


    /// Set the number of folds. Default value is `5`.
    pub fn n_folds(mut self, n_folds: usize) -> Self {
        self.n_folds = n_folds;
        self
    }


    /// Set the seeds of the repeated final evaluations.
    /// One row statistic is computed per seed.
    pub fn seeds(mut self, seeds: Vec<u64>) -> Self {
        assert!(!seeds.is_empty());
        self.seeds = seeds;
        self
    }


    /// Print progress while comparing.
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }


    fn search(&self, kind: ModelKind) -> SearchOutcome {
        let grid = kind.default_grid();
        match self.strategy {
            SearchStrategy::Grid => {
                GridSearch::init(self.sample, grid)
                    .n_folds(self.n_folds)
                    .scoring(self.scoring)
                    .verbose(self.verbose)
                    .run(|train, params| kind.fit(train, params))
            },
            SearchStrategy::Random { n_iter } => {
                RandomSearch::init(self.sample, grid)
                    .n_iter(n_iter)
                    .n_folds(self.n_folds)
                    .scoring(self.scoring)
                    .verbose(self.verbose)
                    .run(|train, params| kind.fit(train, params))
            },
        }
    }


    /// Run the comparison.
    pub fn run(&self) -> ComparisonTable {
        let rows = self.kinds.iter()
            .map(|&kind| {
                if self.verbose {
                    println!("{}", format!("# {}", kind.name()).bold());
                }

                let clock = Instant::now();
                let outcome = self.search(kind);
                let best_params = outcome.best_params().clone();

                let mut outlier_rates = Vec::with_capacity(self.seeds.len());
                let mut nmads = Vec::with_capacity(self.seeds.len());
                let mut rmses = Vec::with_capacity(self.seeds.len());
                for &seed in &self.seeds {
                    let predictions = cross_val_predict(
                        self.sample,
                        self.n_folds,
                        seed,
                        |train| kind.fit(train, &best_params),
                    );
                    let target = self.sample.target();
                    outlier_rates.push(
                        metrics::outlier_rate(&predictions, target)
                    );
                    nmads.push(metrics::nmad(&predictions, target));
                    rmses.push(metrics::rmse(&predictions, target));
                }

                ComparisonRow {
                    kind,
                    best_params,
                    search_score: outcome.best_score(),
                    outlier_rate: mean_and_std(&outlier_rates),
                    nmad: mean_and_std(&nmads),
                    rmse: mean_and_std(&rmses),
                    seconds: clock.elapsed().as_secs_f64(),
                }
            })
            .collect();

        ComparisonTable { rows }
    }
}


fn mean_and_std(values: &[f64]) -> (f64, f64) {
    let n_values = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n_values;
    let std = (values.iter()
        .map(|v| (v - mean).powi(2))
        .sum::<f64>() / n_values)
        .sqrt();
    (mean, std)
}
