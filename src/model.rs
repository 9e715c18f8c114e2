//! The four boosting families behind one fitting surface,
//! so that hyperparameter search and model comparison can treat
//! them uniformly.
use serde::{Serialize, Deserialize};

use crate::{
    booster::*,
    common::GBMLoss,
    model_selection::{ParamGrid, ParamSet},
    weak_learner::{
        RegressionTreeBuilder,
        RegressionTreeRegressor,
        SplitStrategy,
    },
    Regressor,
    Sample,
    WeightedMedian,
    WeightedSum,
};

use std::fmt;


/// A trained photometric-redshift ensemble.
/// AdaBoost.R2 aggregates by weighted median,
/// the gradient-boosting family by weighted sum;
/// this enum lets callers hold either without caring which.
/// You can read/write this struct by `Serde` trait.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum PhotozEnsemble {
    /// The weighted-median aggregate of AdaBoost.R2.
    Median(WeightedMedian<RegressionTreeRegressor>),
    /// The additive aggregate of the gradient-boosting family.
    Sum(WeightedSum<RegressionTreeRegressor>),
}


impl PhotozEnsemble {
    /// Returns the number of member trees.
    pub fn len(&self) -> usize {
        match self {
            Self::Median(f) => f.len(),
            Self::Sum(f) => f.len(),
        }
    }


    /// Returns `true` if the ensemble holds no tree.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}


impl Regressor for PhotozEnsemble {
    fn predict(&self, sample: &Sample, row: usize) -> f64 {
        match self {
            Self::Median(f) => f.predict(sample, row),
            Self::Sum(f) => f.predict(sample, row),
        }
    }
}


/// The boosting families this crate compares.
/// Each kind knows how to interpret a [`ParamSet`] and
/// fit itself, and carries a default hyperparameter grid
/// for the searches.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ModelKind {
    /// AdaBoost.R2 over exact-split regression trees.
    AdaBoostR2,
    /// Friedman's gradient boosting over exact-split trees.
    GradientBoost,
    /// Second-order gradient boosting over histogram-binned trees.
    HistGradientBoost,
    /// Extreme gradient boosting with the full regularization surface.
    XgBoost,
}


impl ModelKind {
    /// Every kind, in comparison order.
    pub fn all() -> [Self; 4] {
        [
            Self::AdaBoostR2,
            Self::GradientBoost,
            Self::HistGradientBoost,
            Self::XgBoost,
        ]
    }


    /// A human-readable name.
    pub fn name(&self) -> &str {
        match self {
            Self::AdaBoostR2 => "AdaBoost.R2",
            Self::GradientBoost => "Gradient Boosting",
            Self::HistGradientBoost => "Hist. Gradient Boosting",
            Self::XgBoost => "XGBoost",
        }
    }


    /// The default hyperparameter grid of this kind.
    /// Small enough for an exhaustive search on a laptop,
    /// wide enough to separate the families on real catalogs.
    pub fn default_grid(&self) -> ParamGrid {
        match self {
            Self::AdaBoostR2 => {
                ParamGrid::new()
                    .param("n_estimators", [50i64, 100, 200])
                    .param("max_depth", [2i64, 3, 4])
            },
            Self::GradientBoost => {
                ParamGrid::new()
                    .param("n_estimators", [100i64, 200])
                    .param("learning_rate", [0.05, 0.1])
                    .param("max_depth", [2i64, 3])
                    .param("subsample", [0.8, 1.0])
            },
            Self::HistGradientBoost => {
                ParamGrid::new()
                    .param("n_estimators", [100i64, 200])
                    .param("learning_rate", [0.05, 0.1])
                    .param("max_depth", [3i64, 4, 6])
            },
            Self::XgBoost => {
                ParamGrid::new()
                    .param("n_estimators", [100i64, 200])
                    .param("eta", [0.1, 0.3])
                    .param("max_depth", [3i64, 6])
                    .param("lambda", [1.0, 10.0])
            },
        }
    }


    /// Fit this kind on `sample` under the given hyperparameters.
    /// Unset hyperparameters fall back to the library defaults,
    /// so an empty [`ParamSet`] is always valid.
    pub fn fit(&self, sample: &Sample, params: &ParamSet) -> PhotozEnsemble {
        let seed = params.get_int("seed", 1234) as u64;
        let max_depth = params.get_int("max_depth", 3) as usize;

        match self {
            Self::AdaBoostR2 => {
                let n_estimators =
                    params.get_int("n_estimators", 50) as usize;
                let learning_rate =
                    params.get_float("learning_rate", 1.0);

                let tree = RegressionTreeBuilder::new(sample)
                    .max_depth(max_depth)
                    .split_strategy(SplitStrategy::Exact)
                    .lambda_l2(0.0)
                    .build();
                let mut booster = AdaBoostR2::init(sample)
                    .learning_rate(learning_rate)
                    .max_loop(n_estimators);
                PhotozEnsemble::Median(booster.run(&tree))
            },
            Self::GradientBoost => {
                let n_estimators =
                    params.get_int("n_estimators", 100) as usize;
                let learning_rate =
                    params.get_float("learning_rate", 0.1);
                let subsample = params.get_float("subsample", 1.0);

                let tree = RegressionTreeBuilder::new(sample)
                    .max_depth(max_depth)
                    .split_strategy(SplitStrategy::Exact)
                    .build();
                let mut booster =
                    GradientBoost::init_with_loss(sample, GBMLoss::L2)
                        .learning_rate(learning_rate)
                        .subsample(subsample)
                        .seed(seed)
                        .max_loop(n_estimators);
                PhotozEnsemble::Sum(booster.run(&tree))
            },
            Self::HistGradientBoost => {
                let n_estimators =
                    params.get_int("n_estimators", 100) as usize;
                let learning_rate =
                    params.get_float("learning_rate", 0.1);
                let max_bins = params.get_int("max_bins", 255) as usize;
                let patience =
                    params.get_int("n_iter_no_change", 0) as usize;

                let tree = RegressionTreeBuilder::new(sample)
                    .max_depth(max_depth)
                    .split_strategy(SplitStrategy::Hist(max_bins))
                    .build();
                let mut booster = HistGradientBoost::init(sample)
                    .learning_rate(learning_rate)
                    .seed(seed)
                    .max_loop(n_estimators);
                if patience > 0 {
                    booster = booster.early_stopping(patience, 1e-7);
                }
                PhotozEnsemble::Sum(booster.run(&tree))
            },
            Self::XgBoost => {
                let n_estimators =
                    params.get_int("n_estimators", 100) as usize;
                let eta = params.get_float("eta", 0.3);
                let lambda = params.get_float("lambda", 1.0);
                let gamma = params.get_float("gamma", 0.0);
                let min_child_weight =
                    params.get_float("min_child_weight", 1.0);
                let max_bins = params.get_int("max_bins", 255) as usize;

                let tree = RegressionTreeBuilder::new(sample)
                    .max_depth(max_depth)
                    .split_strategy(SplitStrategy::Hist(max_bins))
                    .lambda_l2(lambda)
                    .gamma(gamma)
                    .min_child_weight(min_child_weight)
                    .build();
                let mut booster = XgBoost::init(sample)
                    .eta(eta)
                    .max_loop(n_estimators);
                PhotozEnsemble::Sum(booster.run(&tree))
            },
        }
    }
}


impl fmt::Display for ModelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::*;


    fn sample() -> Sample {
        let mag: Vec<f64> = (0..40).map(|i| 18.0 + 0.1 * i as f64)
            .collect();
        let z: Vec<f64> = mag.iter().map(|m| 0.05 * (m - 18.0)).collect();
        let df = df!("mag_r" => &mag).unwrap();
        let target = Series::new("z_spec", &z);
        Sample::from_dataframe(df, target).unwrap()
    }


    #[test]
    fn every_kind_fits_with_defaults() {
        let sample = sample();
        let params = ParamSet::new();

        for kind in ModelKind::all() {
            let f = kind.fit(&sample, &params);
            assert!(!f.is_empty(), "{} fit nothing", kind.name());

            let predictions = f.predict_all(&sample);
            let mse = sample.target()
                .iter()
                .zip(&predictions[..])
                .map(|(y, p)| (y - p).powi(2))
                .sum::<f64>() / 40.0;
            // Variance of the target is about 0.037;
            // any working fit beats it by a wide margin.
            assert!(mse < 0.01, "{} fit poorly: {mse}", kind.name());
        }
    }


    #[test]
    fn grids_only_name_hyperparameters_fit_understands() {
        let sample = sample();
        for kind in ModelKind::all() {
            let params = kind.default_grid().at(0);
            let f = kind.fit(&sample, &params);
            assert!(!f.is_empty());
        }
    }


    #[test]
    fn ensembles_round_trip_through_serde() {
        let sample = sample();
        let f = ModelKind::XgBoost.fit(
            &sample,
            &ParamSet::new(),
        );

        let json = serde_json::to_string(&f).unwrap();
        let g: PhotozEnsemble = serde_json::from_str(&json).unwrap();

        let before = f.predict_all(&sample);
        let after = g.predict_all(&sample);
        assert_eq!(before, after);
    }
}
