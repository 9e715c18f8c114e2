#![warn(missing_docs)]

//! A crate for photometric-redshift estimation with boosting.
//!
//! Spectroscopic redshifts are expensive;
//! broad-band magnitudes are cheap.
//! This crate estimates the former from the latter by regression
//! boosting, and compares the four classical families on the task:
//!
//! - [`AdaBoostR2`], the reweighting scheme of Drucker, 1997,
//!   aggregated by weighted median,
//! - [`GradientBoost`], Friedman's gradient boosting machine
//!   with exact line search and optional stochastic subsampling,
//! - [`HistGradientBoost`], second-order boosting over
//!   histogram-binned trees with early stopping,
//! - [`XgBoost`], Newton boosting with the full
//!   regularization surface.
//!
//! All four drive the same regression-tree weak learner
//! through the [`WeakLearner`] trait;
//! the families differ only in the per-galaxy statistics they hand
//! to the tree and in how they aggregate the grown trees.
//!
//! Model selection is provided by [`GridSearch`] and
//! [`RandomSearch`] over a [`ParamGrid`],
//! scored by k-fold [`CrossValidation`] with the quality measures
//! of the photo-z literature
//! ([`metrics::outlier_rate`] and [`metrics::nmad`]).
//!
//! ```no_run
//! use photoz_boost::prelude::*;
//!
//! let sample = SampleReader::new()
//!     .file("galaxies.csv")
//!     .has_header(true)
//!     .target_feature("z_spec")
//!     .read()
//!     .unwrap();
//!
//! let grid = ModelKind::XgBoost.default_grid();
//! let outcome = GridSearch::init(&sample, grid)
//!     .scoring(Scoring::NegNmad)
//!     .run(|train, params| ModelKind::XgBoost.fit(train, params));
//!
//! let f = ModelKind::XgBoost.fit(&sample, outcome.best_params());
//! let predictions = f.predict_all(&sample);
//! ```

mod sample;
mod common;
mod hypothesis;

pub mod booster;
pub mod weak_learner;
pub mod metrics;
pub mod model;
pub mod model_selection;
pub mod plot;
pub mod prelude;
pub mod research;

pub use sample::{Feature, Sample, SampleReader};
pub use common::{GBMLoss, LossFunction};
pub use hypothesis::{Regressor, WeightedMedian, WeightedSum};

pub use booster::{
    AdaBoostR2,
    Booster,
    GradientBoost,
    HistGradientBoost,
    R2Loss,
    XgBoost,
};

pub use weak_learner::{
    GradientHessian,
    RegressionTree,
    RegressionTreeBuilder,
    RegressionTreeRegressor,
    SplitStrategy,
    WeakLearner,
};

pub use model::{ModelKind, PhotozEnsemble};

pub use model_selection::{
    cross_val_predict,
    CandidateScore,
    CrossValidation,
    GridSearch,
    ParamGrid,
    ParamSet,
    ParamValue,
    RandomSearch,
    Scoring,
    SearchOutcome,
};
