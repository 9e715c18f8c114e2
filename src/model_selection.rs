//! K-fold cross validation and hyperparameter search.
mod cross_validation;
mod param_grid;
mod grid_search;
mod random_search;

pub use cross_validation::{CrossValidation, cross_val_predict};
pub use param_grid::{ParamGrid, ParamSet, ParamValue};
pub use grid_search::{
    CandidateScore,
    GridSearch,
    Scoring,
    SearchOutcome,
};
pub use random_search::RandomSearch;
