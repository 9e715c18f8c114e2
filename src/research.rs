//! This directory provides some features for research:
//! compare the boosting families on one catalog and
//! log hyperparameter searches for later inspection.

mod comparison;
mod search_logger;

pub use comparison::{
    ComparisonRow,
    ComparisonTable,
    ModelComparison,
    SearchStrategy,
};
pub use search_logger::SearchLogger;
