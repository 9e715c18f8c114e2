//! Common helper functions and loss definitions
//! shared by the boosting algorithms.
pub(crate) mod utils;
mod loss_functions;

pub use loss_functions::{GBMLoss, LossFunction};
