//! The histogram-based gradient-boosting machine.
mod hgb;

pub use hgb::HistGradientBoost;
