use serde::{Serialize, Deserialize};
use crate::{Regressor, Sample};


/// An additive ensemble `intercept + Σ wᵢ hᵢ(x)`,
/// the output type of the gradient-boosting style algorithms.
/// You can read/write this struct by `Serde` trait.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct WeightedSum<H> {
    /// The constant baseline prediction.
    pub intercept: f64,
    /// Weights on each hypothesis in `self.hypotheses`.
    pub weights: Vec<f64>,
    /// Set of hypotheses.
    pub hypotheses: Vec<H>,
}


impl<H> WeightedSum<H> {
    /// Construct a new `WeightedSum` from its components.
    #[inline]
    pub fn from_components(
        intercept: f64,
        weights: Vec<f64>,
        hypotheses: Vec<H>,
    ) -> Self
    {
        assert_eq!(weights.len(), hypotheses.len());
        Self { intercept, weights, hypotheses, }
    }


    /// Returns the number of member hypotheses.
    pub fn len(&self) -> usize {
        self.hypotheses.len()
    }


    /// Returns `true` if the ensemble holds no hypothesis.
    pub fn is_empty(&self) -> bool {
        self.hypotheses.is_empty()
    }
}


impl<H> Regressor for WeightedSum<H>
    where H: Regressor,
{
    fn predict(&self, sample: &Sample, row: usize) -> f64 {
        self.intercept + self.weights.iter()
            .zip(&self.hypotheses[..])
            .map(|(w, h)| *w * h.predict(sample, row))
            .sum::<f64>()
    }
}
