use serde::{Serialize, Deserialize};
use crate::{Regressor, Sample};
use crate::common::utils;


/// The weighted-median aggregate used by AdaBoost.R2:
/// the prediction is the smallest member prediction whose
/// cumulative weight reaches half of the total weight.
/// You can read/write this struct by `Serde` trait.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct WeightedMedian<H> {
    /// Weights on each hypothesis in `self.hypotheses`.
    pub weights: Vec<f64>,
    /// Set of hypotheses.
    pub hypotheses: Vec<H>,
}


impl<H> WeightedMedian<H> {
    /// Construct a new `WeightedMedian` from the given pairs.
    /// Hypotheses with non-positive weight are discarded.
    #[inline]
    pub fn from_slices(weights: &[f64], hypotheses: &[H]) -> Self
        where H: Clone,
    {
        let mut new_weights = Vec::with_capacity(weights.len());
        let mut new_hypotheses = Vec::with_capacity(hypotheses.len());

        weights.iter()
            .copied()
            .zip(hypotheses)
            .for_each(|(w, h)| {
                if w > 0.0 {
                    new_weights.push(w);
                    new_hypotheses.push(h.clone());
                }
            });

        Self { weights: new_weights, hypotheses: new_hypotheses, }
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


impl<H> Regressor for WeightedMedian<H>
    where H: Regressor,
{
    fn predict(&self, sample: &Sample, row: usize) -> f64 {
        let mut items = self.weights.iter()
            .zip(&self.hypotheses[..])
            .map(|(w, h)| (*w, h.predict(sample, row)))
            .collect::<Vec<_>>();

        utils::weighted_median(&mut items[..])
    }
}
