use crate::common::utils;

/// This trait defines the loss functions
/// a gradient-boosting stage can minimize.
pub trait LossFunction {
    /// The name of the loss function.
    fn name(&self) -> &str;


    /// Loss value for a single point.
    fn eval_at_point(&self, prediction: f64, true_value: f64) -> f64;


    /// Mean loss over the given slices.
    fn eval(&self, predictions: &[f64], target: &[f64]) -> f64 {
        let n_items = predictions.len();

        assert_eq!(n_items, target.len());


        predictions.iter()
            .zip(target)
            .map(|(&p, &y)| self.eval_at_point(p, y))
            .sum::<f64>()
            / n_items as f64
    }


    /// The constant prediction that minimizes the loss
    /// over the given target slice.
    fn minimizing_constant(&self, target: &[f64]) -> f64;


    /// The negative gradient (pseudo-residual) at the current predictions.
    fn pseudo_residuals(&self, predictions: &[f64], target: &[f64])
        -> Vec<f64>;


    /// Best step size for the newly-attained hypothesis:
    /// `argmin_c Σ loss(y_i, current_i + c · tree_i)`.
    fn best_step(
        &self,
        target: &[f64],
        current: &[f64],
        tree_predictions: &[f64],
    ) -> f64;
}


/// The stage-wise losses for gradient boosting.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum GBMLoss {
    /// `L1`-loss, also known as
    /// **Least Absolute Deviation (LAD)**.
    L1,

    /// `L2`-loss, also known as
    /// **Mean Squared Error (MSE)**.
    L2,

    /// Huber loss with parameter `delta`.
    /// Huber loss maps the residual `z` to
    /// `0.5 * z.powi(2)` if `z.abs() < delta`,
    /// `delta * (z.abs() - 0.5 * delta)`, otherwise.
    Huber(f64),
}


impl LossFunction for GBMLoss {
    fn name(&self) -> &str {
        match self {
            Self::L1 => "L1 loss",
            Self::L2 => "L2 loss",
            Self::Huber(_) => "Huber loss",
        }
    }


    fn eval_at_point(&self, prediction: f64, true_value: f64) -> f64 {
        let diff = prediction - true_value;
        match self {
            Self::L1 => diff.abs(),
            Self::L2 => diff.powi(2),
            Self::Huber(delta) => {
                if diff.abs() < *delta {
                    0.5 * diff.powi(2)
                } else {
                    delta * (diff.abs() - 0.5 * delta)
                }
            },
        }
    }


    fn minimizing_constant(&self, target: &[f64]) -> f64 {
        match self {
            Self::L1 | Self::Huber(_) => utils::median(target),
            Self::L2 => {
                target.iter().sum::<f64>() / target.len() as f64
            },
        }
    }


    fn pseudo_residuals(&self, predictions: &[f64], target: &[f64])
        -> Vec<f64>
    {
        assert_eq!(predictions.len(), target.len());

        match self {
            Self::L1 => {
                target.iter()
                    .zip(predictions)
                    .map(|(y, p)| (y - p).signum())
                    .collect()
            },
            Self::L2 => {
                target.iter()
                    .zip(predictions)
                    .map(|(y, p)| y - p)
                    .collect()
            },
            Self::Huber(delta) => {
                target.iter()
                    .zip(predictions)
                    .map(|(y, p)| {
                        let diff = y - p;
                        if diff.abs() < *delta {
                            diff
                        } else {
                            delta * diff.signum()
                        }
                    })
                    .collect()
            },
        }
    }


    fn best_step(
        &self,
        target: &[f64],
        current: &[f64],
        tree_predictions: &[f64],
    ) -> f64
    {
        match self {
            Self::L1 | Self::Huber(_) => {
                // The exact line search for the absolute loss is
                // the weighted median of `(y - F) / h` with weights `|h|`.
                // Huber reuses it; the step is clipped by the loss anyway.
                let mut items = target.iter()
                    .zip(current)
                    .zip(tree_predictions)
                    .filter_map(|((&y, &f), &h)| {
                        if h == 0.0 {
                            None
                        } else {
                            Some((h.abs(), (y - f) / h))
                        }
                    })
                    .collect::<Vec<_>>();

                if items.is_empty() {
                    return 0.0;
                }
                utils::weighted_median(&mut items[..])
            },
            Self::L2 => {
                let numer = target.iter()
                    .zip(current)
                    .zip(tree_predictions)
                    .map(|((&y, &f), &h)| (y - f) * h)
                    .sum::<f64>();
                let denom = tree_predictions.iter()
                    .map(|h| h.powi(2))
                    .sum::<f64>();

                if denom == 0.0 { 0.0 } else { numer / denom }
            },
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn l2_minimizing_constant_is_mean() {
        let y = [1.0, 2.0, 3.0, 6.0];
        assert!((GBMLoss::L2.minimizing_constant(&y) - 3.0).abs() < 1e-12);
    }


    #[test]
    fn l2_best_step_recovers_residual_scale() {
        // Tree predicts exactly half the residual;
        // the optimal step doubles it.
        let y = [2.0, 4.0, 6.0];
        let current = [0.0, 0.0, 0.0];
        let tree = [1.0, 2.0, 3.0];
        let step = GBMLoss::L2.best_step(&y, &current, &tree);
        assert!((step - 2.0).abs() < 1e-12);
    }


    #[test]
    fn huber_matches_l2_for_small_residuals() {
        let loss = GBMLoss::Huber(10.0);
        assert!((loss.eval_at_point(1.5, 1.0) - 0.125).abs() < 1e-12);
    }
}
