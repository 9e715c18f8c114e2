use rayon::prelude::*;

use crate::Sample;
use crate::weak_learner::{
    WeakLearner,
    type_and_struct::*,
    split_rule::*,
};

use super::{
    bin::*,
    node::*,
    train_node::*,
    regression_tree_regressor::RegressionTreeRegressor,
};


use std::fmt;
use std::rc::Rc;
use std::cell::RefCell;
use std::collections::HashMap;


/// This struct produces a regression tree
/// for the given gradient/hessian statistics.
/// Use [`RegressionTreeBuilder`](super::RegressionTreeBuilder)
/// to construct an instance of this struct.
pub struct RegressionTree<'a> {
    bins: HashMap<&'a str, Bins>,

    // The maximal depth of the output trees
    max_depth: usize,

    // L2-regularization parameter for the leaf values
    lambda_l2: f64,

    // Minimum gain required to keep a split
    gamma: f64,

    // Minimum hessian mass required in each child
    min_child_weight: f64,
}


impl<'a> RegressionTree<'a> {
    #[inline]
    pub(super) fn from_components(
        bins: HashMap<&'a str, Bins>,
        max_depth: usize,
        lambda_l2: f64,
        gamma: f64,
        min_child_weight: f64,
    ) -> Self
    {
        Self { bins, max_depth, lambda_l2, gamma, min_child_weight, }
    }


    /// The optimal constant prediction for the rows in `indices`
    /// and the loss this node incurs as a leaf.
    fn prediction_and_loss(
        &self,
        indices: &[usize],
        gh: &[GradientHessian],
    ) -> (Prediction<f64>, LossValue)
    {
        let grad_sum = indices.iter()
            .map(|&i| gh[i].grad)
            .sum::<f64>();
        let hess_sum = indices.iter()
            .map(|&i| gh[i].hess)
            .sum::<f64>();

        let prediction = - grad_sum / (hess_sum + self.lambda_l2);
        let loss_value = -0.5 * grad_sum.powi(2) / (hess_sum + self.lambda_l2);

        (prediction.into(), loss_value.into())
    }


    /// Returns the best splitting rule over all features,
    /// or `None` if no split attains a gain larger than `gamma`.
    fn best_split(
        &self,
        sample: &'a Sample,
        gh: &[GradientHessian],
        indices: &[usize],
        loss_as_leaf: LossValue,
    ) -> Option<(&'a str, Threshold)>
    {
        let best = sample.features()
            .par_iter()
            .filter_map(|feature| {
                let name = feature.name();
                let bins = self.bins.get(name).unwrap();
                let packs = bins.pack(indices, feature, gh);
                self.best_split_at(&packs)
                    .map(|(score, threshold)| (score, name, threshold))
            })
            .max_by(|x, y| {
                // Break score ties by feature name so that the grown
                // tree does not depend on the parallel schedule.
                x.0.partial_cmp(&y.0)
                    .unwrap()
                    .then_with(|| y.1.cmp(x.1))
            })?;

        let (score, name, threshold) = best;

        // `loss_as_leaf` is the negative parent score halved,
        // so the gain of the split is `score / 2 + loss_as_leaf`.
        let gain = 0.5 * score.0 + loss_as_leaf.0;
        if gain <= self.gamma {
            return None;
        }

        Some((name, threshold))
    }


    /// Scan the occupied bins of one feature from left to right,
    /// keeping the threshold that maximizes the split score
    /// `G_L^2 / (H_L + lambda) + G_R^2 / (H_R + lambda)`.
    fn best_split_at(&self, packs: &[BinPack])
        -> Option<(LossValue, Threshold)>
    {
        let mut right_grad_sum = packs.iter()
            .map(|pack| pack.gh.grad)
            .sum::<f64>();
        let mut right_hess_sum = packs.iter()
            .map(|pack| pack.gh.hess)
            .sum::<f64>();
        let mut right_count = packs.iter()
            .map(|pack| pack.count)
            .sum::<usize>();


        let mut left_grad_sum = 0.0;
        let mut left_hess_sum = 0.0;


        let mut best: Option<(LossValue, Threshold)> = None;

        for pack in packs {
            left_grad_sum += pack.gh.grad;
            left_hess_sum += pack.gh.hess;
            right_grad_sum -= pack.gh.grad;
            right_hess_sum -= pack.gh.hess;
            right_count -= pack.count;

            if right_count == 0 {
                break;
            }
            if left_hess_sum < self.min_child_weight
                || right_hess_sum < self.min_child_weight
            {
                continue;
            }


            let score =
                left_grad_sum.powi(2) / (left_hess_sum + self.lambda_l2)
                + right_grad_sum.powi(2) / (right_hess_sum + self.lambda_l2);
            if best.map_or(true, |(s, _)| s.0 < score) {
                best = Some((score.into(), pack.threshold.into()));
            }
        }

        best
    }


    fn full_tree(
        &self,
        sample: &Sample,
        gh: &[GradientHessian],
        indices: Vec<usize>,
        max_depth: usize,
    ) -> Rc<RefCell<TrainNode>>
    {
        // Compute the best constant prediction on this node.
        let (pred, loss) = self.prediction_and_loss(&indices, gh);


        if loss == 0.0 || max_depth <= 1 {
            return TrainNode::leaf(pred, loss);
        }


        // Find the best splitting rule.
        let Some((feature, threshold)) = self.best_split(
            sample, gh, &indices[..], loss,
        ) else {
            return TrainNode::leaf(pred, loss);
        };

        let rule = Splitter::new(feature, threshold);


        // Split the rows for the left/right children.
        let mut lindices = Vec::new();
        let mut rindices = Vec::new();
        for i in indices.into_iter() {
            match rule.split(sample, i) {
                LR::Left  => { lindices.push(i); },
                LR::Right => { rindices.push(i); },
            }
        }


        // If the split has no meaning, construct a leaf node.
        if lindices.is_empty() || rindices.is_empty() {
            return TrainNode::leaf(pred, loss);
        }


        let ltree = self.full_tree(sample, gh, lindices, max_depth - 1);
        let rtree = self.full_tree(sample, gh, rindices, max_depth - 1);


        TrainNode::branch(rule, ltree, rtree)
    }
}


impl<'a> WeakLearner for RegressionTree<'a> {
    type Hypothesis = RegressionTreeRegressor;


    fn name(&self) -> &str {
        "Regression Tree"
    }


    /// Produce a regression tree fitted to the given
    /// gradient/hessian statistics.
    /// Rows with zero gradient and zero hessian do not take part
    /// in the tree growth;
    /// boosters use this to express sample weights,
    /// subsampling, and validation holdouts.
    fn produce(&self, sample: &Sample, gh: &[GradientHessian])
        -> Self::Hypothesis
    {
        let (n_sample, _) = sample.shape();
        assert_eq!(n_sample, gh.len());

        let indices = (0..n_sample).filter(|&i| !gh[i].is_zero())
            .collect::<Vec<usize>>();
        assert!(!indices.is_empty());


        let tree = self.full_tree(sample, gh, indices, self.max_depth);


        let root = Node::from(
            Rc::try_unwrap(tree)
                .expect("Root node has reference counter >= 1")
                .into_inner()
        );

        RegressionTreeRegressor::from(root)
    }
}


impl fmt::Display for RegressionTree<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "\
            ----------\n\
            # Regression Tree Weak Learner\n\n\
            - Max depth: {}\n\
            - L2 regularization: {}\n\
            - Min. split gain: {}\n\
            - Min. child weight: {}\n\
            - Bins:\
            ",
            self.max_depth,
            self.lambda_l2,
            self.gamma,
            self.min_child_weight,
        )?;


        let width = self.bins.keys()
            .map(|key| key.len())
            .max()
            .expect("Tried to print bins, but no features are found");
        for (feat_name, feat_bins) in self.bins.iter() {
            writeln!(f, "\t* [{feat_name: <width$}]  {feat_bins}")?;
        }

        write!(f, "----------")
    }
}


#[cfg(test)]
mod tests {
    use super::super::builder::{RegressionTreeBuilder, SplitStrategy};
    use crate::{Sample, Regressor, WeakLearner, GradientHessian};

    use polars::prelude::*;


    fn toy_sample() -> Sample {
        let df = df!(
            "mag_r" => &[0.0, 1.0, 2.0, 3.0],
            "mag_i" => &[5.0, 5.0, 5.0, 5.0],
        ).unwrap();
        let target = Series::new("z_spec", &[0.1, 0.1, 0.9, 0.9]);
        Sample::from_dataframe(df, target).unwrap()
    }


    fn l2_gh(sample: &Sample) -> Vec<GradientHessian> {
        sample.target()
            .iter()
            .map(|y| GradientHessian::new(-y, 1.0))
            .collect()
    }


    #[test]
    fn tree_splits_on_the_informative_feature() {
        let sample = toy_sample();
        let gh = l2_gh(&sample);

        let tree = RegressionTreeBuilder::new(&sample)
            .max_depth(2)
            .split_strategy(SplitStrategy::Exact)
            .lambda_l2(0.0)
            .build();
        let hypothesis = tree.produce(&sample, &gh);

        let predictions = hypothesis.predict_all(&sample);
        assert!((predictions[0] - 0.1).abs() < 1e-9);
        assert!((predictions[1] - 0.1).abs() < 1e-9);
        assert!((predictions[2] - 0.9).abs() < 1e-9);
        assert!((predictions[3] - 0.9).abs() < 1e-9);
    }


    #[test]
    fn depth_one_tree_predicts_the_mean() {
        let sample = toy_sample();
        let gh = l2_gh(&sample);

        let tree = RegressionTreeBuilder::new(&sample)
            .max_depth(1)
            .lambda_l2(0.0)
            .build();
        let hypothesis = tree.produce(&sample, &gh);

        let predictions = hypothesis.predict_all(&sample);
        for p in predictions {
            assert!((p - 0.5).abs() < 1e-9);
        }
    }


    #[test]
    fn zero_weight_rows_do_not_shape_the_tree() {
        let sample = toy_sample();
        let mut gh = l2_gh(&sample);
        // Silence the two high-redshift rows.
        gh[2] = GradientHessian::new(0.0, 0.0);
        gh[3] = GradientHessian::new(0.0, 0.0);

        let tree = RegressionTreeBuilder::new(&sample)
            .max_depth(3)
            .lambda_l2(0.0)
            .build();
        let hypothesis = tree.produce(&sample, &gh);

        // Every leaf was fit on low-redshift rows only.
        let predictions = hypothesis.predict_all(&sample);
        for p in predictions {
            assert!((p - 0.1).abs() < 1e-9);
        }
    }


    #[test]
    fn large_gamma_prevents_any_split() {
        let sample = toy_sample();
        let gh = l2_gh(&sample);

        let tree = RegressionTreeBuilder::new(&sample)
            .max_depth(4)
            .lambda_l2(0.0)
            .gamma(1e9)
            .build();
        let hypothesis = tree.produce(&sample, &gh);

        let predictions = hypothesis.predict_all(&sample);
        assert!(predictions.windows(2).all(|w| w[0] == w[1]));
    }
}
