use rand::prelude::*;
use rand::rngs::StdRng;
use colored::Colorize;

use crate::{Regressor, Sample};

use std::iter::Iterator;

const WIDTH: usize = 9;

/// A struct that generates
/// pairs of training/test sample for k-fold cross validation.
/// Every galaxy appears in the test part of exactly one fold.
///
/// # Example
/// ```no_run
/// use photoz_boost::prelude::*;
/// use photoz_boost::CrossValidation;
/// use photoz_boost::metrics;
///
/// let sample = SampleReader::new()
///     .file("galaxies.csv")
///     .has_header(true)
///     .target_feature("z_spec")
///     .read()
///     .unwrap();
/// let cv = CrossValidation::new(&sample)
///     .n_folds(5)
///     .verbose(true)
///     .seed(777)
///     .shuffle();
/// for (train, test) in cv {
///     let mut booster = XgBoost::init(&train).max_loop(100);
///     let tree = RegressionTreeBuilder::new(&train)
///         .max_depth(3)
///         .build();
///     let f = booster.run(&tree);
///
///     let predictions = f.predict_all(&test);
///     let nmad = metrics::nmad(&predictions, test.target());
///     println!("[test NMAD: {nmad}]");
/// }
/// ```
pub struct CrossValidation<'a> {
    current_fold: usize,
    n_folds: usize,
    seed: u64,
    sample: &'a Sample,
    ix: Vec<usize>,
    verbose: bool,
}


impl<'a> CrossValidation<'a> {
    /// Construct a new instance of `CrossValidation.`
    #[inline]
    pub fn new(sample: &'a Sample) -> Self {
        let n_sample = sample.shape().0;
        let ix = (0..n_sample).collect::<Vec<_>>();
        Self {
            current_fold: 0,
            n_folds: 5,
            seed: 1234,
            verbose: false,
            sample,
            ix,
        }
    }


    /// Set the number of folds.
    /// Default value is `5.`
    #[inline]
    pub fn n_folds(mut self, n_folds: usize) -> Self {
        assert!(
            1 < n_folds && n_folds <= self.sample.shape().0,
            "The number of folds should be in `[2, n_sample]`."
        );
        self.n_folds = n_folds;
        self
    }


    /// Set the seed of the randomness for shuffling.
    /// Default vaule is `1234.`
    #[inline]
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }


    /// Set the verbose parameter.
    /// If `true`, `CrossValidation` prints some information
    /// when generating a train/test pair.
    /// Default vaule is `false.`
    #[inline]
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }


    /// Shuffle the training sample.
    /// By default, `CrossValidation` does not shuffle the sample.
    #[inline]
    pub fn shuffle(mut self) -> Self {
        let mut rng = StdRng::seed_from_u64(self.seed);
        self.ix.shuffle(&mut rng);
        self
    }


    /// The rows of the `i`th test fold,
    /// as positions into the shuffled index vector.
    #[inline]
    fn fold_range(&self, i: usize) -> (usize, usize) {
        let n_sample = self.sample.shape().0;
        let start = i * n_sample / self.n_folds;
        let end = (i + 1) * n_sample / self.n_folds;
        (start, end)
    }


    /// Returns the training/test sample for `i`th fold.
    #[inline]
    fn fold_at(&self, i: usize) -> (Sample, Sample) {
        let (start, end) = self.fold_range(i);
        self.sample.split(&self.ix, start, end)
    }
}


impl<'a> Iterator for CrossValidation<'a> {
    type Item = (Sample, Sample);
    fn next(&mut self) -> Option<Self::Item> {
        if self.current_fold >= self.n_folds { return None; }

        let output = self.fold_at(self.current_fold);
        self.current_fold += 1;

        if self.verbose {
            let train_size = output.0.shape().0;
            let test_size = output.1.shape().0;
            println!(
                "{}    {}    {}",
                format!("  [{: >3}'th fold]", self.current_fold).bold().red(),
                format!("[TRAIN {:>WIDTH$}]", train_size).bold().green(),
                format!("[TEST {:>WIDTH$}]", test_size).bold().yellow(),
            );
        }

        Some(output)
    }
}


/// Out-of-fold predictions:
/// every galaxy is predicted by the one model
/// whose training fold did not contain it.
/// The returned vector is aligned with the row order of `sample`,
/// so it can be compared against `sample.target()` directly.
pub fn cross_val_predict<R, F>(
    sample: &Sample,
    n_folds: usize,
    seed: u64,
    fit: F,
) -> Vec<f64>
    where R: Regressor,
          F: Fn(&Sample) -> R,
{
    let n_sample = sample.shape().0;
    assert!(
        1 < n_folds && n_folds <= n_sample,
        "The number of folds should be in `[2, n_sample]`."
    );

    let mut ix = (0..n_sample).collect::<Vec<_>>();
    let mut rng = StdRng::seed_from_u64(seed);
    ix.shuffle(&mut rng);


    let mut predictions = vec![0.0; n_sample];
    for i in 0..n_folds {
        let start = i * n_sample / n_folds;
        let end = (i + 1) * n_sample / n_folds;

        let (train, test) = sample.split(&ix, start, end);
        let f = fit(&train);
        let fold_predictions = f.predict_all(&test);

        for (pos, p) in ix[start..end].iter().zip(fold_predictions) {
            predictions[*pos] = p;
        }
    }

    predictions
}


#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::*;


    fn sample(n: usize) -> Sample {
        let mag: Vec<f64> = (0..n).map(|i| i as f64).collect();
        let z: Vec<f64> = mag.iter().map(|m| 0.01 * m).collect();
        let df = df!("mag_r" => &mag).unwrap();
        let target = Series::new("z_spec", &z);
        Sample::from_dataframe(df, target).unwrap()
    }


    #[test]
    fn folds_partition_the_sample() {
        let sample = sample(23);
        let cv = CrossValidation::new(&sample).n_folds(5).shuffle();

        let mut n_test_total = 0;
        for (train, test) in cv {
            let (n_train, _) = train.shape();
            let (n_test, _) = test.shape();
            assert_eq!(n_train + n_test, 23);
            n_test_total += n_test;
        }
        assert_eq!(n_test_total, 23);
    }


    #[test]
    fn unshuffled_folds_keep_the_row_order() {
        let sample = sample(10);
        let cv = CrossValidation::new(&sample).n_folds(5);

        let (_, test) = cv.into_iter().next().unwrap();
        assert_eq!(test.target(), &[0.0, 0.01]);
    }


    #[test]
    fn out_of_fold_predictions_follow_row_order() {
        let sample = sample(20);

        // A "model" that always predicts the mean redshift of its
        // training fold. The prediction at each row must then differ
        // from the global mean, since the row was held out.
        struct Mean(f64);
        impl Regressor for Mean {
            fn predict(&self, _sample: &Sample, _row: usize) -> f64 {
                self.0
            }
        }

        let predictions = cross_val_predict(
            &sample, 4, 0,
            |train| {
                let target = train.target();
                Mean(target.iter().sum::<f64>() / target.len() as f64)
            },
        );

        assert_eq!(predictions.len(), 20);
        let global_mean = sample.target().iter().sum::<f64>() / 20.0;
        for p in predictions {
            assert!((p - global_mean).abs() > 1e-9);
        }
    }
}
