use std::path::Path;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::collections::HashMap;
use std::ops::Index;

use polars::prelude::*;
use rayon::prelude::*;
use super::feature_struct::Feature;


/// Struct `Sample` holds a batch of galaxies:
/// a dense feature matrix (one column per photometric band)
/// and, once assigned, a row-aligned spectroscopic-redshift target.
#[derive(Debug, Clone)]
pub struct Sample {
    pub(super) name_to_index: HashMap<String, usize>,
    pub(super) features: Vec<Feature>,
    pub(super) target: Vec<f64>,
    pub(super) n_sample: usize,
    pub(super) n_feature: usize,
}


impl Sample {
    /// Convert `polars::DataFrame` and `polars::Series` into `Sample`.
    /// This method takes the ownership for the given pair
    /// `data` and `target`.
    pub fn from_dataframe(data: DataFrame, target: Series)
        -> io::Result<Self>
    {
        let (n_sample, n_feature) = data.shape();
        let target = target.f64()
            .expect("The target is not a dtype f64")
            .into_iter()
            .collect::<Option<Vec<_>>>()
            .expect("The target contains null entries");

        let features = data.get_columns()
            .into_par_iter()
            .map(|series| Feature::from_series(series))
            .collect::<Vec<_>>();

        let name_to_index = features.iter()
            .enumerate()
            .map(|(i, f)| (f.name().to_string(), i))
            .collect::<HashMap<_, _>>();

        let sample = Self {
            name_to_index, features, target, n_sample, n_feature,
        };
        Ok(sample)
    }


    /// Read a CSV format file to `Sample` type.
    /// The resulting sample has an empty target;
    /// assign one with [`Sample::set_target`]
    /// or [`Sample::with_target_from_csv`].
    pub fn from_csv<P>(file: P, mut has_header: bool) -> io::Result<Self>
        where P: AsRef<Path>,
    {
        // Open the given `file`.
        let file = File::open(file)?;
        let lines = BufReader::new(file).lines();

        let mut features = Vec::new();
        let mut n_sample = 0_usize;

        for line in lines {
            let line = line?;

            if has_header {
                features = line.split(',')
                    .map(|name| Feature::new(name.trim()))
                    .collect::<Vec<_>>();
                has_header = false;
                continue;
            }

            let xs = line.split(',')
                .map(|x| x.trim().parse::<f64>().expect("Failed to parse a feature value"))
                .collect::<Vec<_>>();

            // Without a header row,
            // the first data line fixes the number of columns.
            if features.is_empty() {
                features = (1..=xs.len())
                    .map(|i| Feature::new(format!("Feat. [{i}]")))
                    .collect::<Vec<_>>();
            }

            assert_eq!(
                xs.len(), features.len(),
                "Row {} has a wrong number of columns", n_sample + 1,
            );
            for (feat, x) in features.iter_mut().zip(xs) {
                feat.append(x);
            }
            n_sample += 1;
        }

        let n_feature = features.len();
        let target = Vec::with_capacity(0);

        let name_to_index = features.iter()
            .enumerate()
            .map(|(i, f)| (f.name().to_string(), i))
            .collect::<HashMap<_, _>>();

        let sample = Self {
            name_to_index, features, target, n_sample, n_feature,
        };

        Ok(sample)
    }


    /// Returns the target slice.
    pub fn target(&self) -> &[f64] {
        &self.target[..]
    }


    /// Returns a slice of type `Feature`.
    pub fn features(&self) -> &[Feature] {
        &self.features[..]
    }


    /// Set the feature of name `target` to `self.target`.
    /// The old value assigned to `self.target` will be dropped.
    pub fn set_target<S: AsRef<str>>(mut self, target: S) -> Self {
        let target = target.as_ref();
        let pos = self.features.iter()
            .position(|feat| feat.name() == target)
            .expect("The target column does not exist");


        self.target = self.features.remove(pos).into_target();
        self.n_feature -= 1;


        self.name_to_index = self.features.iter()
            .enumerate()
            .map(|(i, f)| (f.name().to_string(), i))
            .collect::<HashMap<_, _>>();

        self
    }


    /// Read the target vector from a separate single-column CSV file.
    /// The file must have as many rows as `self` has galaxies.
    pub fn with_target_from_csv<P>(mut self, file: P, mut has_header: bool)
        -> io::Result<Self>
        where P: AsRef<Path>,
    {
        let file = File::open(file)?;
        let lines = BufReader::new(file).lines();

        let mut target = Vec::with_capacity(self.n_sample);
        for line in lines {
            let line = line?;
            if has_header {
                has_header = false;
                continue;
            }
            let y = line.trim()
                .parse::<f64>()
                .expect("Failed to parse a target value");
            target.push(y);
        }

        if target.len() != self.n_sample {
            panic!(
                "The target file has {} rows \
                 while the feature matrix has {} rows.",
                target.len(), self.n_sample,
            );
        }

        self.target = target;
        Ok(self)
    }


    /// Returns the pair of the number of galaxies and
    /// the number of features.
    pub fn shape(&self) -> (usize, usize) {
        (self.n_sample, self.n_feature)
    }


    /// Returns the `idx`-th instance `(x, y)`.
    pub fn at(&self, idx: usize) -> (Vec<f64>, f64) {
        let x = self.features.iter()
            .map(|feat| feat[idx])
            .collect::<Vec<f64>>();
        let y = self.target[idx];

        (x, y)
    }


    fn empty_like(&self, n_sample: usize) -> Self {
        let features = self.features.iter()
            .map(|feat| Feature::new(feat.name()))
            .collect::<Vec<_>>();
        Self {
            name_to_index: self.name_to_index.clone(),
            features,
            target: Vec::with_capacity(n_sample),
            n_sample,
            n_feature: self.n_feature,
        }
    }


    fn append(&mut self, feat: Vec<f64>, y: f64) {
        self.features.iter_mut()
            .zip(feat)
            .for_each(|(col, f)| {
                col.append(f);
            });
        self.target.push(y);
    }


    /// Split `self` into two samples.
    /// Rows `ix[start..end]` form the second (test) sample,
    /// the remaining rows form the first (train) one.
    pub fn split<T>(&self, ix: T, start: usize, end: usize)
        -> (Sample, Sample)
        where T: AsRef<[usize]>
    {
        let ix = ix.as_ref();
        assert_eq!(ix.len(), self.n_sample);
        let test_size = end - start;
        let train_size = self.n_sample - test_size;

        let mut train = self.empty_like(train_size);
        let mut test = self.empty_like(test_size);

        for (i, &ii) in ix.iter().enumerate() {
            let (x, y) = self.at(ii);
            if start <= i && i < end {
                test.append(x, y);
            } else {
                train.append(x, y);
            }
        }

        (train, test)
    }


    pub(crate) fn target_is_specified(&self) {
        if self.n_sample != self.target.len() {
            panic!(
                "The target vector is not assigned.\n\
                 Use `Sample::set_target(\"column\")` or \
                 `Sample::with_target_from_csv(path, has_header)`."
            );
        }
    }
}


impl<S> Index<S> for Sample
    where S: AsRef<str>
{
    type Output = Feature;


    fn index(&self, name: S) -> &Self::Output {
        let name: &str = name.as_ref();
        let k = *self.name_to_index.get(name)
            .expect("The feature does not exist");
        &self.features[k]
    }
}
