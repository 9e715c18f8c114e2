use polars::prelude::*;
use std::ops::Index;
use std::slice::Iter;

const BUF_SIZE: usize = 256;


/// A named column of photometric measurements.
/// Every feature in this crate is dense:
/// a magnitude table has a value for each galaxy and each band.
#[derive(Debug, Clone)]
pub struct Feature {
    /// Feature (band) name, e.g. `mag_r`.
    pub name: String,
    /// Feature values, one per galaxy.
    pub values: Vec<f64>,
}


impl Feature {
    /// Construct an empty feature with `name`.
    pub fn new<T: ToString>(name: T) -> Self {
        Self {
            name: name.to_string(),
            values: Vec::with_capacity(BUF_SIZE),
        }
    }


    /// Get the feature name.
    pub fn name(&self) -> &str {
        &self.name
    }


    /// Convert `polars::Series` into `Feature`.
    pub fn from_series(series: &Series) -> Self {
        let name = series.name().to_string();

        let values = series.f64()
            .expect("The series is not a dtype f64")
            .into_iter()
            .collect::<Option<Vec<_>>>()
            .expect("The series contains null entries");

        Self { name, values, }
    }


    /// Append a measurement to this feature.
    pub fn append(&mut self, x: f64) {
        self.values.push(x);
    }


    /// Returns an iterator over feature values.
    pub fn iter(&self) -> Iter<'_, f64> {
        self.values.iter()
    }


    /// Returns the number of items in `self.values`.
    pub fn len(&self) -> usize {
        self.values.len()
    }


    /// Returns `true` if `self.len()` is equals to `0`.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }


    pub(crate) fn into_target(self) -> Vec<f64> {
        self.values
    }


    /// Returns the minimum and maximum value of this feature.
    pub(crate) fn min_max(&self) -> (f64, f64) {
        let mut min = f64::MAX;
        let mut max = f64::MIN;
        self.values.iter()
            .copied()
            .for_each(|val| {
                min = min.min(val);
                max = max.max(val);
            });
        (min, max)
    }


    /// Returns the sorted distinct values of this feature.
    pub(crate) fn distinct_values(&self) -> Vec<f64> {
        let mut values = self.values.clone();
        values.sort_by(|a, b| a.partial_cmp(b).unwrap());
        values.dedup();
        values
    }


    pub(crate) fn distinct_value_count(&self) -> usize {
        self.distinct_values().len()
    }
}


impl Index<usize> for Feature {
    type Output = f64;
    fn index(&self, idx: usize) -> &Self::Output {
        &self.values[idx]
    }
}
