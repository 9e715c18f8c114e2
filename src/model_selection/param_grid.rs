use serde::{Serialize, Deserialize};
use rand::rngs::StdRng;
use rand::SeedableRng;

use std::collections::BTreeMap;
use std::fmt;


/// A single hyperparameter value.
/// Integer values stay integers so that counts
/// (rounds, depths, bins) never pick up floating-point noise.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    /// An integer-valued hyperparameter, e.g. the number of rounds.
    Int(i64),
    /// A real-valued hyperparameter, e.g. the learning rate.
    Float(f64),
}


impl From<i64> for ParamValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}


impl From<f64> for ParamValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}


impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(value) => write!(f, "{value}"),
            Self::Float(value) => write!(f, "{value}"),
        }
    }
}


/// One assignment of values to hyperparameter names.
/// The names are kept sorted so that two equal assignments
/// print and serialize identically.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ParamSet(BTreeMap<String, ParamValue>);


impl ParamSet {
    /// An empty assignment; every lookup falls back to its default.
    pub fn new() -> Self {
        Self::default()
    }


    /// Insert one `name = value` pair.
    pub fn insert<V>(&mut self, name: &str, value: V)
        where V: Into<ParamValue>,
    {
        self.0.insert(name.to_string(), value.into());
    }


    /// Look up an integer hyperparameter.
    /// A float stored under the name is truncated.
    ///
    /// # Panics
    /// Panics if the truncation would lose a fractional part.
    pub fn get_int(&self, name: &str, default: i64) -> i64 {
        match self.0.get(name) {
            Some(ParamValue::Int(value)) => *value,
            Some(ParamValue::Float(value)) => {
                assert!(
                    value.fract() == 0.0,
                    "Hyperparameter `{name}` should be an integer, \
                     found `{value}`",
                );
                *value as i64
            },
            None => default,
        }
    }


    /// Look up a real hyperparameter.
    /// An integer stored under the name is widened.
    pub fn get_float(&self, name: &str, default: f64) -> f64 {
        match self.0.get(name) {
            Some(ParamValue::Int(value)) => *value as f64,
            Some(ParamValue::Float(value)) => *value,
            None => default,
        }
    }


    /// Returns `true` if no value is stored.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}


impl fmt::Display for ParamSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (name, value) in &self.0 {
            if !first {
                write!(f, ", ")?;
            }
            write!(f, "{name} = {value}")?;
            first = false;
        }
        Ok(())
    }
}


/// The Cartesian product of per-hyperparameter value lists.
/// The product is never materialized:
/// candidate `i` is decoded positionally,
/// so random search can draw distinct candidates from grids
/// far too large to enumerate.
///
/// # Example
/// ```
/// use photoz_boost::ParamGrid;
///
/// let grid = ParamGrid::new()
///     .param("n_estimators", [100i64, 200, 500])
///     .param("learning_rate", [0.05, 0.1]);
///
/// assert_eq!(grid.cardinality(), 6);
/// let candidate = grid.at(4);
/// assert_eq!(candidate.get_int("n_estimators", 0), 500);
/// ```
#[derive(Clone, Debug, Default)]
pub struct ParamGrid {
    names: Vec<String>,
    values: Vec<Vec<ParamValue>>,
}


impl ParamGrid {
    /// Construct an empty grid. Its cardinality is one:
    /// the single candidate with every hyperparameter at its default.
    pub fn new() -> Self {
        Self::default()
    }


    /// Add one hyperparameter and the values it ranges over.
    pub fn param<I, V>(mut self, name: &str, values: I) -> Self
        where I: IntoIterator<Item = V>,
              V: Into<ParamValue>,
    {
        let values = values.into_iter()
            .map(Into::into)
            .collect::<Vec<_>>();
        assert!(
            !values.is_empty(),
            "Hyperparameter `{name}` has no values to range over",
        );
        assert!(
            !self.names.iter().any(|n| n == name),
            "Hyperparameter `{name}` is already in the grid",
        );

        self.names.push(name.to_string());
        self.values.push(values);
        self
    }


    /// The number of candidates in the grid.
    pub fn cardinality(&self) -> usize {
        self.values.iter()
            .map(Vec::len)
            .product()
    }


    /// Decode the `i`th candidate.
    /// The last-added hyperparameter varies fastest.
    pub fn at(&self, i: usize) -> ParamSet {
        assert!(i < self.cardinality(), "Candidate index out of range");

        let mut remainder = i;
        let mut params = ParamSet::new();
        for (name, values) in
            self.names.iter().zip(&self.values).rev()
        {
            let value = values[remainder % values.len()];
            params.insert(name, value);
            remainder /= values.len();
        }
        params
    }


    /// Iterate over every candidate in the grid.
    pub fn iter(&self) -> impl Iterator<Item = ParamSet> + '_ {
        (0..self.cardinality()).map(|i| self.at(i))
    }


    /// Draw `n` distinct candidates uniformly at random.
    /// Asking for at least `cardinality()` candidates
    /// returns the whole grid.
    pub fn sample(&self, n: usize, seed: u64) -> Vec<ParamSet> {
        let cardinality = self.cardinality();
        if cardinality <= n {
            return self.iter().collect();
        }

        let mut rng = StdRng::seed_from_u64(seed);
        rand::seq::index::sample(&mut rng, cardinality, n)
            .into_iter()
            .map(|i| self.at(i))
            .collect()
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    fn grid() -> ParamGrid {
        ParamGrid::new()
            .param("n_estimators", [100i64, 200, 500])
            .param("learning_rate", [0.05, 0.1])
    }


    #[test]
    fn decoding_enumerates_the_product() {
        let grid = grid();
        assert_eq!(grid.cardinality(), 6);

        let candidates = grid.iter().collect::<Vec<_>>();
        assert_eq!(candidates.len(), 6);

        // All candidates are distinct.
        for (i, a) in candidates.iter().enumerate() {
            for b in &candidates[i + 1..] {
                assert_ne!(a, b);
            }
        }

        // The last-added hyperparameter varies fastest.
        assert_eq!(candidates[0].get_float("learning_rate", 0.0), 0.05);
        assert_eq!(candidates[1].get_float("learning_rate", 0.0), 0.1);
        assert_eq!(candidates[0].get_int("n_estimators", 0), 100);
        assert_eq!(candidates[2].get_int("n_estimators", 0), 200);
    }


    #[test]
    fn sampling_is_distinct_and_reproducible() {
        let grid = grid();
        let a = grid.sample(4, 42);
        let b = grid.sample(4, 42);
        assert_eq!(a, b);
        assert_eq!(a.len(), 4);
        for (i, x) in a.iter().enumerate() {
            for y in &a[i + 1..] {
                assert_ne!(x, y);
            }
        }

        // Oversampling returns the whole grid.
        assert_eq!(grid.sample(100, 0).len(), 6);
    }


    #[test]
    fn lookups_fall_back_to_defaults() {
        let params = grid().at(0);
        assert_eq!(params.get_int("max_depth", 3), 3);
        assert_eq!(params.get_float("subsample", 1.0), 1.0);
    }


    #[test]
    fn empty_grid_has_one_candidate() {
        let grid = ParamGrid::new();
        assert_eq!(grid.cardinality(), 1);
        assert!(grid.at(0).is_empty());
    }
}
