use std::fmt;
use std::ops::Range;
use std::cmp::Ordering;


use crate::sample::Feature;
use crate::weak_learner::type_and_struct::GradientHessian;


const EPS: f64 = 0.001;


/// Binning: a feature processing.
/// Each bin is a half-open interval of feature values;
/// its upper edge is a candidate split threshold.
#[derive(Debug)]
pub(crate) struct Bin(pub(crate) Range<f64>);

impl Bin {
    /// Create a new instance of `Bin`.
    #[inline(always)]
    pub(crate) fn new(range: Range<f64>) -> Self {
        Self(range)
    }


    /// Check whether the given `item` is contained by `self.`
    #[inline(always)]
    pub(crate) fn contains(&self, item: &f64) -> bool {
        self.0.contains(item)
    }
}


/// The gradient/hessian mass a bin accumulated,
/// together with the number of galaxies that fell into it.
#[derive(Clone, Copy, Default)]
pub(crate) struct BinPack {
    pub(crate) threshold: f64,
    pub(crate) gh: GradientHessian,
    pub(crate) count: usize,
}


/// A wrapper of `Vec<Bin>`.
pub(crate) struct Bins(Vec<Bin>);

impl Bins {
    /// Returns the number of bins.
    pub(crate) fn len(&self) -> usize {
        self.0.len()
    }


    /// Cut the given `Feature` into `n_bin` bins of equal width.
    /// The left-most bin is opened to `f64::MIN` and
    /// the right-most one to `f64::MAX` so that every value,
    /// including unseen ones at prediction time, falls into some bin.
    #[inline]
    pub(crate) fn cut(feature: &Feature, n_bin: usize) -> Self {
        assert!(n_bin > 0);
        let (mut min, mut max) = feature.min_max();

        // If the minimum value equals to the maximum one,
        // slightly perturb them.
        if min == max {
            min -= EPS;
            max += EPS;
        }

        let width = (max - min) / n_bin as f64;

        let mut bins = (0..n_bin)
            .map(|i| {
                let left = min + i as f64 * width;
                let right = min + (i + 1) as f64 * width;
                Bin::new(left..right)
            })
            .collect::<Vec<_>>();

        bins.first_mut().unwrap().0.start = f64::MIN;
        bins.last_mut().unwrap().0.end = f64::MAX;

        Self(bins)
    }


    /// One bin per distinct value,
    /// with edges at the midpoints between consecutive distinct values.
    /// This realizes the classical exact greedy split search.
    #[inline]
    pub(crate) fn exact(feature: &Feature) -> Self {
        let distinct = feature.distinct_values();

        if distinct.len() <= 1 {
            return Self(vec![Bin::new(f64::MIN..f64::MAX)]);
        }

        let mut edges = Vec::with_capacity(distinct.len() + 1);
        edges.push(f64::MIN);
        for pair in distinct.windows(2) {
            edges.push((pair[0] + pair[1]) / 2.0);
        }
        edges.push(f64::MAX);

        let bins = edges.windows(2)
            .map(|e| Bin::new(e[0]..e[1]))
            .collect::<Vec<_>>();

        Self(bins)
    }


    /// Accumulate the gradient/hessian statistics of the rows
    /// in `indices` into the bins of this feature.
    /// Empty bins are dropped; the surviving thresholds are
    /// the upper edges of the occupied bins.
    pub(crate) fn pack(
        &self,
        indices: &[usize],
        feat: &Feature,
        gh: &[GradientHessian],
    ) -> Vec<BinPack>
    {
        let n_bins = self.0.len();
        let mut packed = vec![BinPack::default(); n_bins];
        for (bin, pack) in self.0.iter().zip(packed.iter_mut()) {
            pack.threshold = bin.0.end;
        }

        for &i in indices {
            let xi = feat[i];

            let pos = self.0.binary_search_by(|range| {
                    if range.contains(&xi) {
                        return Ordering::Equal;
                    }
                    range.0.start.partial_cmp(&xi).unwrap()
                })
                .expect("A feature value fell outside all bins");
            packed[pos].gh.grad += gh[i].grad;
            packed[pos].gh.hess += gh[i].hess;
            packed[pos].count += 1;
        }

        packed.retain(|pack| pack.count > 0);
        packed
    }
}


impl fmt::Display for Bins {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} bins", self.len())
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    fn feature(values: &[f64]) -> Feature {
        let mut feat = Feature::new("mag_r");
        values.iter().for_each(|&v| feat.append(v));
        feat
    }


    #[test]
    fn cut_covers_the_whole_line() {
        let feat = feature(&[0.0, 1.0, 2.0, 3.0]);
        let bins = Bins::cut(&feat, 4);
        assert_eq!(bins.len(), 4);
        assert_eq!(bins.0.first().unwrap().0.start, f64::MIN);
        assert_eq!(bins.0.last().unwrap().0.end, f64::MAX);
    }


    #[test]
    fn exact_puts_edges_at_midpoints() {
        let feat = feature(&[1.0, 2.0, 2.0, 4.0]);
        let bins = Bins::exact(&feat);
        // Distinct values 1, 2, 4 give edges at 1.5 and 3.0.
        assert_eq!(bins.len(), 3);
        assert_eq!(bins.0[0].0.end, 1.5);
        assert_eq!(bins.0[1].0.end, 3.0);
    }


    #[test]
    fn pack_drops_empty_bins() {
        let feat = feature(&[0.0, 0.1, 3.9, 4.0]);
        let bins = Bins::cut(&feat, 4);
        let gh = vec![GradientHessian::new(1.0, 1.0); 4];
        let indices = [0, 1, 2, 3];
        let packs = bins.pack(&indices, &feat, &gh);

        // Only the outer bins are occupied.
        assert_eq!(packs.len(), 2);
        assert_eq!(packs[0].count, 2);
        assert_eq!(packs[1].count, 2);
    }
}
