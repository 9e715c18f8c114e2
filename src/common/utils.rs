//! Small numeric helpers shared across the crate.

/// Normalize the given slice so that it sums up to `1`.
#[inline(always)]
pub(crate) fn normalize(items: &mut [f64]) {
    let z = items.iter().sum::<f64>();
    assert!(z > 0.0, "Tried to normalize a vector with non-positive sum");
    items.iter_mut()
        .for_each(|item| { *item /= z; });
}


/// Returns the median of the given values.
/// Even-length inputs return the mean of the two middle items.
pub(crate) fn median(values: &[f64]) -> f64 {
    let n_items = values.len();
    assert!(n_items > 0, "Tried to take the median of an empty slice");

    let mut values = values.to_vec();
    values.sort_by(|a, b| a.partial_cmp(b).unwrap());

    let mid = n_items / 2;
    if n_items % 2 == 0 {
        (values[mid - 1] + values[mid]) / 2.0
    } else {
        values[mid]
    }
}


/// Returns the weighted median of `(weight, value)` pairs:
/// the smallest value whose cumulative weight reaches
/// half of the total weight.
pub(crate) fn weighted_median(items: &mut [(f64, f64)]) -> f64 {
    let n_items = items.len();
    assert!(n_items > 0, "Tried to take the weighted median of an empty slice");

    if n_items == 1 {
        return items[0].1;
    }
    items.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap());

    let total_weight = items.iter()
        .map(|(w, _)| *w)
        .sum::<f64>();


    let mut partial_sum = 0.0_f64;
    for (w, x) in items.iter() {
        partial_sum += *w;
        if partial_sum >= 0.5 * total_weight {
            return *x;
        }
    }

    items[n_items - 1].1
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_sums_to_one() {
        let mut w = vec![1.0, 3.0, 4.0];
        normalize(&mut w);
        assert!((w.iter().sum::<f64>() - 1.0).abs() < 1e-12);
        assert!((w[2] - 0.5).abs() < 1e-12);
    }


    #[test]
    fn median_odd_and_even() {
        assert_eq!(median(&[3.0, 1.0, 2.0]), 2.0);
        assert_eq!(median(&[4.0, 1.0, 2.0, 3.0]), 2.5);
    }


    #[test]
    fn weighted_median_respects_weights() {
        // Half of the total weight is reached at the heavy item.
        let mut items = vec![(0.1, 1.0), (0.8, 2.0), (0.1, 3.0)];
        assert_eq!(weighted_median(&mut items), 2.0);

        let mut single = vec![(1.0, 7.0)];
        assert_eq!(weighted_median(&mut single), 7.0);
    }
}
