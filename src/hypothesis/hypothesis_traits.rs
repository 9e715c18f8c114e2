use crate::Sample;


/// A trait that defines the behavior of a regressor.
/// You only need to implement the `predict` method.
pub trait Regressor {
    /// Predicts the redshift of the i'th row of the `sample`.
    fn predict(&self, sample: &Sample, row: usize) -> f64;


    /// Predicts the redshifts of all rows of `sample`.
    fn predict_all(&self, sample: &Sample) -> Vec<f64>
    {
        let n_sample = sample.shape().0;
        (0..n_sample).map(|row| self.predict(sample, row))
            .collect::<Vec<_>>()
    }
}


impl<R: Regressor + ?Sized> Regressor for Box<R> {
    fn predict(&self, sample: &Sample, row: usize) -> f64 {
        self.as_ref().predict(sample, row)
    }
}
