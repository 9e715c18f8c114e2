use serde::{Serialize, Deserialize};
use std::ops;
use std::cmp;


/// A struct that stores the first/second order derivative information
/// of one galaxy. The boosters fill these in;
/// the regression tree only ever sums them.
#[derive(Clone, Copy, Debug, Default)]
pub struct GradientHessian {
    pub(crate) grad: f64,
    pub(crate) hess: f64,
}


impl GradientHessian {
    /// Create a new instance of `GradientHessian`.
    #[inline(always)]
    pub fn new(grad: f64, hess: f64) -> Self {
        Self { grad, hess }
    }


    /// Returns `true` if both entries are zero,
    /// i.e., the galaxy does not take part in the fit.
    #[inline(always)]
    pub fn is_zero(&self) -> bool {
        self.grad == 0.0 && self.hess == 0.0
    }
}


#[derive(Clone, Copy, PartialEq, Debug, Serialize, Deserialize)]
#[repr(transparent)]
pub(crate) struct Prediction<T>(pub(crate) T);


impl<T> From<T> for Prediction<T> {
    #[inline]
    fn from(prediction: T) -> Self {
        Self(prediction)
    }
}


#[derive(Clone, Copy, PartialEq)]
#[repr(transparent)]
pub(crate) struct LossValue(pub(crate) f64);


impl From<f64> for LossValue {
    #[inline]
    fn from(loss_value: f64) -> Self {
        Self(loss_value)
    }
}


impl ops::Add<Self> for LossValue {
    type Output = Self;
    #[inline]
    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}


impl cmp::PartialEq<f64> for LossValue {
    #[inline]
    fn eq(&self, other: &f64) -> bool {
        self.0.eq(other)
    }
}


impl cmp::PartialOrd<Self> for LossValue {
    #[inline]
    fn partial_cmp(&self, other: &Self) -> Option<cmp::Ordering> {
        self.0.partial_cmp(&other.0)
    }
}


#[derive(Clone, Copy, PartialEq, Debug, Serialize, Deserialize)]
#[repr(transparent)]
pub(crate) struct Threshold(pub(crate) f64);


impl From<f64> for Threshold {
    #[inline]
    fn from(threshold: f64) -> Self {
        Self(threshold)
    }
}
