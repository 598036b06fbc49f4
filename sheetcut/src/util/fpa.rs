use std::cmp::Ordering;
use std::fmt::{Debug, Display};

use serde::{Deserialize, Serialize};

///Wrapper around the [`float_cmp::approx_eq!()`] macro for easy comparison of floats with a certain tolerance.
///Two FPAs are considered equal if they are within a certain tolerance of each other.
#[derive(Debug, Clone, Copy)]
pub struct FPA(pub f64);

impl<T> From<T> for FPA
where
    T: Into<f64>,
{
    fn from(n: T) -> Self {
        FPA(n.into())
    }
}

impl PartialEq<Self> for FPA {
    fn eq(&self, other: &Self) -> bool {
        float_cmp::approx_eq!(f64, self.0, other.0)
    }
}

impl PartialOrd<Self> for FPA {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match self.eq(other) {
            true => Some(Ordering::Equal),
            false => self.0.partial_cmp(&other.0),
        }
    }
}

impl Display for FPA {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Display::fmt(&self.0, f)
    }
}

/// Absolute tolerance used by all geometric predicates, in the unit of measurement of the instance.
/// Values closer than the tolerance are considered equal, so touching edges never count as an overlap.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tolerance(pub f64);

impl Tolerance {
    #[inline(always)]
    pub fn eq(&self, a: f64, b: f64) -> bool {
        float_cmp::approx_eq!(f64, a, b, epsilon = self.0)
    }

    /// `a <= b`, within tolerance
    #[inline(always)]
    pub fn le(&self, a: f64, b: f64) -> bool {
        a <= b || self.eq(a, b)
    }

    /// `a < b`, and not within tolerance of each other
    #[inline(always)]
    pub fn lt(&self, a: f64, b: f64) -> bool {
        a < b && !self.eq(a, b)
    }

    /// `a > b`, and not within tolerance of each other
    #[inline(always)]
    pub fn gt(&self, a: f64, b: f64) -> bool {
        self.lt(b, a)
    }

    pub fn value(&self) -> f64 {
        self.0
    }
}

impl Default for Tolerance {
    fn default() -> Self {
        Tolerance(1e-3)
    }
}

impl Display for Tolerance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "±{}", self.0)
    }
}
