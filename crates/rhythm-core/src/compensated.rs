//! Error-free transformations and double-double accumulation
//!
//! Shewchuk's two-sum primitives: the rounded sum and its exact rounding
//! error. Used where long chains of additions and subtractions of large,
//! nearly equal counts would otherwise cancel catastrophically.

use num_traits::{CheckedAdd, CheckedSub, Zero};
use std::ops::{Add, Neg, Sub};

/// Rounded sum and rounding error, valid when `|a| >= |b|`
#[inline]
pub fn fast_two_sum(a: f64, b: f64) -> (f64, f64) {
    let x = a + b;
    let b_virtual = x - a;
    (x, b - b_virtual)
}

/// Rounded sum and rounding error for operands in any order
#[inline]
pub fn two_sum(a: f64, b: f64) -> (f64, f64) {
    let x = a + b;
    let b_virtual = x - a;
    let a_virtual = x - b_virtual;
    let b_roundoff = b - b_virtual;
    let a_roundoff = a - a_virtual;
    (x, a_roundoff + b_roundoff)
}

/// Unevaluated sum `hi + lo` carrying roughly 106 bits of mantissa
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DoubleDouble {
    hi: f64,
    lo: f64,
}

impl DoubleDouble {
    pub fn new(value: f64) -> Self {
        Self { hi: value, lo: 0.0 }
    }

    /// Leading component
    pub fn hi(&self) -> f64 {
        self.hi
    }

    /// Trailing error component
    pub fn lo(&self) -> f64 {
        self.lo
    }

    /// Nearest f64
    pub fn to_f64(&self) -> f64 {
        self.hi + self.lo
    }

    pub fn is_finite(&self) -> bool {
        self.hi.is_finite() && self.lo.is_finite()
    }
}

impl From<f64> for DoubleDouble {
    fn from(value: f64) -> Self {
        Self::new(value)
    }
}

impl Add for DoubleDouble {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        let (s, e) = two_sum(self.hi, rhs.hi);
        let e = e + self.lo + rhs.lo;
        let (hi, lo) = fast_two_sum(s, e);
        Self { hi, lo }
    }
}

impl Neg for DoubleDouble {
    type Output = Self;

    fn neg(self) -> Self {
        Self {
            hi: -self.hi,
            lo: -self.lo,
        }
    }
}

impl Sub for DoubleDouble {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        self + (-rhs)
    }
}

impl Zero for DoubleDouble {
    fn zero() -> Self {
        Self::default()
    }

    fn is_zero(&self) -> bool {
        self.hi == 0.0 && self.lo == 0.0
    }
}

// "Checked" here means the result stayed finite.
impl CheckedAdd for DoubleDouble {
    fn checked_add(&self, v: &Self) -> Option<Self> {
        let sum = *self + *v;
        sum.is_finite().then_some(sum)
    }
}

impl CheckedSub for DoubleDouble {
    fn checked_sub(&self, v: &Self) -> Option<Self> {
        let diff = *self - *v;
        diff.is_finite().then_some(diff)
    }
}

/// Compensated sum of a slice, accumulated smallest magnitude first
pub fn expansion_sum(values: &[f64]) -> DoubleDouble {
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.abs().total_cmp(&b.abs()));
    sorted
        .into_iter()
        .fold(DoubleDouble::zero(), |acc, v| acc + DoubleDouble::new(v))
}
