// Copyright 2025 the Thicket Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Primitive geometry: the bounds type, the scalar abstraction, and metrics.

use core::cmp::Ordering;
use core::fmt::Debug;

/// Axis-aligned bounds in 2D, stored as min/max corners.
///
/// Both intervals are closed, so a shared edge counts as containment and as
/// intersection. An inverted box (`max < min` on either axis) represents an
/// empty region; see [`Bounds2D::is_empty`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Bounds2D<T> {
    /// Minimum x (left)
    pub min_x: T,
    /// Minimum y (top)
    pub min_y: T,
    /// Maximum x (right)
    pub max_x: T,
    /// Maximum y (bottom)
    pub max_y: T,
}

impl<T> Bounds2D<T> {
    /// Create bounds from min/max corners.
    pub const fn new(min_x: T, min_y: T, max_x: T, max_y: T) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }
}

impl<T: Copy + PartialOrd> Bounds2D<T> {
    /// Whether the bounds contain the point.
    pub fn contains_point(&self, x: T, y: T) -> bool {
        le(self.min_x, x) && le(self.min_y, y) && le(x, self.max_x) && le(y, self.max_y)
    }

    /// Whether `other` lies entirely within these bounds.
    pub fn contains(&self, other: &Self) -> bool {
        le(self.min_x, other.min_x)
            && le(self.min_y, other.min_y)
            && le(other.max_x, self.max_x)
            && le(other.max_y, self.max_y)
    }

    /// Whether the bounds overlap `other`. False if either box is empty.
    pub fn intersects(&self, other: &Self) -> bool {
        !self.intersection(other).is_empty()
    }

    /// The overlap of two bounds. May be inverted (empty) when they are disjoint.
    pub fn intersection(&self, other: &Self) -> Self {
        Self {
            min_x: max_t(self.min_x, other.min_x),
            min_y: max_t(self.min_y, other.min_y),
            max_x: min_t(self.max_x, other.max_x),
            max_y: min_t(self.max_y, other.max_y),
        }
    }

    /// The minimal bounds enclosing both boxes.
    pub fn union(&self, other: &Self) -> Self {
        Self {
            min_x: min_t(self.min_x, other.min_x),
            min_y: min_t(self.min_y, other.min_y),
            max_x: max_t(self.max_x, other.max_x),
            max_y: max_t(self.max_y, other.max_y),
        }
    }

    /// True if the bounds are inverted on either axis (no area). Assumes no NaN.
    pub fn is_empty(&self) -> bool {
        lt(self.max_x, self.min_x) || lt(self.max_y, self.min_y)
    }
}

impl Bounds2D<f32> {
    /// Create bounds from origin and size in f32.
    pub const fn from_xywh(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            min_x: x,
            min_y: y,
            max_x: x + w,
            max_y: y + h,
        }
    }
}

impl Bounds2D<f64> {
    /// Create bounds from origin and size in f64.
    pub const fn from_xywh(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self {
            min_x: x,
            min_y: y,
            max_x: x + w,
            max_y: y + h,
        }
    }
}

impl Bounds2D<i64> {
    /// Create bounds from origin and size in i64.
    pub const fn from_xywh(x: i64, y: i64, w: i64, h: i64) -> Self {
        Self {
            min_x: x,
            min_y: y,
            max_x: x + w,
            max_y: y + h,
        }
    }
}

/// Numeric scalar abstraction for 2D bounds used by the index implementations.
///
/// Provides the minimal operations the placement and split cost heuristics
/// need, plus an associated widened accumulator type for volume/perimeter
/// metrics (e.g. f32→f64, i64→i128) so cost comparisons stay robust.
pub trait Scalar: Copy + PartialOrd + Debug {
    /// Widened accumulator type suitable for volume/cost computations.
    type Acc: Copy
        + PartialOrd
        + core::ops::Add<Output = Self::Acc>
        + core::ops::Sub<Output = Self::Acc>
        + core::ops::Mul<Output = Self::Acc>
        + Debug;

    /// Subtract two scalar values: a - b.
    fn sub(a: Self, b: Self) -> Self;

    /// Max of the scalar value and zero.
    fn max_zero(v: Self) -> Self;

    /// Midpoint between a and b (used for quadrant centers and split weights).
    fn mid(a: Self, b: Self) -> Self;

    /// Convert a scalar to the accumulator type.
    fn widen(v: Self) -> Self::Acc;

    /// Zero value for the accumulator type.
    fn acc_zero() -> Self::Acc;

    /// Convert an accumulator value to `f64` for dimensionless weighting.
    fn acc_to_f64(v: Self::Acc) -> f64;
}

impl Scalar for f32 {
    type Acc = f64;

    #[inline]
    fn sub(a: Self, b: Self) -> Self {
        a - b
    }

    #[inline]
    fn max_zero(v: Self) -> Self {
        v.max(0.0)
    }

    #[inline]
    fn mid(a: Self, b: Self) -> Self {
        0.5 * (a + b)
    }

    #[inline]
    fn widen(v: Self) -> Self::Acc {
        v as f64
    }

    #[inline]
    fn acc_zero() -> Self::Acc {
        0.0
    }

    #[inline]
    fn acc_to_f64(v: Self::Acc) -> f64 {
        v
    }
}

impl Scalar for f64 {
    type Acc = Self;

    #[inline]
    fn sub(a: Self, b: Self) -> Self {
        a - b
    }

    #[inline]
    fn max_zero(v: Self) -> Self {
        v.max(0.0)
    }

    #[inline]
    fn mid(a: Self, b: Self) -> Self {
        0.5 * (a + b)
    }

    #[inline]
    fn widen(v: Self) -> Self::Acc {
        v
    }

    #[inline]
    fn acc_zero() -> Self::Acc {
        0.0
    }

    #[inline]
    fn acc_to_f64(v: Self::Acc) -> f64 {
        v
    }
}

impl Scalar for i64 {
    type Acc = i128;

    #[inline]
    fn sub(a: Self, b: Self) -> Self {
        a.saturating_sub(b)
    }

    #[inline]
    fn max_zero(v: Self) -> Self {
        v.max(0)
    }

    #[inline]
    fn mid(a: Self, b: Self) -> Self {
        // Average without overflow: (a & b) + ((a ^ b) >> 1)
        (a & b) + ((a ^ b) >> 1)
    }

    #[inline]
    fn widen(v: Self) -> Self::Acc {
        v as i128
    }

    #[inline]
    fn acc_zero() -> Self::Acc {
        0
    }

    #[inline]
    fn acc_to_f64(v: Self::Acc) -> f64 {
        #[allow(
            clippy::cast_precision_loss,
            reason = "Weights are dimensionless orderings; precision loss is acceptable."
        )]
        let f = v as f64;
        f
    }
}

/// Area of the bounds, clamped at zero per axis, in the widened accumulator.
#[inline]
pub fn volume<T: Scalar>(b: &Bounds2D<T>) -> T::Acc {
    let w = T::max_zero(T::sub(b.max_x, b.min_x));
    let h = T::max_zero(T::sub(b.max_y, b.min_y));
    T::widen(w) * T::widen(h)
}

/// Half-perimeter (width + height) of the bounds, clamped at zero per axis.
#[inline]
pub fn extent_length<T: Scalar>(b: &Bounds2D<T>) -> T::Acc {
    let w = T::max_zero(T::sub(b.max_x, b.min_x));
    let h = T::max_zero(T::sub(b.max_y, b.min_y));
    T::widen(w) + T::widen(h)
}

/// Area of the overlap of two bounds; zero when they are disjoint.
#[inline]
pub fn intersection_volume<T: Scalar>(a: &Bounds2D<T>, b: &Bounds2D<T>) -> T::Acc {
    let i = a.intersection(b);
    if i.is_empty() { T::acc_zero() } else { volume(&i) }
}

/// Half-perimeter of the overlap of two bounds; zero when they are disjoint.
#[inline]
pub fn intersection_extent_length<T: Scalar>(a: &Bounds2D<T>, b: &Bounds2D<T>) -> T::Acc {
    let i = a.intersection(b);
    if i.is_empty() {
        T::acc_zero()
    } else {
        extent_length(&i)
    }
}

/// The shorter edge of the bounds.
#[inline]
pub fn min_edge<T: Scalar>(b: &Bounds2D<T>) -> T {
    let w = T::max_zero(T::sub(b.max_x, b.min_x));
    let h = T::max_zero(T::sub(b.max_y, b.min_y));
    min_t(w, h)
}

pub(crate) fn min_t<T: PartialOrd + Copy>(a: T, b: T) -> T {
    match a.partial_cmp(&b) {
        Some(Ordering::Greater) => b,
        _ => a,
    }
}

pub(crate) fn max_t<T: PartialOrd + Copy>(a: T, b: T) -> T {
    match a.partial_cmp(&b) {
        Some(Ordering::Less) => b,
        _ => a,
    }
}

pub(crate) fn le<T: PartialOrd>(a: T, b: T) -> bool {
    a.partial_cmp(&b)
        .map(|o| o != Ordering::Greater)
        .unwrap_or(false)
}

pub(crate) fn lt<T: PartialOrd>(a: T, b: T) -> bool {
    a.partial_cmp(&b)
        .map(|o| o == Ordering::Less)
        .unwrap_or(false)
}
