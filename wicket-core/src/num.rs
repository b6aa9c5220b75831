//! Exact integer capability shared by every numeric path of the engine.
//!
//! Fixed-width backings (`i32`, `i64`) use checked arithmetic throughout: every operation that can
//! leave the representable range returns `None`, and callers surface that as an error instead of
//! wrapping. `IBig` never overflows.

use std::fmt;
use std::hash::Hash;

use dashu::base::{Abs, Gcd};
use dashu::integer::IBig;

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Sign {
    Negative,
    Zero,
    Positive,
}

impl Sign {
    #[inline(always)]
    pub fn is_negative(self) -> bool {
        self == Sign::Negative
    }

    #[inline(always)]
    pub fn is_positive(self) -> bool {
        self == Sign::Positive
    }

    #[inline(always)]
    pub fn is_zero(self) -> bool {
        self == Sign::Zero
    }
}

pub trait Int: Clone + fmt::Debug + fmt::Display + Eq + Ord + Hash + Send + Sync + 'static {
    /// Human readable name of the backing, used in overflow diagnostics.
    const NAME: &'static str;

    fn zero() -> Self;
    fn one() -> Self;
    fn is_zero(&self) -> bool;
    fn sign(&self) -> Sign;

    fn checked_add(&self, rhs: &Self) -> Option<Self>;
    fn checked_sub(&self, rhs: &Self) -> Option<Self>;
    fn checked_mul(&self, rhs: &Self) -> Option<Self>;
    fn checked_neg(&self) -> Option<Self>;

    /// Division where `rhs` is known to divide `self`; `None` on a zero divisor or overflow.
    fn checked_div_exact(&self, rhs: &Self) -> Option<Self>;

    /// Non-negative gcd, with `gcd(0, 0) == 0`.
    fn checked_gcd(&self, rhs: &Self) -> Option<Self>;

    fn from_big(value: &IBig) -> Option<Self>;
    fn to_big(&self) -> IBig;

    #[inline(always)]
    fn is_negative(&self) -> bool {
        self.sign().is_negative()
    }

    #[inline(always)]
    fn is_positive(&self) -> bool {
        self.sign().is_positive()
    }

    #[inline]
    fn checked_abs(&self) -> Option<Self> {
        if self.is_negative() {
            self.checked_neg()
        } else {
            Some(self.clone())
        }
    }
}

macro_rules! fixed_width_int {
    ($t:ty, $u:ty, $name:literal) => {
        impl Int for $t {
            const NAME: &'static str = $name;

            #[inline(always)]
            fn zero() -> Self {
                0
            }

            #[inline(always)]
            fn one() -> Self {
                1
            }

            #[inline(always)]
            fn is_zero(&self) -> bool {
                *self == 0
            }

            #[inline(always)]
            fn sign(&self) -> Sign {
                match (*self).cmp(&0) {
                    std::cmp::Ordering::Less => Sign::Negative,
                    std::cmp::Ordering::Equal => Sign::Zero,
                    std::cmp::Ordering::Greater => Sign::Positive,
                }
            }

            #[inline(always)]
            fn checked_add(&self, rhs: &Self) -> Option<Self> {
                <$t>::checked_add(*self, *rhs)
            }

            #[inline(always)]
            fn checked_sub(&self, rhs: &Self) -> Option<Self> {
                <$t>::checked_sub(*self, *rhs)
            }

            #[inline(always)]
            fn checked_mul(&self, rhs: &Self) -> Option<Self> {
                <$t>::checked_mul(*self, *rhs)
            }

            #[inline(always)]
            fn checked_neg(&self) -> Option<Self> {
                <$t>::checked_neg(*self)
            }

            #[inline(always)]
            fn checked_div_exact(&self, rhs: &Self) -> Option<Self> {
                debug_assert!(*rhs == 0 || *self % *rhs == 0, "inexact division");
                <$t>::checked_div(*self, *rhs)
            }

            #[inline]
            fn checked_gcd(&self, rhs: &Self) -> Option<Self> {
                let mut a: $u = self.unsigned_abs();
                let mut b: $u = rhs.unsigned_abs();
                while b != 0 {
                    let r = a % b;
                    a = b;
                    b = r;
                }
                <$t>::try_from(a).ok()
            }

            #[inline]
            fn from_big(value: &IBig) -> Option<Self> {
                <$t>::try_from(value.clone()).ok()
            }

            #[inline]
            fn to_big(&self) -> IBig {
                IBig::from(*self)
            }
        }
    };
}

fixed_width_int!(i32, u32, "32-bit integers");
fixed_width_int!(i64, u64, "64-bit integers");

impl Int for IBig {
    const NAME: &'static str = "arbitrary precision integers";

    #[inline(always)]
    fn zero() -> Self {
        IBig::ZERO
    }

    #[inline(always)]
    fn one() -> Self {
        IBig::ONE
    }

    #[inline(always)]
    fn is_zero(&self) -> bool {
        *self == IBig::ZERO
    }

    #[inline]
    fn sign(&self) -> Sign {
        match self.cmp(&IBig::ZERO) {
            std::cmp::Ordering::Less => Sign::Negative,
            std::cmp::Ordering::Equal => Sign::Zero,
            std::cmp::Ordering::Greater => Sign::Positive,
        }
    }

    #[inline]
    fn checked_add(&self, rhs: &Self) -> Option<Self> {
        Some(self + rhs)
    }

    #[inline]
    fn checked_sub(&self, rhs: &Self) -> Option<Self> {
        Some(self - rhs)
    }

    #[inline]
    fn checked_mul(&self, rhs: &Self) -> Option<Self> {
        Some(self * rhs)
    }

    #[inline]
    fn checked_neg(&self) -> Option<Self> {
        Some(-self.clone())
    }

    #[inline]
    fn checked_div_exact(&self, rhs: &Self) -> Option<Self> {
        if Int::is_zero(rhs) {
            return None;
        }
        Some(self / rhs)
    }

    fn checked_gcd(&self, rhs: &Self) -> Option<Self> {
        if Int::is_zero(self) {
            return Some(rhs.clone().abs());
        }
        if Int::is_zero(rhs) {
            return Some(self.clone().abs());
        }
        Some(IBig::from(self.clone().gcd(rhs.clone())))
    }

    #[inline]
    fn from_big(value: &IBig) -> Option<Self> {
        Some(value.clone())
    }

    #[inline]
    fn to_big(&self) -> IBig {
        self.clone()
    }
}

pub fn dot<T: Int>(a: &[T], b: &[T]) -> Option<T> {
    debug_assert_eq!(a.len(), b.len(), "dot product length mismatch");
    let mut acc = T::zero();
    for (x, y) in a.iter().zip(b) {
        if x.is_zero() || y.is_zero() {
            continue;
        }
        acc = acc.checked_add(&x.checked_mul(y)?)?;
    }
    Some(acc)
}

/// `a·x − b·y`, entrywise.
pub fn combine<T: Int>(a: &T, x: &[T], b: &T, y: &[T]) -> Option<Vec<T>> {
    debug_assert_eq!(x.len(), y.len(), "combination length mismatch");
    let mut out = Vec::with_capacity(x.len());
    for (xi, yi) in x.iter().zip(y) {
        let lhs = if xi.is_zero() { T::zero() } else { a.checked_mul(xi)? };
        let rhs = if yi.is_zero() { T::zero() } else { b.checked_mul(yi)? };
        out.push(lhs.checked_sub(&rhs)?);
    }
    Some(out)
}

/// Gcd of all entries (zero for the zero vector).
pub fn content<T: Int>(v: &[T]) -> Option<T> {
    let mut g = T::zero();
    for x in v {
        if x.is_zero() {
            continue;
        }
        g = g.checked_gcd(x)?;
        if g == T::one() {
            break;
        }
    }
    Some(g)
}

/// Divides `v` by its content, preserving orientation.
pub fn make_primitive<T: Int>(v: &mut [T]) -> Option<()> {
    let g = content(v)?;
    if g.is_zero() || g == T::one() {
        return Some(());
    }
    for x in v.iter_mut() {
        *x = x.checked_div_exact(&g)?;
    }
    Some(())
}

pub fn negate_in_place<T: Int>(v: &mut [T]) -> Option<()> {
    for x in v.iter_mut() {
        *x = x.checked_neg()?;
    }
    Some(())
}

#[inline]
pub fn is_zero_vector<T: Int>(v: &[T]) -> bool {
    v.iter().all(Int::is_zero)
}

pub fn checked_lcm<T: Int>(a: &T, b: &T) -> Option<T> {
    if a.is_zero() || b.is_zero() {
        return Some(T::zero());
    }
    let g = a.checked_gcd(b)?;
    a.checked_div_exact(&g)?.checked_mul(b)?.checked_abs()
}
