// Copyright 2025-2026 Cornell University
// released under MIT license
// author: Kevin Laeufer <laeufer@cornell.edu>

//! Coefficient Library

use crate::error::{Error, Result};
use num_bigint::{BigInt, BigUint};
use num_traits::{FromPrimitive, One, Pow, Signed, ToPrimitive, Zero};
use std::cmp::Ordering;
use std::fmt::{Display, Formatter};
use std::ops::{Add, Mul, Neg, Sub};

/// Largest integer power, in bits, that `pow` will compute.
pub const MAX_POW_BITS: u64 = 1 << 20;

/// A numeric coefficient. Integers are exact, any operation involving a float yields a float.
#[derive(Debug, Clone)]
pub enum Number {
    Int(BigInt),
    Float(f64),
}

impl Number {
    #[inline]
    pub fn zero() -> Self {
        Self::Int(BigInt::zero())
    }

    #[inline]
    pub fn one() -> Self {
        Self::Int(BigInt::one())
    }

    pub fn is_zero(&self) -> bool {
        match self {
            Self::Int(i) => i.is_zero(),
            Self::Float(f) => *f == 0.0,
        }
    }

    pub fn is_one(&self) -> bool {
        match self {
            Self::Int(i) => i.is_one(),
            Self::Float(f) => *f == 1.0,
        }
    }

    /// Strictly greater than zero. `NaN` is neither positive nor negative.
    pub fn is_positive(&self) -> bool {
        match self {
            Self::Int(i) => i.is_positive(),
            Self::Float(f) => *f > 0.0,
        }
    }

    pub fn is_negative(&self) -> bool {
        match self {
            Self::Int(i) => i.is_negative(),
            Self::Float(f) => *f < 0.0,
        }
    }

    pub fn is_float(&self) -> bool {
        matches!(self, Self::Float(_))
    }

    pub fn to_f64(&self) -> f64 {
        match self {
            Self::Int(i) => i.to_f64().unwrap_or(f64::NAN),
            Self::Float(f) => *f,
        }
    }

    /// Interprets `self` as an exponent. Only non-negative integer values
    /// (including integer-valued floats) that fit into a `u32` are accepted.
    pub fn to_exponent(&self) -> Result<u32> {
        let exponent = match self {
            Self::Int(i) if i.is_negative() => None,
            Self::Int(i) => i.to_u32(),
            Self::Float(f) if f.is_finite() && *f >= 0.0 && f.fract() == 0.0 => f.to_u32(),
            Self::Float(_) => None,
        };
        exponent.ok_or_else(|| {
            Error::unsupported(format!(
                "exponent must be a non-negative integer, got {self}"
            ))
        })
    }

    /// `self ^ exponent`. Raising to a float exponent yields a float, like any other
    /// mixed operation. Integer results are limited to `MAX_POW_BITS`, float results
    /// must be finite.
    pub fn pow(&self, exponent: &Number) -> Result<Number> {
        let n = exponent.to_exponent()?;
        let r = match self {
            Self::Int(i) if !exponent.is_float() => {
                let bits = i.bits().saturating_mul(n as u64);
                if i.magnitude() > &BigUint::one() && bits > MAX_POW_BITS {
                    return Err(Error::unsupported(format!(
                        "{self}^{n} exceeds {MAX_POW_BITS} bits"
                    )));
                }
                Self::Int(Pow::pow(i, n))
            }
            _ => {
                let v = self.to_f64().powf(n as f64);
                if !v.is_finite() {
                    return Err(Error::unsupported(format!("{self}^{exponent} overflows")));
                }
                Self::Float(v)
            }
        };
        Ok(r)
    }

    /// Numeric comparison across kinds. `NaN` is ordered with `f64::total_cmp`.
    pub fn total_cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Int(a), Self::Int(b)) => a.cmp(b),
            _ => self.to_f64().total_cmp(&other.to_f64()),
        }
    }
}

impl PartialEq for Number {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Int(a), Self::Int(b)) => a == b,
            (Self::Float(a), Self::Float(b)) => a == b,
            (Self::Int(i), Self::Float(f)) | (Self::Float(f), Self::Int(i)) => {
                f.fract() == 0.0 && BigInt::from_f64(*f).is_some_and(|v| &v == i)
            }
        }
    }
}

impl Add for &Number {
    type Output = Number;

    fn add(self, rhs: Self) -> Number {
        match (self, rhs) {
            (Number::Int(a), Number::Int(b)) => Number::Int(a + b),
            _ => Number::Float(self.to_f64() + rhs.to_f64()),
        }
    }
}

impl Sub for &Number {
    type Output = Number;

    fn sub(self, rhs: Self) -> Number {
        match (self, rhs) {
            (Number::Int(a), Number::Int(b)) => Number::Int(a - b),
            _ => Number::Float(self.to_f64() - rhs.to_f64()),
        }
    }
}

impl Mul for &Number {
    type Output = Number;

    fn mul(self, rhs: Self) -> Number {
        match (self, rhs) {
            (Number::Int(a), Number::Int(b)) => Number::Int(a * b),
            _ => Number::Float(self.to_f64() * rhs.to_f64()),
        }
    }
}

impl Neg for &Number {
    type Output = Number;

    fn neg(self) -> Number {
        match self {
            Number::Int(i) => Number::Int(-i),
            Number::Float(f) => Number::Float(-f),
        }
    }
}

impl From<i64> for Number {
    fn from(value: i64) -> Self {
        Self::Int(value.into())
    }
}

impl From<i32> for Number {
    fn from(value: i32) -> Self {
        Self::Int(value.into())
    }
}

impl From<BigInt> for Number {
    fn from(value: BigInt) -> Self {
        Self::Int(value)
    }
}

impl From<f64> for Number {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl Display for Number {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Int(i) => write!(f, "{i}"),
            // keep integer-valued floats recognizable as floats: `3.0`, not `3`
            Self::Float(v) if v.is_finite() && v.fract() == 0.0 => write!(f, "{v:.1}"),
            Self::Float(v) => write!(f, "{v}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_promotion() {
        let a = Number::from(2);
        let b = Number::from(1.5);
        assert!(matches!(&a + &a, Number::Int(_)));
        assert!(matches!(&a + &b, Number::Float(_)));
        assert!(matches!(&b * &a, Number::Float(_)));
        assert_eq!(&a * &b, Number::from(3.0));
        assert_eq!(-&a, Number::from(-2));
    }

    #[test]
    fn test_mixed_equality() {
        assert_eq!(Number::from(1), Number::from(1.0));
        assert_ne!(Number::from(1), Number::from(1.5));
        assert_ne!(Number::from(0), Number::from(f64::NAN));
    }

    #[test]
    fn test_display() {
        assert_eq!(Number::from(-22).to_string(), "-22");
        assert_eq!(Number::from(3.0).to_string(), "3.0");
        assert_eq!(Number::from(0.0).to_string(), "0.0");
        assert_eq!(Number::from(0.001).to_string(), "0.001");
        assert_eq!(Number::from(1.5).to_string(), "1.5");
        // no exponent notation at any magnitude
        let big = Number::from(1e20).to_string();
        assert_eq!(big, "100000000000000000000.0");
        assert_eq!(Number::from(1e-7).to_string(), "0.0000001");
        let huge = Number::from(1e300).to_string();
        assert!(huge.ends_with(".0") && !huge.contains('e'));
        assert_eq!(huge.parse::<f64>().unwrap(), 1e300);
    }

    #[test]
    fn test_pow() {
        let three = Number::from(3);
        assert_eq!(three.pow(&Number::from(6)).unwrap(), Number::from(729));
        assert!(matches!(three.pow(&Number::from(2)).unwrap(), Number::Int(_)));
        // float exponent promotes
        let r = three.pow(&Number::from(2.0)).unwrap();
        assert!(r.is_float());
        assert_eq!(r, Number::from(9));
        assert_eq!(Number::from(0).pow(&Number::from(0)).unwrap(), Number::one());
        // big integers stay exact
        let big = Number::from(10).pow(&Number::from(30)).unwrap();
        assert_eq!(big.to_string(), "1000000000000000000000000000000");
    }

    #[test]
    fn test_pow_unsupported() {
        let two = Number::from(2);
        assert!(matches!(two.pow(&Number::from(-1)), Err(Error::Unsupported(_))));
        assert!(matches!(two.pow(&Number::from(0.5)), Err(Error::Unsupported(_))));
        assert!(matches!(two.pow(&Number::from(f64::INFINITY)), Err(Error::Unsupported(_))));
    }

    #[test]
    fn test_pow_limits() {
        let ten = Number::from(10);
        assert!(matches!(ten.pow(&Number::from(i64::from(u32::MAX))), Err(Error::Unsupported(_))));
        assert!(matches!(
            Number::from(10.0).pow(&Number::from(400)),
            Err(Error::Unsupported(_))
        ));
        // powers of -1, 0 and 1 never grow
        assert_eq!(Number::one().pow(&Number::from(i64::from(u32::MAX))).unwrap(), Number::one());
        assert_eq!(Number::from(-1).pow(&Number::from(i64::from(u32::MAX))).unwrap(), Number::from(-1));
        assert_eq!(Number::zero().pow(&Number::from(i64::from(u32::MAX))).unwrap(), Number::zero());
        assert!(ten.pow(&Number::from(10_000)).is_ok());
    }

    #[test]
    fn test_total_cmp() {
        assert_eq!(Number::from(1).total_cmp(&Number::from(2)), Ordering::Less);
        assert_eq!(Number::from(2.5).total_cmp(&Number::from(2)), Ordering::Greater);
        assert_eq!(Number::from(2.0).total_cmp(&Number::from(2)), Ordering::Equal);
    }
}
