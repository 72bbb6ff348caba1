// Copyright 2025-2026 Cornell University
// released under MIT license
// author: Kevin Laeufer <laeufer@cornell.edu>

use crate::error::{Error, Result};
use std::cmp::Ordering;
use std::fmt::{Display, Formatter};

/// Largest exponent of a single variable, `mul` and `pow` fail beyond it.
pub const MAX_EXPONENT: u64 = u32::MAX as u64;

/// The variable part of a monomial, e.g. `x^2*y`.
/// Stored as `(name, exponent)` pairs, sorted by name, without duplicates and without
/// zero exponents. An empty sub-term denotes a constant.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct SubTerm {
    vars: Vec<(String, u64)>,
}

impl SubTerm {
    /// Normalizes arbitrary `(name, exponent)` pairs: sorts, sums duplicates and drops zeros.
    pub fn new(pairs: impl IntoIterator<Item = (String, u64)>) -> Self {
        let mut pairs: Vec<_> = pairs.into_iter().filter(|(_, e)| *e > 0).collect();
        pairs.sort_by(|(a, _), (b, _)| a.cmp(b));
        let mut vars: Vec<(String, u64)> = Vec::with_capacity(pairs.len());
        for (name, exp) in pairs {
            match vars.last_mut() {
                Some((last, last_exp)) if *last == name => {
                    *last_exp = last_exp.saturating_add(exp)
                }
                _ => vars.push((name, exp)),
            }
        }
        Self { vars }
    }

    /// A constant, i.e., no variables.
    #[inline]
    pub fn one() -> Self {
        Self::default()
    }

    /// A single variable with exponent one.
    pub fn var(name: impl Into<String>) -> Self {
        Self {
            vars: vec![(name.into(), 1)],
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    #[inline]
    pub fn var_count(&self) -> usize {
        self.vars.len()
    }

    /// Exponent of `name`, zero if the variable does not occur.
    pub fn exponent(&self, name: &str) -> u64 {
        self.vars
            .binary_search_by(|(n, _)| n.as_str().cmp(name))
            .map(|ii| self.vars[ii].1)
            .unwrap_or(0)
    }

    pub fn vars(&self) -> impl Iterator<Item = (&str, u64)> {
        self.vars.iter().map(|(n, e)| (n.as_str(), *e))
    }

    fn names(&self) -> impl Iterator<Item = &str> {
        self.vars.iter().map(|(n, _)| n.as_str())
    }

    fn exponents(&self) -> impl Iterator<Item = u64> + '_ {
        self.vars.iter().map(|(_, e)| *e)
    }

    /// Multiplies two sub-terms by merging their sorted variable lists and
    /// adding exponents of shared variables.
    pub fn mul(&self, other: &SubTerm) -> Result<Self> {
        if self.vars.is_empty() {
            return Ok(other.clone());
        }
        if other.vars.is_empty() {
            return Ok(self.clone());
        }

        let mut a_iter = self.vars.iter();
        let mut b_iter = other.vars.iter();
        let mut a_next = a_iter.next();
        let mut b_next = b_iter.next();

        let mut vars = Vec::with_capacity(self.vars.len() + other.vars.len());
        while a_next.is_some() || b_next.is_some() {
            match (a_next, b_next) {
                (Some(a), None) => {
                    vars.push(a.clone());
                    a_next = a_iter.next();
                }
                (None, Some(b)) => {
                    vars.push(b.clone());
                    b_next = b_iter.next();
                }
                (Some((a_name, a_exp)), Some((b_name, b_exp))) => match a_name.cmp(b_name) {
                    Ordering::Less => {
                        vars.push((a_name.clone(), *a_exp));
                        a_next = a_iter.next();
                    }
                    Ordering::Equal => {
                        let exp = checked_exponent(a_name, a_exp.checked_add(*b_exp))?;
                        vars.push((a_name.clone(), exp));
                        a_next = a_iter.next();
                        b_next = b_iter.next();
                    }
                    Ordering::Greater => {
                        vars.push((b_name.clone(), *b_exp));
                        b_next = b_iter.next();
                    }
                },
                (None, None) => unreachable!("loop should have terminated"),
            }
        }

        debug_assert!(
            vars.as_slice().windows(2).all(|w| w[0].0 < w[1].0),
            "{:?}",
            vars
        );

        // note: do not call `new` here, the merge already produced a sorted list
        Ok(Self { vars })
    }

    /// Raises every variable to the `n`-th power. `x^0` is the constant sub-term.
    pub fn pow(&self, n: u32) -> Result<Self> {
        if n == 0 {
            return Ok(Self::one());
        }
        let vars = self
            .vars
            .iter()
            .map(|(name, exp)| {
                checked_exponent(name, exp.checked_mul(n as u64)).map(|e| (name.clone(), e))
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { vars })
    }
}

fn checked_exponent(name: &str, exp: Option<u64>) -> Result<u64> {
    match exp {
        Some(e) if e <= MAX_EXPONENT => Ok(e),
        _ => Err(Error::unsupported(format!(
            "exponent of {name} exceeds {MAX_EXPONENT}"
        ))),
    }
}

/// Monomial order used for display:
/// constants come last, otherwise the sorted variable names are compared
/// lexicographically (the side holding the smallest name that the other side lacks
/// comes first, a strict prefix comes first) and identical variable sets are
/// compared by exponent in name order.
impl Ord for SubTerm {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self.is_empty(), other.is_empty()) {
            (true, true) => Ordering::Equal,
            (true, false) => Ordering::Greater,
            (false, true) => Ordering::Less,
            (false, false) => self
                .names()
                .cmp(other.names())
                .then_with(|| self.exponents().cmp(other.exponents())),
        }
    }
}

impl PartialOrd for SubTerm {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl From<&str> for SubTerm {
    fn from(name: &str) -> Self {
        Self::var(name)
    }
}

impl Display for SubTerm {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for (ii, (name, exp)) in self.vars.iter().enumerate() {
            if ii > 0 {
                write!(f, "*")?;
            }
            if *exp == 1 {
                write!(f, "{name}")?;
            } else {
                write!(f, "{name}^{exp}")?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn st(pairs: &[(&str, u64)]) -> SubTerm {
        SubTerm::new(pairs.iter().map(|(n, e)| (n.to_string(), *e)))
    }

    #[test]
    fn test_new_normalizes() {
        let a = st(&[("z", 2), ("x", 1), ("z", 1), ("y", 0)]);
        assert_eq!(format!("{a}"), "x*z^3");
        assert_eq!(a, st(&[("x", 1), ("z", 3)]));
        assert_eq!(a.exponent("z"), 3);
        assert_eq!(a.exponent("y"), 0);
        assert_eq!(format!("{}", SubTerm::one()), "");
    }

    #[test]
    fn test_mul() {
        let a = st(&[("x", 1), ("z", 2)]);
        let b = st(&[("y", 3), ("z", 1)]);
        assert_eq!(a.mul(&b).unwrap(), st(&[("x", 1), ("y", 3), ("z", 3)]));
        assert_eq!(a.mul(&b).unwrap(), b.mul(&a).unwrap());
        assert_eq!(a.mul(&SubTerm::one()).unwrap(), a);
        assert_eq!(SubTerm::var("x").mul(&SubTerm::var("x")).unwrap(), st(&[("x", 2)]));
    }

    #[test]
    fn test_exponent_limit() {
        let top = st(&[("x", MAX_EXPONENT)]);
        let x = SubTerm::var("x");
        // the same bound holds for products and powers
        assert!(matches!(top.mul(&x), Err(Error::Unsupported(_))));
        assert!(matches!(x.mul(&top), Err(Error::Unsupported(_))));
        assert_eq!(top.mul(&SubTerm::var("y")).unwrap().exponent("x"), MAX_EXPONENT);
        assert_eq!(top.pow(1).unwrap(), top);
        let below = st(&[("x", MAX_EXPONENT - 1)]);
        assert_eq!(below.mul(&x).unwrap(), top);
    }

    #[test]
    fn test_pow() {
        let a = st(&[("x", 1), ("y", 2)]);
        assert_eq!(a.pow(3).unwrap(), st(&[("x", 3), ("y", 6)]));
        assert!(a.pow(0).unwrap().is_empty());
        let huge = st(&[("x", MAX_EXPONENT)]);
        assert!(matches!(huge.pow(2), Err(Error::Unsupported(_))));
    }

    #[test]
    fn test_order() {
        let x4 = st(&[("x", 4)]);
        let x2y8 = st(&[("x", 2), ("y", 8)]);
        let y16 = st(&[("y", 16)]);
        let one = SubTerm::one();
        assert!(x4 < x2y8);
        assert!(x2y8 < y16);
        assert!(x4 < y16);
        assert!(y16 < one);
        assert_eq!(one.cmp(&SubTerm::one()), Ordering::Equal);

        // same variables: smaller exponent first
        assert!(st(&[("x", 3)]) < st(&[("x", 4)]));
        assert!(st(&[("x", 1), ("y", 9)]) < st(&[("x", 2), ("y", 1)]));

        // the side holding the smallest name the other one lacks comes first
        assert!(st(&[("a", 1), ("z", 1)]) < st(&[("b", 1)]));
        assert!(st(&[("x", 1), ("y", 1)]) < st(&[("x", 1), ("z", 1)]));
    }

    #[test]
    fn test_order_is_total() {
        let mut terms = vec![
            st(&[("y", 1)]),
            SubTerm::one(),
            st(&[("x", 1), ("z", 1)]),
            st(&[("x", 1), ("y", 1)]),
            st(&[("x", 2)]),
            st(&[("x", 1)]),
        ];
        terms.sort();
        let rendered: Vec<_> = terms.iter().map(|t| t.to_string()).collect();
        assert_eq!(rendered, ["x", "x^2", "x*y", "x*z", "y", ""]);
        for a in terms.iter() {
            for b in terms.iter() {
                assert_eq!(a.cmp(b), b.cmp(a).reverse());
            }
        }
    }
}
