// Copyright 2025-2026 Cornell University
// released under MIT license
// author: Kevin Laeufer <laeufer@cornell.edu>

use crate::coef::Number;
use crate::error::{Error, Result};
use crate::subterm::SubTerm;
use indexmap::IndexMap;
use indexmap::map::Entry;
use log::trace;
use rustc_hash::FxBuildHasher;
use std::cmp::Ordering;
use std::fmt::{Display, Formatter};
use std::ops::Neg;

/// Largest power a polynomial with more than one term is expanded to.
pub const MAX_EXPANSION_POWER: u32 = 1024;

/// A monomial: coefficient times a product of variable powers.
#[derive(Debug, Clone, PartialEq)]
pub struct Term {
    coef: Number,
    subterm: SubTerm,
}

impl Term {
    pub fn new(coef: impl Into<Number>, subterm: SubTerm) -> Self {
        Self {
            coef: coef.into(),
            subterm,
        }
    }

    pub fn constant(coef: impl Into<Number>) -> Self {
        Self::new(coef, SubTerm::one())
    }

    /// `1*name`
    pub fn var(name: impl Into<String>) -> Self {
        Self::new(Number::one(), SubTerm::var(name))
    }

    /// The additive identity.
    pub fn zero() -> Self {
        Self::constant(Number::zero())
    }

    #[inline]
    pub fn coef(&self) -> &Number {
        &self.coef
    }

    #[inline]
    pub fn subterm(&self) -> &SubTerm {
        &self.subterm
    }

    #[inline]
    pub fn is_constant(&self) -> bool {
        self.subterm.is_empty()
    }

    /// Two terms are alike if they only differ in their coefficient.
    #[inline]
    pub fn is_like(&self, other: &Term) -> bool {
        self.subterm == other.subterm
    }

    /// Like terms merge into a single term, anything else becomes a two-term polynomial.
    pub fn add(&self, other: &Term) -> Value {
        if self.is_like(other) {
            Value::Term(Self::new(&self.coef + &other.coef, self.subterm.clone()))
        } else {
            Value::Poly(Polynomial::new([self.clone(), other.clone()]))
        }
    }

    pub fn sub(&self, other: &Term) -> Value {
        if self.is_like(other) {
            Value::Term(Self::new(&self.coef - &other.coef, self.subterm.clone()))
        } else {
            Value::Poly(Polynomial::new([self.clone(), -other]))
        }
    }

    /// Fails if a variable exponent would exceed `MAX_EXPONENT`.
    pub fn mul(&self, other: &Term) -> Result<Term> {
        Ok(Self::new(&self.coef * &other.coef, self.subterm.mul(&other.subterm)?))
    }

    /// Multiplies the coefficient, the variables stay the same.
    pub fn scale(&self, factor: &Number) -> Term {
        Self::new(&self.coef * factor, self.subterm.clone())
    }

    /// `coef^n * subterm^n` for a non-negative integer constant `n`.
    pub fn pow(&self, exponent: &Number) -> Result<Term> {
        let n = exponent.to_exponent()?;
        Ok(Self::new(self.coef.pow(exponent)?, self.subterm.pow(n)?))
    }

    /// Canonical display order: two constants are ordered by value,
    /// everything else by the sub-term order, ignoring the coefficient.
    pub fn canonical_cmp(&self, other: &Term) -> Ordering {
        if self.is_constant() && other.is_constant() {
            self.coef.total_cmp(&other.coef)
        } else {
            self.subterm.cmp(&other.subterm)
        }
    }
}

impl Neg for &Term {
    type Output = Term;

    fn neg(self) -> Term {
        Term::new(-&self.coef, self.subterm.clone())
    }
}

impl From<Number> for Term {
    fn from(coef: Number) -> Self {
        Self::constant(coef)
    }
}

impl Display for Term {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if self.coef.is_zero() {
            // `x-x` evaluates to the single term `0x`, which is just zero
            write!(f, "{}", self.coef)
        } else if !self.subterm.is_empty() && self.coef.is_one() {
            write!(f, "{}", self.subterm)
        } else {
            write!(f, "{}{}", self.coef, self.subterm)
        }
    }
}

/// A sum of monomials in normal form:
/// no zero coefficients, no two terms with the same sub-term, sorted by [`Term::canonical_cmp`].
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Polynomial {
    terms: Vec<Term>,
}

impl Polynomial {
    /// The only way to create a polynomial. Drops zeros, merges like terms and sorts.
    pub fn new(terms: impl IntoIterator<Item = Term>) -> Self {
        let mut monoms: IndexMap<SubTerm, Number, FxBuildHasher> = IndexMap::default();
        let mut input_count = 0usize;
        for term in terms {
            input_count += 1;
            // nothing to do if the coefficient is already zero
            if term.coef.is_zero() {
                continue;
            }
            match monoms.entry(term.subterm) {
                Entry::Occupied(mut e) => {
                    let sum = e.get() + &term.coef;
                    *e.get_mut() = sum;
                }
                Entry::Vacant(e) => {
                    e.insert(term.coef);
                }
            }
        }

        // like terms may have cancelled each other out
        let mut terms: Vec<Term> = monoms
            .into_iter()
            .filter(|(_, coef)| !coef.is_zero())
            .map(|(subterm, coef)| Term { coef, subterm })
            .collect();
        terms.sort_by(Term::canonical_cmp);
        trace!("normalized {input_count} terms into {}", terms.len());

        let p = Self { terms };
        p.debug_check_invariants();
        p
    }

    #[inline]
    pub fn zero() -> Self {
        Self::default()
    }

    #[inline]
    pub fn terms(&self) -> &[Term] {
        &self.terms
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.terms.len()
    }

    #[inline]
    pub fn is_zero(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Term> {
        self.terms.iter()
    }

    /// Returns true iff the normal form invariants hold.
    pub fn is_normalized(&self) -> bool {
        let no_zeros = self.terms.iter().all(|t| !t.coef.is_zero());
        let sorted_and_unique = self
            .terms
            .windows(2)
            .all(|w| w[0].canonical_cmp(&w[1]) == Ordering::Less);
        no_zeros && sorted_and_unique
    }

    #[inline]
    fn debug_check_invariants(&self) {
        debug_assert!(self.is_normalized(), "not in normal form: {self:?}");
    }

    pub fn add(&self, other: &Value) -> Polynomial {
        Self::new(self.terms.iter().chain(other.terms()).cloned())
    }

    pub fn sub(&self, other: &Value) -> Polynomial {
        Self::new(
            self.terms
                .iter()
                .cloned()
                .chain(other.terms().iter().map(|t| -t)),
        )
    }

    /// Full distribution of `self` over `other`.
    /// The products are summed starting from the additive identity, thus the result
    /// collapses into a single term iff every product is a constant.
    pub fn mul(&self, other: &Value) -> Result<Value> {
        let products = self
            .terms
            .iter()
            .flat_map(|a| other.terms().iter().map(move |b| a.mul(b)))
            .collect::<Result<Vec<Term>>>()?;
        if products.iter().all(Term::is_constant) {
            let sum = products
                .iter()
                .fold(Number::zero(), |acc, t| &acc + &t.coef);
            Ok(Value::Term(Term::constant(sum)))
        } else {
            Ok(Value::Poly(Self::new(products)))
        }
    }

    /// Repeated multiplication. `p^0` is one.
    /// Polynomials with more than one term are expanded up to `MAX_EXPANSION_POWER`.
    pub fn pow(&self, exponent: &Number) -> Result<Value> {
        let n = exponent.to_exponent()?;
        // `Number::pow` takes care of int/float promotion for the identity
        let one = Term::constant(Number::one().pow(exponent)?);
        match self.terms.as_slice() {
            [] if n == 0 => return Ok(Value::Term(one)),
            [] => return Ok(Value::Term(Term::zero())),
            [term] => {
                let t = term.pow(exponent)?;
                return Ok(if t.is_constant() {
                    Value::Term(t)
                } else {
                    Value::Poly(Polynomial::from(t))
                });
            }
            _ if n > MAX_EXPANSION_POWER => {
                return Err(Error::unsupported(format!(
                    "polynomial power {n} exceeds {MAX_EXPANSION_POWER}"
                )));
            }
            _ => {}
        }
        let mut r = Value::Term(one);
        for _ in 0..n {
            r = match r {
                Value::Term(t) => Polynomial::from(t).mul(&Value::Poly(self.clone()))?,
                Value::Poly(p) => p.mul(&Value::Poly(self.clone()))?,
            };
        }
        Ok(r)
    }
}

impl From<Term> for Polynomial {
    fn from(term: Term) -> Self {
        Self::new([term])
    }
}

impl Display for Polynomial {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if self.is_zero() {
            return write!(f, "0");
        }
        for (ii, term) in self.terms.iter().enumerate() {
            // negative coefficients bring their own sign
            if ii > 0 && term.coef.is_positive() {
                write!(f, "+")?;
            }
            write!(f, "{term}")?;
        }
        Ok(())
    }
}

/// The result of evaluating an expression: a single term as long as nothing had to be
/// kept apart, a polynomial otherwise.
#[derive(Debug, Clone)]
pub enum Value {
    Term(Term),
    Poly(Polynomial),
}

impl Value {
    /// The terms of this value. A single term is returned as is, even if its coefficient is zero.
    pub fn terms(&self) -> &[Term] {
        match self {
            Value::Term(t) => std::slice::from_ref(t),
            Value::Poly(p) => p.terms(),
        }
    }

    pub fn to_polynomial(&self) -> Polynomial {
        match self {
            Value::Term(t) => Polynomial::from(t.clone()),
            Value::Poly(p) => p.clone(),
        }
    }

    /// The numeric value if this does not depend on any variable.
    pub fn as_constant(&self) -> Option<Number> {
        match self {
            Value::Term(t) if t.is_constant() || t.coef.is_zero() => Some(t.coef.clone()),
            Value::Term(_) => None,
            Value::Poly(p) => match p.terms() {
                [] => Some(Number::zero()),
                [t] if t.is_constant() => Some(t.coef.clone()),
                _ => None,
            },
        }
    }

    pub fn add(&self, other: &Value) -> Value {
        match (self, other) {
            (Value::Term(a), Value::Term(b)) => a.add(b),
            (Value::Poly(p), _) => Value::Poly(p.add(other)),
            (Value::Term(t), Value::Poly(_)) => Value::Poly(Polynomial::from(t.clone()).add(other)),
        }
    }

    pub fn sub(&self, other: &Value) -> Value {
        match (self, other) {
            (Value::Term(a), Value::Term(b)) => a.sub(b),
            (Value::Poly(p), _) => Value::Poly(p.sub(other)),
            (Value::Term(t), Value::Poly(_)) => Value::Poly(Polynomial::from(t.clone()).sub(other)),
        }
    }

    pub fn mul(&self, other: &Value) -> Result<Value> {
        match (self, other) {
            (Value::Term(a), Value::Term(b)) => Ok(Value::Term(a.mul(b)?)),
            (Value::Poly(p), _) => p.mul(other),
            (Value::Term(t), Value::Poly(_)) => Polynomial::from(t.clone()).mul(other),
        }
    }

    /// Only constant, non-negative integer exponents are supported.
    pub fn pow(&self, exponent: &Value) -> Result<Value> {
        let n = exponent.as_constant().ok_or_else(|| {
            Error::unsupported(format!("exponent must be a constant, got {exponent}"))
        })?;
        match self {
            Value::Term(t) => Ok(Value::Term(t.pow(&n)?)),
            Value::Poly(p) => p.pow(&n),
        }
    }
}

impl From<Term> for Value {
    fn from(term: Term) -> Self {
        Value::Term(term)
    }
}

impl From<Polynomial> for Value {
    fn from(p: Polynomial) -> Self {
        Value::Poly(p)
    }
}

/// Values are equal if they describe the same polynomial, regardless of their shape.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Poly(a), Value::Poly(b)) => a == b,
            _ => self.to_polynomial() == other.to_polynomial(),
        }
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Term(t) => write!(f, "{t}"),
            Value::Poly(p) => write!(f, "{p}"),
        }
    }
}
