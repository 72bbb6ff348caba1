// Copyright 2025-2026 Cornell University
// released under MIT license
// author: Kevin Laeufer <laeufer@cornell.edu>

use crate::coef::Number;
use crate::error::{Error, Result};
use regex::Regex;
use std::fmt::{Display, Formatter};
use std::sync::LazyLock;

static IDENT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").unwrap());

/// Binary operators. There is deliberately no division.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Op {
    Add = 0,
    Sub = 1,
    Mul = 2,
    Pow = 3,
}

impl Op {
    pub const ALL: [Op; 4] = [Op::Add, Op::Sub, Op::Mul, Op::Pow];

    pub fn symbol(self) -> char {
        match self {
            Op::Add => '+',
            Op::Sub => '-',
            Op::Mul => '*',
            Op::Pow => '^',
        }
    }

    pub fn from_symbol(c: char) -> Option<Op> {
        Self::ALL.into_iter().find(|op| op.symbol() == c)
    }
}

impl Display for Op {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// Expression tree produced by the parser.
#[derive(Debug, PartialEq)]
pub enum Expr {
    Num(Number),
    Var(String),
    BinOp(Op, Box<Expr>, Box<Expr>),
}

impl Expr {
    /// Numeric leaf. Infinite and NaN constants are rejected.
    pub fn num(value: impl Into<Number>) -> Result<Self> {
        match value.into() {
            Number::Float(f) if !f.is_finite() => Err(Error::Construction {
                kind: "number",
                value: f.to_string(),
            }),
            n => Ok(Self::Num(n)),
        }
    }

    /// Variable leaf. The name needs to be an identifier: `[A-Za-z_][A-Za-z0-9_]*`.
    pub fn var(name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        if IDENT_RE.is_match(&name) {
            Ok(Self::Var(name))
        } else {
            Err(Error::Construction {
                kind: "variable",
                value: name,
            })
        }
    }

    pub fn binop(op: Op, lhs: Expr, rhs: Expr) -> Self {
        Self::BinOp(op, Box::new(lhs), Box::new(rhs))
    }

    /// Linearizes the tree in post-order (operands before their operator).
    /// Uses an explicit stack, so the depth of the tree is not limited by the call stack.
    pub fn postfix(&self) -> Vec<Instr> {
        let mut out = Vec::new();
        let mut todo = vec![(self, false)];
        while let Some((expr, expanded)) = todo.pop() {
            match expr {
                Expr::Num(n) => out.push(Instr::Num(n.clone())),
                Expr::Var(name) => out.push(Instr::Var(name.clone())),
                Expr::BinOp(op, _, _) if expanded => out.push(Instr::Op(*op)),
                Expr::BinOp(_, lhs, rhs) => {
                    todo.push((expr, true));
                    todo.push((rhs, false));
                    todo.push((lhs, false));
                }
            }
        }
        out
    }
}

/// Dropping a long chain like `1+1+...+1` recursively would overflow the stack.
impl Drop for Expr {
    fn drop(&mut self) {
        fn detach(expr: &mut Expr, into: &mut Vec<Expr>) {
            if let Expr::BinOp(_, lhs, rhs) = expr {
                into.push(std::mem::replace(lhs.as_mut(), Expr::Var(String::new())));
                into.push(std::mem::replace(rhs.as_mut(), Expr::Var(String::new())));
            }
        }
        let mut todo = Vec::new();
        detach(self, &mut todo);
        while let Some(mut expr) = todo.pop() {
            detach(&mut expr, &mut todo);
        }
    }
}

/// Fully parenthesized. Like `postfix`, it walks the tree with an explicit stack.
impl Display for Expr {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        enum Item<'a> {
            Expr(&'a Expr),
            Op(Op),
            Close,
        }
        let mut todo = vec![Item::Expr(self)];
        while let Some(item) = todo.pop() {
            match item {
                Item::Expr(Expr::Num(n)) => write!(f, "{n}")?,
                Item::Expr(Expr::Var(name)) => write!(f, "{name}")?,
                Item::Expr(Expr::BinOp(op, lhs, rhs)) => {
                    write!(f, "(")?;
                    todo.push(Item::Close);
                    todo.push(Item::Expr(rhs.as_ref()));
                    todo.push(Item::Op(*op));
                    todo.push(Item::Expr(lhs.as_ref()));
                }
                Item::Op(op) => write!(f, "{op}")?,
                Item::Close => write!(f, ")")?,
            }
        }
        Ok(())
    }
}

/// One step of a postfix program.
#[derive(Debug, Clone, PartialEq)]
pub enum Instr {
    Num(Number),
    Var(String),
    Op(Op),
}
