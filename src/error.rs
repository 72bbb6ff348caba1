// Copyright 2025-2026 Cornell University
// released under MIT license
// author: Kevin Laeufer <laeufer@cornell.edu>

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Everything that can go wrong while turning text into a polynomial.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// A leaf of the expression tree was given a value it cannot hold.
    #[error("cannot build {kind} leaf from {value:?}")]
    Construction { kind: &'static str, value: String },
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error("unsupported operation: {0}")]
    Unsupported(String),
    /// The postfix program did not leave exactly one value on the operand stack.
    #[error("malformed expression: {0}")]
    MalformedTree(String),
}

impl Error {
    pub(crate) fn unsupported(msg: impl Into<String>) -> Self {
        Self::Unsupported(msg.into())
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    #[error("unexpected character {found:?} at position {pos}")]
    InvalidCharacter { pos: usize, found: char },
    #[error("expected {expected} at position {pos}, found {found}")]
    UnexpectedToken {
        pos: usize,
        expected: &'static str,
        found: String,
    },
    #[error("unexpected end of input, expected {expected}")]
    UnexpectedEnd { expected: &'static str },
    #[error("invalid number literal {literal:?} at position {pos}")]
    InvalidNumber { pos: usize, literal: String },
    #[error("division is not supported (position {pos})")]
    Division { pos: usize },
    #[error("expression nested deeper than {limit} levels at position {pos}")]
    TooDeep { pos: usize, limit: usize },
    #[error("empty expression")]
    Empty,
}
