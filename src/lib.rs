mod ast;
mod coef;
mod error;
mod eval;
mod parser;
mod poly;
mod proptests;
mod subterm;

pub use ast::{Expr, Instr, Op};
pub use coef::{MAX_POW_BITS, Number};
pub use error::{Error, ParseError, Result};
pub use eval::{evaluate, evaluate_postfix};
pub use parser::parse;
pub use poly::{MAX_EXPANSION_POWER, Polynomial, Term, Value};
pub use subterm::{MAX_EXPONENT, SubTerm};

/// Parses and evaluates `text`.
pub fn calculate(text: &str) -> Result<Value> {
    log::info!("evaluating {text:?}");
    let expr = parse(text)?;
    log::debug!("parsed {expr}");
    evaluate(&expr)
}

/// Canonical display string, e.g. `x^4+4x^2*y^8+4y^16`.
pub fn format(value: &Value) -> String {
    value.to_string()
}
