// Copyright 2025-2026 Cornell University
// released under MIT license
// author: Kevin Laeufer <laeufer@cornell.edu>

use crate::ast::{Expr, Instr, Op};
use crate::error::{Error, Result};
use crate::poly::{Term, Value};
use log::debug;

type BinaryFn = fn(&Value, &Value) -> Result<Value>;

/// Indexed by the `Op` discriminant.
const OPERATORS: [BinaryFn; 4] = [apply_add, apply_sub, apply_mul, apply_pow];

fn apply_add(lhs: &Value, rhs: &Value) -> Result<Value> {
    Ok(lhs.add(rhs))
}

fn apply_sub(lhs: &Value, rhs: &Value) -> Result<Value> {
    Ok(lhs.sub(rhs))
}

fn apply_mul(lhs: &Value, rhs: &Value) -> Result<Value> {
    lhs.mul(rhs)
}

fn apply_pow(lhs: &Value, rhs: &Value) -> Result<Value> {
    lhs.pow(rhs)
}

#[inline]
fn operator(op: Op) -> BinaryFn {
    OPERATORS[op as usize]
}

/// Evaluates an expression tree into a single term or a polynomial.
pub fn evaluate(expr: &Expr) -> Result<Value> {
    evaluate_postfix(&expr.postfix())
}

/// Folds a postfix program using an operand stack.
/// Leaves push a single term, operators pop their right and then their left operand.
pub fn evaluate_postfix(program: &[Instr]) -> Result<Value> {
    let mut stack: Vec<Value> = Vec::with_capacity(16);
    for (ii, instr) in program.iter().enumerate() {
        match instr {
            Instr::Num(n) => stack.push(Value::Term(Term::constant(n.clone()))),
            Instr::Var(name) => stack.push(Value::Term(Term::var(name.as_str()))),
            Instr::Op(op) => {
                let (Some(rhs), Some(lhs)) = (stack.pop(), stack.pop()) else {
                    return Err(Error::MalformedTree(format!(
                        "operator '{op}' at step {ii} is missing an operand"
                    )));
                };
                let result = operator(*op)(&lhs, &rhs)?;
                debug!("({lhs}) {op} ({rhs}) = {result}");
                stack.push(result);
            }
        }
    }
    match (stack.pop(), stack.len()) {
        (Some(result), 0) => Ok(result),
        (None, _) => Err(Error::MalformedTree("nothing to evaluate".to_string())),
        (Some(_), rest) => Err(Error::MalformedTree(format!(
            "{} values left after evaluation",
            rest + 1
        ))),
    }
}
