// Copyright 2025-2026 Cornell University
// released under MIT license
// author: Kevin Laeufer <laeufer@cornell.edu>

use crate::ast::{Expr, Op};
use crate::coef::Number;
use crate::error::{ParseError, Result};
use num_bigint::BigInt;
use num_traits::Num;
use regex::Regex;
use std::fmt::{Display, Formatter};
use std::sync::LazyLock;

static NUMBER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:\d+\.?\d*|\.\d+)").unwrap());
static IDENT_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*").unwrap());

/// Parentheses, signs and exponents recurse, everything else is a loop.
const MAX_NESTING: usize = 256;

/// Parses an expression like `(x^2+2*y^8) * (x^2+2*y^8)` or `10x*y*z`.
/// Juxtaposition of a factor with a variable or a parenthesis is a multiplication, which
/// makes every formatted polynomial valid input.
pub fn parse(text: &str) -> Result<Expr> {
    let tokens = tokenize(text)?;
    if tokens.is_empty() {
        return Err(ParseError::Empty.into());
    }
    let mut parser = Parser::new(tokens);
    let expr = parser.expr()?;
    if let Some((pos, token)) = parser.peek() {
        return Err(ParseError::UnexpectedToken {
            pos: *pos,
            expected: "an operator or the end of input",
            found: token.to_string(),
        }
        .into());
    }
    Ok(expr)
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Num(Number),
    Ident(String),
    Op(Op),
    Slash,
    LParen,
    RParen,
}

impl Display for Token {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Token::Num(n) => write!(f, "number {n}"),
            Token::Ident(name) => write!(f, "variable {name}"),
            Token::Op(op) => write!(f, "'{op}'"),
            Token::Slash => write!(f, "'/'"),
            Token::LParen => write!(f, "'('"),
            Token::RParen => write!(f, "')'"),
        }
    }
}

fn tokenize(text: &str) -> std::result::Result<Vec<(usize, Token)>, ParseError> {
    let mut tokens = Vec::new();
    let mut pos = 0;
    while pos < text.len() {
        let rest = &text[pos..];
        let Some(c) = rest.chars().next() else {
            break;
        };
        if c.is_whitespace() {
            pos += c.len_utf8();
            continue;
        }
        if let Some(m) = NUMBER_RE.find(rest) {
            tokens.push((pos, Token::Num(parse_number(pos, m.as_str())?)));
            pos += m.end();
            continue;
        }
        if let Some(m) = IDENT_RE.find(rest) {
            tokens.push((pos, Token::Ident(m.as_str().to_string())));
            pos += m.end();
            continue;
        }
        let token = match c {
            '/' => Token::Slash,
            '(' => Token::LParen,
            ')' => Token::RParen,
            other => match Op::from_symbol(other) {
                Some(op) => Token::Op(op),
                None => return Err(ParseError::InvalidCharacter { pos, found: other }),
            },
        };
        tokens.push((pos, token));
        pos += c.len_utf8();
    }
    Ok(tokens)
}

/// Literals without a fraction are integers. There is no exponent notation: `2e1` is
/// the coefficient `2` times the variable `e1`.
fn parse_number(pos: usize, literal: &str) -> std::result::Result<Number, ParseError> {
    let invalid = || ParseError::InvalidNumber {
        pos,
        literal: literal.to_string(),
    };
    if literal.contains('.') {
        let value: f64 = literal.parse().map_err(|_| invalid())?;
        if value.is_finite() {
            Ok(Number::Float(value))
        } else {
            Err(invalid())
        }
    } else {
        BigInt::from_str_radix(literal, 10)
            .map(Number::Int)
            .map_err(|_| invalid())
    }
}

struct Parser {
    tokens: Vec<(usize, Token)>,
    next: usize,
    depth: usize,
}

impl Parser {
    fn new(tokens: Vec<(usize, Token)>) -> Self {
        Self {
            tokens,
            next: 0,
            depth: 0,
        }
    }

    fn peek(&self) -> Option<&(usize, Token)> {
        self.tokens.get(self.next)
    }

    fn peek_token(&self) -> Option<&Token> {
        self.peek().map(|(_, t)| t)
    }

    fn advance(&mut self) -> Option<(usize, Token)> {
        let t = self.tokens.get(self.next).cloned();
        self.next += 1;
        t
    }

    fn enter(&mut self) -> Result<()> {
        self.depth += 1;
        if self.depth > MAX_NESTING {
            let pos = self.peek().map(|(p, _)| *p).unwrap_or(0);
            return Err(ParseError::TooDeep {
                pos,
                limit: MAX_NESTING,
            }
            .into());
        }
        Ok(())
    }

    fn leave(&mut self) {
        self.depth -= 1;
    }

    /// `expr := product (('+' | '-') product)*`
    fn expr(&mut self) -> Result<Expr> {
        let mut lhs = self.product()?;
        while let Some(Token::Op(op @ (Op::Add | Op::Sub))) = self.peek_token() {
            let op = *op;
            self.advance();
            let rhs = self.product()?;
            lhs = Expr::binop(op, lhs, rhs);
        }
        Ok(lhs)
    }

    /// `product := unary ('*' unary | implicit)*`
    fn product(&mut self) -> Result<Expr> {
        let mut lhs = self.unary()?;
        loop {
            let rhs = match self.peek() {
                Some((_, Token::Op(Op::Mul))) => {
                    self.advance();
                    self.unary()?
                }
                // `10x` or `2(x+1)`
                Some((_, Token::Ident(_) | Token::LParen)) => self.power()?,
                Some((pos, Token::Slash)) => {
                    return Err(ParseError::Division { pos: *pos }.into());
                }
                _ => break,
            };
            lhs = Expr::binop(Op::Mul, lhs, rhs);
        }
        Ok(lhs)
    }

    /// `unary := ('-' | '+') unary | power`
    /// A minus directly in front of a literal becomes part of the literal, anything else
    /// is multiplied by `-1`. Thus `-2^2` is `-4`.
    fn unary(&mut self) -> Result<Expr> {
        match self.peek_token() {
            Some(Token::Op(Op::Sub)) => {
                self.advance();
                self.enter()?;
                let operand = self.unary()?;
                self.leave();
                if let Expr::Num(n) = &operand {
                    return Ok(Expr::Num(-n));
                }
                Ok(Expr::binop(Op::Mul, Expr::Num(Number::from(-1)), operand))
            }
            Some(Token::Op(Op::Add)) => {
                self.advance();
                self.enter()?;
                let operand = self.unary()?;
                self.leave();
                Ok(operand)
            }
            _ => self.power(),
        }
    }

    /// `power := atom ('^' unary)?`, right associative
    fn power(&mut self) -> Result<Expr> {
        let base = self.atom()?;
        if let Some(Token::Op(Op::Pow)) = self.peek_token() {
            self.advance();
            self.enter()?;
            let exponent = self.unary()?;
            self.leave();
            Ok(Expr::binop(Op::Pow, base, exponent))
        } else {
            Ok(base)
        }
    }

    /// `atom := number | identifier | '(' expr ')'`
    fn atom(&mut self) -> Result<Expr> {
        const EXPECTED: &str = "a number, a variable or '('";
        match self.advance() {
            Some((_, Token::Num(n))) => Expr::num(n),
            Some((_, Token::Ident(name))) => Expr::var(name),
            Some((_, Token::LParen)) => {
                self.enter()?;
                let inner = self.expr()?;
                self.leave();
                match self.advance() {
                    Some((_, Token::RParen)) => Ok(inner),
                    Some((pos, Token::Slash)) => Err(ParseError::Division { pos }.into()),
                    Some((pos, token)) => Err(ParseError::UnexpectedToken {
                        pos,
                        expected: "')'",
                        found: token.to_string(),
                    }
                    .into()),
                    None => Err(ParseError::UnexpectedEnd { expected: "')'" }.into()),
                }
            }
            Some((pos, Token::Slash)) => Err(ParseError::Division { pos }.into()),
            Some((pos, token)) => Err(ParseError::UnexpectedToken {
                pos,
                expected: EXPECTED,
                found: token.to_string(),
            }
            .into()),
            None => Err(ParseError::UnexpectedEnd { expected: EXPECTED }.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    fn num(v: i64) -> Expr {
        Expr::Num(Number::from(v))
    }

    fn var(name: &str) -> Expr {
        Expr::Var(name.to_string())
    }

    #[test]
    fn test_tokenize() {
        let tokens: Vec<_> = tokenize("10x*y^2 - .5")
            .unwrap()
            .into_iter()
            .map(|(_, t)| t)
            .collect();
        assert_eq!(
            tokens,
            [
                Token::Num(Number::from(10)),
                Token::Ident("x".to_string()),
                Token::Op(Op::Mul),
                Token::Ident("y".to_string()),
                Token::Op(Op::Pow),
                Token::Num(Number::from(2)),
                Token::Op(Op::Sub),
                Token::Num(Number::from(0.5)),
            ]
        );
        assert!(matches!(tokenize("1.5").unwrap()[0].1, Token::Num(Number::Float(_))));
        assert_eq!(
            tokenize("2e1").unwrap(),
            vec![(0, Token::Num(Number::from(2))), (1, Token::Ident("e1".to_string()))]
        );
        assert_eq!(tokenize("1.5E3").unwrap().len(), 2);
        assert_eq!(tokenize("2e").unwrap().len(), 2);
        assert_eq!(
            tokenize("1 $ 2"),
            Err(ParseError::InvalidCharacter { pos: 2, found: '$' })
        );
    }

    #[test]
    fn test_precedence() {
        // 1 + 2 * x ^ 3
        assert_eq!(
            parse("1+2*x^3").unwrap(),
            Expr::binop(
                Op::Add,
                num(1),
                Expr::binop(Op::Mul, num(2), Expr::binop(Op::Pow, var("x"), num(3)))
            )
        );
        // left associative
        assert_eq!(
            parse("1-2-3").unwrap(),
            Expr::binop(Op::Sub, Expr::binop(Op::Sub, num(1), num(2)), num(3))
        );
        // right associative
        assert_eq!(
            parse("x^2^3").unwrap(),
            Expr::binop(Op::Pow, var("x"), Expr::binop(Op::Pow, num(2), num(3)))
        );
    }

    #[test]
    fn test_unary_minus() {
        assert_eq!(parse("-22").unwrap(), num(-22));
        assert_eq!(parse("2 * -3").unwrap(), Expr::binop(Op::Mul, num(2), num(-3)));
        assert_eq!(parse("--2").unwrap(), num(2));
        assert_eq!(parse("+2").unwrap(), num(2));
        assert_eq!(
            parse("-x").unwrap(),
            Expr::binop(Op::Mul, num(-1), var("x"))
        );
        assert_eq!(
            parse("-2^2").unwrap(),
            Expr::binop(Op::Mul, num(-1), Expr::binop(Op::Pow, num(2), num(2)))
        );
    }

    #[test]
    fn test_implicit_mul() {
        assert_eq!(parse("10x").unwrap(), Expr::binop(Op::Mul, num(10), var("x")));
        assert_eq!(
            parse("4x^2*y").unwrap(),
            Expr::binop(
                Op::Mul,
                Expr::binop(Op::Mul, num(4), Expr::binop(Op::Pow, var("x"), num(2))),
                var("y")
            )
        );
        assert_eq!(
            parse("2(x+1)").unwrap(),
            Expr::binop(Op::Mul, num(2), Expr::binop(Op::Add, var("x"), num(1)))
        );
    }

    #[test]
    fn test_errors() {
        assert_eq!(parse(""), Err(Error::Parse(ParseError::Empty)));
        assert_eq!(parse("   "), Err(Error::Parse(ParseError::Empty)));
        assert_eq!(parse("x/2"), Err(Error::Parse(ParseError::Division { pos: 1 })));
        assert_eq!(parse("(x/2)"), Err(Error::Parse(ParseError::Division { pos: 2 })));
        assert!(matches!(
            parse("(1+2"),
            Err(Error::Parse(ParseError::UnexpectedEnd { .. }))
        ));
        assert!(matches!(
            parse("1+"),
            Err(Error::Parse(ParseError::UnexpectedEnd { .. }))
        ));
        assert!(matches!(
            parse("1 2"),
            Err(Error::Parse(ParseError::UnexpectedToken { pos: 2, .. }))
        ));
        assert!(matches!(
            parse("*3"),
            Err(Error::Parse(ParseError::UnexpectedToken { pos: 0, .. }))
        ));
    }

    #[test]
    fn test_nesting_limit() {
        let ok = format!("{}x{}", "(".repeat(100), ")".repeat(100));
        assert_eq!(parse(&ok).unwrap(), var("x"));
        let too_deep = format!("{}x{}", "(".repeat(1000), ")".repeat(1000));
        assert!(matches!(
            parse(&too_deep),
            Err(Error::Parse(ParseError::TooDeep { .. }))
        ));
    }
}
