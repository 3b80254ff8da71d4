// src/script/parser.rs

//! Recursive-descent parser producing the statement list of a [`Program`].
//!
//! [`Program`]: super::Program

use super::CompileError;
use super::lexer::{Spanned, Token};
use super::value::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum UnaryOp {
    Neg,
    Not,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    FloorDiv,
    Rem,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    And,
    Or,
}

impl BinaryOp {
    pub(crate) fn symbol(self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::FloorDiv => "//",
            BinaryOp::Rem => "%",
            BinaryOp::Eq => "==",
            BinaryOp::Ne => "!=",
            BinaryOp::Lt => "<",
            BinaryOp::Le => "<=",
            BinaryOp::Gt => ">",
            BinaryOp::Ge => ">=",
            BinaryOp::And => "and",
            BinaryOp::Or => "or",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Expr {
    Literal(Value),
    Name(String),
    Unary(UnaryOp, Box<Expr>),
    Binary(BinaryOp, Box<Expr>, Box<Expr>),
}

/// `target = value`, remembered with its source line for error reporting.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Assign {
    pub target: String,
    pub value: Expr,
    pub line: usize,
}

/// Deepest expression the parser accepts. Each parenthesis, unary
/// operator and chained binary operator counts one level.
pub(crate) const MAX_NESTING: usize = 256;

pub(crate) struct Parser {
    tokens: Vec<Spanned>,
    pos: usize,
    depth: usize,
}

impl Parser {
    pub(crate) fn new(tokens: Vec<Spanned>) -> Self {
        Self {
            tokens,
            pos: 0,
            depth: 0,
        }
    }

    pub(crate) fn parse_program(mut self) -> Result<Vec<Assign>, CompileError> {
        let mut statements = Vec::new();
        loop {
            while self.peek() == &Token::Newline {
                self.advance();
            }
            if self.peek() == &Token::Eof {
                return Ok(statements);
            }

            statements.push(self.parse_assign()?);

            match self.peek() {
                Token::Newline | Token::Eof => {}
                other => {
                    return Err(self.error(format!(
                        "expected end of statement, found {}",
                        describe(other)
                    )));
                }
            }
        }
    }

    fn parse_assign(&mut self) -> Result<Assign, CompileError> {
        let line = self.line();
        let target = match self.advance() {
            Token::Ident(name) => name,
            other => {
                return Err(CompileError::new(
                    line,
                    format!("expected assignment target, found {}", describe(&other)),
                ));
            }
        };
        if self.advance() != Token::Assign {
            return Err(CompileError::new(
                line,
                format!("expected '=' after '{target}'"),
            ));
        }
        let value = self.parse_or()?;
        Ok(Assign {
            target,
            value,
            line,
        })
    }

    fn parse_or(&mut self) -> Result<Expr, CompileError> {
        let mut lhs = self.parse_and()?;
        let mut chained = 0;
        while self.peek() == &Token::Or {
            self.advance();
            self.descend()?;
            chained += 1;
            let rhs = self.parse_and()?;
            lhs = Expr::Binary(BinaryOp::Or, Box::new(lhs), Box::new(rhs));
        }
        self.depth -= chained;
        Ok(lhs)
    }

    fn parse_and(&mut self) -> Result<Expr, CompileError> {
        let mut lhs = self.parse_not()?;
        let mut chained = 0;
        while self.peek() == &Token::And {
            self.advance();
            self.descend()?;
            chained += 1;
            let rhs = self.parse_not()?;
            lhs = Expr::Binary(BinaryOp::And, Box::new(lhs), Box::new(rhs));
        }
        self.depth -= chained;
        Ok(lhs)
    }

    fn parse_not(&mut self) -> Result<Expr, CompileError> {
        if self.peek() == &Token::Not {
            self.advance();
            self.descend()?;
            let inner = self.parse_not()?;
            self.depth -= 1;
            return Ok(Expr::Unary(UnaryOp::Not, Box::new(inner)));
        }
        self.parse_comparison()
    }

    fn parse_comparison(&mut self) -> Result<Expr, CompileError> {
        let lhs = self.parse_additive()?;
        let op = match self.peek() {
            Token::EqEq => BinaryOp::Eq,
            Token::NotEq => BinaryOp::Ne,
            Token::Lt => BinaryOp::Lt,
            Token::Le => BinaryOp::Le,
            Token::Gt => BinaryOp::Gt,
            Token::Ge => BinaryOp::Ge,
            _ => return Ok(lhs),
        };
        self.advance();
        let rhs = self.parse_additive()?;
        Ok(Expr::Binary(op, Box::new(lhs), Box::new(rhs)))
    }

    fn parse_additive(&mut self) -> Result<Expr, CompileError> {
        let mut lhs = self.parse_multiplicative()?;
        let mut chained = 0;
        loop {
            let op = match self.peek() {
                Token::Plus => BinaryOp::Add,
                Token::Minus => BinaryOp::Sub,
                _ => break,
            };
            self.advance();
            self.descend()?;
            chained += 1;
            let rhs = self.parse_multiplicative()?;
            lhs = Expr::Binary(op, Box::new(lhs), Box::new(rhs));
        }
        self.depth -= chained;
        Ok(lhs)
    }

    fn parse_multiplicative(&mut self) -> Result<Expr, CompileError> {
        let mut lhs = self.parse_unary()?;
        let mut chained = 0;
        loop {
            let op = match self.peek() {
                Token::Star => BinaryOp::Mul,
                Token::Slash => BinaryOp::Div,
                Token::SlashSlash => BinaryOp::FloorDiv,
                Token::Percent => BinaryOp::Rem,
                _ => break,
            };
            self.advance();
            self.descend()?;
            chained += 1;
            let rhs = self.parse_unary()?;
            lhs = Expr::Binary(op, Box::new(lhs), Box::new(rhs));
        }
        self.depth -= chained;
        Ok(lhs)
    }

    fn parse_unary(&mut self) -> Result<Expr, CompileError> {
        if self.peek() == &Token::Minus {
            self.advance();
            self.descend()?;
            let inner = self.parse_unary()?;
            self.depth -= 1;
            return Ok(Expr::Unary(UnaryOp::Neg, Box::new(inner)));
        }
        self.parse_primary()
    }

    fn parse_primary(&mut self) -> Result<Expr, CompileError> {
        let line = self.line();
        match self.advance() {
            Token::Int(i) => Ok(Expr::Literal(Value::Int(i))),
            Token::Float(f) => Ok(Expr::Literal(Value::Float(f))),
            Token::Str(s) => Ok(Expr::Literal(Value::Str(s))),
            Token::True => Ok(Expr::Literal(Value::Bool(true))),
            Token::False => Ok(Expr::Literal(Value::Bool(false))),
            Token::Ident(name) => {
                if self.peek() == &Token::LParen {
                    return Err(CompileError::new(
                        line,
                        format!("function calls are not supported ('{name}(...)')"),
                    ));
                }
                Ok(Expr::Name(name))
            }
            Token::LParen => {
                self.descend()?;
                let inner = self.parse_or()?;
                self.depth -= 1;
                if self.advance() != Token::RParen {
                    return Err(CompileError::new(line, "expected ')'"));
                }
                Ok(inner)
            }
            other => Err(CompileError::new(
                line,
                format!("expected an expression, found {}", describe(&other)),
            )),
        }
    }

    fn peek(&self) -> &Token {
        self.tokens
            .get(self.pos)
            .map(|s| &s.token)
            .unwrap_or(&Token::Eof)
    }

    fn line(&self) -> usize {
        self.tokens
            .get(self.pos)
            .or_else(|| self.tokens.last())
            .map(|s| s.line)
            .unwrap_or(1)
    }

    fn advance(&mut self) -> Token {
        match self.tokens.get(self.pos) {
            Some(spanned) => {
                self.pos += 1;
                spanned.token.clone()
            }
            None => Token::Eof,
        }
    }

    /// Enter one level of nesting. Callers step back out by decrementing
    /// `depth` once the nested expression is parsed.
    fn descend(&mut self) -> Result<(), CompileError> {
        self.depth += 1;
        if self.depth > MAX_NESTING {
            return Err(self.error("expression nested too deeply".to_string()));
        }
        Ok(())
    }

    fn error(&self, message: String) -> CompileError {
        CompileError::new(self.line(), message)
    }
}

fn describe(token: &Token) -> String {
    match token {
        Token::Newline => "end of line".to_string(),
        Token::Eof => "end of input".to_string(),
        Token::Ident(name) => format!("name '{name}'"),
        other => format!("{other:?}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::script::lexer::tokenize;

    fn parse(src: &str) -> Result<Vec<Assign>, CompileError> {
        Parser::new(tokenize(src)?).parse_program()
    }

    #[test]
    fn multiplication_binds_tighter_than_addition() {
        let stmts = parse("x = 1 + 2 * 3").unwrap();
        assert_eq!(stmts.len(), 1);
        match &stmts[0].value {
            Expr::Binary(BinaryOp::Add, _, rhs) => {
                assert!(matches!(**rhs, Expr::Binary(BinaryOp::Mul, _, _)));
            }
            other => panic!("unexpected tree: {other:?}"),
        }
    }

    #[test]
    fn blank_lines_are_skipped() {
        let stmts = parse("\n\na = 1\n\n\nb = a\n").unwrap();
        assert_eq!(stmts.len(), 2);
        assert_eq!(stmts[1].line, 6);
    }

    #[test]
    fn bare_expression_is_rejected() {
        let err = parse("1 + 2").unwrap_err();
        assert!(err.message.contains("assignment target"));
    }

    #[test]
    fn calls_are_rejected() {
        let err = parse("x = print(1)").unwrap_err();
        assert!(err.message.contains("function calls"));
    }

    #[test]
    fn deep_parentheses_are_a_compile_error() {
        let src = format!("x = {}1{}", "(".repeat(5_000), ")".repeat(5_000));
        let err = parse(&src).unwrap_err();
        assert_eq!(err.line, 1);
        assert!(err.message.contains("nested too deeply"));
    }

    #[test]
    fn long_operator_chains_are_bounded() {
        let src = format!("x = 1{}", " + 1".repeat(MAX_NESTING + 1));
        assert!(parse(&src).unwrap_err().message.contains("nested too deeply"));

        let negations = format!("x = {}1", "-".repeat(10_000));
        assert!(parse(&negations).is_err());
    }

    #[test]
    fn nesting_below_the_limit_is_accepted() {
        let depth = MAX_NESTING - 1;
        let src = format!("x = {}1{}\ny = 1{}", "(".repeat(depth), ")".repeat(depth), " * 2".repeat(depth));
        let stmts = parse(&src).unwrap();
        assert_eq!(stmts.len(), 2);
    }

    #[test]
    fn dangling_operator_is_rejected() {
        assert!(parse("x = 1 +").is_err());
        assert!(parse("x = (1 + 2").is_err());
    }
}
