// src/script/mod.rs

//! Embedded language for inline work items.
//!
//! A fragment is a list of `name = expression` statements separated by
//! newlines or `;`. Fragments are compiled once into a [`Program`] and later
//! executed against a caller-owned [`Bindings`] namespace, so assignments
//! made by one fragment are visible to the next.
//!
//! The language has no output statements or function calls; fragments can
//! only read and write bindings. As in Python, `True` and `False` behave as
//! `1` and `0` in arithmetic and comparisons.

mod eval;
mod lexer;
mod parser;
mod value;

use std::fmt;

use thiserror::Error;

use crate::bindings::Bindings;

pub use eval::EvalError;
pub use value::Value;

/// A syntax error found while compiling a fragment.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("line {line}: {message}")]
pub struct CompileError {
    pub line: usize,
    pub message: String,
}

impl CompileError {
    pub(crate) fn new(line: usize, message: impl Into<String>) -> Self {
        Self {
            line,
            message: message.into(),
        }
    }
}

/// A compiled fragment, ready to run any number of times.
#[derive(Clone, PartialEq)]
pub struct Program {
    source: String,
    statements: Vec<parser::Assign>,
}

impl Program {
    pub fn compile(source: &str) -> Result<Self, CompileError> {
        let tokens = lexer::tokenize(source)?;
        let statements = parser::Parser::new(tokens).parse_program()?;
        Ok(Self {
            source: source.to_string(),
            statements,
        })
    }

    /// Execute every statement in order, writing into `bindings`.
    ///
    /// Assignments made before a fault stay in `bindings`.
    pub fn run(&self, bindings: &mut Bindings) -> Result<(), EvalError> {
        eval::exec_statements(&self.statements, bindings)
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn statement_count(&self) -> usize {
        self.statements.len()
    }
}

impl fmt::Debug for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Program")
            .field("source", &self.source)
            .field("statements", &self.statements.len())
            .finish()
    }
}
