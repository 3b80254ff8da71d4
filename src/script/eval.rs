// src/script/eval.rs

//! Tree-walking evaluator for compiled fragments.

use std::cmp::Ordering;

use thiserror::Error;

use super::parser::{Assign, BinaryOp, Expr, UnaryOp};
use super::value::Value;
use crate::bindings::Bindings;

/// A fault raised while executing a compiled fragment.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EvalError {
    #[error("line {line}: name '{name}' is not defined")]
    UndefinedName { name: String, line: usize },

    #[error("line {line}: division by zero")]
    DivisionByZero { line: usize },

    #[error("line {line}: unsupported operand types for {op}: '{left}' and '{right}'")]
    TypeMismatch {
        op: &'static str,
        left: &'static str,
        right: &'static str,
        line: usize,
    },

    #[error("line {line}: bad operand type for unary {op}: '{operand}'")]
    BadOperand {
        op: &'static str,
        operand: &'static str,
        line: usize,
    },

    #[error("line {line}: integer overflow")]
    Overflow { line: usize },
}

pub(crate) fn exec_statements(
    statements: &[Assign],
    bindings: &mut Bindings,
) -> Result<(), EvalError> {
    for stmt in statements {
        let value = eval(&stmt.value, bindings, stmt.line)?;
        bindings.set(stmt.target.clone(), value);
    }
    Ok(())
}

fn eval(expr: &Expr, bindings: &Bindings, line: usize) -> Result<Value, EvalError> {
    match expr {
        Expr::Literal(v) => Ok(v.clone()),
        Expr::Name(name) => bindings
            .get(name)
            .cloned()
            .ok_or_else(|| EvalError::UndefinedName {
                name: name.clone(),
                line,
            }),
        Expr::Unary(op, inner) => {
            let v = eval(inner, bindings, line)?;
            eval_unary(*op, v, line)
        }
        Expr::Binary(BinaryOp::And, lhs, rhs) => {
            let l = eval(lhs, bindings, line)?;
            if !l.is_truthy() {
                return Ok(l);
            }
            eval(rhs, bindings, line)
        }
        Expr::Binary(BinaryOp::Or, lhs, rhs) => {
            let l = eval(lhs, bindings, line)?;
            if l.is_truthy() {
                return Ok(l);
            }
            eval(rhs, bindings, line)
        }
        Expr::Binary(op, lhs, rhs) => {
            let l = eval(lhs, bindings, line)?;
            let r = eval(rhs, bindings, line)?;
            eval_binary(*op, l, r, line)
        }
    }
}

fn eval_unary(op: UnaryOp, v: Value, line: usize) -> Result<Value, EvalError> {
    match (op, v) {
        (UnaryOp::Not, v) => Ok(Value::Bool(!v.is_truthy())),
        (UnaryOp::Neg, Value::Float(f)) => Ok(Value::Float(-f)),
        (UnaryOp::Neg, v @ (Value::Int(_) | Value::Bool(_))) => v
            .as_int()
            .and_then(i64::checked_neg)
            .map(Value::Int)
            .ok_or(EvalError::Overflow { line }),
        (UnaryOp::Neg, other) => Err(EvalError::BadOperand {
            op: "-",
            operand: other.type_name(),
            line,
        }),
    }
}

fn eval_binary(op: BinaryOp, l: Value, r: Value, line: usize) -> Result<Value, EvalError> {
    match op {
        BinaryOp::Eq => return Ok(Value::Bool(values_equal(&l, &r))),
        BinaryOp::Ne => return Ok(Value::Bool(!values_equal(&l, &r))),
        BinaryOp::Lt | BinaryOp::Le | BinaryOp::Gt | BinaryOp::Ge => {
            let ord = compare(&l, &r).ok_or_else(|| mismatch(op, &l, &r, line))?;
            let result = match op {
                BinaryOp::Lt => ord == Ordering::Less,
                BinaryOp::Le => ord != Ordering::Greater,
                BinaryOp::Gt => ord == Ordering::Greater,
                _ => ord != Ordering::Less,
            };
            return Ok(Value::Bool(result));
        }
        _ => {}
    }

    if let (Value::Str(a), Value::Str(b)) = (&l, &r) {
        if op == BinaryOp::Add {
            return Ok(Value::Str(format!("{a}{b}")));
        }
        return Err(mismatch(op, &l, &r, line));
    }

    // Booleans take part in arithmetic as 0 and 1.
    let ints = match (&l, &r) {
        (Value::Float(_), _) | (_, Value::Float(_)) => None,
        _ => l.as_int().zip(r.as_int()),
    };
    if let Some((a, b)) = ints {
        return int_arith(op, a, b, line);
    }
    match (l.as_float(), r.as_float()) {
        (Some(a), Some(b)) => float_arith(op, a, b, line),
        _ => Err(mismatch(op, &l, &r, line)),
    }
}

fn int_arith(op: BinaryOp, a: i64, b: i64, line: usize) -> Result<Value, EvalError> {
    let overflow = EvalError::Overflow { line };
    match op {
        BinaryOp::Add => a.checked_add(b).map(Value::Int).ok_or(overflow),
        BinaryOp::Sub => a.checked_sub(b).map(Value::Int).ok_or(overflow),
        BinaryOp::Mul => a.checked_mul(b).map(Value::Int).ok_or(overflow),
        BinaryOp::Div => {
            if b == 0 {
                return Err(EvalError::DivisionByZero { line });
            }
            Ok(Value::Float(a as f64 / b as f64))
        }
        BinaryOp::FloorDiv => {
            if b == 0 {
                return Err(EvalError::DivisionByZero { line });
            }
            let q = a.checked_div(b).ok_or(overflow)?;
            // Round toward negative infinity when the signs differ.
            if a % b != 0 && ((a < 0) != (b < 0)) {
                Ok(Value::Int(q - 1))
            } else {
                Ok(Value::Int(q))
            }
        }
        BinaryOp::Rem => {
            if b == 0 {
                return Err(EvalError::DivisionByZero { line });
            }
            let r = a.checked_rem(b).ok_or(overflow)?;
            // Result takes the sign of the divisor.
            if r != 0 && ((r < 0) != (b < 0)) {
                Ok(Value::Int(r + b))
            } else {
                Ok(Value::Int(r))
            }
        }
        _ => unreachable!("comparison and logical operators are handled by the caller"),
    }
}

fn float_arith(op: BinaryOp, a: f64, b: f64, line: usize) -> Result<Value, EvalError> {
    let needs_divisor = matches!(op, BinaryOp::Div | BinaryOp::FloorDiv | BinaryOp::Rem);
    if needs_divisor && b == 0.0 {
        return Err(EvalError::DivisionByZero { line });
    }
    let v = match op {
        BinaryOp::Add => a + b,
        BinaryOp::Sub => a - b,
        BinaryOp::Mul => a * b,
        BinaryOp::Div => a / b,
        BinaryOp::FloorDiv => (a / b).floor(),
        BinaryOp::Rem => a - b * (a / b).floor(),
        _ => unreachable!("comparison and logical operators are handled by the caller"),
    };
    Ok(Value::Float(v))
}

fn values_equal(l: &Value, r: &Value) -> bool {
    match (l, r) {
        (Value::Str(a), Value::Str(b)) => a == b,
        (Value::Float(_), _) | (_, Value::Float(_)) => match (l.as_float(), r.as_float()) {
            (Some(a), Some(b)) => a == b,
            _ => false,
        },
        _ => match (l.as_int(), r.as_int()) {
            (Some(a), Some(b)) => a == b,
            _ => false,
        },
    }
}

fn compare(l: &Value, r: &Value) -> Option<Ordering> {
    match (l, r) {
        (Value::Str(a), Value::Str(b)) => Some(a.cmp(b)),
        (Value::Float(_), _) | (_, Value::Float(_)) => l.as_float()?.partial_cmp(&r.as_float()?),
        _ => Some(l.as_int()?.cmp(&r.as_int()?)),
    }
}

fn mismatch(op: BinaryOp, l: &Value, r: &Value, line: usize) -> EvalError {
    EvalError::TypeMismatch {
        op: op.symbol(),
        left: l.type_name(),
        right: r.type_name(),
        line,
    }
}
