// Copyright (c) Jesse Weaver, 2021
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};
use std::io;
use thiserror::Error;

use crate::ast::{AssignTarget, BinaryOp, Expr, Statement, UnaryOp};
use crate::builtins;
use crate::types::{self, Kind};
use crate::value::{Identifier, Value};

#[derive(Error, Debug, PartialEq)]
pub enum Error {
    #[error("unknown variable: {0}")]
    UnknownVariable(Identifier),
    #[error("unknown function: {0}")]
    UnknownFunction(Identifier),
    #[error("{source}")]
    Argument {
        #[from]
        source: types::Error,
    },
    #[error("cannot apply {op} to {left} and {right}")]
    InvalidOperands {
        op: BinaryOp,
        left: Kind,
        right: Kind,
    },
    #[error("cannot negate {0}")]
    InvalidNegation(Kind),
    #[error("division by zero")]
    DivisionByZero,
    #[error("cannot unpack {0} into names")]
    UnpackKind(Kind),
    #[error("cannot unpack {actual} value(s) into {expected} name(s)")]
    UnpackLength { expected: usize, actual: usize },
}

pub type Result<T> = std::result::Result<T, Error>;

/// Executes statements against a persistent namespace, recording which
/// names each execution touches.
pub struct Interp<'a> {
    env: BTreeMap<Identifier, Value>,
    touched: BTreeSet<Identifier>,
    pub(crate) output: &'a mut dyn io::Write,
}

impl<'a> Interp<'a> {
    pub fn new(output: &'a mut impl io::Write) -> Self {
        Self {
            env: BTreeMap::new(),
            touched: BTreeSet::new(),
            output,
        }
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.env.get(name)
    }

    /// Names assigned since the last call; taking them clears the record.
    pub fn take_touched(&mut self) -> BTreeSet<Identifier> {
        std::mem::take(&mut self.touched)
    }

    /// Runs one statement. Expression statements yield their value;
    /// assignments yield `None` and update the namespace.
    pub fn exec(&mut self, statement: &Statement) -> Result<Option<Value>> {
        match statement {
            Statement::Assign { target, expr } => {
                let value = self.eval_expr(expr)?;
                self.assign(target, value)?;

                Ok(None)
            }
            Statement::Expr(expr) => self.eval_expr(expr).map(Some),
        }
    }

    fn assign(&mut self, target: &AssignTarget, value: Value) -> Result<()> {
        match target {
            AssignTarget::Name(name) => {
                self.set(name.clone(), value);

                Ok(())
            }
            AssignTarget::Unpack(names) => {
                let items = match value {
                    Value::List(items) => items,
                    other => return Err(Error::UnpackKind(other.kind())),
                };

                if items.len() != names.len() {
                    return Err(Error::UnpackLength {
                        expected: names.len(),
                        actual: items.len(),
                    });
                }

                for (name, item) in names.iter().zip(items) {
                    self.set(name.clone(), item);
                }

                Ok(())
            }
        }
    }

    fn set(&mut self, name: Identifier, value: Value) {
        self.touched.insert(name.clone());
        self.env.insert(name, value);
    }

    pub fn eval_expr(&mut self, expr: &Expr) -> Result<Value> {
        match expr {
            Expr::Literal(value) => Ok(value.clone()),
            Expr::Variable(name) => self
                .env
                .get(name)
                .cloned()
                .ok_or_else(|| Error::UnknownVariable(name.clone())),
            Expr::Unary { op, expr } => {
                let value = self.eval_expr(expr)?;

                Self::eval_unary(*op, value)
            }
            Expr::Binary { op, left, right } => {
                let left = self.eval_expr(left)?;
                let right = self.eval_expr(right)?;

                Self::eval_binary(*op, left, right)
            }
            Expr::Call { name, args } => {
                let args = args
                    .iter()
                    .map(|arg| self.eval_expr(arg))
                    .collect::<Result<Vec<_>>>()?;

                self.call(name, args)
            }
            Expr::List(items) => Ok(Value::List(
                items
                    .iter()
                    .map(|item| self.eval_expr(item))
                    .collect::<Result<Vec<_>>>()?,
            )),
        }
    }

    fn call(&mut self, name: &str, args: Vec<Value>) -> Result<Value> {
        let builtin =
            builtins::get(name).ok_or_else(|| Error::UnknownFunction(name.to_string()))?;

        if let Some(signature) = builtins::signature(name) {
            signature.check_arguments(args.iter().map(|arg| arg.kind()))?;
        }

        (builtin.run)(self, &args)
    }

    fn eval_unary(op: UnaryOp, value: Value) -> Result<Value> {
        match (op, value) {
            (UnaryOp::Neg, Value::Integer(i)) => Ok(Value::Integer(i.wrapping_neg())),
            (UnaryOp::Neg, Value::Float(x)) => Ok(Value::Float(-x)),
            (UnaryOp::Neg, value) => Err(Error::InvalidNegation(value.kind())),
        }
    }

    fn eval_binary(op: BinaryOp, left: Value, right: Value) -> Result<Value> {
        use BinaryOp::*;

        let invalid = |left: &Value, right: &Value| Error::InvalidOperands {
            op,
            left: left.kind(),
            right: right.kind(),
        };

        match op {
            Add | Sub | Mul | Div | Rem => match (&left, &right) {
                (Value::Integer(l), Value::Integer(r)) => Self::integer_arithmetic(op, *l, *r),
                (Value::Str(l), Value::Str(r)) if op == Add => {
                    Ok(Value::Str(format!("{}{}", l, r)))
                }
                (Value::List(l), Value::List(r)) if op == Add => Ok(Value::List(
                    l.iter().cloned().chain(r.iter().cloned()).collect(),
                )),
                _ => match (left.as_f64(), right.as_f64()) {
                    (Some(l), Some(r)) => Ok(Self::float_arithmetic(op, l, r)),
                    _ => Err(invalid(&left, &right)),
                },
            },
            Eq => Ok(Value::Boolean(left == right)),
            NotEq => Ok(Value::Boolean(left != right)),
            Lt | LtEq | Gt | GtEq => {
                let ordering = match (&left, &right) {
                    (Value::Str(l), Value::Str(r)) => l.partial_cmp(r),
                    _ => match (left.as_f64(), right.as_f64()) {
                        (Some(l), Some(r)) => l.partial_cmp(&r),
                        _ => None,
                    },
                };

                let ordering = ordering.ok_or_else(|| invalid(&left, &right))?;

                Ok(Value::Boolean(match op {
                    Lt => ordering == Ordering::Less,
                    LtEq => ordering != Ordering::Greater,
                    Gt => ordering == Ordering::Greater,
                    GtEq => ordering != Ordering::Less,
                    _ => unreachable!(),
                }))
            }
        }
    }

    fn integer_arithmetic(op: BinaryOp, l: i64, r: i64) -> Result<Value> {
        use BinaryOp::*;

        if (op == Div || op == Rem) && r == 0 {
            return Err(Error::DivisionByZero);
        }

        Ok(Value::Integer(match op {
            Add => l.wrapping_add(r),
            Sub => l.wrapping_sub(r),
            Mul => l.wrapping_mul(r),
            Div => l.wrapping_div(r),
            Rem => l.wrapping_rem(r),
            _ => unreachable!(),
        }))
    }

    fn float_arithmetic(op: BinaryOp, l: f64, r: f64) -> Value {
        use BinaryOp::*;

        Value::Float(match op {
            Add => l + r,
            Sub => l - r,
            Mul => l * r,
            Div => l / r,
            Rem => l % r,
            _ => unreachable!(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_statements;

    use k9::{assert_err_matches_regex, snapshot};

    fn exec_into_value(code: &str) -> Result<String> {
        let statements = parse_statements(code.chars()).expect("parsing failed");

        let mut output = Vec::new();
        let mut interp = Interp::new(&mut output);

        let mut last = None;
        for statement in &statements {
            last = interp.exec(statement)?;
        }

        Ok(last.map_or_else(|| "-".to_string(), |v| format!("{}", v)))
    }

    fn exec_into_output(code: &str) -> Result<String> {
        let statements = parse_statements(code.chars()).expect("parsing failed");

        let mut output = Vec::new();
        {
            let mut interp = Interp::new(&mut output);
            for statement in &statements {
                interp.exec(statement)?;
            }
        }

        Ok(String::from_utf8(output).expect("output not utf-8"))
    }

    #[test]
    fn assignment_and_reference() -> Result<()> {
        snapshot!(exec_into_value("a = 1\na")?, "1");
        snapshot!(exec_into_value("beast = \"cow\"\nx = 22\nbeast")?, r#""cow""#);

        Ok(())
    }

    #[test]
    fn reassignment_takes_effect() -> Result<()> {
        snapshot!(exec_into_value("a = 1\na = a + 10\na")?, "11");

        Ok(())
    }

    #[test]
    fn unknown_variable_fails() {
        assert_err_matches_regex!(exec_into_value("a = b"), "UnknownVariable.*\"b\"");
    }

    #[test]
    fn unpack_assignment() -> Result<()> {
        snapshot!(exec_into_value("(b, c) = (2, 3)\nb + c")?, "5");
        snapshot!(exec_into_value("(x,) = [9]\nx")?, "9");

        Ok(())
    }

    #[test]
    fn unpack_mismatches_fail() {
        assert_err_matches_regex!(
            exec_into_value("(a, b) = (1, 2, 3)"),
            "UnpackLength.*expected: 2.*actual: 3"
        );
        assert_err_matches_regex!(exec_into_value("(a, b) = 7"), "UnpackKind.*Integer");
    }

    #[test]
    fn integer_arithmetic() -> Result<()> {
        snapshot!(exec_into_value("1 + 2 * 3")?, "7");
        snapshot!(exec_into_value("(1 + 2) * 3")?, "9");
        snapshot!(exec_into_value("7 / 2")?, "3");
        snapshot!(exec_into_value("7 % 2")?, "1");
        snapshot!(exec_into_value("-3 - -4")?, "1");

        Ok(())
    }

    #[test]
    fn float_arithmetic_widens() -> Result<()> {
        snapshot!(exec_into_value("1.5 + 1")?, "2.5");
        snapshot!(exec_into_value("7.0 / 2")?, "3.5");
        snapshot!(exec_into_value("-4.0")?, "-4.0");

        Ok(())
    }

    #[test]
    fn division_by_zero_fails() {
        assert_err_matches_regex!(exec_into_value("1 / 0"), "DivisionByZero");
        assert_err_matches_regex!(exec_into_value("1 % 0"), "DivisionByZero");
    }

    #[test]
    fn string_concatenation() -> Result<()> {
        snapshot!(exec_into_value(r#""ab" + "cd""#)?, r#""abcd""#);

        Ok(())
    }

    #[test]
    fn list_concatenation() -> Result<()> {
        snapshot!(exec_into_value("[1] + [2, 3]")?, "[1, 2, 3]");

        Ok(())
    }

    #[test]
    fn invalid_operands_fail() {
        assert_err_matches_regex!(
            exec_into_value(r#"1 + "a""#),
            "InvalidOperands.*Add.*Integer.*Text"
        );
        assert_err_matches_regex!(
            exec_into_value(r#""a" - "b""#),
            "InvalidOperands.*Sub"
        );
        assert_err_matches_regex!(exec_into_value("-\"a\""), "InvalidNegation.*Text");
    }

    #[test]
    fn comparisons() -> Result<()> {
        snapshot!(exec_into_value("1 < 2")?, "true");
        snapshot!(exec_into_value("2 <= 1")?, "false");
        snapshot!(exec_into_value("2.5 > 2")?, "true");
        snapshot!(exec_into_value(r#""abc" < "abd""#)?, "true");

        Ok(())
    }

    #[test]
    fn equality_is_strict_about_kinds() -> Result<()> {
        snapshot!(exec_into_value("1 == 1")?, "true");
        snapshot!(exec_into_value("1 == 1.0")?, "false");
        snapshot!(exec_into_value("1 != nil")?, "true");
        snapshot!(exec_into_value("(1, 2) == [1, 2]")?, "true");

        Ok(())
    }

    #[test]
    fn incomparable_kinds_fail() {
        assert_err_matches_regex!(exec_into_value("1 < \"a\""), "InvalidOperands.*Lt");
        assert_err_matches_regex!(exec_into_value("nil < nil"), "InvalidOperands.*Lt");
    }

    #[test]
    fn call_builtin() -> Result<()> {
        snapshot!(exec_into_value("len(\"abc\")")?, "3");

        Ok(())
    }

    #[test]
    fn unknown_function_fails() {
        assert_err_matches_regex!(exec_into_value("mystery(1)"), "UnknownFunction.*mystery");
    }

    #[test]
    fn print_writes_to_output() -> Result<()> {
        snapshot!(
            exec_into_output("print(\"hi\", 1 + 2)")?,
            r#"
"hi" 3

"#
        );

        Ok(())
    }

    #[test]
    fn touched_names_are_recorded_and_taken() -> Result<()> {
        let mut output = Vec::new();
        let mut interp = Interp::new(&mut output);

        let statements = parse_statements("a = 1\n(b, c) = (2, 3)".chars()).expect("parse");
        for statement in &statements {
            interp.exec(statement)?;
        }

        let touched: Vec<_> = interp.take_touched().into_iter().collect();
        assert_eq!(touched, vec!["a".to_string(), "b".to_string(), "c".to_string()]);

        // the record is cleared by taking it
        assert!(interp.take_touched().is_empty());

        // re-assigning the same value still counts as touched
        let statements = parse_statements("a = 1".chars()).expect("parse");
        for statement in &statements {
            interp.exec(statement)?;
        }
        let touched: Vec<_> = interp.take_touched().into_iter().collect();
        assert_eq!(touched, vec!["a".to_string()]);

        Ok(())
    }

    #[test]
    fn expression_statements_yield_values() -> Result<()> {
        let mut output = Vec::new();
        let mut interp = Interp::new(&mut output);

        let statements = parse_statements("a = 1\na + 1".chars()).expect("parse");

        assert_eq!(interp.exec(&statements[0])?, None);
        assert_eq!(interp.exec(&statements[1])?, Some(Value::Integer(2)));

        Ok(())
    }
}
