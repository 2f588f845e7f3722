// Copyright (c) Jesse Weaver, 2021
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use crate::types::{self, Kind};

pub type Identifier = String;

pub fn identifier(i: impl Into<String>) -> Identifier {
    i.into()
}

#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Nil,
    Boolean(bool),
    Integer(i64),
    Float(f64),
    Str(String),
    List(Vec<Value>),
}

impl Value {
    pub fn kind(&self) -> Kind {
        match self {
            Value::Nil => Kind::Nil,
            Value::Boolean(..) => Kind::Boolean,
            Value::Integer(..) => Kind::Integer,
            Value::Float(..) => Kind::Float,
            Value::Str(..) => Kind::Text,
            Value::List(..) => Kind::List,
        }
    }

    pub fn is_nil(&self) -> bool {
        matches!(self, Value::Nil)
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Numeric view of the value; integers widen to `f64`.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Integer(i) => Some(*i as f64),
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn try_as_i64(&self) -> types::Result<i64> {
        self.as_i64().ok_or(types::Error::ExpectedKind {
            expected: Kind::Integer,
            actual: self.kind(),
        })
    }

    pub fn try_as_str(&self) -> types::Result<&str> {
        match self {
            Value::Str(s) => Ok(s),
            _ => Err(types::Error::ExpectedKind {
                expected: Kind::Text,
                actual: self.kind(),
            }),
        }
    }

    pub fn try_as_list(&self) -> types::Result<&[Value]> {
        match self {
            Value::List(items) => Ok(items),
            _ => Err(types::Error::ExpectedKind {
                expected: Kind::List,
                actual: self.kind(),
            }),
        }
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> Result<(), std::fmt::Error> {
        match self {
            Value::Nil => write!(f, "nil"),
            Value::Boolean(b) => write!(f, "{}", b),
            Value::Integer(i) => write!(f, "{}", i),
            Value::Float(x) => write!(f, "{:?}", x),
            Value::Str(s) => write!(f, "{:?}", s),
            Value::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }
        }
    }
}

impl std::convert::From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl std::convert::From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Integer(i)
    }
}

impl std::convert::From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Float(x)
    }
}

impl std::convert::From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

impl std::convert::From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::List(items)
    }
}
