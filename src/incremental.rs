// Copyright (c) Jesse Weaver, 2021
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Runs a block of statements cumulatively, line by line, tolerating
//! syntactically incomplete intermediate states, and reports the most
//! recently produced value.

use std::collections::BTreeMap;
use std::io;
use thiserror::Error;

use crate::ast::Statement;
use crate::interpreter::{self, Interp};
use crate::parser::{self, parse_statements};
use crate::types::KindSet;
use crate::value::{Identifier, Value};

#[derive(Error, Debug, PartialEq)]
pub enum Error {
    #[error("{source}")]
    Parse {
        #[from]
        source: parser::Error,
    },
    #[error("{source}\nin statement:\n{statement}")]
    Runtime {
        source: interpreter::Error,
        statement: String,
    },
    #[error("multiple assignments changed ({}); cannot pick one", .names.join(", "))]
    Ambiguous { names: Vec<Identifier> },
    #[error("no tracked value was produced")]
    NoValue,
}

pub type Result<T> = std::result::Result<T, Error>;

/// What an incremental run saw last: the text of the last statement that
/// executed to completion, and the tracked bindings most recently changed.
///
/// `last_bindings` carries the last *non-empty* delta, so a trailing
/// statement that changes nothing tracked leaves the previous delta in
/// place.
#[derive(Debug, PartialEq)]
pub struct RunOutcome {
    pub last_statement: String,
    pub last_bindings: BTreeMap<Identifier, Value>,
}

fn record_run(source: &str, kinds: KindSet, interp: &mut Interp<'_>) -> Result<RunOutcome> {
    let mut buffer: Vec<&str> = vec![];
    let mut last_statement = String::new();
    let mut last_bindings = BTreeMap::new();

    for line in source.lines() {
        buffer.push(line);
        let text = buffer.join("\n");

        let statements = match parse_statements(text.chars()) {
            Ok(statements) => statements,
            // The buffer is a statement still missing its ending; later
            // lines may finish it.
            Err(e) if e.is_incomplete() => continue,
            Err(e) => return Err(e.into()),
        };

        interp.take_touched();
        for statement in &statements {
            interp.exec(statement).map_err(|source| Error::Runtime {
                source,
                statement: text.clone(),
            })?;
        }

        let bindings: BTreeMap<_, _> = interp
            .take_touched()
            .into_iter()
            .filter_map(|name| {
                interp
                    .get(&name)
                    .filter(|value| kinds.tracks(value.kind()))
                    .cloned()
                    .map(|value| (name, value))
            })
            .collect();

        if !bindings.is_empty() {
            last_bindings = bindings;
        }

        if !statements.is_empty() {
            last_statement = text;
        }

        buffer.clear();
    }

    // A buffer still incomplete when input runs out is dropped.

    Ok(RunOutcome {
        last_statement,
        last_bindings,
    })
}

/// Executes `source` line by line against a fresh namespace and reports the
/// last complete statement together with the tracked bindings it (or the
/// closest preceding statement with any) changed.
pub fn run_incremental(
    source: &str,
    kinds: KindSet,
    output: &mut impl io::Write,
) -> Result<RunOutcome> {
    let mut interp = Interp::new(output);

    record_run(source.trim(), kinds, &mut interp)
}

/// Best guess at the value the user was looking at: the trailing bare
/// expression if there is one, otherwise the single tracked binding the
/// last effective statement changed.
pub fn last_value(
    source: &str,
    kinds: KindSet,
    output: &mut impl io::Write,
) -> Result<Option<Value>> {
    let source = source.trim();

    if source.is_empty() {
        return Ok(None);
    }

    // Fail fast: the whole block has to parse before anything runs, so a
    // trailing half-written statement is an error here, not something to
    // accumulate past.
    parse_statements(source.chars())?;

    let mut interp = Interp::new(output);
    let outcome = record_run(source, kinds, &mut interp)?;

    // A trailing bare expression is explicit intent; it wins over any
    // recorded assignment delta.
    if let Ok(statements) = parse_statements(outcome.last_statement.chars()) {
        if let [Statement::Expr(expr)] = statements.as_slice() {
            let value = interp.eval_expr(expr).map_err(|source| Error::Runtime {
                source,
                statement: outcome.last_statement.clone(),
            })?;

            return Ok(Some(value));
        }
    }

    match outcome.last_bindings.len() {
        0 => Err(Error::NoValue),
        1 => Ok(outcome.last_bindings.into_iter().next().map(|(_, v)| v)),
        _ => Err(Error::Ambiguous {
            names: outcome.last_bindings.keys().cloned().collect(),
        }),
    }
}
