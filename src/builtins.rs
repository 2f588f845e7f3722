// Copyright (c) Jesse Weaver, 2021
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use lazy_static::lazy_static;
use phf::phf_map;
use std::collections::HashMap;
use std::io::Write;

use crate::interpreter::{Interp, Result};
use crate::types::{KindSpec, Signature};
use crate::value::Value;

pub(crate) struct Builtin {
    pub run: &'static (dyn Fn(&mut Interp<'_>, &[Value]) -> Result<Value> + Sync),
}

static BUILTINS: phf::Map<&'static str, Builtin> = phf_map! {
    "print" => Builtin {
        run: &|interp, args| {
            let output: Vec<_> = args.iter().map(|v| format!("{}", v)).collect();
            write!(interp.output, "{}\n", output.join(" ")).unwrap();

            Ok(Value::Nil)
        },
    },
    "len" => Builtin {
        run: &|_, args| {
            Ok(Value::Integer(match &args[0] {
                Value::Str(s) => s.chars().count() as i64,
                other => other.try_as_list()?.len() as i64,
            }))
        },
    },
    "str" => Builtin {
        run: &|_, args| {
            Ok(Value::Str(match &args[0] {
                Value::Str(s) => s.clone(),
                other => format!("{}", other),
            }))
        },
    },
    "min" => Builtin {
        run: &|_, args| Ok(pick_numeric(args, |candidate, best| candidate < best)),
    },
    "max" => Builtin {
        run: &|_, args| Ok(pick_numeric(args, |candidate, best| candidate > best)),
    },
};

fn pick_numeric(args: &[Value], better: impl Fn(f64, f64) -> bool) -> Value {
    let mut best = args[0].clone();

    for arg in &args[1..] {
        if let (Some(candidate), Some(current)) = (arg.as_f64(), best.as_f64()) {
            if better(candidate, current) {
                best = arg.clone();
            }
        }
    }

    best
}

lazy_static! {
    static ref SIGNATURES: HashMap<&'static str, Signature> = {
        let mut signatures = HashMap::new();

        signatures.insert("print", Signature::new().add_rest(KindSpec::Any).build());
        signatures.insert("len", Signature::new().add(KindSpec::Sized).build());
        signatures.insert("str", Signature::new().add(KindSpec::Any).build());
        signatures.insert(
            "min",
            Signature::new()
                .add(KindSpec::Number)
                .add_rest(KindSpec::Number)
                .build(),
        );
        signatures.insert(
            "max",
            Signature::new()
                .add(KindSpec::Number)
                .add_rest(KindSpec::Number)
                .build(),
        );

        signatures
    };
}

pub(crate) fn get(name: &str) -> Option<&'static Builtin> {
    BUILTINS.get(name)
}

pub(crate) fn signature(name: &str) -> Option<&'static Signature> {
    SIGNATURES.get(name)
}
