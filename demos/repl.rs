// Copyright (c) Jesse Weaver, 2021
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::io::{self, Write};

use scrib::incremental::last_value;
use scrib::types::KindSet;

macro_rules! try_or_bail {
    ($expr:expr, $msg_prefix:expr $(,)?) => {
        match $expr {
            Ok(x) => x,
            Err(e) => {
                eprintln!("{}: {}", $msg_prefix, e);
                return;
            }
        }
    };
}

/// Re-resolves the whole buffer typed so far, like the live pane of a
/// scratchpad: the shown value is always for the full accumulated input.
fn show_last_value(buffer: &str, output: &mut impl Write) {
    let value = try_or_bail!(
        last_value(buffer, KindSet::default(), output),
        "evaluation failed",
    );

    if let Some(value) = value {
        println!("=> {}", value);
    }
}

fn main() {
    let stdin = io::stdin();
    let mut stdout = io::stdout();

    let mut buffer = String::new();
    let mut line = String::new();
    print!("> ");
    stdout.flush().unwrap();
    while let Ok(n) = stdin.read_line(&mut line) {
        if n == 0 {
            println!();
            break;
        }

        buffer.push_str(&line);
        show_last_value(&buffer, &mut stdout);

        line.clear();
        print!("> ");
        stdout.flush().unwrap();
    }
}
