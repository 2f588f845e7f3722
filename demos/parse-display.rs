// Copyright (c) Jesse Weaver, 2021
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use scrib::parser::parse_statements;

use std::io::{self, Write};

fn main() {
    let stdin = io::stdin();
    let mut stdout = io::stdout();

    let mut line = String::new();
    print!("> ");
    stdout.flush().unwrap();
    while let Ok(n) = stdin.read_line(&mut line) {
        if n == 0 {
            println!();
            break;
        }

        match parse_statements(line.chars()) {
            Ok(statements) => {
                for statement in statements {
                    println!("{:?}", statement);
                }
            }
            Err(e) => println!("parsing failed: {}", e),
        }

        line.clear();
        print!("> ");
        stdout.flush().unwrap();
    }
}
