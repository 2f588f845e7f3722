// Copyright (c) Jesse Weaver, 2021
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::fs;
use std::io::{self, Read};

use anyhow::{Context, Result};

use scrib::incremental::last_value;
use scrib::types::KindSet;

fn main() -> Result<()> {
    let source = match std::env::args().nth(1) {
        Some(path) => {
            fs::read_to_string(&path).with_context(|| format!("could not read {}", path))?
        }
        None => {
            let mut source = String::new();
            io::stdin()
                .read_to_string(&mut source)
                .context("could not read stdin")?;

            source
        }
    };

    let mut stdout = io::stdout();

    match last_value(&source, KindSet::default(), &mut stdout)? {
        Some(value) => println!("{}", value),
        None => println!("(no input)"),
    }

    Ok(())
}
