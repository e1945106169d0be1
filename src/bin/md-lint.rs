// Copyright 2018 Dario Domizioli
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
use std::fs;
use std::path::Path;
use std::process;

use anyhow::{Context, Result};
use clap::builder::NonEmptyStringValueParser;
use clap::Parser;

use mdstitch::{init_logging, Document, LintPass, Problems, ReadOnlyPass, StitchError};

#[derive(Parser, Debug)]
#[command(
    name = "md-lint",
    version,
    about = "Check a markdown file for literal curly quotes, dashes and ellipses"
)]
struct Cli {
    #[arg(value_parser = NonEmptyStringValueParser::new())]
    in_file: String,

    /// Receives 'OK' when the input is clean
    #[arg(value_parser = NonEmptyStringValueParser::new())]
    out_file: String,

    #[arg(short, long)]
    verbose: bool,

    #[arg(short, long)]
    quiet: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    let doc = Document::from_file(Path::new(&cli.in_file))
        .with_context(|| format!("failed to read {}", cli.in_file))?;
    let mut found = Vec::new();
    match LintPass.apply(&doc, &mut found) {
        Ok(()) => {
            fs::write(&cli.out_file, "OK\n")
                .with_context(|| format!("failed to write {}", cli.out_file))?;
            Ok(())
        }
        Err(StitchError::LintFailed(_)) => {
            let mut problems = Problems::new("linting failed");
            problems.extend(found);
            eprint!("{}", problems);
            process::exit(1);
        }
        Err(e) => Err(e.into()),
    }
}
