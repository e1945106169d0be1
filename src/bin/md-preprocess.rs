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
use std::path::{Path, PathBuf};
use std::process;

use anyhow::{Context, Result};
use clap::builder::NonEmptyStringValueParser;
use clap::{ArgAction, Parser};
use serde_derive::Serialize;

use mdstitch::{
    init_logging, Document, LocalPass, Manifest, PreprocessPass, Problem, Problems, StitchError,
};

#[derive(Parser, Debug)]
#[command(
    name = "md-preprocess",
    version,
    about = "Resolve !include directives and image labels in a markdown file"
)]
struct Cli {
    #[arg(value_parser = NonEmptyStringValueParser::new())]
    in_file: String,

    #[arg(value_parser = NonEmptyStringValueParser::new())]
    out_file: String,

    /// Package of the input file, used to resolve ':target' labels
    current_package: String,

    /// Declare a dependency that may be included
    #[arg(
        long = "dep",
        num_args = 2,
        value_names = ["LABEL", "FILE"],
        value_parser = NonEmptyStringValueParser::new(),
        action = ArgAction::Append
    )]
    deps: Vec<String>,

    /// Declare an image that may be referenced
    #[arg(
        long = "image",
        num_args = 2,
        value_names = ["LABEL", "FILE"],
        value_parser = NonEmptyStringValueParser::new(),
        action = ArgAction::Append
    )]
    images: Vec<String>,

    /// JSON or YAML file with further 'deps' and 'images' declarations
    #[arg(long)]
    manifest: Option<PathBuf>,

    #[arg(long, help = "Output machine-readable JSON")]
    json: bool,

    #[arg(short, long)]
    verbose: bool,

    #[arg(short, long)]
    quiet: bool,
}

#[derive(Serialize)]
struct JsonOut<'a> {
    ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    lines: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    problems: Option<&'a [Problem]>,
}

/// clap hands repeated two-value options over as one flat list.
fn pairs(values: Vec<String>) -> Vec<(String, String)> {
    values
        .chunks_exact(2)
        .map(|kv| (kv[0].clone(), kv[1].clone()))
        .collect()
}

fn main() -> Result<()> {
    let Cli {
        in_file,
        out_file,
        current_package,
        deps,
        images,
        manifest,
        json,
        verbose,
        quiet,
    } = Cli::parse();
    init_logging(verbose, quiet);

    let manifest = match manifest {
        Some(ref path) => Manifest::from_file(path)
            .with_context(|| format!("failed to load manifest {}", path.display()))?,
        None => Manifest::default(),
    };
    let (deps, images) = manifest.merge(pairs(deps), pairs(images));

    let mut doc = Document::from_file(Path::new(&in_file))
        .with_context(|| format!("failed to read {}", in_file))?;
    let mut found = Vec::new();
    match PreprocessPass::new(deps, images, &current_package).apply(&mut doc, &mut found) {
        Ok(()) => {
            doc.write_to(Path::new(&out_file))
                .with_context(|| format!("failed to write {}", out_file))?;
            if json {
                let out = JsonOut {
                    ok: true,
                    lines: Some(doc.lines().len()),
                    problems: None,
                };
                println!("{}", serde_json::to_string_pretty(&out)?);
            }
            Ok(())
        }
        Err(StitchError::PreprocessingFailed(_)) => {
            let mut problems = Problems::new("markdown preprocessing failed");
            problems.extend(found);
            if json {
                let out = JsonOut {
                    ok: false,
                    lines: None,
                    problems: Some(problems.problems()),
                };
                println!("{}", serde_json::to_string_pretty(&out)?);
            } else {
                eprint!("{}", problems);
            }
            process::exit(1);
        }
        Err(e) => Err(e.into()),
    }
}
