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
//! The markdown preprocessor: resolves `!include` directives and image
//! references against caller-supplied label maps, lints the text for
//! forbidden characters, and checks that every declared label is used.

mod audit;
mod images;
mod include;

use std::collections::{BTreeSet, HashMap};

use crate::label::Label;
use crate::lint::lint_line;
use crate::problems::{LineProblem, Problem, ProblemKind};

pub use self::audit::audit;
pub use self::images::{resolve_images, ImageResolution};
pub use self::include::{resolve_include, IncludeOutcome};

/// What processing one row produced.
///
/// An include occupies its whole line, so a row recognised as an include
/// skips image resolution and linting even when the include is broken.
#[derive(Debug)]
enum LineOutcome {
    Include {
        line: String,
        used: Option<Label>,
        problem: Option<LineProblem>,
    },
    Plain {
        line: String,
        used: BTreeSet<Label>,
        problems: Vec<LineProblem>,
    },
}

fn process_row(
    line: &str,
    deps: &HashMap<String, String>,
    images: &HashMap<String, String>,
    current_package: &str,
) -> LineOutcome {
    match resolve_include(line, deps, current_package) {
        IncludeOutcome::Include {
            line,
            used,
            problem,
        } => LineOutcome::Include {
            line,
            used,
            problem,
        },
        IncludeOutcome::NotInclude => {
            let resolution = resolve_images(line, images, current_package);
            let mut problems = resolution.problems;
            // Lint the source text so columns point at what the author wrote.
            problems.extend(lint_line(line));
            LineOutcome::Plain {
                line: resolution.line,
                used: resolution.used,
                problems,
            }
        }
    }
}

#[derive(Default)]
struct Scan {
    lines: Vec<String>,
    problems: Vec<Problem>,
    used_deps: BTreeSet<String>,
    used_images: BTreeSet<String>,
}

/// Runs the preprocessor over a document.
///
/// `deps` and `images` map canonical `package:target` labels to file paths.
/// Returns the substituted lines, one per input line, or every problem found
/// in document order followed by the dependency and image audits.
pub fn preprocess<S: AsRef<str>>(
    lines: &[S],
    deps: &HashMap<String, String>,
    images: &HashMap<String, String>,
    current_package: &str,
) -> Result<Vec<String>, Vec<Problem>> {
    let mut scan = lines
        .iter()
        .enumerate()
        .fold(Scan::default(), |mut scan, (row, line)| {
            match process_row(line.as_ref(), deps, images, current_package) {
                LineOutcome::Include {
                    line,
                    used,
                    problem,
                } => {
                    scan.used_deps.extend(used.map(|l| l.key()));
                    scan.problems.extend(problem.map(|p| p.at_row(row)));
                    scan.lines.push(line);
                }
                LineOutcome::Plain {
                    line,
                    used,
                    problems,
                } => {
                    scan.used_images.extend(used.iter().map(Label::key));
                    scan.problems.extend(problems.into_iter().map(|p| p.at_row(row)));
                    scan.lines.push(line);
                }
            }
            scan
        });

    let declared_deps: BTreeSet<String> = deps.keys().cloned().collect();
    let declared_images: BTreeSet<String> = images.keys().cloned().collect();
    let audits = [
        audit(&scan.used_deps, &declared_deps, "deps"),
        audit(&scan.used_images, &declared_images, "images"),
    ];
    for message in audits.iter().flatten() {
        scan.problems.push(Problem {
            row: 0,
            col: 0,
            kind: ProblemKind::DependencyMismatch,
            message: message.clone(),
        });
    }

    if scan.problems.is_empty() {
        info!(
            "preprocessed {} lines ({} deps, {} images)",
            scan.lines.len(),
            scan.used_deps.len(),
            scan.used_images.len()
        );
        Ok(scan.lines)
    } else {
        info!("preprocessing found {} problem(s)", scan.problems.len());
        Err(scan.problems)
    }
}


#[cfg(test)]
fn map(entries: &[(&str, &str)]) -> HashMap<String, String> {
    entries
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

#[cfg(test)]
const GOOD: &str = "Foo bar.

!include {}

!include {}

An image ![foo]({} \"bar\"){.baz} goes here.
";

#[cfg(test)]
fn make_data(include1: &str, include2: &str, image: &str) -> Vec<String> {
    GOOD.replacen("{}", include1, 1)
        .replacen("{}", include2, 1)
        .replacen("{}", image, 1)
        .split('\n')
        .map(String::from)
        .collect()
}

#[test]
fn test_scenario_clean() {
    let lines = ["Foo bar.", "!include :bar", "An image ![x](:foo) here."];
    let out = preprocess(
        &lines,
        &map(&[("a:bar", "a/bar.json")]),
        &map(&[("a:foo", "a/foo.jpg")]),
        "a",
    )
    .unwrap();
    assert_eq!(
        out,
        vec!["Foo bar.", "!include a/bar.json", "An image ![x](a/foo.jpg) here."]
    );
}

#[test]
fn test_scenario_undeclared_dependency() {
    let lines = ["Foo bar.", "!include :bar", "An image ![x](:foo) here."];
    let problems = preprocess(&lines, &map(&[]), &map(&[("a:foo", "a/foo.jpg")]), "a").unwrap_err();
    assert_eq!(problems.len(), 2);
    assert_eq!((problems[0].row, problems[0].col), (1, 0));
    assert_eq!(problems[0].kind, ProblemKind::UnresolvedReference);
    assert!(problems[0].message.contains("a:bar"));
    assert_eq!((problems[1].row, problems[1].col), (0, 0));
    assert_eq!(problems[1].kind, ProblemKind::DependencyMismatch);
    assert_eq!(
        problems[1].message,
        "Used deps do not match declared deps\nUsed but not declared\n  //a:bar"
    );
}

#[test]
fn test_round_trip_on_clean_input() {
    let deps = map(&[("foo:bar", "foo/bar.json"), ("baz:quux", "baz/quux.json")]);
    let images = map(&[("a:yay", "a/yay.jpg")]);
    let input = make_data("//foo:bar", "//baz:quux", ":yay");
    let out = preprocess(&input, &deps, &images, "a").unwrap();
    assert_eq!(out.len(), input.len());
    assert_eq!(out, make_data("foo/bar.json", "baz/quux.json", "a/yay.jpg"));
}

#[test]
fn test_bad_include_and_bad_image() {
    let deps = map(&[("foo:bar", "foo/bar.json"), ("baz:quux", "baz/quux.json")]);
    let images = map(&[("a:yay", "a/yay.jpg")]);
    let input = make_data("//foo:bar", "//blah:yay", "//baz:quux");
    let problems = preprocess(&input, &deps, &images, "a").unwrap_err();
    let kinds: Vec<ProblemKind> = problems.iter().map(|p| p.kind).collect();
    assert_eq!(
        kinds,
        vec![
            ProblemKind::UnresolvedReference,
            ProblemKind::UnresolvedReference,
            ProblemKind::DependencyMismatch,
            ProblemKind::DependencyMismatch,
        ]
    );
    assert_eq!((problems[0].row, problems[0].col), (4, 0));
    assert_eq!((problems[1].row, problems[1].col), (6, 9));
}

#[test]
fn test_include_short_circuits_lint_and_images() {
    let lines = ["!include :bar “quoted” ![x](:nope)"];
    let problems = preprocess(&lines, &map(&[]), &map(&[]), "a").unwrap_err();
    assert!(problems.iter().all(|p| p.kind != ProblemKind::Lint));
    assert_eq!(problems.iter().filter(|p| p.row == 0 && p.col == 0).count(), problems.len());
    assert!(problems.iter().any(|p| p.kind == ProblemKind::MalformedLabel));
}

#[test]
fn test_image_atomicity_in_document() {
    let lines = ["![a](:foo) and ![b](:bar)"];
    let problems = preprocess(&lines, &map(&[]), &map(&[("a:foo", "a/foo.jpg")]), "a").unwrap_err();
    // One unresolved image, one audit problem for the undeclared image.
    assert_eq!(problems.len(), 2);
    assert_eq!((problems[0].row, problems[0].col), (0, 15));
}

#[test]
fn test_strict_deps_symmetry() {
    let lines = ["No references here."];
    let problems = preprocess(&lines, &map(&[("a:unused", "a/unused.md")]), &map(&[]), "a").unwrap_err();
    assert_eq!(problems.len(), 1);
    assert_eq!(
        problems[0].message,
        "Used deps do not match declared deps\nDeclared but not used\n  //a:unused"
    );

    let problems = preprocess(&lines, &map(&[]), &map(&[("a:pic", "a/pic.png")]), "a").unwrap_err();
    assert_eq!(problems.len(), 1);
    assert!(problems[0].message.starts_with("Used images do not match declared images"));
}

#[test]
fn test_multiple_rules_on_one_line() {
    let lines = ["x – y … ![i](:nope)"];
    let problems = preprocess(&lines, &map(&[]), &map(&[]), "a").unwrap_err();
    let cols: Vec<(usize, ProblemKind)> = problems.iter().map(|p| (p.col, p.kind)).collect();
    assert_eq!(
        cols,
        vec![
            (8, ProblemKind::UnresolvedReference),
            (2, ProblemKind::Lint),
            (6, ProblemKind::Lint),
            (0, ProblemKind::DependencyMismatch),
        ]
    );
}

#[test]
fn test_root_package() {
    let lines = ["!include :bar", "![f](:foo)"];
    let out = preprocess(
        &lines,
        &map(&[(":bar", "bar.json")]),
        &map(&[(":foo", "foo.jpg")]),
        "",
    )
    .unwrap();
    assert_eq!(out, vec!["!include bar.json", "![f](foo.jpg)"]);
}

#[test]
fn test_lint_columns_refer_to_source_text() {
    // The image path is longer than its label; the dash column must not move.
    let lines = ["![x](:foo) – y"];
    let problems = preprocess(&lines, &map(&[]), &map(&[("a:foo", "a/some/long/foo.jpg")]), "a").unwrap_err();
    assert_eq!(problems.len(), 1);
    assert_eq!(problems[0].kind, ProblemKind::Lint);
    assert_eq!((problems[0].row, problems[0].col), (0, 11));
}
