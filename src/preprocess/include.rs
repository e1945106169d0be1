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
use std::collections::HashMap;

use crate::label::{canonicalise, Label};
use crate::problems::{LineProblem, ProblemKind};

const INCLUDE: &str = "!include";

const INCLUDE_MSG: &str = "Incorrectly-formatted include. Must be '!include \
<md_file label>' where label is in deps, e.g. '!include //foo:bar'.";

/// What the include resolver made of a line.
#[derive(Debug, PartialEq)]
pub enum IncludeOutcome {
    /// The line is not an include directive.
    NotInclude,
    /// The line is an include directive. `line` is the substituted line when
    /// resolution succeeded and the original line otherwise.
    Include {
        line: String,
        used: Option<Label>,
        problem: Option<LineProblem>,
    },
}

pub fn resolve_include(
    line: &str,
    deps: &HashMap<String, String>,
    current_package: &str,
) -> IncludeOutcome {
    let rest = match line.strip_prefix(INCLUDE) {
        Some(rest) => rest,
        None => return IncludeOutcome::NotInclude,
    };

    let unresolved = |used: Option<Label>, kind: ProblemKind, message: String| {
        IncludeOutcome::Include {
            line: line.to_string(),
            used,
            problem: Some(LineProblem::new(0, kind, message)),
        }
    };

    if !rest.starts_with(' ') {
        return unresolved(
            None,
            ProblemKind::MalformedInclude,
            format!("Include statement must be followed by a space: {}", line),
        );
    }

    match canonicalise(rest.trim_start_matches(' '), current_package) {
        Ok(label) => match deps.get(&label.key()) {
            Some(path) => {
                debug!("resolved include {} to {}", label, path);
                IncludeOutcome::Include {
                    line: format!("{} {}", INCLUDE, path),
                    used: Some(label),
                    problem: None,
                }
            }
            None => {
                let message = format!("{} {}", INCLUDE_MSG, label);
                unresolved(Some(label), ProblemKind::UnresolvedReference, message)
            }
        },
        Err(e) => unresolved(
            None,
            ProblemKind::MalformedLabel,
            format!("{} {}", INCLUDE_MSG, e),
        ),
    }
}


#[cfg(test)]
fn test_deps() -> HashMap<String, String> {
    let mut deps = HashMap::new();
    deps.insert("foo:bar".to_string(), "foo/bar.json".to_string());
    deps.insert("baz:quux".to_string(), "baz/quux.json".to_string());
    deps
}

#[cfg(test)]
fn resolved(outcome: IncludeOutcome) -> (String, Option<String>, Option<LineProblem>) {
    match outcome {
        IncludeOutcome::Include {
            line,
            used,
            problem,
        } => (line, used.map(|l| l.key()), problem),
        IncludeOutcome::NotInclude => panic!("expected an include"),
    }
}

#[test]
fn test_not_an_include() {
    let deps = test_deps();
    assert_eq!(resolve_include("foo bar", &deps, "foo"), IncludeOutcome::NotInclude);
    assert_eq!(resolve_include(" !include :bar", &deps, "foo"), IncludeOutcome::NotInclude);
}

#[test]
fn test_good_include() {
    let deps = test_deps();
    let (line, used, problem) = resolved(resolve_include("!include :bar", &deps, "foo"));
    assert_eq!(line, "!include foo/bar.json");
    assert_eq!(used.as_deref(), Some("foo:bar"));
    assert!(problem.is_none());

    let (line, used, problem) = resolved(resolve_include("!include     //baz:quux", &deps, "foo"));
    assert_eq!(line, "!include baz/quux.json");
    assert_eq!(used.as_deref(), Some("baz:quux"));
    assert!(problem.is_none());
}

#[test]
fn test_unknown_dependency_is_still_used() {
    let deps = test_deps();
    let (line, used, problem) = resolved(resolve_include("!include :baz", &deps, "foo"));
    assert_eq!(line, "!include :baz");
    assert_eq!(used.as_deref(), Some("foo:baz"));
    let problem = problem.unwrap();
    assert_eq!(problem.kind, ProblemKind::UnresolvedReference);
    assert!(problem.message.ends_with(" foo:baz"));
}

#[test]
fn test_malformed_include() {
    let deps = test_deps();
    for line in &["!include", "!include:bar", "!includes :bar"] {
        let (out, used, problem) = resolved(resolve_include(line, &deps, "foo"));
        assert_eq!(&out, line);
        assert!(used.is_none());
        assert_eq!(problem.unwrap().kind, ProblemKind::MalformedInclude);
    }
}

#[test]
fn test_invalid_label() {
    let deps = test_deps();
    for line in &["!include a:b:", "!include ", "!include bar"] {
        let (out, used, problem) = resolved(resolve_include(line, &deps, "foo"));
        assert_eq!(&out, line);
        assert!(used.is_none());
        let problem = problem.unwrap();
        assert_eq!(problem.kind, ProblemKind::MalformedLabel);
        assert_eq!(problem.col, 0);
    }
}
