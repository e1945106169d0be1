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
use std::fmt;

/// The category of a `Problem`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProblemKind {
    /// An `!include` line that is not followed by a space.
    MalformedInclude,
    /// A reference that could not be parsed into a `Label`.
    MalformedLabel,
    /// A well-formed label absent from the dependency or image map.
    UnresolvedReference,
    /// A forbidden literal character.
    Lint,
    /// Declared and used labels differ; always reported at row 0, column 0.
    DependencyMismatch,
}

/// A problem found within a single line, before its row is known.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineProblem {
    pub col: usize,
    pub kind: ProblemKind,
    pub message: String,
}

impl LineProblem {
    pub fn new(col: usize, kind: ProblemKind, message: String) -> LineProblem {
        LineProblem { col, kind, message }
    }

    pub fn at_row(self, row: usize) -> Problem {
        Problem {
            row,
            col: self.col,
            kind: self.kind,
            message: self.message,
        }
    }
}

/// A positioned diagnostic. Rows and columns are 0-based; columns count
/// characters, not bytes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Problem {
    pub row: usize,
    pub col: usize,
    pub kind: ProblemKind,
    pub message: String,
}

impl fmt::Display for Problem {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "row {} col {}: {}", self.row + 1, self.col + 1, self.message)
    }
}

/// An ordered collection of problems under a banner, rendered the way the
/// command line tools print them to standard error.
#[derive(Debug)]
pub struct Problems {
    banner: String,
    problems: Vec<Problem>,
}

impl Problems {
    pub fn new(banner: &str) -> Problems {
        Problems {
            banner: banner.to_string(),
            problems: Vec::new(),
        }
    }

    pub fn push(&mut self, p: Problem) {
        self.problems.push(p);
    }

    pub fn is_empty(&self) -> bool {
        self.problems.is_empty()
    }

    pub fn len(&self) -> usize {
        self.problems.len()
    }

    pub fn problems(&self) -> &[Problem] {
        &self.problems
    }
}

impl Extend<Problem> for Problems {
    fn extend<T: IntoIterator<Item = Problem>>(&mut self, iter: T) {
        self.problems.extend(iter);
    }
}

impl fmt::Display for Problems {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "ERROR: {}", self.banner)?;
        for p in &self.problems {
            write!(f, "\n\n{}", p)?;
        }
        write!(f, "\n\n")
    }
}


#[test]
fn test_problem_display_is_one_based() {
    let p = LineProblem::new(3, ProblemKind::Lint, "bad".to_string()).at_row(0);
    assert_eq!(p.to_string(), "row 1 col 4: bad");
}

#[test]
fn test_problems_report() {
    let mut problems = Problems::new("markdown preprocessing failed");
    problems.push(LineProblem::new(0, ProblemKind::Lint, "one".to_string()).at_row(1));
    problems.extend(vec![Problem {
        row: 0,
        col: 0,
        kind: ProblemKind::DependencyMismatch,
        message: "two\n  //a:b".to_string(),
    }]);
    assert_eq!(problems.len(), 2);
    assert_eq!(
        problems.to_string(),
        "ERROR: markdown preprocessing failed\n\nrow 2 col 1: one\n\nrow 1 col 1: two\n  //a:b\n\n"
    );
}

#[test]
fn test_problems_json() {
    let mut problems = Problems::new("ignored");
    problems.push(LineProblem::new(2, ProblemKind::UnresolvedReference, "x".to_string()).at_row(4));
    let json = serde_json::to_value(problems.problems()).unwrap();
    assert_eq!(
        json,
        serde_json::json!([{"row": 4, "col": 2, "kind": "unresolved_reference", "message": "x"}])
    );
}
