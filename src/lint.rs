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
use crate::problems::{LineProblem, ProblemKind};

const CURLY_QUOTES: [char; 4] = ['“', '”', '‘', '’'];
const CURLY_QUOTE_MSG: &str = "Literal curly quotes must be backslash-escaped";
const BAD_CHARS: [(char, &str, &str); 3] = [
    ('–', "en-dashes", "--"),
    ('—', "em-dashes", "---"),
    ('…', "ellipses", "..."),
];

/// Scans a line for forbidden literal characters.
///
/// Each rule reports only its first offence in the line, so a line yields at
/// most one problem per rule. The rules are independent of each other.
pub fn lint_line(line: &str) -> Vec<LineProblem> {
    let chars: Vec<char> = line.chars().collect();
    let mut problems = Vec::new();

    let unescaped_quote = chars
        .iter()
        .enumerate()
        .position(|(col, c)| CURLY_QUOTES.contains(c) && (col == 0 || chars[col - 1] != '\\'));
    if let Some(col) = unescaped_quote {
        problems.push(LineProblem::new(col, ProblemKind::Lint, CURLY_QUOTE_MSG.to_string()));
    }

    for &(bad_char, name, replacement) in BAD_CHARS.iter() {
        if let Some(col) = chars.iter().position(|&c| c == bad_char) {
            problems.push(LineProblem::new(
                col,
                ProblemKind::Lint,
                format!("Literal {} must be replaced with '{}'", name, replacement),
            ));
        }
    }

    problems
}


#[test]
fn test_lint_clean() {
    assert!(lint_line("Foo bar.").is_empty());
    assert!(lint_line("\\“Lots \\”of \\‘quotes\\’.").is_empty());
    assert!(lint_line("Some -- dashes--- and dots...").is_empty());
    assert!(lint_line("").is_empty());
}

#[test]
fn test_lint_each_character() {
    for bad in &["“", "”", "‘", "’", "–", "—", "…"] {
        let problems = lint_line(bad);
        assert_eq!(problems.len(), 1, "{}", bad);
        assert_eq!(problems[0].col, 0);
    }
}

#[test]
fn test_lint_reports_first_offence_per_rule() {
    let problems = lint_line("a – b – c “d” e");
    assert_eq!(problems.len(), 2);
    assert_eq!(problems[0].col, 10);
    assert_eq!(problems[0].message, CURLY_QUOTE_MSG);
    assert_eq!(problems[1].col, 2);
    assert_eq!(problems[1].message, "Literal en-dashes must be replaced with '--'");
}

#[test]
fn test_lint_skips_escaped_quote() {
    let problems = lint_line("\\“ok” then");
    assert_eq!(problems.len(), 1);
    assert_eq!(problems[0].col, 4);
}

#[test]
fn test_lint_counts_characters_not_bytes() {
    let problems = lint_line("——…");
    assert_eq!(problems.len(), 2);
    assert_eq!(problems[0].col, 0);
    assert_eq!(problems[1].col, 2);
    assert_eq!(problems[1].message, "Literal ellipses must be replaced with '...'");
}
