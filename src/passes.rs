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

use crate::content::{Document, DocumentOrigin};
use crate::errors::StitchError;
use crate::lint::lint_line;
use crate::preprocess::preprocess;
use crate::problems::Problem;

/// This trait is implemented by all passes that only read a `Document` and
/// update an external state as a side effect.
pub trait ReadOnlyPass<ExternalState> {
    fn apply(&mut self, d: &Document, state: &mut ExternalState) -> Result<(), StitchError>;
}

/// This trait is implemented by all passes that may rewrite the lines of a
/// `Document`; an external state may be updated as a side effect too.
pub trait LocalPass<ExternalState> {
    fn apply(&mut self, d: &mut Document, state: &mut ExternalState) -> Result<(), StitchError>;
}

/// A `LocalPass` resolving includes and images and checking strict deps.
///
/// On success the document's lines are replaced by the substituted ones. On
/// failure the document is left as it was, the problems are appended to the
/// state and `StitchError::PreprocessingFailed` is returned.
pub struct PreprocessPass {
    deps: HashMap<String, String>,
    images: HashMap<String, String>,
    current_package: String,
}

impl PreprocessPass {
    pub fn new(
        deps: HashMap<String, String>,
        images: HashMap<String, String>,
        current_package: &str,
    ) -> PreprocessPass {
        PreprocessPass {
            deps,
            images,
            current_package: current_package.to_string(),
        }
    }
}

impl LocalPass<Vec<Problem>> for PreprocessPass {
    fn apply(&mut self, d: &mut Document, problems: &mut Vec<Problem>) -> Result<(), StitchError> {
        if let DocumentOrigin::MarkdownFile(ref path) = *d.origin() {
            debug!("preprocessing {} in package '{}'", path.display(), self.current_package);
        }
        match preprocess(d.lines(), &self.deps, &self.images, &self.current_package) {
            Ok(lines) => {
                d.swap_lines(lines);
                Ok(())
            }
            Err(found) => {
                let count = found.len();
                problems.extend(found);
                Err(StitchError::PreprocessingFailed(count))
            }
        }
    }
}

/// A `ReadOnlyPass` which lints every line of a `Document`, with no special
/// treatment of include directives.
pub struct LintPass;

impl ReadOnlyPass<Vec<Problem>> for LintPass {
    fn apply(&mut self, d: &Document, problems: &mut Vec<Problem>) -> Result<(), StitchError> {
        let before = problems.len();
        for (row, line) in d.lines_iter().enumerate() {
            problems.extend(lint_line(line).into_iter().map(|p| p.at_row(row)));
        }
        let found = problems.len() - before;
        if found > 0 {
            return Err(StitchError::LintFailed(found));
        }
        info!("linted {} lines", d.lines().len());
        Ok(())
    }
}


#[cfg(test)]
fn test_pass() -> PreprocessPass {
    let mut deps = HashMap::new();
    deps.insert("a:bar".to_string(), "a/bar.md".to_string());
    PreprocessPass::new(deps, HashMap::new(), "a")
}

#[test]
fn test_preprocess_pass_swaps_lines() {
    let mut doc = Document::from_str("Intro\n!include :bar\n", DocumentOrigin::RawString);
    let mut problems = Vec::new();
    test_pass().apply(&mut doc, &mut problems).unwrap();
    assert!(problems.is_empty());
    assert_eq!(doc.to_text(), "Intro\n!include a/bar.md\n");
}

#[test]
fn test_preprocess_pass_keeps_document_on_failure() {
    let text = "Intro\n!include :baz\n";
    let mut doc = Document::from_str(text, DocumentOrigin::RawString);
    let mut problems = Vec::new();
    match test_pass().apply(&mut doc, &mut problems) {
        Err(StitchError::PreprocessingFailed(n)) => assert_eq!(n, problems.len()),
        other => panic!("unexpected result: {:?}", other),
    }
    assert_eq!(doc.to_text(), text);
    assert_eq!(problems[0].row, 1);
}

#[test]
fn test_lint_pass() {
    let mut problems = Vec::new();
    let clean = Document::from_str("a -- b\n\\“c\\”", DocumentOrigin::RawString);
    LintPass.apply(&clean, &mut problems).unwrap();
    assert!(problems.is_empty());

    // Include lines are linted too.
    let dirty = Document::from_str("ok\n!include :a…", DocumentOrigin::RawString);
    match LintPass.apply(&dirty, &mut problems) {
        Err(StitchError::LintFailed(1)) => {}
        other => panic!("unexpected result: {:?}", other),
    }
    assert_eq!((problems[0].row, problems[0].col), (1, 11));
}

#[test]
fn test_preprocess_pass_windows_line_endings() {
    let mut images = HashMap::new();
    images.insert("a:foo".to_string(), "a/foo.jpg".to_string());
    let mut deps = HashMap::new();
    deps.insert("a:bar".to_string(), "a/bar.md".to_string());
    let mut doc = Document::from_str("Intro\r\n!include :bar\r\n![x](:foo)\r\n", DocumentOrigin::RawString);
    let mut problems = Vec::new();
    PreprocessPass::new(deps, images, "a").apply(&mut doc, &mut problems).unwrap();
    assert!(problems.is_empty());
    assert_eq!(doc.to_text(), "Intro\r\n!include a/bar.md\r\n![x](a/foo.jpg)\r\n");
}
