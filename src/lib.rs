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
//! Mdstitch is a Rust crate providing the preprocessing step of a markdown
//! document build: markdown fragments are stitched together through
//! `!include` directives and image references, both written as labels that
//! are resolved against maps supplied by the build.
//!
//! A label names a file by package and target, in one of three forms:
//!
//! * `//pkg:target`, absolute within the repository (`//:target` for the
//!   repository root);
//! * `:target`, relative to the package of the document being processed;
//! * `pkg:target`, with `pkg` taken literally.
//!
//! The preprocessor also enforces _strict deps_: every label the build
//! declares must be used by the document and every label the document uses
//! must be declared. Finally, text lines are linted for a few literal
//! characters (curly quotes, en and em dashes, ellipses) that should be
//! written with their ASCII markdown equivalents.
//!
//! Text is held in a `Document`, an ordered sequence of lines, and processed
//! by _passes_:
//!
//! * `ReadOnlyPass`, which only reads the `Document` and updates some
//!   external state, such as `LintPass`.
//! * `LocalPass`, which may rewrite the lines of the `Document`, such as
//!   `PreprocessPass`.
//!
//! Problems are never raised one at a time: a pass always completes and
//! reports every `Problem` it found, positioned by row and column.
//!
//! # Example
//!
//! ~~~rust
//! use mdstitch::{Document, DocumentOrigin, LocalPass, PreprocessPass};
//! use std::collections::HashMap;
//!
//! let mut deps = HashMap::new();
//! deps.insert("a:bar".to_string(), "a/bar.md".to_string());
//! let mut images = HashMap::new();
//! images.insert("a:foo".to_string(), "a/foo.jpg".to_string());
//!
//! let mut doc = Document::from_str(
//!     "Foo bar.\n!include :bar\nAn image ![x](:foo) here.",
//!     DocumentOrigin::RawString,
//! );
//! let mut problems = Vec::new();
//! PreprocessPass::new(deps, images, "a").apply(&mut doc, &mut problems).unwrap();
//! assert_eq!(
//!     doc.to_text(),
//!     "Foo bar.\n!include a/bar.md\nAn image ![x](a/foo.jpg) here."
//! );
//! ~~~
//!

#[macro_use]
extern crate log;
#[macro_use]
extern crate serde_derive;

mod content;
mod errors;
mod label;
mod lint;
mod logging;
mod manifest;
mod passes;
pub mod preprocess;
mod problems;

pub use content::{Document, DocumentOrigin};
pub use errors::{LabelError, StitchError};
pub use label::{canonicalise, Label};
pub use lint::lint_line;
pub use logging::init_logging;
pub use manifest::Manifest;
pub use passes::{LintPass, LocalPass, PreprocessPass, ReadOnlyPass};
pub use preprocess::preprocess;
pub use problems::{LineProblem, Problem, ProblemKind, Problems};
