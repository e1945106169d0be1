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

use thiserror::Error;

/// An error that can be returned by mdstitch operations.
///
/// Diagnostics about the content of a document are not errors: they are
/// collected as `Problem`s. A pass that found problems reports how many it
/// found through `PreprocessingFailed` or `LintFailed`.
#[derive(Debug, Error)]
pub enum StitchError {
    #[error("I/O error: {0}")]
    IOError(#[from] std::io::Error),
    #[error("invalid JSON manifest: {0}")]
    JSONParseError(#[from] serde_json::Error),
    #[error("invalid YAML manifest: {0}")]
    YAMLParseError(#[from] serde_yaml::Error),
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("markdown preprocessing failed with {0} problem(s)")]
    PreprocessingFailed(usize),
    #[error("linting failed with {0} problem(s)")]
    LintFailed(usize),
}

/// An error produced when a raw reference cannot be parsed into a `Label`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LabelError {
    #[error("label must not be empty")]
    Empty,
    #[error("label must contain ':' separating package and target: {0}")]
    MissingSeparator(String),
    #[error("label must name a target after ':': {0}")]
    EmptyTarget(String),
    #[error("invalid character '{ch}' in package: {package}")]
    PackageCharacter { ch: char, package: String },
    #[error("invalid character '{ch}' in target: {target}")]
    TargetCharacter { ch: char, target: String },
    #[error("{0}")]
    Malformed(String),
}
