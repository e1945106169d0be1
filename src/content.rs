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
use std::path::{Path, PathBuf};
use std::slice::Iter;

use crate::errors::StitchError;

/// This variant represents the origin of a `Document`: for example it can be
/// a file or a string, or it might have been created by a pass.
#[derive(Debug, Clone, PartialEq)]
pub enum DocumentOrigin {
    MarkdownFile(PathBuf),
    RawString,
    Created,
}

/// A Document is a markdown source held as an ordered sequence of lines,
/// indexed by 0-based row.
///
/// Lines are split on `\n` and lose one trailing `\r` each. A source with any
/// `\r\n` is written back with `\r\n` endings, so `to_text` reproduces
/// consistently-terminated input exactly, including a trailing newline (which
/// shows up as a final empty line).
#[derive(Debug, Clone)]
pub struct Document {
    origin: DocumentOrigin,
    lines: Vec<String>,
    line_ending: &'static str,
}

impl Document {
    /// Creates a Document from a string, also specifying its origin.
    pub fn from_str(text: &str, origin: DocumentOrigin) -> Document {
        let line_ending = if text.contains("\r\n") { "\r\n" } else { "\n" };
        Document {
            origin,
            lines: text
                .split('\n')
                .map(|l| l.strip_suffix('\r').unwrap_or(l).to_string())
                .collect(),
            line_ending,
        }
    }

    /// Reads a Document from a UTF-8 markdown file.
    pub fn from_file(path: &Path) -> Result<Document, StitchError> {
        let text = fs::read_to_string(path)?;
        debug!("read {} bytes from {}", text.len(), path.display());
        Ok(Document::from_str(
            &text,
            DocumentOrigin::MarkdownFile(path.to_path_buf()),
        ))
    }

    pub fn origin(&self) -> &DocumentOrigin {
        &self.origin
    }

    pub fn lines(&self) -> &Vec<String> {
        &self.lines
    }

    pub fn lines_iter(&self) -> Iter<'_, String> {
        self.lines.iter()
    }

    pub fn swap_lines(&mut self, new_lines: Vec<String>) {
        self.lines = new_lines
    }

    pub fn to_text(&self) -> String {
        self.lines.join(self.line_ending)
    }

    /// Writes the document to `path`, replacing any existing file.
    pub fn write_to(&self, path: &Path) -> Result<(), StitchError> {
        fs::write(path, self.to_text())?;
        debug!("wrote {} lines to {}", self.lines.len(), path.display());
        Ok(())
    }
}


#[test]
fn test_document_creation() {
    let doc = Document::from_str("foo\n\nbar\n", DocumentOrigin::RawString);
    assert_eq!(doc.lines().len(), 4);
    assert_eq!(doc.lines_iter().next().map(String::as_str), Some("foo"));
    assert_eq!(doc.to_text(), "foo\n\nbar\n");
    assert_eq!(doc.origin(), &DocumentOrigin::RawString);
}

#[test]
fn test_document_crlf() {
    let doc = Document::from_str("foo\r\n!include :bar\r\n", DocumentOrigin::RawString);
    assert_eq!(doc.lines(), &vec!["foo", "!include :bar", ""]);
    assert_eq!(doc.to_text(), "foo\r\n!include :bar\r\n");
}

#[test]
fn test_document_swap_lines() {
    let mut doc = Document::from_str("foo\nbar", DocumentOrigin::RawString);
    doc.swap_lines(vec!["baz".to_string()]);
    assert_eq!(doc.to_text(), "baz");
}
