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
use std::collections::{BTreeMap, BTreeSet, HashMap};

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use crate::label::{canonicalise, Label};
use crate::problems::{LineProblem, ProblemKind};

const IMAGE_MSG: &str = "Incorrectly-formatted image. Must be \
'![<text>](<label>[ \"text\"])' where label is in 'images', e.g. \
'![foo](//foo:bar)'.";

static IMAGE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"!\[([^\]]*)\]\(([^\)]+)\)").expect("image pattern must compile"));

/// The result of resolving every image reference in one line.
#[derive(Debug)]
pub struct ImageResolution {
    /// The substituted line, or the original line if any problem was found.
    pub line: String,
    pub used: BTreeSet<Label>,
    pub problems: Vec<LineProblem>,
}

/// Splits the text between the parentheses of an image reference into the
/// raw label and an optional title, e.g. `:foo "A title"`.
fn split_title(text: &str) -> (&str, Option<&str>) {
    match text.split_once(' ') {
        Some((raw_label, title)) if !title.is_empty() => (raw_label, Some(title)),
        Some((raw_label, _)) => (raw_label, None),
        None => (text, None),
    }
}

pub fn resolve_images(
    line: &str,
    images: &HashMap<String, String>,
    current_package: &str,
) -> ImageResolution {
    let mut used = BTreeSet::new();
    let mut problems = Vec::new();
    // Keyed by the raw text between the parentheses, so repeated references
    // share one replacement.
    let mut replacements: BTreeMap<&str, String> = BTreeMap::new();

    for caps in IMAGE_RE.captures_iter(line) {
        let (start, text) = match (caps.get(0), caps.get(2)) {
            (Some(whole), Some(text)) => (whole.start(), text.as_str()),
            _ => continue,
        };
        let col = line[..start].chars().count();
        let (raw_label, title) = split_title(text);

        match canonicalise(raw_label, current_package) {
            Ok(label) => {
                match images.get(&label.key()) {
                    Some(path) => {
                        debug!("resolved image {} to {}", label, path);
                        let replacement = match title {
                            Some(title) => format!("{} {}", path, title),
                            None => path.clone(),
                        };
                        replacements.insert(text, replacement);
                    }
                    None => problems.push(LineProblem::new(
                        col,
                        ProblemKind::UnresolvedReference,
                        format!("{} {}", IMAGE_MSG, label),
                    )),
                }
                used.insert(label);
            }
            Err(e) => problems.push(LineProblem::new(
                col,
                ProblemKind::MalformedLabel,
                format!("{} {}", IMAGE_MSG, e),
            )),
        }
    }

    if !problems.is_empty() || replacements.is_empty() {
        return ImageResolution {
            line: line.to_string(),
            used,
            problems,
        };
    }

    let substituted = IMAGE_RE.replace_all(line, |caps: &Captures| match replacements.get(&caps[2]) {
        Some(replacement) => format!("![{}]({})", &caps[1], replacement),
        None => caps[0].to_string(),
    });

    ImageResolution {
        line: substituted.into_owned(),
        used,
        problems,
    }
}


#[cfg(test)]
fn test_images() -> HashMap<String, String> {
    let mut images = HashMap::new();
    images.insert("foo:bar".to_string(), "foo/bar.jpg".to_string());
    images.insert("baz/quux:quux".to_string(), "baz/quux/quux.png".to_string());
    images
}

#[cfg(test)]
fn keys(used: &BTreeSet<Label>) -> Vec<String> {
    used.iter().map(|l| l.key()).collect()
}

#[test]
fn test_no_images() {
    let r = resolve_images("Foo bar baz quux [link](foo)", &test_images(), "foo");
    assert_eq!(r.line, "Foo bar baz quux [link](foo)");
    assert!(r.used.is_empty());
    assert!(r.problems.is_empty());
}

#[test]
fn test_one_image() {
    let r = resolve_images("Foo ![bar](//foo:bar)", &test_images(), "foo");
    assert_eq!(r.line, "Foo ![bar](foo/bar.jpg)");
    assert_eq!(keys(&r.used), vec!["foo:bar"]);
    assert!(r.problems.is_empty());
}

#[test]
fn test_title_and_attributes_are_kept() {
    let r = resolve_images("Foo ![bar](//foo:bar \"baz\\quux\"){.quux}", &test_images(), "foo");
    assert_eq!(r.line, "Foo ![bar](foo/bar.jpg \"baz\\quux\"){.quux}");
    assert!(r.problems.is_empty());
}

#[test]
fn test_multiple_images_and_duplicates() {
    let r = resolve_images(
        "Foo ![bar](:bar) bar ![quux](//baz/quux:quux) baz ![bar](:bar) ![bar](:bar \"baz\"){.quux}",
        &test_images(),
        "foo",
    );
    assert_eq!(
        r.line,
        "Foo ![bar](foo/bar.jpg) bar ![quux](baz/quux/quux.png) baz ![bar](foo/bar.jpg) \
![bar](foo/bar.jpg \"baz\"){.quux}"
    );
    assert_eq!(keys(&r.used), vec!["baz/quux:quux", "foo:bar"]);
}

#[test]
fn test_unknown_image_leaves_line_untouched() {
    let line = "Foo ![bar](:bar) bar ![quux](:quux)";
    let r = resolve_images(line, &test_images(), "foo");
    assert_eq!(r.line, line);
    assert_eq!(r.problems.len(), 1);
    assert_eq!(r.problems[0].col, 21);
    assert_eq!(r.problems[0].kind, ProblemKind::UnresolvedReference);
    assert_eq!(keys(&r.used), vec!["foo:bar", "foo:quux"]);
}

#[test]
fn test_invalid_label() {
    let r = resolve_images("Foo ![bar](:bar:)", &test_images(), "foo");
    assert_eq!(r.line, "Foo ![bar](:bar:)");
    assert_eq!(r.problems.len(), 1);
    assert_eq!(r.problems[0].col, 4);
    assert_eq!(r.problems[0].kind, ProblemKind::MalformedLabel);
    assert!(r.used.is_empty());
}

#[test]
fn test_columns_count_characters() {
    let r = resolve_images("“é” ![x](:nope)", &test_images(), "foo");
    assert_eq!(r.problems.len(), 1);
    assert_eq!(r.problems[0].col, 4);
}
