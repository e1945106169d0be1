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
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;

use crate::errors::StitchError;

/// Declared dependencies and images of a document, loaded from a JSON or YAML
/// file. Keys are canonical `package:target` labels, values are file paths.
///
/// ~~~yaml
/// deps:
///   "a:bar": a/bar.md
/// images:
///   "a:foo": a/foo.jpg
/// ~~~
#[derive(Debug, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Manifest {
    #[serde(default)]
    pub deps: BTreeMap<String, String>,
    #[serde(default)]
    pub images: BTreeMap<String, String>,
}

impl Manifest {
    pub fn from_json(text: &str) -> Result<Manifest, StitchError> {
        let m: Manifest = serde_json::from_str(text)?;
        m.validate()
    }

    pub fn from_yaml(text: &str) -> Result<Manifest, StitchError> {
        let m: Manifest = serde_yaml::from_str(text)?;
        m.validate()
    }

    /// Loads a manifest, parsing it as JSON if the extension is `.json` and
    /// as YAML otherwise.
    pub fn from_file(path: &Path) -> Result<Manifest, StitchError> {
        let text = fs::read_to_string(path)?;
        let is_json = path.extension().map_or(false, |e| e == "json");
        debug!("loading {} manifest {}", if is_json { "JSON" } else { "YAML" }, path.display());
        if is_json {
            Manifest::from_json(&text)
        } else {
            Manifest::from_yaml(&text)
        }
    }

    fn validate(self) -> Result<Manifest, StitchError> {
        for (kind, map) in &[("deps", &self.deps), ("images", &self.images)] {
            if let Some((label, _)) = map.iter().find(|(k, v)| k.is_empty() || v.is_empty()) {
                return Err(StitchError::InvalidArgument(format!(
                    "empty label or path in manifest {}: '{}'",
                    kind, label
                )));
            }
        }
        Ok(self)
    }

    /// Merges entries given on the command line into the manifest's maps.
    /// Command line entries replace manifest entries with the same label.
    pub fn merge(
        self,
        deps: Vec<(String, String)>,
        images: Vec<(String, String)>,
    ) -> (HashMap<String, String>, HashMap<String, String>) {
        fn overlay(
            kind: &str,
            mut base: HashMap<String, String>,
            entries: Vec<(String, String)>,
        ) -> HashMap<String, String> {
            for (label, path) in entries {
                if let Some(old) = base.insert(label.clone(), path) {
                    debug!("{} entry {} overrides {}", kind, label, old);
                }
            }
            base
        }

        (
            overlay("dep", self.deps.into_iter().collect(), deps),
            overlay("image", self.images.into_iter().collect(), images),
        )
    }
}


#[test]
fn test_manifest_from_yaml() {
    let m = Manifest::from_yaml("deps:\n  \"a:bar\": a/bar.md\nimages:\n  \"a:foo\": a/foo.jpg\n").unwrap();
    assert_eq!(m.deps.get("a:bar").map(String::as_str), Some("a/bar.md"));
    assert_eq!(m.images.get("a:foo").map(String::as_str), Some("a/foo.jpg"));
}

#[test]
fn test_manifest_from_json_defaults() {
    let m = Manifest::from_json(r#"{"deps": {"a:bar": "a/bar.md"}}"#).unwrap();
    assert_eq!(m.deps.len(), 1);
    assert!(m.images.is_empty());
}

#[test]
fn test_manifest_rejects_bad_input() {
    match Manifest::from_json(r#"{"dependencies": {}}"#) {
        Err(StitchError::JSONParseError(_)) => {}
        other => panic!("unexpected result: {:?}", other),
    }
    match Manifest::from_json(r#"{"images": {"a:foo": ""}}"#) {
        Err(StitchError::InvalidArgument(msg)) => assert!(msg.contains("a:foo")),
        other => panic!("unexpected result: {:?}", other),
    }
}

#[test]
fn test_manifest_merge_prefers_command_line() {
    let m = Manifest::from_json(r#"{"deps": {"a:bar": "old.md", "a:baz": "a/baz.md"}}"#).unwrap();
    let (deps, images) = m.merge(
        vec![("a:bar".to_string(), "new.md".to_string())],
        vec![("a:foo".to_string(), "a/foo.jpg".to_string())],
    );
    assert_eq!(deps.len(), 2);
    assert_eq!(deps["a:bar"], "new.md");
    assert_eq!(images["a:foo"], "a/foo.jpg");
}
