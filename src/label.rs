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

use crate::errors::LabelError;

/// A canonical reference to a dependency or an image: a slash-separated
/// package (empty for the repository root) and a non-empty target.
///
/// Labels are only constructed by `canonicalise`, which guarantees that both
/// parts are well-formed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Label {
    package: String,
    target: String,
}

impl Label {
    pub fn package(&self) -> &str {
        &self.package
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    /// The `package:target` form used to look labels up in dependency and
    /// image maps.
    pub fn key(&self) -> String {
        format!("{}:{}", self.package, self.target)
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}:{}", self.package, self.target)
    }
}

/// Parses a raw reference against the package of the referencing document.
///
/// Three forms are accepted:
///
/// * `//pkg:target`, absolute; `//:target` names the repository root.
/// * `:target`, relative to `current_package`.
/// * `pkg:target`, where `pkg` is taken literally and is *not* resolved
///   against `current_package`.
pub fn canonicalise(raw: &str, current_package: &str) -> Result<Label, LabelError> {
    if raw.is_empty() {
        return Err(LabelError::Empty);
    }
    validate_package(current_package)?;

    let (absolute, rest) = match raw.strip_prefix("//") {
        Some(rest) => (true, rest),
        None => (false, raw),
    };
    let (package, target) = match rest.split_once(':') {
        Some(parts) => parts,
        None => return Err(LabelError::MissingSeparator(raw.to_string())),
    };
    if target.is_empty() {
        return Err(LabelError::EmptyTarget(raw.to_string()));
    }
    let package = if !absolute && package.is_empty() {
        current_package
    } else {
        package
    };

    validate_package(package)?;
    validate_target(target)?;

    Ok(Label {
        package: package.to_string(),
        target: target.to_string(),
    })
}

fn validate_package(package: &str) -> Result<(), LabelError> {
    fn valid(c: char) -> bool {
        c.is_ascii_alphanumeric() || "/-.@_".contains(c)
    }

    if let Some(ch) = package.chars().find(|&c| !valid(c)) {
        return Err(LabelError::PackageCharacter {
            ch,
            package: package.to_string(),
        });
    }
    check_slashes("packages", package)
}

fn validate_target(target: &str) -> Result<(), LabelError> {
    // ')' would terminate a markdown image reference early, '=' is reserved
    // for key=value arguments.
    fn valid(c: char) -> bool {
        c.is_ascii_alphanumeric() || "%-@^_\"#$&'(*+,;<>?[]{|}~/.".contains(c)
    }

    if let Some(ch) = target.chars().find(|&c| !valid(c)) {
        return Err(LabelError::TargetCharacter {
            ch,
            target: target.to_string(),
        });
    }
    check_slashes("targets", target)?;
    if target.split('/').any(|s| s == "..") {
        return Err(LabelError::Malformed(format!(
            "targets must not contain up-level references '..': {}",
            target
        )));
    }
    if target.split('/').any(|s| s == ".") {
        return Err(LabelError::Malformed(format!(
            "targets must not contain current-directory references '.': {}",
            target
        )));
    }
    Ok(())
}

fn check_slashes(what: &str, s: &str) -> Result<(), LabelError> {
    if s.starts_with('/') {
        return Err(LabelError::Malformed(format!("{} must not start with a '/': {}", what, s)));
    }
    if s.ends_with('/') {
        return Err(LabelError::Malformed(format!("{} must not end with a '/': {}", what, s)));
    }
    if s.contains("//") {
        return Err(LabelError::Malformed(format!("{} must not contain '//': {}", what, s)));
    }
    Ok(())
}


#[cfg(test)]
fn label(package: &str, target: &str) -> Label {
    Label {
        package: package.to_string(),
        target: target.to_string(),
    }
}

#[test]
fn test_validate_package() {
    assert!(validate_package("").is_ok());
    assert!(validate_package("a").is_ok());
    assert!(validate_package("abc/DEF123-.@_").is_ok());

    assert!(validate_package("!").is_err());
    assert!(validate_package("a:b").is_err());
    assert!(validate_package("/a").is_err());
    assert!(validate_package("a/").is_err());
    assert!(validate_package("a//b").is_err());
}

#[test]
fn test_validate_target() {
    assert!(validate_target("a").is_ok());
    assert!(validate_target("abc/DEF123%-@^_\"#$&'(*-+,;<>?[]{|}~/.a").is_ok());

    assert!(validate_target("!").is_err());
    assert!(validate_target("a)").is_err());
    assert!(validate_target("a=b").is_err());
    assert!(validate_target("a:b").is_err());
    assert!(validate_target("/a").is_err());
    assert!(validate_target("a/").is_err());
    assert!(validate_target("a//b").is_err());
    assert!(validate_target("a/../b").is_err());
    assert!(validate_target("a/./b").is_err());
}

#[test]
fn test_canonicalise_rejects_malformed() {
    assert_eq!(canonicalise("", "a"), Err(LabelError::Empty));
    assert_eq!(
        canonicalise("//a", "z"),
        Err(LabelError::MissingSeparator("//a".to_string()))
    );
    assert_eq!(
        canonicalise("a/b", "z"),
        Err(LabelError::MissingSeparator("a/b".to_string()))
    );
    assert_eq!(
        canonicalise("//a:", "z"),
        Err(LabelError::EmptyTarget("//a:".to_string()))
    );
    assert!(canonicalise(":", "a").is_err());
    assert!(canonicalise("//:", "a").is_err());
    assert!(canonicalise("/a:b", "a").is_err());
    assert!(canonicalise("//a:b:c", "a").is_err());
    assert!(canonicalise("a:b:", "foo").is_err());
    assert!(canonicalise(":bar:", "foo").is_err());
    assert!(canonicalise("!:a", "a").is_err());
    assert!(canonicalise(":a", "bad!").is_err());
}

#[test]
fn test_canonicalise() {
    assert_eq!(canonicalise("//a:b", "z").unwrap(), label("a", "b"));
    assert_eq!(canonicalise("//a/b:c/d", "z").unwrap(), label("a/b", "c/d"));
    assert_eq!(canonicalise("//:a", "z").unwrap(), label("", "a"));
    assert_eq!(canonicalise("//:a/b", "z").unwrap(), label("", "a/b"));
    assert_eq!(canonicalise(":a/b", "z").unwrap(), label("z", "a/b"));
    assert_eq!(canonicalise(":a", "").unwrap(), label("", "a"));
    assert_eq!(canonicalise("//a:b", "z").unwrap().key(), "a:b");
    assert_eq!(canonicalise("//:a", "z").unwrap().to_string(), ":a");
}

#[test]
fn test_canonicalise_bare_form_ignores_current_package() {
    // A bare 'pkg:target' is never resolved relative to the current package,
    // unlike ':target'.
    assert_eq!(canonicalise("a/b:c", "z").unwrap(), label("a/b", "c"));
    assert_eq!(canonicalise("b:c", "a").unwrap(), label("b", "c"));
}

#[test]
fn test_canonicalise_is_idempotent_on_keys() {
    for raw in &["a:b", "a/b:c/d", "x-y.z@1_2:t.md"] {
        let first = canonicalise(raw, "p").unwrap();
        for current in &["", "p", "q/r"] {
            assert_eq!(canonicalise(&first.key(), current).unwrap(), first);
        }
    }
}
