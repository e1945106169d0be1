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
use std::collections::BTreeSet;

/// Compares the labels a document used with the labels its caller declared.
///
/// Returns `None` when the two sets are equal, and otherwise a single
/// multi-line message listing each side of the difference.
pub fn audit(used: &BTreeSet<String>, declared: &BTreeSet<String>, kind: &str) -> Option<String> {
    if used == declared {
        return None;
    }

    let mut msg = vec![format!("Used {} do not match declared {}", kind, kind)];
    let used_only: Vec<&String> = used.difference(declared).collect();
    if !used_only.is_empty() {
        msg.push("Used but not declared".to_string());
        msg.extend(used_only.iter().map(|d| format!("  //{}", d)));
    }
    let declared_only: Vec<&String> = declared.difference(used).collect();
    if !declared_only.is_empty() {
        msg.push("Declared but not used".to_string());
        msg.extend(declared_only.iter().map(|d| format!("  //{}", d)));
    }
    Some(msg.join("\n"))
}


#[cfg(test)]
fn set(items: &[&str]) -> BTreeSet<String> {
    items.iter().map(|s| s.to_string()).collect()
}

#[test]
fn test_audit_equal() {
    assert_eq!(audit(&set(&["a:a", "a:b"]), &set(&["a:b", "a:a"]), "deps"), None);
    assert_eq!(audit(&set(&[]), &set(&[]), "deps"), None);
}

#[test]
fn test_audit_used_but_not_declared() {
    assert_eq!(
        audit(&set(&["a:a", "a:b"]), &set(&["a:a"]), "deps").unwrap(),
        "Used deps do not match declared deps\nUsed but not declared\n  //a:b"
    );
}

#[test]
fn test_audit_declared_but_not_used() {
    assert_eq!(
        audit(&set(&["a:a"]), &set(&["a:a", "a:b"]), "images").unwrap(),
        "Used images do not match declared images\nDeclared but not used\n  //a:b"
    );
}

#[test]
fn test_audit_both_directions() {
    assert_eq!(
        audit(&set(&["a:a", "a:c"]), &set(&["a:a", "a:d"]), "deps").unwrap(),
        "Used deps do not match declared deps\nUsed but not declared\n  //a:c\nDeclared but not used\n  //a:d"
    );
}
