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
use std::path::Path;
use std::process::{Command, Output};

use pretty_assertions::assert_eq;
use tempfile::TempDir;

const GOOD: &str = "Foo bar.

!include {}

!include {}

An image ![foo]({} \"bar\"){.baz} goes here.
";

fn fill(include1: &str, include2: &str, image: &str) -> String {
    GOOD.replacen("{}", include1, 1)
        .replacen("{}", include2, 1)
        .replacen("{}", image, 1)
}

fn preprocess(dir: &Path, content: &str, args: &[&str]) -> Output {
    let in_file = dir.join("in.md");
    fs::write(&in_file, content).unwrap();
    Command::new(env!("CARGO_BIN_EXE_md-preprocess"))
        .arg(&in_file)
        .arg(dir.join("out.md"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .unwrap()
}

#[test]
fn preprocess_resolves_labels() {
    let dir = TempDir::new().unwrap();
    let out = preprocess(
        dir.path(),
        &fill(":bar", "//baz:quux", ":foo"),
        &[
            "a",
            "--dep",
            "a:bar",
            "a/bar.json",
            "--dep",
            "baz:quux",
            "baz/quux.json",
            "--image",
            "a:foo",
            "a/foo.jpg",
        ],
    );
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));
    assert_eq!(
        fs::read_to_string(dir.path().join("out.md")).unwrap(),
        fill("a/bar.json", "baz/quux.json", "a/foo.jpg")
    );
}

#[test]
fn preprocess_root_package() {
    let dir = TempDir::new().unwrap();
    let out = preprocess(
        dir.path(),
        &fill(":bar", "//baz:quux", ":foo"),
        &[
            "",
            "--dep",
            ":bar",
            "bar.json",
            "--dep",
            "baz:quux",
            "baz/quux.json",
            "--image",
            ":foo",
            "foo.jpg",
        ],
    );
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));
    assert_eq!(
        fs::read_to_string(dir.path().join("out.md")).unwrap(),
        fill("bar.json", "baz/quux.json", "foo.jpg")
    );
}

#[test]
fn preprocess_with_manifest() {
    let dir = TempDir::new().unwrap();
    let manifest = dir.path().join("deps.yaml");
    fs::write(
        &manifest,
        "deps:\n  \"a:bar\": a/bar.json\n  \"baz:quux\": stale.json\nimages:\n  \"a:foo\": a/foo.jpg\n",
    )
    .unwrap();
    let out = preprocess(
        dir.path(),
        &fill(":bar", "//baz:quux", ":foo"),
        &[
            "a",
            "--manifest",
            manifest.to_str().unwrap(),
            "--dep",
            "baz:quux",
            "baz/quux.json",
        ],
    );
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));
    assert_eq!(
        fs::read_to_string(dir.path().join("out.md")).unwrap(),
        fill("a/bar.json", "baz/quux.json", "a/foo.jpg")
    );
}

#[test]
fn preprocess_fails_without_output() {
    let dir = TempDir::new().unwrap();
    let out = preprocess(dir.path(), "!include", &["a"]);
    assert_eq!(out.status.code(), Some(1));
    assert!(!dir.path().join("out.md").exists());
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.starts_with("ERROR: markdown preprocessing failed\n\nrow 1 col 1: "));
    assert!(stderr.contains("Include statement must be followed by a space: !include"));
}

#[test]
fn preprocess_reports_lint_and_audit_problems() {
    let dir = TempDir::new().unwrap();
    let out = preprocess(
        dir.path(),
        "Fine.\nA “quote” here.\n",
        &["a", "--dep", "a:unused", "a/unused.md"],
    );
    assert_eq!(out.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert_eq!(
        stderr,
        "ERROR: markdown preprocessing failed\n\n\
row 2 col 3: Literal curly quotes must be backslash-escaped\n\n\
row 1 col 1: Used deps do not match declared deps\nDeclared but not used\n  //a:unused\n\n"
    );
}

#[test]
fn preprocess_json_output() {
    let dir = TempDir::new().unwrap();
    let out = preprocess(dir.path(), "![x](:nope)\n", &["a", "--json"]);
    assert_eq!(out.status.code(), Some(1));
    let json: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(json["ok"], false);
    let problems = json["problems"].as_array().unwrap();
    assert_eq!(problems.len(), 2);
    assert_eq!(problems[0]["kind"], "unresolved_reference");
    assert_eq!(problems[1]["kind"], "dependency_mismatch");
}

#[test]
fn preprocess_rejects_empty_label_or_path() {
    let cases: [&[&str]; 3] = [
        &["a", "--dep", "", ""],
        &["a", "--dep", "a:bar", ""],
        &["a", "--image", "", "a/x.jpg"],
    ];
    for args in cases.iter() {
        let dir = TempDir::new().unwrap();
        let out = preprocess(dir.path(), "x\n", args);
        assert_eq!(out.status.code(), Some(2), "{:?}", args);
        assert!(!dir.path().join("out.md").exists());
    }
}

#[test]
fn preprocess_rejects_empty_file_arguments() {
    let dir = TempDir::new().unwrap();
    let in_file = dir.path().join("in.md");
    fs::write(&in_file, "x\n").unwrap();
    let empty_out = Command::new(env!("CARGO_BIN_EXE_md-preprocess"))
        .arg(&in_file)
        .args(&["", "a"])
        .output()
        .unwrap();
    assert_eq!(empty_out.status.code(), Some(2));
    let empty_in = Command::new(env!("CARGO_BIN_EXE_md-preprocess"))
        .arg("")
        .arg(dir.path().join("out.md"))
        .arg("a")
        .output()
        .unwrap();
    assert_eq!(empty_in.status.code(), Some(2));
    assert!(!dir.path().join("out.md").exists());
}

#[test]
fn preprocess_windows_line_endings() {
    let dir = TempDir::new().unwrap();
    let out = preprocess(
        dir.path(),
        "Intro\r\n!include :bar\r\n![x](:foo)\r\n",
        &["a", "--dep", "a:bar", "a/bar.md", "--image", "a:foo", "a/foo.jpg"],
    );
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));
    assert_eq!(
        fs::read_to_string(dir.path().join("out.md")).unwrap(),
        "Intro\r\n!include a/bar.md\r\n![x](a/foo.jpg)\r\n"
    );
}

#[test]
fn preprocess_rejects_odd_dep_values() {
    let dir = TempDir::new().unwrap();
    let out = preprocess(dir.path(), "x\n", &["a", "--dep", "a:bar"]);
    assert!(!out.status.success());
    assert!(!dir.path().join("out.md").exists());
}

fn lint(dir: &Path, content: &str) -> Output {
    let in_file = dir.join("in.md");
    fs::write(&in_file, content).unwrap();
    Command::new(env!("CARGO_BIN_EXE_md-lint"))
        .arg(&in_file)
        .arg(dir.join("out.txt"))
        .env_remove("RUST_LOG")
        .output()
        .unwrap()
}

#[test]
fn lint_ok() {
    let dir = TempDir::new().unwrap();
    let out = lint(dir.path(), "Foo bar.\n\n\\“Lots \\”of \\‘quotes\\’.\n\nSome -- dashes---\n");
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));
    assert_eq!(fs::read_to_string(dir.path().join("out.txt")).unwrap(), "OK\n");
}

#[test]
fn lint_fails() {
    for bad in &["“", "”", "‘", "’", "–", "—", "…"] {
        let dir = TempDir::new().unwrap();
        let out = lint(dir.path(), bad);
        assert_eq!(out.status.code(), Some(1), "{}", bad);
        assert!(!dir.path().join("out.txt").exists());
        assert!(String::from_utf8_lossy(&out.stderr).starts_with("ERROR: linting failed"));
    }
}
