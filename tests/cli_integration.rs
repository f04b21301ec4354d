//! Integration tests for the `dv` CLI.
//!
//! Each test creates a temp collection directory, runs `dv` as a subprocess,
//! and verifies stdout and/or file contents.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use pretty_assertions::assert_eq;

/// Get the path to the built `dv` binary.
fn dv_bin() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_dv"))
}

const SAMPLE_COLLECTION: &str = r#"# Test collection
current = 3

[[decks]]
id = 1
name = "Default"

[[decks]]
id = 2
name = "Spanish"
new = 2
learn = 2
review = 6
cards = 120

[[decks]]
id = 3
name = "Spanish::Verbs"
new = 3
review = 4
cards = 40

[[decks]]
id = 4
name = "French"
new = 1
collapsed = true # keep grammar out of the way

[[decks]]
id = 5
name = "French::Grammar"
new = 2

[[decks]]
id = 6
name = "Anatomy"
review = 1
filtered = true
"#;

/// Create a test collection in the given directory.
fn create_test_collection(root: &Path) {
    write_collection(root, SAMPLE_COLLECTION);
}

fn write_collection(root: &Path, text: &str) {
    let dir = root.join("deckview");
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("collection.toml"), text).unwrap();
}

fn read_collection(root: &Path) -> String {
    fs::read_to_string(root.join("deckview/collection.toml")).unwrap()
}

/// Run `dv` with the given args in the given directory, returning (stdout, stderr, success).
fn run_dv(dir: &Path, args: &[&str]) -> (String, String, bool) {
    let output = Command::new(dv_bin())
        .args(args)
        .current_dir(dir)
        .env_remove("DV_LOG")
        .output()
        .expect("failed to run dv");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    (stdout, stderr, output.status.success())
}

/// Run `dv` expecting success, return stdout.
fn run_dv_ok(dir: &Path, args: &[&str]) -> String {
    let (stdout, stderr, success) = run_dv(dir, args);
    if !success {
        panic!(
            "dv {:?} failed:\nstdout: {}\nstderr: {}",
            args, stdout, stderr
        );
    }
    stdout
}

/// Run `dv` expecting failure, return stderr.
fn run_dv_err(dir: &Path, args: &[&str]) -> String {
    let (stdout, stderr, success) = run_dv(dir, args);
    if success {
        panic!("dv {:?} unexpectedly succeeded:\nstdout: {}", args, stdout);
    }
    stderr
}

// ---------------------------------------------------------------------------
// Read command tests
// ---------------------------------------------------------------------------

#[test]
fn test_list() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_collection(tmp.path());

    let out = run_dv_ok(tmp.path(), &["list"]);
    assert_eq!(
        out,
        "   Anatomy     0    0    1\n \
         + French      3    0    0\n \
         - Spanish     5    2   10\n\
         *    Verbs     3    0    4\n\
         \n\
         Due: 21 cards (~7 min)\n"
    );
}

#[test]
fn test_list_json() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_collection(tmp.path());

    let out = run_dv_ok(tmp.path(), &["list", "--json"]);
    let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
    let ids: Vec<i64> = parsed["rows"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["id"].as_i64().unwrap())
        .collect();
    assert_eq!(ids, vec![6, 4, 2, 3]);
    assert_eq!(parsed["totals"]["new"], 8);
    assert_eq!(parsed["total_due"], 21);
    assert_eq!(parsed["eta_minutes"], 7);
    assert_eq!(parsed["has_subdecks"], true);
}

#[test]
fn test_list_from_subdirectory() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_collection(tmp.path());
    let nested = tmp.path().join("notes/week1");
    fs::create_dir_all(&nested).unwrap();

    let out = run_dv_ok(&nested, &["list"]);
    assert!(out.contains("Spanish"));
}

#[test]
fn test_list_with_collection_dir_flag() {
    let tmp = tempfile::TempDir::new().unwrap();
    let elsewhere = tempfile::TempDir::new().unwrap();
    create_test_collection(tmp.path());

    let dir = tmp.path().to_str().unwrap();
    let out = run_dv_ok(elsewhere.path(), &["-C", dir, "list"]);
    assert!(out.contains("Anatomy"));
}

#[test]
fn test_list_shows_sole_default_deck() {
    let tmp = tempfile::TempDir::new().unwrap();
    write_collection(tmp.path(), "[[decks]]\nid = 1\nname = \"Default\"\n");

    let out = run_dv_ok(tmp.path(), &["list"]);
    assert_eq!(out, "* Default     0    0    0\n\nDue: 0 cards (~0 min)\n");
}

#[test]
fn test_list_empty_collection() {
    let tmp = tempfile::TempDir::new().unwrap();
    write_collection(tmp.path(), "");

    let out = run_dv_ok(tmp.path(), &["list"]);
    assert_eq!(out, "No decks.\n");
}

#[test]
fn test_find_visible_deck() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_collection(tmp.path());

    let out = run_dv_ok(tmp.path(), &["find", "spanish::verbs"]);
    assert_eq!(out, "3: Spanish::Verbs\n");
}

#[test]
fn test_find_visible_deck_with_loose_spelling() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_collection(tmp.path());

    let out = run_dv_ok(tmp.path(), &["find", "spanish :: verbs"]);
    assert_eq!(out, "3: Spanish::Verbs\n");
}

#[test]
fn test_find_hidden_deck_uses_parent() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_collection(tmp.path());

    let out = run_dv_ok(tmp.path(), &["find", "French::Grammar"]);
    assert_eq!(out, "1: French (\"French::Grammar\" is hidden)\n");

    let out = run_dv_ok(tmp.path(), &["find", "5", "--json"]);
    let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(parsed["deck"], 5);
    assert_eq!(parsed["index"], 1);
    assert_eq!(parsed["row"], 4);
}

#[test]
fn test_find_unknown_id_falls_back_to_first_row() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_collection(tmp.path());

    let out = run_dv_ok(tmp.path(), &["find", "999"]);
    assert_eq!(out, "0: Anatomy (\"999\" is hidden)\n");
}

#[test]
fn test_find_unknown_name_fails() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_collection(tmp.path());

    let err = run_dv_err(tmp.path(), &["find", "Geology"]);
    assert!(err.contains("deck not found: Geology"));
}

#[test]
fn test_due() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_collection(tmp.path());

    let out = run_dv_ok(tmp.path(), &["due"]);
    assert_eq!(out, "new: 8\nlearn: 2\nreview: 11\nDue: 21 cards (~7 min)\n");

    let out = run_dv_ok(tmp.path(), &["due", "--json"]);
    let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(parsed["new"], 8);
    assert_eq!(parsed["total"], 21);
    assert_eq!(parsed["eta_minutes"], 7);
}

// ---------------------------------------------------------------------------
// Write command tests
// ---------------------------------------------------------------------------

#[test]
fn test_collapse_hides_subdecks() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_collection(tmp.path());

    let out = run_dv_ok(tmp.path(), &["collapse", "Spanish"]);
    assert_eq!(out, "Collapsed Spanish\n");

    let out = run_dv_ok(tmp.path(), &["list"]);
    assert!(out.contains(" + Spanish"));
    assert!(!out.contains("Verbs"));

    // The current deck is hidden, so it resolves to its parent's row
    let out = run_dv_ok(tmp.path(), &["find", "3"]);
    assert_eq!(out, "2: Spanish (\"3\" is hidden)\n");

    let text = read_collection(tmp.path());
    assert!(text.starts_with("# Test collection\n"));
    assert!(text.contains("collapsed = true # keep grammar out of the way"));
}

#[test]
fn test_expand_shows_subdecks() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_collection(tmp.path());

    run_dv_ok(tmp.path(), &["expand", "french"]);
    let out = run_dv_ok(tmp.path(), &["list"]);
    assert!(out.contains(" - French"));
    assert!(out.contains("Grammar"));
}

#[test]
fn test_toggle_round_trips() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_collection(tmp.path());

    assert_eq!(run_dv_ok(tmp.path(), &["toggle", "4"]), "Expanded French\n");
    assert_eq!(run_dv_ok(tmp.path(), &["toggle", "4"]), "Collapsed French\n");
}

#[test]
fn test_collapse_unknown_deck_fails() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_collection(tmp.path());

    let err = run_dv_err(tmp.path(), &["collapse", "Geology"]);
    assert!(err.contains("deck not found: Geology"));
    assert_eq!(read_collection(tmp.path()), SAMPLE_COLLECTION);
}

#[test]
fn test_select_moves_current_marker() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_collection(tmp.path());

    assert_eq!(run_dv_ok(tmp.path(), &["select", "Anatomy"]), "Selected Anatomy\n");
    let out = run_dv_ok(tmp.path(), &["list"]);
    assert!(out.starts_with("*  Anatomy"));
    assert!(out.contains("\n     Verbs"));
}

// ---------------------------------------------------------------------------
// Init and error tests
// ---------------------------------------------------------------------------

#[test]
fn test_init_creates_collection() {
    let tmp = tempfile::TempDir::new().unwrap();

    let out = run_dv_ok(tmp.path(), &["init", "--deck", "Music::Theory"]);
    assert!(out.contains("Initialized collection"));
    assert!(out.contains("deck: Music (2)"));
    assert!(out.contains("deck: Music::Theory (3)"));

    // Empty default deck is hidden next to Music
    let out = run_dv_ok(tmp.path(), &["list"]);
    assert!(!out.contains("Default"));
    assert!(out.contains("Theory"));
}

#[test]
fn test_init_refuses_existing_collection() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_collection(tmp.path());

    let err = run_dv_err(tmp.path(), &["init"]);
    assert!(err.contains("already exists"));
    assert_eq!(read_collection(tmp.path()), SAMPLE_COLLECTION);

    run_dv_ok(tmp.path(), &["init", "--force"]);
    let out = run_dv_ok(tmp.path(), &["list"]);
    assert!(out.contains("Default"));
}

#[test]
fn test_no_collection_fails() {
    let tmp = tempfile::TempDir::new().unwrap();

    let err = run_dv_err(tmp.path(), &["list"]);
    assert!(err.contains("not a deck collection"));
}

#[test]
fn test_missing_parent_fails() {
    let tmp = tempfile::TempDir::new().unwrap();
    write_collection(tmp.path(), "[[decks]]\nid = 2\nname = \"Lang::French\"\n");

    let err = run_dv_err(tmp.path(), &["list"]);
    assert!(err.contains("deck \"Lang::French\" has no parent deck \"Lang\""));
}
