//! Tests for the `list` and `config` CLI commands

use crate::common::{assert_json_type, assert_valid_json, TestRepo};

#[test]
fn test_list_text() {
    let repo = TestRepo::new();
    repo.add_suite("test_vote", &["votingRoundNotCreated", "firstAndFinalVotes"], &[])
        .add_suite("test_undo", &["undoWhenNoVotingRound"], &[])
        .add_file("testing.cpp", "void helper() {}\n");

    let output = repo.run_cli_success(&["list"]);
    assert!(output.contains("suites_found: 2"), "output: {}", output);
    assert!(output.contains("suite: test_undo"));
    assert!(output.contains("  firstAndFinalVotes (line"));
    assert!(!output.contains("helper"));

    // Sorted by stem
    let undo = output.find("suite: test_undo").unwrap();
    let vote = output.find("suite: test_vote").unwrap();
    assert!(undo < vote);
}

#[test]
fn test_list_does_not_need_descriptor() {
    let repo = TestRepo::new();
    repo.add_suite("test_vote", &["a"], &[]);
    repo.run_cli_success(&["ls"]);
}

#[test]
fn test_list_json() {
    let repo = TestRepo::new();
    repo.add_suite("test_vote", &["a", "b"], &[]);

    let output = repo.run_cli_success(&["list", "-f", "json", "--root", &repo.path_str()]);
    let json = assert_valid_json(&output, "list json");
    assert_json_type(&json, "suite_list");
    assert_eq!(json["count"], 1);

    let suite = &json["suites"][0];
    assert_eq!(suite["stem"], "test_vote");
    assert_eq!(suite["tests"][1]["name"], "b");
    assert_eq!(suite["tests"][1]["function"], "b");
    assert!(suite["tests"][1]["line"].as_u64().unwrap() > 0);
}

#[test]
fn test_list_with_strip_prefix_config() {
    let repo = TestRepo::new();
    repo.add_file(
        "test_math.cpp",
        "void test_add(){}\nvoid test_sub(){}\nvoid helper(){}\n",
    )
    .add_file("registrar.toml", "[extract]\nstrip_prefix = \"test_\"\n");

    let output = repo.run_cli_success(&["list", "-f", "json"]);
    let json = assert_valid_json(&output, "list stripped");
    let names: Vec<_> = json["suites"][0]["tests"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["name"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(names, vec!["add", "sub"]);
}

#[test]
fn test_list_empty_directory() {
    let repo = TestRepo::new();
    let output = repo.run_cli_success(&["list"]);
    assert!(output.contains("No files matching test_*.cpp found."));
}

#[test]
fn test_config_shows_overrides() {
    let repo = TestRepo::new();
    let output = repo.run_cli_success(&["config", "--layout", "list-append", "--synthesize"]);
    assert!(output.contains("layout = \"list-append\""), "output: {}", output);
    assert!(output.contains("synthesize = true"), "output: {}", output);
}

#[test]
fn test_explicit_missing_config_file_fails() {
    let repo = TestRepo::new();
    let (code, _stdout, stderr) = repo.run_cli_failure(&["list", "--config", "nope.toml"]);
    assert_eq!(code, Some(2));
    assert!(stderr.contains("nope.toml"));
}
