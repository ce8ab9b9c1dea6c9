//! Tests for the `sync` CLI command
//!
//! The sync command rewrites the generated blocks:
//! - `sync` (or no subcommand) - Patch CMakeLists.txt and every suite file
//! - `sync --dry-run` - Report without writing
//! - `sync --layout list-append` - Patch `list(APPEND test_cases ...)` blocks
//! - `sync --insert-missing --synthesize` - Register new suites from scratch

use crate::common::{
    assert_block_after, assert_valid_json, dispatched_names, suite_entry, suite_source, TestRepo,
};

// ============================================================================
// INLINE LAYOUT
// ============================================================================

#[test]
fn test_sync_updates_descriptor_and_suite() {
    let repo = TestRepo::new();
    repo.with_inline_cmake(&[("test_vote", &["removedTest"])])
        .add_suite(
            "test_vote",
            &["votingRoundNotCreated", "firstAndFinalVotes"],
            &["removedTest"],
        );

    let output = repo.run_cli_success(&["sync", "--root", &repo.path_str()]);
    assert!(output.contains("changed_files: 2"), "output: {}", output);

    let cmake = repo.read_file("CMakeLists.txt");
    assert_block_after(
        &cmake,
        "addTestSuite(test_vote",
        &["votingRoundNotCreated", "firstAndFinalVotes"],
    );
    assert_eq!(
        dispatched_names(&repo.read_file("test_vote.cpp")),
        vec!["votingRoundNotCreated", "firstAndFinalVotes"]
    );
}

#[test]
fn test_no_subcommand_defaults_to_sync() {
    let repo = TestRepo::new();
    repo.with_inline_cmake(&[("test_undo", &[])])
        .add_suite("test_undo", &["undoWhenNoVotingRound"], &[]);

    // Runs from the repo directory without --root
    repo.run_cli_success(&[]);

    assert_block_after(
        &repo.read_file("CMakeLists.txt"),
        "addTestSuite(test_undo",
        &["undoWhenNoVotingRound"],
    );
}

#[test]
fn test_sync_is_idempotent() {
    let repo = TestRepo::new();
    repo.with_inline_cmake(&[("test_vote", &[]), ("test_undo", &[])])
        .add_suite("test_vote", &["a", "b"], &[])
        .add_suite("test_undo", &["c"], &["stale"]);

    repo.run_cli_success(&["sync"]);
    let cmake = repo.read_file("CMakeLists.txt");
    let vote = repo.read_file("test_vote.cpp");

    let output = repo.run_cli_success(&["sync"]);
    assert!(output.contains("changed_files: 0"), "output: {}", output);
    assert_eq!(repo.read_file("CMakeLists.txt"), cmake);
    assert_eq!(repo.read_file("test_vote.cpp"), vote);
}

#[test]
fn test_sync_only_touches_generated_blocks() {
    let repo = TestRepo::new();
    repo.with_inline_cmake(&[("test_vote", &["a", "b"])])
        .add_suite("test_vote", &["a", "b"], &["a", "b"]);
    let before = repo.read_file("test_vote.cpp");
    assert_eq!(before, suite_source("test_vote", &["a", "b"], &["a", "b"]));

    repo.run_cli_success(&["sync"]);
    assert_eq!(repo.read_file("test_vote.cpp"), before);
}

#[test]
fn test_sync_empties_blocks_for_suite_without_tests() {
    let repo = TestRepo::new();
    repo.with_inline_cmake(&[("test_vote", &["gone"])])
        .add_suite("test_vote", &[], &["gone"]);

    repo.run_cli_success(&["sync"]);

    assert_block_after(&repo.read_file("CMakeLists.txt"), "addTestSuite(test_vote", &[]);
    assert!(dispatched_names(&repo.read_file("test_vote.cpp")).is_empty());
}

#[test]
fn test_sync_dry_run_writes_nothing() {
    let repo = TestRepo::new();
    repo.with_inline_cmake(&[("test_vote", &[])])
        .add_suite("test_vote", &["a"], &[]);
    let cmake = repo.read_file("CMakeLists.txt");
    let suite = repo.read_file("test_vote.cpp");

    let output = repo.run_cli_success(&["sync", "--dry-run"]);
    assert!(output.contains("dry run"), "output: {}", output);
    assert_eq!(repo.read_file("CMakeLists.txt"), cmake);
    assert_eq!(repo.read_file("test_vote.cpp"), suite);
}

// ============================================================================
// FAILURES
// ============================================================================

#[test]
fn test_unregistered_suite_reports_failure_and_continues() {
    let repo = TestRepo::new();
    repo.with_inline_cmake(&[("test_vote", &[])])
        .add_suite("test_vote", &["a"], &[])
        .add_suite("test_undo", &["b"], &[]);
    let (code, stdout, stderr) = repo.run_cli_failure(&["sync", "-f", "json"]);

    assert_eq!(code, Some(3));
    assert!(
        stderr.contains("No match found for 'test_undo'"),
        "stderr: {}",
        stderr
    );

    let json = assert_valid_json(&stdout, "sync with missing anchor");
    assert_eq!(suite_entry(&json, "test_undo")["descriptor"]["status"], "failed");
    assert_eq!(suite_entry(&json, "test_vote")["descriptor"]["status"], "updated");

    let cmake = repo.read_file("CMakeLists.txt");
    assert!(!cmake.contains("test_undo"));
    assert_block_after(&cmake, "addTestSuite(test_vote", &["a"]);
}

#[test]
fn test_missing_descriptor_is_io_error() {
    let repo = TestRepo::new();
    repo.add_suite("test_vote", &["a"], &[]);

    let (code, _stdout, stderr) = repo.run_cli_failure(&["sync"]);
    assert_eq!(code, Some(1));
    assert!(stderr.contains("CMakeLists.txt"), "stderr: {}", stderr);
}

#[test]
fn test_invalid_config_is_config_error() {
    let repo = TestRepo::new();
    repo.with_inline_cmake(&[])
        .add_file("registrar.toml", "[suite_patch]\ndispatch_template = \"RUN();\"\n");

    let (code, _stdout, stderr) = repo.run_cli_failure(&["sync"]);
    assert_eq!(code, Some(2));
    assert!(stderr.contains("dispatch_template"), "stderr: {}", stderr);
}

#[test]
fn test_entry_template_with_paren_is_rejected_before_writing() {
    let repo = TestRepo::new();
    repo.with_inline_cmake(&[("test_vote", &[])])
        .add_suite("test_vote", &["a", "b"], &[])
        .add_file("registrar.toml", "[descriptor_patch]\nentry_template = \"add({test})\"\n");
    let before = repo.read_file("CMakeLists.txt");

    let (code, _stdout, stderr) = repo.run_cli_failure(&["sync"]);
    assert_eq!(code, Some(2));
    assert!(stderr.contains("entry_template"), "stderr: {}", stderr);
    assert_eq!(repo.read_file("CMakeLists.txt"), before);
}

// ============================================================================
// VARIANTS
// ============================================================================

#[test]
fn test_sync_list_append_layout() {
    let repo = TestRepo::new();
    repo.with_list_append_cmake(&[("test_vote", &["old"]), ("test_undo", &["keep"])])
        .add_suite("test_vote", &["fresh"], &[])
        .add_suite("test_undo", &["keep"], &["keep"]);

    repo.run_cli_success(&["sync", "--layout", "list-append"]);

    let cmake = repo.read_file("CMakeLists.txt");
    assert!(
        cmake.starts_with("set(test_cases)\nlist(APPEND test_cases\n\tfresh\n)\naddTestSuite(test_vote"),
        "cmake:\n{}",
        cmake
    );
    assert!(cmake.contains("list(APPEND test_cases\n\tkeep\n)\naddTestSuite(test_undo"));
}

#[test]
fn test_sync_layout_from_config_file() {
    let repo = TestRepo::new();
    repo.with_list_append_cmake(&[("test_vote", &[])])
        .add_suite("test_vote", &["fresh"], &[])
        .add_file("registrar.toml", "[descriptor_patch]\nlayout = \"list-append\"\n");

    repo.run_cli_success(&["sync"]);
    assert!(repo
        .read_file("CMakeLists.txt")
        .contains("list(APPEND test_cases\n\tfresh\n)"));
}

#[test]
fn test_sync_by_argv_dispatch() {
    let repo = TestRepo::new();
    repo.with_inline_cmake(&[("test_vote", &[])]).add_file(
        "test_vote.cpp",
        "namespace\n{\nvoid a() {}\n}\n\nauto run_tests(char* argv[]) -> int {\n\treturn 1;\n}\n",
    );

    repo.run_cli_success(&["sync", "--dispatch", "by-argv"]);
    assert_eq!(
        repo.read_file("test_vote.cpp"),
        "namespace\n{\nvoid a() {}\n}\n\nauto run_tests(char* argv[]) -> int {\n\tRUN_TEST_IF_ARGUMENT_EQUALS(a);\n\treturn 1;\n}\n"
    );
}

#[test]
fn test_sync_registers_and_scaffolds_new_suite() {
    let repo = TestRepo::new();
    repo.with_inline_cmake(&[("test_vote", &["a"])])
        .add_suite("test_vote", &["a"], &["a"])
        .add_legacy_suite("test_undo", &["undoWhenNoVotingRound", "undoWhenVotesExist"]);

    let output =
        repo.run_cli_success(&["sync", "--insert-missing", "--synthesize", "-f", "json"]);
    let json = assert_valid_json(&output, "sync new suite");
    let undo = suite_entry(&json, "test_undo");
    assert_eq!(undo["descriptor"]["status"], "inserted");
    assert_eq!(undo["suite_file"]["status"], "synthesized");

    assert_block_after(
        &repo.read_file("CMakeLists.txt"),
        "addTestSuite(test_undo",
        &["undoWhenNoVotingRound", "undoWhenVotesExist"],
    );

    let source = repo.read_file("test_undo.cpp");
    assert!(!source.contains("int main()"));
    assert!(source.contains("} // namespace\n\nauto test_undo(std::string const& test_case) -> int {"));
    assert_eq!(
        dispatched_names(&source),
        vec!["undoWhenNoVotingRound", "undoWhenVotesExist"]
    );

    // A second run settles
    let output = repo.run_cli_success(&["sync", "--insert-missing", "--synthesize"]);
    assert!(output.contains("changed_files: 0"), "output: {}", output);
}
