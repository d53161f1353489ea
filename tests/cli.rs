//! Tests for the cmdroute binary.

use std::fs;
use std::path::PathBuf;
use std::process::{Command, Output};

use tempfile::TempDir;

const TREE: &str = r#"
name = "git"
description = "Version control"

[[children]]
name = "remote"
description = "Manage remotes"

[[children.children]]
name = "add"
run = "remote-add"
arguments = [{ name = "name" }, { name = "url", required = false }]
flags = [{ name = "force", aliases = ["f"] }]
options = [{ name = "fetch" }]

[[children.children]]
name = "list"
run = "remote-list"
default = true

[[children]]
name = "gc"
run = "gc"
permission = 7
"#;

struct Fixture {
    _dir: TempDir,
    config: PathBuf,
    tree: PathBuf,
}

fn fixture() -> Fixture {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("config.toml");
    let tree = dir.path().join("tree.toml");
    fs::write(&config, "").unwrap();
    fs::write(&tree, TREE).unwrap();
    Fixture {
        _dir: dir,
        config,
        tree,
    }
}

fn cmdroute(fixture: &Fixture, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_cmdroute"))
        .arg("--config")
        .arg(&fixture.config)
        .args(args)
        .env_remove("CMDROUTE_LOG")
        .output()
        .expect("Failed to execute command")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

#[test]
fn lex_prints_pieces_as_json() {
    let f = fixture();
    let output = cmdroute(&f, &["lex", r#"say "hello world""#]);
    assert!(output.status.success());

    let pieces: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(pieces[0]["value"], "say");
    assert_eq!(pieces[1]["value"], "hello world");
    assert_eq!(pieces[1]["quoted"], true);
}

#[test]
fn classify_uses_config_allow_lists() {
    let f = fixture();
    fs::write(&f.config, "[strategy]\nflags = [\"force\"]\noptions = true\n").unwrap();
    let output = cmdroute(&f, &["classify", "a --force --other --n=1"]);
    assert!(output.status.success());

    let parsed: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(parsed["flags"], serde_json::json!(["force"]));
    assert_eq!(parsed["options"]["n"], serde_json::json!(["1"]));
    assert_eq!(parsed["positionals"][1]["value"], "--other");
}

#[test]
fn dispatch_echoes_leaf_arguments() {
    let f = fixture();
    let tree = f.tree.to_str().unwrap();
    let output = cmdroute(
        &f,
        &["dispatch", "remote add origin -f --fetch=all", "--tree", tree, "--caller", "ci"],
    );
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));

    let echoed: serde_json::Value = serde_json::from_str(stdout(&output).trim()).unwrap();
    assert_eq!(echoed["positionals"], serde_json::json!(["origin"]));
    assert_eq!(echoed["flags"], serde_json::json!(["f"]));
    assert_eq!(echoed["options"]["fetch"], serde_json::json!(["all"]));
    assert_eq!(echoed["caller"], "ci");
}

#[test]
fn dispatch_json_reports_path() {
    let f = fixture();
    let tree = f.tree.to_str().unwrap();
    let output = cmdroute(&f, &["dispatch", "remote", "--tree", tree, "--json"]);
    assert!(output.status.success());

    let outcome: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(outcome["outcome"], "ran");
    assert_eq!(outcome["path"], serde_json::json!(["remote", "list"]));
}

#[test]
fn user_errors_exit_with_code_one() {
    let f = fixture();
    let tree = f.tree.to_str().unwrap();
    let output = cmdroute(&f, &["dispatch", "gc", "--tree", tree, "--level", "1"]);
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("[Preconditions.PermissionLevel]"), "stderr: {stderr}");

    let output = cmdroute(&f, &["dispatch", "gc", "--tree", tree, "--level", "7"]);
    assert!(output.status.success());
}

#[test]
fn help_renders_group_listing() {
    let f = fixture();
    let tree = f.tree.to_str().unwrap();
    let output = cmdroute(&f, &["help", "remote", "--tree", tree]);
    assert!(output.status.success());

    let text = stdout(&output);
    assert!(text.starts_with("Usage: git remote <subcommand>"));
    assert!(text.contains("Manage remotes"));
    assert!(text.contains("  list [default]"));
}

#[test]
fn help_for_unknown_path_fails() {
    let f = fixture();
    let tree = f.tree.to_str().unwrap();
    let output = cmdroute(&f, &["help", "nope", "--tree", tree]);
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("SubcommandNotFound"));
}

#[test]
fn invalid_config_is_reported() {
    let f = fixture();
    fs::write(&f.config, "[help]\nline_budget = 0\n").unwrap();
    let output = cmdroute(&f, &["lex", "a"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("line_budget"));
}

#[test]
fn help_subcommand_is_ours_and_help_flag_still_works() {
    let f = fixture();
    let output = cmdroute(&f, &["lex", "a b"]);
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));

    let output = cmdroute(&f, &["--help"]);
    assert!(output.status.success());
    let text = stdout(&output);
    assert!(text.contains("dispatch"));
    assert!(text.contains("Print help for a path in a command tree manifest"));
}
