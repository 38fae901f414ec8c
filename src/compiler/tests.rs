use std::fs;
use std::path::Path;

use tempfile::TempDir;

use super::{CompileError, StyleCompiler, strip_marker};
use crate::config::{FailurePolicy, test_config_with_script};

/// Stand-in compiler: prints `out.css` to stdout and, if present,
/// `err.txt` to stderr.
const SCRIPT: &str = "cat out.css 2>/dev/null; if [ -f err.txt ]; then cat err.txt >&2; fi";

fn setup() -> (TempDir, StyleCompiler) {
    let temp = TempDir::new().unwrap();
    let config = test_config_with_script(temp.path(), SCRIPT);
    let compiler = StyleCompiler::new(&config);
    (temp, compiler)
}

fn emit(root: &Path, css: &str, err: Option<&str>) {
    fs::write(root.join("out.css"), css).unwrap();
    match err {
        Some(err) => fs::write(root.join("err.txt"), err).unwrap(),
        None => {
            let _ = fs::remove_file(root.join("err.txt"));
        }
    }
}

#[test]
fn test_strip_marker() {
    assert_eq!(
        strip_marker("✖ syntax error on line 4"),
        "syntax error on line 4"
    );
    assert_eq!(strip_marker("plain message"), "plain message");
    assert_eq!(
        strip_marker("\u{1b}[31m✖\u{1b}[39m bad\n  at line 2\n"),
        "31m✖\u{1b}[39m bad\n  at line 2\n"
    );
    assert_eq!(strip_marker("!! \n"), "!!");
}

#[test]
fn test_strip_marker_keeps_following_lines() {
    let stripped = strip_marker("✖ first\nsecond\nthird");
    assert_eq!(stripped, "first\nsecond\nthird");
}

#[test]
fn test_initial_css_is_empty() {
    let (_temp, compiler) = setup();
    assert_eq!(compiler.css().as_str(), "");
    assert_eq!(compiler.compiles(), 0);
}

#[tokio::test]
async fn test_success_replaces_css() {
    let (temp, compiler) = setup();
    emit(temp.path(), "body{color:red}", None);

    compiler.compile().await.unwrap();
    assert_eq!(compiler.css().as_str(), "body{color:red}");
    assert_eq!(compiler.compiles(), 1);
}

#[tokio::test]
async fn test_failure_keeps_previous_css() {
    let (temp, compiler) = setup();
    emit(temp.path(), "body{color:red}", None);
    compiler.compile().await.unwrap();

    emit(temp.path(), "", Some("✖ syntax error on line 4"));
    let err = compiler.compile().await.unwrap_err();

    assert!(matches!(err, CompileError::Failed { .. }));
    assert_eq!(err.message(), "syntax error on line 4");
    assert_eq!(compiler.css().as_str(), "body{color:red}");
    assert_eq!(compiler.compiles(), 2);
}

#[tokio::test]
async fn test_recovery_after_failure() {
    let (temp, compiler) = setup();
    emit(temp.path(), "", Some("✖ broken"));
    assert!(compiler.compile().await.is_err());
    assert_eq!(compiler.css().as_str(), "");

    emit(temp.path(), "a{b:c}", None);
    compiler.compile().await.unwrap();
    assert_eq!(compiler.css().as_str(), "a{b:c}");
}

#[tokio::test]
async fn test_compiler_runs_with_fixed_arguments() {
    let temp = TempDir::new().unwrap();
    // `sh -c` receives the appended arguments as $0..$3
    let config = test_config_with_script(
        temp.path(),
        r#"printf '%s|%s|%s|%s' "$0" "$1" "$2" "$3""#,
    );
    let compiler = StyleCompiler::new(&config);

    compiler.compile().await.unwrap();
    assert_eq!(compiler.css().as_str(), "build|style.css|-c|tailwind.js");
}

#[tokio::test]
async fn test_stderr_policy_ignores_exit_status() {
    let temp = TempDir::new().unwrap();
    let mut config = test_config_with_script(temp.path(), "printf 'x{}'; exit 1");
    config.compiler.failure = FailurePolicy::Stderr;
    let compiler = StyleCompiler::new(&config);

    compiler.compile().await.unwrap();
    assert_eq!(compiler.css().as_str(), "x{}");
}

#[tokio::test]
async fn test_either_policy_fails_on_exit_status() {
    let temp = TempDir::new().unwrap();
    let config = test_config_with_script(temp.path(), "printf 'x{}'; exit 1");
    let compiler = StyleCompiler::new(&config);

    let err = compiler.compile().await.unwrap_err();
    assert_eq!(err.message(), "`sh` exited with exit status: 1");
    assert_eq!(compiler.css().as_str(), "");
}

#[test]
fn test_superseded_result_is_discarded() {
    let (_temp, compiler) = setup();

    assert!(compiler.store(2, "newer".into()));
    assert!(!compiler.store(1, "older".into()));
    assert_eq!(compiler.css().as_str(), "newer");

    assert!(compiler.store(3, "newest".into()));
    assert_eq!(compiler.css().as_str(), "newest");
}

#[test]
fn test_spawn_error_message() {
    let err = CompileError::Spawn {
        program: "tailwind".into(),
        source: std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
    };
    assert_eq!(err.message(), "failed to spawn `tailwind`: not found");
}
