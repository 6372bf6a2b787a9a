use std::process::{Command, Output};

fn maze_nav(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_maze-nav"))
        .args(args)
        .output()
        .expect("failed to launch maze-nav")
}

fn stdout(output: &Output) -> String {
    String::from_utf8(output.stdout.clone()).expect("utf-8 output")
}

#[test]
fn json_report_describes_the_generated_grid() {
    let output = maze_nav(&["--columns", "5", "--rows", "5", "--seed", "3", "--format", "json"]);
    assert!(output.status.success());

    let report: serde_json::Value =
        serde_json::from_str(&stdout(&output)).expect("report is json");
    assert_eq!(report["grid"]["width"], 11);
    assert_eq!(report["grid"]["depth"], 11);
    assert_eq!(report["grid"]["regions"], 1);
    assert!(report["transfer"]
        .as_str()
        .is_some_and(|value| value.starts_with("maze:v1:5x5:")));
}

#[test]
fn exported_maze_imports_to_the_same_level() {
    let generated = maze_nav(&["--columns", "6", "--rows", "4", "--seed", "21", "--export"]);
    assert!(generated.status.success());
    let text = stdout(&generated);
    let transfer = text
        .lines()
        .find(|line| line.starts_with("maze:v1:"))
        .expect("transfer string printed");

    let imported = maze_nav(&["--import", transfer, "--export"]);
    assert!(imported.status.success());
    assert_eq!(stdout(&imported), text);
}

#[test]
fn text_output_draws_the_path() {
    let output = maze_nav(&["--columns", "4", "--rows", "4", "--seed", "8", "--no-prune"]);
    assert!(output.status.success());
    let text = stdout(&output);
    assert!(text.contains('S'));
    assert!(text.contains('G'));
    assert!(text.contains("path 0 -> "));
}

#[test]
fn invalid_import_fails_with_context() {
    let output = maze_nav(&["--import", "maze:v9:2x2:AA"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("failed to import maze"));
}

#[test]
fn zero_sized_maze_is_rejected() {
    let output = maze_nav(&["--columns", "0"]);
    assert!(!output.status.success());
}
