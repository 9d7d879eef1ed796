use regex::Regex;
use std::fs;
use std::path::PathBuf;
use std::process::{Command, Output};
use tempfile::TempDir;

struct TestContext {
    dir: TempDir,
}

impl TestContext {
    fn new() -> Self {
        Self {
            dir: tempfile::tempdir().expect("Failed to create temp dir"),
        }
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }
}

fn run(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_tabfold"))
        .args(args)
        .output()
        .expect("Failed to execute binary")
}

fn stdout_of(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

/// Pulls the score cell out of the summary table row.
fn summary_score(stdout: &str, mode: &str) -> Option<f64> {
    let re = Regex::new(&format!(
        r"\|\s*{}\s*\|\s*(\d+)\s*\|[^|]*\|\s*(\d+)\s*\|\s*([-0-9.eE]+)\s*\|",
        mode
    ))
    .unwrap();
    re.captures(stdout).and_then(|c| c[3].parse().ok())
}

#[test]
fn test_cli_volume_run_and_export() {
    let ctx = TestContext::new();
    let csv = ctx.path("solution.csv");
    let wire = ctx.path("box.json");

    let output = run(&[
        "volume",
        "-n",
        "8",
        "-L",
        "1.0",
        "-g",
        "5",
        "-e",
        "2",
        "-S",
        "7",
        "--csv",
        csv.to_str().unwrap(),
        "--wireframe",
        wire.to_str().unwrap(),
        "--rungs",
        "4",
    ]);
    let stdout = stdout_of(&output);
    assert!(output.status.success(), "stdout:\n{}", stdout);

    let volume = summary_score(&stdout, "volume").expect("No summary row in output");
    assert!(volume > 0.0, "volume was {}", volume);
    assert!(stdout.contains("Profile:"));

    let text = fs::read_to_string(&csv).unwrap();
    assert!(text.starts_with("s,x,f(s),,Parameter,Value"));
    assert_eq!(text.lines().count(), 10);

    let raw = fs::read_to_string(&wire).unwrap();
    let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(json["view"], "full");
    assert!(!json["ops"].as_array().unwrap().is_empty());
}

#[test]
fn test_cli_same_seed_same_output() {
    let args = ["volume", "-n", "10", "-g", "3", "-e", "2", "-S", "123"];
    let a = stdout_of(&run(&args));
    let b = stdout_of(&run(&args));
    assert_eq!(summary_score(&a, "volume"), summary_score(&b, "volume"));
    assert!(summary_score(&a, "volume").is_some());
}

#[test]
fn test_cli_fit_builtin_shape() {
    let output = run(&[
        "fit",
        "--shape",
        "parabola",
        "--height",
        "0.2",
        "-n",
        "10",
        "--fit-generations",
        "50",
        "-S",
        "3",
    ]);
    let stdout = stdout_of(&output);
    assert!(output.status.success(), "stdout:\n{}", stdout);
    assert!(stdout.contains("Deviation"));
    let deviation = summary_score(&stdout, "fit").expect("No summary row in output");
    assert!(deviation >= 0.0);
}

#[test]
fn test_cli_fit_from_csv_transposed() {
    let ctx = TestContext::new();
    let target = ctx.path("target.csv");
    fs::write(&target, "0 0.1 0.2 0.25 0.2 0.1 0\n").unwrap();
    let out = ctx.path("fit.csv");

    let output = run(&[
        "fit",
        "--from-csv",
        target.to_str().unwrap(),
        "--transpose",
        "--column",
        "0",
        "--fit-generations",
        "30",
        "-S",
        "1",
        "--csv",
        out.to_str().unwrap(),
        "--plain",
    ]);
    assert!(output.status.success(), "stdout:\n{}", stdout_of(&output));

    let text = fs::read_to_string(&out).unwrap();
    assert!(text.starts_with("s,x,f(s)\n"));
    assert_eq!(text.lines().count(), 8);
}

#[test]
fn test_cli_scan_prints_one_row_per_length() {
    let output = run(&[
        "scan",
        "--lhat-from",
        "0.5",
        "--lhat-to",
        "1.5",
        "--steps",
        "3",
        "-n",
        "6",
        "-g",
        "3",
        "-e",
        "1",
        "-S",
        "1",
    ]);
    let stdout = stdout_of(&output);
    assert!(output.status.success(), "stdout:\n{}", stdout);

    let re = Regex::new(r"\|\s*(0\.5000|1\.0000|1\.5000)\s*\|\s*([0-9.]+)\s*\|").unwrap();
    let lhats: Vec<String> = re
        .captures_iter(&stdout)
        .map(|c| c[1].to_string())
        .collect();
    assert_eq!(lhats, vec!["0.5000", "1.0000", "1.5000"]);
}

#[test]
fn test_cli_config_file_with_override() {
    let ctx = TestContext::new();
    let settings = ctx.path("settings.json");
    fs::write(
        &settings,
        r#"{ "volume": { "segments": 6, "generations": 2, "era": 1 } }"#,
    )
    .unwrap();

    let output = run(&[
        "volume",
        "--config",
        settings.to_str().unwrap(),
        "-L",
        "0.8",
        "-S",
        "5",
    ]);
    let stdout = stdout_of(&output);
    assert!(output.status.success(), "stdout:\n{}", stdout);

    let re = Regex::new(r"\|\s*volume\s*\|\s*(\d+)\s*\|\s*([0-9.]+)\s*\|\s*(\d+)\s*\|").unwrap();
    let caps = re.captures(&stdout).expect("No summary row in output");
    assert_eq!(&caps[1], "6");
    assert_eq!(&caps[2], "0.8000");
    assert_eq!(&caps[3], "2");
}

#[test]
fn test_cli_rejects_invalid_settings() {
    let output = run(&["volume", "-n", "0"]);
    assert!(!output.status.success());

    let output = run(&["volume", "-L", "-1"]);
    assert!(!output.status.success());
}
