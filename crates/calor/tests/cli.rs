//! The `calor` binary end to end.

use std::fs;
use std::process::{Command, Output};

use tempfile::tempdir;

fn calor(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_calor"))
        .args(args)
        .output()
        .expect("failed to launch calor")
}

fn stdout(out: &Output) -> String {
    String::from_utf8_lossy(&out.stdout).into_owned()
}

#[test]
fn spike_csv_run() {
    let dir = tempdir().unwrap();
    let init = dir.path().join("spike.txt");
    fs::write(&init, "0, 0, 100, 0, 0\n").unwrap();

    let out = calor(&[
        "run",
        "--nx",
        "5",
        "--alpha",
        "0.5",
        "--dt",
        "0.5",
        "--initial-file",
        init.to_str().unwrap(),
        "--max-iterations",
        "3",
        "--format",
        "csv",
    ]);
    assert_eq!(out.status.code(), Some(0), "{out:?}");
    let text = stdout(&out);
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines[0], "iteration,elapsed_time,c0,c1,c2,c3,c4");
    assert_eq!(lines[1], "1,0.5,0,25,50,25,0");
    assert_eq!(lines.len(), 4);
}

#[test]
fn config_file_with_flag_override() {
    let dir = tempdir().unwrap();
    let config = dir.path().join("plate.json");
    let output = dir.path().join("plate.jsonl");
    fs::write(
        &config,
        r#"{
            "grid": { "nx": 6, "ny": 4 },
            "boundary": { "type": "dirichlet", "x_min": 100.0 },
            "stop": { "max_iterations": 100 }
        }"#,
    )
    .unwrap();

    let out = calor(&[
        "run",
        "--config",
        config.to_str().unwrap(),
        "--max-iterations",
        "10",
        "--format",
        "jsonl",
        "--every",
        "5",
        "--output",
        output.to_str().unwrap(),
    ]);
    assert_eq!(out.status.code(), Some(0), "{out:?}");
    let text = fs::read_to_string(&output).unwrap();
    let records: Vec<serde_json::Value> = text
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();
    let iterations: Vec<u64> = records
        .iter()
        .map(|r| r["iteration"].as_u64().unwrap())
        .collect();
    assert_eq!(iterations, vec![5, 10, 10]);
    assert_eq!(records[2]["event"], "complete");
    assert_eq!(records[2]["reason"], "max-iterations");
    assert_eq!(records[2]["ny"], 4);
}

#[test]
fn invalid_configuration_exits_2() {
    let out = calor(&["run", "--nx", "5", "--alpha", "0", "--max-iterations", "3"]);
    assert_eq!(out.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&out.stderr).contains("alpha"));
    assert!(out.stdout.is_empty());
}

#[test]
fn bad_usage_exits_2() {
    assert_eq!(calor(&["run", "--nx"]).status.code(), Some(2));
    assert_eq!(calor(&["fly"]).status.code(), Some(2));
}

#[test]
fn unstable_step_exits_1() {
    let out = calor(&[
        "run",
        "--nx",
        "5",
        "--alpha",
        "0.5",
        "--dt",
        "2",
        "--max-iterations",
        "3",
    ]);
    assert_eq!(out.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&out.stderr).contains("stability bound"));
}

#[test]
fn summary_reports_final_field() {
    let out = calor(&[
        "run",
        "--nx",
        "3",
        "--ny",
        "2",
        "--boundary",
        "neumann",
        "--fix",
        "0,0=10",
        "--max-time",
        "1.5",
    ]);
    assert_eq!(out.status.code(), Some(0), "{out:?}");
    let text = stdout(&out);
    assert!(text.starts_with("completed: max-time  grid 2x3\n"), "{text}");
    assert!(String::from_utf8_lossy(&out.stderr).contains("t = 1.5"));
}

#[test]
fn help_exits_0() {
    let out = calor(&["help"]);
    assert_eq!(out.status.code(), Some(0));
    assert!(stdout(&out).contains("--max-iterations"));
}

#[test]
fn alloy_plate_with_held_corners() {
    let out = calor(&[
        "run",
        "--nx",
        "8",
        "--ny",
        "6",
        "--boundary",
        "neumann",
        "--alloy",
        "3",
        "--fix",
        "0,0=100",
        "--fix",
        "5,7=0",
        "--max-iterations",
        "40",
        "--format",
        "jsonl",
        "--every",
        "40",
    ]);
    assert_eq!(out.status.code(), Some(0), "{out:?}");
    let text = stdout(&out);
    let last: serde_json::Value = serde_json::from_str(text.lines().last().unwrap()).unwrap();
    assert_eq!(last["event"], "complete");
    let field = last["field"].as_array().unwrap();
    assert_eq!(field[0], 100.0);
    assert_eq!(field[47], 0.0);
    assert!(field[1].as_f64().unwrap() > 0.0);
}

#[test]
fn alloy_tightens_the_fixed_step_bound() {
    // 0.25 is the uniform bound for alpha = 1 on a unit 2D grid.
    let out = calor(&[
        "run",
        "--nx",
        "8",
        "--ny",
        "6",
        "--alloy",
        "3",
        "--dt",
        "0.25",
        "--max-iterations",
        "5",
    ]);
    assert_eq!(out.status.code(), Some(1), "{out:?}");
    assert!(String::from_utf8_lossy(&out.stderr).contains("stability bound"));
}
