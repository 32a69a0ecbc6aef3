//! CLI smoke tests: run the binary against a document on disk.

mod common;

use std::fs;
use std::process::Command;

fn write_fixture(name: &str, contents: &str) -> std::path::PathBuf {
    let path = std::env::temp_dir().join(format!("gridviz-test-{name}-{}.json", std::process::id()));
    fs::write(&path, contents).expect("fixture should write");
    path
}

#[test]
fn renders_requested_timestep_to_stdout() {
    let data = write_fixture("render", common::TWO_BUS_DOC);

    let output = Command::new(env!("CARGO_BIN_EXE_gridviz"))
        .args(["--data", data.to_str().expect("utf-8 path"), "--timestep", "1"])
        .output()
        .expect("gridviz process should run");
    let _ = fs::remove_file(&data);

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).expect("stdout should be UTF-8");
    assert!(stdout.contains("timestep 1"), "stdout was:\n{stdout}");
    assert!(stdout.contains("G1 -> B1  [7.00]"), "stdout was:\n{stdout}");
    // Reversed line flow at t=1.
    assert!(stdout.contains("B2 -> B1  [2.50 / 10.00]"), "stdout was:\n{stdout}");
}

#[test]
fn unreadable_document_degrades_to_empty_render() {
    let output = Command::new(env!("CARGO_BIN_EXE_gridviz"))
        .args(["--data", "/nonexistent/data.json"])
        .output()
        .expect("gridviz process should run");

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).expect("stdout should be UTF-8");
    assert!(stdout.contains("0 nodes, 0 edges"), "stdout was:\n{stdout}");
}

#[test]
fn exports_series_csv() {
    let data = write_fixture("export", common::TWO_BUS_DOC);
    let out = std::env::temp_dir().join(format!("gridviz-test-out-{}.csv", std::process::id()));

    let output = Command::new(env!("CARGO_BIN_EXE_gridviz"))
        .args([
            "--data",
            data.to_str().expect("utf-8 path"),
            "--export-series",
            "G1",
            "--kind",
            "generator",
            "--out",
            out.to_str().expect("utf-8 path"),
        ])
        .output()
        .expect("gridviz process should run");
    let _ = fs::remove_file(&data);

    assert!(output.status.success());
    let csv = fs::read_to_string(&out).expect("csv should exist");
    let _ = fs::remove_file(&out);
    assert!(csv.starts_with("timestep,G1"));
}
