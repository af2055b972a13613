//! Integration tests for the `path` and `route` subcommands.
//!
//! These tests use `assert_cmd` to verify CLI behavior including:
//! - text and JSON output for grid searches
//! - route sequencing from a locations file, with and without a matrix
//! - exit codes and error messages for bad input

use std::fs;
use std::path::PathBuf;

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use tempfile::TempDir;

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../../docs/fixtures")
        .join(name)
}

fn cli() -> Command {
    let mut cmd = Command::cargo_bin("waymark-cli").expect("binary exists");
    cmd.env("NO_COLOR", "1").env_remove("RUST_LOG");
    cmd
}

fn stdout_json(cmd: &mut Command) -> Value {
    let output = cmd.output().expect("run cli");
    assert!(output.status.success(), "cli failed: {output:?}");
    serde_json::from_slice(&output.stdout).expect("stdout is JSON")
}

#[test]
fn path_text_output_on_open_grid() {
    cli()
        .args(["path", "--grid"])
        .arg(fixture("open_3x3.json"))
        .args(["--from", "0,0", "--to", "2,2"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Path from (0, 0) to (2, 2) (4 steps; algorithm: astar",
        ))
        .stdout(predicate::str::contains("S"))
        .stdout(predicate::str::contains("E"));
}

#[test]
fn path_json_output_through_maze() {
    let mut cmd = cli();
    cmd.args(["--format", "json", "path", "--grid"])
        .arg(fixture("maze.txt"))
        .args(["--from", "0,0", "--to", "9,6", "--algorithm", "dijkstra"]);

    let result = stdout_json(&mut cmd);

    assert_eq!(result["found"], Value::Bool(true));
    let path = result["path"].as_array().expect("path array");
    assert_eq!(path.len(), 16);
    assert_eq!(path[0], serde_json::json!({"x": 0, "y": 0}));
    assert_eq!(path[15], serde_json::json!({"x": 9, "y": 6}));
}

#[test]
fn format_flag_is_accepted_after_subcommand() {
    let mut cmd = cli();
    cmd.args(["path", "--grid"])
        .arg(fixture("open_3x3.json"))
        .args(["--from", "1,1", "--to", "1,1", "--format", "json"]);

    let result = stdout_json(&mut cmd);

    assert_eq!(result["path"].as_array().map(Vec::len), Some(1));
}

#[test]
fn blocked_goal_reports_no_path() {
    let temp = TempDir::new().expect("create temp dir");
    let grid = temp.path().join("split.txt");
    fs::write(&grid, "..#..\n..#..\n..#..\n").expect("write grid");

    cli()
        .args(["path", "--grid"])
        .arg(&grid)
        .args(["--from", "0,0", "--to", "4,2"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "No path from (0, 0) to (4, 2) (algorithm: astar; explored 6 cells)",
        ));
}

#[test]
fn out_of_bounds_goal_fails() {
    cli()
        .args(["path", "--grid"])
        .arg(fixture("open_3x3.json"))
        .args(["--from", "0,0", "--to", "9,9"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("outside the 3x3 grid"));
}

#[test]
fn malformed_cell_argument_fails() {
    cli()
        .args(["path", "--grid"])
        .arg(fixture("open_3x3.json"))
        .args(["--from", "0;0", "--to", "2,2"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("expected x,y"));
}

#[test]
fn missing_grid_file_fails() {
    cli()
        .args(["path", "--grid", "does-not-exist.json", "--from", "0,0", "--to", "1,1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to read grid"));
}

#[test]
fn route_text_lists_stops_in_visiting_order() {
    let output = cli()
        .args(["route", "--locations"])
        .arg(fixture("stops.json"))
        .output()
        .expect("run cli");
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).expect("utf8");
    let positions: Vec<usize> = [
        "1. Depot, London",
        "2. Oxford Warehouse",
        "3. Paris Office",
        "4. Edinburgh Store",
    ]
    .iter()
    .map(|needle| stdout.find(needle).expect(needle))
    .collect();
    assert!(positions.windows(2).all(|pair| pair[0] < pair[1]));
    assert!(stdout.contains("Total distance:"));
}

#[test]
fn route_json_with_explicit_matrix() {
    let temp = TempDir::new().expect("create temp dir");
    let matrix = temp.path().join("matrix.json");
    fs::write(
        &matrix,
        "[[0, 9, 9, 1], [9, 0, 1, 9], [9, 1, 0, 9], [9, 9, 1, 0]]",
    )
    .expect("write matrix");

    let mut cmd = cli();
    cmd.args(["--format", "json", "route", "--locations"])
        .arg(fixture("stops.json"))
        .arg("--matrix")
        .arg(&matrix);

    let route = stdout_json(&mut cmd);

    let addresses: Vec<&str> = route["route"]
        .as_array()
        .expect("route array")
        .iter()
        .filter_map(|stop| stop["address"].as_str())
        .collect();
    assert_eq!(
        addresses,
        vec![
            "Depot, London",
            "Edinburgh Store",
            "Oxford Warehouse",
            "Paris Office"
        ]
    );
    assert_eq!(route["total_distance"], serde_json::json!(3.0));
}

#[test]
fn matrix_and_road_distances_conflict() {
    cli()
        .args(["route", "--locations"])
        .arg(fixture("stops.json"))
        .args(["--matrix", "m.json", "--road-distances"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot be used with"));
}
