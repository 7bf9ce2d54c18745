mod common;

use std::fs;

use assert_cmd::Command;
use predicates::{prelude::PredicateBooleanExt, str::contains};
use serde_json::Value as JsonValue;

use common::{TestWorkspace, fixture_path};

const CAT_VAL_CSV: &str = "cat,val\na,1\na,\nb,3\n";

fn dashboard() -> Command {
    Command::cargo_bin("tabular-dashboard").expect("binary exists")
}

#[test]
fn render_without_input_prompts_for_upload() {
    dashboard()
        .arg("render")
        .assert()
        .success()
        .stdout(contains("# My Organized Dashboard"))
        .stdout(contains("[info] Please upload a file to proceed."))
        .stdout(contains("\"kind\"").not());
}

#[test]
fn render_mean_fill_prints_table_and_chart() {
    let workspace = TestWorkspace::new();
    let input = workspace.write("data.csv", CAT_VAL_CSV);
    dashboard()
        .args([
            "render",
            "-i",
            input.to_str().unwrap(),
            "--operation",
            "missing-data",
            "--method",
            "mean",
            "--x",
            "cat",
            "--y",
            "val",
        ])
        .assert()
        .success()
        .stdout(contains("## Handling Missing Data"))
        .stdout(contains("1  a    2"))
        .stdout(contains("\"title\": \"val by cat\""));
}

#[test]
fn render_writes_chart_specification_file() {
    let workspace = TestWorkspace::new();
    let chart_path = workspace.path().join("chart.json");
    dashboard()
        .args([
            "render",
            "-i",
            fixture_path("sales.xlsx").to_str().unwrap(),
            "--chart",
            "pie",
            "--values",
            "units",
            "--chart-output",
            chart_path.to_str().unwrap(),
        ])
        .assert()
        .success()
        .stdout(contains("Data Visualisation: units by region"));

    let spec: JsonValue =
        serde_json::from_str(&fs::read_to_string(&chart_path).expect("read chart"))
            .expect("parse chart json");
    assert_eq!(spec["kind"], "pie");
    assert_eq!(spec["names"], "region");
    assert_eq!(spec["values"], "units");
    assert_eq!(spec["template"], "plotly_white");
    assert_eq!(spec["data"].as_array().map(Vec::len), Some(4));
}

#[test]
fn pie_without_categories_warns_and_succeeds() {
    let workspace = TestWorkspace::new();
    let input = workspace.write("numbers.csv", "a,b\n1,2\n3,4\n");
    dashboard()
        .args(["render", "-i", input.to_str().unwrap(), "--chart", "pie"])
        .assert()
        .success()
        .stdout(contains(
            "[warning] Pie chart needs at least one categorical column.",
        ))
        .stdout(contains("\"kind\"").not());
}

#[test]
fn config_file_overrides_title_and_default_chart() {
    let workspace = TestWorkspace::new();
    let input = workspace.write("data.csv", CAT_VAL_CSV);
    let config = workspace.write(
        "dashboard.yml",
        "title: Sales Board\ntheme: ggplot2\ndefault_chart: scatter\n",
    );
    dashboard()
        .args([
            "render",
            "-i",
            input.to_str().unwrap(),
            "--config",
            config.to_str().unwrap(),
        ])
        .assert()
        .success()
        .stdout(contains("# Sales Board"))
        .stdout(contains("\"kind\": \"scatter\""))
        .stdout(contains("\"template\": \"ggplot2\""));
}

#[test]
fn unsupported_upload_fails() {
    let workspace = TestWorkspace::new();
    let input = workspace.write("data.txt", CAT_VAL_CSV);
    dashboard()
        .args(["render", "-i", input.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(contains("Unsupported file type"));
}

#[test]
fn unknown_column_selection_fails() {
    let workspace = TestWorkspace::new();
    let input = workspace.write("data.csv", CAT_VAL_CSV);
    dashboard()
        .args(["render", "-i", input.to_str().unwrap(), "--y", "nope"])
        .assert()
        .failure()
        .stderr(contains("'nope' is not a valid y column"));
}

#[test]
fn session_keeps_chart_kind_and_never_chains_operations() {
    let workspace = TestWorkspace::new();
    let input = workspace.write("data.csv", CAT_VAL_CSV);
    let transcript = [
        "--chart line",
        "--operation rename --column cat --new-name 'group name'",
        "# comment lines are skipped",
        "--operation group-filter --column cat --value zzz",
        "--operation summary",
        "quit",
        "--chart bar",
    ]
    .join("\n");

    let output = dashboard()
        .args(["session", "-i", input.to_str().unwrap()])
        .write_stdin(transcript)
        .assert()
        .success()
        .stdout(contains("[success] Renamed \"cat\" → \"group name\""))
        .stdout(contains("error: Value 'zzz' is not a group of column 'cat'"))
        .stdout(contains("## Statistical Summary"))
        .get_output()
        .stdout
        .clone();

    let stdout = String::from_utf8(output).expect("utf8 stdout");
    assert_eq!(stdout.matches("\"kind\": \"line\"").count(), 3);
    assert!(!stdout.contains("\"kind\": \"bar\""));
    let summary = stdout.split("## Statistical Summary").nth(1).unwrap();
    assert!(summary.contains("val"));
    assert!(!summary.contains("group name"));
}
