use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const HEADER: &str = "Campaign,Total Spend,Total Leads,Total Sales,Revenue (incl. GST)\n";

fn grader(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("campaign-grader").unwrap();
    cmd.current_dir(dir)
        .env_remove("GEMINI_API_KEY")
        .env_remove("CAMPAIGN_GRADER_CONFIG")
        .env("RUST_LOG", "off");
    cmd
}

fn write_input(dir: &TempDir, body: &str) -> std::path::PathBuf {
    let path = dir.path().join("campaigns.csv");
    fs::write(&path, format!("{HEADER}{body}")).unwrap();
    path
}

#[test]
fn two_campaign_example_end_to_end() {
    let dir = TempDir::new().unwrap();
    let input = write_input(&dir, "B,500,0,0,0\nA,1000,10,2,2000\n");

    grader(dir.path())
        .arg(&input)
        .arg("--no-insights")
        .assert()
        .success()
        .stdout(predicate::str::contains("Best campaign:  A"))
        .stdout(predicate::str::contains("Worst campaign: B"));

    let csv = fs::read_to_string(dir.path().join("campaign_scores.csv")).unwrap();
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(
        lines[0],
        "Campaign,Total Spend,Total Leads,Total Sales,Revenue (incl. GST),\
         P/L,CPL,CPA,ROAS,ROI,C-rate,Rev. per lead,Campaign Score (0–100)"
    );
    assert_eq!(lines[1], "A,1000,10,2,2000,1000,100,500,2,1,0.2,200,100");
    assert_eq!(lines[2], "B,500,0,0,0,-500,500,500,0,-1,,,0");
}

#[test]
fn missing_column_halts_without_output() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("campaigns.csv");
    fs::write(&input, "Campaign,Total Spend,Total Leads,Revenue (incl. GST)\nA,1,1,1\n").unwrap();

    grader(dir.path())
        .arg(&input)
        .assert()
        .failure()
        .stderr(predicate::str::contains(r#"["Total Sales"]"#));

    assert!(!dir.path().join("campaign_scores.csv").exists());
}

#[test]
fn malformed_number_halts_without_output() {
    let dir = TempDir::new().unwrap();
    let input = write_input(&dir, "A,1000,ten,2,2000\n");

    grader(dir.path())
        .arg(&input)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Total Leads").and(predicate::str::contains("ten")));

    assert!(!dir.path().join("campaign_scores.csv").exists());
}

#[test]
fn rerun_produces_identical_csv() {
    let dir = TempDir::new().unwrap();
    let input = write_input(
        &dir,
        "a,1000,40,4,5000\nb,800,10,1,900\nc,0,3,1,250\nd,1200,0,0,0\ne,300,30,6,1500\n",
    );

    for out in ["first.csv", "second.csv"] {
        grader(dir.path())
            .arg(&input)
            .args(["--output", out, "--no-insights"])
            .assert()
            .success();
    }
    let first = fs::read(dir.path().join("first.csv")).unwrap();
    let second = fs::read(dir.path().join("second.csv")).unwrap();
    assert_eq!(first, second);
}

#[test]
fn summary_json_names_best_and_worst() {
    let dir = TempDir::new().unwrap();
    let input = write_input(&dir, "B,500,0,0,0\nA,1000,10,2,2000\n");

    grader(dir.path())
        .arg(&input)
        .args(["--summary", "summary.json", "--no-insights"])
        .assert()
        .success();

    let text = fs::read_to_string(dir.path().join("summary.json")).unwrap();
    let json: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(json["best_campaign"], "A");
    assert_eq!(json["worst_campaign"], "B");
    assert_eq!(json["total_campaigns"], 2);
    // Two rows: head and tail of three overlap completely.
    assert_eq!(json["extract"].as_array().unwrap().len(), 4);
}

#[test]
fn custom_weights_change_the_winner() {
    let dir = TempDir::new().unwrap();
    let input = write_input(&dir, "Cheap,100,50,1,100\nRich,5000,10,5,20000\n");
    let config = dir.path().join("grader.toml");
    fs::write(
        &config,
        "[[scoring.criteria]]\nmetric = \"CPL\"\nweight = 100\ndirection = \"lower\"\n",
    )
    .unwrap();

    grader(dir.path())
        .arg(&input)
        .arg("--config")
        .arg(&config)
        .arg("--no-insights")
        .assert()
        .success()
        .stdout(predicate::str::contains("Best campaign:  Cheap"));
}

#[test]
fn insights_without_key_still_exports() {
    let dir = TempDir::new().unwrap();
    let input = write_input(&dir, "A,1000,10,2,2000\n");

    grader(dir.path())
        .arg(&input)
        .arg("--insights")
        .assert()
        .success()
        .stderr(predicate::str::contains("GEMINI_API_KEY"));

    assert!(dir.path().join("campaign_scores.csv").exists());
}
