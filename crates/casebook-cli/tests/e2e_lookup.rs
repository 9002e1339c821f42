//! End-to-end tests for the `cb` binary over JSON row exports.

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

const CASES: &str = r#"[
  {"設備型號": "HGT-421", "大標": "傳動", "主題(事件簡述)": "皮帶斷裂", "原因(異常查找、分析)": "皮帶老化", "處置、應對": "更換皮帶"},
  {"設備型號": "HGT-421", "大標": "電控", "主題(事件簡述)": "馬達異音", "原因(異常查找、分析)": "無", "處置、應對": "待觀察"},
  {"設備型號": "HGT-421", "大標": "電控", "主題(事件簡述)": "馬達 異音 嚴重", "原因(異常查找、分析)": "軸承磨損導致異音", "處置、應對": "更換軸承"},
  {"設備型號": 420, "大標": "機構", "主題(事件簡述)": "sensor 無訊號"}
]"#;

const SCHEDULE: &str = r#"[
  {"保養類型": "500k保養", "型號": "420單向軸承", "更換料件": "B2476 軸承\nXYZ999 墊片"},
  {"型號": "HGT-421", "更換料件": "D3089 滾輪"},
  {"保養類型": "1M保養", "型號": "420單向軸承", "更換料件": "D120 油封"},
  {"更換料件": ""}
]"#;

const INSPECTION: &str = r#"[
  {"項目各部": "主軸", "各部細項": "潤滑油位\n 異音 "},
  {"各部細項": "皮帶張力"},
  {"項目各部": "光電", "各部細項": ""}
]"#;

fn project() -> TempDir {
    let dir = TempDir::new().expect("tempdir");
    let casebook = dir.path().join(".casebook");
    fs::create_dir_all(&casebook).expect("mkdir");
    fs::write(casebook.join("cases.json"), CASES).expect("write cases");
    fs::write(casebook.join("schedule.json"), SCHEDULE).expect("write schedule");
    fs::write(casebook.join("inspection.json"), INSPECTION).expect("write inspection");
    dir
}

fn cb(dir: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("cb"));
    cmd.current_dir(dir)
        .env_remove("CASEBOOK_FORMAT")
        .env_remove("CASEBOOK_LOG")
        .env("HOME", dir)
        .env("XDG_CONFIG_HOME", dir.join("xdg"));
    cmd
}

fn json_stdout(cmd: &mut Command) -> Value {
    let out = cmd.assert().success().get_output().stdout.clone();
    serde_json::from_slice(&out).expect("stdout is JSON")
}

// ---------------------------------------------------------------------------
// search
// ---------------------------------------------------------------------------

#[test]
fn search_ranks_and_picks_informative_evidence() {
    let dir = project();
    let json = json_stdout(cb(dir.path()).args(["search", "馬達", "異音", "--format", "json"]));

    assert!(json["count"].as_u64().expect("count") >= 2);
    assert_eq!(json["evidence"]["cause"], "軸承磨損導致異音");
    assert!(
        json["fallback_url"]
            .as_str()
            .expect("url")
            .starts_with("https://www.google.com/search?q=HGT-421")
    );
    let scores: Vec<f64> = json["ranked"]
        .as_array()
        .expect("ranked")
        .iter()
        .map(|c| c["final_score"].as_f64().expect("score"))
        .collect();
    assert!(scores.windows(2).all(|w| w[0] >= w[1]));
    assert!(scores.iter().all(|s| *s > 0.15));
}

#[test]
fn search_keyword_only_flags() {
    let dir = project();
    let json = json_stdout(cb(dir.path()).args([
        "search",
        "皮帶",
        "--no-vector",
        "--no-fuzzy",
        "--format",
        "json",
    ]));
    assert_eq!(json["count"], 1);
    assert_eq!(json["capabilities"]["vector"], false);
    assert_eq!(json["ranked"][0]["record"]["topic"], "皮帶斷裂");
}

#[test]
fn search_normalizes_numeric_model_and_missing_fields() {
    let dir = project();
    let json = json_stdout(cb(dir.path()).args([
        "search",
        "sensor",
        "--no-vector",
        "--format",
        "json",
    ]));
    let record = &json["ranked"][0]["record"];
    assert_eq!(record["model"], "420");
    assert_eq!(record["cause"], "無");
}

#[test]
fn search_empty_query_is_an_error() {
    let dir = project();
    cb(dir.path())
        .args(["search", "--format", "json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("E2001"));
}

#[test]
fn search_missing_corpus_is_an_error() {
    let dir = project();
    cb(dir.path())
        .args(["search", "馬達", "--corpus", "nope.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("E1001"));
}

#[test]
fn search_malformed_corpus_is_an_error() {
    let dir = project();
    fs::write(dir.path().join("bad.json"), r#"{"not": "rows"}"#).expect("write");
    cb(dir.path())
        .args(["search", "馬達", "--corpus", "bad.json", "--format", "text"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("E1003"));
}

#[test]
fn search_text_mode_prints_fallback() {
    let dir = project();
    cb(dir.path())
        .args(["search", "qqqq", "--no-vector", "--format", "text"])
        .assert()
        .success()
        .stdout(predicate::str::contains("advice  no-results  query=qqqq"))
        .stdout(predicate::str::contains("fallback  https://www.google.com/search?q="));
}

// ---------------------------------------------------------------------------
// parts / schedule
// ---------------------------------------------------------------------------

#[test]
fn parts_classifies_by_bucket() {
    let dir = project();
    let json = json_stdout(cb(dir.path()).args([
        "parts",
        "B2476",
        "D120",
        "--model",
        "420單向軸承",
        "--interval",
        "500k保養",
        "--format",
        "json",
    ]));
    assert_eq!(json["bucket"], "500K");
    assert_eq!(json["parts"][0]["tier"], "red");
    assert_eq!(json["parts"][1]["tier"], "normal");
}

#[test]
fn schedule_drills_down_to_parts() {
    let dir = project();
    let intervals = json_stdout(cb(dir.path()).args(["schedule", "--format", "json"]));
    assert_eq!(intervals["view"], "intervals");
    assert_eq!(intervals["intervals"], serde_json::json!(["1M保養", "500K保養"]));

    let parts = json_stdout(cb(dir.path()).args([
        "schedule",
        "--interval",
        "500K保養",
        "--model",
        "HGT-421",
        "--format",
        "json",
    ]));
    assert_eq!(parts["view"], "parts");
    assert_eq!(parts["red"], 1);
    assert_eq!(parts["parts"][0]["part"], "D3089 滾輪");
}

#[test]
fn schedule_unknown_interval_is_an_error() {
    let dir = project();
    cb(dir.path())
        .args(["schedule", "--interval", "2M", "--format", "json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown_interval"));
}

// ---------------------------------------------------------------------------
// inspect
// ---------------------------------------------------------------------------

#[test]
fn inspect_lists_items_then_checks() {
    let dir = project();
    let items = json_stdout(cb(dir.path()).args(["inspect", "--format", "json"]));
    assert_eq!(items["view"], "items");
    assert_eq!(items["items"], serde_json::json!(["主軸", "光電"]));

    cb(dir.path())
        .args(["inspect", "--item", "主軸", "--format", "text"])
        .assert()
        .success()
        .stdout("潤滑油位\n異音\n皮帶張力\n");

    let blank = json_stdout(cb(dir.path()).args(["inspect", "--item", "光電", "--format", "json"]));
    assert_eq!(blank["lines"], serde_json::json!([]));
}

#[test]
fn inspect_errors_are_coded() {
    let dir = project();
    cb(dir.path())
        .args(["inspect", "--item", "馬達", "--format", "json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown_inspection_item"));

    fs::write(dir.path().join("bad.json"), "[1, 2]").expect("write");
    cb(dir.path())
        .args(["inspect", "--inspection", "bad.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("E1005"));
}

// ---------------------------------------------------------------------------
// history / capabilities / config
// ---------------------------------------------------------------------------

#[test]
fn history_groups_by_topic_with_pin() {
    let dir = project();
    let json = json_stdout(cb(dir.path()).args([
        "history",
        "--model",
        "HGT-421",
        "--case",
        "2",
        "--format",
        "json",
    ]));
    assert_eq!(json["view"], "topics");
    assert_eq!(json["groups"][0]["topic"], "馬達 異音 嚴重");
    assert_eq!(json["groups"].as_array().expect("groups").len(), 3);
}

#[test]
fn capabilities_respect_config_toggles() {
    let dir = project();
    fs::write(
        dir.path().join(".casebook/config.toml"),
        "[search]\nfuzzy = false\n",
    )
    .expect("write config");
    let json = json_stdout(cb(dir.path()).args(["capabilities", "--format", "json"]));
    assert_eq!(json[1]["name"], "fuzzy");
    assert_eq!(json[1]["available"], false);
    assert_eq!(json[2]["available"], true);
}

#[test]
fn broken_config_is_reported() {
    let dir = project();
    fs::write(dir.path().join("broken.toml"), "[search\n").expect("write config");
    cb(dir.path())
        .args(["capabilities", "--config", "broken.toml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("E1002"));
}

#[test]
fn completions_generate() {
    let dir = project();
    cb(dir.path())
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("cb"));
}
