mod common;

use assert_cmd::cargo_bin;
use assert_cmd::prelude::*;
use common::{SCENARIO_A_DIGEST, scenario_a, to_query};
use predicates::prelude::*;
use std::io::Write;
use std::process::Command;
use tempfile::NamedTempFile;

fn command() -> Command {
    let mut cmd = Command::new(cargo_bin!("paynotify"));
    cmd.env_remove("PAYNOTIFY_MERCHANT_ID")
        .env_remove("PAYNOTIFY_SECRET_CODE")
        .env_remove("RUST_LOG");
    cmd
}

fn callbacks_file(rows: &[String]) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "mode,method,query,current_status").unwrap();
    for row in rows {
        writeln!(file, "{row}").unwrap();
    }
    file
}

#[test]
fn test_sign_prints_expected_digest() {
    command()
        .args(["--merchant-id", "123", "--secret-code", "S3CR3T", "sign"])
        .arg(to_query(&scenario_a("")))
        .assert()
        .success()
        .stdout(predicate::str::contains(SCENARIO_A_DIGEST));
}

#[test]
fn test_missing_secret_fails() {
    command()
        .args(["--merchant-id", "123", "sign", "status=01"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("secret_code is not set"));
}

#[test]
fn test_replay_end_to_end() {
    let signed = to_query(&scenario_a(SCENARIO_A_DIGEST));
    let forged = to_query(&scenario_a("F00D"));
    let file = callbacks_file(&[
        format!("postback,POST,{signed},OPEN"),
        format!("postback,,{signed},SUCCESS"),
        format!("postback,GET,{forged},OPEN"),
        format!("result,POST,{signed},"),
        format!("result,GET,{signed},"),
    ]);

    command()
        .args(["--merchant-id", "123", "--secret-code", "S3CR3T", "replay"])
        .arg(file.path())
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "order_no,raw_status,status,amount,verdict,applicable",
        ))
        .stdout(predicate::str::contains("ORD1,01,OK,1000,accepted,true"))
        .stdout(predicate::str::contains("ORD1,01,OK,1000,accepted,false"))
        .stdout(predicate::str::contains("ORD1,01,,,checksum_mismatch,"))
        .stdout(predicate::str::contains("ORD1,01,,,invalid_method,"))
        .stdout(predicate::str::contains("ORD1,01,OK,1000,accepted,\n"));
}

#[test]
fn test_replay_result_page_needs_exact_get() {
    let signed = to_query(&scenario_a(SCENARIO_A_DIGEST));
    let file = callbacks_file(&[format!("result,get,{signed},"), format!("result,,{signed},")]);

    command()
        .args(["--merchant-id", "123", "--secret-code", "S3CR3T", "replay"])
        .arg(file.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("ORD1,01,,,invalid_method,").count(2))
        .stdout(predicate::str::contains("accepted").not());
}

#[test]
fn test_replay_skips_malformed_rows() {
    let signed = to_query(&scenario_a(SCENARIO_A_DIGEST));
    let file = callbacks_file(&[
        format!("webhook,GET,{signed},"),
        format!("postback,GET,{signed},PAID"),
        format!("postback,GET,{signed},ERR"),
    ]);

    command()
        .args(["--merchant-id", "123", "--secret-code", "S3CR3T", "replay"])
        .arg(file.path())
        .assert()
        .success()
        .stderr(predicate::str::contains("Error reading callback"))
        .stdout(predicate::str::contains("ORD1,01,OK,1000,accepted,true"));
}

#[test]
fn test_replay_with_settings_file_writes_log() {
    let dir = tempfile::tempdir().unwrap();
    let log_path = dir.path().join("notify.log");
    let config_path = dir.path().join("paynotify.toml");
    std::fs::write(
        &config_path,
        format!(
            "[merchant]\nmerchant_id = 123\nsecret_code = 'S3CR3T'\n\n\
             [logging]\nfilter = 'all'\nfile = '{}'\n",
            log_path.display()
        ),
    )
    .unwrap();

    let signed = to_query(&scenario_a(SCENARIO_A_DIGEST));
    let forged = to_query(&scenario_a("F00D"));
    let file = callbacks_file(&[
        format!("postback,POST,{signed},"),
        format!("result,GET,{forged},"),
    ]);

    command()
        .arg("--config")
        .arg(&config_path)
        .arg("replay")
        .arg(file.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("accepted"));

    let log = std::fs::read_to_string(&log_path).unwrap();
    assert!(log.contains("[PAYNOTIFY] TRANSACTION: Postback: "));
    assert!(log.contains("[PAYNOTIFY] NOTICE: Page data: "));
    assert!(log.contains("[PAYNOTIFY] ERROR: Checksum mismatch"));
    assert!(!log.contains("S3CR3T"));
}
