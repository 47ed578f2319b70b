use assert_cmd::cargo_bin;
use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::process::Command;

mod common;

#[test]
fn test_cli_end_to_end() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::new(cargo_bin!("hkqr"));
    cmd.arg("tests/fixtures/hong_kong_shop.json");

    cmd.assert()
        .success()
        .stdout(predicate::str::diff(format!("{}\n", common::SHOP)));

    Ok(())
}

#[test]
fn test_cli_batch_csv() {
    let mut cmd = Command::new(cargo_bin!("hkqr"));
    cmd.arg("tests/fixtures/batch.jsonl").arg("--format").arg("csv");

    cmd.assert()
        .success()
        .stdout(predicate::str::starts_with("record,payload\n"))
        .stdout(predicate::str::contains(format!("1,{}", common::SHOP)))
        // Dynamic code under operator 26, amount and data template in input order
        .stdout(predicate::str::contains("2,000201010212"))
        .stdout(predicate::str::contains("26260012hk.com.hkicl0106123456"))
        .stdout(predicate::str::contains("540512.5062170106INV-420703T01"));
}

#[test]
fn test_cli_checksum_flag() {
    let mut cmd = Command::new(cargo_bin!("hkqr"));
    cmd.arg("tests/fixtures/hong_kong_shop.json").arg("--checksum");

    cmd.assert()
        .success()
        .stdout(predicate::str::is_match(format!("^{}6304[0-9A-F]{{4}}\n$", common::SHOP)).unwrap());
}

#[test]
fn test_cli_config_file() {
    let mut config = tempfile::NamedTempFile::new().unwrap();
    std::io::Write::write_all(&mut config, br#"{"checksum": true}"#).unwrap();

    let mut cmd = Command::new(cargo_bin!("hkqr"));
    cmd.arg("tests/fixtures/hong_kong_shop.json")
        .arg("--config")
        .arg(config.path());

    cmd.assert()
        .success()
        .stdout(predicate::str::contains(format!("{}6304", common::SHOP)));
}

#[test]
fn test_cli_missing_input_file() {
    let mut cmd = Command::new(cargo_bin!("hkqr"));
    cmd.arg("tests/fixtures/does_not_exist.json");

    cmd.assert().failure();
}
