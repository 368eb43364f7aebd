//! Command-line behaviour of the `clareia` binary.

use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn clareia(config: &Path) -> Command {
    let mut cmd = Command::cargo_bin("clareia").unwrap();
    cmd.arg("--config")
        .arg(config)
        .env_remove("CLAREIA_API_KEY")
        .env_remove("CLAREIA_ENDPOINT")
        .env_remove("RUST_LOG");
    cmd
}

fn write_config(dir: &TempDir, json: &str) -> std::path::PathBuf {
    let path = dir.path().join("config.json");
    fs::write(&path, json).unwrap();
    path
}

#[test]
fn demo_prints_statement_json() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("missing.json");

    clareia(&config)
        .arg("demo")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"statementDate\": \"Março 2023\""))
        .stdout(predicate::str::contains("\"totalAmount\""));
}

#[test]
fn demo_text_for_utility_bill() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("missing.json");

    clareia(&config)
        .args(["demo", "--dataset", "utility-bill", "--format", "text"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Extrato de Abril 2023"))
        .stdout(predicate::str::contains("R$ 166,07"));
}

#[test]
fn rust_log_overrides_default_level() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("missing.json");

    clareia(&config)
        .arg("demo")
        .assert()
        .success()
        .stderr(predicate::str::contains("example dataset").not());

    clareia(&config)
        .env("RUST_LOG", "info")
        .arg("demo")
        .assert()
        .success()
        .stderr(predicate::str::contains("Printing bank-statement example dataset"));
}

#[test]
fn process_in_demo_mode_labels_with_file_name() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("missing.json");
    let input = dir.path().join("extrato-marco.pdf");
    fs::write(&input, b"%PDF-1.4").unwrap();

    clareia(&config)
        .arg("process")
        .arg(&input)
        .arg("--demo")
        .assert()
        .success()
        .stdout(predicate::str::contains("Março 2023 - extrato-marco"));
}

#[test]
fn process_writes_output_file() {
    let dir = TempDir::new().unwrap();
    let config = write_config(&dir, r#"{ "pipeline": { "mode": "demo" } }"#);
    let input = dir.path().join("conta.png");
    let output = dir.path().join("out.json");
    fs::write(&input, [0x89, b'P', b'N', b'G']).unwrap();

    clareia(&config)
        .arg("process")
        .arg(&input)
        .arg("--output")
        .arg(&output)
        .assert()
        .success();

    let written: serde_json::Value = serde_json::from_str(&fs::read_to_string(&output).unwrap()).unwrap();
    assert_eq!(written["statementDate"], "Março 2023 - conta");
}

#[test]
fn live_process_without_credential_fails() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("missing.json");
    let input = dir.path().join("extrato.txt");
    fs::write(&input, "04/03 SEGURO 29,90").unwrap();

    clareia(&config)
        .env("CLAREIA_ENDPOINT", "http://127.0.0.1:9/generate")
        .arg("process")
        .arg(&input)
        .assert()
        .failure()
        .stderr(predicate::str::contains("CLAREIA_API_KEY"));
}

#[test]
fn live_process_without_endpoint_fails() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("missing.json");
    let input = dir.path().join("extrato.txt");
    fs::write(&input, "04/03 SEGURO 29,90").unwrap();

    clareia(&config)
        .env("CLAREIA_API_KEY", "test-key")
        .arg("process")
        .arg(&input)
        .assert()
        .failure()
        .stderr(predicate::str::contains("CLAREIA_ENDPOINT"));
}

#[test]
fn oversized_upload_is_rejected() {
    let dir = TempDir::new().unwrap();
    let config = write_config(&dir, r#"{ "upload": { "max_file_bytes": 8 } }"#);
    let input = dir.path().join("grande.pdf");
    fs::write(&input, vec![0u8; 64]).unwrap();

    clareia(&config)
        .arg("process")
        .arg(&input)
        .arg("--demo")
        .assert()
        .failure()
        .stderr(predicate::str::contains("upload limit"));
}

#[test]
fn missing_input_is_reported() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("missing.json");

    clareia(&config)
        .args(["process", "nao-existe.pdf", "--demo"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Input file not found"));
}

#[test]
fn prompt_ends_with_document_text() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("missing.json");
    let input = dir.path().join("extrato.txt");
    fs::write(&input, "05/03 TARIFA MENSAL 12,00").unwrap();

    clareia(&config)
        .arg("prompt")
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::contains("Extrato para análise:"))
        .stdout(predicate::str::ends_with("05/03 TARIFA MENSAL 12,00\n"));
}

#[test]
fn config_init_set_get_round() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("nested").join("config.json");

    clareia(&config).args(["config", "init"]).assert().success();
    assert!(config.exists());

    clareia(&config)
        .args(["config", "init"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--force"));

    clareia(&config)
        .args(["config", "set", "pipeline.mode", "demo"])
        .assert()
        .success();

    clareia(&config)
        .args(["config", "get", "pipeline.mode"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"demo\""));
}

#[test]
fn config_set_rejects_out_of_range_tokens() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("config.json");

    clareia(&config)
        .args(["config", "set", "generation.max_output_tokens", "9000"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("max_output_tokens"));

    assert!(!config.exists());
}

#[test]
fn config_get_unknown_key_fails() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("config.json");

    clareia(&config)
        .args(["config", "get", "service.nope"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Configuration key not found"));
}
