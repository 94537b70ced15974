//! Integration tests for `refresh inspect --json` output.

use std::fs;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::tempdir;

fn refresh_bin() -> Command {
    Command::new(env!("CARGO_BIN_EXE_refresh"))
}

fn write_config(dir: &Path, body: &str) -> std::path::PathBuf {
    let path = dir.join("build.json");
    fs::write(&path, body).unwrap();
    path
}

fn parse_stdout(output: &Output) -> serde_json::Value {
    let stdout = String::from_utf8_lossy(&output.stdout);
    serde_json::from_str(&stdout).unwrap_or_else(|e| panic!("invalid JSON ({e}): {stdout}"))
}

#[test]
fn test_inspect_development_build() {
    let dir = tempdir().unwrap();
    let config = write_config(
        dir.path(),
        r#"{
            "mode": "development",
            "entry": { "main": "./src/index.js" },
            "plugins": ["HotModuleReplacementPlugin"],
            "refresh": { "runtimeDir": "refresh-runtime" }
        }"#,
    );

    let output = refresh_bin()
        .args(["--json", "inspect"])
        .arg(&config)
        .args([
            "--module",
            "src/App.jsx",
            "--module",
            "node_modules/react/index.js",
            "--template",
        ])
        .output()
        .expect("Failed to run inspect command");

    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    let json = parse_stdout(&output);

    assert_eq!(json["ok"], true);
    assert_eq!(json["enabled"], true);
    assert_eq!(json["mode"], "development");

    let main = json["entries"]["main"].as_array().unwrap();
    assert_eq!(main.len(), 2);
    assert!(main[0].as_str().unwrap().ends_with("RefreshEntry.js"));
    assert_eq!(main[1], "./src/index.js");

    assert!(json["provide"]["__react_refresh_utils__"]
        .as_str()
        .unwrap()
        .ends_with("utils.js"));

    let modules = json["modules"].as_array().unwrap();
    assert_eq!(modules[0]["intercepted"], true);
    assert!(modules[0]["loaders"][0].as_str().unwrap().ends_with("loader.js"));
    assert_eq!(modules[1]["intercepted"], false);
    assert_eq!(modules[1]["loaders"].as_array().unwrap().len(), 0);

    let template = json["template"].as_str().unwrap();
    assert!(template.contains("prepareRefresh(module.i)"));
}

#[test]
fn test_inspect_production_build_is_untouched() {
    let dir = tempdir().unwrap();
    let config = write_config(
        dir.path(),
        r#"{ "mode": "production", "entry": "./src/index.js" }"#,
    );

    let output = refresh_bin()
        .args(["--json", "inspect"])
        .arg(&config)
        .args(["--module", "src/App.jsx"])
        .output()
        .expect("Failed to run inspect command");

    assert!(output.status.success());
    let json = parse_stdout(&output);

    assert_eq!(json["enabled"], false);
    assert_eq!(json["entries"]["main"], serde_json::json!(["./src/index.js"]));
    assert_eq!(json["plugins"], serde_json::json!(["ReactRefreshPlugin"]));
    assert_eq!(json["modules"][0]["intercepted"], false);
    assert!(json.get("template").is_none());
}

#[test]
fn test_inspect_missing_hmr_fails() {
    let dir = tempdir().unwrap();
    let config = write_config(dir.path(), r#"{ "mode": "development" }"#);

    let output = refresh_bin()
        .args(["--json", "inspect"])
        .arg(&config)
        .output()
        .expect("Failed to run inspect command");

    assert!(!output.status.success());
    let json = parse_stdout(&output);

    assert_eq!(json["ok"], false);
    assert_eq!(json["error"]["code"], "REFRESH_PLUGIN_HOOK");
    assert!(json["error"]["message"]
        .as_str()
        .unwrap()
        .contains("Hot Module Replacement (HMR) is not enabled"));
}

#[test]
fn test_inspect_force_enables_production() {
    let dir = tempdir().unwrap();
    let config = write_config(
        dir.path(),
        r#"{ "mode": "production", "plugins": ["HotModuleReplacementPlugin"] }"#,
    );

    let output = refresh_bin()
        .args(["--json", "inspect"])
        .arg(&config)
        .arg("--force")
        .output()
        .expect("Failed to run inspect command");

    assert!(output.status.success());
    let json = parse_stdout(&output);
    assert_eq!(json["enabled"], true);
    assert_eq!(json["entries"]["main"].as_array().unwrap().len(), 2);
}

#[test]
fn test_inspect_invalid_config() {
    let dir = tempdir().unwrap();
    let config = write_config(dir.path(), "{ not json");

    let output = refresh_bin()
        .args(["--json", "inspect"])
        .arg(&config)
        .output()
        .expect("Failed to run inspect command");

    assert!(!output.status.success());
    let json = parse_stdout(&output);
    assert_eq!(json["error"]["code"], "REFRESH_CONFIG_PARSE");
}

#[test]
fn test_version() {
    let output = refresh_bin().arg("version").output().unwrap();
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).starts_with("refresh "));
}
