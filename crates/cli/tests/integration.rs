//! Integration tests for the webotron CLI
//!
//! These tests require a running S3-compatible server that supports
//! bucket policies and website configuration.
//!
//! Run with:
//! ```bash
//! export TEST_S3_ENDPOINT=http://localhost:9000
//! export TEST_S3_ACCESS_KEY=accesskey
//! export TEST_S3_SECRET_KEY=secretkey
//! cargo test --features integration
//! ```

#![cfg(feature = "integration")]

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use std::time::Duration;
use tempfile::TempDir;

/// Get the path to the webotron binary
fn webotron_binary() -> PathBuf {
    if let Ok(path) = std::env::var("CARGO_BIN_EXE_webotron") {
        return PathBuf::from(path);
    }

    let target = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .unwrap()
        .parent()
        .unwrap()
        .join("target");

    let debug = target.join("debug/webotron");
    if debug.exists() {
        return debug;
    }
    target.join("release/webotron")
}

/// Run webotron with an isolated config directory
fn run_webotron(args: &[&str], config_dir: &Path) -> Output {
    Command::new(webotron_binary())
        .args(args)
        .env("WEBOTRON_CONFIG_DIR", config_dir)
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to execute webotron")
}

/// Get S3 test configuration from environment
fn get_test_config() -> Option<(String, String, String)> {
    let endpoint = std::env::var("TEST_S3_ENDPOINT").ok()?;
    let access_key = std::env::var("TEST_S3_ACCESS_KEY").ok()?;
    let secret_key = std::env::var("TEST_S3_SECRET_KEY").ok()?;
    Some((endpoint, access_key, secret_key))
}

/// Write a config file pointing at the test server
fn setup_config() -> Option<TempDir> {
    let (endpoint, access_key, secret_key) = get_test_config()?;
    let config_dir = tempfile::tempdir().ok()?;

    let config = format!(
        r#"schema_version = 1

[session]
endpoint_url = "{endpoint}"
access_key = "{access_key}"
secret_key = "{secret_key}"
region = "us-east-1"
path_style = true
"#
    );
    fs::write(config_dir.path().join("config.toml"), config).ok()?;

    if !wait_for_s3_ready(config_dir.path()) {
        eprintln!("S3 service did not become ready in time");
        return None;
    }

    Some(config_dir)
}

/// Wait for the S3 service to respond to list requests
fn wait_for_s3_ready(config_dir: &Path) -> bool {
    for _ in 0..30 {
        if run_webotron(&["list-buckets", "--json"], config_dir)
            .status
            .success()
        {
            return true;
        }
        std::thread::sleep(Duration::from_secs(1));
    }
    false
}

/// Generate unique suffix for test resources
fn unique_suffix() -> String {
    use std::time::{SystemTime, UNIX_EPOCH};
    let duration = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default();
    format!("{:x}", duration.as_nanos() % 0xFFFFFFFF)
}

fn stdout_json(output: &Output) -> serde_json::Value {
    serde_json::from_slice(&output.stdout).expect("Invalid JSON output")
}

mod setup_bucket {
    use super::*;

    #[test]
    fn test_setup_bucket_is_idempotent() {
        let Some(config_dir) = setup_config() else {
            eprintln!("Skipping: S3 test config not available");
            return;
        };
        let bucket = format!("webotron-setup-{}", unique_suffix());

        for _ in 0..2 {
            let output = run_webotron(&["setup-bucket", &bucket, "--json"], config_dir.path());
            assert!(
                output.status.success(),
                "setup-bucket failed: {}",
                String::from_utf8_lossy(&output.stderr)
            );
            let json = stdout_json(&output);
            assert_eq!(json["status"], "success");
            assert_eq!(json["bucket"], bucket.as_str());
        }

        let output = run_webotron(&["list-buckets", "--json"], config_dir.path());
        assert!(String::from_utf8_lossy(&output.stdout).contains(&bucket));
    }
}

mod sync {
    use super::*;

    fn write_site(root: &Path) {
        fs::create_dir_all(root.join("assets")).unwrap();
        fs::write(root.join("index.html"), "<h1>Home</h1>").unwrap();
        fs::write(root.join("error.html"), "<h1>Oops</h1>").unwrap();
        fs::write(root.join("assets/style.css"), "body { margin: 0 }").unwrap();
    }

    #[test]
    fn test_sync_uploads_site() {
        let Some(config_dir) = setup_config() else {
            eprintln!("Skipping: S3 test config not available");
            return;
        };
        let bucket = format!("webotron-sync-{}", unique_suffix());
        let output = run_webotron(&["setup-bucket", &bucket], config_dir.path());
        assert!(output.status.success(), "setup-bucket failed");

        let site = tempfile::tempdir().unwrap();
        write_site(site.path());

        let output = run_webotron(
            &["sync", site.path().to_str().unwrap(), &bucket, "--json"],
            config_dir.path(),
        );
        assert!(
            output.status.success(),
            "sync failed: {}",
            String::from_utf8_lossy(&output.stderr)
        );
        let json = stdout_json(&output);
        assert_eq!(json["total_bytes"], 44);

        let output = run_webotron(&["list-bucket-objects", &bucket, "--json"], config_dir.path());
        assert!(output.status.success(), "list-bucket-objects failed");
        let json = stdout_json(&output);
        let mut keys: Vec<String> = json["items"]
            .as_array()
            .unwrap()
            .iter()
            .map(|item| item["key"].as_str().unwrap().to_string())
            .collect();
        keys.sort();
        assert_eq!(keys, vec!["assets/style.css", "error.html", "index.html"]);
    }

    #[test]
    fn test_sync_missing_path_exits_not_found() {
        let Some(config_dir) = setup_config() else {
            eprintln!("Skipping: S3 test config not available");
            return;
        };
        let missing = config_dir.path().join("no-such-site");

        let output = run_webotron(
            &["sync", missing.to_str().unwrap(), "any-bucket"],
            config_dir.path(),
        );
        assert_eq!(output.status.code(), Some(5));
    }
}
