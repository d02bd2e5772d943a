//! sync command
//!
//! Uploads every regular file under a local directory to a bucket,
//! keyed by its path relative to that directory.

use std::path::PathBuf;

use clap::Args;
use serde::Serialize;
use webotron_core::{Bucket, BucketManager, ObjectStore, SyncReport};

use crate::exit_code::ExitCode;
use crate::output::{Formatter, Spinner};

/// Sync a local directory to a bucket
#[derive(Args, Debug)]
pub struct SyncArgs {
    /// Local directory to upload
    pub pathname: PathBuf,

    /// Target bucket (must already exist)
    pub bucket: String,
}

#[derive(Debug, Serialize)]
struct SyncOutput {
    status: &'static str,
    bucket: String,
    #[serde(flatten)]
    report: SyncReport,
    #[serde(skip_serializing_if = "Option::is_none")]
    url: Option<String>,
}

/// Execute the sync command
pub async fn execute<S: ObjectStore>(
    args: SyncArgs,
    manager: &BucketManager<S>,
    formatter: &Formatter,
) -> ExitCode {
    let spinner = Spinner::new(
        formatter.config(),
        &format!("Uploading {} to {}", args.pathname.display(), args.bucket),
    );
    let show_files = !formatter.is_quiet() && !formatter.is_json();

    let result = manager
        .sync_with_progress(&args.pathname, &args.bucket, |uploaded| {
            spinner.set_message(&uploaded.key);
            if show_files {
                spinner.println(&format!(
                    "{} {}",
                    uploaded.key,
                    formatter.dim(&format!(
                        "({}, {})",
                        humansize::format_size(uploaded.size_bytes, humansize::BINARY),
                        uploaded.content_type
                    ))
                ));
            }
        })
        .await;
    spinner.finish_and_clear();

    let report = match result {
        Ok(report) => report,
        Err(e) => {
            formatter.error(&format!("Sync to '{}' failed: {e}", args.bucket));
            return ExitCode::from_error(&e);
        }
    };

    let url = match manager.website_endpoint(&Bucket::new(&args.bucket)).await {
        Ok(url) => Some(url.to_string()),
        Err(e) => {
            tracing::debug!(bucket = %args.bucket, error = %e, "Website URL lookup failed");
            None
        }
    };

    if formatter.is_json() {
        formatter.json(&SyncOutput {
            status: "success",
            bucket: args.bucket,
            report,
            url,
        });
        return ExitCode::Success;
    }

    if report.is_empty() {
        formatter.warning(&format!(
            "No files found under {}.",
            args.pathname.display()
        ));
    } else {
        formatter.success(&format!(
            "Uploaded {} file(s), {} to '{}'.",
            report.len(),
            humansize::format_size(report.total_bytes, humansize::BINARY),
            args.bucket
        ));
    }
    if let Some(url) = url {
        formatter.println(&url);
    }

    ExitCode::Success
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::OutputConfig;
    use std::fs;
    use webotron_core::{Error, MockObjectStore, ObjectInfo};

    fn quiet() -> Formatter {
        Formatter::new(OutputConfig {
            quiet: true,
            no_progress: true,
            ..Default::default()
        })
    }

    #[tokio::test]
    async fn test_sync_command_uploads_tree() {
        let temp = tempfile::tempdir().unwrap();
        fs::create_dir_all(temp.path().join("assets")).unwrap();
        fs::write(temp.path().join("index.html"), "home").unwrap();
        fs::write(temp.path().join("assets/style.css"), "body {}").unwrap();

        let mut store = MockObjectStore::new();
        store
            .expect_put_object()
            .withf(|bucket, key, _, _| {
                bucket == "my-bucket" && (key == "index.html" || key == "assets/style.css")
            })
            .times(2)
            .returning(|_, key, data, _| Ok(ObjectInfo::file(key, data.len() as i64)));
        store
            .expect_bucket_location()
            .returning(|_| Ok(Some("eu-west-1".to_string())));
        let manager = BucketManager::new(store);

        let args = SyncArgs {
            pathname: temp.path().to_path_buf(),
            bucket: "my-bucket".to_string(),
        };
        assert_eq!(execute(args, &manager, &quiet()).await, ExitCode::Success);
    }

    #[tokio::test]
    async fn test_sync_command_missing_bucket_exits_not_found() {
        let temp = tempfile::tempdir().unwrap();
        fs::write(temp.path().join("index.html"), "home").unwrap();

        let mut store = MockObjectStore::new();
        store
            .expect_put_object()
            .returning(|bucket, _, _, _| Err(Error::NotFound(format!("NoSuchBucket: {bucket}"))));
        store.expect_bucket_location().times(0);
        let manager = BucketManager::new(store);

        let args = SyncArgs {
            pathname: temp.path().to_path_buf(),
            bucket: "missing".to_string(),
        };
        assert_eq!(execute(args, &manager, &quiet()).await, ExitCode::NotFound);
    }
}
