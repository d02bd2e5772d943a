//! setup-bucket command
//!
//! Creates the bucket if needed, applies the public-read policy and
//! enables static website hosting.

use clap::Args;
use serde::Serialize;
use webotron_core::{BucketManager, ObjectStore, WebsiteConfig};

use crate::exit_code::ExitCode;
use crate::output::Formatter;

/// Create and configure a bucket for website hosting
#[derive(Args, Debug)]
pub struct SetupBucketArgs {
    /// Bucket name
    pub bucket: String,

    /// Document served for directory-style requests (default: index.html)
    #[arg(long)]
    pub index_document: Option<String>,

    /// Document served on errors (default: error.html)
    #[arg(long)]
    pub error_document: Option<String>,
}

#[derive(Debug, Serialize)]
struct SetupBucketOutput {
    status: &'static str,
    bucket: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    region: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    url: Option<String>,
}

/// Execute the setup-bucket command
pub async fn execute<S: ObjectStore>(
    args: SetupBucketArgs,
    defaults: &WebsiteConfig,
    manager: &BucketManager<S>,
    formatter: &Formatter,
) -> ExitCode {
    if let Err(e) = validate_bucket_name(&args.bucket) {
        formatter.error(&e);
        return ExitCode::UsageError;
    }

    let website = WebsiteConfig {
        index_document: args
            .index_document
            .unwrap_or_else(|| defaults.index_document.clone()),
        error_document: args
            .error_document
            .unwrap_or_else(|| defaults.error_document.clone()),
    };

    let bucket = match manager.setup_bucket(&args.bucket, &website).await {
        Ok(bucket) => bucket,
        Err(e) => {
            formatter.error(&format!("Failed to set up bucket '{}': {e}", args.bucket));
            return ExitCode::from_error(&e);
        }
    };

    let url = match manager.website_endpoint(&bucket).await {
        Ok(url) => Some(url.to_string()),
        Err(e) => {
            formatter.warning(&format!("Could not determine website URL: {e}"));
            None
        }
    };

    if formatter.is_json() {
        formatter.json(&SetupBucketOutput {
            status: "success",
            bucket: bucket.name,
            region: bucket.region,
            url,
        });
    } else {
        formatter.success(&format!(
            "Bucket '{}' is ready for website hosting (index: {}, error: {}).",
            bucket.name, website.index_document, website.error_document
        ));
        if let Some(url) = url {
            formatter.println(&url);
        }
    }

    ExitCode::Success
}

/// Basic S3 bucket name validation
fn validate_bucket_name(name: &str) -> Result<(), String> {
    if name.len() < 3 || name.len() > 63 {
        return Err("Bucket name must be between 3 and 63 characters".to_string());
    }

    if !name
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '.')
    {
        return Err(format!(
            "Invalid bucket name '{name}': use lowercase letters, digits, '-' and '.'"
        ));
    }

    let alphanumeric = |c: Option<char>| c.is_some_and(|c| c.is_ascii_alphanumeric());
    if !alphanumeric(name.chars().next()) || !alphanumeric(name.chars().last()) {
        return Err(format!(
            "Invalid bucket name '{name}': must start and end with a letter or digit"
        ));
    }

    Ok(())
}
