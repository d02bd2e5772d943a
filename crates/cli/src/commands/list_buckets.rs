//! list-buckets command
//!
//! Lists every bucket visible to the account.

use comfy_table::{presets, Table};
use serde::Serialize;
use webotron_core::{BucketManager, ObjectInfo, ObjectStore};

use crate::exit_code::ExitCode;
use crate::output::{format_timestamp, Formatter};

#[derive(Debug, Serialize)]
struct ListBucketsOutput {
    buckets: Vec<ObjectInfo>,
}

/// Execute the list-buckets command
pub async fn execute<S: ObjectStore>(manager: &BucketManager<S>, formatter: &Formatter) -> ExitCode {
    let buckets = match manager.list_buckets().await {
        Ok(buckets) => buckets,
        Err(e) => {
            formatter.error(&format!("Failed to list buckets: {e}"));
            return ExitCode::from_error(&e);
        }
    };

    if formatter.is_json() {
        formatter.json(&ListBucketsOutput { buckets });
        return ExitCode::Success;
    }

    if buckets.is_empty() {
        formatter.println("No buckets found.");
        return ExitCode::Success;
    }

    formatter.println(&bucket_table(&buckets).to_string());
    ExitCode::Success
}

fn bucket_table(buckets: &[ObjectInfo]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(presets::NOTHING)
        .set_header(vec!["CREATED", "BUCKET"]);

    for bucket in buckets {
        table.add_row(vec![format_timestamp(bucket.last_modified), bucket.key.clone()]);
    }

    table
}
