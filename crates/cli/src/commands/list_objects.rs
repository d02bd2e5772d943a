//! list-bucket-objects command
//!
//! Lists every object stored in a bucket.

use clap::Args;
use comfy_table::{presets, CellAlignment, Table};
use serde::Serialize;
use webotron_core::{BucketManager, ObjectInfo, ObjectStore};

use crate::exit_code::ExitCode;
use crate::output::{format_timestamp, Formatter};

/// List objects in a bucket
#[derive(Args, Debug)]
pub struct ListObjectsArgs {
    /// Bucket name
    pub bucket: String,
}

#[derive(Debug, Serialize)]
struct ListObjectsOutput {
    bucket: String,
    items: Vec<ObjectInfo>,
    total_objects: usize,
    total_size_bytes: i64,
    total_size_human: String,
}

/// Execute the list-bucket-objects command
pub async fn execute<S: ObjectStore>(
    args: ListObjectsArgs,
    manager: &BucketManager<S>,
    formatter: &Formatter,
) -> ExitCode {
    let items = match manager.list_objects(&args.bucket).await {
        Ok(items) => items,
        Err(e) => {
            formatter.error(&format!("Failed to list objects in '{}': {e}", args.bucket));
            return ExitCode::from_error(&e);
        }
    };

    let total_size: i64 = items.iter().filter_map(|i| i.size_bytes).sum();
    let total_size_human = humansize::format_size(total_size.max(0) as u64, humansize::BINARY);

    if formatter.is_json() {
        formatter.json(&ListObjectsOutput {
            bucket: args.bucket,
            total_objects: items.len(),
            total_size_bytes: total_size,
            total_size_human,
            items,
        });
        return ExitCode::Success;
    }

    if items.is_empty() {
        formatter.println(&format!("Bucket '{}' is empty.", args.bucket));
        return ExitCode::Success;
    }

    formatter.println(&object_table(&items).to_string());
    formatter.println(&format!(
        "\nTotal: {} objects, {total_size_human}",
        items.len()
    ));

    ExitCode::Success
}

fn object_table(items: &[ObjectInfo]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(presets::NOTHING)
        .set_header(vec!["LAST MODIFIED", "SIZE", "KEY"]);

    for item in items {
        table.add_row(vec![
            format_timestamp(item.last_modified),
            item.size_human.clone().unwrap_or_default(),
            item.key.clone(),
        ]);
    }

    if let Some(column) = table.column_mut(1) {
        column.set_cell_alignment(CellAlignment::Right);
    }

    table
}
