//! Bucket manager
//!
//! Owns the object store for its lifetime and implements bucket setup
//! (create, public-read policy, website hosting) and directory sync on top of it.

use std::path::Path;

use serde::Serialize;
use url::Url;

use crate::error::{Error, Result};
use crate::policy::BucketPolicy;
use crate::sync::{content_type_for, resolve_root, walk};
use crate::traits::{ListOptions, ObjectInfo, ObjectStore};
use crate::website::{normalize_region, website_url, WebsiteConfig};

/// Page size used when listing objects
const LIST_PAGE_SIZE: i32 = 1000;

/// Handle to a bucket known to exist
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Bucket {
    /// Bucket name
    pub name: String,

    /// Region the bucket was created in, when known
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
}

impl Bucket {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            region: None,
        }
    }
}

/// An object written by sync
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UploadedObject {
    pub key: String,
    pub size_bytes: u64,
    pub content_type: String,
}

/// Summary of a completed sync
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SyncReport {
    pub uploaded: Vec<UploadedObject>,
    pub total_bytes: u64,
}

impl SyncReport {
    /// Number of files uploaded
    pub fn len(&self) -> usize {
        self.uploaded.len()
    }

    pub fn is_empty(&self) -> bool {
        self.uploaded.is_empty()
    }
}

/// Manages bucket lifecycle and uploads through an [`ObjectStore`]
pub struct BucketManager<S> {
    store: S,
}

impl<S: ObjectStore> BucketManager<S> {
    /// Create a manager that owns `store`
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Get the underlying store
    pub fn store(&self) -> &S {
        &self.store
    }

    /// List every bucket visible to the account
    pub async fn list_buckets(&self) -> Result<Vec<ObjectInfo>> {
        self.store.list_buckets().await
    }

    /// List every object in a bucket, following continuation tokens
    pub async fn list_objects(&self, bucket: &str) -> Result<Vec<ObjectInfo>> {
        let mut items = Vec::new();
        let mut continuation_token: Option<String> = None;

        loop {
            let options = ListOptions {
                max_keys: Some(LIST_PAGE_SIZE),
                continuation_token: continuation_token.take(),
            };
            let page = self.store.list_objects(bucket, options).await?;
            items.extend(page.items);

            match page.continuation_token {
                Some(token) if page.truncated => continuation_token = Some(token),
                _ => break,
            }
        }

        Ok(items)
    }

    /// Create a bucket, or return the existing one if the caller already owns it
    pub async fn create_or_get_bucket(&self, name: &str) -> Result<Bucket> {
        let region = self.store.region();

        match self.store.create_bucket(name).await {
            Ok(()) => {
                tracing::info!(bucket = name, region = %region, "Created bucket");
                Ok(Bucket {
                    name: name.to_string(),
                    region: Some(region),
                })
            }
            Err(e) if e.is_bucket_already_owned() => {
                tracing::info!(bucket = name, "Bucket already owned by caller, reusing it");
                Ok(Bucket::new(name))
            }
            Err(e) => Err(e),
        }
    }

    /// Grant anonymous read access to every object in the bucket
    pub async fn apply_public_read_policy(&self, bucket: &Bucket) -> Result<()> {
        let policy = BucketPolicy::public_read(&bucket.name).to_json()?;
        tracing::debug!(bucket = %bucket.name, %policy, "Applying bucket policy");
        self.store.put_bucket_policy(&bucket.name, policy).await
    }

    /// Enable static website hosting on the bucket
    pub async fn enable_website_hosting(
        &self,
        bucket: &Bucket,
        config: &WebsiteConfig,
    ) -> Result<()> {
        tracing::debug!(
            bucket = %bucket.name,
            index = %config.index_document,
            error = %config.error_document,
            "Configuring website hosting"
        );
        self.store.put_bucket_website(&bucket.name, config).await
    }

    /// Create the bucket if needed, make it public and enable website hosting
    pub async fn setup_bucket(&self, name: &str, config: &WebsiteConfig) -> Result<Bucket> {
        let bucket = self.create_or_get_bucket(name).await?;
        self.apply_public_read_policy(&bucket).await?;
        self.enable_website_hosting(&bucket, config).await?;
        Ok(bucket)
    }

    /// Public website URL of the bucket
    ///
    /// The region is looked up on the server, since the location reported
    /// for a bucket does not always match the name used at creation.
    pub async fn website_endpoint(&self, bucket: &Bucket) -> Result<Url> {
        let location = self.store.bucket_location(&bucket.name).await?;
        let region = normalize_region(location.as_deref());
        website_url(&bucket.name, &region)
    }

    /// Upload every regular file under `local_root` to `bucket`
    pub async fn sync(&self, local_root: &Path, bucket: &str) -> Result<SyncReport> {
        self.sync_with_progress(local_root, bucket, |_| {}).await
    }

    /// Like [`sync`](Self::sync), calling `on_upload` after each uploaded file
    ///
    /// Stops at the first failure. Objects uploaded before it are kept.
    pub async fn sync_with_progress<F>(
        &self,
        local_root: &Path,
        bucket: &str,
        mut on_upload: F,
    ) -> Result<SyncReport>
    where
        F: FnMut(&UploadedObject),
    {
        let root = resolve_root(local_root)?;
        tracing::debug!(root = %root.display(), bucket, "Starting sync");

        let mut report = SyncReport::default();

        for entry in walk(&root) {
            let entry = entry?;
            let data = tokio::fs::read(&entry.path)
                .await
                .map_err(|source| Error::LocalRead {
                    path: entry.path.clone(),
                    source,
                })?;
            let size_bytes = data.len() as u64;
            let content_type = content_type_for(&entry.key);

            self.store
                .put_object(bucket, &entry.key, data, &content_type)
                .await
                .map_err(|e| Error::Upload {
                    path: entry.path.clone(),
                    source: Box::new(e),
                })?;
            tracing::debug!(key = %entry.key, content_type = %content_type, size_bytes, "Uploaded");

            let uploaded = UploadedObject {
                key: entry.key,
                size_bytes,
                content_type,
            };
            on_upload(&uploaded);
            report.total_bytes += size_bytes;
            report.uploaded.push(uploaded);
        }

        Ok(report)
    }
}
