//! webotron-core: Core library for the webotron static site deployer
//!
//! This crate provides the core functionality for webotron, including:
//! - Configuration management
//! - The bucket manager (bucket setup and directory sync)
//! - Bucket policy and website hosting documents
//! - ObjectStore trait for S3 operations
//!
//! This crate is designed to be independent of any specific S3 SDK,
//! allowing the bucket manager to be tested against mock stores.

pub mod config;
pub mod error;
pub mod manager;
pub mod policy;
pub mod sync;
pub mod traits;
pub mod website;

pub use config::{Config, ConfigManager, SessionConfig};
pub use error::{Error, Result};
pub use manager::{Bucket, BucketManager, SyncReport, UploadedObject};
pub use policy::BucketPolicy;
pub use sync::{content_type_for, walk, SyncEntry};
pub use traits::{ListOptions, ListResult, ObjectInfo, ObjectStore};
pub use website::{website_url, WebsiteConfig};

#[cfg(any(test, feature = "mock"))]
pub use traits::MockObjectStore;
