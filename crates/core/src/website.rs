//! Static website hosting configuration and endpoints
//!
//! S3 serves bucket websites from a per-region host. Older regions use a
//! dash-separated host (`s3-website-us-east-1`), newer ones a dot-separated
//! host (`s3-website.eu-central-1`), so the host cannot be derived from the
//! region name alone.

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::Result;

/// Default region when a bucket reports no location constraint
pub const DEFAULT_REGION: &str = "us-east-1";

const DEFAULT_INDEX_DOCUMENT: &str = "index.html";
const DEFAULT_ERROR_DOCUMENT: &str = "error.html";

/// Website hosting settings for a bucket
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebsiteConfig {
    /// Document served for directory-style requests
    #[serde(default = "default_index_document")]
    pub index_document: String,

    /// Document served on 4xx responses
    #[serde(default = "default_error_document")]
    pub error_document: String,
}

fn default_index_document() -> String {
    DEFAULT_INDEX_DOCUMENT.to_string()
}

fn default_error_document() -> String {
    DEFAULT_ERROR_DOCUMENT.to_string()
}

impl Default for WebsiteConfig {
    fn default() -> Self {
        Self {
            index_document: default_index_document(),
            error_document: default_error_document(),
        }
    }
}

impl WebsiteConfig {
    /// Create a configuration with custom documents
    pub fn new(index_document: impl Into<String>, error_document: impl Into<String>) -> Self {
        Self {
            index_document: index_document.into(),
            error_document: error_document.into(),
        }
    }
}

/// Website endpoint of an S3 region
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegionEndpoint {
    /// Region name
    pub region: &'static str,
    /// Website endpoint host
    pub host: &'static str,
}

/// Known S3 website endpoints
pub const REGION_ENDPOINTS: &[RegionEndpoint] = &[
    RegionEndpoint {
        region: "us-east-1",
        host: "s3-website-us-east-1.amazonaws.com",
    },
    RegionEndpoint {
        region: "us-east-2",
        host: "s3-website.us-east-2.amazonaws.com",
    },
    RegionEndpoint {
        region: "us-west-1",
        host: "s3-website-us-west-1.amazonaws.com",
    },
    RegionEndpoint {
        region: "us-west-2",
        host: "s3-website-us-west-2.amazonaws.com",
    },
    RegionEndpoint {
        region: "ca-central-1",
        host: "s3-website.ca-central-1.amazonaws.com",
    },
    RegionEndpoint {
        region: "ap-east-1",
        host: "s3-website.ap-east-1.amazonaws.com",
    },
    RegionEndpoint {
        region: "ap-south-1",
        host: "s3-website.ap-south-1.amazonaws.com",
    },
    RegionEndpoint {
        region: "ap-northeast-1",
        host: "s3-website-ap-northeast-1.amazonaws.com",
    },
    RegionEndpoint {
        region: "ap-northeast-2",
        host: "s3-website.ap-northeast-2.amazonaws.com",
    },
    RegionEndpoint {
        region: "ap-northeast-3",
        host: "s3-website.ap-northeast-3.amazonaws.com",
    },
    RegionEndpoint {
        region: "ap-southeast-1",
        host: "s3-website-ap-southeast-1.amazonaws.com",
    },
    RegionEndpoint {
        region: "ap-southeast-2",
        host: "s3-website-ap-southeast-2.amazonaws.com",
    },
    RegionEndpoint {
        region: "eu-central-1",
        host: "s3-website.eu-central-1.amazonaws.com",
    },
    RegionEndpoint {
        region: "eu-west-1",
        host: "s3-website-eu-west-1.amazonaws.com",
    },
    RegionEndpoint {
        region: "eu-west-2",
        host: "s3-website.eu-west-2.amazonaws.com",
    },
    RegionEndpoint {
        region: "eu-west-3",
        host: "s3-website.eu-west-3.amazonaws.com",
    },
    RegionEndpoint {
        region: "eu-north-1",
        host: "s3-website.eu-north-1.amazonaws.com",
    },
    RegionEndpoint {
        region: "sa-east-1",
        host: "s3-website-sa-east-1.amazonaws.com",
    },
];

/// Look up the website endpoint of a region
pub fn endpoint_for(region: &str) -> Option<&'static RegionEndpoint> {
    REGION_ENDPOINTS.iter().find(|e| e.region == region)
}

/// Normalize a bucket location constraint into a region name
///
/// S3 reports buckets in us-east-1 with an empty location, and some
/// eu-west-1 buckets with the legacy value `EU`.
pub fn normalize_region(location: Option<&str>) -> String {
    match location.map(str::trim) {
        None | Some("") => DEFAULT_REGION.to_string(),
        Some("EU") => "eu-west-1".to_string(),
        Some(region) => region.to_string(),
    }
}

/// Website host for a region, falling back to the dot-style template
pub fn website_host(region: &str) -> String {
    match endpoint_for(region) {
        Some(endpoint) => endpoint.host.to_string(),
        None => format!("s3-website.{region}.amazonaws.com"),
    }
}

/// Public website URL of a bucket in a region
pub fn website_url(bucket: &str, region: &str) -> Result<Url> {
    Ok(Url::parse(&format!(
        "http://{bucket}.{}",
        website_host(region)
    ))?)
}
