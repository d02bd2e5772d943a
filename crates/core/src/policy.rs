//! Bucket policy documents
//!
//! Policies are built as typed values and serialized with serde_json,
//! so bucket names never pass through string templating.

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// IAM policy language version
pub const POLICY_VERSION: &str = "2012-10-17";

/// Statement id used for the public-read grant
pub const PUBLIC_READ_SID: &str = "PublicReadGetObject";

/// Statement effect
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Effect {
    Allow,
    Deny,
}

/// A bucket policy document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct BucketPolicy {
    pub version: String,
    pub statement: Vec<Statement>,
}

/// A single policy statement
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Statement {
    pub sid: String,
    pub effect: Effect,
    pub principal: String,
    pub action: Vec<String>,
    pub resource: Vec<String>,
}

impl BucketPolicy {
    /// Policy letting anonymous principals read every object in `bucket`
    pub fn public_read(bucket: &str) -> Self {
        Self {
            version: POLICY_VERSION.to_string(),
            statement: vec![Statement {
                sid: PUBLIC_READ_SID.to_string(),
                effect: Effect::Allow,
                principal: "*".to_string(),
                action: vec!["s3:GetObject".to_string()],
                resource: vec![object_arn(bucket)],
            }],
        }
    }

    /// Serialize to the compact JSON wire format
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// ARN matching every object in a bucket
fn object_arn(bucket: &str) -> String {
    format!("arn:aws:s3:::{bucket}/*")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_read_policy_document() {
        let policy = BucketPolicy::public_read("my-bucket");
        let json = serde_json::to_string_pretty(&policy).unwrap();
        insta::assert_snapshot!(json, @r#"
        {
          "Version": "2012-10-17",
          "Statement": [
            {
              "Sid": "PublicReadGetObject",
              "Effect": "Allow",
              "Principal": "*",
              "Action": [
                "s3:GetObject"
              ],
              "Resource": [
                "arn:aws:s3:::my-bucket/*"
              ]
            }
          ]
        }
        "#);
    }

    #[test]
    fn test_policy_is_idempotent() {
        let first = BucketPolicy::public_read("site").to_json().unwrap();
        let second = BucketPolicy::public_read("site").to_json().unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_policy_escapes_bucket_name() {
        // Not a valid bucket name, but must still produce valid JSON
        let policy = BucketPolicy::public_read(r#"evil"],"Principal":"x"#);
        let json = policy.to_json().unwrap();
        let parsed: BucketPolicy = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, policy);
        assert_eq!(parsed.statement.len(), 1);
        assert_eq!(parsed.statement[0].principal, "*");
    }
}
