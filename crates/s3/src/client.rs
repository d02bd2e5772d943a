//! S3 client implementation
//!
//! Wraps aws-sdk-s3 and implements the ObjectStore trait from webotron-core.

use async_trait::async_trait;
use aws_credential_types::provider::ProvideCredentials;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::types::{
    BucketLocationConstraint, CreateBucketConfiguration, ErrorDocument, IndexDocument,
    WebsiteConfiguration,
};
use aws_smithy_types::error::display::DisplayErrorContext;

use webotron_core::website::DEFAULT_REGION;
use webotron_core::{
    Error, ListOptions, ListResult, ObjectInfo, ObjectStore, Result, SessionConfig, WebsiteConfig,
};

use crate::error::ProviderError;

/// S3 client wrapper
pub struct S3Client {
    inner: aws_sdk_s3::Client,
    region: String,
}

impl S3Client {
    /// Create a new S3 client from a session configuration
    ///
    /// Unset session fields are resolved by the AWS SDK default chain.
    pub async fn new(session: SessionConfig) -> Result<Self> {
        let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .retry_config(aws_config::retry::RetryConfig::disabled());

        if let Some(profile) = &session.profile {
            loader = loader.profile_name(profile);
        }

        if let Some(region) = &session.region {
            loader = loader.region(aws_config::Region::new(region.clone()));
        }

        if let Some(endpoint) = &session.endpoint_url {
            loader = loader.endpoint_url(endpoint);
        }

        if let Some((access_key, secret_key)) = session.static_credentials() {
            let credentials = aws_credential_types::Credentials::new(
                access_key,
                secret_key,
                None, // session token
                None, // expiry
                "webotron-static-credentials",
            );
            loader = loader.credentials_provider(credentials);
        }

        let config = loader.load().await;

        // Resolve once up front so missing credentials fail before any request
        let provider = config
            .credentials_provider()
            .ok_or_else(|| Error::Auth("No credentials provider available".into()))?;
        provider.provide_credentials().await.map_err(|e| {
            Error::Auth(format!(
                "Could not resolve credentials: {}",
                DisplayErrorContext(&e)
            ))
        })?;

        let region = config
            .region()
            .map(|r| r.to_string())
            .unwrap_or_else(|| DEFAULT_REGION.to_string());

        let s3_config = aws_sdk_s3::config::Builder::from(&config)
            .force_path_style(session.path_style)
            .build();

        tracing::debug!(
            profile = ?session.profile,
            region = %region,
            endpoint = ?session.endpoint_url,
            "Created S3 client"
        );

        Ok(Self {
            inner: aws_sdk_s3::Client::from_conf(s3_config),
            region,
        })
    }
}

#[async_trait]
impl ObjectStore for S3Client {
    fn region(&self) -> String {
        self.region.clone()
    }

    async fn list_buckets(&self) -> Result<Vec<ObjectInfo>> {
        let response = self
            .inner
            .list_buckets()
            .send()
            .await
            .map_err(|e| ProviderError::from_sdk(&e).into_error())?;

        let buckets = response
            .buckets()
            .iter()
            .map(|b| {
                let mut info = ObjectInfo::bucket(b.name().unwrap_or_default());
                if let Some(creation_date) = b.creation_date() {
                    info.last_modified = jiff::Timestamp::from_second(creation_date.secs()).ok();
                }
                info
            })
            .collect();

        Ok(buckets)
    }

    async fn list_objects(&self, bucket: &str, options: ListOptions) -> Result<ListResult> {
        let response = self
            .inner
            .list_objects_v2()
            .bucket(bucket)
            .set_max_keys(options.max_keys)
            .set_continuation_token(options.continuation_token)
            .send()
            .await
            .map_err(|e| ProviderError::from_sdk(&e).into_error())?;

        let items = response
            .contents()
            .iter()
            .map(|object| {
                let mut info =
                    ObjectInfo::file(object.key().unwrap_or_default(), object.size().unwrap_or(0));

                if let Some(modified) = object.last_modified() {
                    info.last_modified = jiff::Timestamp::from_second(modified.secs()).ok();
                }

                if let Some(etag) = object.e_tag() {
                    info.etag = Some(etag.trim_matches('"').to_string());
                }

                if let Some(sc) = object.storage_class() {
                    info.storage_class = Some(sc.as_str().to_string());
                }

                info
            })
            .collect();

        Ok(ListResult {
            items,
            truncated: response.is_truncated().unwrap_or(false),
            continuation_token: response.next_continuation_token().map(|s| s.to_string()),
        })
    }

    async fn create_bucket(&self, bucket: &str) -> Result<()> {
        let mut request = self.inner.create_bucket().bucket(bucket);

        // us-east-1 rejects an explicit location constraint
        if self.region != DEFAULT_REGION {
            let configuration = CreateBucketConfiguration::builder()
                .location_constraint(BucketLocationConstraint::from(self.region.as_str()))
                .build();
            request = request.create_bucket_configuration(configuration);
        }

        request
            .send()
            .await
            .map_err(|e| ProviderError::from_sdk(&e).into_creation_error())?;

        Ok(())
    }

    async fn bucket_location(&self, bucket: &str) -> Result<Option<String>> {
        let response = self
            .inner
            .get_bucket_location()
            .bucket(bucket)
            .send()
            .await
            .map_err(|e| ProviderError::from_sdk(&e).into_error())?;

        Ok(response
            .location_constraint()
            .map(|c| c.as_str().to_string()))
    }

    async fn put_bucket_policy(&self, bucket: &str, policy: String) -> Result<()> {
        self.inner
            .put_bucket_policy()
            .bucket(bucket)
            .policy(policy)
            .send()
            .await
            .map_err(|e| {
                ProviderError::from_sdk(&e).classify(|e| Error::Policy(e.to_string()))
            })?;

        Ok(())
    }

    async fn put_bucket_website(&self, bucket: &str, config: &WebsiteConfig) -> Result<()> {
        let index = IndexDocument::builder()
            .suffix(&config.index_document)
            .build()
            .map_err(|e| Error::WebsiteConfig(e.to_string()))?;
        let error = ErrorDocument::builder()
            .key(&config.error_document)
            .build()
            .map_err(|e| Error::WebsiteConfig(e.to_string()))?;
        let website = WebsiteConfiguration::builder()
            .index_document(index)
            .error_document(error)
            .build();

        self.inner
            .put_bucket_website()
            .bucket(bucket)
            .website_configuration(website)
            .send()
            .await
            .map_err(|e| {
                ProviderError::from_sdk(&e).classify(|e| Error::WebsiteConfig(e.to_string()))
            })?;

        Ok(())
    }

    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        data: Vec<u8>,
        content_type: &str,
    ) -> Result<ObjectInfo> {
        let size = data.len() as i64;

        let response = self
            .inner
            .put_object()
            .bucket(bucket)
            .key(key)
            .content_type(content_type)
            .body(ByteStream::from(data))
            .send()
            .await
            .map_err(|e| ProviderError::from_sdk(&e).into_error())?;

        let mut info = ObjectInfo::file(key, size);
        if let Some(etag) = response.e_tag() {
            info.etag = Some(etag.trim_matches('"').to_string());
        }
        info.content_type = Some(content_type.to_string());
        info.last_modified = Some(jiff::Timestamp::now());

        Ok(info)
    }
}
