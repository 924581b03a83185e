/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_credential_types::provider::{ProvideCredentials, SharedCredentialsProvider};
use aws_credential_types::Credentials;
use aws_sdk_s3::config::Region;
use aws_sdk_s3::presigning::PresigningConfig;
use aws_sdk_s3::primitives::ByteStream;
use aws_types::SdkConfig;
use bytes::Bytes;

use super::post_policy::PostPolicy;
use super::{ClientFactory, ObjectStorage};
use crate::config::ClientSettings;
use crate::error::{invalid_input, ConfigurationError, Error, ErrorKind, BACKEND_NAME};
use crate::types::{CredentialSource, PresignedPost};

/// [`ObjectStorage`] backed by an Amazon S3 client.
#[derive(Debug, Clone)]
pub struct S3Storage {
    client: aws_sdk_s3::Client,
    region: Option<Region>,
    credentials: Option<SharedCredentialsProvider>,
    endpoint_url: Option<String>,
}

impl S3Storage {
    /// Wrap an existing S3 client.
    ///
    /// Presigned `POST` forms need direct access to credentials and are unavailable for storage
    /// created this way; use [`from_sdk_config`](Self::from_sdk_config) instead.
    pub fn new(client: aws_sdk_s3::Client) -> Self {
        Self {
            region: client.config().region().cloned(),
            client,
            credentials: None,
            endpoint_url: None,
        }
    }

    /// Create the S3 client from shared SDK configuration.
    ///
    /// Path-style addressing is enabled when the configuration carries a custom endpoint.
    pub fn from_sdk_config(sdk_config: &SdkConfig) -> Self {
        let endpoint_url = sdk_config.endpoint_url().map(str::to_owned);
        let config = aws_sdk_s3::config::Builder::from(sdk_config)
            .force_path_style(endpoint_url.is_some())
            .build();

        Self {
            client: aws_sdk_s3::Client::from_conf(config),
            region: sdk_config.region().cloned(),
            credentials: sdk_config.credentials_provider(),
            endpoint_url,
        }
    }

    /// The underlying Amazon S3 client
    pub fn client(&self) -> &aws_sdk_s3::Client {
        &self.client
    }

    fn region(&self) -> Result<&str, Error> {
        self.region
            .as_ref()
            .map(|region| region.as_ref())
            .ok_or_else(|| ConfigurationError::with_reason("no region configured").into())
    }

    async fn resolve_credentials(&self) -> Result<Credentials, Error> {
        let provider = self.credentials.as_ref().ok_or_else(|| {
            Error::from(ConfigurationError::with_reason(
                "no credentials provider configured",
            ))
        })?;

        provider
            .provide_credentials()
            .await
            .map_err(|err| Error::new(ErrorKind::ConnectorConfiguration, err))
    }

    // Follows the SDK's addressing choice so upload forms and download URLs agree.
    fn post_url(&self, bucket: &str, region: &str) -> String {
        match &self.endpoint_url {
            Some(endpoint) => format!("{}/{}", endpoint.trim_end_matches('/'), bucket),
            None if is_virtual_hostable(bucket) => {
                format!("https://{bucket}.s3.{region}.amazonaws.com/")
            }
            None => format!("https://s3.{region}.amazonaws.com/{bucket}"),
        }
    }
}

/// Whether `bucket` can be used as a single DNS label under `s3.{region}.amazonaws.com`.
///
/// Names with dots are excluded because the wildcard TLS certificate does not cover them.
fn is_virtual_hostable(bucket: &str) -> bool {
    let bytes = bucket.as_bytes();
    (3..=63).contains(&bytes.len())
        && bytes
            .iter()
            .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || *b == b'-')
        && bytes.first().is_some_and(u8::is_ascii_alphanumeric)
        && bytes.last().is_some_and(u8::is_ascii_alphanumeric)
}

#[async_trait]
impl ObjectStorage for S3Storage {
    async fn put_object(&self, bucket: &str, key: &str, body: Bytes) -> Result<(), Error> {
        let content_length: i64 = body.len().try_into().map_err(|_| {
            invalid_input(format!("content_length:{} is invalid.", body.len()))
        })?;

        self.client
            .put_object()
            .bucket(bucket)
            .key(key)
            .content_length(content_length)
            .body(ByteStream::from(body))
            .send()
            .await?;
        Ok(())
    }

    async fn get_object(&self, bucket: &str, key: &str) -> Result<ByteStream, Error> {
        let resp = self.client.get_object().bucket(bucket).key(key).send().await?;
        tracing::trace!(
            "get_object response content length: {:?}",
            resp.content_length()
        );
        Ok(resp.body)
    }

    async fn head_object(&self, bucket: &str, key: &str) -> Result<(), Error> {
        self.client
            .head_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await?;
        Ok(())
    }

    async fn delete_object(&self, bucket: &str, key: &str) -> Result<(), Error> {
        self.client
            .delete_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await?;
        Ok(())
    }

    async fn presign_get(
        &self,
        bucket: &str,
        key: &str,
        expires_in: Duration,
    ) -> Result<String, Error> {
        let presigning_config = PresigningConfig::expires_in(expires_in)?;
        let request = self
            .client
            .get_object()
            .bucket(bucket)
            .key(key)
            .presigned(presigning_config)
            .await?;
        Ok(request.uri().to_owned())
    }

    async fn presign_post(
        &self,
        bucket: &str,
        key: &str,
        expires_in: Duration,
    ) -> Result<PresignedPost, Error> {
        let region = self.region()?;
        let credentials = self.resolve_credentials().await?;
        PostPolicy {
            url: self.post_url(bucket, region),
            bucket,
            key,
            region,
            expires_in,
        }
        .sign(&credentials, chrono::Utc::now())
    }
}

/// Creates [`S3Storage`] clients from connector settings using the AWS SDK.
#[derive(Debug, Clone, Default)]
pub struct S3ClientFactory;

impl S3ClientFactory {
    /// Load shared SDK configuration for the given settings.
    ///
    /// Static credentials replace the default provider chain entirely.
    pub async fn load_sdk_config(&self, settings: &ClientSettings) -> SdkConfig {
        let mut loader = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(settings.region.clone()));

        if let CredentialSource::Static {
            access_key_id,
            secret_access_key,
        } = &settings.credentials
        {
            loader = loader.credentials_provider(Credentials::new(
                access_key_id,
                secret_access_key,
                None,
                None,
                BACKEND_NAME,
            ));
        }

        if let Some(endpoint_url) = &settings.endpoint_url {
            loader = loader.endpoint_url(endpoint_url);
        }

        loader.load().await
    }
}

#[async_trait]
impl ClientFactory for S3ClientFactory {
    async fn create(&self, settings: &ClientSettings) -> Result<Arc<dyn ObjectStorage>, Error> {
        let sdk_config = self.load_sdk_config(settings).await;
        Ok(Arc::new(S3Storage::from_sdk_config(&sdk_config)))
    }
}
