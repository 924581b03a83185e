/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use serde::Deserialize;

use crate::error::{ConfigurationError, Error};
use crate::types::CredentialSource;

/// Configuration for a [`StorageConnector`](crate::StorageConnector)
///
/// Field names match the keys of the connector configuration mapping, so a mapping handed
/// over by an external configuration loader can be deserialized directly. Unknown keys are
/// ignored.
///
/// Nothing is validated until the configuration is used to construct a connector.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConnectorConfig {
    #[serde(default)]
    aws_access_key_id: Option<String>,
    #[serde(default)]
    aws_secret_access_key: Option<String>,
    #[serde(default)]
    region_name: Option<String>,
    #[serde(default)]
    bucket_name: Option<String>,
    #[serde(default)]
    endpoint_url: Option<String>,
}

impl ConnectorConfig {
    /// Create a new `ConnectorConfig` builder
    pub fn builder() -> Builder {
        Builder::default()
    }

    /// Returns the configured access key ID, if any
    pub fn aws_access_key_id(&self) -> Option<&str> {
        self.aws_access_key_id.as_deref()
    }

    /// Returns the configured region, if any
    pub fn region_name(&self) -> Option<&str> {
        self.region_name.as_deref()
    }

    /// Returns the configured bucket, if any
    pub fn bucket_name(&self) -> Option<&str> {
        self.bucket_name.as_deref()
    }

    /// Returns the custom endpoint, if any
    pub fn endpoint_url(&self) -> Option<&str> {
        self.endpoint_url.as_deref()
    }

    /// Check required fields and resolve the credential source.
    ///
    /// Fails with [`ErrorKind::ConnectorConfiguration`](crate::error::ErrorKind::ConnectorConfiguration)
    /// listing every required field that is absent or empty.
    pub fn validate(&self) -> Result<Settings, Error> {
        let region = non_empty(&self.region_name);
        let bucket = non_empty(&self.bucket_name);

        let (region, bucket) = match (region, bucket) {
            (Some(region), Some(bucket)) => (region, bucket),
            (region, bucket) => {
                let mut missing = Vec::new();
                if region.is_none() {
                    missing.push("region_name");
                }
                if bucket.is_none() {
                    missing.push("bucket_name");
                }
                return Err(ConfigurationError::missing_fields(missing).into());
            }
        };

        let credentials = match (
            non_empty(&self.aws_access_key_id),
            non_empty(&self.aws_secret_access_key),
        ) {
            (Some(access_key_id), Some(secret_access_key)) => CredentialSource::Static {
                access_key_id: access_key_id.to_owned(),
                secret_access_key: secret_access_key.to_owned(),
            },
            (None, None) => CredentialSource::Default,
            _ => {
                tracing::warn!(
                    "only one of aws_access_key_id/aws_secret_access_key is set; falling back to default credentials"
                );
                CredentialSource::Default
            }
        };

        Ok(Settings {
            bucket: bucket.to_owned(),
            client: ClientSettings {
                region: region.to_owned(),
                endpoint_url: non_empty(&self.endpoint_url).map(str::to_owned),
                credentials,
            },
        })
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

/// Validated connector settings
#[derive(Debug, Clone)]
pub struct Settings {
    pub(crate) bucket: String,
    pub(crate) client: ClientSettings,
}

impl Settings {
    /// The bucket every operation targets
    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    /// Settings used to create the storage client
    pub fn client(&self) -> &ClientSettings {
        &self.client
    }
}

/// Everything a [`ClientFactory`](crate::storage::ClientFactory) needs to create a storage client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientSettings {
    /// Region the client is scoped to
    pub region: String,
    /// Custom endpoint for S3-compatible services. Path-style addressing is used when set.
    pub endpoint_url: Option<String>,
    /// Where credentials come from
    pub credentials: CredentialSource,
}

/// Fluent style builder for [ConnectorConfig]
#[derive(Debug, Clone, Default)]
pub struct Builder {
    aws_access_key_id: Option<String>,
    aws_secret_access_key: Option<String>,
    region_name: Option<String>,
    bucket_name: Option<String>,
    endpoint_url: Option<String>,
}

impl Builder {
    /// Access key ID. Used only when the secret access key is set as well.
    pub fn aws_access_key_id(mut self, access_key_id: impl Into<String>) -> Self {
        self.aws_access_key_id = Some(access_key_id.into());
        self
    }

    /// Secret access key. Used only when the access key ID is set as well.
    pub fn aws_secret_access_key(mut self, secret_access_key: impl Into<String>) -> Self {
        self.aws_secret_access_key = Some(secret_access_key.into());
        self
    }

    /// Region of the bucket (required)
    pub fn region_name(mut self, region: impl Into<String>) -> Self {
        self.region_name = Some(region.into());
        self
    }

    /// Bucket every operation targets (required)
    pub fn bucket_name(mut self, bucket: impl Into<String>) -> Self {
        self.bucket_name = Some(bucket.into());
        self
    }

    /// Custom endpoint, e.g. for MinIO or another S3-compatible service.
    pub fn endpoint_url(mut self, endpoint_url: impl Into<String>) -> Self {
        self.endpoint_url = Some(endpoint_url.into());
        self
    }

    /// Consumes the builder and constructs a [`ConnectorConfig`]
    pub fn build(self) -> ConnectorConfig {
        ConnectorConfig {
            aws_access_key_id: self.aws_access_key_id,
            aws_secret_access_key: self.aws_secret_access_key,
            region_name: self.region_name,
            bucket_name: self.bucket_name,
            endpoint_url: self.endpoint_url,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::error::ErrorKind;

    fn missing(config: ConnectorConfig) -> Vec<&'static str> {
        let err = config.validate().unwrap_err();
        assert_eq!(&ErrorKind::ConnectorConfiguration, err.kind());
        err.as_configuration_error().unwrap().missing().to_vec()
    }

    #[test]
    fn test_missing_region() {
        let config = ConnectorConfig::builder()
            .aws_access_key_id("AKIDEXAMPLE")
            .aws_secret_access_key("secret")
            .bucket_name("test-bucket")
            .build();
        assert_eq!(vec!["region_name"], missing(config));
    }

    #[test]
    fn test_missing_bucket() {
        let config = ConnectorConfig::builder()
            .aws_access_key_id("AKIDEXAMPLE")
            .aws_secret_access_key("secret")
            .region_name("us-west-2")
            .build();
        assert_eq!(vec!["bucket_name"], missing(config));
    }

    #[test]
    fn test_missing_everything() {
        assert_eq!(
            vec!["region_name", "bucket_name"],
            missing(ConnectorConfig::default())
        );
    }

    #[test]
    fn test_empty_values_are_missing() {
        let config = ConnectorConfig::builder()
            .region_name("")
            .bucket_name("")
            .build();
        assert_eq!(vec!["region_name", "bucket_name"], missing(config));
    }

    #[test]
    fn test_static_credentials() {
        let settings = ConnectorConfig::builder()
            .aws_access_key_id("AKIDEXAMPLE")
            .aws_secret_access_key("secret")
            .region_name("us-west-2")
            .bucket_name("test-bucket")
            .build()
            .validate()
            .unwrap();

        assert_eq!("test-bucket", settings.bucket());
        assert_eq!("us-west-2", settings.client().region);
        assert_eq!(None, settings.client().endpoint_url);
        assert_eq!(
            CredentialSource::Static {
                access_key_id: "AKIDEXAMPLE".to_owned(),
                secret_access_key: "secret".to_owned(),
            },
            settings.client().credentials
        );
    }

    #[test]
    fn test_partial_credentials_use_default_chain() {
        let key_only = ConnectorConfig::builder()
            .aws_access_key_id("AKIDEXAMPLE")
            .region_name("us-west-2")
            .bucket_name("test-bucket")
            .build();
        assert_eq!(
            CredentialSource::Default,
            key_only.validate().unwrap().client().credentials
        );

        let secret_only = ConnectorConfig::builder()
            .aws_secret_access_key("secret")
            .aws_access_key_id("")
            .region_name("us-west-2")
            .bucket_name("test-bucket")
            .build();
        assert_eq!(
            CredentialSource::Default,
            secret_only.validate().unwrap().client().credentials
        );
    }

    #[test]
    fn test_deserialize_mapping() {
        let config: ConnectorConfig = serde_json::from_value(serde_json::json!({
            "region_name": "ap-northeast-2",
            "bucket_name": "file-manager",
            "endpoint_url": "http://localhost:9000",
            "some_other_connector_option": true
        }))
        .unwrap();

        assert_eq!(Some("ap-northeast-2"), config.region_name());
        assert_eq!(Some("file-manager"), config.bucket_name());
        assert_eq!(None, config.aws_access_key_id());

        let settings = config.validate().unwrap();
        assert_eq!(
            Some("http://localhost:9000"),
            settings.client().endpoint_url.as_deref()
        );
        assert_eq!(CredentialSource::Default, settings.client().credentials);
    }
}
