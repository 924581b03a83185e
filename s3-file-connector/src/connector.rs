/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use std::sync::Arc;

use aws_sdk_s3::primitives::ByteStream;
use aws_smithy_types::error::display::DisplayErrorContext;
use bytes::Bytes;

use crate::config::ConnectorConfig;
use crate::error::{self, Error};
use crate::storage::{ClientFactory, ObjectStorage, S3ClientFactory};
use crate::types::{ObjectKey, PresignedPost, DOWNLOAD_URL_EXPIRY, UPLOAD_URL_EXPIRY};

/// File storage connector for Amazon S3.
///
/// Every operation is a single request against the configured bucket. Nothing is retried or
/// cached. Cloning is cheap and clones share the same storage client.
#[derive(Debug, Clone)]
pub struct StorageConnector {
    pub(crate) handle: Arc<Handle>,
}

/// Whatever is needed to carry out operations
#[derive(Debug)]
pub(crate) struct Handle {
    pub(crate) bucket: String,
    // only ever `None` when constructed by hand in tests
    pub(crate) storage: Option<Arc<dyn ObjectStorage>>,
}

impl Handle {
    fn storage(&self) -> Result<&dyn ObjectStorage, Error> {
        self.storage.as_deref().ok_or_else(error::client_unset)
    }
}

impl StorageConnector {
    /// Creates a new connector backed by the AWS SDK.
    ///
    /// Fails with [`ErrorKind::ConnectorConfiguration`](crate::error::ErrorKind::ConnectorConfiguration)
    /// when `region_name` or `bucket_name` is missing.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use s3_file_connector::{ConnectorConfig, StorageConnector};
    ///
    /// async fn connect() -> Result<StorageConnector, s3_file_connector::error::Error> {
    ///     let config = ConnectorConfig::builder()
    ///         .region_name("us-west-2")
    ///         .bucket_name("my-bucket")
    ///         .build();
    ///
    ///     StorageConnector::new(config).await
    /// }
    /// ```
    pub async fn new(config: ConnectorConfig) -> Result<StorageConnector, Error> {
        Self::with_factory(config, &S3ClientFactory).await
    }

    /// Creates a new connector whose storage client is created by `factory`.
    pub async fn with_factory(
        config: ConnectorConfig,
        factory: &dyn ClientFactory,
    ) -> Result<StorageConnector, Error> {
        let settings = config.validate()?;
        let storage = factory.create(&settings.client).await?;

        tracing::info!(
            "storage connector initialized for bucket: {}, region: {}, credentials: {}",
            settings.bucket,
            settings.client.region,
            settings.client.credentials.kind()
        );

        Ok(StorageConnector {
            handle: Arc::new(Handle {
                bucket: settings.bucket,
                storage: Some(storage),
            }),
        })
    }

    /// Returns the bucket every operation targets
    pub fn bucket(&self) -> &str {
        &self.handle.bucket
    }

    /// Create a form for uploading `file_name` of `file_id` directly from a browser.
    ///
    /// The form targets the object key `{file_id}/{file_name}` and is valid for one hour.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// async fn upload_form(
    ///     connector: &s3_file_connector::StorageConnector,
    /// ) -> Result<(), s3_file_connector::error::Error> {
    ///     let (url, fields) = connector
    ///         .get_upload_url("file-1234", "report.pdf")
    ///         .await?
    ///         .into_parts();
    ///
    ///     // render an HTML form posting `fields` and the file to `url`
    ///     Ok(())
    /// }
    /// ```
    pub async fn get_upload_url(
        &self,
        file_id: &str,
        file_name: &str,
    ) -> Result<PresignedPost, Error> {
        let key = ObjectKey::new(file_id, file_name);
        tracing::debug!("creating upload form for {}/{}", self.bucket(), key);
        self.handle
            .storage()?
            .presign_post(self.bucket(), key.as_str(), UPLOAD_URL_EXPIRY)
            .await
    }

    /// Create a URL granting read access to `file_name` of `file_id` for 24 hours.
    pub async fn get_download_url(&self, file_id: &str, file_name: &str) -> Result<String, Error> {
        let key = ObjectKey::new(file_id, file_name);
        tracing::debug!("creating download url for {}/{}", self.bucket(), key);
        self.handle
            .storage()?
            .presign_get(self.bucket(), key.as_str(), DOWNLOAD_URL_EXPIRY)
            .await
    }

    /// Returns `true` iff an object exists under `remote_path` and its metadata is readable.
    ///
    /// Any failure of the probe, including network errors, access denied and a missing client,
    /// is reported as `false`. Callers cannot tell a missing object apart from a failed request;
    /// use [`download_file`](Self::download_file) and inspect the error if the difference matters.
    pub async fn check_file(&self, remote_path: &str) -> bool {
        let probe = match self.handle.storage() {
            Ok(storage) => storage.head_object(self.bucket(), remote_path).await,
            Err(err) => Err(err),
        };

        match probe {
            Ok(()) => true,
            Err(err) => {
                tracing::debug!(
                    "existence check failed for {}: {}",
                    remote_path,
                    DisplayErrorContext(&err)
                );
                false
            }
        }
    }

    /// Delete the object stored under `remote_path`.
    ///
    /// Deleting a key that does not exist is not an error.
    pub async fn delete_file(&self, remote_path: &str) -> Result<(), Error> {
        tracing::debug!("deleting {}/{}", self.bucket(), remote_path);
        self.handle
            .storage()?
            .delete_object(self.bucket(), remote_path)
            .await
    }

    /// Store `data` under `remote_path`, replacing any existing object.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// async fn save(
    ///     connector: &s3_file_connector::StorageConnector,
    /// ) -> Result<(), s3_file_connector::error::Error> {
    ///     connector
    ///         .upload_file("file-1234/notes.txt", b"remember the milk".to_vec())
    ///         .await
    /// }
    /// ```
    pub async fn upload_file(
        &self,
        remote_path: &str,
        data: impl Into<Bytes>,
    ) -> Result<(), Error> {
        let storage = self.handle.storage()?;
        let data = data.into();
        tracing::debug!(
            "uploading {} bytes to {}/{}",
            data.len(),
            self.bucket(),
            remote_path
        );
        storage.put_object(self.bucket(), remote_path, data).await
    }

    /// Open the object stored under `remote_path` for reading.
    ///
    /// The returned stream starts at the first byte of the object. The caller owns it and is
    /// responsible for reading it to completion.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// async fn load(
    ///     connector: &s3_file_connector::StorageConnector,
    /// ) -> Result<bytes::Bytes, Box<dyn std::error::Error>> {
    ///     let body = connector.download_file("file-1234/notes.txt").await?;
    ///     Ok(body.collect().await?.into_bytes())
    /// }
    /// ```
    pub async fn download_file(&self, remote_path: &str) -> Result<ByteStream, Error> {
        let storage = self.handle.storage()?;
        tracing::debug!("downloading {}/{}", self.bucket(), remote_path);
        storage.get_object(self.bucket(), remote_path).await
    }
}
