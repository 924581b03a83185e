/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

//! Storage client seam used by the connector.
//!
//! [`ObjectStorage`] is the narrow set of requests the connector issues. [`S3Storage`] is the
//! implementation backed by the AWS SDK; tests substitute their own implementation so that no
//! network access is needed.

use std::fmt::Debug;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use aws_sdk_s3::primitives::ByteStream;
use bytes::Bytes;

use crate::config::ClientSettings;
use crate::error::Error;
use crate::types::PresignedPost;

pub(crate) mod post_policy;
mod s3;

pub use s3::{S3ClientFactory, S3Storage};

/// Requests the connector makes against an object storage service.
///
/// Implementations must be safe to share between tasks; the connector holds a single instance
/// for its entire lifetime and never mutates it.
#[async_trait]
pub trait ObjectStorage: Send + Sync + Debug {
    /// Store `body` under `key`, replacing any existing object.
    async fn put_object(&self, bucket: &str, key: &str, body: Bytes) -> Result<(), Error>;

    /// Open the content of the object stored under `key`.
    async fn get_object(&self, bucket: &str, key: &str) -> Result<ByteStream, Error>;

    /// Fetch metadata only. Succeeds iff the object exists and its metadata is readable.
    async fn head_object(&self, bucket: &str, key: &str) -> Result<(), Error>;

    /// Remove the object stored under `key`. Removing a key that does not exist succeeds.
    async fn delete_object(&self, bucket: &str, key: &str) -> Result<(), Error>;

    /// Create a URL granting `GET` access to `key` for `expires_in`.
    async fn presign_get(
        &self,
        bucket: &str,
        key: &str,
        expires_in: Duration,
    ) -> Result<String, Error>;

    /// Create a form that lets a browser `POST` an object to `key` for `expires_in`.
    async fn presign_post(
        &self,
        bucket: &str,
        key: &str,
        expires_in: Duration,
    ) -> Result<PresignedPost, Error>;
}

/// Creates the storage client a connector holds.
///
/// The connector calls [`create`](ClientFactory::create) exactly once, during construction.
#[async_trait]
pub trait ClientFactory: Send + Sync {
    /// Create a client for the given region, endpoint and credential source.
    async fn create(&self, settings: &ClientSettings) -> Result<Arc<dyn ObjectStorage>, Error>;
}
