/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

//! Test doubles for `s3-file-connector`.

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use aws_sdk_s3::primitives::ByteStream;
use bytes::Bytes;
use s3_file_connector::config::ClientSettings;
use s3_file_connector::error::{Error, ErrorKind};
use s3_file_connector::storage::{ClientFactory, ObjectStorage};
use s3_file_connector::types::PresignedPost;
use tokio::sync::RwLock;

/// Random alphanumeric payload of `size` bytes
pub fn rand_data(size: usize) -> Bytes {
    std::iter::repeat_with(fastrand::alphanumeric)
        .take(size)
        .map(|x| x as u8)
        .collect::<Vec<_>>()
        .into()
}

/// drain/consume the body
pub async fn drain(body: ByteStream) -> Result<Bytes, Error> {
    Ok(body.collect().await?.into_bytes())
}

/// An in-memory object store.
///
/// Presigned URLs use a `memory://` scheme and are not signed.
#[derive(Debug, Default)]
pub struct InMemoryStorage {
    // (bucket, key) -> content
    objects: RwLock<HashMap<(String, String), Bytes>>,
    requests: AtomicUsize,
}

impl InMemoryStorage {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of requests received so far
    pub fn requests(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }

    /// Whether `key` currently exists in `bucket`
    pub async fn contains(&self, bucket: &str, key: &str) -> bool {
        self.objects
            .read()
            .await
            .contains_key(&(bucket.to_owned(), key.to_owned()))
    }

    fn record(&self) {
        self.requests.fetch_add(1, Ordering::SeqCst);
    }
}

fn no_such_key(bucket: &str, key: &str) -> Error {
    Error::new(
        ErrorKind::NotFound,
        format!("NoSuchKey: {bucket}/{key} does not exist"),
    )
}

#[async_trait]
impl ObjectStorage for InMemoryStorage {
    async fn put_object(&self, bucket: &str, key: &str, body: Bytes) -> Result<(), Error> {
        self.record();
        let mut objects = self.objects.write().await;
        objects.insert((bucket.to_owned(), key.to_owned()), body);
        Ok(())
    }

    async fn get_object(&self, bucket: &str, key: &str) -> Result<ByteStream, Error> {
        self.record();
        let objects = self.objects.read().await;
        let data = objects
            .get(&(bucket.to_owned(), key.to_owned()))
            .ok_or_else(|| no_such_key(bucket, key))?;
        Ok(ByteStream::from(data.clone()))
    }

    async fn head_object(&self, bucket: &str, key: &str) -> Result<(), Error> {
        self.record();
        if self.contains(bucket, key).await {
            Ok(())
        } else {
            Err(no_such_key(bucket, key))
        }
    }

    async fn delete_object(&self, bucket: &str, key: &str) -> Result<(), Error> {
        self.record();
        let mut objects = self.objects.write().await;
        objects.remove(&(bucket.to_owned(), key.to_owned()));
        Ok(())
    }

    async fn presign_get(
        &self,
        bucket: &str,
        key: &str,
        expires_in: Duration,
    ) -> Result<String, Error> {
        self.record();
        Ok(format!(
            "memory://{bucket}/{key}?X-Amz-Expires={}",
            expires_in.as_secs()
        ))
    }

    async fn presign_post(
        &self,
        bucket: &str,
        key: &str,
        expires_in: Duration,
    ) -> Result<PresignedPost, Error> {
        self.record();
        let mut fields = BTreeMap::new();
        fields.insert("key".to_owned(), key.to_owned());
        fields.insert("expires-in".to_owned(), expires_in.as_secs().to_string());
        Ok(PresignedPost {
            url: format!("memory://{bucket}/"),
            fields,
        })
    }
}

/// Storage where every request fails with the same kind of error.
#[derive(Debug, Clone)]
pub struct FaultyStorage {
    kind: ErrorKind,
    message: &'static str,
}

impl FaultyStorage {
    /// Fail every request with `kind`, using `message` as the error source
    pub fn new(kind: ErrorKind, message: &'static str) -> Self {
        Self { kind, message }
    }

    fn fail<T>(&self) -> Result<T, Error> {
        Err(Error::new(self.kind.clone(), self.message))
    }
}

#[async_trait]
impl ObjectStorage for FaultyStorage {
    async fn put_object(&self, _bucket: &str, _key: &str, _body: Bytes) -> Result<(), Error> {
        self.fail()
    }

    async fn get_object(&self, _bucket: &str, _key: &str) -> Result<ByteStream, Error> {
        self.fail()
    }

    async fn head_object(&self, _bucket: &str, _key: &str) -> Result<(), Error> {
        self.fail()
    }

    async fn delete_object(&self, _bucket: &str, _key: &str) -> Result<(), Error> {
        self.fail()
    }

    async fn presign_get(
        &self,
        _bucket: &str,
        _key: &str,
        _expires_in: Duration,
    ) -> Result<String, Error> {
        self.fail()
    }

    async fn presign_post(
        &self,
        _bucket: &str,
        _key: &str,
        _expires_in: Duration,
    ) -> Result<PresignedPost, Error> {
        self.fail()
    }
}

/// Client factory that records the settings it was asked for and hands out a fixed storage.
#[derive(Debug)]
pub struct RecordingClientFactory {
    storage: Arc<dyn ObjectStorage>,
    created: Mutex<Vec<ClientSettings>>,
}

impl RecordingClientFactory {
    /// Hand out `storage` for every request
    pub fn new(storage: Arc<dyn ObjectStorage>) -> Self {
        Self {
            storage,
            created: Mutex::new(Vec::new()),
        }
    }

    /// Hand out a fresh [`InMemoryStorage`]
    pub fn in_memory() -> (Self, Arc<InMemoryStorage>) {
        let storage = Arc::new(InMemoryStorage::new());
        (Self::new(storage.clone()), storage)
    }

    /// Settings of every client created so far
    pub fn created(&self) -> Vec<ClientSettings> {
        self.created.lock().unwrap().clone()
    }
}

#[async_trait]
impl ClientFactory for RecordingClientFactory {
    async fn create(&self, settings: &ClientSettings) -> Result<Arc<dyn ObjectStorage>, Error> {
        self.created.lock().unwrap().push(settings.clone());
        Ok(self.storage.clone())
    }
}
