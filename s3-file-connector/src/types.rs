/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

/// Validity window of URLs returned by
/// [`get_download_url`](crate::StorageConnector::get_download_url).
pub const DOWNLOAD_URL_EXPIRY: Duration = Duration::from_secs(86_400);

/// Validity window of forms returned by
/// [`get_upload_url`](crate::StorageConnector::get_upload_url).
pub const UPLOAD_URL_EXPIRY: Duration = Duration::from_secs(3_600);

/// Key of an object within the configured bucket.
///
/// Keys for managed files are `{file_id}/{file_name}`, so every file belonging to a
/// single `file_id` shares a common key prefix.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ObjectKey(String);

impl ObjectKey {
    /// Derive the object key for `file_name` stored under `file_id`.
    ///
    /// No escaping or normalisation is applied to either component.
    pub fn new(file_id: &str, file_name: &str) -> Self {
        ObjectKey(format!("{file_id}/{file_name}"))
    }

    /// The key as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ObjectKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ObjectKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<ObjectKey> for String {
    fn from(value: ObjectKey) -> Self {
        value.0
    }
}

/// How the storage client should obtain credentials.
#[derive(Clone, PartialEq, Eq)]
pub enum CredentialSource {
    /// Use the given access key pair.
    Static {
        /// Access key ID
        access_key_id: String,
        /// Secret access key
        secret_access_key: String,
    },

    /// Resolve credentials through the SDK default provider chain
    /// (environment, shared profile, container or instance metadata).
    Default,
}

impl CredentialSource {
    pub(crate) fn kind(&self) -> &'static str {
        match self {
            CredentialSource::Static { .. } => "static",
            CredentialSource::Default => "default",
        }
    }
}

// keep secrets out of logs
impl fmt::Debug for CredentialSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CredentialSource::Static { access_key_id, .. } => f
                .debug_struct("Static")
                .field("access_key_id", access_key_id)
                .field("secret_access_key", &"** redacted **")
                .finish(),
            CredentialSource::Default => f.write_str("Default"),
        }
    }
}

/// URL and form fields for uploading an object straight from a browser with an HTML form
/// `POST`.
///
/// Every entry of [`fields`](PresignedPost::fields) must be sent as a form field ahead of the
/// `file` field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresignedPost {
    /// Target of the form `POST`
    pub url: String,
    /// Form fields to include with the upload
    pub fields: BTreeMap<String, String>,
}

impl PresignedPost {
    /// Split into `(url, fields)`
    pub fn into_parts(self) -> (String, BTreeMap<String, String>) {
        (self.url, self.fields)
    }
}
