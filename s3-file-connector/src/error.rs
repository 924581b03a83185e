/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use std::fmt;

/// A boxed error that is `Send` and `Sync`.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

use aws_sdk_s3::error::ProvideErrorMetadata;

/// Name reported by configuration errors raised from this connector.
pub(crate) const BACKEND_NAME: &str = "S3Connector";

/// Errors returned by this library
///
/// Errors coming back from Amazon S3 are kept as the [`source`](std::error::Error::source)
/// of the returned error without modification.
///
/// NOTE: Use [`aws_smithy_types::error::display::DisplayErrorContext`] or similar to display
/// the entire error cause/source chain.
#[derive(Debug)]
pub struct Error {
    kind: ErrorKind,
    source: BoxError,
}

/// General categories of connector errors.
#[derive(Clone, Debug, Eq, PartialEq)]
#[non_exhaustive]
pub enum ErrorKind {
    /// The connector is missing required configuration or has no usable client
    ConnectorConfiguration,

    /// Operation input validation issues
    InputInvalid,

    /// I/O errors
    IOError,

    /// Resource not found (e.g. bucket or key)
    NotFound,

    /// Any other error returned by the storage service
    ServiceError,
}

/// Details of a [`ErrorKind::ConnectorConfiguration`] error.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ConfigurationError {
    backend: &'static str,
    missing: Vec<&'static str>,
    reason: Option<String>,
}

impl ConfigurationError {
    pub(crate) fn missing_fields(missing: Vec<&'static str>) -> Self {
        Self {
            backend: BACKEND_NAME,
            missing,
            reason: None,
        }
    }

    pub(crate) fn with_reason(reason: impl Into<String>) -> Self {
        Self {
            backend: BACKEND_NAME,
            missing: Vec::new(),
            reason: Some(reason.into()),
        }
    }

    /// The backend that reported the error
    pub fn backend(&self) -> &str {
        self.backend
    }

    /// Names of the configuration fields that were absent or empty
    pub fn missing(&self) -> &[&'static str] {
        &self.missing
    }
}

impl fmt::Display for ConfigurationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid configuration for {}", self.backend)?;
        if !self.missing.is_empty() {
            write!(f, ": missing {}", self.missing.join(", "))?;
        }
        if let Some(reason) = &self.reason {
            write!(f, ": {reason}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ConfigurationError {}

impl Error {
    /// Creates a new connector [`Error`] from a known kind of error as well as an arbitrary error
    /// source.
    pub fn new<E>(kind: ErrorKind, err: E) -> Error
    where
        E: Into<BoxError>,
    {
        Error {
            kind,
            source: err.into(),
        }
    }

    /// Returns the corresponding [`ErrorKind`] for this error.
    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    /// Returns the configuration details if this is a
    /// [`ErrorKind::ConnectorConfiguration`] error.
    pub fn as_configuration_error(&self) -> Option<&ConfigurationError> {
        self.source.downcast_ref::<ConfigurationError>()
    }

    /// Consumes the error and returns the underlying source, e.g. the original SDK error.
    pub fn into_source(self) -> BoxError {
        self.source
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ErrorKind::ConnectorConfiguration => write!(f, "connector configuration error"),
            ErrorKind::InputInvalid => write!(f, "invalid input"),
            ErrorKind::IOError => write!(f, "I/O error"),
            ErrorKind::NotFound => write!(f, "resource not found"),
            ErrorKind::ServiceError => write!(f, "storage service error"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(self.source.as_ref())
    }
}

impl From<ConfigurationError> for Error {
    fn from(value: ConfigurationError) -> Self {
        Self::new(ErrorKind::ConnectorConfiguration, value)
    }
}

impl From<aws_smithy_types::byte_stream::error::Error> for Error {
    fn from(value: aws_smithy_types::byte_stream::error::Error) -> Self {
        Self::new(ErrorKind::IOError, value)
    }
}

impl From<aws_sdk_s3::presigning::PresigningConfigError> for Error {
    fn from(value: aws_sdk_s3::presigning::PresigningConfigError) -> Self {
        Self::new(ErrorKind::InputInvalid, value)
    }
}

pub(crate) fn invalid_input<E>(err: E) -> Error
where
    E: Into<BoxError>,
{
    Error::new(ErrorKind::InputInvalid, err)
}

pub(crate) fn client_unset() -> Error {
    ConfigurationError::with_reason("storage client is not initialized").into()
}

impl<E, R> From<aws_sdk_s3::error::SdkError<E, R>> for Error
where
    E: std::error::Error + ProvideErrorMetadata + Send + Sync + 'static,
    R: Send + Sync + fmt::Debug + 'static,
{
    fn from(value: aws_sdk_s3::error::SdkError<E, R>) -> Self {
        let kind = match value.code() {
            Some("NotFound" | "NoSuchKey" | "NoSuchBucket") => ErrorKind::NotFound,
            _ => ErrorKind::ServiceError,
        };

        Error::new(kind, value)
    }
}
