/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

/* Automatically managed default lints */
#![cfg_attr(docsrs, feature(doc_auto_cfg))]
/* End of automatically managed default lints */

//! File storage connector for Amazon S3
//!
//! [`StorageConnector`] stores managed files in a single bucket under the key
//! `{file_id}/{file_name}` and exposes the operations a file management service needs:
//! presigned upload forms and download URLs, existence checks, deletes, uploads and
//! downloads.
//!
//! # Examples
//!
//! ```no_run
//! use s3_file_connector::{ConnectorConfig, StorageConnector};
//!
//! async fn example() -> Result<(), s3_file_connector::error::Error> {
//!     let config = ConnectorConfig::builder()
//!         .region_name("us-west-2")
//!         .bucket_name("my-bucket")
//!         .build();
//!     let connector = StorageConnector::new(config).await?;
//!
//!     connector.upload_file("file-1234/hello.txt", b"hello".to_vec()).await?;
//!     assert!(connector.check_file("file-1234/hello.txt").await);
//!
//!     let url = connector.get_download_url("file-1234", "hello.txt").await?;
//!     println!("{url}");
//!     Ok(())
//! }
//! ```

#![warn(
    missing_debug_implementations,
    missing_docs,
    rustdoc::missing_crate_level_docs,
    unreachable_pub,
    rust_2018_idioms
)]

/// Error types emitted by `s3-file-connector`
pub mod error;

/// Common types used by `s3-file-connector`
pub mod types;

/// Connector configuration
pub mod config;
pub use self::config::ConnectorConfig;

/// Storage client abstraction and its Amazon S3 implementation
pub mod storage;

/// The storage connector
pub mod connector;
pub use self::connector::StorageConnector;
