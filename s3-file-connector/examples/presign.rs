/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */
use std::error::Error;

use clap::Parser;
use s3_file_connector::types::ObjectKey;
use s3_file_connector::{ConnectorConfig, StorageConnector};

type BoxError = Box<dyn Error + Send + Sync>;

#[derive(Debug, Clone, clap::Parser)]
#[command(name = "presign")]
#[command(about = "Prints presigned download and upload URLs for a managed file.")]
pub struct Args {
    /// Identifier of the file
    #[arg(required = true)]
    file_id: String,

    /// Name of the file
    #[arg(required = true)]
    file_name: String,

    /// Bucket the file is stored in
    #[arg(long)]
    bucket: String,

    /// Region of the bucket
    #[arg(long)]
    region: String,

    /// Custom endpoint for S3-compatible services
    #[arg(long)]
    endpoint_url: Option<String>,

    /// Access key ID. The default credential chain is used unless both keys are given.
    #[arg(long, env = "CONNECTOR_ACCESS_KEY_ID")]
    access_key_id: Option<String>,

    /// Secret access key
    #[arg(long, env = "CONNECTOR_SECRET_ACCESS_KEY", hide_env_values = true)]
    secret_access_key: Option<String>,

    /// Also print the form for a browser upload
    #[arg(long, default_value_t = false, action = clap::ArgAction::SetTrue)]
    upload: bool,

    /// Check whether the object exists (sends a request)
    #[arg(long, default_value_t = false, action = clap::ArgAction::SetTrue)]
    check: bool,
}

impl Args {
    fn config(&self) -> ConnectorConfig {
        let mut builder = ConnectorConfig::builder()
            .bucket_name(&self.bucket)
            .region_name(&self.region);
        if let Some(endpoint_url) = &self.endpoint_url {
            builder = builder.endpoint_url(endpoint_url);
        }
        if let Some(access_key_id) = &self.access_key_id {
            builder = builder.aws_access_key_id(access_key_id);
        }
        if let Some(secret_access_key) = &self.secret_access_key {
            builder = builder.aws_secret_access_key(secret_access_key);
        }
        builder.build()
    }
}

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    let args = Args::parse();
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_thread_ids(true)
        .init();

    let connector = StorageConnector::new(args.config()).await?;

    let url = connector
        .get_download_url(&args.file_id, &args.file_name)
        .await?;
    println!("download: {url}");

    if args.upload {
        let post = connector
            .get_upload_url(&args.file_id, &args.file_name)
            .await?;
        println!("upload: POST {}", post.url);
        for (name, value) in &post.fields {
            println!("  {name}: {value}");
        }
    }

    if args.check {
        let key = ObjectKey::new(&args.file_id, &args.file_name);
        let exists = connector.check_file(key.as_str()).await;
        tracing::info!("existence check for {key}: {exists}");
        println!("exists: {exists}");
    }

    Ok(())
}
