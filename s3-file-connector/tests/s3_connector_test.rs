/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

//! Connector backed by the real SDK client. Only presigning is exercised, which needs no
//! network access.

use s3_file_connector::{ConnectorConfig, StorageConnector};

async fn sdk_connector(endpoint_url: Option<&str>) -> StorageConnector {
    sdk_connector_for_bucket("test-bucket", endpoint_url).await
}

async fn sdk_connector_for_bucket(bucket: &str, endpoint_url: Option<&str>) -> StorageConnector {
    let mut builder = ConnectorConfig::builder()
        .aws_access_key_id("AKIDEXAMPLE")
        .aws_secret_access_key("wJalrXUtnFEMI/K7MDENG+bPxRfiCYEXAMPLEKEY")
        .region_name("ap-northeast-2")
        .bucket_name(bucket);
    if let Some(endpoint_url) = endpoint_url {
        builder = builder.endpoint_url(endpoint_url);
    }
    StorageConnector::new(builder.build()).await.unwrap()
}

#[tokio::test]
async fn test_download_url_expires_in_one_day() {
    let connector = sdk_connector(None).await;
    assert_eq!("test-bucket", connector.bucket());

    let url = connector
        .get_download_url("file-1234", "report.pdf")
        .await
        .unwrap();

    assert!(
        url.starts_with("https://test-bucket.s3.ap-northeast-2.amazonaws.com/file-1234/report.pdf?"),
        "unexpected url: {url}"
    );
    assert!(url.contains("X-Amz-Expires=86400"));
    assert!(url.contains("X-Amz-Credential=AKIDEXAMPLE%2F"));
}

#[tokio::test]
async fn test_download_url_custom_endpoint() {
    let connector = sdk_connector(Some("http://localhost:9000")).await;
    let url = connector
        .get_download_url("file-1234", "report.pdf")
        .await
        .unwrap();

    assert!(
        url.starts_with("http://localhost:9000/test-bucket/file-1234/report.pdf?"),
        "unexpected url: {url}"
    );
    assert!(url.contains("X-Amz-Expires=86400"));
}

#[tokio::test]
async fn test_upload_form() {
    let connector = sdk_connector(None).await;
    let post = connector
        .get_upload_url("file-1234", "photo.png")
        .await
        .unwrap();

    assert_eq!("https://test-bucket.s3.ap-northeast-2.amazonaws.com/", post.url);
    assert_eq!("file-1234/photo.png", post.fields["key"]);
    assert_eq!("AWS4-HMAC-SHA256", post.fields["x-amz-algorithm"]);
    assert!(post.fields["x-amz-credential"].ends_with("/ap-northeast-2/s3/aws4_request"));
    for field in ["policy", "x-amz-date", "x-amz-signature"] {
        assert!(post.fields.contains_key(field), "missing form field {field}");
    }
}

#[tokio::test]
async fn test_upload_form_custom_endpoint() {
    let connector = sdk_connector(Some("http://localhost:9000/")).await;
    let (url, fields) = connector
        .get_upload_url("file-1234", "photo.png")
        .await
        .unwrap()
        .into_parts();

    assert_eq!("http://localhost:9000/test-bucket", url);
    assert_eq!("file-1234/photo.png", fields["key"]);
}

#[tokio::test]
async fn test_dotted_bucket_urls_agree() {
    let connector = sdk_connector_for_bucket("b.with.dots", None).await;

    let download_url = connector
        .get_download_url("file-1234", "report.pdf")
        .await
        .unwrap();
    let upload_url = connector
        .get_upload_url("file-1234", "report.pdf")
        .await
        .unwrap()
        .url;

    assert_eq!("https://s3.ap-northeast-2.amazonaws.com/b.with.dots", upload_url);
    assert!(
        download_url.starts_with(&format!("{upload_url}/file-1234/report.pdf?")),
        "unexpected url: {download_url}"
    );
}
