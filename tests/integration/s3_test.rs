//! S3 integration tests using LocalStack.

use crate::common::{unique_name, LocalStackTestContext};
use lf_sampler::{AwsClientFactory, WorkerSession};
use lf_types::{params, OperationKind, Variables};

#[tokio::test]
#[ignore = "requires LocalStack"]
async fn test_upload_then_stream_download() {
    let ctx = LocalStackTestContext::new().await;

    if !ctx.is_available().await {
        eprintln!("LocalStack not available, skipping test");
        return;
    }

    let bucket = unique_name("lf-bucket");
    ctx.create_bucket(&bucket).await.unwrap();

    let dir = tempfile::tempdir().unwrap();
    let source = dir.path().join("blob.bin");
    let payload: Vec<u8> = (0..200_000u32).map(|i| (i % 251) as u8).collect();
    std::fs::write(&source, &payload).unwrap();

    let factory = AwsClientFactory::new();
    let upload = ctx
        .aws_params()
        .with(params::S3_BUCKET_NAME, bucket.as_str())
        .with(params::S3_OBJECT_KEY, "data/blob.bin")
        .with(params::UPLOAD_PATH, source.to_str().unwrap());
    let mut session = WorkerSession::setup(0, OperationKind::S3Upload, &upload, &factory)
        .await
        .unwrap();
    let outcome = session.execute(&mut Variables::new()).await;
    assert!(outcome.success, "{:?}", outcome.error_detail);
    assert_eq!(outcome.bytes, payload.len() as u64);
    session.teardown();

    assert_eq!(ctx.get_object(&bucket, "data/blob.bin").await.unwrap(), payload);

    let target = dir.path().join("copy.bin");
    let download = ctx
        .aws_params()
        .with(params::S3_BUCKET_NAME, bucket.as_str())
        .with(params::S3_OBJECT_KEY, "data/blob.bin")
        .with(params::DOWNLOAD_PATH, target.to_str().unwrap())
        .with(params::BUFFER_SIZE, "4096");
    let mut session = WorkerSession::setup(0, OperationKind::S3Download, &download, &factory)
        .await
        .unwrap();
    let outcome = session.execute(&mut Variables::new()).await;
    assert!(outcome.success, "{:?}", outcome.error_detail);
    assert_eq!(outcome.bytes, payload.len() as u64);
    assert_eq!(std::fs::read(&target).unwrap(), payload);

    ctx.delete_object(&bucket, "data/blob.bin").await.ok();
}

#[tokio::test]
#[ignore = "requires LocalStack"]
async fn test_buffered_download() {
    let ctx = LocalStackTestContext::new().await;

    if !ctx.is_available().await {
        eprintln!("LocalStack not available, skipping test");
        return;
    }

    let bucket = unique_name("lf-bucket");
    ctx.create_bucket(&bucket).await.unwrap();
    ctx.put_object(&bucket, "small.txt", b"hello world".to_vec())
        .await
        .unwrap();

    let params = ctx
        .aws_params()
        .with(params::S3_BUCKET_NAME, bucket.as_str())
        .with(params::S3_OBJECT_KEY, "small.txt");
    let mut session =
        WorkerSession::setup(0, OperationKind::S3Download, &params, &AwsClientFactory::new())
            .await
            .unwrap();

    let outcome = session.execute(&mut Variables::new()).await;
    assert!(outcome.success);
    assert_eq!(outcome.bytes, 11);
    assert_eq!(outcome.response_message, "Download successful.");

    ctx.delete_object(&bucket, "small.txt").await.ok();
}

#[tokio::test]
#[ignore = "requires LocalStack"]
async fn test_missing_key_reports_remote_code() {
    let ctx = LocalStackTestContext::new().await;

    if !ctx.is_available().await {
        eprintln!("LocalStack not available, skipping test");
        return;
    }

    let bucket = unique_name("lf-bucket");
    ctx.create_bucket(&bucket).await.unwrap();

    let params = ctx
        .aws_params()
        .with(params::S3_BUCKET_NAME, bucket.as_str())
        .with(params::S3_OBJECT_KEY, "absent");
    let mut session =
        WorkerSession::setup(0, OperationKind::S3Download, &params, &AwsClientFactory::new())
            .await
            .unwrap();

    let outcome = session.execute(&mut Variables::new()).await;
    assert!(!outcome.success);
    assert_eq!(outcome.response_code.as_deref(), Some("NoSuchKey"));
}
