//! SQS integration tests using LocalStack.
//!
//! These run consume and produce sessions through the real AWS client
//! factory against a LocalStack queue.

use crate::common::{unique_name, LocalStackTestContext};
use lf_sampler::{AwsClientFactory, LoadRunner, RunConfig, StatsSink, WorkerSession};
use lf_types::{params, OperationKind, Variables};
use std::sync::Arc;

#[tokio::test]
#[ignore = "requires LocalStack"]
async fn test_consume_receives_and_deletes() {
    let ctx = LocalStackTestContext::new().await;

    if !ctx.is_available().await {
        eprintln!("LocalStack not available, skipping test");
        return;
    }

    let queue = unique_name("lf-consume");
    let queue_url = ctx.create_queue(&queue).await.unwrap();
    ctx.send_message(&queue_url, "hello", Some(("source", "it")))
        .await
        .unwrap();
    ctx.settle().await;

    let params = ctx
        .aws_params()
        .with(params::SQS_QUEUE_NAME, queue.as_str())
        .with(params::SQS_WAIT_TIME_SECONDS, "2");
    let factory = AwsClientFactory::new();
    let mut session = WorkerSession::setup(0, OperationKind::SqsConsume, &params, &factory)
        .await
        .unwrap();

    let mut vars = Variables::new();
    let outcome = session.execute(&mut vars).await;
    assert!(outcome.success, "{:?}", outcome.error_detail);
    assert_eq!(outcome.response_data.as_deref(), Some("hello"));
    assert_eq!(vars.get("received_message_body"), Some("hello"));
    assert_eq!(
        vars.get("received_message_attribute"),
        Some(r#"{"source":"it"}"#)
    );

    // the delete went through, so the queue is empty now
    let outcome = session.execute(&mut vars).await;
    assert!(outcome.success);
    assert_eq!(outcome.response_message, "No messages received.");

    session.teardown();
    ctx.delete_queue(&queue_url).await.ok();
}

#[tokio::test]
#[ignore = "requires LocalStack"]
async fn test_consume_unknown_queue_fails_iteration() {
    let ctx = LocalStackTestContext::new().await;

    if !ctx.is_available().await {
        eprintln!("LocalStack not available, skipping test");
        return;
    }

    let params = ctx
        .aws_params()
        .with(params::SQS_QUEUE_NAME, unique_name("lf-missing").as_str())
        .with(params::SQS_WAIT_TIME_SECONDS, "0");
    let factory = AwsClientFactory::new();
    let mut session = WorkerSession::setup(0, OperationKind::SqsConsume, &params, &factory)
        .await
        .unwrap();

    let outcome = session.execute(&mut Variables::new()).await;
    assert!(!outcome.success);
    assert!(outcome.response_code.is_some());
    assert_ne!(outcome.response_code.as_deref(), Some("ConfigurationError"));
}

#[tokio::test]
#[ignore = "requires LocalStack"]
async fn test_produce_run_by_url() {
    let ctx = LocalStackTestContext::new().await;

    if !ctx.is_available().await {
        eprintln!("LocalStack not available, skipping test");
        return;
    }

    let queue_url = ctx.create_queue(&unique_name("lf-produce")).await.unwrap();

    let params = ctx
        .aws_params()
        .with(params::SQS_QUEUE_NAME, queue_url.as_str())
        .with(params::SQS_MESSAGE_BODY, "payload")
        .with(params::SQS_MESSAGE_ATTRIBUTES, r#"{"kind":"load"}"#);
    let sink = Arc::new(StatsSink::new());
    let runner = LoadRunner::new(
        RunConfig::new().with_virtual_users(2).with_iterations(3),
        OperationKind::SqsProduce,
        params,
        Arc::new(AwsClientFactory::new()),
        sink.clone(),
    );

    let report = runner.run().await.unwrap();
    assert_eq!(report.stats.iterations, 6);
    assert_eq!(report.stats.failures(), 0);
    assert_eq!(sink.report().successes, 6);

    ctx.settle().await;
    let bodies = ctx.receive_messages(&queue_url, 10).await.unwrap();
    assert!(!bodies.is_empty());
    assert!(bodies.iter().all(|b| b == "payload"));

    ctx.delete_queue(&queue_url).await.ok();
}
