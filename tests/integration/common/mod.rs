//! Common utilities for integration tests.
//!
//! Shared LocalStack client setup and the AWS parameters that point the
//! sampler at it.

pub mod localstack;

pub use localstack::{unique_name, LocalStackTestContext};
