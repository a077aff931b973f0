//! AWS-backed implementations of the client capabilities.

mod factory;
mod s3;
mod sqs;

pub use factory::{build_sdk_config, AwsClientFactory};
pub use s3::S3ObjectStore;
pub use sqs::SqsQueueClient;

use aws_sdk_sqs::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use lf_error::{ErrorKind, LfError, RemoteError};

/// Map an SDK error to a remote error carrying the service code and message.
///
/// Errors that never reached the service (dispatch failures, timeouts) have
/// no code; they are reported under the remote-service kind code with the
/// full error chain as message.
pub(crate) fn remote_error<E, R>(err: SdkError<E, R>) -> LfError
where
    E: ProvideErrorMetadata + std::error::Error + 'static,
    R: std::fmt::Debug,
{
    let code = err
        .code()
        .map(str::to_string)
        .unwrap_or_else(|| ErrorKind::RemoteService.code().to_string());
    let message = err
        .message()
        .map(str::to_string)
        .unwrap_or_else(|| DisplayErrorContext(&err).to_string());

    LfError::Remote(RemoteError::new(code, message))
}
