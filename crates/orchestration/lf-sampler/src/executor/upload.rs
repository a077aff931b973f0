//! Object put from a local file.

use crate::recorder::Completion;
use lf_error::{ConfigError, Result};
use lf_traits::ObjectStoreClient;
use lf_types::S3UploadSettings;
use std::time::Instant;
use tracing::info;

pub const UPLOADED: &str = "Upload successful.";

/// Upload the configured file in one call.
///
/// The path must name an existing regular file; otherwise the iteration
/// fails with a configuration error and nothing is sent.
pub async fn upload(client: &dyn ObjectStoreClient, settings: &S3UploadSettings) -> Result<Completion> {
    let is_file = tokio::fs::metadata(&settings.path)
        .await
        .map(|m| m.is_file())
        .unwrap_or(false);
    if !is_file {
        return Err(ConfigError::LocalFile(settings.path.display().to_string()).into());
    }

    let start = Instant::now();
    let result = client
        .put_file(&settings.bucket, &settings.key, &settings.path)
        .await?;
    info!("Upload time: {} ms", start.elapsed().as_millis());

    let completion = Completion::new(UPLOADED).with_bytes(result.bytes);
    Ok(match result.e_tag {
        Some(e_tag) => completion.with_data(e_tag),
        None => completion,
    })
}
