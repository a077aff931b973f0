//! Object get, buffered in memory or streamed to a file.

use super::progress::StreamProgress;
use crate::recorder::Completion;
use lf_error::{Result, TransportError};
use lf_traits::ObjectStoreClient;
use lf_types::S3DownloadSettings;
use std::path::Path;
use std::time::Instant;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tracing::info;

pub const DOWNLOADED: &str = "Download successful.";

/// Fetch the configured object.
///
/// Without a download path the whole object is held in memory and only its
/// size is reported. With a path the body is streamed through a reusable
/// buffer of `buffer_size` bytes.
pub async fn download(
    client: &dyn ObjectStoreClient,
    settings: &S3DownloadSettings,
) -> Result<Completion> {
    let start = Instant::now();

    let bytes = match &settings.path {
        None => client.get_bytes(&settings.bucket, &settings.key).await?.len() as u64,
        Some(path) => stream_to_file(client, settings, path).await?,
    };

    info!("Download time: {} ms", start.elapsed().as_millis());
    Ok(Completion::new(DOWNLOADED).with_bytes(bytes))
}

async fn stream_to_file(
    client: &dyn ObjectStoreClient,
    settings: &S3DownloadSettings,
    path: &Path,
) -> Result<u64> {
    let mut stream = client.get_stream(&settings.bucket, &settings.key).await?;
    let mut file = tokio::fs::File::create(path)
        .await
        .map_err(TransportError::from)?;

    let mut buffer = vec![0u8; settings.buffer_size];
    let mut progress = StreamProgress::new(stream.content_length);

    loop {
        let read = stream
            .reader
            .read(&mut buffer)
            .await
            .map_err(TransportError::from)?;
        if read == 0 {
            break;
        }
        file.write_all(&buffer[..read])
            .await
            .map_err(TransportError::from)?;

        if let Some(percent) = progress.advance(read) {
            info!(
                "Receiving Object: {:.1}% ({} / {} bytes)",
                percent as f64,
                progress.total_bytes_read(),
                progress.content_length().unwrap_or_default()
            );
        }
    }
    file.flush().await.map_err(TransportError::from)?;

    if progress.is_short() {
        return Err(TransportError::ShortRead {
            expected: progress.content_length().unwrap_or_default(),
            actual: progress.total_bytes_read(),
        }
        .into());
    }

    Ok(progress.total_bytes_read())
}
