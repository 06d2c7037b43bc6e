//! Streamed download of a response body to disk
//!
//! The body is written to `<path>.part` and renamed over `<path>` only once
//! every chunk has been written, so a failed download never leaves a
//! truncated target behind and never clobbers an existing one.

use crate::error::FetchError;
use futures::StreamExt;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tokio::fs::{self, File};
use tokio::io::AsyncWriteExt;
use tokio::time::Instant;
use tracing::{debug, warn};

/// Suffix of the in-progress file
const PART_SUFFIX: &str = ".part";

/// Stream `response` into `path`, returning the number of bytes written
pub(crate) async fn stream_to_file(
    response: reqwest::Response,
    path: &Path,
    deadline: Instant,
) -> Result<u64, FetchError> {
    let part = part_path(path);

    let result = match write_body(response, &part, deadline).await {
        Ok(written) => fs::rename(&part, path)
            .await
            .map(|_| written)
            .map_err(FetchError::from),
        Err(e) => Err(e),
    };

    if result.is_err() {
        if let Err(e) = fs::remove_file(&part).await {
            if e.kind() != std::io::ErrorKind::NotFound {
                warn!(path = %part.display(), "Failed to remove partial download: {}", e);
            }
        }
    }

    result
}

async fn write_body(
    response: reqwest::Response,
    part: &Path,
    deadline: Instant,
) -> Result<u64, FetchError> {
    let mut file = File::create(part).await?;
    let mut stream = response.bytes_stream();
    let mut written: u64 = 0;

    loop {
        tokio::select! {
            chunk = stream.next() => {
                match chunk {
                    Some(Ok(bytes)) => {
                        file.write_all(&bytes).await?;
                        written += bytes.len() as u64;
                    }
                    Some(Err(e)) => {
                        warn!(written, "Error reading body chunk: {}", e);
                        return Err(FetchError::from_reqwest(e));
                    }
                    None => break,
                }
            }
            _ = tokio::time::sleep_until(deadline) => {
                warn!(written, "Download deadline reached");
                return Err(FetchError::Timeout);
            }
        }
    }

    file.flush().await?;
    file.sync_all().await?;
    debug!(path = %part.display(), written, "Body written");
    Ok(written)
}

/// `<path>.part`, next to the target so the final rename stays on one filesystem
fn part_path(path: &Path) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(PART_SUFFIX);
    PathBuf::from(name)
}
