//! Asset download to a temporary file

use bine_core::{Error, Result};
use bine_providers::{require_ok, HttpClient};
use futures_util::StreamExt;
use reqwest::header::HeaderMap;
use std::io::Write;
use tempfile::NamedTempFile;
use tracing::debug;

/// Stream `url` into a temporary file that is removed when dropped
pub async fn download_to_temp(http: &HttpClient, url: &str) -> Result<NamedTempFile> {
    let response = require_ok(url, http.get(url, HeaderMap::new()).await?)?;

    let mut file = tempfile::Builder::new().prefix("bine-download-").tempfile()?;
    let mut downloaded: u64 = 0;
    let mut stream = response.bytes_stream();

    while let Some(chunk) = stream.next().await {
        let chunk: bytes::Bytes = chunk.map_err(|e| Error::network(url, e))?;
        file.write_all(&chunk)?;
        downloaded += chunk.len() as u64;
    }
    file.flush()?;

    debug!(url = %url, bytes = downloaded, "download complete");
    Ok(file)
}
