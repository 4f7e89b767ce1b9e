//! HTTP implementation of the [`ArtifactFetcher`] port.

use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use futures_util::StreamExt;
use mcwarden_core::{ArtifactFetcher, FetchError};
use reqwest::{Client, redirect};
use tokio::fs::{self, File};
use tokio::io::AsyncWriteExt;
use tracing::{debug, info};

/// Redirect hops followed before a download is abandoned.
pub const MAX_REDIRECTS: usize = 5;

const USER_AGENT: &str = concat!("mcwarden/", env!("CARGO_PKG_VERSION"));
const CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

/// Streams downloads to disk with `reqwest`.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new() -> Result<Self, FetchError> {
        let client = Client::builder()
            .redirect(redirect::Policy::limited(MAX_REDIRECTS))
            .connect_timeout(CONNECT_TIMEOUT)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| FetchError::Request {
                url: String::new(),
                message: e.to_string(),
            })?;
        Ok(Self { client })
    }

    /// Use a preconfigured client (tests, proxies).
    pub const fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ArtifactFetcher for HttpFetcher {
    async fn fetch(&self, url: &str, dest: &Path) -> Result<u64, FetchError> {
        let request_error = |e: reqwest::Error| FetchError::Request {
            url: url.to_string(),
            message: e.to_string(),
        };

        debug!(%url, dest = %dest.display(), "Starting download");
        let response = self.client.get(url).send().await.map_err(request_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let temp_path = partial_path(dest);
        let io_error = |path: &Path, source: std::io::Error| FetchError::Io {
            path: path.to_path_buf(),
            source,
        };

        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| io_error(parent, e))?;
        }
        let mut file = File::create(&temp_path)
            .await
            .map_err(|e| io_error(&temp_path, e))?;

        let mut downloaded: u64 = 0;
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = match chunk {
                Ok(chunk) => chunk,
                Err(e) => {
                    let _ = fs::remove_file(&temp_path).await;
                    return Err(request_error(e));
                }
            };
            file.write_all(&chunk)
                .await
                .map_err(|e| io_error(&temp_path, e))?;
            downloaded += chunk.len() as u64;
        }
        file.flush().await.map_err(|e| io_error(&temp_path, e))?;
        drop(file);

        fs::rename(&temp_path, dest)
            .await
            .map_err(|e| io_error(dest, e))?;

        info!(
            file = %dest.file_name().unwrap_or_default().to_string_lossy(),
            bytes = downloaded,
            "Download complete"
        );
        Ok(downloaded)
    }
}

fn partial_path(dest: &Path) -> PathBuf {
    let mut name = dest.file_name().unwrap_or_default().to_os_string();
    name.push(".part");
    dest.with_file_name(name)
}
