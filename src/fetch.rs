//! Corpus sources.
//!
//! A [`CorpusSource`] retrieves the raw bytes of a CEX document in one
//! read. It does no parsing. Two sources are built in:
//!
//! | Source | Config | Reads |
//! |--------|--------|-------|
//! | [`HttpSource`] | `source.url` | one `GET`, full body in memory |
//! | [`FileSource`] | `source.path` | a local file |

use async_trait::async_trait;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

use crate::config::SourceConfig;

/// Failure to retrieve corpus bytes.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("{source_name} returned HTTP {status}")]
    Status { source_name: String, status: u16 },

    #[error("request to {source_name} failed: {cause}")]
    Transport {
        source_name: String,
        #[source]
        cause: reqwest::Error,
    },

    #[error("failed to read {}: {cause}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        cause: std::io::Error,
    },
}

/// Something that can produce the raw bytes of a CEX document.
#[async_trait]
pub trait CorpusSource: Send + Sync {
    /// Human-readable location, used in logs.
    fn describe(&self) -> String;

    async fn fetch(&self) -> Result<Vec<u8>, FetchError>;
}

/// Fetches the corpus with a single HTTP `GET`.
pub struct HttpSource {
    url: String,
    client: reqwest::Client,
}

impl HttpSource {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, FetchError> {
        let url = url.into();
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|cause| FetchError::Transport {
                source_name: url.clone(),
                cause,
            })?;
        Ok(Self { url, client })
    }
}

#[async_trait]
impl CorpusSource for HttpSource {
    fn describe(&self) -> String {
        self.url.clone()
    }

    async fn fetch(&self) -> Result<Vec<u8>, FetchError> {
        let transport = |cause| FetchError::Transport {
            source_name: self.url.clone(),
            cause,
        };

        let resp = self.client.get(&self.url).send().await.map_err(transport)?;
        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                source_name: self.url.clone(),
                status: status.as_u16(),
            });
        }

        let body = resp.bytes().await.map_err(transport)?;
        Ok(body.to_vec())
    }
}

/// Reads the corpus from a local file.
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl CorpusSource for FileSource {
    fn describe(&self) -> String {
        format!("file://{}", self.path.display())
    }

    async fn fetch(&self) -> Result<Vec<u8>, FetchError> {
        tokio::fs::read(&self.path)
            .await
            .map_err(|cause| FetchError::Io {
                path: self.path.clone(),
                cause,
            })
    }
}

/// Build the source named by the `[source]` config section.
pub fn source_from_config(config: &SourceConfig) -> anyhow::Result<Box<dyn CorpusSource>> {
    match (&config.url, &config.path) {
        (Some(url), _) => {
            let timeout = Duration::from_secs(config.timeout_secs);
            Ok(Box::new(HttpSource::new(url.clone(), timeout)?))
        }
        (None, Some(path)) => Ok(Box::new(FileSource::new(path.clone()))),
        (None, None) => anyhow::bail!("no corpus source configured"),
    }
}
