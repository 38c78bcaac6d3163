use std::path::PathBuf;

use crate::error::DataLoadError;
use crate::fetch::{BasicClient, HttpClient, fetch_bytes};

/// Where the journey table comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSource {
    File(PathBuf),
    Url(String),
}

impl DataSource {
    /// `http://` and `https://` locations are URLs, everything else is a path.
    pub fn parse(location: &str) -> Self {
        if location.starts_with("http://") || location.starts_with("https://") {
            DataSource::Url(location.to_string())
        } else {
            DataSource::File(PathBuf::from(location))
        }
    }

    /// Reads the raw (possibly gzip-compressed) bytes of the table.
    pub async fn read_bytes(&self) -> Result<Vec<u8>, DataLoadError> {
        match self {
            DataSource::File(path) => Ok(tokio::fs::read(path).await?),
            DataSource::Url(url) => {
                let client = BasicClient::new().map_err(|e| DataLoadError::Fetch {
                    url: url.clone(),
                    source: e.into(),
                })?;
                self.read_bytes_with(&client).await
            }
        }
    }

    /// Like [`read_bytes`](Self::read_bytes), fetching URLs through `client`.
    pub async fn read_bytes_with<C: HttpClient>(&self, client: &C) -> Result<Vec<u8>, DataLoadError> {
        match self {
            DataSource::File(path) => Ok(tokio::fs::read(path).await?),
            DataSource::Url(url) => {
                fetch_bytes(client, url)
                    .await
                    .map_err(|e| DataLoadError::Fetch {
                        url: url.clone(),
                        source: e.into(),
                    })
            }
        }
    }
}

impl std::fmt::Display for DataSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DataSource::File(path) => write!(f, "{}", path.display()),
            DataSource::Url(url) => write!(f, "{url}"),
        }
    }
}
