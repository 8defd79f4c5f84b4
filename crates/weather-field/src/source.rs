// Copyright 2025 Chris Custine
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Where dataset files are read from.

use std::fmt;
use std::path::PathBuf;

use log::debug;
use reqwest::Url;

use crate::loader::LoadError;

/// File name of the wind dataset.
pub const WIND_FILE: &str = "wind.json";

/// File name of the pressure dataset.
pub const PRESSURE_FILE: &str = "msl.json";

/// Origin that dataset names are resolved against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSource {
    /// A local directory.
    Directory(PathBuf),
    /// An HTTP(S) base URL. Always ends in `/`.
    Http(Url),
}

impl DataSource {
    /// Interpret a user-supplied location: `http://` or `https://` prefixes
    /// select HTTP, anything else is a directory path.
    pub fn parse(location: &str) -> Result<Self, LoadError> {
        let lower = location.to_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            let mut base = location.to_string();
            if !base.ends_with('/') {
                base.push('/');
            }
            let url = Url::parse(&base).map_err(|e| LoadError::InvalidUrl {
                url: location.to_string(),
                reason: e.to_string(),
            })?;
            Ok(Self::Http(url))
        } else {
            Ok(Self::Directory(PathBuf::from(location)))
        }
    }

    /// Human-readable location of `name` under this source.
    #[must_use]
    pub fn locate(&self, name: &str) -> String {
        match self {
            Self::Directory(dir) => dir.join(name).display().to_string(),
            Self::Http(base) => base
                .join(name)
                .map_or_else(|_| format!("{base}{name}"), |url| url.to_string()),
        }
    }

    /// Read the raw bytes of `name`.
    pub async fn fetch(&self, name: &str) -> Result<Vec<u8>, LoadError> {
        debug!("Fetching {}", self.locate(name));
        match self {
            Self::Directory(dir) => {
                let path = dir.join(name);
                tokio::fs::read(&path)
                    .await
                    .map_err(|source| LoadError::Io { path, source })
            }
            Self::Http(base) => {
                let url = base.join(name).map_err(|e| LoadError::InvalidUrl {
                    url: format!("{base}{name}"),
                    reason: e.to_string(),
                })?;
                let response = reqwest::get(url).await?.error_for_status()?;
                Ok(response.bytes().await?.to_vec())
            }
        }
    }
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Directory(dir) => write!(f, "{}", dir.display()),
            Self::Http(url) => write!(f, "{url}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_directory() {
        let source = DataSource::parse("./html").unwrap();
        assert_eq!(source, DataSource::Directory(PathBuf::from("./html")));
        assert!(source.locate(WIND_FILE).ends_with("wind.json"));
    }

    #[test]
    fn test_parse_http_adds_trailing_slash() {
        let source = DataSource::parse("https://example.com/weather").unwrap();
        assert_eq!(
            source.locate(PRESSURE_FILE),
            "https://example.com/weather/msl.json"
        );

        let source = DataSource::parse("http://localhost:8080/").unwrap();
        assert_eq!(source.locate(WIND_FILE), "http://localhost:8080/wind.json");
    }

    #[test]
    fn test_parse_invalid_url() {
        assert!(matches!(
            DataSource::parse("http://"),
            Err(LoadError::InvalidUrl { .. })
        ));
    }

    #[tokio::test]
    async fn test_fetch_from_directory() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(WIND_FILE), b"[]").unwrap();

        let source = DataSource::Directory(dir.path().to_path_buf());
        assert_eq!(source.fetch(WIND_FILE).await.unwrap(), b"[]");
        assert!(matches!(
            source.fetch(PRESSURE_FILE).await,
            Err(LoadError::Io { .. })
        ));
    }
}
