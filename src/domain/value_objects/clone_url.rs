use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use url::Url;

use super::credentials::Credentials;

#[derive(Debug, Error, PartialEq)]
pub enum CloneUrlError {
    #[error("Invalid URL format: {0}")]
    InvalidFormat(String),

    #[error("Unsupported URL scheme: {0}")]
    UnsupportedScheme(String),

    #[error("Missing host in URL: {0}")]
    MissingHost(String),

    #[error("URL already carries credentials: {0}")]
    EmbeddedCredentials(String),
}

/// HTTPS clone URL as returned by the hosting API.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CloneUrl {
    url: String,
}

impl CloneUrl {
    const SCHEME_PREFIX: &'static str = "https://";

    pub fn new(url: &str) -> Result<Self, CloneUrlError> {
        let trimmed = url.trim();
        let parsed =
            Url::parse(trimmed).map_err(|e| CloneUrlError::InvalidFormat(format!("{trimmed}: {e}")))?;

        if parsed.scheme() != "https" {
            return Err(CloneUrlError::UnsupportedScheme(parsed.scheme().to_string()));
        }
        if parsed.host_str().map_or(true, str::is_empty) {
            return Err(CloneUrlError::MissingHost(trimmed.to_string()));
        }
        if !parsed.username().is_empty() || parsed.password().is_some() {
            return Err(CloneUrlError::EmbeddedCredentials(parsed.host_str().unwrap_or_default().to_string()));
        }
        // Keep the caller's spelling; url::Url would normalise paths.
        if !trimmed.starts_with(Self::SCHEME_PREFIX) {
            return Err(CloneUrlError::InvalidFormat(trimmed.to_string()));
        }

        Ok(Self {
            url: trimmed.to_string(),
        })
    }

    pub fn as_str(&self) -> &str {
        &self.url
    }

    /// Everything after `https://`, i.e. host and path.
    pub fn host_and_path(&self) -> &str {
        &self.url[Self::SCHEME_PREFIX.len()..]
    }

    /// Last path segment without a `.git` suffix.
    pub fn repository_name(&self) -> &str {
        let path = self.host_and_path().trim_end_matches('/');
        let last = path.rsplit('/').next().unwrap_or(path);
        last.strip_suffix(".git").unwrap_or(last)
    }

    /// URL to hand to `git clone`.
    ///
    /// With a complete credential pair the result is
    /// `https://<user>:<token>@<host-and-path>`; otherwise the plain URL.
    pub fn authenticated(&self, credentials: &Credentials) -> String {
        match credentials.pair() {
            Some((user, token)) => {
                format!("{}{}:{}@{}", Self::SCHEME_PREFIX, user, token, self.host_and_path())
            }
            None => self.url.clone(),
        }
    }

    /// Log-safe rendering of [`CloneUrl::authenticated`].
    pub fn redacted(&self, credentials: &Credentials) -> String {
        match credentials.pair() {
            Some((user, _)) => {
                format!("{}{}:***@{}", Self::SCHEME_PREFIX, user, self.host_and_path())
            }
            None => self.url.clone(),
        }
    }
}

impl fmt::Display for CloneUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.url)
    }
}

impl TryFrom<String> for CloneUrl {
    type Error = CloneUrlError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(&value)
    }
}

impl From<CloneUrl> for String {
    fn from(value: CloneUrl) -> Self {
        value.url
    }
}
