use std::{fmt, io::Error, path::PathBuf};

use tokio::sync::Mutex;

use crate::types::HeaderIngest;

/// Captured headers kept for YouTube Music, in this order. The captured
/// `authorization` is informational only; requests are signed afresh.
pub const AUTH_HEADER_KEYS: [&str; 9] = [
    "authorization",
    "x-goog-authuser",
    "x-goog-visitor-id",
    "x-origin",
    "x-youtube-client-name",
    "x-youtube-client-version",
    "user-agent",
    "accept-language",
    "cookie",
];

/// Cookies whose value signs InnerTube requests, in order of preference.
const SAPISID_COOKIES: [&str; 2] = ["SAPISID", "__Secure-3PAPISID"];

#[derive(Debug)]
pub enum StoreError {
    IoError(Error),
    SerdeError(serde_json::Error),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::IoError(e) => write!(f, "{}", e),
            StoreError::SerdeError(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for StoreError {}

impl From<Error> for StoreError {
    fn from(err: Error) -> Self {
        StoreError::IoError(err)
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::SerdeError(err)
    }
}

/// The subset of captured headers used to authenticate against YouTube Music.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthHeaders {
    headers: Vec<(String, String)>,
}

impl AuthHeaders {
    /// Picks the known auth headers out of a captured set. Names match
    /// case-insensitively and empty values are skipped. `None` unless the
    /// capture carries a cookie with a `SAPISID` to sign requests with.
    pub fn from_captured(ingest: &HeaderIngest) -> Option<Self> {
        let headers: Vec<(String, String)> = AUTH_HEADER_KEYS
            .iter()
            .filter_map(|key| {
                ingest
                    .headers
                    .iter()
                    .find(|(name, value)| name.eq_ignore_ascii_case(key) && !value.is_empty())
                    .map(|(_, value)| (key.to_string(), value.clone()))
            })
            .collect();

        let auth = Self { headers };
        auth.sapisid()?;
        Some(auth)
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(name, _)| name == key)
            .map(|(_, value)| value.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.headers.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// The `SAPISID` cookie value, falling back to `__Secure-3PAPISID`.
    pub fn sapisid(&self) -> Option<&str> {
        let cookies: Vec<(&str, &str)> = self
            .get("cookie")?
            .split(';')
            .filter_map(|pair| pair.trim().split_once('='))
            .collect();

        SAPISID_COOKIES.iter().find_map(|wanted| {
            cookies
                .iter()
                .find(|(name, value)| name == wanted && !value.is_empty())
                .map(|(_, value)| *value)
        })
    }
}

/// File-backed store for the captured header payload.
///
/// The derived [`AuthHeaders`] are cached after the first read; saving or
/// deleting the file drops the cache so the next read sees the new state.
pub struct HeaderStore {
    path: PathBuf,
    cache: Mutex<Option<Option<AuthHeaders>>>,
}

impl HeaderStore {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            cache: Mutex::new(None),
        }
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    /// Reads the stored payload; a missing or unreadable file counts as none.
    pub async fn load(&self) -> Option<HeaderIngest> {
        let json = async_fs::read_to_string(&self.path).await.ok()?;
        match serde_json::from_str(&json) {
            Ok(ingest) => Some(ingest),
            Err(e) => {
                tracing::warn!(path = %self.path.display(), "ignoring corrupt headers file: {}", e);
                None
            }
        }
    }

    pub async fn save(&self, ingest: &HeaderIngest) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            async_fs::create_dir_all(parent).await?;
        }

        let json = serde_json::to_string_pretty(ingest)?;
        async_fs::write(&self.path, json).await?;
        self.invalidate().await;
        Ok(())
    }

    /// Removes the stored payload. Returns whether a file was present.
    pub async fn delete(&self) -> Result<bool, StoreError> {
        let existed = match async_fs::remove_file(&self.path).await {
            Ok(()) => true,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => false,
            Err(e) => return Err(StoreError::IoError(e)),
        };
        self.invalidate().await;
        Ok(existed)
    }

    /// Auth headers derived from the stored payload, cached between calls.
    pub async fn auth_headers(&self) -> Option<AuthHeaders> {
        let mut cache = self.cache.lock().await;
        if let Some(cached) = cache.as_ref() {
            return cached.clone();
        }

        let auth = self
            .load()
            .await
            .as_ref()
            .and_then(AuthHeaders::from_captured);
        *cache = Some(auth.clone());
        auth
    }

    pub async fn invalidate(&self) {
        self.cache.lock().await.take();
    }
}
