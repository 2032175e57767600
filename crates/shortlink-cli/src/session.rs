//! Persistent login state.
//!
//! The access token and the backend's session cookie both live in the
//! user's data directory, so a later invocation can still renew the token.

use std::fs::{self, File};
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use reqwest::cookie::CookieStore;
use reqwest::header::HeaderValue;
use reqwest_cookie_store::CookieStoreMutex;
use tracing::{debug, warn};
use url::Url;

use shortlink::{BackendUrl, FileTokenStore, ShortlinkClient, Transport};

fn data_dir() -> Result<PathBuf> {
    let dirs =
        ProjectDirs::from("", "", "shortlink").context("Could not determine data directory")?;

    let data_dir = dirs.data_dir();
    fs::create_dir_all(data_dir).context("Failed to create data directory")?;

    Ok(data_dir.to_path_buf())
}

/// Get the token file path.
pub fn token_path() -> Result<PathBuf> {
    Ok(data_dir()?.join("token.json"))
}

/// Get the cookie jar path.
pub fn cookie_path() -> Result<PathBuf> {
    Ok(data_dir()?.join("cookies.json"))
}

/// Cookie jar mirrored to a JSON file.
///
/// Written every time the backend sets a cookie. Session cookies are kept
/// too: the backend's session cookie usually has no expiry, and dropping it
/// would make every later refresh fail.
pub struct PersistentCookies {
    jar: CookieStoreMutex,
    path: PathBuf,
}

impl PersistentCookies {
    /// Load the jar at `path`. A missing or unreadable file starts empty.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let store = load(&path).unwrap_or_else(|e| {
            warn!(path = %path.display(), error = %e, "Ignoring unreadable cookie jar");
            cookie_store::CookieStore::default()
        });

        Self {
            jar: CookieStoreMutex::new(store),
            path,
        }
    }

    fn save(&self) -> Result<()> {
        let store = self
            .jar
            .lock()
            .map_err(|_| anyhow!("Cookie jar lock poisoned"))?;

        let mut buf = Vec::new();
        cookie_store::serde::json::save_incl_expired_and_nonpersistent(&store, &mut buf)
            .map_err(|e| anyhow!("Failed to serialize cookies: {}", e))?;
        fs::write(&self.path, buf)
            .with_context(|| format!("Failed to write {}", self.path.display()))?;

        debug!(path = %self.path.display(), "Saved cookie jar");
        Ok(())
    }
}

fn load(path: &Path) -> Result<cookie_store::CookieStore> {
    let file = match File::open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Ok(cookie_store::CookieStore::default());
        }
        Err(e) => return Err(e).with_context(|| format!("Failed to open {}", path.display())),
    };

    cookie_store::serde::json::load_all(BufReader::new(file))
        .map_err(|e| anyhow!("Failed to parse {}: {}", path.display(), e))
}

impl CookieStore for PersistentCookies {
    fn set_cookies(&self, cookie_headers: &mut dyn Iterator<Item = &HeaderValue>, url: &Url) {
        self.jar.set_cookies(cookie_headers, url);
        if let Err(e) = self.save() {
            warn!(error = %e, "Failed to persist cookies");
        }
    }

    fn cookies(&self, url: &Url) -> Option<HeaderValue> {
        self.jar.cookies(url)
    }
}

/// Build a client for `backend` backed by the on-disk token store and
/// cookie jar.
pub fn connect(backend: &str) -> Result<ShortlinkClient> {
    let backend = BackendUrl::new(backend).context("Invalid backend URL")?;
    let store = FileTokenStore::open(token_path()?);
    let cookies = PersistentCookies::open(cookie_path()?);

    let transport = Transport::builder(backend)
        .token_store(Arc::new(store))
        .cookie_provider(Arc::new(cookies))
        .build()
        .context("Failed to create HTTP client")?;

    Ok(ShortlinkClient::with_transport(transport))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(jar: &PersistentCookies, url: &Url, cookie: &'static str) {
        let header = HeaderValue::from_static(cookie);
        jar.set_cookies(&mut std::iter::once(&header), url);
    }

    #[test]
    fn session_cookie_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cookies.json");
        let url = Url::parse("http://127.0.0.1:3001/auth/login").unwrap();

        set(&PersistentCookies::open(&path), &url, "sid=abc; Path=/; HttpOnly");

        let reopened = PersistentCookies::open(&path);
        let refresh = Url::parse("http://127.0.0.1:3001/auth/refresh-token").unwrap();
        assert_eq!(reopened.cookies(&refresh).unwrap(), "sid=abc");
    }

    #[test]
    fn missing_file_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let jar = PersistentCookies::open(dir.path().join("cookies.json"));
        let url = Url::parse("http://127.0.0.1:3001/").unwrap();
        assert!(jar.cookies(&url).is_none());
    }

    #[test]
    fn corrupt_file_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cookies.json");
        fs::write(&path, "not json").unwrap();

        let jar = PersistentCookies::open(&path);
        let url = Url::parse("http://127.0.0.1:3001/").unwrap();
        assert!(jar.cookies(&url).is_none());
    }
}
