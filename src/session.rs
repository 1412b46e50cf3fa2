//! Persisted bearer session. Written once at login, read at the start of
//! every admin operation, cleared on logout or a 401.
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;

const SESSION_FILE: &str = "session.json";
const TOKEN_TTL_DAYS: i64 = 7;

#[derive(Debug, Serialize, Deserialize)]
struct StoredSession {
    token: String,
    issued_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(data_dir: impl AsRef<Path>) -> Self {
        Self {
            path: data_dir.as_ref().join(SESSION_FILE),
        }
    }

    pub fn save(&self, token: &str) -> io::Result<()> {
        let stored = StoredSession {
            token: token.to_string(),
            issued_at: Utc::now(),
        };
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(&stored).expect("session serializes");
        fs::write(&self.path, json)
    }

    /// Current token, or `None` when absent, unreadable, or older than the
    /// 7-day TTL. An expired or unreadable file is removed on the spot.
    pub fn token(&self) -> Option<String> {
        let raw = fs::read_to_string(&self.path).ok()?;
        let stored: StoredSession = match serde_json::from_str(&raw) {
            Ok(s) => s,
            Err(err) => {
                debug!(?err, path = %self.path.display(), "discarding unreadable session file");
                self.clear();
                return None;
            }
        };
        if Utc::now() - stored.issued_at > Duration::days(TOKEN_TTL_DAYS) {
            debug!(path = %self.path.display(), "session expired");
            self.clear();
            return None;
        }
        Some(stored.token)
    }

    pub fn clear(&self) {
        match fs::remove_file(&self.path) {
            Ok(()) => {}
            Err(err) if err.kind() == io::ErrorKind::NotFound => {}
            Err(err) => debug!(?err, path = %self.path.display(), "failed to remove session file"),
        }
    }
}
