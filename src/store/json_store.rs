use std::fs;
use std::io::Write;
use std::path::PathBuf;

use anyhow::Result;
use tracing::warn;

use crate::session::Session;
use crate::store::schema::SessionData;

/// Whole-session persistence: one JSON file per session key under the
/// platform data directory. Every save rewrites the full document, matching
/// how the session is held in memory.
pub struct SessionStore {
    base_dir: PathBuf,
}

impl SessionStore {
    pub fn new() -> Result<Self> {
        let base_dir = dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("dictee");
        fs::create_dir_all(&base_dir)?;
        Ok(Self { base_dir })
    }

    pub fn with_base_dir(base_dir: PathBuf) -> Result<Self> {
        fs::create_dir_all(&base_dir)?;
        Ok(Self { base_dir })
    }

    fn file_path(&self, key: &str) -> PathBuf {
        self.base_dir.join(format!("{}.json", sanitize_key(key)))
    }

    /// Load a persisted session. Missing, unreadable, unparseable, and
    /// stale-schema files all read as None; the caller reseeds defaults.
    /// Corruption is never fatal here.
    pub fn load(&self, key: &str) -> Option<Session> {
        let path = self.file_path(key);
        if !path.exists() {
            return None;
        }
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(err) => {
                warn!(key, error = %err, "session file unreadable, starting fresh");
                return None;
            }
        };
        match serde_json::from_str::<SessionData>(&content) {
            Ok(data) => {
                let session = data.into_session();
                if session.is_none() {
                    warn!(key, "session schema version mismatch, starting fresh");
                }
                session
            }
            Err(err) => {
                warn!(key, error = %err, "session file unparseable, starting fresh");
                None
            }
        }
    }

    /// Serialize the session into its versioned envelope and write it
    /// atomically: temp file, fsync, rename over the final path.
    pub fn save(&self, key: &str, session: &Session) -> Result<()> {
        let path = self.file_path(key);
        let tmp_path = path.with_extension("tmp");

        let json = serde_json::to_string_pretty(&SessionData::from_session(session))?;
        let mut file = fs::File::create(&tmp_path)?;
        file.write_all(json.as_bytes())?;
        file.sync_all()?;

        fs::rename(&tmp_path, &path)?;
        Ok(())
    }

    /// Drop the persisted state for a key, if any.
    pub fn delete(&self, key: &str) -> Result<()> {
        let path = self.file_path(key);
        if path.exists() {
            fs::remove_file(path)?;
        }
        Ok(())
    }
}

fn sanitize_key(key: &str) -> String {
    key.chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}
