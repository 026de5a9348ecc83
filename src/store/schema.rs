use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::session::Session;
use crate::session::puzzle::Puzzle;

pub const SCHEMA_VERSION: u32 = 1;

/// On-disk envelope for one persisted session. The version gate lets an old
/// or foreign file read as absent state instead of half-parsing.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SessionData {
    pub schema_version: u32,
    pub saved_at: DateTime<Utc>,
    pub puzzles: Vec<Puzzle>,
}

impl SessionData {
    pub fn from_session(session: &Session) -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            saved_at: Utc::now(),
            puzzles: session.puzzles.clone(),
        }
    }

    /// Unwrap the envelope, or None when the schema version is stale.
    pub fn into_session(self) -> Option<Session> {
        if self.schema_version == SCHEMA_VERSION {
            Some(Session::new(self.puzzles))
        } else {
            None
        }
    }
}
