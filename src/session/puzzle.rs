use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::engine::scoring::word_count;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PuzzleKind {
    /// English prompt, French answer expected.
    Translate,
    /// Spoken French prompt, exact transcription expected.
    Dictate,
    /// Transcription against a countdown budget.
    Speed,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PuzzleStatus {
    Pending,
    InProgress,
    Complete,
    Skipped,
}

impl PuzzleStatus {
    /// Complete and Skipped are absorbing: no transition leaves them.
    pub fn is_terminal(self) -> bool {
        matches!(self, PuzzleStatus::Complete | PuzzleStatus::Skipped)
    }
}

/// One mistake located in the guess text. `offset` and `length` count
/// characters, not bytes. `better` holds replacement text from the prompt
/// when the differ found some.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ErrorSpan {
    pub offset: usize,
    pub length: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub better: Option<String>,
}

/// A submitted attempt with the errors found in it. Never edited after
/// construction; in particular the first guess of a puzzle stays exactly as
/// typed, since scoring reads its error count later.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Guess {
    pub text: String,
    pub errors: Vec<ErrorSpan>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Puzzle {
    pub id: Uuid,
    pub kind: PuzzleKind,
    pub prompt: String,
    #[serde(default)]
    pub guesses: Vec<Guess>,
    #[serde(default)]
    pub score: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub elapsed_secs: Option<f64>,
    pub status: PuzzleStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feedback: Option<String>,
}

impl Puzzle {
    pub fn new(kind: PuzzleKind, prompt: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            prompt: prompt.into(),
            guesses: Vec::new(),
            score: 0,
            elapsed_secs: None,
            status: PuzzleStatus::Pending,
            feedback: None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    /// Scoreable units. Every kind currently scores against the prompt's
    /// word count; a kind that derives units elsewhere would branch here.
    pub fn total_units(&self) -> usize {
        word_count(&self.prompt)
    }
}
