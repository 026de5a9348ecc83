pub mod feedback;
#[cfg(feature = "network")]
pub mod openai;
#[cfg(feature = "network")]
pub mod textgears;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::session::puzzle::ErrorSpan;

/// Failures from the external collaborators. All of them are recoverable:
/// the drill reports the failure and leaves puzzle state untouched.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("request failed: {0}")]
    Http(String),
    #[error("service returned {status}: {message}")]
    Api { status: u16, message: String },
    #[error("malformed response: {0}")]
    Malformed(String),
    #[error("api key not configured")]
    MissingKey,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FindingKind {
    Spelling,
    Grammar,
}

/// One mistake reported by an external checker, located in the submitted
/// text with character offsets.
#[derive(Clone, Debug, PartialEq)]
pub struct GrammarFinding {
    pub offset: usize,
    pub length: usize,
    pub kind: FindingKind,
    pub suggestion: Option<String>,
}

impl From<GrammarFinding> for ErrorSpan {
    fn from(finding: GrammarFinding) -> Self {
        ErrorSpan {
            offset: finding.offset,
            length: finding.length,
            better: finding.suggestion,
        }
    }
}

/// External judge of a guess, used where a plain text diff is the wrong
/// tool (free-form translation answers).
pub trait GrammarCheck {
    fn check(&self, text: &str, language: &str) -> Result<Vec<GrammarFinding>, ServiceError>;
}

/// Text-to-speech for dictation prompts.
pub trait SpeechSynth {
    fn synthesize(&self, text: &str, voice: Voice) -> Result<Vec<u8>, ServiceError>;
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Voice {
    Alloy,
    Echo,
    Fable,
    #[default]
    Onyx,
    Nova,
    Shimmer,
}

impl Voice {
    pub fn as_str(self) -> &'static str {
        match self {
            Voice::Alloy => "alloy",
            Voice::Echo => "echo",
            Voice::Fable => "fable",
            Voice::Onyx => "onyx",
            Voice::Nova => "nova",
            Voice::Shimmer => "shimmer",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "alloy" => Some(Voice::Alloy),
            "echo" => Some(Voice::Echo),
            "fable" => Some(Voice::Fable),
            "onyx" => Some(Voice::Onyx),
            "nova" => Some(Voice::Nova),
            "shimmer" => Some(Voice::Shimmer),
            _ => None,
        }
    }
}
