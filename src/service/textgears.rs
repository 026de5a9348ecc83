//! TextGears grammar checker, reached through its RapidAPI front.

use std::time::Duration;

use reqwest::blocking::Client;
use serde::Deserialize;
use tracing::info;

use crate::config::Config;
use crate::service::{FindingKind, GrammarCheck, GrammarFinding, ServiceError};

const ENDPOINT: &str = "https://textgears-textgears-v1.p.rapidapi.com/grammar";
const RAPIDAPI_HOST: &str = "textgears-textgears-v1.p.rapidapi.com";

pub struct TextGears {
    client: Client,
    api_key: String,
}

impl TextGears {
    /// Build the checker from config. None without a RapidAPI key.
    pub fn from_config(config: &Config) -> Option<Self> {
        let api_key = config.textgears_api_key.clone()?;
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .ok()?;
        Some(Self { client, api_key })
    }
}

impl GrammarCheck for TextGears {
    fn check(&self, text: &str, language: &str) -> Result<Vec<GrammarFinding>, ServiceError> {
        let response = self
            .client
            .post(ENDPOINT)
            .header("X-RapidAPI-Key", self.api_key.as_str())
            .header("X-RapidAPI-Host", RAPIDAPI_HOST)
            .form(&[("text", text), ("language", language)])
            .send()
            .map_err(|e| ServiceError::Http(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response.text().unwrap_or_default();
            return Err(ServiceError::Api { status, message });
        }

        let body: TgEnvelope = response
            .json()
            .map_err(|e| ServiceError::Malformed(e.to_string()))?;
        let findings: Vec<GrammarFinding> =
            body.response.errors.into_iter().map(Into::into).collect();
        info!(language, findings = findings.len(), "grammar check finished");
        Ok(findings)
    }
}

#[derive(Deserialize)]
struct TgEnvelope {
    response: TgBody,
}

#[derive(Deserialize)]
struct TgBody {
    #[serde(default)]
    errors: Vec<TgError>,
}

#[derive(Deserialize)]
struct TgError {
    offset: usize,
    length: usize,
    #[serde(rename = "type", default)]
    kind: Option<String>,
    #[serde(default)]
    better: Vec<String>,
}

impl From<TgError> for GrammarFinding {
    fn from(error: TgError) -> Self {
        let kind = match error.kind.as_deref() {
            Some("grammar") => FindingKind::Grammar,
            _ => FindingKind::Spelling,
        };
        let suggestion = if error.better.is_empty() {
            None
        } else {
            Some(error.better.join(", "))
        };
        GrammarFinding {
            offset: error.offset,
            length: error.length,
            kind,
            suggestion,
        }
    }
}
