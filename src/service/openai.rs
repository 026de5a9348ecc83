//! OpenAI-backed collaborators: tutor feedback, word-verdict grammar
//! checking, and speech synthesis for dictation prompts.
//!
//! The API key is never logged; log lines carry models, latencies, and
//! sizes, not payload contents.

use std::time::{Duration, Instant};

use reqwest::blocking::Client;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, USER_AGENT};
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::config::Config;
use crate::service::feedback::{ChatMessage, feedback_messages};
use crate::service::{FindingKind, GrammarCheck, GrammarFinding, ServiceError, SpeechSynth, Voice};
use crate::session::puzzle::Puzzle;

const WORD_CHECK_SYSTEM: &str = "You are a French tutor for a grade 5 student. You will be provided with a French sentence that you should correct for grammar and spelling.\nFirst break it into words and return a result for each word as to whether it is correct or not. \"J'aime\" is one word.\nIf the word is incorrect, provide a correction. If the word is correct, leave the correction blank.\nDo not worry about punctuation.\n\nOutput JSON in the following format:\n\n[\n  { \"word\": \"Je\", \"correct\": true },\n  { \"word\": \"va\", \"correct\": false, \"correction\": \"vais\" },\n  ...\n]\n\nOnly output the JSON and nothing else.";

pub struct OpenAi {
    client: Client,
    api_key: String,
    base_url: String,
    chat_model: String,
    check_model: String,
    tts_model: String,
}

impl OpenAi {
    /// Build the client from config. None when no API key is configured;
    /// the drill then runs without this collaborator.
    pub fn from_config(config: &Config) -> Option<Self> {
        let api_key = config.openai_api_key.clone()?;
        let client = Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .ok()?;
        Some(Self {
            client,
            api_key,
            base_url: config.openai_base_url.clone(),
            chat_model: config.chat_model.clone(),
            check_model: config.check_model.clone(),
            tts_model: config.tts_model.clone(),
        })
    }

    fn chat(
        &self,
        model: &str,
        messages: Vec<ChatMessage>,
        temperature: f32,
    ) -> Result<String, ServiceError> {
        let url = format!("{}/chat/completions", self.base_url);
        let request = ChatCompletionRequest {
            model: model.to_string(),
            messages,
            temperature,
        };

        let response = self
            .client
            .post(&url)
            .header(USER_AGENT, "dictee/0.1")
            .header(CONTENT_TYPE, "application/json")
            .header(AUTHORIZATION, format!("Bearer {}", self.api_key))
            .json(&request)
            .send()
            .map_err(|e| ServiceError::Http(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().unwrap_or_default();
            let message = extract_api_error(&body).unwrap_or(body);
            error!(model, status, "chat completion failed");
            return Err(ServiceError::Api { status, message });
        }

        let body: ChatCompletionResponse = response
            .json()
            .map_err(|e| ServiceError::Malformed(e.to_string()))?;
        if let Some(usage) = &body.usage {
            info!(
                model,
                prompt_tokens = ?usage.prompt_tokens,
                completion_tokens = ?usage.completion_tokens,
                "chat completion usage"
            );
        }
        Ok(body
            .choices
            .first()
            .and_then(|c| c.message.content.clone())
            .unwrap_or_default()
            .trim()
            .to_string())
    }

    /// Short tutor feedback for a just-completed puzzle, with the session's
    /// earlier exchanges as conversational context.
    pub fn feedback(
        &self,
        prior: &[Puzzle],
        current: &Puzzle,
        science_fact: bool,
    ) -> Result<String, ServiceError> {
        let messages = feedback_messages(prior, current, science_fact);
        let start = Instant::now();
        let result = self.chat(&self.chat_model, messages, 1.0);
        info!(elapsed = ?start.elapsed(), ok = result.is_ok(), "feedback request finished");
        result
    }
}

impl GrammarCheck for OpenAi {
    /// Word-by-word verdicts from the checker model, mapped back onto the
    /// submitted text as character spans.
    fn check(&self, text: &str, _language: &str) -> Result<Vec<GrammarFinding>, ServiceError> {
        let messages = vec![
            ChatMessage::new("system", WORD_CHECK_SYSTEM),
            ChatMessage::new("user", text),
        ];
        let raw = self.chat(&self.check_model, messages, 0.2)?;
        let verdicts: Vec<WordVerdict> = serde_json::from_str(&raw)
            .map_err(|e| ServiceError::Malformed(format!("word verdicts: {e}")))?;
        verdicts_to_findings(text, &verdicts)
    }
}

impl SpeechSynth for OpenAi {
    fn synthesize(&self, text: &str, voice: Voice) -> Result<Vec<u8>, ServiceError> {
        let url = format!("{}/audio/speech", self.base_url);
        let request = SpeechRequest {
            model: self.tts_model.clone(),
            voice: voice.as_str().to_string(),
            input: text.to_string(),
        };

        let response = self
            .client
            .post(&url)
            .header(USER_AGENT, "dictee/0.1")
            .header(CONTENT_TYPE, "application/json")
            .header(AUTHORIZATION, format!("Bearer {}", self.api_key))
            .json(&request)
            .send()
            .map_err(|e| ServiceError::Http(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().unwrap_or_default();
            let message = extract_api_error(&body).unwrap_or(body);
            error!(status, "speech synthesis failed");
            return Err(ServiceError::Api { status, message });
        }

        let bytes = response
            .bytes()
            .map_err(|e| ServiceError::Http(e.to_string()))?;
        info!(voice = voice.as_str(), bytes = bytes.len(), "synthesized speech");
        Ok(bytes.to_vec())
    }
}

/// Anchor each verdict word at its next occurrence in the text, left to
/// right, and turn the incorrect ones into findings. A verdict word that
/// cannot be found means the model rewrote the input; that is an error
/// rather than a silent skip, since dropping a bad verdict could complete a
/// puzzle on a wrong guess.
fn verdicts_to_findings(
    text: &str,
    verdicts: &[WordVerdict],
) -> Result<Vec<GrammarFinding>, ServiceError> {
    let mut findings = Vec::new();
    let mut cursor = 0;

    for verdict in verdicts {
        if verdict.word.is_empty() {
            continue;
        }
        let Some(relative) = text[cursor..].find(&verdict.word) else {
            return Err(ServiceError::Malformed(format!(
                "verdict word {:?} not present in guess",
                verdict.word
            )));
        };
        let start = cursor + relative;
        if !verdict.correct {
            findings.push(GrammarFinding {
                offset: text[..start].chars().count(),
                length: verdict.word.chars().count(),
                kind: FindingKind::Grammar,
                suggestion: verdict.correction.clone().filter(|c| !c.is_empty()),
            });
        }
        cursor = start + verdict.word.len();
    }

    Ok(findings)
}

#[derive(Debug, Deserialize)]
struct WordVerdict {
    word: String,
    correct: bool,
    #[serde(default)]
    correction: Option<String>,
}

#[derive(Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
    #[serde(default)]
    usage: Option<Usage>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct Usage {
    #[serde(default)]
    prompt_tokens: Option<u32>,
    #[serde(default)]
    completion_tokens: Option<u32>,
}

#[derive(Serialize)]
struct SpeechRequest {
    model: String,
    voice: String,
    input: String,
}

/// Pull the human-readable message out of an OpenAI error body.
fn extract_api_error(body: &str) -> Option<String> {
    #[derive(Deserialize)]
    struct Wrap {
        error: Inner,
    }
    #[derive(Deserialize)]
    struct Inner {
        message: String,
    }
    serde_json::from_str::<Wrap>(body)
        .ok()
        .map(|w| w.error.message)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn verdict(word: &str, correct: bool, correction: Option<&str>) -> WordVerdict {
        WordVerdict {
            word: word.to_string(),
            correct,
            correction: correction.map(str::to_string),
        }
    }

    #[test]
    fn test_verdicts_map_to_char_spans() {
        let text = "Je va bien";
        let verdicts = vec![
            verdict("Je", true, None),
            verdict("va", false, Some("vais")),
            verdict("bien", true, None),
        ];
        let findings = verdicts_to_findings(text, &verdicts).unwrap();
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].offset, 3);
        assert_eq!(findings[0].length, 2);
        assert_eq!(findings[0].suggestion.as_deref(), Some("vais"));
    }

    #[test]
    fn test_verdict_offsets_count_chars_in_accented_text() {
        let text = "Éléonore va bien";
        let verdicts = vec![
            verdict("Éléonore", true, None),
            verdict("va", false, Some("vas")),
        ];
        let findings = verdicts_to_findings(text, &verdicts).unwrap();
        assert_eq!(findings[0].offset, 9);
    }

    #[test]
    fn test_repeated_words_anchor_in_order() {
        let text = "va va va";
        let verdicts = vec![
            verdict("va", true, None),
            verdict("va", false, None),
            verdict("va", true, None),
        ];
        let findings = verdicts_to_findings(text, &verdicts).unwrap();
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].offset, 3);
    }

    #[test]
    fn test_unmatched_verdict_word_is_an_error() {
        let result = verdicts_to_findings("Je va bien", &[verdict("jamais", false, None)]);
        assert!(matches!(result, Err(ServiceError::Malformed(_))));
    }

    #[test]
    fn test_blank_correction_becomes_no_suggestion() {
        let findings = verdicts_to_findings("Je va", &[verdict("va", false, Some(""))]).unwrap();
        assert_eq!(findings[0].suggestion, None);
    }

    #[test]
    fn test_extract_api_error_message() {
        let body = r#"{"error": {"message": "Invalid API key", "type": "auth"}}"#;
        assert_eq!(extract_api_error(body).as_deref(), Some("Invalid API key"));
        assert_eq!(extract_api_error("not json"), None);
    }
}
