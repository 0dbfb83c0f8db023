//! Deepgram speech-to-text client

use super::TranscriptionError;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_ENDPOINT: &str = "https://api.deepgram.com/v1/listen";

/// Fixed recognition profile
const LISTEN_PARAMS: [(&str, &str); 7] = [
    ("language", "ru"),
    ("model", "nova-2"),
    ("smart_format", "true"),
    ("punctuate", "true"),
    ("detect_language", "false"),
    ("encoding", "linear16"),
    ("sample_rate", "16000"),
];

const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

pub struct DeepgramClient {
    client: Client,
    api_key: String,
    endpoint: String,
}

impl DeepgramClient {
    pub fn new(api_key: impl Into<String>, endpoint: impl Into<String>) -> Result<Self, TranscriptionError> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| TranscriptionError::Transport(format!("failed to create HTTP client: {e}")))?;
        Ok(Self {
            client,
            api_key: api_key.into(),
            endpoint: endpoint.into(),
        })
    }

    /// Transcribe a normalized (16 kHz mono PCM) audio file
    pub async fn transcribe(&self, audio: &Path) -> Result<String, TranscriptionError> {
        let bytes = tokio::fs::read(audio)
            .await
            .map_err(|source| TranscriptionError::Read {
                path: audio.display().to_string(),
                source,
            })?;
        let size = bytes.len();

        let part = Part::bytes(bytes)
            .file_name("audio.wav")
            .mime_str("audio/wav")
            .map_err(|e| TranscriptionError::Transport(e.to_string()))?;
        let form = Form::new().part("audio", part);

        let response = self
            .client
            .post(&self.endpoint)
            .query(&LISTEN_PARAMS)
            .header("Authorization", format!("Token {}", self.api_key))
            .multipart(form)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    TranscriptionError::Transport(format!("request timeout: {e}"))
                } else if e.is_connect() {
                    TranscriptionError::Transport(format!("connection failed: {e}"))
                } else {
                    TranscriptionError::Transport(format!("request failed: {e}"))
                }
            })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| TranscriptionError::Transport(format!("failed to read response: {e}")))?;

        tracing::debug!(status = %status, audio_bytes = size, body = %body, "Deepgram response");

        if status != StatusCode::OK {
            return Err(TranscriptionError::Status {
                status: status.as_u16(),
                body,
            });
        }

        parse_transcript(&body)
    }
}

/// Extract the best transcript: first channel, first alternative.
///
/// Other channels and alternatives are never consulted.
pub fn parse_transcript(body: &str) -> Result<String, TranscriptionError> {
    let response: ListenResponse =
        serde_json::from_str(body).map_err(|e| TranscriptionError::Parse(format!("{e} - body: {body}")))?;

    response
        .results
        .channels
        .into_iter()
        .next()
        .and_then(|channel| channel.alternatives.into_iter().next())
        .map(|alternative| alternative.transcript)
        .ok_or(TranscriptionError::NoTranscript)
}

// Deepgram API types

#[derive(Debug, Deserialize)]
struct ListenResponse {
    results: ListenResults,
}

#[derive(Debug, Deserialize)]
struct ListenResults {
    #[serde(default)]
    channels: Vec<Channel>,
}

#[derive(Debug, Deserialize)]
struct Channel {
    #[serde(default)]
    alternatives: Vec<Alternative>,
}

#[derive(Debug, Deserialize)]
struct Alternative {
    transcript: String,
}
