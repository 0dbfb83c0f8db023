//! Trait abstractions for runtime I/O
//!
//! These traits enable testing the chat runtime with mock implementations.

use super::DeliveryError;
use crate::exercises::Menu;
use crate::journal::{JournalEntry, JournalError};
use crate::speech::{RetrievalError, TranscodeError, TranscriptionError};
use crate::state_machine::ChatId;
use async_trait::async_trait;
use std::path::Path;

/// Messaging platform: outbound delivery and attachment access
#[async_trait]
pub trait Messenger: Send + Sync {
    /// Deliver a text, optionally with an action menu attached
    async fn send(&self, chat_id: ChatId, text: &str, menu: Option<&Menu>) -> Result<(), DeliveryError>;

    /// Fetch the raw bytes behind an attachment reference
    async fn fetch_attachment(&self, attachment: &str) -> Result<Vec<u8>, RetrievalError>;

    /// Acknowledge a button press so the client stops its spinner
    async fn acknowledge(&self, event_id: &str) -> Result<(), DeliveryError>;
}

/// Audio normalization
#[async_trait]
pub trait Transcoder: Send + Sync {
    /// Write a normalized copy of `input` to `output`; returns its size
    async fn transcode(&self, input: &Path, output: &Path) -> Result<u64, TranscodeError>;
}

/// Speech-to-text
#[async_trait]
pub trait Transcriber: Send + Sync {
    async fn transcribe(&self, audio: &Path) -> Result<String, TranscriptionError>;
}

/// Conversation log sink
#[async_trait]
pub trait Journal: Send + Sync {
    async fn record(&self, entry: &JournalEntry) -> Result<(), JournalError>;
}

// ============================================================================
// Production Adapters
// ============================================================================

use crate::journal::FileJournal;
use crate::speech::{DeepgramClient, FfmpegTranscoder};
use crate::telegram::TelegramClient;

#[async_trait]
impl Messenger for TelegramClient {
    async fn send(&self, chat_id: ChatId, text: &str, menu: Option<&Menu>) -> Result<(), DeliveryError> {
        self.send_message(chat_id, text, menu)
            .await
            .map_err(|e| DeliveryError::new(e.to_string()))
    }

    async fn fetch_attachment(&self, attachment: &str) -> Result<Vec<u8>, RetrievalError> {
        let classify = |e: crate::telegram::TelegramError| match e.status() {
            Some(status) => RetrievalError::Status {
                status,
                body: e.to_string(),
            },
            None => RetrievalError::Network(e.to_string()),
        };

        let file_path = self.get_file(attachment).await.map_err(classify)?;
        self.download(&file_path).await.map_err(classify)
    }

    async fn acknowledge(&self, event_id: &str) -> Result<(), DeliveryError> {
        self.answer_callback_query(event_id)
            .await
            .map_err(|e| DeliveryError::new(e.to_string()))
    }
}

#[async_trait]
impl Transcoder for FfmpegTranscoder {
    async fn transcode(&self, input: &Path, output: &Path) -> Result<u64, TranscodeError> {
        FfmpegTranscoder::transcode(self, input, output).await
    }
}

#[async_trait]
impl Transcriber for DeepgramClient {
    async fn transcribe(&self, audio: &Path) -> Result<String, TranscriptionError> {
        DeepgramClient::transcribe(self, audio).await
    }
}

#[async_trait]
impl Journal for FileJournal {
    async fn record(&self, entry: &JournalEntry) -> Result<(), JournalError> {
        self.append(entry).await
    }
}
