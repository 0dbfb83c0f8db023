//! Voice pipeline error types

use thiserror::Error;

/// Failure to fetch or store a voice attachment
#[derive(Debug, Error)]
pub enum RetrievalError {
    #[error("attachment request failed: {0}")]
    Network(String),
    #[error("attachment request returned HTTP {status}: {body}")]
    Status { status: u16, body: String },
    #[error("failed to store attachment at {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Failure to normalize audio with the external encoder
#[derive(Debug, Error)]
pub enum TranscodeError {
    #[error("encoder {binary} not available: {reason}")]
    EncoderUnavailable { binary: String, reason: String },
    #[error("failed to run encoder: {0}")]
    Spawn(#[source] std::io::Error),
    #[error("encoder exited with {status}: {output}")]
    Failed { status: String, output: String },
    #[error("encoder produced no output at {path}")]
    MissingOutput { path: String },
    #[error("encoder output {path} too small ({size} bytes, need {min}), likely invalid")]
    TooSmall { path: String, size: u64, min: u64 },
}

/// Failure to obtain a transcript from the speech-to-text service
#[derive(Debug, Error)]
pub enum TranscriptionError {
    #[error("failed to read audio {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("transcription request failed: {0}")]
    Transport(String),
    #[error("transcription service returned HTTP {status}: {body}")]
    Status { status: u16, body: String },
    #[error("unparsable transcription response: {0}")]
    Parse(String),
    #[error("no transcript in response")]
    NoTranscript,
}

/// Any failure that aborts a voice turn
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Retrieval(#[from] RetrievalError),
    #[error(transparent)]
    Transcode(#[from] TranscodeError),
    #[error(transparent)]
    Transcription(#[from] TranscriptionError),
}

impl PipelineError {
    /// Pipeline step that failed, for logging
    pub fn stage(&self) -> &'static str {
        match self {
            PipelineError::Retrieval(_) => "retrieval",
            PipelineError::Transcode(_) => "transcode",
            PipelineError::Transcription(_) => "transcription",
        }
    }
}
