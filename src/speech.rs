//! Voice message ingestion
//!
//! Attachment bytes are fetched into a scratch directory, normalized to
//! 16 kHz mono PCM by an external encoder and sent to the speech-to-text
//! service. Every file a turn creates is removed when the turn ends.

mod artifacts;
mod deepgram;
mod error;
mod pipeline;
pub mod retrieval;
pub mod transcode;

pub use artifacts::ScratchFiles;
pub use deepgram::{DeepgramClient, DEFAULT_ENDPOINT as DEFAULT_DEEPGRAM_ENDPOINT};
pub use error::{PipelineError, RetrievalError, TranscodeError, TranscriptionError};
pub use pipeline::VoicePipeline;
pub use transcode::FfmpegTranscoder;
