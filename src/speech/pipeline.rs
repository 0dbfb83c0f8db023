//! Voice turn: retrieve, transcode, transcribe

use super::retrieval::{new_turn_id, raw_path, retrieve};
use super::transcode::output_path;
use super::{PipelineError, ScratchFiles};
use crate::runtime::{Messenger, Transcoder, Transcriber};
use std::path::PathBuf;
use std::sync::Arc;

/// Turns a voice attachment into text.
///
/// Shared by every chat; holds no per-turn state.
pub struct VoicePipeline {
    messenger: Arc<dyn Messenger>,
    transcoder: Arc<dyn Transcoder>,
    transcriber: Arc<dyn Transcriber>,
    scratch_dir: PathBuf,
}

impl VoicePipeline {
    pub fn new(
        messenger: Arc<dyn Messenger>,
        transcoder: Arc<dyn Transcoder>,
        transcriber: Arc<dyn Transcriber>,
        scratch_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            messenger,
            transcoder,
            transcriber,
            scratch_dir: scratch_dir.into(),
        }
    }

    pub fn scratch_dir(&self) -> &std::path::Path {
        &self.scratch_dir
    }

    /// Run the whole pipeline for one attachment.
    ///
    /// Both artifacts are named uniquely for this call, registered before
    /// they are created and removed when this returns, whatever the outcome. A failed step stops the
    /// pipeline; nothing is retried.
    pub async fn transcribe(&self, attachment: &str) -> Result<String, PipelineError> {
        let mut scratch = ScratchFiles::new();

        let raw = scratch.track(raw_path(&self.scratch_dir, attachment, &new_turn_id()));
        let fetched = retrieve(self.messenger.as_ref(), attachment, &raw).await?;
        tracing::debug!(attachment, bytes = fetched, path = %raw.display(), "Fetched voice attachment");

        let wav = scratch.track(output_path(&raw));
        let size = self.transcoder.transcode(&raw, &wav).await?;
        tracing::debug!(attachment, bytes = size, "Transcoded voice attachment");

        let transcript = self.transcriber.transcribe(&wav).await?;
        tracing::info!(attachment, chars = transcript.chars().count(), "Transcribed voice message");

        Ok(transcript)
    }
}
