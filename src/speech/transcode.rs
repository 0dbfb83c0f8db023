//! Audio normalization through an external encoder process

use super::TranscodeError;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;

/// Outputs below this size are treated as corrupt or empty
pub const MIN_OUTPUT_BYTES: u64 = 1000;

/// Fixed encoder profile: overwrite, 16-bit linear PCM, 16 kHz, mono
const PROFILE: [&str; 6] = ["-acodec", "pcm_s16le", "-ar", "16000", "-ac", "1"];

/// Transcoded output path for a raw input: `<input>.wav`
pub fn output_path(input: &Path) -> PathBuf {
    let mut path = OsString::from(input.as_os_str());
    path.push(".wav");
    PathBuf::from(path)
}

/// Check that the encoder left a plausible file behind; returns its size
pub async fn verify_output(path: &Path, min_bytes: u64) -> Result<u64, TranscodeError> {
    let metadata = tokio::fs::metadata(path)
        .await
        .map_err(|_| TranscodeError::MissingOutput {
            path: path.display().to_string(),
        })?;
    let size = metadata.len();
    if size < min_bytes {
        return Err(TranscodeError::TooSmall {
            path: path.display().to_string(),
            size,
            min: min_bytes,
        });
    }
    Ok(size)
}

/// ffmpeg-compatible encoder invoked as a subprocess
#[derive(Debug, Clone)]
pub struct FfmpegTranscoder {
    binary: String,
    min_output_bytes: u64,
}

impl FfmpegTranscoder {
    pub fn new(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
            min_output_bytes: MIN_OUTPUT_BYTES,
        }
    }

    pub async fn transcode(&self, input: &Path, output: &Path) -> Result<u64, TranscodeError> {
        let program = which::which(&self.binary).map_err(|e| TranscodeError::EncoderUnavailable {
            binary: self.binary.clone(),
            reason: e.to_string(),
        })?;

        let result = Command::new(program)
            .arg("-y")
            .arg("-i")
            .arg(input)
            .args(PROFILE)
            .arg(output)
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(TranscodeError::Spawn)?;

        if !result.status.success() {
            let mut combined = String::from_utf8_lossy(&result.stdout).into_owned();
            combined.push_str(&String::from_utf8_lossy(&result.stderr));
            return Err(TranscodeError::Failed {
                status: result.status.to_string(),
                output: combined,
            });
        }

        let size = verify_output(output, self.min_output_bytes).await?;
        tracing::debug!(output = %output.display(), size, "Transcoded audio");
        Ok(size)
    }
}
