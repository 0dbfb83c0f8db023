//! Fetching voice attachments into the scratch directory

use super::RetrievalError;
use crate::runtime::Messenger;
use std::path::{Path, PathBuf};

/// Extension of the raw voice attachment (Opus in an Ogg container)
pub const RAW_EXTENSION: &str = "ogg";

/// Location of the raw attachment for one voice turn under `dir`.
///
/// The token comes from the platform; anything outside `[A-Za-z0-9_-]` is
/// replaced so it cannot escape the directory. `turn` keeps concurrent turns
/// over the same attachment, or over tokens that sanitize alike, apart.
pub fn raw_path(dir: &Path, attachment: &str, turn: &str) -> PathBuf {
    let token: String = attachment
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();
    let token = if token.is_empty() {
        "attachment".to_string()
    } else {
        token
    };
    dir.join(format!("{token}-{turn}.{RAW_EXTENSION}"))
}

/// Fresh identifier for one voice turn's scratch files
pub fn new_turn_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}

/// Download an attachment and write it to `dest`, creating the parent
/// directory if needed. Returns the number of bytes written.
///
/// On failure a partial file may be left behind; removing it is up to the
/// caller.
pub async fn retrieve<M>(messenger: &M, attachment: &str, dest: &Path) -> Result<u64, RetrievalError>
where
    M: Messenger + ?Sized,
{
    let write_error = |source| RetrievalError::Write {
        path: dest.display().to_string(),
        source,
    };

    if let Some(dir) = dest.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(dir).await.map_err(write_error)?;
    }

    let bytes = messenger.fetch_attachment(attachment).await?;
    tokio::fs::write(dest, &bytes).await.map_err(write_error)?;
    Ok(bytes.len() as u64)
}
