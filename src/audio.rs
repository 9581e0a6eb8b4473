//! Audio journal handling: format validation, local storage, and optional
//! transcription through the ML sidecar.
//!
//! Transcription itself runs outside this service; without a sidecar the
//! entry is stored with a pending status and no analysis.

use anyhow::{Context, Result};
use chrono::Utc;
use std::path::{Path, PathBuf};

use crate::ml::SidecarClient;

pub const SUPPORTED_EXTENSIONS: [&str; 5] = ["mp3", "wav", "m4a", "ogg", "flac"];

pub fn is_supported_audio_format(file_name: &str) -> bool {
    Path::new(file_name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| SUPPORTED_EXTENSIONS.contains(&e.to_lowercase().as_str()))
        .unwrap_or(false)
}

/// Strip path separators and other hostile characters from a client-supplied
/// file name.
fn sanitize_file_name(file_name: &str) -> String {
    file_name
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '.' || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// Save an uploaded audio file under `<upload_dir>/audio/<user_id>/`,
/// returning the stored path.
pub fn save_audio_locally(
    upload_dir: &str,
    bytes: &[u8],
    file_name: &str,
    user_id: &str,
) -> Result<String> {
    let dir: PathBuf = [upload_dir, "audio", &sanitize_file_name(user_id)]
        .iter()
        .collect();
    std::fs::create_dir_all(&dir).context("creating upload directory")?;

    let timestamp = Utc::now().format("%Y%m%d_%H%M%S");
    let stored_name = format!("{}_{}", timestamp, sanitize_file_name(file_name));
    let path = dir.join(stored_name);

    std::fs::write(&path, bytes).context("writing audio file")?;
    Ok(path.to_string_lossy().to_string())
}

/// Transcribe when a sidecar is configured; `None` means "no transcript yet".
pub async fn transcribe_if_available(
    sidecar: Option<&SidecarClient>,
    file_name: &str,
    bytes: &[u8],
) -> Option<String> {
    let client = sidecar?;
    match client.transcribe(file_name, bytes.to_vec()).await {
        Ok(transcript) if !transcript.trim().is_empty() => Some(transcript),
        Ok(_) => None,
        Err(e) => {
            tracing::warn!("transcription unavailable: {e}");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_supported_formats() {
        assert!(is_supported_audio_format("entry.mp3"));
        assert!(is_supported_audio_format("Entry.WAV"));
        assert!(is_supported_audio_format("voice memo.m4a"));
        assert!(!is_supported_audio_format("notes.txt"));
        assert!(!is_supported_audio_format("archive.zip"));
        assert!(!is_supported_audio_format("no_extension"));
    }

    #[test]
    fn test_sanitize_file_name() {
        assert_eq!(sanitize_file_name("../../etc/passwd"), ".._.._etc_passwd");
        assert_eq!(sanitize_file_name("morning entry.mp3"), "morning_entry.mp3");
    }

    #[test]
    fn test_save_and_read_back() {
        let dir = std::env::temp_dir().join("emotion_companion_audio_test");
        let upload_dir = dir.to_string_lossy().to_string();
        let path =
            save_audio_locally(&upload_dir, b"RIFF....", "test.wav", "user-1").unwrap();
        assert!(std::fs::read(&path).unwrap().starts_with(b"RIFF"));
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[tokio::test]
    async fn test_no_sidecar_means_no_transcript() {
        assert!(transcribe_if_available(None, "a.mp3", b"bytes").await.is_none());
    }
}
