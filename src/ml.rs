//! Client for the optional ML sidecar.
//!
//! The sidecar hosts the heavyweight sentiment/emotion models (and Whisper
//! transcription) behind a small HTTP API. It is entirely optional: when it
//! is not configured or a call fails, the builtin lexicon/keyword
//! classifiers take over.

use anyhow::{anyhow, Result};
use serde::Deserialize;
use std::time::Duration;

/// Raw sentiment prediction from the sidecar: a label plus a confidence
/// in [0, 1].
#[derive(Debug, Deserialize)]
pub struct RemoteSentiment {
    pub label: String,
    pub confidence: f32,
}

/// Raw emotion prediction from the sidecar: argmax label plus the full
/// class distribution.
#[derive(Debug, Deserialize)]
pub struct RemoteEmotion {
    pub primary_emotion: String,
    pub emotion_scores: std::collections::HashMap<String, f32>,
}

#[derive(Debug, Deserialize)]
struct TranscriptResponse {
    transcript: String,
}

/// Thin reqwest wrapper around the sidecar endpoints.
#[derive(Debug, Clone)]
pub struct SidecarClient {
    base_url: String,
    client: reqwest::Client,
}

impl SidecarClient {
    pub fn new(base_url: &str) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .unwrap_or_default();

        SidecarClient {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn sentiment(&self, text: &str) -> Result<RemoteSentiment> {
        let res = self
            .client
            .post(format!("{}/ml/sentiment", self.base_url))
            .json(&serde_json::json!({ "text": text }))
            .send()
            .await?;

        if !res.status().is_success() {
            return Err(anyhow!("sidecar sentiment request failed: {}", res.status()));
        }

        Ok(res.json::<RemoteSentiment>().await?)
    }

    pub async fn emotion(&self, text: &str) -> Result<RemoteEmotion> {
        let res = self
            .client
            .post(format!("{}/ml/emotion", self.base_url))
            .json(&serde_json::json!({ "text": text }))
            .send()
            .await?;

        if !res.status().is_success() {
            return Err(anyhow!("sidecar emotion request failed: {}", res.status()));
        }

        Ok(res.json::<RemoteEmotion>().await?)
    }

    /// Transcribe an audio file. The sidecar runs Whisper; we only ship bytes.
    pub async fn transcribe(&self, file_name: &str, bytes: Vec<u8>) -> Result<String> {
        let res = self
            .client
            .post(format!("{}/ml/transcribe", self.base_url))
            .query(&[("file_name", file_name)])
            .header("content-type", "application/octet-stream")
            .body(bytes)
            .send()
            .await?;

        if !res.status().is_success() {
            return Err(anyhow!("sidecar transcribe request failed: {}", res.status()));
        }

        Ok(res.json::<TranscriptResponse>().await?.transcript)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let client = SidecarClient::new("http://localhost:8001/");
        assert_eq!(client.base_url(), "http://localhost:8001");
    }
}
