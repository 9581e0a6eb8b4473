//! Emotional analysis pipeline.
//!
//! The [`Analyzer`] composes the sentiment scorer, emotion classifier,
//! theme extractor, mood aggregator and suggestion engine into a single
//! `analyze` entry point. It fails only on structurally invalid input;
//! every downstream failure is absorbed by the corresponding fallback, so
//! callers always receive a fully populated [`AnalysisResult`].

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use utoipa::ToSchema;

use crate::config::Settings;
use crate::emotion::{EmotionClassifier, EmotionResult};
use crate::ml::SidecarClient;
use crate::mood::{mood_score, MoodWeights};
use crate::sentiment::{SentimentResult, SentimentScorer};
use crate::suggestions::generate_suggestions;
use crate::themes::{extract_themes, DEFAULT_TOP_N};

static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("static regex"));

/// Entries shorter than this are rejected as too thin to analyze.
pub const MIN_ENTRY_CHARS: usize = 10;

/// The only error the pipeline surfaces.
#[derive(Debug, PartialEq, Eq)]
pub enum AnalyzeError {
    InvalidInput(&'static str),
}

impl std::fmt::Display for AnalyzeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AnalyzeError::InvalidInput(reason) => write!(f, "invalid input: {reason}"),
        }
    }
}

impl std::error::Error for AnalyzeError {}

/// Which backend produced each classification.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ModelsUsed {
    pub sentiment: String,
    pub emotion: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AnalysisMetadata {
    pub text_length: usize,
    pub word_count: usize,
    pub models_used: ModelsUsed,
}

/// Complete analysis of one journal entry. Every field is populated on
/// every successful call, whichever classifier paths ran.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AnalysisResult {
    pub sentiment: SentimentResult,
    pub emotion: EmotionResult,
    pub mood_score: u8,
    pub themes: Vec<String>,
    pub highlighted_phrases: HashMap<String, Vec<String>>,
    pub suggestions: Vec<String>,
    pub metadata: AnalysisMetadata,
}

/// Lowercase and collapse runs of whitespace before classification.
pub fn preprocess(text: &str) -> String {
    WHITESPACE_RE
        .replace_all(&text.to_lowercase(), " ")
        .trim()
        .to_string()
}

/// Whole-phrase matches of each theme in the raw text, up to 3 per theme.
fn highlight_phrases(text: &str, themes: &[String]) -> HashMap<String, Vec<String>> {
    let mut highlighted = HashMap::new();
    for theme in themes {
        let pattern = format!(r"(?i)\b{}\b", regex::escape(theme));
        let Ok(re) = Regex::new(&pattern) else { continue };
        let matches: Vec<String> = re
            .find_iter(text)
            .take(3)
            .map(|m| m.as_str().to_string())
            .collect();
        if !matches.is_empty() {
            highlighted.insert(theme.clone(), matches);
        }
    }
    highlighted
}

/// Analysis pipeline with its classifier backends fixed at construction.
pub struct Analyzer {
    sentiment: SentimentScorer,
    emotion: EmotionClassifier,
    weights: MoodWeights,
    max_chars: usize,
}

impl Analyzer {
    /// Build from settings: a configured sidecar URL selects the hosted
    /// classifiers, otherwise the builtin fallbacks run everything.
    pub fn from_settings(settings: &Settings) -> Self {
        match settings.ml_sidecar_url.as_deref() {
            Some(url) => {
                let client = SidecarClient::new(url);
                Analyzer {
                    sentiment: SentimentScorer::Sidecar(client.clone()),
                    emotion: EmotionClassifier::Sidecar(client),
                    weights: MoodWeights::default(),
                    max_chars: settings.max_entry_chars,
                }
            }
            None => Analyzer {
                sentiment: SentimentScorer::Lexicon,
                emotion: EmotionClassifier::Keyword,
                weights: MoodWeights::default(),
                max_chars: settings.max_entry_chars,
            },
        }
    }

    /// Builtin classifiers only. Used in tests and as the zero-config default.
    pub fn fallback_only() -> Self {
        Analyzer {
            sentiment: SentimentScorer::Lexicon,
            emotion: EmotionClassifier::Keyword,
            weights: MoodWeights::default(),
            max_chars: 10_000,
        }
    }

    pub fn sidecar_enabled(&self) -> bool {
        matches!(self.sentiment, SentimentScorer::Sidecar(_))
            || matches!(self.emotion, EmotionClassifier::Sidecar(_))
    }

    /// Run the full pipeline on one entry.
    pub async fn analyze(&self, text: &str) -> Result<AnalysisResult, AnalyzeError> {
        if text.trim().is_empty() {
            return Err(AnalyzeError::InvalidInput("text must not be empty"));
        }
        if text.trim().chars().count() < MIN_ENTRY_CHARS {
            return Err(AnalyzeError::InvalidInput("text must be at least 10 characters"));
        }
        if text.chars().count() > self.max_chars {
            return Err(AnalyzeError::InvalidInput("text exceeds the length limit"));
        }

        let cleaned = preprocess(text);

        let (sentiment, sentiment_method) = self.sentiment.score(&cleaned).await;
        let (emotion, emotion_method) = self.emotion.classify(&cleaned).await;
        let themes = extract_themes(text, DEFAULT_TOP_N);

        let mood_score = mood_score(&self.weights, sentiment.score, emotion.primary_emotion);
        let suggestions = generate_suggestions(emotion.primary_emotion, &themes);
        let highlighted_phrases = highlight_phrases(text, &themes);

        let metadata = AnalysisMetadata {
            text_length: text.chars().count(),
            word_count: text.split_whitespace().count(),
            models_used: ModelsUsed {
                sentiment: sentiment_method.to_string(),
                emotion: emotion_method.to_string(),
            },
        };

        Ok(AnalysisResult {
            sentiment,
            emotion,
            mood_score,
            themes,
            highlighted_phrases,
            suggestions,
            metadata,
        })
    }
}
