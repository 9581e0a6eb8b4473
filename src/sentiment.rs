//! Sentiment scoring.
//!
//! Two backends behind one type: the hosted model on the ML sidecar, and a
//! builtin lexicon scorer used when no sidecar is configured or a call
//! fails. Both normalize to a signed polarity in [-1, 1] with a label
//! derived by thresholding, so downstream consumers never see which path
//! produced the result.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::warn;
use utoipa::ToSchema;

use crate::ml::SidecarClient;

/// Polarity above which text is labeled POSITIVE, below the negation
/// of which NEGATIVE.
pub const LABEL_THRESHOLD: f32 = 0.05;

static POSITIVE_WORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    vec![
        "good", "great", "excellent", "amazing", "wonderful", "fantastic", "happy",
        "happier", "joy", "joyful", "love", "loved", "loving", "excited", "exciting",
        "grateful", "thankful", "blessed", "proud", "hopeful", "optimistic", "calm",
        "peaceful", "relaxed", "content", "cheerful", "delighted", "thrilled", "glad",
        "confident", "energized", "accomplished", "refreshed", "inspired", "motivated",
        "beautiful", "perfect", "better", "best", "awesome", "pleasant", "satisfying",
        "satisfied", "fun", "laughed", "smiled", "success", "successful",
    ]
    .into_iter()
    .collect()
});

static NEGATIVE_WORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    vec![
        "bad", "terrible", "awful", "horrible", "worst", "worse", "sad", "unhappy",
        "depressed", "depressing", "miserable", "lonely", "angry", "mad", "furious",
        "annoyed", "irritated", "frustrated", "frustrating", "anxious", "anxiety",
        "worried", "worry", "nervous", "scared", "afraid", "terrified", "fear",
        "panic", "stressed", "stressful", "overwhelmed", "exhausted", "tired",
        "hopeless", "helpless", "hurt", "crying", "cried", "grief", "heartbroken",
        "hate", "hated", "upset", "dread", "guilty", "ashamed", "failure", "failed",
        "wrong", "empty",
    ]
    .into_iter()
    .collect()
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum SentimentLabel {
    Positive,
    Negative,
    Neutral,
}

impl SentimentLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            SentimentLabel::Positive => "POSITIVE",
            SentimentLabel::Negative => "NEGATIVE",
            SentimentLabel::Neutral => "NEUTRAL",
        }
    }
}

/// Normalized sentiment: signed polarity in [-1, 1] plus the thresholded label.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SentimentResult {
    pub label: SentimentLabel,
    pub score: f32,
}

impl SentimentResult {
    fn from_polarity(polarity: f32) -> Self {
        let polarity = polarity.clamp(-1.0, 1.0);
        SentimentResult {
            label: label_for(polarity),
            score: polarity,
        }
    }
}

/// Derive the label from polarity. Used identically on both backends.
pub fn label_for(polarity: f32) -> SentimentLabel {
    if polarity > LABEL_THRESHOLD {
        SentimentLabel::Positive
    } else if polarity < -LABEL_THRESHOLD {
        SentimentLabel::Negative
    } else {
        SentimentLabel::Neutral
    }
}

/// Compound polarity from the builtin lexicon: the balance of positive vs
/// negative word hits, 0 when the text carries no sentiment words.
pub fn lexicon_polarity(text: &str) -> f32 {
    let lowered = text.to_lowercase();
    let words: Vec<&str> = lowered
        .split(|c: char| !c.is_alphabetic())
        .filter(|w| w.len() > 2)
        .collect();

    let positive = words.iter().filter(|w| POSITIVE_WORDS.contains(*w)).count() as f32;
    let negative = words.iter().filter(|w| NEGATIVE_WORDS.contains(*w)).count() as f32;
    let total = positive + negative;

    if total == 0.0 {
        return 0.0;
    }

    (positive - negative) / total
}

/// Sentiment backend, selected once at construction.
pub enum SentimentScorer {
    /// Hosted classifier on the ML sidecar, with the lexicon as a per-call
    /// safety net.
    Sidecar(SidecarClient),
    /// Builtin lexicon scorer.
    Lexicon,
}

impl SentimentScorer {
    /// Score text, returning the normalized result and the name of the
    /// backend that actually produced it.
    pub async fn score(&self, text: &str) -> (SentimentResult, &'static str) {
        match self {
            SentimentScorer::Sidecar(client) => match client.sentiment(text).await {
                Ok(remote) => {
                    let polarity = match remote.label.to_uppercase().as_str() {
                        "POSITIVE" => remote.confidence,
                        "NEGATIVE" => -remote.confidence,
                        _ => 0.0,
                    };
                    (SentimentResult::from_polarity(polarity), "sidecar")
                }
                Err(e) => {
                    warn!("sentiment sidecar unavailable, using lexicon: {e}");
                    (SentimentResult::from_polarity(lexicon_polarity(text)), "lexicon")
                }
            },
            SentimentScorer::Lexicon => {
                (SentimentResult::from_polarity(lexicon_polarity(text)), "lexicon")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lexicon_positive() {
        let polarity = lexicon_polarity("I feel great and excited today!");
        assert!(polarity > LABEL_THRESHOLD);
        assert_eq!(label_for(polarity), SentimentLabel::Positive);
    }

    #[test]
    fn test_lexicon_negative() {
        let polarity = lexicon_polarity("I am terrified and anxious about tomorrow");
        assert!(polarity < -LABEL_THRESHOLD);
        assert_eq!(label_for(polarity), SentimentLabel::Negative);
    }

    #[test]
    fn test_lexicon_neutral_without_sentiment_words() {
        let polarity = lexicon_polarity("I went to the store and bought vegetables.");
        assert_eq!(polarity, 0.0);
        assert_eq!(label_for(polarity), SentimentLabel::Neutral);
    }

    #[test]
    fn test_lexicon_mixed_balances_out() {
        let polarity = lexicon_polarity("Work was terrible but the evening was wonderful.");
        assert_eq!(label_for(polarity), SentimentLabel::Neutral);
    }

    #[test]
    fn test_polarity_stays_in_range() {
        for text in [
            "happy happy happy happy joy joy joy",
            "awful awful terrible horrible worst",
            "",
        ] {
            let p = lexicon_polarity(text);
            assert!((-1.0..=1.0).contains(&p), "polarity {p} out of range");
        }
    }

    #[test]
    fn test_threshold_boundaries() {
        assert_eq!(label_for(0.05), SentimentLabel::Neutral);
        assert_eq!(label_for(0.051), SentimentLabel::Positive);
        assert_eq!(label_for(-0.05), SentimentLabel::Neutral);
        assert_eq!(label_for(-0.051), SentimentLabel::Negative);
    }

    #[tokio::test]
    async fn test_lexicon_scorer_reports_backend() {
        let scorer = SentimentScorer::Lexicon;
        let (result, method) = scorer.score("I am so happy and grateful").await;
        assert_eq!(method, "lexicon");
        assert_eq!(result.label, SentimentLabel::Positive);
        assert!(result.score > 0.0);
    }

    #[tokio::test]
    async fn test_unreachable_sidecar_falls_back() {
        let scorer = SentimentScorer::Sidecar(SidecarClient::new("http://127.0.0.1:1"));
        let (result, method) = scorer.score("I feel wonderful and proud").await;
        assert_eq!(method, "lexicon");
        assert_eq!(result.label, SentimentLabel::Positive);
    }
}
