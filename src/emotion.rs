//! Emotion classification over a fixed six-label set.
//!
//! Primary path is the multi-class model on the ML sidecar; the builtin
//! fallback counts occurrences of emotion-associated words. Whatever the
//! path, the result always names a label from the fixed set and carries a
//! score for every label in it.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::warn;
use utoipa::ToSchema;

use crate::ml::SidecarClient;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Emotion {
    Joy,
    Sadness,
    Anger,
    Fear,
    Surprise,
    Neutral,
}

impl Emotion {
    /// Label priority order. Keyword-count ties resolve to the earliest entry.
    pub const ALL: [Emotion; 6] = [
        Emotion::Joy,
        Emotion::Sadness,
        Emotion::Anger,
        Emotion::Fear,
        Emotion::Surprise,
        Emotion::Neutral,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Emotion::Joy => "joy",
            Emotion::Sadness => "sadness",
            Emotion::Anger => "anger",
            Emotion::Fear => "fear",
            Emotion::Surprise => "surprise",
            Emotion::Neutral => "neutral",
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            Emotion::Joy => "😊",
            Emotion::Sadness => "😢",
            Emotion::Anger => "😠",
            Emotion::Fear => "😨",
            Emotion::Surprise => "😲",
            Emotion::Neutral => "😐",
        }
    }

    fn keywords(&self) -> &'static [&'static str] {
        match self {
            Emotion::Joy => &[
                "happy", "joy", "joyful", "excited", "thrilled", "delighted", "glad",
                "cheerful", "grateful", "wonderful", "amazing", "great", "love", "loved",
                "proud", "hopeful", "fantastic", "blessed", "fun",
            ],
            Emotion::Sadness => &[
                "sad", "unhappy", "depressed", "down", "miserable", "lonely", "crying",
                "cried", "heartbroken", "grief", "gloomy", "hopeless", "hurt", "empty",
                "disappointed",
            ],
            Emotion::Anger => &[
                "angry", "mad", "furious", "annoyed", "irritated", "frustrated", "rage",
                "resentful", "hate", "outraged", "bitter",
            ],
            Emotion::Fear => &[
                "afraid", "scared", "terrified", "anxious", "worried", "nervous",
                "panic", "fearful", "dread", "uneasy", "frightened", "stressed",
                "overwhelmed",
            ],
            Emotion::Surprise => &[
                "surprised", "shocked", "astonished", "stunned", "unexpected",
                "startled", "amazed",
            ],
            Emotion::Neutral => &[],
        }
    }

    /// Canonicalize a free-form model label into the fixed set. Hosted
    /// models use a wider vocabulary (e.g. "happy", "anxious", "calm").
    pub fn from_label(label: &str) -> Option<Emotion> {
        match label.to_lowercase().as_str() {
            "joy" | "happy" | "happiness" | "excited" => Some(Emotion::Joy),
            "sadness" | "sad" | "grief" => Some(Emotion::Sadness),
            "anger" | "angry" => Some(Emotion::Anger),
            "fear" | "anxious" | "anxiety" | "scared" => Some(Emotion::Fear),
            "surprise" | "surprised" => Some(Emotion::Surprise),
            "neutral" | "calm" => Some(Emotion::Neutral),
            _ => None,
        }
    }
}

/// Classification outcome. `emotion_scores` covers every label in the fixed
/// set, zero-filled where a path produced no score.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct EmotionResult {
    pub primary_emotion: Emotion,
    pub emotion_scores: BTreeMap<String, f32>,
    pub emoji: String,
}

impl EmotionResult {
    fn new(primary: Emotion, mut scores: BTreeMap<String, f32>) -> Self {
        for emotion in Emotion::ALL {
            scores.entry(emotion.as_str().to_string()).or_insert(0.0);
        }
        EmotionResult {
            primary_emotion: primary,
            emoji: primary.emoji().to_string(),
            emotion_scores: scores,
        }
    }

    fn neutral() -> Self {
        EmotionResult::new(Emotion::Neutral, BTreeMap::new())
    }
}

/// Count keyword hits per label; argmax with ties resolved by label
/// priority, neutral when nothing matches.
pub fn keyword_classify(text: &str) -> EmotionResult {
    let lowered = text.to_lowercase();
    let words: Vec<&str> = lowered
        .split(|c: char| !c.is_alphabetic())
        .filter(|w| !w.is_empty())
        .collect();

    let mut counts: Vec<(Emotion, usize)> = Vec::with_capacity(Emotion::ALL.len());
    for emotion in Emotion::ALL {
        let count = words
            .iter()
            .filter(|w| emotion.keywords().contains(*w))
            .count();
        counts.push((emotion, count));
    }

    let total: usize = counts.iter().map(|(_, c)| c).sum();
    if total == 0 {
        return EmotionResult::neutral();
    }

    let mut primary = Emotion::Neutral;
    let mut best = 0usize;
    let mut scores = BTreeMap::new();
    for (emotion, count) in counts {
        if count > 0 {
            scores.insert(
                emotion.as_str().to_string(),
                count as f32 / total as f32,
            );
        }
        // Strictly-greater keeps the earlier label on ties.
        if count > best {
            best = count;
            primary = emotion;
        }
    }

    EmotionResult::new(primary, scores)
}

/// Emotion backend, selected once at construction.
pub enum EmotionClassifier {
    Sidecar(SidecarClient),
    Keyword,
}

impl EmotionClassifier {
    pub async fn classify(&self, text: &str) -> (EmotionResult, &'static str) {
        match self {
            EmotionClassifier::Sidecar(client) => match client.emotion(text).await {
                Ok(remote) => {
                    let mut scores = BTreeMap::new();
                    for (label, score) in &remote.emotion_scores {
                        if let Some(emotion) = Emotion::from_label(label) {
                            let entry =
                                scores.entry(emotion.as_str().to_string()).or_insert(0.0);
                            *entry = f32::max(*entry, score.clamp(0.0, 1.0));
                        }
                    }
                    let primary =
                        Emotion::from_label(&remote.primary_emotion).unwrap_or(Emotion::Neutral);
                    (EmotionResult::new(primary, scores), "sidecar")
                }
                Err(e) => {
                    warn!("emotion sidecar unavailable, using keywords: {e}");
                    (keyword_classify(text), "keyword")
                }
            },
            EmotionClassifier::Keyword => (keyword_classify(text), "keyword"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_joy() {
        let result = keyword_classify("I feel great and excited today!");
        assert_eq!(result.primary_emotion, Emotion::Joy);
        assert_eq!(result.emoji, "😊");
    }

    #[test]
    fn test_keyword_fear() {
        let result = keyword_classify("I am terrified and anxious about tomorrow");
        assert_eq!(result.primary_emotion, Emotion::Fear);
        assert!(result.emotion_scores["fear"] > 0.0);
    }

    #[test]
    fn test_no_keywords_is_neutral_with_zero_scores() {
        let result = keyword_classify("The meeting is scheduled for three o'clock.");
        assert_eq!(result.primary_emotion, Emotion::Neutral);
        assert!(result.emotion_scores.values().all(|s| *s == 0.0));
    }

    #[test]
    fn test_score_map_covers_every_label() {
        for text in ["so happy today", "completely neutral sentence here"] {
            let result = keyword_classify(text);
            for emotion in Emotion::ALL {
                assert!(
                    result.emotion_scores.contains_key(emotion.as_str()),
                    "missing score for {}",
                    emotion.as_str()
                );
            }
        }
    }

    #[test]
    fn test_tie_breaks_by_priority_order() {
        // One joy word, one sadness word: joy comes first in the label set.
        let result = keyword_classify("happy but also sad");
        assert_eq!(result.primary_emotion, Emotion::Joy);
    }

    #[test]
    fn test_scores_are_confidences() {
        let result = keyword_classify("angry angry sad");
        assert!((result.emotion_scores["anger"] - 2.0 / 3.0).abs() < 1e-6);
        assert!((result.emotion_scores["sadness"] - 1.0 / 3.0).abs() < 1e-6);
        assert!(result.emotion_scores.values().all(|s| (0.0..=1.0).contains(s)));
    }

    #[test]
    fn test_label_canonicalization() {
        assert_eq!(Emotion::from_label("Happy"), Some(Emotion::Joy));
        assert_eq!(Emotion::from_label("anxious"), Some(Emotion::Fear));
        assert_eq!(Emotion::from_label("calm"), Some(Emotion::Neutral));
        assert_eq!(Emotion::from_label("bewilderment"), None);
    }

    #[tokio::test]
    async fn test_unreachable_sidecar_falls_back() {
        let classifier = EmotionClassifier::Sidecar(SidecarClient::new("http://127.0.0.1:1"));
        let (result, method) = classifier.classify("I am scared of the exam").await;
        assert_eq!(method, "keyword");
        assert_eq!(result.primary_emotion, Emotion::Fear);
    }
}
