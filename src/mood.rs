//! Mood score aggregation.
//!
//! One deterministic rule, applied identically regardless of which backend
//! produced the sentiment and emotion inputs: start from the neutral
//! midpoint, add the scaled sentiment polarity, add a fixed per-emotion
//! adjustment, clamp to 0..=10.

use crate::emotion::Emotion;

const BASELINE: i32 = 5;

/// Tunable constants of the mood formula. The defaults are the shipped
/// heuristic; tests and callers may substitute their own.
#[derive(Debug, Clone)]
pub struct MoodWeights {
    /// Multiplier mapping polarity [-1, 1] onto score points.
    pub sentiment_scale: f32,
    pub joy: i32,
    pub sadness: i32,
    pub anger: i32,
    pub fear: i32,
    pub surprise: i32,
    pub neutral: i32,
}

impl Default for MoodWeights {
    fn default() -> Self {
        MoodWeights {
            sentiment_scale: 5.0,
            joy: 1,
            sadness: -1,
            anger: -1,
            fear: -1,
            surprise: 0,
            neutral: 0,
        }
    }
}

impl MoodWeights {
    fn adjustment(&self, emotion: Emotion) -> i32 {
        match emotion {
            Emotion::Joy => self.joy,
            Emotion::Sadness => self.sadness,
            Emotion::Anger => self.anger,
            Emotion::Fear => self.fear,
            Emotion::Surprise => self.surprise,
            Emotion::Neutral => self.neutral,
        }
    }
}

/// Aggregate sentiment polarity and primary emotion into a 0-10 score.
pub fn mood_score(weights: &MoodWeights, polarity: f32, primary: Emotion) -> u8 {
    let sentiment_points = (polarity * weights.sentiment_scale).round() as i32;
    let score = BASELINE + sentiment_points + weights.adjustment(primary);
    score.clamp(0, 10) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_neutral_midpoint() {
        let weights = MoodWeights::default();
        assert_eq!(mood_score(&weights, 0.0, Emotion::Neutral), 5);
    }

    #[test]
    fn test_strong_positive_clamps_at_ten() {
        let weights = MoodWeights::default();
        assert_eq!(mood_score(&weights, 1.0, Emotion::Joy), 10);
    }

    #[test]
    fn test_strong_negative_clamps_at_zero() {
        let weights = MoodWeights::default();
        assert_eq!(mood_score(&weights, -1.0, Emotion::Fear), 0);
    }

    #[test]
    fn test_emotion_adjustments() {
        let weights = MoodWeights::default();
        let base = mood_score(&weights, 0.0, Emotion::Neutral);
        assert_eq!(mood_score(&weights, 0.0, Emotion::Joy), base + 1);
        assert_eq!(mood_score(&weights, 0.0, Emotion::Sadness), base - 1);
        assert_eq!(mood_score(&weights, 0.0, Emotion::Anger), base - 1);
        assert_eq!(mood_score(&weights, 0.0, Emotion::Fear), base - 1);
        assert_eq!(mood_score(&weights, 0.0, Emotion::Surprise), base);
    }

    #[test]
    fn test_deterministic() {
        let weights = MoodWeights::default();
        let a = mood_score(&weights, 0.37, Emotion::Sadness);
        let b = mood_score(&weights, 0.37, Emotion::Sadness);
        assert_eq!(a, b);
    }

    #[test]
    fn test_always_in_range() {
        let weights = MoodWeights::default();
        for polarity in [-1.0, -0.6, -0.05, 0.0, 0.05, 0.6, 1.0] {
            for emotion in Emotion::ALL {
                let score = mood_score(&weights, polarity, emotion);
                assert!(score <= 10);
            }
        }
    }

    #[test]
    fn test_custom_weights() {
        let weights = MoodWeights {
            sentiment_scale: 2.0,
            joy: 3,
            ..MoodWeights::default()
        };
        assert_eq!(mood_score(&weights, 1.0, Emotion::Joy), 10);
        assert_eq!(mood_score(&weights, 0.5, Emotion::Joy), 9);
    }
}
