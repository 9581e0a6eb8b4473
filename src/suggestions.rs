//! Coping suggestion lookup.
//!
//! A static table keyed by emotion, plus theme-keyed tips appended when the
//! entry's themes touch a recognized life domain. Output is capped and
//! never empty: the generic set is the floor for anything unrecognized.

use crate::emotion::Emotion;

pub const MAX_SUGGESTIONS: usize = 5;

/// Floor suggestions when nothing more specific applies.
const GENERIC_SUGGESTIONS: [&str; 3] = [
    "Take a few deep breaths",
    "Write down your thoughts",
    "Talk to someone you trust",
];

fn base_suggestions(emotion: Emotion) -> &'static [&'static str] {
    match emotion {
        Emotion::Joy => &[
            "Savor this moment - take a mental snapshot",
            "Share your joy with someone you care about",
            "Write down what made you happy to revisit later",
        ],
        Emotion::Sadness => &[
            "Allow yourself to feel - emotions are valid and temporary",
            "Reach out to a trusted friend or family member",
            "Get outside for 15 minutes - sunlight and fresh air help",
        ],
        Emotion::Anger => &[
            "Take a timeout before responding - count to 10 slowly",
            "Physical activity can help release tension",
            "Ask yourself: will this matter in a week? A month? A year?",
        ],
        Emotion::Fear => &[
            "Ground yourself in the present moment",
            "Practice the 5-4-3-2-1 grounding technique",
            "Break down the fear into specific, manageable concerns",
        ],
        Emotion::Surprise => &[
            "Take a moment to process what happened",
            "Write about it while it is fresh",
        ],
        Emotion::Neutral => &[
            "Check in with yourself: what do you need right now?",
            "Practice gratitude - list 3 things you're thankful for",
            "Set a small, achievable goal for today",
        ],
    }
}

struct ThemeTip {
    keywords: &'static [&'static str],
    tip: &'static str,
}

const THEME_TIPS: [ThemeTip; 3] = [
    ThemeTip {
        keywords: &["work", "job", "career", "boss", "project", "deadline"],
        tip: "Consider taking a short break from work tasks",
    },
    ThemeTip {
        keywords: &["friend", "family", "partner", "love", "relationship"],
        tip: "Reach out to someone you care about",
    },
    ThemeTip {
        keywords: &["school", "exam", "study", "grade", "class"],
        tip: "Remember that one test doesn't define you",
    },
];

/// Look up suggestions for the detected emotion, appending theme tips,
/// capped at [`MAX_SUGGESTIONS`]. Never returns an empty list.
pub fn generate_suggestions(primary: Emotion, themes: &[String]) -> Vec<String> {
    let mut suggestions: Vec<String> = base_suggestions(primary)
        .iter()
        .map(|s| s.to_string())
        .collect();

    let theme_text = themes.join(" ").to_lowercase();
    for tip in &THEME_TIPS {
        if tip.keywords.iter().any(|k| theme_text.contains(k)) {
            suggestions.push(tip.tip.to_string());
        }
    }

    suggestions.truncate(MAX_SUGGESTIONS);
    if suggestions.is_empty() {
        suggestions = GENERIC_SUGGESTIONS.iter().map(|s| s.to_string()).collect();
    }

    suggestions
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_never_empty() {
        for emotion in Emotion::ALL {
            assert!(!generate_suggestions(emotion, &[]).is_empty());
        }
    }

    #[test]
    fn test_fear_includes_grounding() {
        let suggestions = generate_suggestions(Emotion::Fear, &[]);
        assert!(suggestions.iter().any(|s| s.to_lowercase().contains("ground")));
    }

    #[test]
    fn test_work_theme_appends_tip() {
        let themes = vec!["work presentation".to_string(), "deadline".to_string()];
        let suggestions = generate_suggestions(Emotion::Fear, &themes);
        assert!(suggestions.iter().any(|s| s.contains("break from work")));
    }

    #[test]
    fn test_capped_at_max() {
        let themes = vec![
            "work deadline".to_string(),
            "family argument".to_string(),
            "exam results".to_string(),
        ];
        let suggestions = generate_suggestions(Emotion::Sadness, &themes);
        assert!(suggestions.len() <= MAX_SUGGESTIONS);
    }

    #[test]
    fn test_emotion_suggestions_come_first() {
        let themes = vec!["work".to_string()];
        let suggestions = generate_suggestions(Emotion::Anger, &themes);
        assert_eq!(suggestions[0], base_suggestions(Emotion::Anger)[0]);
    }

    #[test]
    fn test_neutral_gets_its_own_set() {
        let suggestions = generate_suggestions(Emotion::Neutral, &[]);
        assert!(suggestions.iter().any(|s| s.contains("Check in with yourself")));
    }
}
