//! Theme extraction via RAKE-style keyword ranking.
//!
//! Candidate phrases are stop-word-delimited runs of content words. Each
//! word gets a degree/frequency score from document co-occurrence and a
//! phrase scores the sum of its member words. Top phrases, case-folded and
//! deduplicated, become the entry's themes.

use once_cell::sync::Lazy;
use std::collections::{HashMap, HashSet};

pub const DEFAULT_TOP_N: usize = 5;

/// Phrases at or below this many characters are discarded as noise.
const MIN_PHRASE_CHARS: usize = 3;

static STOP_WORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    vec![
        "a", "an", "the", "and", "or", "but", "if", "then", "else", "when", "while",
        "in", "on", "at", "to", "for", "of", "with", "by", "from", "as", "into",
        "about", "after", "before", "between", "during", "through", "over", "under",
        "is", "am", "are", "was", "were", "be", "been", "being", "have", "has", "had",
        "do", "does", "did", "will", "would", "could", "should", "may", "might",
        "must", "can", "shall", "it", "its", "this", "that", "these", "those", "i",
        "me", "my", "mine", "you", "your", "he", "him", "his", "she", "her", "we",
        "us", "our", "they", "them", "their", "what", "which", "who", "whom", "whose",
        "why", "how", "all", "any", "each", "every", "both", "few", "more", "most",
        "other", "some", "such", "no", "nor", "not", "only", "own", "same", "so",
        "than", "too", "very", "just", "also", "now", "here", "there", "up", "down",
        "out", "off", "again", "once", "because", "until", "against", "feel",
        "feeling", "felt", "today", "yesterday", "tomorrow", "really", "got", "get",
    ]
    .into_iter()
    .collect()
});

fn is_stop_word(word: &str) -> bool {
    STOP_WORDS.contains(word) || word.len() <= 1
}

/// Break text into stop-word-delimited candidate phrases. Sentence
/// punctuation also delimits, so phrases never span clause boundaries.
fn candidate_phrases(text: &str) -> Vec<Vec<String>> {
    let mut phrases = Vec::new();
    let mut current: Vec<String> = Vec::new();

    for raw in text.split(|c: char| !c.is_alphanumeric() && c != '\'') {
        let word = raw.trim_matches('\'').to_lowercase();
        if word.is_empty() || is_stop_word(&word) {
            if !current.is_empty() {
                phrases.push(std::mem::take(&mut current));
            }
            continue;
        }
        current.push(word);
    }
    if !current.is_empty() {
        phrases.push(current);
    }

    phrases
}

/// Extract the top-N themes, most relevant first.
pub fn extract_themes(text: &str, top_n: usize) -> Vec<String> {
    let phrases = candidate_phrases(text);
    if phrases.is_empty() {
        return Vec::new();
    }

    // Word frequency and degree over all candidate phrases.
    let mut frequency: HashMap<&str, f32> = HashMap::new();
    let mut degree: HashMap<&str, f32> = HashMap::new();
    for phrase in &phrases {
        for word in phrase {
            *frequency.entry(word).or_insert(0.0) += 1.0;
            *degree.entry(word).or_insert(0.0) += (phrase.len() - 1) as f32;
        }
    }

    let word_score = |word: &str| -> f32 {
        let freq = frequency[word];
        (freq + degree[word]) / freq
    };

    let mut scored: Vec<(String, f32)> = phrases
        .iter()
        .map(|phrase| {
            let score = phrase.iter().map(|w| word_score(w)).sum();
            (phrase.join(" "), score)
        })
        .filter(|(phrase, _)| phrase.len() > MIN_PHRASE_CHARS)
        .collect();

    // Highest score first; equal scores keep document order.
    scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

    let mut seen = HashSet::new();
    let mut themes = Vec::with_capacity(top_n);
    for (phrase, _) in scored {
        if !seen.insert(phrase.clone()) {
            continue;
        }
        themes.push(phrase);
        if themes.len() == top_n {
            break;
        }
    }

    themes
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extracts_work_themes() {
        let text = "I had a difficult day at work today. My boss was very demanding \
                    and I felt overwhelmed by all the client projects.";
        let themes = extract_themes(text, DEFAULT_TOP_N);
        assert!(!themes.is_empty());
        assert!(themes.len() <= DEFAULT_TOP_N);
        assert!(themes
            .iter()
            .any(|t| t.contains("work") || t.contains("project")));
    }

    #[test]
    fn test_multiword_phrases_rank_above_single_words() {
        let text = "The quarterly budget review was long. Budget talks again tomorrow.";
        let themes = extract_themes(text, DEFAULT_TOP_N);
        assert_eq!(themes[0], "quarterly budget review");
    }

    #[test]
    fn test_stop_words_only_yields_empty() {
        assert!(extract_themes("and then I was just so very", DEFAULT_TOP_N).is_empty());
        assert!(extract_themes("", DEFAULT_TOP_N).is_empty());
    }

    #[test]
    fn test_case_insensitive_dedup() {
        let text = "Budget meeting. BUDGET MEETING. Budget Meeting again.";
        let themes = extract_themes(text, DEFAULT_TOP_N);
        let meeting_count = themes.iter().filter(|t| t.contains("budget")).count();
        assert_eq!(meeting_count, 1);
    }

    #[test]
    fn test_short_fragments_dropped() {
        // "ok" survives stop-word filtering but is too short to be a theme.
        let themes = extract_themes("ok", DEFAULT_TOP_N);
        assert!(themes.is_empty());
    }

    #[test]
    fn test_respects_top_n() {
        let text = "gym session, grocery shopping, tax paperwork, garden weeding, \
                    piano practice, bike repair, meal prep";
        let themes = extract_themes(text, 3);
        assert_eq!(themes.len(), 3);
    }
}
