//! Mood-based motivational quotes.

use axum::{extract::Query, Json};
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::emotion::Emotion;

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct Quote {
    pub text: String,
    pub author: String,
    pub emotion: Emotion,
}

#[derive(Debug, Deserialize)]
pub struct QuoteQuery {
    pub emotion: Option<String>,
}

fn quotes_for(emotion: Emotion) -> &'static [(&'static str, &'static str)] {
    match emotion {
        Emotion::Joy => &[
            ("Happiness is not by chance, but by choice.", "Jim Rohn"),
            ("The most wasted of days is one without laughter.", "E.E. Cummings"),
            ("Gratitude turns what we have into enough.", "Aesop"),
        ],
        Emotion::Sadness => &[
            ("The wound is the place where the Light enters you.", "Rumi"),
            (
                "Every day may not be good, but there's something good in every day.",
                "Alice Morse Earle",
            ),
            ("The sun will rise and we will try again.", "Twenty One Pilots"),
            ("Stars can't shine without darkness.", "Unknown"),
        ],
        Emotion::Anger => &[
            (
                "For every minute you remain angry, you give up sixty seconds of peace of mind.",
                "Ralph Waldo Emerson",
            ),
            ("The best fighter is never angry.", "Lao Tzu"),
            ("When anger rises, think of the consequences.", "Confucius"),
        ],
        Emotion::Fear => &[
            ("Fear is only as deep as the mind allows.", "Japanese Proverb"),
            (
                "Everything you've ever wanted is on the other side of fear.",
                "George Addair",
            ),
            ("Fear is a reaction. Courage is a decision.", "Winston Churchill"),
            ("Feel the fear and do it anyway.", "Susan Jeffers"),
        ],
        Emotion::Surprise => &[
            (
                "Life is full of surprises, and the best ones are the people who love you.",
                "Unknown",
            ),
            ("The moments of surprise are the ones we remember.", "Unknown"),
        ],
        Emotion::Neutral => &[
            ("The quieter you become, the more you can hear.", "Ram Dass"),
            (
                "Peace comes from within. Do not seek it without.",
                "Buddha",
            ),
            ("Wherever you are, be there totally.", "Eckhart Tolle"),
        ],
    }
}

/// Pick a random quote for the requested emotion; unknown or missing
/// labels fall back to the neutral set.
pub fn random_quote(emotion: Option<&str>) -> Quote {
    let emotion = emotion
        .and_then(Emotion::from_label)
        .unwrap_or(Emotion::Neutral);
    let pool = quotes_for(emotion);
    let (text, author) = pool
        .choose(&mut rand::thread_rng())
        .copied()
        .unwrap_or(("Take a mindful breath.", "Unknown"));

    Quote {
        text: text.to_string(),
        author: author.to_string(),
        emotion,
    }
}

pub async fn get_quote(Query(query): Query<QuoteQuery>) -> Json<Quote> {
    Json(random_quote(query.emotion.as_deref()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_emotion_has_quotes() {
        for emotion in Emotion::ALL {
            assert!(!quotes_for(emotion).is_empty());
        }
    }

    #[test]
    fn test_quote_matches_requested_emotion() {
        let quote = random_quote(Some("fear"));
        assert_eq!(quote.emotion, Emotion::Fear);
        let texts: Vec<&str> = quotes_for(Emotion::Fear).iter().map(|(t, _)| *t).collect();
        assert!(texts.contains(&quote.text.as_str()));
    }

    #[test]
    fn test_unknown_emotion_falls_back_to_neutral() {
        assert_eq!(random_quote(Some("melancholy")).emotion, Emotion::Neutral);
        assert_eq!(random_quote(None).emotion, Emotion::Neutral);
    }
}
