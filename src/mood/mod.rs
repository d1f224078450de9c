pub mod labeler;
pub mod policy;

pub use labeler::{FaceSample, FixedMoodLabeler, MoodLabel, MoodLabelSource, RandomMoodLabeler};
pub use policy::{MoodPolicy, MoodTable, RankWindow, normalize_mood};

use crate::error::{AppError, Result};

const MAX_MOOD_LEN: usize = 32;

/// Validate a raw mood label and return it normalized.
///
/// Unknown but well-formed moods are accepted; lookups fall back to neutral.
pub fn parse_mood(raw: Option<&str>) -> Result<String> {
    let raw = raw.ok_or_else(|| AppError::InvalidMood("Mood is required".into()))?;
    let mood = normalize_mood(raw);

    if mood.is_empty() {
        return Err(AppError::InvalidMood("Mood is required".into()));
    }
    if mood.len() > MAX_MOOD_LEN {
        return Err(AppError::InvalidMood(format!(
            "Mood must be at most {} characters",
            MAX_MOOD_LEN
        )));
    }
    if !mood
        .chars()
        .all(|c| c.is_ascii_alphabetic() || c == '-' || c == '_')
    {
        return Err(AppError::InvalidMood(format!(
            "Mood may only contain letters, '-' and '_': {}",
            raw.trim()
        )));
    }

    Ok(mood)
}
