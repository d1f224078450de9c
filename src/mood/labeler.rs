//! Placeholder mood labeling.
//!
//! There is no trained model behind this: the label is a random pick biased by
//! face brightness, with a confidence derived from pixel variance. It lives
//! behind [`MoodLabelSource`] so callers and tests can swap in a fixed label.

use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use crate::mood::policy::NEUTRAL_MOOD;

pub const LABELS: &[&str] = &[
    "happy",
    "sad",
    "angry",
    "neutral",
    "surprised",
    "fear",
    "disgust",
    "excited",
    "confident",
    "motivated",
    "dancing",
    "romantic",
    "peaceful",
    "energetic",
    "melancholic",
    "playful",
];

pub const MIN_CONFIDENCE: f64 = 0.5;
pub const MAX_CONFIDENCE: f64 = 0.95;

const POSITIVE_HIGH: &[&str] = &["excited", "dancing", "energetic", "playful", "happy"];
const POSITIVE_CALM: &[&str] = &["confident", "motivated", "peaceful", "romantic"];
const NEUTRAL: &[&str] = &["neutral"];
const NEGATIVE: &[&str] = &["sad", "melancholic", "fear", "angry", "disgust", "surprised"];

/// Grayscale statistics of the largest detected face.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FaceSample {
    /// Mean pixel value, 0-255.
    pub brightness: f64,
    pub variance: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoodLabel {
    pub mood: String,
    pub confidence: f64,
}

pub trait MoodLabelSource: Send + Sync {
    /// `None` means no face was found.
    fn label(&self, face: Option<FaceSample>) -> MoodLabel;
}

/// Random labeler. Output is not reproducible.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomMoodLabeler;

impl MoodLabelSource for RandomMoodLabeler {
    fn label(&self, face: Option<FaceSample>) -> MoodLabel {
        let Some(face) = face else {
            return MoodLabel {
                mood: NEUTRAL_MOOD.to_string(),
                confidence: MIN_CONFIDENCE,
            };
        };

        let mut rng = rand::thread_rng();

        let categories: &[&[&str]] = if face.brightness > 130.0 {
            &[POSITIVE_HIGH, POSITIVE_CALM, POSITIVE_CALM]
        } else if face.brightness < 80.0 {
            &[NEGATIVE, NEUTRAL]
        } else {
            &[POSITIVE_CALM, NEUTRAL, POSITIVE_HIGH]
        };

        let mood = categories
            .choose(&mut rng)
            .and_then(|category| category.choose(&mut rng))
            .copied()
            .unwrap_or(NEUTRAL_MOOD);

        MoodLabel {
            mood: mood.to_string(),
            confidence: variance_confidence(face.variance),
        }
    }
}

/// Always returns the same label.
#[derive(Debug, Clone)]
pub struct FixedMoodLabeler {
    label: MoodLabel,
}

impl FixedMoodLabeler {
    pub fn new(mood: &str, confidence: f64) -> Self {
        Self {
            label: MoodLabel {
                mood: mood.to_string(),
                confidence: confidence.clamp(MIN_CONFIDENCE, MAX_CONFIDENCE),
            },
        }
    }
}

impl MoodLabelSource for FixedMoodLabeler {
    fn label(&self, _face: Option<FaceSample>) -> MoodLabel {
        self.label.clone()
    }
}

fn variance_confidence(variance: f64) -> f64 {
    let confidence = (0.65 + variance / 10_000.0).clamp(0.6, MAX_CONFIDENCE);
    (confidence * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    // Random output: only structural properties are asserted.
    #[test]
    fn test_random_label_is_known_mood_in_range() {
        let labeler = RandomMoodLabeler;
        let samples = [
            Some(FaceSample { brightness: 200.0, variance: 10.0 }),
            Some(FaceSample { brightness: 40.0, variance: 9_000.0 }),
            Some(FaceSample { brightness: 100.0, variance: 2_500.0 }),
            None,
        ];

        for _ in 0..50 {
            for sample in samples {
                let label = labeler.label(sample);
                assert!(LABELS.contains(&label.mood.as_str()), "{}", label.mood);
                assert!((MIN_CONFIDENCE..=MAX_CONFIDENCE).contains(&label.confidence));
            }
        }
    }

    #[test]
    fn test_no_face_is_neutral() {
        let label = RandomMoodLabeler.label(None);
        assert_eq!(label.mood, "neutral");
        assert_eq!(label.confidence, 0.5);
    }

    #[test]
    fn test_bright_face_never_negative() {
        let bright = FaceSample { brightness: 180.0, variance: 0.0 };
        for _ in 0..100 {
            let label = RandomMoodLabeler.label(Some(bright));
            assert!(!NEGATIVE.contains(&label.mood.as_str()));
        }
    }

    #[test]
    fn test_variance_confidence_is_clamped() {
        assert_eq!(variance_confidence(0.0), 0.65);
        assert_eq!(variance_confidence(1_000_000.0), 0.95);
        assert_eq!(variance_confidence(1_500.0), 0.8);
    }

    #[test]
    fn test_fixed_labeler() {
        let labeler = FixedMoodLabeler::new("sad", 0.85);
        assert_eq!(labeler.label(None).mood, "sad");
        assert_eq!(labeler.label(None).confidence, 0.85);
    }
}
