use std::collections::HashMap;
use std::ops::Range;

use once_cell::sync::Lazy;
use serde::Serialize;

pub const NEUTRAL_MOOD: &str = "neutral";

/// Keywords used when a mood has no entry of its own.
pub const DEFAULT_KEYWORDS: &[&str] = &["music", "popular"];

/// Half-open slice `[start, end)` of positions in the ranked history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RankWindow {
    pub start: usize,
    pub end: usize,
}

impl RankWindow {
    pub const fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn indices(&self) -> Range<usize> {
        self.start..self.end.max(self.start)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MoodPolicy {
    pub mood: &'static str,
    /// Declared target energy. Selection is positional and does not filter on it.
    pub energy_range: (f32, f32),
    pub preferred_rank_window: RankWindow,
}

const fn policy(mood: &'static str, energy: (f32, f32), window: (usize, usize)) -> MoodPolicy {
    MoodPolicy {
        mood,
        energy_range: energy,
        preferred_rank_window: RankWindow::new(window.0, window.1),
    }
}

const POLICIES: &[MoodPolicy] = &[
    policy("happy", (0.6, 1.0), (0, 50)),
    policy("sad", (0.0, 0.4), (20, 70)),
    policy("angry", (0.7, 1.0), (0, 40)),
    policy("neutral", (0.3, 0.7), (10, 60)),
    policy("surprised", (0.6, 0.9), (30, 80)),
    policy("fear", (0.2, 0.5), (40, 90)),
    policy("disgust", (0.5, 0.8), (50, 100)),
    policy("excited", (0.8, 1.0), (0, 30)),
    policy("confident", (0.6, 0.9), (0, 40)),
    policy("motivated", (0.7, 1.0), (10, 50)),
    policy("dancing", (0.7, 1.0), (0, 40)),
    policy("romantic", (0.2, 0.6), (20, 70)),
    policy("peaceful", (0.0, 0.3), (30, 80)),
    policy("energetic", (0.8, 1.0), (0, 30)),
    policy("melancholic", (0.1, 0.4), (40, 90)),
    policy("playful", (0.5, 0.8), (10, 60)),
];

const KEYWORDS: &[(&str, &[&str])] = &[
    ("happy", &["happy", "upbeat", "cheerful", "joyful", "positive"]),
    ("sad", &["sad", "melancholy", "emotional", "heartbreak", "blues"]),
    ("angry", &["aggressive", "intense", "powerful", "rage", "fierce"]),
    ("neutral", &["chill", "calm", "relaxing", "ambient", "peaceful"]),
    ("surprised", &["energetic", "exciting", "dynamic", "unpredictable"]),
    ("fear", &["dark", "mysterious", "atmospheric", "suspense"]),
    ("disgust", &["edgy", "alternative", "raw", "gritty"]),
    ("excited", &["party", "celebration", "energetic", "upbeat", "hype"]),
    ("confident", &["powerful", "bold", "strong", "confident", "badass"]),
    ("motivated", &["motivational", "inspiring", "epic", "workout", "determined"]),
    ("dancing", &["dance", "party", "club", "groove", "rhythmic"]),
    ("romantic", &["romantic", "love", "dreamy", "passion", "intimate"]),
    ("peaceful", &["peaceful", "calm", "serene", "meditation", "soothing"]),
    ("energetic", &["energetic", "pump", "hype", "adrenaline", "power"]),
    ("melancholic", &["melancholic", "nostalgic", "bittersweet", "longing"]),
    ("playful", &["playful", "fun", "lighthearted", "quirky", "bouncy"]),
];

static BUILTIN: Lazy<MoodTable> = Lazy::new(MoodTable::builtin);

/// Immutable mood lookup: selection policy and search keywords per mood.
#[derive(Debug)]
pub struct MoodTable {
    policies: Vec<MoodPolicy>,
    by_mood: HashMap<&'static str, usize>,
    keywords: HashMap<&'static str, &'static [&'static str]>,
}

impl MoodTable {
    /// The process-wide table, built on first use.
    pub fn global() -> &'static MoodTable {
        &BUILTIN
    }

    fn builtin() -> Self {
        let policies = POLICIES.to_vec();
        let by_mood = policies
            .iter()
            .enumerate()
            .map(|(i, p)| (p.mood, i))
            .collect();
        let keywords = KEYWORDS.iter().copied().collect();

        Self {
            policies,
            by_mood,
            keywords,
        }
    }

    /// Policy for `mood`, or the neutral policy for unknown moods.
    pub fn policy(&self, mood: &str) -> &MoodPolicy {
        let key = normalize_mood(mood);
        let index = self
            .by_mood
            .get(key.as_str())
            .or_else(|| self.by_mood.get(NEUTRAL_MOOD))
            .copied()
            .unwrap_or(0);

        &self.policies[index]
    }

    /// Search keywords for `mood`, or [`DEFAULT_KEYWORDS`] for unknown moods.
    pub fn keywords(&self, mood: &str) -> &'static [&'static str] {
        let key = normalize_mood(mood);
        self.keywords
            .get(key.as_str())
            .copied()
            .unwrap_or(DEFAULT_KEYWORDS)
    }

    pub fn is_known(&self, mood: &str) -> bool {
        self.by_mood.contains_key(normalize_mood(mood).as_str())
    }

    /// All policies in table order.
    pub fn policies(&self) -> &[MoodPolicy] {
        &self.policies
    }
}

pub fn normalize_mood(mood: &str) -> String {
    mood.trim().to_lowercase()
}
