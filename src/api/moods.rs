use axum::Json;
use serde::Serialize;

use crate::mood::{MoodTable, RankWindow};

#[derive(Debug, Serialize)]
pub struct MoodEntry {
    pub mood: &'static str,
    pub energy_range: (f32, f32),
    pub preferred_rank_window: RankWindow,
    pub keywords: &'static [&'static str],
}

/// `GET /api/moods`
pub async fn list_moods() -> Json<Vec<MoodEntry>> {
    let table = MoodTable::global();

    Json(
        table
            .policies()
            .iter()
            .map(|policy| MoodEntry {
                mood: policy.mood,
                energy_range: policy.energy_range,
                preferred_rank_window: policy.preferred_rank_window,
                keywords: table.keywords(policy.mood),
            })
            .collect(),
    )
}
