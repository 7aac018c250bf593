use axum::extract::State;
use axum::Json;
use chrono::{DateTime, Utc};
use serde_json::{json, Value};
use std::sync::Arc;

use crate::db::{self, WeekDrop};
use crate::error::ApiError;
use crate::state::AppState;

pub async fn current_drop(State(state): State<Arc<AppState>>) -> Result<Json<Value>, ApiError> {
    let drops = db::list_drops(state.pool.as_ref()).await?;
    if drops.is_empty() {
        return Err(ApiError::NotFound("No drops yet"));
    }

    let index = active_drop_index(&drops, Utc::now());
    let current = &drops[index];
    let featured = db::featured_for_drop(state.pool.as_ref(), &current.id).await?;

    Ok(Json(json!({
        "id": current.id,
        "title": current.title,
        "startsAt": current.starts_at,
        "endsAt": current.ends_at,
        "dropNumber": index + 1,
        "featured": featured
            .iter()
            .map(|entry| json!({
                "id": entry.id,
                "rank": entry.rank,
                "submission": {
                    "id": entry.submission_id,
                    "title": entry.title,
                    "category": entry.category,
                    "contentUrl": entry.content_url,
                },
            }))
            .collect::<Vec<_>>(),
    })))
}

// The active drop is the one whose window contains `now`; when none does
// (between drops, or all in the past) the latest drop stands in.
fn active_drop_index(drops: &[WeekDrop], now: DateTime<Utc>) -> usize {
    drops
        .iter()
        .position(|drop| drop.starts_at <= now && drop.ends_at >= now)
        .unwrap_or(drops.len() - 1)
}
