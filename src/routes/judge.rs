use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;

use crate::auth::Identity;
use crate::db;
use crate::error::ApiError;
use crate::judging::annotation::{AnnotationDraft, AnnotationRequest};
use crate::judging::queue::select_next;
use crate::judging::review::{ReviewDraft, ReviewRequest};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct NextQuery {
    pub category: Option<String>,
    pub after: Option<String>,
}

pub async fn next_submission(
    State(state): State<Arc<AppState>>,
    identity: Identity,
    Query(query): Query<NextQuery>,
) -> Result<Json<Value>, ApiError> {
    identity.require_judge()?;

    let category = match query.category.as_deref().filter(|c| !c.is_empty()) {
        Some(raw) => Some(db::Category::parse(raw).ok_or_else(|| {
            ApiError::Validation(
                "category must be ART, POETRY, FICTION, CINEMA, or MUSIC".to_string(),
            )
        })?),
        None => None,
    };
    let after = query.after.as_deref().filter(|a| !a.is_empty());

    let reviewed = db::reviewed_submission_ids(state.pool.as_ref(), &identity.id).await?;
    let page = db::pending_review_page(state.pool.as_ref(), category).await?;

    let next = select_next(page, &reviewed, after)
        .ok_or(ApiError::NotFound("No more pending items"))?;

    Ok(Json(json!({
        "submission": {
            "id": next.id,
            "title": next.title,
            "category": next.category,
            "description": next.description,
            "contentUrl": next.content_url,
            "createdAt": next.created_at,
            "author": {
                "id": next.author_id,
                "name": next.author_name(),
            },
        }
    })))
}

pub async fn create_review(
    State(state): State<Arc<AppState>>,
    identity: Identity,
    Json(request): Json<ReviewRequest>,
) -> Result<Json<Value>, ApiError> {
    identity.require_judge()?;

    let draft = ReviewDraft::validate(request)?;

    if db::get_submission(state.pool.as_ref(), &draft.submission_id)
        .await?
        .is_none()
    {
        return Err(ApiError::NotFound("Submission not found"));
    }

    let review_id = db::save_review(state.pool.as_ref(), &identity.id, &draft).await?;

    Ok(Json(json!({ "reviewId": review_id, "composite": draft.composite })))
}

pub async fn create_annotation(
    State(state): State<Arc<AppState>>,
    identity: Identity,
    Path(review_id): Path<String>,
    Json(request): Json<AnnotationRequest>,
) -> Result<Json<Value>, ApiError> {
    identity.require_judge()?;

    // ownership is settled before the payload is even looked at
    let owner = db::review_owner(state.pool.as_ref(), &review_id)
        .await?
        .ok_or(ApiError::NotFound("Review not found"))?;
    if owner != identity.id {
        return Err(ApiError::Forbidden(
            "Forbidden: cannot add annotations to other judges' reviews",
        ));
    }

    let draft = AnnotationDraft::validate(request)?;
    let id = db::create_annotation(state.pool.as_ref(), &review_id, &draft).await?;

    Ok(Json(json!({ "ok": true, "id": id })))
}

pub async fn submission_detail(
    State(state): State<Arc<AppState>>,
    identity: Identity,
    Path(submission_id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    identity.require_judge()?;

    let submission = db::get_submission_with_author(state.pool.as_ref(), &submission_id)
        .await?
        .ok_or(ApiError::NotFound("Not found"))?;

    Ok(Json(json!({
        "id": submission.id,
        "title": submission.title,
        "category": submission.category,
        "description": submission.description,
        "contentUrl": submission.content_url,
        "createdAt": submission.created_at,
        "author": {
            "id": submission.author_id,
            "name": submission.author_name(),
        },
        "status": submission.status,
    })))
}
