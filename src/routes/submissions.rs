use axum::extract::{Path, State};
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;

use crate::auth::{Identity, OptionalIdentity};
use crate::db::{self, author_label, Category, Submission};
use crate::error::ApiError;
use crate::state::AppState;

const SNIPPET_CHARS: usize = 600;

pub async fn pending_submissions(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Value>, ApiError> {
    let rows = db::list_pending_submissions(state.pool.as_ref()).await?;

    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(5))
        .build()
        .ok();

    let mut formatted = Vec::with_capacity(rows.len());
    for submission in rows {
        let snippet = match (&client, submission.category) {
            (Some(client), Category::Fiction | Category::Poetry) => {
                fetch_snippet(client, &submission.content_url).await
            }
            _ => None,
        };

        formatted.push(json!({
            "id": submission.id,
            "title": submission.title,
            "category": submission.category,
            "contentUrl": submission.content_url,
            "description": submission.description,
            "createdAt": submission.created_at,
            "authorName": submission.author_name(),
            "snippet": snippet,
        }));
    }

    Ok(Json(Value::Array(formatted)))
}

// A failed fetch degrades to no snippet; the listing itself never errors on
// a missing or unreachable content URL.
async fn fetch_snippet(client: &reqwest::Client, url: &str) -> Option<String> {
    let body = client.get(url).send().await.ok()?.text().await.ok()?;
    Some(body.chars().take(SNIPPET_CHARS).collect())
}

pub async fn my_submissions(
    State(state): State<Arc<AppState>>,
    identity: Identity,
) -> Result<Json<Vec<Submission>>, ApiError> {
    let rows = db::submissions_by_author(state.pool.as_ref(), &identity.id).await?;
    Ok(Json(rows))
}

pub async fn submission_detail(
    State(state): State<Arc<AppState>>,
    OptionalIdentity(identity): OptionalIdentity,
    Path(submission_id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let submission = db::get_submission_with_author(state.pool.as_ref(), &submission_id)
        .await?
        .ok_or(ApiError::NotFound("Not found"))?;

    let comments = db::list_comments(state.pool.as_ref(), &submission.id).await?;
    let applause_count = db::applause_count(state.pool.as_ref(), &submission.id).await?;
    let has_applauded = match &identity {
        Some(user) => db::has_applauded(state.pool.as_ref(), &submission.id, &user.id).await?,
        None => false,
    };

    Ok(Json(json!({
        "id": submission.id,
        "title": submission.title,
        "slug": submission.slug,
        "category": submission.category,
        "status": submission.status,
        "description": submission.description,
        "contentUrl": submission.content_url,
        "wordCount": submission.word_count,
        "durationSec": submission.duration_sec,
        "artistBio": submission.artist_bio,
        "createdAt": submission.created_at,
        "author": {
            "id": submission.author_id,
            "displayName": submission.author_display_name,
            "email": submission.author_email,
        },
        "applauseCount": applause_count,
        "hasApplauded": has_applauded,
        "comments": comments
            .iter()
            .map(|comment| json!({
                "id": comment.id,
                "content": comment.content,
                "createdAt": comment.created_at,
                "authorName": comment.author_name(),
            }))
            .collect::<Vec<_>>(),
    })))
}

#[derive(Debug, Deserialize)]
pub struct CommentBody {
    pub content: Option<String>,
}

pub async fn post_comment(
    State(state): State<Arc<AppState>>,
    identity: Identity,
    Path(submission_id): Path<String>,
    Json(body): Json<CommentBody>,
) -> Result<Json<Value>, ApiError> {
    let content = body.content.unwrap_or_default().trim().to_string();
    if content.is_empty() {
        return Err(ApiError::Validation("Comment cannot be empty.".to_string()));
    }

    db::get_submission(state.pool.as_ref(), &submission_id)
        .await?
        .ok_or(ApiError::NotFound("Submission not found."))?;

    let comment =
        db::create_comment(state.pool.as_ref(), &submission_id, &identity.id, &content).await?;

    Ok(Json(json!({
        "id": comment.id,
        "content": comment.content,
        "createdAt": comment.created_at,
        "authorName": comment.author_name(),
    })))
}

pub async fn applaud(
    State(state): State<Arc<AppState>>,
    identity: Identity,
    Path(submission_id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    db::get_submission(state.pool.as_ref(), &submission_id)
        .await?
        .ok_or(ApiError::NotFound("Submission not found."))?;

    let (applause_count, has_applauded) =
        db::toggle_applause(state.pool.as_ref(), &submission_id, &identity.id).await?;

    Ok(Json(json!({
        "applauseCount": applause_count,
        "hasApplauded": has_applauded,
    })))
}

pub async fn review_for_submission(
    State(state): State<Arc<AppState>>,
    Path(submission_id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let review = db::first_review_for_submission(state.pool.as_ref(), &submission_id)
        .await?
        .ok_or(ApiError::NotFound("Review not found"))?;

    Ok(Json(json!({
        "id": review.id,
        "submissionTitle": review.submission_title,
        "submissionCategory": review.submission_category,
        "judgeName": author_label(
            review.judge_display_name.as_deref(),
            review.judge_email.as_deref(),
        ),
        "overallType": review.overall_type,
        "overallText": review.overall_text,
        "overallMediaUrl": review.overall_media_url,
        "overallMediaSec": review.overall_media_sec,
        "voice": review.voice,
        "craft": review.craft,
        "clarity": review.clarity,
        "affect": review.affect,
        "composite": review.composite,
        "createdAt": review.created_at,
    })))
}
