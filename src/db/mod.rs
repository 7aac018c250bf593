mod models;

pub use models::*;

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::collections::HashSet;
use std::sync::Arc;
use uuid::Uuid;

use crate::judging::annotation::AnnotationDraft;
use crate::judging::review::ReviewDraft;

pub type DbPool = Arc<PgPool>;

pub async fn create_pool(database_url: &str) -> Result<DbPool, sqlx::Error> {
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(database_url)
        .await?;

    Ok(Arc::new(pool))
}

pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}

fn new_id() -> String {
    Uuid::new_v4().to_string()
}

pub async fn get_submission(
    pool: &PgPool,
    submission_id: &str,
) -> Result<Option<Submission>, sqlx::Error> {
    sqlx::query_as::<_, Submission>("SELECT * FROM submissions WHERE id = $1")
        .bind(submission_id)
        .fetch_optional(pool)
        .await
}

pub async fn get_submission_with_author(
    pool: &PgPool,
    submission_id: &str,
) -> Result<Option<SubmissionWithAuthor>, sqlx::Error> {
    sqlx::query_as::<_, SubmissionWithAuthor>(
        r#"
        SELECT s.*, u.display_name AS author_display_name, u.email AS author_email
        FROM submissions s
        JOIN users u ON u.id = s.author_id
        WHERE s.id = $1
        "#,
    )
    .bind(submission_id)
    .fetch_optional(pool)
    .await
}

// Oldest-first page of the judge backlog; the per-judge exclusion and cursor
// are applied in judging::queue.
pub async fn pending_review_page(
    pool: &PgPool,
    category: Option<Category>,
) -> Result<Vec<SubmissionWithAuthor>, sqlx::Error> {
    sqlx::query_as::<_, SubmissionWithAuthor>(
        r#"
        SELECT s.*, u.display_name AS author_display_name, u.email AS author_email
        FROM submissions s
        JOIN users u ON u.id = s.author_id
        WHERE s.status = 'PENDING' AND ($1::category IS NULL OR s.category = $1)
        ORDER BY s.created_at ASC
        LIMIT 50
        "#,
    )
    .bind(category)
    .fetch_all(pool)
    .await
}

pub async fn list_pending_submissions(
    pool: &PgPool,
) -> Result<Vec<SubmissionWithAuthor>, sqlx::Error> {
    sqlx::query_as::<_, SubmissionWithAuthor>(
        r#"
        SELECT s.*, u.display_name AS author_display_name, u.email AS author_email
        FROM submissions s
        JOIN users u ON u.id = s.author_id
        WHERE s.status = 'PENDING'
        ORDER BY s.created_at DESC
        "#,
    )
    .fetch_all(pool)
    .await
}

pub async fn reviewed_submission_ids(
    pool: &PgPool,
    judge_id: &str,
) -> Result<HashSet<String>, sqlx::Error> {
    let ids: Vec<String> =
        sqlx::query_scalar("SELECT submission_id FROM reviews WHERE judge_id = $1")
            .bind(judge_id)
            .fetch_all(pool)
            .await?;
    Ok(ids.into_iter().collect())
}

// One review per (submission, judge): the unique constraint turns a re-submit
// into an update of the existing row, which also keeps its original id. The
// status transition rides in the same transaction so the write is
// all-or-nothing.
pub async fn save_review(
    pool: &PgPool,
    judge_id: &str,
    draft: &ReviewDraft,
) -> Result<String, sqlx::Error> {
    let overall = &draft.overall;
    let mut tx = pool.begin().await?;

    let review_id: String = sqlx::query_scalar(
        r#"
        INSERT INTO reviews
            (id, submission_id, judge_id, overall_type, overall_text,
             overall_media_url, overall_media_sec, voice, craft, clarity, affect, composite)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
        ON CONFLICT (submission_id, judge_id) DO UPDATE SET
            overall_type = EXCLUDED.overall_type,
            overall_text = EXCLUDED.overall_text,
            overall_media_url = EXCLUDED.overall_media_url,
            overall_media_sec = EXCLUDED.overall_media_sec,
            voice = EXCLUDED.voice,
            craft = EXCLUDED.craft,
            clarity = EXCLUDED.clarity,
            affect = EXCLUDED.affect,
            composite = EXCLUDED.composite
        RETURNING id
        "#,
    )
    .bind(new_id())
    .bind(&draft.submission_id)
    .bind(judge_id)
    .bind(overall.kind())
    .bind(overall.text())
    .bind(overall.media_url())
    .bind(overall.media_sec())
    .bind(draft.rubrics.voice)
    .bind(draft.rubrics.craft)
    .bind(draft.rubrics.clarity)
    .bind(draft.rubrics.affect)
    .bind(draft.composite)
    .fetch_one(&mut *tx)
    .await?;

    sqlx::query("UPDATE submissions SET status = 'REVIEWED' WHERE id = $1")
        .bind(&draft.submission_id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;
    Ok(review_id)
}

pub async fn review_owner(
    pool: &PgPool,
    review_id: &str,
) -> Result<Option<String>, sqlx::Error> {
    sqlx::query_scalar("SELECT judge_id FROM reviews WHERE id = $1")
        .bind(review_id)
        .fetch_optional(pool)
        .await
}

pub async fn create_annotation(
    pool: &PgPool,
    review_id: &str,
    draft: &AnnotationDraft,
) -> Result<String, sqlx::Error> {
    let id = new_id();
    let (x, y) = draft.anchor.pin();
    let (start_sec, end_sec) = draft.anchor.time_span();
    let (start_char, end_char) = draft.anchor.char_span();
    let response = &draft.response;

    sqlx::query(
        r#"
        INSERT INTO review_annotations
            (id, review_id, kind, x, y, start_sec, end_sec, start_char, end_char,
             response_type, response_text, response_media_url, response_media_sec)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
        "#,
    )
    .bind(&id)
    .bind(review_id)
    .bind(draft.anchor.kind())
    .bind(x)
    .bind(y)
    .bind(start_sec)
    .bind(end_sec)
    .bind(start_char)
    .bind(end_char)
    .bind(response.kind())
    .bind(response.text())
    .bind(response.media_url())
    .bind(response.media_sec())
    .execute(pool)
    .await?;

    Ok(id)
}

pub async fn submissions_by_author(
    pool: &PgPool,
    author_id: &str,
) -> Result<Vec<Submission>, sqlx::Error> {
    sqlx::query_as::<_, Submission>(
        "SELECT * FROM submissions WHERE author_id = $1 ORDER BY created_at DESC",
    )
    .bind(author_id)
    .fetch_all(pool)
    .await
}

pub async fn list_comments(
    pool: &PgPool,
    submission_id: &str,
) -> Result<Vec<CommentWithAuthor>, sqlx::Error> {
    sqlx::query_as::<_, CommentWithAuthor>(
        r#"
        SELECT c.id, c.content, c.created_at,
               u.display_name AS author_display_name, u.email AS author_email
        FROM comments c
        JOIN users u ON u.id = c.author_id
        WHERE c.submission_id = $1
        ORDER BY c.created_at ASC
        "#,
    )
    .bind(submission_id)
    .fetch_all(pool)
    .await
}

pub async fn create_comment(
    pool: &PgPool,
    submission_id: &str,
    author_id: &str,
    content: &str,
) -> Result<CommentWithAuthor, sqlx::Error> {
    let id = new_id();
    sqlx::query("INSERT INTO comments (id, submission_id, author_id, content) VALUES ($1, $2, $3, $4)")
        .bind(&id)
        .bind(submission_id)
        .bind(author_id)
        .bind(content)
        .execute(pool)
        .await?;

    sqlx::query_as::<_, CommentWithAuthor>(
        r#"
        SELECT c.id, c.content, c.created_at,
               u.display_name AS author_display_name, u.email AS author_email
        FROM comments c
        JOIN users u ON u.id = c.author_id
        WHERE c.id = $1
        "#,
    )
    .bind(&id)
    .fetch_one(pool)
    .await
}

pub async fn applause_count(pool: &PgPool, submission_id: &str) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar("SELECT COUNT(*) FROM applause WHERE submission_id = $1")
        .bind(submission_id)
        .fetch_one(pool)
        .await
}

pub async fn has_applauded(
    pool: &PgPool,
    submission_id: &str,
    user_id: &str,
) -> Result<bool, sqlx::Error> {
    sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM applause WHERE submission_id = $1 AND user_id = $2)")
        .bind(submission_id)
        .bind(user_id)
        .fetch_one(pool)
        .await
}

pub async fn toggle_applause(
    pool: &PgPool,
    submission_id: &str,
    user_id: &str,
) -> Result<(i64, bool), sqlx::Error> {
    let existing: Option<String> =
        sqlx::query_scalar("SELECT id FROM applause WHERE submission_id = $1 AND user_id = $2")
            .bind(submission_id)
            .bind(user_id)
            .fetch_optional(pool)
            .await?;

    let has_applauded = match existing {
        Some(id) => {
            sqlx::query("DELETE FROM applause WHERE id = $1")
                .bind(id)
                .execute(pool)
                .await?;
            false
        }
        None => {
            sqlx::query("INSERT INTO applause (id, submission_id, user_id) VALUES ($1, $2, $3)")
                .bind(new_id())
                .bind(submission_id)
                .bind(user_id)
                .execute(pool)
                .await?;
            true
        }
    };

    let count = applause_count(pool, submission_id).await?;
    Ok((count, has_applauded))
}

pub async fn first_review_for_submission(
    pool: &PgPool,
    submission_id: &str,
) -> Result<Option<ReviewDetail>, sqlx::Error> {
    sqlx::query_as::<_, ReviewDetail>(
        r#"
        SELECT r.*, s.title AS submission_title, s.category AS submission_category,
               j.display_name AS judge_display_name, j.email AS judge_email
        FROM reviews r
        JOIN submissions s ON s.id = r.submission_id
        JOIN users j ON j.id = r.judge_id
        WHERE r.submission_id = $1
        ORDER BY r.created_at ASC
        LIMIT 1
        "#,
    )
    .bind(submission_id)
    .fetch_optional(pool)
    .await
}

pub async fn list_drops(pool: &PgPool) -> Result<Vec<WeekDrop>, sqlx::Error> {
    sqlx::query_as::<_, WeekDrop>(
        "SELECT id, title, starts_at, ends_at FROM week_drops ORDER BY starts_at ASC",
    )
    .fetch_all(pool)
    .await
}

pub async fn featured_for_drop(
    pool: &PgPool,
    drop_id: &str,
) -> Result<Vec<FeaturedEntry>, sqlx::Error> {
    sqlx::query_as::<_, FeaturedEntry>(
        r#"
        SELECT f.id, f.rank, s.id AS submission_id, s.title, s.category, s.content_url
        FROM featured_entries f
        JOIN submissions s ON s.id = f.submission_id
        WHERE f.drop_id = $1
        ORDER BY f.rank ASC NULLS LAST
        "#,
    )
    .bind(drop_id)
    .fetch_all(pool)
    .await
}
