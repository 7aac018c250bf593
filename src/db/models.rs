use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "category", rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum Category {
    Art,
    Poetry,
    Fiction,
    Cinema,
    Music,
}

impl Category {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "ART" => Some(Category::Art),
            "POETRY" => Some(Category::Poetry),
            "FICTION" => Some(Category::Fiction),
            "CINEMA" => Some(Category::Cinema),
            "MUSIC" => Some(Category::Music),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "submission_status", rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum SubmissionStatus {
    Pending,
    Reviewed,
    Featured,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "user_role", rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    Participant,
    Judge,
    Admin,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "response_kind", rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum ResponseKind {
    Text,
    Audio,
    Video,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "anchor_kind", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AnchorKind {
    ImagePin,
    TimePoint,
    TimeRange,
    TextSpan,
}

#[derive(Debug, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
    pub id: String,
    pub title: String,
    pub slug: String,
    pub category: Category,
    pub description: Option<String>,
    pub content_url: String,
    pub author_id: String,
    pub status: SubmissionStatus,
    pub word_count: Option<i32>,
    pub duration_sec: Option<i32>,
    pub artist_bio: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow)]
pub struct SubmissionWithAuthor {
    pub id: String,
    pub title: String,
    pub slug: String,
    pub category: Category,
    pub description: Option<String>,
    pub content_url: String,
    pub author_id: String,
    pub status: SubmissionStatus,
    pub word_count: Option<i32>,
    pub duration_sec: Option<i32>,
    pub artist_bio: Option<String>,
    pub created_at: DateTime<Utc>,
    pub author_display_name: Option<String>,
    pub author_email: Option<String>,
}

impl SubmissionWithAuthor {
    pub fn author_name(&self) -> &str {
        author_label(
            self.author_display_name.as_deref(),
            self.author_email.as_deref(),
        )
    }
}

#[derive(Debug, FromRow)]
pub struct ReviewDetail {
    pub id: String,
    pub overall_type: ResponseKind,
    pub overall_text: Option<String>,
    pub overall_media_url: Option<String>,
    pub overall_media_sec: Option<i32>,
    pub voice: i32,
    pub craft: i32,
    pub clarity: i32,
    pub affect: i32,
    pub composite: f64,
    pub created_at: DateTime<Utc>,
    pub submission_title: String,
    pub submission_category: Category,
    pub judge_display_name: Option<String>,
    pub judge_email: Option<String>,
}

#[derive(Debug, FromRow)]
pub struct CommentWithAuthor {
    pub id: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub author_display_name: Option<String>,
    pub author_email: Option<String>,
}

impl CommentWithAuthor {
    pub fn author_name(&self) -> &str {
        author_label(
            self.author_display_name.as_deref(),
            self.author_email.as_deref(),
        )
    }
}

#[derive(Debug, FromRow)]
pub struct WeekDrop {
    pub id: String,
    pub title: Option<String>,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
}

#[derive(Debug, FromRow)]
pub struct FeaturedEntry {
    pub id: String,
    pub rank: Option<i32>,
    pub submission_id: String,
    pub title: String,
    pub category: Category,
    pub content_url: String,
}

pub fn author_label<'a>(display_name: Option<&'a str>, email: Option<&'a str>) -> &'a str {
    display_name
        .filter(|name| !name.is_empty())
        .or_else(|| email.filter(|email| !email.is_empty()))
        .unwrap_or("Anonymous")
}
