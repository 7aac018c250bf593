use std::collections::HashSet;

use crate::db::SubmissionWithAuthor;

// Selects the next reviewable item from a page of pending submissions already
// ordered oldest-first. Submissions the judge has reviewed are skipped. An
// `after` cursor resumes strictly past that entry; a cursor that is no longer
// in the eligible list falls back to the head.
pub fn select_next(
    page: Vec<SubmissionWithAuthor>,
    reviewed: &HashSet<String>,
    after: Option<&str>,
) -> Option<SubmissionWithAuthor> {
    let mut eligible: Vec<SubmissionWithAuthor> = page
        .into_iter()
        .filter(|submission| !reviewed.contains(&submission.id))
        .collect();

    if let Some(after) = after {
        if let Some(idx) = eligible.iter().position(|submission| submission.id == after) {
            eligible.drain(..=idx);
        }
    }

    eligible.into_iter().next()
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::db::{Category, SubmissionStatus};
    use chrono::{Duration, Utc};

    fn submission(id: &str, minutes_ago: i64) -> SubmissionWithAuthor {
        SubmissionWithAuthor {
            id: id.to_string(),
            title: format!("Entry {id}"),
            slug: format!("entry-{id}"),
            category: Category::Poetry,
            description: None,
            content_url: format!("https://cdn.example.com/{id}.txt"),
            author_id: "author-1".to_string(),
            status: SubmissionStatus::Pending,
            word_count: None,
            duration_sec: None,
            artist_bio: None,
            created_at: Utc::now() - Duration::minutes(minutes_ago),
            author_display_name: Some("June".to_string()),
            author_email: None,
        }
    }

    fn page() -> Vec<SubmissionWithAuthor> {
        vec![
            submission("a", 30),
            submission("b", 20),
            submission("c", 10),
        ]
    }

    #[test]
    fn picks_the_oldest_pending_entry() {
        let next = select_next(page(), &HashSet::new(), None).unwrap();
        assert_eq!(next.id, "a");
    }

    #[test]
    fn skips_entries_already_reviewed_by_this_judge() {
        let reviewed: HashSet<String> = ["a".to_string(), "b".to_string()].into();
        let next = select_next(page(), &reviewed, None).unwrap();
        assert_eq!(next.id, "c");
    }

    #[test]
    fn cursor_resumes_strictly_after_the_entry() {
        let next = select_next(page(), &HashSet::new(), Some("a")).unwrap();
        assert_eq!(next.id, "b");

        assert!(select_next(page(), &HashSet::new(), Some("c")).is_none());
    }

    #[test]
    fn unknown_cursor_behaves_like_no_cursor() {
        let with_cursor = select_next(page(), &HashSet::new(), Some("gone")).unwrap();
        let without = select_next(page(), &HashSet::new(), None).unwrap();
        assert_eq!(with_cursor.id, without.id);
    }

    #[test]
    fn cursor_pointing_at_a_reviewed_entry_is_treated_as_unknown() {
        // "a" is filtered out before the cursor is resolved, so the cursor no
        // longer matches and the head of the remaining list is served
        let reviewed: HashSet<String> = ["a".to_string()].into();
        let next = select_next(page(), &reviewed, Some("a")).unwrap();
        assert_eq!(next.id, "b");
    }

    #[test]
    fn empty_eligible_set_yields_nothing() {
        let reviewed: HashSet<String> =
            ["a".to_string(), "b".to_string(), "c".to_string()].into();
        assert!(select_next(page(), &reviewed, None).is_none());
        assert!(select_next(Vec::new(), &HashSet::new(), None).is_none());
    }
}
