use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{NoteId, NotesSortKey, SubjectId, SubjectSummary};

/// One note as returned by the listing endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NoteSummary {
    pub note_id: NoteId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub subject_name: String,
    pub subject_code: String,
    pub semester: u8,
    pub file_name: String,
    pub file_size: u64,
    pub uploaded_at: DateTime<Utc>,
    pub download_count: u64,
    /// Rounded to one decimal by the service; 0.0 when unrated.
    pub average_rating: f64,
    pub uploader: String,
    /// Deferred thumbnail source, fetched only once the row becomes visible.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,
    /// True when the signed-in user uploaded this note.
    #[serde(default)]
    pub mine: bool,
}

/// Filters accepted by the listing endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct NotesQuery {
    /// The service filters by numeric subject id, not by code.
    pub subject_id: Option<SubjectId>,
    pub semester: Option<u8>,
    pub search: Option<String>,
    pub sort_by: NotesSortKey,
    pub page: u32,
}

impl Default for NotesQuery {
    fn default() -> Self {
        Self {
            subject_id: None,
            semester: None,
            search: None,
            sort_by: NotesSortKey::default(),
            page: 1,
        }
    }
}

impl NotesQuery {
    /// Key/value pairs in the shape the endpoint's query string expects.
    /// Unset filters are omitted entirely.
    pub fn to_query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(subject) = self.subject_id {
            pairs.push(("subject", subject.0.to_string()));
        }
        if let Some(semester) = self.semester {
            pairs.push(("semester", semester.to_string()));
        }
        if let Some(search) = &self.search {
            if !search.is_empty() {
                pairs.push(("search", search.clone()));
            }
        }
        pairs.push(("sort", self.sort_by.as_query_value().to_string()));
        if self.page > 1 {
            pairs.push(("page", self.page.to_string()));
        }
        pairs
    }
}

/// One page of the notes listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotesPage {
    pub notes: Vec<NoteSummary>,
    #[serde(default)]
    pub subjects: Vec<SubjectSummary>,
    pub page: u32,
    pub pages: u32,
    pub total: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateNoteRequest {
    pub note_id: NoteId,
    pub score: u8,
}

impl RateNoteRequest {
    /// Field name/value pairs in the shape the rating endpoint's form expects.
    pub fn to_form_fields(&self) -> [(&'static str, String); 2] {
        [
            ("note_id", self.note_id.0.to_string()),
            ("score", self.score.to_string()),
        ]
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateNoteResponse {
    pub success: bool,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub average_rating: Option<f64>,
}

/// Generic JSON envelope returned by form endpoints when the request carries
/// the AJAX marker header.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormReply {
    pub success: bool,
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthReply {
    pub success: bool,
    #[serde(default)]
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<crate::domain::UserSummary>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_rating_reply_with_average() {
        let raw = r#"{"success": true, "message": "Rating submitted successfully!", "average_rating": 4.5}"#;
        let reply: RateNoteResponse = serde_json::from_str(raw).expect("decode");
        assert!(reply.success);
        assert_eq!(reply.message, "Rating submitted successfully!");
        assert_eq!(reply.average_rating, Some(4.5));
    }

    #[test]
    fn decodes_rating_reply_without_average() {
        let raw = r#"{"success": false, "message": "Please log in to rate notes."}"#;
        let reply: RateNoteResponse = serde_json::from_str(raw).expect("decode");
        assert!(!reply.success);
        assert_eq!(reply.average_rating, None);
    }

    #[test]
    fn query_pairs_omit_unset_filters() {
        let query = NotesQuery::default();
        let pairs = query.to_query_pairs();
        assert_eq!(pairs, vec![("sort", "newest".to_string())]);
    }

    #[test]
    fn rating_form_fields_are_stringly_typed() {
        let request = RateNoteRequest {
            note_id: NoteId(42),
            score: 5,
        };
        assert_eq!(
            request.to_form_fields(),
            [
                ("note_id", "42".to_string()),
                ("score", "5".to_string()),
            ]
        );
    }

    #[test]
    fn query_pairs_carry_all_filters() {
        let query = NotesQuery {
            subject_id: Some(SubjectId(4)),
            semester: Some(3),
            search: Some("laplace".to_string()),
            sort_by: NotesSortKey::Rating,
            page: 2,
        };
        let pairs = query.to_query_pairs();
        assert_eq!(
            pairs,
            vec![
                ("subject", "4".to_string()),
                ("semester", "3".to_string()),
                ("search", "laplace".to_string()),
                ("sort", "rating".to_string()),
                ("page", "2".to_string()),
            ]
        );
    }

    #[test]
    fn subject_filter_is_sent_as_the_numeric_id() {
        let query = NotesQuery {
            subject_id: Some(SubjectId(12)),
            ..NotesQuery::default()
        };
        let subject = query
            .to_query_pairs()
            .into_iter()
            .find(|(key, _)| *key == "subject")
            .map(|(_, value)| value);
        assert_eq!(subject.as_deref(), Some("12"));
    }

    #[test]
    fn decodes_note_summary_without_optional_fields() {
        let raw = r#"{
            "note_id": 7,
            "title": "Laplace transforms",
            "subject_name": "Mathematics",
            "subject_code": "MATH",
            "semester": 3,
            "file_name": "laplace.pdf",
            "file_size": 182272,
            "uploaded_at": "2024-11-02T09:30:00Z",
            "download_count": 41,
            "average_rating": 4.5,
            "uploader": "priya"
        }"#;
        let note: NoteSummary = serde_json::from_str(raw).expect("decode");
        assert_eq!(note.note_id, NoteId(7));
        assert_eq!(note.description, "");
        assert_eq!(note.thumbnail_url, None);
        assert!(!note.mine);
    }
}
