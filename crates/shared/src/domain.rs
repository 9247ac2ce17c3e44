use serde::{Deserialize, Serialize};

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub struct $name(pub i64);
    };
}

id_newtype!(UserId);
id_newtype!(NoteId);
id_newtype!(SubjectId);

/// Semester ordinal as exposed by the service, valid range 1..=8.
pub const SEMESTER_MIN: u8 = 1;
pub const SEMESTER_MAX: u8 = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum NotesSortKey {
    #[default]
    Newest,
    Downloads,
    Rating,
}

impl NotesSortKey {
    /// Query-string value understood by the listing endpoint.
    pub fn as_query_value(self) -> &'static str {
        match self {
            Self::Newest => "newest",
            Self::Downloads => "downloads",
            Self::Rating => "rating",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubjectSummary {
    pub subject_id: SubjectId,
    pub name: String,
    pub code: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserSummary {
    pub user_id: UserId,
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}
