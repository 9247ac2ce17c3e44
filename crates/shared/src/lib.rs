//! Wire-level types shared by the NotesDesk client crates: domain ids,
//! listing/rating payloads, and the service error envelope.

pub mod domain;
pub mod error;
pub mod protocol;

pub use domain::{NoteId, NotesSortKey, SubjectId, UserId};
pub use error::{ApiError, ApiException, ErrorCode};
