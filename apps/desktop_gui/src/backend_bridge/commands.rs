//! Backend commands queued from UI to backend worker.

use std::path::PathBuf;

use shared::domain::{NoteId, SubjectId};
use shared::protocol::NotesQuery;

pub enum BackendCommand {
    Login {
        server_url: String,
        email: String,
        password: String,
    },
    FetchNotes {
        query: NotesQuery,
    },
    SubmitRating {
        note_id: NoteId,
        score: u8,
    },
    UploadNote {
        title: String,
        description: String,
        subject_id: SubjectId,
        semester: u8,
        file_path: PathBuf,
    },
    DeleteNote {
        note_id: NoteId,
    },
    DownloadNote {
        note_id: NoteId,
        file_name: String,
    },
    FetchThumbnail {
        note_id: NoteId,
        url: String,
    },
}
