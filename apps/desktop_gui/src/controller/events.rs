//! UI/backend events and error modeling for desktop GUI controller.

use std::path::PathBuf;

use api_client::ClientError;
use shared::{domain::NoteId, protocol::NotesPage, ErrorCode};

use crate::ui::app::PreviewImage;

pub enum UiEvent {
    Info(String),
    LoginOk {
        username: String,
        message: String,
    },
    NotesLoaded(NotesPage),
    RatingSaved {
        note_id: NoteId,
        message: String,
        average_rating: Option<f64>,
    },
    /// The service answered HTTP 200 with `success: false`; the message is
    /// user-facing copy, not an error.
    FormRejected {
        context: UiErrorContext,
        message: String,
    },
    UploadFinished {
        message: String,
    },
    NoteDeleted {
        note_id: NoteId,
        message: String,
    },
    DownloadSaved {
        note_id: NoteId,
        path: PathBuf,
    },
    ThumbnailLoaded {
        note_id: NoteId,
        image: PreviewImage,
    },
    ThumbnailFailed {
        note_id: NoteId,
        reason: String,
    },
    Error(UiError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorCategory {
    Auth,
    Transport,
    Validation,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorContext {
    BackendStartup,
    Login,
    FetchNotes,
    SubmitRating,
    UploadNote,
    DeleteNote,
    DownloadNote,
    General,
}

pub fn classify_login_failure(message: &str) -> String {
    let lower = message.to_ascii_lowercase();
    if lower.contains("backend worker startup failure")
        || lower.contains("failed to build backend runtime")
    {
        "Backend worker startup failure; verify local app environment and retry.".to_string()
    } else if lower.contains("failed to connect")
        || lower.contains("connection refused")
        || lower.contains("dns")
        || lower.contains("timed out")
    {
        "Server unreachable; check URL/network and retry sign-in.".to_string()
    } else {
        format!("Login/API error: {message}")
    }
}

#[derive(Debug, Clone)]
pub struct UiError {
    category: UiErrorCategory,
    context: UiErrorContext,
    message: String,
}

impl UiError {
    /// Typed mapping for client failures; keyword classification is the
    /// fallback for everything that reaches us as bare text.
    pub fn from_client(context: UiErrorContext, error: &ClientError) -> Self {
        let category = match error {
            ClientError::InvalidServerUrl { .. } => UiErrorCategory::Validation,
            ClientError::Transport(_) => UiErrorCategory::Transport,
            ClientError::Api(api) => match api.code {
                ErrorCode::Unauthorized | ErrorCode::Forbidden => UiErrorCategory::Auth,
                ErrorCode::Validation | ErrorCode::TooLarge => UiErrorCategory::Validation,
                ErrorCode::NotFound | ErrorCode::Internal => UiErrorCategory::Unknown,
            },
            ClientError::Decode(_) => UiErrorCategory::Unknown,
        };
        let message = if error.is_timeout() {
            "Request timed out; the server may be busy.".to_string()
        } else {
            error.to_string()
        };
        Self {
            category,
            context,
            message,
        }
    }

    pub fn from_message(context: UiErrorContext, message: impl Into<String>) -> Self {
        let message = message.into();
        let message_lower = message.to_ascii_lowercase();
        let category = if message_lower.contains("401")
            || message_lower.contains("403")
            || message_lower.contains("unauthorized")
            || message_lower.contains("forbidden")
            || message_lower.contains("session expired")
            || message_lower.contains("please log in")
        {
            UiErrorCategory::Auth
        } else if message_lower.contains("invalid")
            || message_lower.contains("missing")
            || message_lower.contains("malformed")
        {
            UiErrorCategory::Validation
        } else if message_lower.contains("timeout")
            || message_lower.contains("timed out")
            || message_lower.contains("connection")
            || message_lower.contains("network")
            || message_lower.contains("transport")
            || message_lower.contains("unavailable")
            || message_lower.contains("disconnect")
        {
            UiErrorCategory::Transport
        } else {
            UiErrorCategory::Unknown
        };

        Self {
            category,
            context,
            message,
        }
    }

    pub fn requires_reauth(&self) -> bool {
        self.category == UiErrorCategory::Auth
    }

    pub fn category(&self) -> UiErrorCategory {
        self.category
    }

    pub fn context(&self) -> UiErrorContext {
        self.context
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}
