//! Command orchestration helpers from UI actions to backend command queue.

use crossbeam_channel::{Sender, TrySendError};

use crate::backend_bridge::commands::BackendCommand;

pub fn dispatch_backend_command(
    cmd_tx: &Sender<BackendCommand>,
    cmd: BackendCommand,
    status: &mut String,
) {
    let cmd_name = match &cmd {
        BackendCommand::Login { .. } => "login",
        BackendCommand::FetchNotes { .. } => "fetch_notes",
        BackendCommand::SubmitRating { .. } => "submit_rating",
        BackendCommand::UploadNote { .. } => "upload_note",
        BackendCommand::DeleteNote { .. } => "delete_note",
        BackendCommand::DownloadNote { .. } => "download_note",
        BackendCommand::FetchThumbnail { .. } => "fetch_thumbnail",
    };

    match cmd_tx.try_send(cmd) {
        Ok(()) => tracing::debug!(command = cmd_name, "queued ui->backend command"),
        Err(TrySendError::Full(_)) => {
            *status = "UI command queue is full; please retry".to_string();
        }
        Err(TrySendError::Disconnected(_)) => {
            *status =
                "Backend command processor disconnected (possible startup/runtime failure); retry sign-in"
                    .to_string();
        }
    }
}
