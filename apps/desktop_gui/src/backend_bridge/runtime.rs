//! Runtime bridge between UI command queue and backend event intake.
//!
//! One worker thread owns the tokio runtime and the [`NotesClient`]; commands
//! arrive over a bounded channel and every outcome goes back as a [`UiEvent`].
//! The UI thread never blocks on the network.

use std::thread;

use api_client::{FilePart, NoteUpload, NotesClient};
use crossbeam_channel::{Receiver, Sender};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::{classify_login_failure, UiError, UiErrorContext, UiEvent};
use crate::ui::app::decode_preview_image;

pub fn launch(cmd_rx: Receiver<BackendCommand>, ui_tx: Sender<UiEvent>) {
    thread::spawn(move || {
        let _ = ui_tx.try_send(UiEvent::Info("Backend worker starting...".to_string()));
        let runtime = match tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
        {
            Ok(runtime) => runtime,
            Err(err) => {
                let _ = ui_tx.try_send(UiEvent::Error(UiError::from_message(
                    UiErrorContext::BackendStartup,
                    format!("backend worker startup failure: failed to build runtime: {err}"),
                )));
                tracing::error!("failed to build backend runtime: {err}");
                return;
            }
        };

        runtime.block_on(async move {
            let mut client: Option<NotesClient> = None;
            let _ = ui_tx.try_send(UiEvent::Info("Backend worker ready".to_string()));

            while let Ok(cmd) = cmd_rx.recv() {
                match cmd {
                    BackendCommand::Login {
                        server_url,
                        email,
                        password,
                    } => {
                        tracing::info!("backend: login");
                        let fresh = match NotesClient::new(&server_url) {
                            Ok(fresh) => fresh,
                            Err(err) => {
                                let _ = ui_tx.try_send(UiEvent::Error(UiError::from_message(
                                    UiErrorContext::Login,
                                    classify_login_failure(&err.to_string()),
                                )));
                                continue;
                            }
                        };

                        match fresh.login(&email, &password).await {
                            Ok(reply) if reply.success => {
                                let username = reply
                                    .user
                                    .map(|user| user.username)
                                    .unwrap_or_else(|| email.clone());
                                client = Some(fresh);
                                let _ = ui_tx.try_send(UiEvent::LoginOk {
                                    username,
                                    message: reply.message,
                                });
                            }
                            Ok(reply) => {
                                let _ = ui_tx.try_send(UiEvent::Error(UiError::from_message(
                                    UiErrorContext::Login,
                                    reply.message,
                                )));
                            }
                            Err(err) => {
                                tracing::error!("backend: login failed: {err}");
                                let _ = ui_tx.try_send(UiEvent::Error(UiError::from_message(
                                    UiErrorContext::Login,
                                    classify_login_failure(&err.to_string()),
                                )));
                            }
                        }
                    }
                    BackendCommand::FetchNotes { query } => {
                        tracing::info!(page = query.page, "backend: fetch_notes");
                        let Some(client) = client.as_ref() else {
                            let _ = not_signed_in(&ui_tx, UiErrorContext::FetchNotes);
                            continue;
                        };
                        match client.fetch_notes(&query).await {
                            Ok(page) => {
                                let _ = ui_tx.try_send(UiEvent::NotesLoaded(page));
                            }
                            Err(err) => {
                                tracing::error!("backend: fetch_notes failed: {err}");
                                let _ = ui_tx.try_send(UiEvent::Error(UiError::from_client(
                                    UiErrorContext::FetchNotes,
                                    &err,
                                )));
                            }
                        }
                    }
                    BackendCommand::SubmitRating { note_id, score } => {
                        tracing::info!(note_id = note_id.0, score, "backend: submit_rating");
                        let Some(client) = client.as_ref() else {
                            let _ = not_signed_in(&ui_tx, UiErrorContext::SubmitRating);
                            continue;
                        };
                        match client.rate_note(note_id, score).await {
                            Ok(reply) if reply.success => {
                                let _ = ui_tx.try_send(UiEvent::RatingSaved {
                                    note_id,
                                    message: reply.message,
                                    average_rating: reply.average_rating,
                                });
                            }
                            Ok(reply) => {
                                let _ = ui_tx.try_send(UiEvent::FormRejected {
                                    context: UiErrorContext::SubmitRating,
                                    message: reply.message,
                                });
                            }
                            Err(err) => {
                                let _ = ui_tx.try_send(UiEvent::Error(UiError::from_client(
                                    UiErrorContext::SubmitRating,
                                    &err,
                                )));
                            }
                        }
                    }
                    BackendCommand::UploadNote {
                        title,
                        description,
                        subject_id,
                        semester,
                        file_path,
                    } => {
                        tracing::info!(file = %file_path.display(), "backend: upload_note");
                        let Some(client) = client.as_ref() else {
                            let _ = not_signed_in(&ui_tx, UiErrorContext::UploadNote);
                            continue;
                        };
                        let file_name = file_path
                            .file_name()
                            .and_then(|name| name.to_str())
                            .unwrap_or("note.bin")
                            .to_string();
                        let bytes = match tokio::fs::read(&file_path).await {
                            Ok(bytes) => bytes,
                            Err(err) => {
                                let _ = ui_tx.try_send(UiEvent::Error(UiError::from_message(
                                    UiErrorContext::UploadNote,
                                    format!("Failed to read file: {err}"),
                                )));
                                continue;
                            }
                        };
                        let mime_type = mime_guess::from_path(&file_path)
                            .first_raw()
                            .map(str::to_string);
                        let upload = NoteUpload {
                            title,
                            description,
                            subject_id,
                            semester,
                            file: FilePart {
                                field_name: "file".to_string(),
                                file_name,
                                mime_type,
                                bytes,
                            },
                        };
                        match client.upload_note(upload).await {
                            Ok(reply) if reply.success => {
                                let _ = ui_tx.try_send(UiEvent::UploadFinished {
                                    message: reply.message,
                                });
                            }
                            Ok(reply) => {
                                let _ = ui_tx.try_send(UiEvent::FormRejected {
                                    context: UiErrorContext::UploadNote,
                                    message: reply.message,
                                });
                            }
                            Err(err) => {
                                tracing::error!("backend: upload_note failed: {err}");
                                let _ = ui_tx.try_send(UiEvent::Error(UiError::from_client(
                                    UiErrorContext::UploadNote,
                                    &err,
                                )));
                            }
                        }
                    }
                    BackendCommand::DeleteNote { note_id } => {
                        tracing::info!(note_id = note_id.0, "backend: delete_note");
                        let Some(client) = client.as_ref() else {
                            let _ = not_signed_in(&ui_tx, UiErrorContext::DeleteNote);
                            continue;
                        };
                        match client.delete_note(note_id).await {
                            Ok(reply) if reply.success => {
                                let _ = ui_tx.try_send(UiEvent::NoteDeleted {
                                    note_id,
                                    message: reply.message,
                                });
                            }
                            Ok(reply) => {
                                let _ = ui_tx.try_send(UiEvent::FormRejected {
                                    context: UiErrorContext::DeleteNote,
                                    message: reply.message,
                                });
                            }
                            Err(err) => {
                                let _ = ui_tx.try_send(UiEvent::Error(UiError::from_client(
                                    UiErrorContext::DeleteNote,
                                    &err,
                                )));
                            }
                        }
                    }
                    BackendCommand::DownloadNote { note_id, file_name } => {
                        tracing::info!(note_id = note_id.0, "backend: download_note");
                        let Some(client) = client.as_ref() else {
                            let _ = not_signed_in(&ui_tx, UiErrorContext::DownloadNote);
                            continue;
                        };
                        match client.download_note(note_id).await {
                            Ok(download) => {
                                let file_name = download.file_name.unwrap_or(file_name);
                                let mut dialog = rfd::FileDialog::new().set_file_name(&file_name);
                                if let Some(dir) = dirs::download_dir() {
                                    dialog = dialog.set_directory(dir);
                                }
                                if let Some(path) = dialog.save_file() {
                                    match tokio::fs::write(&path, download.bytes).await {
                                        Ok(()) => {
                                            let _ = ui_tx.try_send(UiEvent::DownloadSaved {
                                                note_id,
                                                path,
                                            });
                                        }
                                        Err(err) => {
                                            let _ = ui_tx.try_send(UiEvent::Error(
                                                UiError::from_message(
                                                    UiErrorContext::DownloadNote,
                                                    format!("Failed to save note file: {err}"),
                                                ),
                                            ));
                                        }
                                    }
                                }
                            }
                            Err(err) => {
                                tracing::error!("backend: download_note failed: {err}");
                                let _ = ui_tx.try_send(UiEvent::Error(UiError::from_client(
                                    UiErrorContext::DownloadNote,
                                    &err,
                                )));
                            }
                        }
                    }
                    BackendCommand::FetchThumbnail { note_id, url } => {
                        tracing::info!(note_id = note_id.0, "backend: fetch_thumbnail");
                        let Some(client) = client.as_ref() else {
                            let _ = not_signed_in(&ui_tx, UiErrorContext::General);
                            continue;
                        };
                        match client.fetch_preview(&url).await {
                            Ok(bytes) => match decode_preview_image(&bytes) {
                                Ok(image) => {
                                    let _ = ui_tx
                                        .try_send(UiEvent::ThumbnailLoaded { note_id, image });
                                }
                                Err(reason) => {
                                    let _ = ui_tx
                                        .try_send(UiEvent::ThumbnailFailed { note_id, reason });
                                }
                            },
                            Err(err) => {
                                let _ = ui_tx.try_send(UiEvent::ThumbnailFailed {
                                    note_id,
                                    reason: format!("Failed to fetch thumbnail: {err}"),
                                });
                            }
                        }
                    }
                }
            }
        });
    });
}

fn not_signed_in(
    ui_tx: &Sender<UiEvent>,
    context: UiErrorContext,
) -> Result<(), crossbeam_channel::TrySendError<UiEvent>> {
    ui_tx.try_send(UiEvent::Error(UiError::from_message(
        context,
        "Not signed in; connect to a server first.",
    )))
}
