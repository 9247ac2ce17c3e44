//! Application shell: the connect screen, the notes browser, and the upload
//! window, all driven by the headless behavior state in `ui_core`.
//!
//! Every network interaction leaves through the backend command channel and
//! comes back as a `UiEvent`; nothing in this module blocks on I/O.

use std::collections::HashMap;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use crossbeam_channel::{Receiver, Sender};
use eframe::egui;
use egui::TextureHandle;
use serde::{Deserialize, Serialize};
use shared::{
    domain::{NoteId, NotesSortKey, SubjectId, SubjectSummary},
    protocol::{NoteSummary, NotesQuery},
};
use ui_core::{
    auto_resize_rows, copy_with_feedback, format_average, format_file_size, BackToTop, BannerStack,
    Clipboard, ClipboardError, ConfirmGuard, FieldRule, FileCandidate, FormGuard, LazyLoader,
    LazyState, NoSuggestions, PasswordVisibility, Requirement, SearchBox, Severity, SortState,
    StarRating, SubmitGuard, Theme, UploadPolicy, UploadPreview, FLASH_BANNER_TTL,
};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::{UiError, UiErrorCategory, UiErrorContext, UiEvent};
use crate::controller::orchestration::dispatch_backend_command;
use crate::ui::theme::{scaled_text_styles, visuals_for_theme, ACCENT_COLOR};
use crate::ui::widgets::{
    back_to_top_button, field_error_label, password_field, show_banner_host, sortable_header,
    star_row, upload_preview_card,
};

pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:5000";
pub const SETTINGS_STORAGE_KEY: &str = "desktop_gui.settings";

/// Command-line overrides; `None` falls back to the persisted value.
#[derive(Debug, Clone, Default)]
pub struct StartupConfig {
    pub server_url: Option<String>,
    pub email: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
enum PersistedTheme {
    Light,
    Dark,
}

impl From<Theme> for PersistedTheme {
    fn from(value: Theme) -> Self {
        match value {
            Theme::Light => Self::Light,
            Theme::Dark => Self::Dark,
        }
    }
}

impl From<PersistedTheme> for Theme {
    fn from(value: PersistedTheme) -> Self {
        match value {
            PersistedTheme::Light => Self::Light,
            PersistedTheme::Dark => Self::Dark,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PersistedDesktopSettings {
    theme: PersistedTheme,
    server_url: String,
    email: String,
    text_scale: f32,
}

impl Default for PersistedDesktopSettings {
    fn default() -> Self {
        Self {
            theme: PersistedTheme::Light,
            server_url: String::new(),
            email: String::new(),
            text_scale: 1.0,
        }
    }
}

impl PersistedDesktopSettings {
    fn into_runtime(self) -> (Theme, String, String, f32) {
        (
            self.theme.into(),
            self.server_url,
            self.email,
            self.text_scale.clamp(0.8, 1.4),
        )
    }

    fn from_runtime(theme: Theme, server_url: &str, email: &str, text_scale: f32) -> Self {
        Self {
            theme: theme.into(),
            server_url: server_url.to_string(),
            email: email.to_string(),
            text_scale: text_scale.clamp(0.8, 1.4),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AppViewState {
    Connect,
    Browse,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LoginField {
    ServerUrl,
    Email,
    Password,
}

const LOGIN_RULES: [FieldRule<LoginField>; 3] = [
    FieldRule {
        field: LoginField::ServerUrl,
        label: "Server URL",
        requirement: Requirement::HttpUrl,
    },
    FieldRule {
        field: LoginField::Email,
        label: "Email",
        requirement: Requirement::Email,
    },
    FieldRule {
        field: LoginField::Password,
        label: "Password",
        requirement: Requirement::NonEmpty,
    },
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum UploadField {
    Title,
    Description,
    Subject,
    Semester,
    File,
}

const UPLOAD_RULES: [FieldRule<UploadField>; 5] = [
    FieldRule {
        field: UploadField::Title,
        label: "Title",
        requirement: Requirement::NonEmpty,
    },
    FieldRule {
        field: UploadField::Description,
        label: "Description",
        requirement: Requirement::NonEmpty,
    },
    FieldRule {
        field: UploadField::Subject,
        label: "Subject",
        requirement: Requirement::NonEmpty,
    },
    FieldRule {
        field: UploadField::Semester,
        label: "Semester",
        requirement: Requirement::IntegerInRange { min: 1, max: 8 },
    },
    FieldRule {
        field: UploadField::File,
        label: "File",
        requirement: Requirement::NonEmpty,
    },
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NotesColumn {
    Title,
    Subject,
    Semester,
    Size,
    Downloads,
    Rating,
    Uploaded,
}

const NOTES_COLUMNS: [(&str, NotesColumn); 7] = [
    ("Title", NotesColumn::Title),
    ("Subject", NotesColumn::Subject),
    ("Sem", NotesColumn::Semester),
    ("Size", NotesColumn::Size),
    ("Downloads", NotesColumn::Downloads),
    ("Rating", NotesColumn::Rating),
    ("Uploaded", NotesColumn::Uploaded),
];

/// String sort key per column; numeric columns render as plain numbers so
/// the numeric-first comparator orders them by value.
fn sort_value(note: &NoteSummary, column: NotesColumn) -> String {
    match column {
        NotesColumn::Title => note.title.clone(),
        NotesColumn::Subject => note.subject_name.clone(),
        NotesColumn::Semester => note.semester.to_string(),
        NotesColumn::Size => note.file_size.to_string(),
        NotesColumn::Downloads => note.download_count.to_string(),
        NotesColumn::Rating => format!("{:.2}", note.average_rating),
        NotesColumn::Uploaded => note.uploaded_at.timestamp().to_string(),
    }
}

/// Decoded RGBA pixels, ready to become a texture on the UI thread.
pub struct PreviewImage {
    pub width: usize,
    pub height: usize,
    pub rgba: Vec<u8>,
}

/// A file that already passed the upload policy; bytes are read by the
/// backend worker at submit time.
struct PickedFile {
    preview: UploadPreview,
    path: PathBuf,
}

pub struct DesktopGuiApp {
    cmd_tx: Sender<BackendCommand>,
    ui_rx: Receiver<UiEvent>,

    view_state: AppViewState,

    server_url: String,
    email: String,
    password: String,
    login_form: FormGuard<LoginField>,
    login_submit: SubmitGuard,
    password_visibility: PasswordVisibility,
    login_focus: Option<LoginField>,
    login_autofocused: bool,
    login_error: Option<String>,
    logged_in_as: Option<String>,

    query: NotesQuery,
    notes: Vec<NoteSummary>,
    subjects: Vec<SubjectSummary>,
    page: u32,
    pages: u32,
    total: u32,
    notes_loading: bool,
    search_draft: String,
    search_box: SearchBox,
    sort: SortState<NotesColumn>,
    selected_note: Option<NoteId>,
    rating: StarRating,
    rating_submit: SubmitGuard,
    delete_confirm: ConfirmGuard<NoteId>,
    thumbnails: LazyLoader<NoteId>,
    thumbnail_images: HashMap<NoteId, PreviewImage>,
    thumbnail_textures: HashMap<NoteId, TextureHandle>,
    back_to_top: BackToTop,

    upload_open: bool,
    upload_title: String,
    upload_description: String,
    upload_subject: Option<SubjectId>,
    upload_semester: Option<u8>,
    upload_file: Option<PickedFile>,
    upload_policy: UploadPolicy,
    upload_form: FormGuard<UploadField>,
    upload_submit: SubmitGuard,
    upload_focus: Option<UploadField>,

    settings_open: bool,
    banners: BannerStack,
    status: String,
    theme: Theme,
    applied_theme: Option<Theme>,
    text_scale: f32,
    applied_text_scale: Option<f32>,

    tick: u64,
}

impl DesktopGuiApp {
    pub fn new(
        cmd_tx: Sender<BackendCommand>,
        ui_rx: Receiver<UiEvent>,
        persisted_settings: Option<PersistedDesktopSettings>,
        startup: StartupConfig,
    ) -> Self {
        let (theme, persisted_server, persisted_email, text_scale) =
            persisted_settings.unwrap_or_default().into_runtime();
        let server_url = startup.server_url.unwrap_or_else(|| {
            if persisted_server.is_empty() {
                DEFAULT_SERVER_URL.to_string()
            } else {
                persisted_server
            }
        });
        let email = startup.email.unwrap_or(persisted_email);

        Self {
            cmd_tx,
            ui_rx,
            view_state: AppViewState::Connect,
            server_url,
            email,
            password: String::new(),
            login_form: FormGuard::new(),
            login_submit: SubmitGuard::default(),
            password_visibility: PasswordVisibility::default(),
            login_focus: None,
            login_autofocused: false,
            login_error: None,
            logged_in_as: None,
            query: NotesQuery::default(),
            notes: Vec::new(),
            subjects: Vec::new(),
            page: 1,
            pages: 1,
            total: 0,
            notes_loading: false,
            search_draft: String::new(),
            search_box: SearchBox::new(),
            sort: SortState::new(),
            selected_note: None,
            rating: StarRating::default(),
            rating_submit: SubmitGuard::default(),
            delete_confirm: ConfirmGuard::new(),
            thumbnails: LazyLoader::new(),
            thumbnail_images: HashMap::new(),
            thumbnail_textures: HashMap::new(),
            back_to_top: BackToTop::default(),
            upload_open: false,
            upload_title: String::new(),
            upload_description: String::new(),
            upload_subject: None,
            upload_semester: None,
            upload_file: None,
            upload_policy: UploadPolicy::default(),
            upload_form: FormGuard::new(),
            upload_submit: SubmitGuard::default(),
            upload_focus: None,
            settings_open: false,
            banners: BannerStack::new(),
            status: "Not signed in".to_string(),
            theme,
            applied_theme: None,
            text_scale,
            applied_text_scale: None,
            tick: 0,
        }
    }

    fn process_ui_events(&mut self, now: Instant) {
        while let Ok(event) = self.ui_rx.try_recv() {
            match event {
                UiEvent::Info(message) => {
                    self.status = message;
                }
                UiEvent::LoginOk { username, message } => {
                    self.login_submit.finish();
                    self.login_error = None;
                    self.password.clear();
                    self.logged_in_as = Some(username);
                    self.view_state = AppViewState::Browse;
                    self.status = "Signed in".to_string();
                    self.banners
                        .push_with_ttl(Severity::Success, message, FLASH_BANNER_TTL, now);
                    self.reset_browse_state();
                    self.request_notes();
                }
                UiEvent::NotesLoaded(page) => {
                    self.notes_loading = false;
                    self.notes = page.notes;
                    self.subjects = page.subjects;
                    self.page = page.page;
                    self.pages = page.pages.max(1);
                    self.total = page.total;
                    self.reapply_column_sort();
                    self.status = format!("{} notes", self.total);
                }
                UiEvent::RatingSaved {
                    note_id,
                    message,
                    average_rating,
                } => {
                    self.rating_submit.finish();
                    if let Some(average) = average_rating {
                        if let Some(note) =
                            self.notes.iter_mut().find(|note| note.note_id == note_id)
                        {
                            note.average_rating = average;
                        }
                    }
                    self.banners.push(Severity::Success, message, now);
                }
                UiEvent::FormRejected { context, message } => {
                    self.finish_submit_for(context);
                    self.banners.push(Severity::Danger, message, now);
                }
                UiEvent::UploadFinished { message } => {
                    self.upload_submit.finish();
                    self.upload_open = false;
                    self.clear_upload_form();
                    self.banners
                        .push_with_ttl(Severity::Success, message, FLASH_BANNER_TTL, now);
                    self.request_notes();
                }
                UiEvent::NoteDeleted { note_id, message } => {
                    if self.selected_note == Some(note_id) {
                        self.selected_note = None;
                    }
                    self.banners
                        .push_with_ttl(Severity::Success, message, FLASH_BANNER_TTL, now);
                    self.request_notes();
                }
                UiEvent::DownloadSaved { note_id, path } => {
                    // The service counts the download; mirror it locally until
                    // the next listing refresh.
                    if let Some(note) = self.notes.iter_mut().find(|note| note.note_id == note_id)
                    {
                        note.download_count += 1;
                    }
                    self.banners
                        .push(Severity::Success, format!("Saved to {}", path.display()), now);
                }
                UiEvent::ThumbnailLoaded { note_id, image } => {
                    self.thumbnails.resolve_ready(note_id);
                    self.thumbnail_images.insert(note_id, image);
                }
                UiEvent::ThumbnailFailed { note_id, reason } => {
                    self.thumbnails.resolve_failed(note_id, reason);
                }
                UiEvent::Error(error) => self.handle_error(error, now),
            }
        }
    }

    fn handle_error(&mut self, error: UiError, now: Instant) {
        self.finish_submit_for(error.context());

        if error.requires_reauth() && self.view_state == AppViewState::Browse {
            self.view_state = AppViewState::Connect;
            self.logged_in_as = None;
            self.login_error =
                Some("Session expired or invalid credentials. Please sign in again.".to_string());
            self.login_focus = Some(LoginField::Password);
            self.status = format!("Authentication error: {}", error.message());
            return;
        }

        match error.context() {
            UiErrorContext::Login | UiErrorContext::BackendStartup => {
                self.login_error = Some(error.message().to_string());
                self.status = error.message().to_string();
            }
            _ => {
                self.status = format!("{} error: {}", err_label(error.category()), error.message());
                self.banners
                    .push(Severity::Danger, error.message().to_string(), now);
            }
        }
    }

    fn finish_submit_for(&mut self, context: UiErrorContext) {
        match context {
            UiErrorContext::Login => self.login_submit.finish(),
            UiErrorContext::SubmitRating => self.rating_submit.finish(),
            UiErrorContext::UploadNote => self.upload_submit.finish(),
            UiErrorContext::FetchNotes => self.notes_loading = false,
            _ => {}
        }
    }

    /// Fallback restore for submit buttons whose reply never arrived; the
    /// transport timeout normally fires first.
    fn restore_stale_submits(&mut self, now: Instant) {
        let mut restored = false;
        restored |= self.login_submit.tick(now);
        restored |= self.rating_submit.tick(now);
        restored |= self.upload_submit.tick(now);
        if restored {
            self.status = "No reply from server; controls restored".to_string();
        }
    }

    fn request_notes(&mut self) {
        self.notes_loading = true;
        dispatch_backend_command(
            &self.cmd_tx,
            BackendCommand::FetchNotes {
                query: self.query.clone(),
            },
            &mut self.status,
        );
    }

    /// Listing replies arrive in server order; if a column sort is active,
    /// re-sort the fresh page so the header state stays truthful.
    fn reapply_column_sort(&mut self) {
        if let Some((column, direction)) = self.sort.active() {
            ui_core::sort_rows(&mut self.notes, direction, |note| sort_value(note, column));
        }
    }

    fn try_login(&mut self, now: Instant) {
        let server_url = self.server_url.trim().to_string();
        let email = self.email.trim().to_string();
        let password = self.password.clone();

        let valid = self.login_form.check(&LOGIN_RULES, |field| match field {
            LoginField::ServerUrl => server_url.clone(),
            LoginField::Email => email.clone(),
            LoginField::Password => password.clone(),
        });
        if !valid {
            self.login_focus = self.login_form.take_focus();
            return;
        }
        if !self.login_submit.begin(now) {
            return;
        }

        self.login_error = None;
        dispatch_backend_command(
            &self.cmd_tx,
            BackendCommand::Login {
                server_url,
                email,
                password,
            },
            &mut self.status,
        );
    }

    fn sign_out(&mut self) {
        self.logged_in_as = None;
        self.view_state = AppViewState::Connect;
        self.login_error = None;
        self.login_autofocused = false;
        self.status = "Signed out".to_string();
    }

    fn reset_browse_state(&mut self) {
        self.query = NotesQuery::default();
        self.notes.clear();
        self.subjects.clear();
        self.page = 1;
        self.pages = 1;
        self.total = 0;
        self.search_draft.clear();
        self.search_box = SearchBox::new();
        self.sort = SortState::new();
        self.selected_note = None;
        self.rating = StarRating::default();
        self.delete_confirm = ConfirmGuard::new();
        self.thumbnails = LazyLoader::new();
        self.thumbnail_images.clear();
        self.thumbnail_textures.clear();
        self.back_to_top = BackToTop::default();
    }

    fn pick_upload_file(&mut self, now: Instant) {
        let Some(path) = rfd::FileDialog::new()
            .add_filter("Documents", &["pdf", "doc", "docx"])
            .pick_file()
        else {
            return;
        };

        let file_name = path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or("note.bin")
            .to_string();
        let size_bytes = std::fs::metadata(&path).map(|meta| meta.len()).unwrap_or(0);
        let candidate = FileCandidate {
            file_name,
            mime_type: mime_guess::from_path(&path).first_raw().map(str::to_string),
            size_bytes,
        };

        match self.upload_policy.check(&candidate) {
            Ok(preview) => {
                self.upload_file = Some(PickedFile { preview, path });
            }
            Err(rejection) => {
                // Mirror the guard behavior: reject and clear the selection.
                self.upload_file = None;
                self.banners.push(Severity::Danger, rejection.to_string(), now);
            }
        }
    }

    fn submit_upload(&mut self, now: Instant) {
        let title = self.upload_title.trim().to_string();
        let description = self.upload_description.trim().to_string();
        let subject = self.upload_subject;
        let semester = self.upload_semester;
        let file_name = self
            .upload_file
            .as_ref()
            .map(|file| file.preview.file_name.clone())
            .unwrap_or_default();

        let valid = self.upload_form.check(&UPLOAD_RULES, |field| match field {
            UploadField::Title => title.clone(),
            UploadField::Description => description.clone(),
            UploadField::Subject => subject
                .map(|subject_id| subject_id.0.to_string())
                .unwrap_or_default(),
            UploadField::Semester => semester
                .map(|semester| semester.to_string())
                .unwrap_or_default(),
            UploadField::File => file_name.clone(),
        });
        if !valid {
            self.upload_focus = self.upload_form.take_focus();
            return;
        }

        let (Some(subject_id), Some(semester), Some(file)) =
            (subject, semester, self.upload_file.as_ref())
        else {
            return;
        };
        if !self.upload_submit.begin(now) {
            return;
        }

        dispatch_backend_command(
            &self.cmd_tx,
            BackendCommand::UploadNote {
                title,
                description,
                subject_id,
                semester,
                file_path: file.path.clone(),
            },
            &mut self.status,
        );
    }

    fn clear_upload_form(&mut self) {
        self.upload_title.clear();
        self.upload_description.clear();
        self.upload_subject = None;
        self.upload_semester = None;
        self.upload_file = None;
        self.upload_form.reset();
        self.upload_focus = None;
    }

    fn apply_theme_if_needed(&mut self, ctx: &egui::Context) {
        if self.applied_theme == Some(self.theme)
            && self.applied_text_scale == Some(self.text_scale)
        {
            return;
        }

        let mut style = (*ctx.style()).clone();
        style.visuals = visuals_for_theme(self.theme);
        style.text_styles = scaled_text_styles(self.text_scale);

        // Make text inputs reliably clickable and visible:
        style.visuals.widgets.inactive.bg_stroke =
            egui::Stroke::new(1.0, style.visuals.widgets.noninteractive.bg_stroke.color);
        style.visuals.widgets.hovered.bg_stroke =
            egui::Stroke::new(1.0, style.visuals.widgets.hovered.bg_stroke.color);
        style.visuals.widgets.active.bg_stroke =
            egui::Stroke::new(1.2, style.visuals.selection.bg_fill.gamma_multiply(0.9));

        style.spacing.item_spacing = egui::vec2(8.0, 6.0);
        style.spacing.button_padding = egui::vec2(10.0, 6.0);
        style.spacing.interact_size = egui::vec2(40.0, 30.0);

        ctx.set_style(style);
        self.applied_theme = Some(self.theme);
        self.applied_text_scale = Some(self.text_scale);
    }

    fn thumbnail_texture(
        &mut self,
        ctx: &egui::Context,
        note_id: NoteId,
    ) -> Option<TextureHandle> {
        if let Some(texture) = self.thumbnail_textures.get(&note_id) {
            return Some(texture.clone());
        }
        let image = self.thumbnail_images.get(&note_id)?;
        let color_image = egui::ColorImage::from_rgba_unmultiplied(
            [image.width, image.height],
            &image.rgba,
        );
        let texture = ctx.load_texture(
            format!("note_thumbnail_{}", note_id.0),
            color_image,
            egui::TextureOptions::LINEAR,
        );
        self.thumbnail_textures.insert(note_id, texture.clone());
        Some(texture)
    }

    fn show_connect_screen(&mut self, ctx: &egui::Context, now: Instant) {
        egui::CentralPanel::default().show(ctx, |ui| {
            let avail = ui.available_size();
            let card_width = avail.x.clamp(420.0, 540.0);
            let top_space = (avail.y * 0.12).clamp(18.0, 90.0);

            ui.add_space(top_space);

            ui.vertical_centered(|ui| {
                ui.set_width(card_width);

                egui::Frame::NONE
                    .fill(ui.visuals().panel_fill)
                    .corner_radius(14.0)
                    .stroke(egui::Stroke::new(
                        1.0,
                        ui.visuals().widgets.noninteractive.bg_stroke.color,
                    ))
                    .inner_margin(egui::Margin::symmetric(20, 18))
                    .show(ui, |ui| {
                        ui.style_mut().spacing.item_spacing = egui::vec2(10.0, 10.0);

                        ui.horizontal(|ui| {
                            ui.label(egui::RichText::new("📚").size(24.0));
                            ui.vertical(|ui| {
                                ui.heading("NotesDesk");
                                ui.weak("Sign in to browse and share course notes.");
                            });
                        });

                        ui.add_space(4.0);
                        if let Some(error) = self.login_error.clone() {
                            egui::Frame::NONE
                                .fill(egui::Color32::from_rgb(111, 53, 53))
                                .stroke(egui::Stroke::new(
                                    1.0,
                                    egui::Color32::from_rgb(175, 96, 96),
                                ))
                                .corner_radius(8.0)
                                .inner_margin(egui::Margin::symmetric(10, 8))
                                .show(ui, |ui| {
                                    ui.label(
                                        egui::RichText::new(error).color(egui::Color32::WHITE),
                                    );
                                });
                        }

                        // One-shot focus: first frame lands on email, later
                        // frames honor the validator's focus-first-invalid.
                        let mut focus_to_set = None;
                        if !self.login_autofocused {
                            self.login_autofocused = true;
                            focus_to_set = Some(LoginField::Email);
                        } else if self.login_focus.is_some() {
                            focus_to_set = self.login_focus.take();
                        }

                        let server_resp = labeled_text_field(
                            ui,
                            "login_server_url",
                            "Server URL",
                            DEFAULT_SERVER_URL,
                            &mut self.server_url,
                            focus_to_set == Some(LoginField::ServerUrl),
                        );
                        field_error_label(ui, self.login_form.error_for(LoginField::ServerUrl));

                        ui.add_space(2.0);

                        let email_resp = labeled_text_field(
                            ui,
                            "login_email",
                            "Email",
                            "you@example.edu",
                            &mut self.email,
                            focus_to_set == Some(LoginField::Email),
                        );
                        field_error_label(ui, self.login_form.error_for(LoginField::Email));

                        ui.add_space(2.0);

                        ui.label(egui::RichText::new("Password").strong());
                        let password_resp = password_field(
                            ui,
                            "login_password",
                            &mut self.password,
                            &mut self.password_visibility,
                            "Your password",
                        );
                        if focus_to_set == Some(LoginField::Password) {
                            password_resp.request_focus();
                        }
                        field_error_label(ui, self.login_form.error_for(LoginField::Password));

                        let enter_pressed = ctx.input(|i| i.key_pressed(egui::Key::Enter));
                        let any_field_focused = server_resp.has_focus()
                            || email_resp.has_focus()
                            || password_resp.has_focus();
                        if enter_pressed && any_field_focused {
                            self.try_login(now);
                        }

                        ui.add_space(8.0);

                        let is_busy = self.login_submit.is_busy();
                        let label = if is_busy { "Signing in..." } else { "Sign in" };
                        let button = egui::Button::new(
                            egui::RichText::new(label).strong().size(16.0),
                        )
                        .fill(ACCENT_COLOR)
                        .min_size(egui::vec2(ui.available_width(), 40.0));
                        if ui.add_enabled(!is_busy, button).clicked() {
                            self.try_login(now);
                        }

                        ui.add_space(6.0);
                        ui.separator();
                        ui.horizontal_wrapped(|ui| {
                            ui.small("Status:");
                            ui.small(egui::RichText::new(&self.status).weak());
                        });
                        ui.small(
                            egui::RichText::new("Accounts are created on the web portal.").weak(),
                        );
                    });
            });

            ui.add_space((avail.y * 0.08).clamp(12.0, 60.0));
        });
    }

    fn show_browse_screen(&mut self, ctx: &egui::Context, now: Instant) {
        self.show_top_bar(ctx);
        self.show_note_detail(ctx, now);

        egui::CentralPanel::default().show(ctx, |ui| {
            self.show_filter_row(ui, ctx, now);
            ui.add_space(4.0);
            self.show_notes_table(ui, now);
            ui.add_space(4.0);
            self.show_pagination_row(ui);
        });

        self.show_upload_window(ctx, now);
        self.show_settings_window(ctx);
        self.show_delete_confirm(ctx);
        back_to_top_button(ctx, &mut self.back_to_top);
    }

    fn show_top_bar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            ui.add_space(4.0);
            ui.horizontal(|ui| {
                ui.label(egui::RichText::new("📚 NotesDesk").strong().size(18.0));
                if let Some(username) = &self.logged_in_as {
                    ui.weak(format!("({username})"));
                }
                ui.separator();

                if ui.button("⬆ Upload note").clicked() {
                    self.upload_open = true;
                }

                // The behavior layer hands out icon names; typography is ours.
                let theme_glyph = match self.theme.switch_icon() {
                    "moon" => "🌙",
                    _ => "☀",
                };
                if ui
                    .button(format!("{} {}", theme_glyph, self.theme.switch_label()))
                    .on_hover_text("Switch color theme")
                    .clicked()
                {
                    self.theme = self.theme.toggled();
                }

                if ui.button("⚙").on_hover_text("Settings").clicked() {
                    self.settings_open = !self.settings_open;
                }

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui.button("Sign out").clicked() {
                        self.sign_out();
                    }
                    ui.small(egui::RichText::new(&self.status).weak());
                });
            });
            ui.add_space(4.0);
        });
    }

    fn show_filter_row(&mut self, ui: &mut egui::Ui, ctx: &egui::Context, now: Instant) {
        let mut filters_changed = false;
        let mut apply_search = false;
        let mut picked_suggestion = None;

        ui.horizontal(|ui| {
            let subject_label = match self.query.subject_id {
                Some(id) => self
                    .subjects
                    .iter()
                    .find(|subject| subject.subject_id == id)
                    .map(|subject| subject.name.clone())
                    .unwrap_or_else(|| format!("Subject #{}", id.0)),
                None => "All subjects".to_string(),
            };
            egui::ComboBox::from_id_salt("subject_filter")
                .selected_text(subject_label)
                .show_ui(ui, |ui| {
                    if ui
                        .selectable_label(self.query.subject_id.is_none(), "All subjects")
                        .clicked()
                        && self.query.subject_id.is_some()
                    {
                        self.query.subject_id = None;
                        filters_changed = true;
                    }
                    for subject in &self.subjects {
                        let selected = self.query.subject_id == Some(subject.subject_id);
                        let label = format!("{} ({})", subject.name, subject.code);
                        if ui.selectable_label(selected, label).clicked() && !selected {
                            self.query.subject_id = Some(subject.subject_id);
                            filters_changed = true;
                        }
                    }
                });

            let semester_label = match self.query.semester {
                Some(semester) => format!("Semester {semester}"),
                None => "All semesters".to_string(),
            };
            egui::ComboBox::from_id_salt("semester_filter")
                .selected_text(semester_label)
                .show_ui(ui, |ui| {
                    if ui
                        .selectable_label(self.query.semester.is_none(), "All semesters")
                        .clicked()
                        && self.query.semester.is_some()
                    {
                        self.query.semester = None;
                        filters_changed = true;
                    }
                    for semester in shared::domain::SEMESTER_MIN..=shared::domain::SEMESTER_MAX {
                        let selected = self.query.semester == Some(semester);
                        if ui
                            .selectable_label(selected, format!("Semester {semester}"))
                            .clicked()
                            && !selected
                        {
                            self.query.semester = Some(semester);
                            filters_changed = true;
                        }
                    }
                });

            let sort_label = match self.query.sort_by {
                NotesSortKey::Newest => "Newest first",
                NotesSortKey::Downloads => "Most downloaded",
                NotesSortKey::Rating => "Highest rated",
            };
            egui::ComboBox::from_id_salt("sort_order")
                .selected_text(sort_label)
                .show_ui(ui, |ui| {
                    for (key, label) in [
                        (NotesSortKey::Newest, "Newest first"),
                        (NotesSortKey::Downloads, "Most downloaded"),
                        (NotesSortKey::Rating, "Highest rated"),
                    ] {
                        if ui
                            .selectable_label(self.query.sort_by == key, label)
                            .clicked()
                            && self.query.sort_by != key
                        {
                            self.query.sort_by = key;
                            // A fresh server order should not be shuffled by a
                            // stale column sort.
                            self.sort.clear();
                            filters_changed = true;
                        }
                    }
                });

            let search_resp = ui.add(
                egui::TextEdit::singleline(&mut self.search_draft)
                    .id_salt("notes_search")
                    .hint_text("Search title or description...")
                    .desired_width(220.0),
            );
            if search_resp.changed() {
                self.search_box.input(&self.search_draft, now);
            }
            if search_resp.lost_focus() && ctx.input(|i| i.key_pressed(egui::Key::Enter)) {
                apply_search = true;
            }
            if ui.button("Search").clicked() {
                apply_search = true;
            }

            let suggestions = self.search_box.suggestions();
            if search_resp.has_focus() && !suggestions.is_empty() {
                egui::Area::new(egui::Id::new("search_suggestions"))
                    .order(egui::Order::Foreground)
                    .fixed_pos(search_resp.rect.left_bottom() + egui::vec2(0.0, 4.0))
                    .show(ctx, |ui| {
                        egui::Frame::popup(ui.style()).show(ui, |ui| {
                            ui.set_min_width(search_resp.rect.width());
                            for suggestion in suggestions {
                                if ui.selectable_label(false, suggestion).clicked() {
                                    picked_suggestion = Some(suggestion.clone());
                                }
                            }
                        });
                    });
            }

            if self.notes_loading {
                ui.spinner();
            }
        });

        if let Some(suggestion) = picked_suggestion {
            self.search_draft = suggestion;
            apply_search = true;
        }
        if apply_search {
            let trimmed = self.search_draft.trim();
            self.query.search = if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            };
            filters_changed = true;
        }
        if filters_changed {
            self.query.page = 1;
            self.request_notes();
        }
    }

    fn show_notes_table(&mut self, ui: &mut egui::Ui, now: Instant) {
        let mut clicked_column = None;
        let mut selected = None;
        let mut download = None;
        let mut copy_link = None;
        let mut delete = None;

        let jump_to_top = self.back_to_top.take_jump();
        let table_height = ui.available_height() - 40.0;

        let mut scroll = egui::ScrollArea::vertical()
            .id_salt("notes_table_scroll")
            .auto_shrink([false, false])
            .max_height(table_height.max(120.0));
        if jump_to_top {
            scroll = scroll.vertical_scroll_offset(0.0);
        }

        let output = scroll.show(ui, |ui| {
            egui::Grid::new("notes_table")
                .striped(true)
                .num_columns(NOTES_COLUMNS.len() + 1)
                .spacing([14.0, 6.0])
                .show(ui, |ui| {
                    for (label, column) in NOTES_COLUMNS {
                        if sortable_header(ui, label, column, &self.sort) {
                            clicked_column = Some(column);
                        }
                    }
                    ui.label("");
                    ui.end_row();

                    for note in &self.notes {
                        if ui.link(&note.title).clicked() {
                            selected = Some(note.note_id);
                        }
                        ui.label(&note.subject_code);
                        ui.label(note.semester.to_string());
                        ui.label(format_file_size(note.file_size));
                        ui.label(note.download_count.to_string());
                        ui.label(format!("★ {}", format_average(note.average_rating)));
                        ui.label(note.uploaded_at.format("%b %d, %Y").to_string());
                        ui.horizontal(|ui| {
                            if ui
                                .small_button("⬇")
                                .on_hover_text("Download")
                                .clicked()
                            {
                                download = Some((note.note_id, note.file_name.clone()));
                            }
                            if ui
                                .small_button("🔗")
                                .on_hover_text("Copy link")
                                .clicked()
                            {
                                copy_link = Some(note.note_id);
                            }
                            if note.mine
                                && ui.small_button("🗑").on_hover_text("Delete").clicked()
                            {
                                delete = Some((note.note_id, note.title.clone()));
                            }
                        });
                        ui.end_row();
                    }
                });

            if self.notes.is_empty() && !self.notes_loading {
                ui.add_space(24.0);
                ui.vertical_centered(|ui| {
                    ui.weak("No notes match the current filters.");
                });
            }
        });
        self.back_to_top.update_offset(output.state.offset.y);

        if let Some(column) = clicked_column {
            let direction = self.sort.click(column);
            ui_core::sort_rows(&mut self.notes, direction, |note| sort_value(note, column));
        }
        if let Some(note_id) = selected {
            self.select_note(note_id);
        }
        if let Some((note_id, file_name)) = download {
            dispatch_backend_command(
                &self.cmd_tx,
                BackendCommand::DownloadNote { note_id, file_name },
                &mut self.status,
            );
        }
        if let Some(note_id) = copy_link {
            let link = copy_note_link(&self.server_url, note_id);
            copy_with_feedback(&mut ArboardClipboard, &link, &mut self.banners, now);
        }
        if let Some((note_id, title)) = delete {
            self.delete_confirm
                .request(note_id, format!("Delete \"{title}\"? This cannot be undone."));
        }
    }

    fn select_note(&mut self, note_id: NoteId) {
        self.selected_note = Some(note_id);
        self.rating = StarRating::default();
        self.rating_submit = SubmitGuard::default();
    }

    fn show_pagination_row(&mut self, ui: &mut egui::Ui) {
        let mut go_to = None;
        ui.horizontal(|ui| {
            if ui
                .add_enabled(self.page > 1, egui::Button::new("◀ Prev"))
                .clicked()
            {
                go_to = Some(self.page - 1);
            }
            ui.label(format!(
                "Page {} of {} ({} notes)",
                self.page, self.pages, self.total
            ));
            if ui
                .add_enabled(self.page < self.pages, egui::Button::new("Next ▶"))
                .clicked()
            {
                go_to = Some(self.page + 1);
            }
        });
        if let Some(page) = go_to {
            self.query.page = page;
            self.request_notes();
        }
    }

    fn show_note_detail(&mut self, ctx: &egui::Context, now: Instant) {
        let Some(selected) = self.selected_note else {
            return;
        };
        let Some(note) = self
            .notes
            .iter()
            .find(|note| note.note_id == selected)
            .cloned()
        else {
            self.selected_note = None;
            return;
        };

        egui::SidePanel::right("note_detail")
            .resizable(true)
            .default_width(320.0)
            .width_range(260.0..=440.0)
            .show(ctx, |ui| {
                ui.add_space(6.0);
                ui.horizontal(|ui| {
                    ui.heading(&note.title);
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui.small_button("✕").clicked() {
                            self.selected_note = None;
                        }
                    });
                });
                ui.weak(format!(
                    "{} ({}) · Semester {}",
                    note.subject_name, note.subject_code, note.semester
                ));
                ui.weak(format!(
                    "Uploaded by {} on {}",
                    note.uploader,
                    note.uploaded_at.format("%b %d, %Y")
                ));
                ui.weak(format!(
                    "{} · {} downloads",
                    format_file_size(note.file_size),
                    note.download_count
                ));
                ui.separator();

                egui::ScrollArea::vertical()
                    .id_salt("note_detail_scroll")
                    .auto_shrink([false, false])
                    .show(ui, |ui| {
                        match note.thumbnail_url.as_deref() {
                            Some(url) => {
                                if self.thumbnails.mark_visible(note.note_id) {
                                    dispatch_backend_command(
                                        &self.cmd_tx,
                                        BackendCommand::FetchThumbnail {
                                            note_id: note.note_id,
                                            url: url.to_string(),
                                        },
                                        &mut self.status,
                                    );
                                }
                                match self.thumbnails.state_of(note.note_id).clone() {
                                    LazyState::NotRequested | LazyState::Loading => {
                                        ui.horizontal(|ui| {
                                            ui.spinner();
                                            ui.weak("Loading preview...");
                                        });
                                    }
                                    LazyState::Ready => {
                                        if let Some(texture) =
                                            self.thumbnail_texture(ui.ctx(), note.note_id)
                                        {
                                            let max_width = ui.available_width().min(300.0);
                                            let size = texture.size_vec2();
                                            let scale = (max_width / size.x).min(1.0);
                                            ui.add(
                                                egui::Image::new(&texture)
                                                    .fit_to_exact_size(size * scale),
                                            );
                                        }
                                    }
                                    LazyState::Failed(reason) => {
                                        ui.weak(format!("Preview unavailable: {reason}"));
                                    }
                                }
                            }
                            None => {
                                ui.weak("No preview available");
                            }
                        }

                        ui.add_space(8.0);
                        ui.label(egui::RichText::new("Description").strong());
                        ui.label(&note.description);
                        ui.add_space(8.0);
                        ui.separator();

                        ui.label(egui::RichText::new("Rate this note").strong());
                        let rating_enabled = !self.rating_submit.is_busy();
                        if let Some(score) = star_row(ui, &mut self.rating, rating_enabled) {
                            if self.rating_submit.begin(now) {
                                self.rating.commit(score);
                                dispatch_backend_command(
                                    &self.cmd_tx,
                                    BackendCommand::SubmitRating {
                                        note_id: note.note_id,
                                        score,
                                    },
                                    &mut self.status,
                                );
                            }
                        }
                        if self.rating_submit.is_busy() {
                            ui.weak("Submitting rating...");
                        }
                        ui.label(format!(
                            "Average rating: {}",
                            format_average(note.average_rating)
                        ));

                        ui.add_space(8.0);
                        ui.separator();
                        ui.horizontal(|ui| {
                            if ui.button("⬇ Download").clicked() {
                                dispatch_backend_command(
                                    &self.cmd_tx,
                                    BackendCommand::DownloadNote {
                                        note_id: note.note_id,
                                        file_name: note.file_name.clone(),
                                    },
                                    &mut self.status,
                                );
                            }
                            if ui.button("🔗 Copy link").clicked() {
                                let link = copy_note_link(&self.server_url, note.note_id);
                                copy_with_feedback(
                                    &mut ArboardClipboard,
                                    &link,
                                    &mut self.banners,
                                    now,
                                );
                            }
                            if note.mine && ui.button("🗑 Delete").clicked() {
                                self.delete_confirm.request(
                                    note.note_id,
                                    format!(
                                        "Delete \"{}\"? This cannot be undone.",
                                        note.title
                                    ),
                                );
                            }
                        });
                    });
            });
    }

    fn show_upload_window(&mut self, ctx: &egui::Context, now: Instant) {
        if !self.upload_open {
            return;
        }

        let window_frame = egui::Frame::NONE
            .fill(ctx.style().visuals.window_fill)
            .stroke(egui::Stroke::new(
                1.0,
                ctx.style().visuals.window_stroke().color,
            ))
            .corner_radius(egui::CornerRadius::same(10))
            .inner_margin(egui::Margin::symmetric(14, 12));

        let mut close_requested = false;
        let focus_to_set = self.upload_focus.take();

        egui::Window::new("upload_note_window")
            .title_bar(false)
            .frame(window_frame)
            .resizable(false)
            .default_width(440.0)
            .anchor(egui::Align2::CENTER_CENTER, egui::vec2(0.0, 0.0))
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.label(egui::RichText::new("Upload note").strong().size(16.0));
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui.small_button("✕").clicked() {
                            close_requested = true;
                        }
                    });
                });
                ui.separator();

                let _title_resp = labeled_text_field(
                    ui,
                    "upload_title",
                    "Title",
                    "e.g. Laplace transforms summary",
                    &mut self.upload_title,
                    focus_to_set == Some(UploadField::Title),
                );
                field_error_label(ui, self.upload_form.error_for(UploadField::Title));

                ui.label(egui::RichText::new("Description").strong());
                let rows = auto_resize_rows(&self.upload_description, 3, 10);
                let description_resp = ui.add(
                    egui::TextEdit::multiline(&mut self.upload_description)
                        .id_salt("upload_description")
                        .hint_text("What do these notes cover?")
                        .desired_rows(rows)
                        .desired_width(f32::INFINITY),
                );
                if focus_to_set == Some(UploadField::Description) {
                    description_resp.request_focus();
                }
                field_error_label(ui, self.upload_form.error_for(UploadField::Description));

                ui.label(egui::RichText::new("Subject").strong());
                let subject_label = self
                    .upload_subject
                    .and_then(|subject_id| {
                        self.subjects
                            .iter()
                            .find(|subject| subject.subject_id == subject_id)
                            .map(|subject| format!("{} ({})", subject.name, subject.code))
                    })
                    .unwrap_or_else(|| "Select subject".to_string());
                egui::ComboBox::from_id_salt("upload_subject")
                    .selected_text(subject_label)
                    .width(220.0)
                    .show_ui(ui, |ui| {
                        for subject in &self.subjects {
                            let selected = self.upload_subject == Some(subject.subject_id);
                            let label = format!("{} ({})", subject.name, subject.code);
                            if ui.selectable_label(selected, label).clicked() {
                                self.upload_subject = Some(subject.subject_id);
                            }
                        }
                    });
                field_error_label(ui, self.upload_form.error_for(UploadField::Subject));

                ui.label(egui::RichText::new("Semester").strong());
                let semester_label = self
                    .upload_semester
                    .map(|semester| format!("Semester {semester}"))
                    .unwrap_or_else(|| "Select semester".to_string());
                egui::ComboBox::from_id_salt("upload_semester")
                    .selected_text(semester_label)
                    .width(220.0)
                    .show_ui(ui, |ui| {
                        for semester in shared::domain::SEMESTER_MIN..=shared::domain::SEMESTER_MAX
                        {
                            let selected = self.upload_semester == Some(semester);
                            if ui
                                .selectable_label(selected, format!("Semester {semester}"))
                                .clicked()
                            {
                                self.upload_semester = Some(semester);
                            }
                        }
                    });
                field_error_label(ui, self.upload_form.error_for(UploadField::Semester));

                ui.label(egui::RichText::new("File").strong());
                ui.horizontal(|ui| {
                    if ui.button("Choose file...").clicked() {
                        self.pick_upload_file(now);
                    }
                    ui.weak("PDF, DOC, or DOCX up to 16 MB");
                });
                if let Some(file) = &self.upload_file {
                    upload_preview_card(ui, &file.preview);
                }
                field_error_label(ui, self.upload_form.error_for(UploadField::File));

                ui.add_space(8.0);

                let is_busy = self.upload_submit.is_busy();
                let label = if is_busy { "Uploading..." } else { "Upload" };
                let button = egui::Button::new(egui::RichText::new(label).strong())
                    .fill(ACCENT_COLOR)
                    .min_size(egui::vec2(ui.available_width(), 36.0));
                if ui.add_enabled(!is_busy, button).clicked() {
                    self.submit_upload(now);
                }
            });

        if close_requested {
            self.upload_open = false;
        }
    }

    fn show_settings_window(&mut self, ctx: &egui::Context) {
        if !self.settings_open {
            return;
        }

        let window_frame = egui::Frame::NONE
            .fill(ctx.style().visuals.window_fill)
            .stroke(egui::Stroke::new(
                1.0,
                ctx.style().visuals.window_stroke().color,
            ))
            .corner_radius(egui::CornerRadius::same(10))
            .inner_margin(egui::Margin::symmetric(12, 10));

        let mut settings_open = self.settings_open;
        let mut close_requested = false;

        egui::Window::new("settings_window")
            .title_bar(false)
            .frame(window_frame)
            .open(&mut settings_open)
            .resizable(false)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.label(egui::RichText::new("Settings").strong().size(15.0));
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui.small_button("✕").clicked() {
                            close_requested = true;
                        }
                    });
                });
                ui.separator();

                ui.label("Theme");
                ui.horizontal(|ui| {
                    ui.selectable_value(&mut self.theme, Theme::Light, "☀ Light");
                    ui.selectable_value(&mut self.theme, Theme::Dark, "🌙 Dark");
                });

                ui.add_space(4.0);
                ui.add(
                    egui::Slider::new(&mut self.text_scale, 0.8..=1.4)
                        .text("Text scale")
                        .step_by(0.05),
                );

                if ui.button("Reset to defaults").clicked() {
                    self.theme = Theme::default();
                    self.text_scale = 1.0;
                }
            });

        self.settings_open = settings_open && !close_requested;
    }

    fn show_delete_confirm(&mut self, ctx: &egui::Context) {
        let Some((_, message)) = self.delete_confirm.pending() else {
            return;
        };
        let message = message.to_string();

        let mut accepted = false;
        let mut canceled = false;
        egui::Window::new("confirm_delete")
            .title_bar(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, egui::vec2(0.0, 0.0))
            .show(ctx, |ui| {
                ui.label(egui::RichText::new("Confirm delete").strong());
                ui.add_space(4.0);
                ui.label(message);
                ui.add_space(8.0);
                ui.horizontal(|ui| {
                    if ui.button("Cancel").clicked() {
                        canceled = true;
                    }
                    let danger = egui::Button::new(
                        egui::RichText::new("Delete").color(egui::Color32::WHITE),
                    )
                    .fill(egui::Color32::from_rgb(160, 48, 48));
                    if ui.add(danger).clicked() {
                        accepted = true;
                    }
                });
            });

        if canceled {
            self.delete_confirm.cancel();
        } else if accepted {
            if let Some(note_id) = self.delete_confirm.accept() {
                dispatch_backend_command(
                    &self.cmd_tx,
                    BackendCommand::DeleteNote { note_id },
                    &mut self.status,
                );
            }
        }
    }
}

fn labeled_text_field(
    ui: &mut egui::Ui,
    id: &'static str,
    label: &str,
    hint: &str,
    value: &mut String,
    should_focus: bool,
) -> egui::Response {
    ui.label(egui::RichText::new(label).strong());
    let edit = egui::TextEdit::singleline(value)
        .id_salt(id)
        .hint_text(hint)
        .desired_width(f32::INFINITY);
    let response = ui.add_sized([ui.available_width(), 34.0], edit);
    if should_focus {
        response.request_focus();
    }
    response
}

fn err_label(category: UiErrorCategory) -> &'static str {
    match category {
        UiErrorCategory::Auth => "Auth",
        UiErrorCategory::Transport => "Transport",
        UiErrorCategory::Validation => "Validation",
        UiErrorCategory::Unknown => "Unknown",
    }
}

/// Shareable web link for a note, matching the service's note page route.
fn copy_note_link(server_url: &str, note_id: NoteId) -> String {
    format!("{}/note/{}", server_url.trim_end_matches('/'), note_id.0)
}

pub fn decode_preview_image(bytes: &[u8]) -> Result<PreviewImage, String> {
    let dynamic = image::load_from_memory(bytes).map_err(|err| err.to_string())?;
    let resized = dynamic.thumbnail(1024, 1024).to_rgba8();
    let width = resized.width() as usize;
    let height = resized.height() as usize;
    Ok(PreviewImage {
        width,
        height,
        rgba: resized.into_raw(),
    })
}

/// System clipboard behind the `ui_core` seam; constructed per write because
/// some platforms invalidate long-lived clipboard handles.
struct ArboardClipboard;

impl Clipboard for ArboardClipboard {
    fn set_text(&mut self, text: &str) -> Result<(), ClipboardError> {
        let mut clipboard =
            arboard::Clipboard::new().map_err(|err| ClipboardError(err.to_string()))?;
        clipboard
            .set_text(text.to_string())
            .map_err(|err| ClipboardError(err.to_string()))
    }
}

impl eframe::App for DesktopGuiApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.tick = self.tick.wrapping_add(1);
        let now = Instant::now();

        self.process_ui_events(now);
        self.apply_theme_if_needed(ctx);
        self.restore_stale_submits(now);

        if let Some(query) = self.search_box.poll(now, &NoSuggestions) {
            tracing::debug!(query = %query, "search suggestions refreshed");
        }

        match self.view_state {
            AppViewState::Connect => self.show_connect_screen(ctx, now),
            AppViewState::Browse => self.show_browse_screen(ctx, now),
        }

        show_banner_host(ctx, &mut self.banners, now);

        ctx.request_repaint_after(Duration::from_millis(100));
    }

    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        let settings = PersistedDesktopSettings::from_runtime(
            self.theme,
            &self.server_url,
            &self.email,
            self.text_scale,
        );
        if let Ok(serialized) = serde_json::to_string(&settings) {
            storage.set_string(SETTINGS_STORAGE_KEY, serialized);
        }
    }
}
