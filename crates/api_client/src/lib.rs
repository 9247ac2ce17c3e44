//! Typed async HTTP client for the NotesDesk service.
//!
//! Form posts are multipart and carry the `X-Requested-With` marker header so
//! the service answers with JSON envelopes instead of redirect-plus-flash
//! pages. The underlying client keeps the session cookie from `/login` and
//! enforces a client-wide request timeout, so an abandoned request is
//! cancelled at the transport layer instead of lingering.

use std::time::Duration;

use reqwest::{header::HeaderMap, multipart, Client, StatusCode};
use serde::de::DeserializeOwned;
use shared::{
    domain::{NoteId, SubjectId},
    protocol::{AuthReply, FormReply, NotesPage, NotesQuery, RateNoteRequest, RateNoteResponse},
    ApiError, ApiException, ErrorCode,
};
use thiserror::Error;
use tracing::{debug, warn};
use url::Url;

/// Upper bound on any single request, connect through body read.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

const JSON_MARKER_HEADER: &str = "X-Requested-With";
const JSON_MARKER_VALUE: &str = "XMLHttpRequest";

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("invalid server url {url:?}: {reason}")]
    InvalidServerUrl { url: String, reason: String },
    #[error(transparent)]
    Transport(#[from] reqwest::Error),
    #[error(transparent)]
    Api(#[from] ApiException),
    #[error("malformed reply from server: {0}")]
    Decode(#[from] serde_json::Error),
}

impl ClientError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Transport(err) if err.is_timeout())
    }

    /// Error code of the service rejection, when the failure was one.
    pub fn api_code(&self) -> Option<ErrorCode> {
        match self {
            Self::Api(err) => Some(err.code),
            _ => None,
        }
    }
}

/// One file attached to a multipart form post.
#[derive(Debug, Clone)]
pub struct FilePart {
    pub field_name: String,
    pub file_name: String,
    pub mime_type: Option<String>,
    pub bytes: Vec<u8>,
}

/// Draft of a note upload, mirroring the upload form's fields.
#[derive(Debug, Clone)]
pub struct NoteUpload {
    pub title: String,
    pub description: String,
    pub subject_id: SubjectId,
    pub semester: u8,
    pub file: FilePart,
}

/// Downloaded note payload plus the name the service suggested for it.
#[derive(Debug, Clone)]
pub struct NoteDownload {
    pub file_name: Option<String>,
    pub bytes: Vec<u8>,
}

#[derive(Debug)]
pub struct NotesClient {
    http: Client,
    server_url: Url,
}

impl NotesClient {
    pub fn new(server_url: &str) -> Result<Self, ClientError> {
        let parsed = Url::parse(server_url).map_err(|err| ClientError::InvalidServerUrl {
            url: server_url.to_string(),
            reason: err.to_string(),
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ClientError::InvalidServerUrl {
                url: server_url.to_string(),
                reason: "scheme must be http or https".to_string(),
            });
        }
        let http = Client::builder()
            .cookie_store(true)
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            http,
            server_url: parsed,
        })
    }

    pub fn server_url(&self) -> &Url {
        &self.server_url
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<AuthReply, ClientError> {
        let form = multipart::Form::new()
            .text("email", email.to_string())
            .text("password", password.to_string());
        debug!("submitting sign-in form");
        self.post_form("/login", form).await
    }

    pub async fn fetch_notes(&self, query: &NotesQuery) -> Result<NotesPage, ClientError> {
        let res = self
            .http
            .get(self.endpoint("/view_notes")?)
            .header(JSON_MARKER_HEADER, JSON_MARKER_VALUE)
            .query(&query.to_query_pairs())
            .send()
            .await?;
        decode_reply(res).await
    }

    pub async fn rate_note(
        &self,
        note_id: NoteId,
        score: u8,
    ) -> Result<RateNoteResponse, ClientError> {
        let request = RateNoteRequest { note_id, score };
        let mut form = multipart::Form::new();
        for (name, value) in request.to_form_fields() {
            form = form.text(name, value);
        }
        debug!(note_id = note_id.0, score, "submitting note rating");
        self.post_form("/rate_note", form).await
    }

    pub async fn upload_note(&self, upload: NoteUpload) -> Result<FormReply, ClientError> {
        let NoteUpload {
            title,
            description,
            subject_id,
            semester,
            file,
        } = upload;
        let fields = [
            ("title", title),
            ("description", description),
            ("subject_id", subject_id.0.to_string()),
            ("semester", semester.to_string()),
        ];
        self.submit_form("/upload_note", &fields, Some(file)).await
    }

    pub async fn delete_note(&self, note_id: NoteId) -> Result<FormReply, ClientError> {
        self.submit_form(&format!("/delete_note/{}", note_id.0), &[], None)
            .await
    }

    /// Generic multipart form post with the marker header, decoding the JSON
    /// envelope the service answers marked requests with.
    pub async fn submit_form(
        &self,
        action: &str,
        fields: &[(&str, String)],
        file: Option<FilePart>,
    ) -> Result<FormReply, ClientError> {
        let mut form = multipart::Form::new();
        for (name, value) in fields {
            form = form.text((*name).to_string(), value.clone());
        }
        if let Some(file) = file {
            let mut part = multipart::Part::bytes(file.bytes).file_name(file.file_name);
            if let Some(mime) = &file.mime_type {
                part = part.mime_str(mime)?;
            }
            form = form.part(file.field_name, part);
        }
        self.post_form(action, form).await
    }

    pub async fn download_note(&self, note_id: NoteId) -> Result<NoteDownload, ClientError> {
        let res = self
            .http
            .get(self.endpoint(&format!("/download/{}", note_id.0))?)
            .header(JSON_MARKER_HEADER, JSON_MARKER_VALUE)
            .send()
            .await?;
        let status = res.status();
        let file_name = attachment_file_name(res.headers());
        let body = res.bytes().await?;
        if !status.is_success() {
            return Err(reject_with(status, &body).into());
        }
        debug!(note_id = note_id.0, bytes = body.len(), "note downloaded");
        Ok(NoteDownload {
            file_name,
            bytes: body.to_vec(),
        })
    }

    /// Raw bytes behind a preview URL, which may be relative to the server
    /// or absolute.
    pub async fn fetch_preview(&self, url: &str) -> Result<Vec<u8>, ClientError> {
        let target = self
            .server_url
            .join(url)
            .map_err(|err| ClientError::InvalidServerUrl {
                url: url.to_string(),
                reason: err.to_string(),
            })?;
        let res = self.http.get(target).send().await?;
        let status = res.status();
        let body = res.bytes().await?;
        if !status.is_success() {
            return Err(reject_with(status, &body).into());
        }
        Ok(body.to_vec())
    }

    async fn post_form<T: DeserializeOwned>(
        &self,
        path: &str,
        form: multipart::Form,
    ) -> Result<T, ClientError> {
        let res = self
            .http
            .post(self.endpoint(path)?)
            .header(JSON_MARKER_HEADER, JSON_MARKER_VALUE)
            .multipart(form)
            .send()
            .await?;
        decode_reply(res).await
    }

    fn endpoint(&self, path: &str) -> Result<Url, ClientError> {
        self.server_url
            .join(path)
            .map_err(|err| ClientError::InvalidServerUrl {
                url: path.to_string(),
                reason: err.to_string(),
            })
    }
}

async fn decode_reply<T: DeserializeOwned>(res: reqwest::Response) -> Result<T, ClientError> {
    let status = res.status();
    let body = res.bytes().await?;
    if status.is_success() {
        return Ok(serde_json::from_slice(&body)?);
    }
    Err(reject_with(status, &body).into())
}

/// Maps a non-2xx reply onto the service error type, preferring whatever
/// envelope the body carries over the bare status line.
fn reject_with(status: StatusCode, body: &[u8]) -> ApiException {
    warn!(status = status.as_u16(), "server rejected request");
    if let Ok(err) = serde_json::from_slice::<ApiError>(body) {
        return ApiException::new(err.code, err.message);
    }
    if let Ok(reply) = serde_json::from_slice::<FormReply>(body) {
        if !reply.message.is_empty() {
            return ApiException::new(error_code_for(status), reply.message);
        }
    }
    let reason = status.canonical_reason().unwrap_or("request failed");
    ApiException::new(
        error_code_for(status),
        format!("{} {reason}", status.as_u16()),
    )
}

fn error_code_for(status: StatusCode) -> ErrorCode {
    match status {
        StatusCode::UNAUTHORIZED => ErrorCode::Unauthorized,
        StatusCode::FORBIDDEN => ErrorCode::Forbidden,
        StatusCode::NOT_FOUND => ErrorCode::NotFound,
        StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => ErrorCode::Validation,
        StatusCode::PAYLOAD_TOO_LARGE => ErrorCode::TooLarge,
        _ => ErrorCode::Internal,
    }
}

fn attachment_file_name(headers: &HeaderMap) -> Option<String> {
    let raw = headers
        .get(reqwest::header::CONTENT_DISPOSITION)?
        .to_str()
        .ok()?;
    let (_, rest) = raw.split_once("filename=")?;
    let name = rest
        .split(';')
        .next()
        .unwrap_or(rest)
        .trim()
        .trim_matches('"');
    if name.is_empty() {
        None
    } else {
        Some(name.to_string())
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
