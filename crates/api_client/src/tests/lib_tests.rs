use super::*;

use std::{collections::HashMap, sync::Arc};

use anyhow::Result;
use axum::{
    extract::{Multipart, Path, Query, State},
    http::header,
    response::{Html, IntoResponse},
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use shared::NotesSortKey;
use tokio::{net::TcpListener, sync::Mutex};

#[derive(Clone, Default)]
struct ServerState {
    marker_headers: Arc<Mutex<Vec<Option<String>>>>,
    login_fields: Arc<Mutex<Option<HashMap<String, String>>>>,
    listing_queries: Arc<Mutex<Vec<HashMap<String, String>>>>,
    listing_html: Arc<Mutex<bool>>,
    rating_fields: Arc<Mutex<Option<HashMap<String, String>>>>,
    rating_logged_out: Arc<Mutex<bool>>,
    uploads: Arc<Mutex<Vec<RecordedUpload>>>,
    deleted_notes: Arc<Mutex<Vec<i64>>>,
}

#[derive(Clone)]
struct RecordedUpload {
    fields: HashMap<String, String>,
    file_name: Option<String>,
    mime_type: Option<String>,
    byte_len: usize,
}

fn marker_of(headers: &HeaderMap) -> Option<String> {
    headers
        .get("x-requested-with")
        .and_then(|value| value.to_str().ok())
        .map(ToString::to_string)
}

async fn collect_text_fields(multipart: &mut Multipart) -> HashMap<String, String> {
    let mut fields = HashMap::new();
    while let Some(field) = multipart.next_field().await.expect("read multipart field") {
        let name = field.name().unwrap_or_default().to_string();
        fields.insert(name, field.text().await.expect("field text"));
    }
    fields
}

async fn handle_login(
    State(state): State<ServerState>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> Json<Value> {
    state.marker_headers.lock().await.push(marker_of(&headers));
    let fields = collect_text_fields(&mut multipart).await;
    let reply = if fields.get("password").map(String::as_str) == Some("open-sesame") {
        json!({
            "success": true,
            "message": "Welcome back, priya!",
            "user": {"user_id": 7, "username": "priya", "email": "priya@example.edu"}
        })
    } else {
        json!({"success": false, "message": "Invalid email or password!"})
    };
    *state.login_fields.lock().await = Some(fields);
    Json(reply)
}

async fn handle_view_notes(
    State(state): State<ServerState>,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> axum::response::Response {
    state.marker_headers.lock().await.push(marker_of(&headers));
    state.listing_queries.lock().await.push(params);
    if *state.listing_html.lock().await {
        return Html("<!doctype html><title>notes</title>").into_response();
    }
    Json(json!({
        "notes": [
            {
                "note_id": 7,
                "title": "Laplace transforms",
                "description": "Worked examples for unit two.",
                "subject_name": "Mathematics",
                "subject_code": "MATH",
                "semester": 3,
                "file_name": "laplace.pdf",
                "file_size": 182272,
                "uploaded_at": "2024-11-02T09:30:00Z",
                "download_count": 41,
                "average_rating": 4.5,
                "uploader": "priya",
                "thumbnail_url": "/thumbnails/7.png",
                "mine": true
            },
            {
                "note_id": 9,
                "title": "Fourier series",
                "subject_name": "Mathematics",
                "subject_code": "MATH",
                "semester": 3,
                "file_name": "fourier.pdf",
                "file_size": 90112,
                "uploaded_at": "2024-11-05T14:00:00Z",
                "download_count": 12,
                "average_rating": 3.8,
                "uploader": "arjun"
            }
        ],
        "subjects": [
            {"subject_id": 1, "name": "Mathematics", "code": "MATH"}
        ],
        "page": 1,
        "pages": 1,
        "total": 2
    }))
    .into_response()
}

async fn handle_rate_note(
    State(state): State<ServerState>,
    mut multipart: Multipart,
) -> Json<Value> {
    let fields = collect_text_fields(&mut multipart).await;
    *state.rating_fields.lock().await = Some(fields);
    if *state.rating_logged_out.lock().await {
        return Json(json!({"success": false, "message": "Please log in to rate notes."}));
    }
    Json(json!({
        "success": true,
        "message": "Rating submitted successfully!",
        "average_rating": 4.5
    }))
}

async fn handle_upload(State(state): State<ServerState>, mut multipart: Multipart) -> Json<Value> {
    let mut fields = HashMap::new();
    let mut file_name = None;
    let mut mime_type = None;
    let mut byte_len = 0;
    while let Some(field) = multipart.next_field().await.expect("read multipart field") {
        let name = field.name().unwrap_or_default().to_string();
        if name == "file" {
            file_name = field.file_name().map(ToString::to_string);
            mime_type = field.content_type().map(ToString::to_string);
            byte_len = field.bytes().await.expect("file bytes").len();
        } else {
            fields.insert(name, field.text().await.expect("field text"));
        }
    }
    state.uploads.lock().await.push(RecordedUpload {
        fields,
        file_name,
        mime_type,
        byte_len,
    });
    Json(json!({
        "success": true,
        "message": "Note uploaded successfully! It will be visible after admin approval."
    }))
}

async fn handle_delete(State(state): State<ServerState>, Path(note_id): Path<i64>) -> Json<Value> {
    state.deleted_notes.lock().await.push(note_id);
    Json(json!({
        "success": true,
        "message": "Note \"Laplace transforms\" deleted successfully!"
    }))
}

async fn handle_download(Path(note_id): Path<i64>) -> axum::response::Response {
    match note_id {
        401 => (
            StatusCode::UNAUTHORIZED,
            Json(json!({"success": false, "message": "Please log in to download notes."})),
        )
            .into_response(),
        404 => (
            StatusCode::NOT_FOUND,
            Json(json!({"success": false, "message": "File not found!"})),
        )
            .into_response(),
        _ => (
            [(
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"physics-notes.pdf\"",
            )],
            b"%PDF-1.4 stub".to_vec(),
        )
            .into_response(),
    }
}

async fn handle_thumbnail(Path(_note_id): Path<String>) -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "image/png")],
        vec![0x89, b'P', b'N', b'G'],
    )
}

async fn spawn_notes_server() -> Result<(String, ServerState)> {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    let state = ServerState::default();
    let app = Router::new()
        .route("/login", post(handle_login))
        .route("/view_notes", get(handle_view_notes))
        .route("/rate_note", post(handle_rate_note))
        .route("/upload_note", post(handle_upload))
        .route("/delete_note/:note_id", post(handle_delete))
        .route("/download/:note_id", get(handle_download))
        .route("/thumbnails/:note_id", get(handle_thumbnail))
        .with_state(state.clone());
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    Ok((format!("http://{addr}"), state))
}

#[test]
fn rejects_unusable_server_urls() {
    let err = NotesClient::new("not a url").expect_err("must fail");
    assert!(matches!(err, ClientError::InvalidServerUrl { .. }));

    let err = NotesClient::new("ftp://127.0.0.1:5000").expect_err("must fail");
    assert!(matches!(err, ClientError::InvalidServerUrl { .. }));
}

#[tokio::test]
async fn login_sends_credentials_with_marker_header() {
    let (server_url, state) = spawn_notes_server().await.expect("spawn server");
    let client = NotesClient::new(&server_url).expect("client");

    let reply = client
        .login("priya@example.edu", "open-sesame")
        .await
        .expect("login");
    assert!(reply.success);
    let user = reply.user.expect("user");
    assert_eq!(user.username, "priya");

    let fields = state.login_fields.lock().await.clone().expect("fields");
    assert_eq!(
        fields.get("email").map(String::as_str),
        Some("priya@example.edu")
    );
    assert_eq!(
        fields.get("password").map(String::as_str),
        Some("open-sesame")
    );
    let markers = state.marker_headers.lock().await.clone();
    assert_eq!(markers, vec![Some("XMLHttpRequest".to_string())]);
}

#[tokio::test]
async fn failed_login_is_a_reply_not_an_error() {
    let (server_url, _state) = spawn_notes_server().await.expect("spawn server");
    let client = NotesClient::new(&server_url).expect("client");

    let reply = client
        .login("priya@example.edu", "wrong")
        .await
        .expect("login");
    assert!(!reply.success);
    assert_eq!(reply.message, "Invalid email or password!");
    assert!(reply.user.is_none());
}

#[tokio::test]
async fn listing_query_carries_only_set_filters() {
    let (server_url, state) = spawn_notes_server().await.expect("spawn server");
    let client = NotesClient::new(&server_url).expect("client");

    let query = NotesQuery {
        subject_id: Some(SubjectId(4)),
        semester: None,
        search: Some("laplace".to_string()),
        sort_by: NotesSortKey::Downloads,
        page: 1,
    };
    let page = client.fetch_notes(&query).await.expect("fetch");
    assert_eq!(page.notes.len(), 2);

    let queries = state.listing_queries.lock().await.clone();
    assert_eq!(queries.len(), 1);
    let params = &queries[0];
    assert_eq!(params.get("subject").map(String::as_str), Some("4"));
    assert_eq!(params.get("search").map(String::as_str), Some("laplace"));
    assert_eq!(params.get("sort").map(String::as_str), Some("downloads"));
    assert!(!params.contains_key("semester"));
    assert!(!params.contains_key("page"));
}

#[tokio::test]
async fn listing_decodes_notes_and_subjects() {
    let (server_url, state) = spawn_notes_server().await.expect("spawn server");
    let client = NotesClient::new(&server_url).expect("client");

    let page = client
        .fetch_notes(&NotesQuery::default())
        .await
        .expect("fetch");
    assert_eq!(page.total, 2);
    assert_eq!(page.subjects.len(), 1);
    assert_eq!(page.subjects[0].code, "MATH");

    let first = &page.notes[0];
    assert_eq!(first.note_id, NoteId(7));
    assert_eq!(first.thumbnail_url.as_deref(), Some("/thumbnails/7.png"));
    assert!(first.mine);

    let second = &page.notes[1];
    assert_eq!(second.description, "");
    assert_eq!(second.thumbnail_url, None);
    assert!(!second.mine);

    let markers = state.marker_headers.lock().await.clone();
    assert_eq!(markers, vec![Some("XMLHttpRequest".to_string())]);
}

#[tokio::test]
async fn listing_html_reply_surfaces_as_decode_error() {
    let (server_url, state) = spawn_notes_server().await.expect("spawn server");
    let client = NotesClient::new(&server_url).expect("client");

    *state.listing_html.lock().await = true;
    let err = client
        .fetch_notes(&NotesQuery::default())
        .await
        .expect_err("must fail");
    assert!(matches!(err, ClientError::Decode(_)));
}

#[tokio::test]
async fn rating_round_trips_form_fields() {
    let (server_url, state) = spawn_notes_server().await.expect("spawn server");
    let client = NotesClient::new(&server_url).expect("client");

    let reply = client.rate_note(NoteId(42), 5).await.expect("rate");
    assert!(reply.success);
    assert_eq!(reply.message, "Rating submitted successfully!");
    assert_eq!(reply.average_rating, Some(4.5));

    let fields = state.rating_fields.lock().await.clone().expect("fields");
    assert_eq!(fields.get("note_id").map(String::as_str), Some("42"));
    assert_eq!(fields.get("score").map(String::as_str), Some("5"));
}

#[tokio::test]
async fn rating_while_signed_out_is_a_reply_not_an_error() {
    let (server_url, state) = spawn_notes_server().await.expect("spawn server");
    let client = NotesClient::new(&server_url).expect("client");

    *state.rating_logged_out.lock().await = true;
    let reply = client.rate_note(NoteId(42), 4).await.expect("rate");
    assert!(!reply.success);
    assert_eq!(reply.message, "Please log in to rate notes.");
    assert_eq!(reply.average_rating, None);
}

#[tokio::test]
async fn upload_carries_file_part_and_metadata() {
    let (server_url, state) = spawn_notes_server().await.expect("spawn server");
    let client = NotesClient::new(&server_url).expect("client");

    let upload = NoteUpload {
        title: "Laplace transforms".to_string(),
        description: "Worked examples.".to_string(),
        subject_id: SubjectId(1),
        semester: 3,
        file: FilePart {
            field_name: "file".to_string(),
            file_name: "laplace.pdf".to_string(),
            mime_type: Some("application/pdf".to_string()),
            bytes: b"%PDF-1.4 stub".to_vec(),
        },
    };
    let reply = client.upload_note(upload).await.expect("upload");
    assert!(reply.success);

    let uploads = state.uploads.lock().await.clone();
    assert_eq!(uploads.len(), 1);
    let recorded = &uploads[0];
    assert_eq!(
        recorded.fields.get("title").map(String::as_str),
        Some("Laplace transforms")
    );
    assert_eq!(
        recorded.fields.get("subject_id").map(String::as_str),
        Some("1")
    );
    assert_eq!(
        recorded.fields.get("semester").map(String::as_str),
        Some("3")
    );
    assert_eq!(recorded.file_name.as_deref(), Some("laplace.pdf"));
    assert_eq!(recorded.mime_type.as_deref(), Some("application/pdf"));
    assert_eq!(recorded.byte_len, 13);
}

#[tokio::test]
async fn delete_posts_to_the_note_path() {
    let (server_url, state) = spawn_notes_server().await.expect("spawn server");
    let client = NotesClient::new(&server_url).expect("client");

    let reply = client.delete_note(NoteId(7)).await.expect("delete");
    assert!(reply.success);
    assert_eq!(state.deleted_notes.lock().await.clone(), vec![7]);
}

#[tokio::test]
async fn download_uses_the_attachment_file_name() {
    let (server_url, _state) = spawn_notes_server().await.expect("spawn server");
    let client = NotesClient::new(&server_url).expect("client");

    let download = client.download_note(NoteId(7)).await.expect("download");
    assert_eq!(download.file_name.as_deref(), Some("physics-notes.pdf"));
    assert_eq!(download.bytes, b"%PDF-1.4 stub".to_vec());
}

#[tokio::test]
async fn unauthorized_reply_surfaces_as_api_error() {
    let (server_url, _state) = spawn_notes_server().await.expect("spawn server");
    let client = NotesClient::new(&server_url).expect("client");

    let err = client
        .download_note(NoteId(401))
        .await
        .expect_err("must fail");
    assert_eq!(err.api_code(), Some(ErrorCode::Unauthorized));
    match err {
        ClientError::Api(api) => {
            assert_eq!(api.message, "Please log in to download notes.");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn missing_download_maps_to_not_found() {
    let (server_url, _state) = spawn_notes_server().await.expect("spawn server");
    let client = NotesClient::new(&server_url).expect("client");

    let err = client
        .download_note(NoteId(404))
        .await
        .expect_err("must fail");
    assert_eq!(err.api_code(), Some(ErrorCode::NotFound));
}

#[tokio::test]
async fn preview_resolves_relative_urls_against_the_server() {
    let (server_url, _state) = spawn_notes_server().await.expect("spawn server");
    let client = NotesClient::new(&server_url).expect("client");

    let bytes = client
        .fetch_preview("/thumbnails/7.png")
        .await
        .expect("preview");
    assert_eq!(bytes, vec![0x89, b'P', b'N', b'G']);
}
