//! Headless UI behavior layer for the NotesDesk client.
//!
//! Every widget-side behavior (theme preference, transient banners, form
//! validation, upload guarding, star ratings, table sorting, debouncing,
//! lazy thumbnail loading) lives here as an explicit state object. Timing
//! is injected (`Instant` arguments, never internal clocks) and the only
//! platform touchpoints are small capability traits, so the whole layer
//! unit-tests without a running UI.

pub mod banner;
pub mod clipboard;
pub mod debounce;
pub mod format;
pub mod forms;
pub mod lazy;
pub mod rating;
pub mod scroll;
pub mod search;
pub mod table;
pub mod theme;
pub mod upload;

pub use banner::{Banner, BannerStack, Severity, DEFAULT_BANNER_TTL, FLASH_BANNER_TTL};
pub use clipboard::{copy_with_feedback, Clipboard, ClipboardError, MemoryClipboard};
pub use debounce::Debouncer;
pub use format::format_file_size;
pub use forms::{
    auto_resize_rows, validate_fields, ConfirmGuard, FieldError, FieldRule, FormGuard,
    PasswordVisibility, Requirement, SubmitGuard, DEFAULT_CONFIRM_MESSAGE, SUBMIT_FALLBACK,
};
pub use lazy::{LazyLoader, LazyState};
pub use rating::{format_average, StarRating, STAR_COUNT};
pub use scroll::{BackToTop, BACK_TO_TOP_THRESHOLD};
pub use search::{
    NoSuggestions, SearchBox, SuggestionProvider, SUGGESTION_DEBOUNCE, SUGGESTION_MIN_CHARS,
};
pub use table::{compare_sort_values, sort_rows, SortDirection, SortState};
pub use theme::Theme;
pub use upload::{
    FileCandidate, UploadPolicy, UploadPreview, UploadRejection, ALLOWED_EXTENSIONS,
    ALLOWED_MIME_TYPES, MAX_UPLOAD_BYTES,
};
