//! Upload guard: MIME/extension allow-list and size ceiling for
//! user-picked files, plus the name/size preview for accepted ones.

use thiserror::Error;

use crate::format::format_file_size;

pub const MAX_UPLOAD_BYTES: u64 = 16 * 1024 * 1024;

pub const ALLOWED_EXTENSIONS: &[&str] = &["pdf", "doc", "docx"];

pub const ALLOWED_MIME_TYPES: &[&str] = &[
    "application/pdf",
    "application/msword",
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
];

/// A user-picked file before it is accepted. The MIME type is whatever the
/// picker reported and may be absent.
#[derive(Debug, Clone)]
pub struct FileCandidate {
    pub file_name: String,
    pub mime_type: Option<String>,
    pub size_bytes: u64,
}

/// Rejection messages double as the banner copy shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UploadRejection {
    #[error("Please upload only PDF, DOC, or DOCX files.")]
    DisallowedType,
    #[error("File size must be less than 16MB.")]
    TooLarge,
}

#[derive(Debug, Clone)]
pub struct UploadPolicy {
    allowed_extensions: Vec<String>,
    allowed_mime_types: Vec<String>,
    max_size_bytes: u64,
}

impl Default for UploadPolicy {
    fn default() -> Self {
        Self {
            allowed_extensions: ALLOWED_EXTENSIONS.iter().map(|s| s.to_string()).collect(),
            allowed_mime_types: ALLOWED_MIME_TYPES.iter().map(|s| s.to_string()).collect(),
            max_size_bytes: MAX_UPLOAD_BYTES,
        }
    }
}

impl UploadPolicy {
    /// Accepts a candidate when either its MIME type or its extension is on
    /// the allow-list; both must fail for a type rejection. Size is checked
    /// after type. On rejection the caller clears the selection and shows
    /// the rejection text as a danger banner.
    pub fn check(&self, candidate: &FileCandidate) -> Result<UploadPreview, UploadRejection> {
        let extension_ok = extension_of(&candidate.file_name)
            .map(|ext| self.allowed_extensions.iter().any(|allowed| *allowed == ext))
            .unwrap_or(false);
        let mime_ok = candidate
            .mime_type
            .as_deref()
            .map(|mime| self.allowed_mime_types.iter().any(|allowed| allowed == mime))
            .unwrap_or(false);
        if !extension_ok && !mime_ok {
            return Err(UploadRejection::DisallowedType);
        }
        if candidate.size_bytes > self.max_size_bytes {
            return Err(UploadRejection::TooLarge);
        }
        Ok(UploadPreview {
            file_name: candidate.file_name.clone(),
            size_label: format_file_size(candidate.size_bytes),
        })
    }
}

/// Name/size pair rendered once a file passes the guard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadPreview {
    pub file_name: String,
    pub size_label: String,
}

fn extension_of(file_name: &str) -> Option<String> {
    let (_, extension) = file_name.rsplit_once('.')?;
    Some(extension.to_ascii_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(name: &str, mime: Option<&str>, size: u64) -> FileCandidate {
        FileCandidate {
            file_name: name.to_string(),
            mime_type: mime.map(|m| m.to_string()),
            size_bytes: size,
        }
    }

    #[test]
    fn accepts_allowed_documents() {
        let policy = UploadPolicy::default();
        for name in ["notes.pdf", "notes.doc", "notes.docx", "NOTES.PDF"] {
            assert!(policy.check(&candidate(name, None, 4096)).is_ok(), "{name}");
        }
    }

    #[test]
    fn rejects_when_both_extension_and_mime_are_disallowed() {
        let policy = UploadPolicy::default();
        let err = policy
            .check(&candidate("payload.exe", Some("application/octet-stream"), 10))
            .expect_err("must reject");
        assert_eq!(err, UploadRejection::DisallowedType);
        assert_eq!(
            err.to_string(),
            "Please upload only PDF, DOC, or DOCX files."
        );
    }

    #[test]
    fn either_extension_or_mime_is_enough() {
        let policy = UploadPolicy::default();
        // Wrong extension, allowed MIME.
        assert!(policy
            .check(&candidate("scan.tmp", Some("application/pdf"), 10))
            .is_ok());
        // Allowed extension, wrong MIME.
        assert!(policy
            .check(&candidate("scan.pdf", Some("application/octet-stream"), 10))
            .is_ok());
        // Allowed extension, no MIME reported.
        assert!(policy.check(&candidate("scan.pdf", None, 10)).is_ok());
    }

    #[test]
    fn rejects_oversized_files_even_with_allowed_type() {
        let policy = UploadPolicy::default();
        let err = policy
            .check(&candidate("big.pdf", Some("application/pdf"), MAX_UPLOAD_BYTES + 1))
            .expect_err("must reject");
        assert_eq!(err, UploadRejection::TooLarge);
        assert_eq!(err.to_string(), "File size must be less than 16MB.");
    }

    #[test]
    fn size_ceiling_is_inclusive() {
        let policy = UploadPolicy::default();
        assert!(policy
            .check(&candidate("exact.pdf", None, MAX_UPLOAD_BYTES))
            .is_ok());
    }

    #[test]
    fn extensionless_names_fall_back_to_mime() {
        let policy = UploadPolicy::default();
        assert!(policy
            .check(&candidate("README", Some("application/pdf"), 10))
            .is_ok());
        assert!(policy.check(&candidate("README", None, 10)).is_err());
    }

    #[test]
    fn preview_carries_name_and_formatted_size() {
        let policy = UploadPolicy::default();
        let preview = policy
            .check(&candidate("lecture.pdf", None, 1536))
            .expect("accept");
        assert_eq!(preview.file_name, "lecture.pdf");
        assert_eq!(preview.size_label, "1.5 KB");
    }
}
