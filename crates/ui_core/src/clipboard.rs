//! Clipboard capability seam. The desktop shell plugs in a system-backed
//! sink; tests use the in-memory one.

use std::time::Instant;

use thiserror::Error;

use crate::banner::{BannerStack, Severity};

#[derive(Debug, Error)]
#[error("clipboard write failed: {0}")]
pub struct ClipboardError(pub String);

pub trait Clipboard {
    fn set_text(&mut self, text: &str) -> Result<(), ClipboardError>;
}

/// In-memory sink for tests and headless use.
#[derive(Debug, Default)]
pub struct MemoryClipboard {
    pub contents: Option<String>,
}

impl Clipboard for MemoryClipboard {
    fn set_text(&mut self, text: &str) -> Result<(), ClipboardError> {
        self.contents = Some(text.to_string());
        Ok(())
    }
}

/// Copies `text` and reports the outcome as a banner. Returns whether the
/// write succeeded.
pub fn copy_with_feedback(
    sink: &mut dyn Clipboard,
    text: &str,
    banners: &mut BannerStack,
    now: Instant,
) -> bool {
    match sink.set_text(text) {
        Ok(()) => {
            banners.push(Severity::Success, "Copied to clipboard!", now);
            true
        }
        Err(error) => {
            tracing::warn!(%error, "clipboard write failed");
            banners.push(Severity::Danger, "Failed to copy to clipboard", now);
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct BrokenClipboard;

    impl Clipboard for BrokenClipboard {
        fn set_text(&mut self, _text: &str) -> Result<(), ClipboardError> {
            Err(ClipboardError("denied".to_string()))
        }
    }

    #[test]
    fn successful_copy_shows_a_success_banner() {
        let now = Instant::now();
        let mut sink = MemoryClipboard::default();
        let mut banners = BannerStack::new();

        assert!(copy_with_feedback(&mut sink, "share-link", &mut banners, now));
        assert_eq!(sink.contents.as_deref(), Some("share-link"));
        let banner = banners.iter().next().expect("banner");
        assert_eq!(banner.severity, Severity::Success);
        assert_eq!(banner.message, "Copied to clipboard!");
    }

    #[test]
    fn failed_copy_shows_a_danger_banner() {
        let now = Instant::now();
        let mut sink = BrokenClipboard;
        let mut banners = BannerStack::new();

        assert!(!copy_with_feedback(&mut sink, "x", &mut banners, now));
        let banner = banners.iter().next().expect("banner");
        assert_eq!(banner.severity, Severity::Danger);
        assert_eq!(banner.message, "Failed to copy to clipboard");
    }
}
