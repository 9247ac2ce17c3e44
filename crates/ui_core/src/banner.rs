//! Transient notification banners: dismissible, auto-expiring, stacked.

use std::time::{Duration, Instant};

pub const DEFAULT_BANNER_TTL: Duration = Duration::from_secs(3);
/// Service flash messages linger a little longer than inline feedback.
pub const FLASH_BANNER_TTL: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Success,
    Danger,
    Info,
}

#[derive(Debug, Clone)]
pub struct Banner {
    pub id: u64,
    pub severity: Severity,
    pub message: String,
    expires_at: Instant,
}

impl Banner {
    pub fn expired(&self, now: Instant) -> bool {
        now >= self.expires_at
    }
}

#[derive(Debug, Default)]
pub struct BannerStack {
    banners: Vec<Banner>,
    next_id: u64,
}

impl BannerStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, severity: Severity, message: impl Into<String>, now: Instant) -> u64 {
        self.push_with_ttl(severity, message, DEFAULT_BANNER_TTL, now)
    }

    pub fn push_with_ttl(
        &mut self,
        severity: Severity,
        message: impl Into<String>,
        ttl: Duration,
        now: Instant,
    ) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        let message = message.into();
        tracing::debug!(banner_id = id, severity = ?severity, %message, "banner shown");
        self.banners.push(Banner {
            id,
            severity,
            message,
            expires_at: now + ttl,
        });
        id
    }

    pub fn dismiss(&mut self, id: u64) {
        self.banners.retain(|banner| banner.id != id);
    }

    /// Drops banners whose TTL has elapsed. Called once per frame.
    pub fn prune(&mut self, now: Instant) {
        self.banners.retain(|banner| !banner.expired(now));
    }

    pub fn iter(&self) -> impl Iterator<Item = &Banner> {
        self.banners.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.banners.is_empty()
    }

    pub fn len(&self) -> usize {
        self.banners.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn banners_expire_after_their_ttl() {
        let now = Instant::now();
        let mut stack = BannerStack::new();
        stack.push(Severity::Success, "saved", now);

        stack.prune(now + DEFAULT_BANNER_TTL - Duration::from_millis(1));
        assert_eq!(stack.len(), 1);

        stack.prune(now + DEFAULT_BANNER_TTL);
        assert!(stack.is_empty());
    }

    #[test]
    fn flash_ttl_outlives_default_ttl() {
        let now = Instant::now();
        let mut stack = BannerStack::new();
        stack.push(Severity::Info, "short", now);
        stack.push_with_ttl(Severity::Info, "long", FLASH_BANNER_TTL, now);

        stack.prune(now + Duration::from_secs(4));
        let remaining: Vec<_> = stack.iter().map(|b| b.message.as_str()).collect();
        assert_eq!(remaining, vec!["long"]);
    }

    #[test]
    fn dismiss_removes_only_the_target() {
        let now = Instant::now();
        let mut stack = BannerStack::new();
        let first = stack.push(Severity::Danger, "one", now);
        stack.push(Severity::Danger, "two", now);

        stack.dismiss(first);
        let remaining: Vec<_> = stack.iter().map(|b| b.message.as_str()).collect();
        assert_eq!(remaining, vec!["two"]);
    }

    #[test]
    fn ids_are_not_reused_after_dismiss() {
        let now = Instant::now();
        let mut stack = BannerStack::new();
        let first = stack.push(Severity::Info, "one", now);
        stack.dismiss(first);
        let second = stack.push(Severity::Info, "two", now);
        assert_ne!(first, second);
    }
}
