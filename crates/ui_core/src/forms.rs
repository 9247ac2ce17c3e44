//! Form-side behaviors: field validation with focus-first-invalid, the
//! submit-loading guard with its fallback restore, confirmation guarding
//! for dangerous actions, and the password reveal toggle.

use std::time::{Duration, Instant};

/// Restore window for a submit button whose response never arrives. The
/// transport timeout is the real cancellation; this is the safety net.
pub const SUBMIT_FALLBACK: Duration = Duration::from_secs(10);

pub const DEFAULT_CONFIRM_MESSAGE: &str = "Are you sure?";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Requirement {
    NonEmpty,
    Email,
    IntegerInRange { min: i64, max: i64 },
    HttpUrl,
}

/// Same permissive shape the browser applies to email inputs: something
/// before and after a single `@`, no whitespace. Deliverability is the
/// server's problem.
fn is_email_shaped(value: &str) -> bool {
    let mut parts = value.splitn(2, '@');
    match (parts.next(), parts.next()) {
        (Some(local), Some(domain)) => {
            !local.is_empty()
                && !domain.is_empty()
                && !domain.contains('@')
                && !value.contains(char::is_whitespace)
        }
        _ => false,
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FieldRule<K> {
    pub field: K,
    pub label: &'static str,
    pub requirement: Requirement,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError<K> {
    pub field: K,
    pub message: String,
}

/// Checks every rule against the current draft values. Errors come back in
/// rule declaration order, so the first entry is the field to focus.
pub fn validate_fields<K: Copy>(
    rules: &[FieldRule<K>],
    value_of: impl Fn(K) -> String,
) -> Vec<FieldError<K>> {
    let mut errors = Vec::new();
    for rule in rules {
        let value = value_of(rule.field);
        let trimmed = value.trim();
        let message = match rule.requirement {
            Requirement::NonEmpty => {
                if trimmed.is_empty() {
                    Some(format!("{} is required.", rule.label))
                } else {
                    None
                }
            }
            Requirement::Email => {
                if trimmed.is_empty() {
                    Some(format!("{} is required.", rule.label))
                } else if !is_email_shaped(trimmed) {
                    Some(format!("{} must be a valid email address.", rule.label))
                } else {
                    None
                }
            }
            Requirement::IntegerInRange { min, max } => match trimmed.parse::<i64>() {
                Ok(number) if (min..=max).contains(&number) => None,
                Ok(_) => Some(format!("{} must be between {min} and {max}.", rule.label)),
                Err(_) => Some(format!("{} must be a number.", rule.label)),
            },
            Requirement::HttpUrl => {
                if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
                    None
                } else {
                    Some(format!(
                        "{} must start with http:// or https://.",
                        rule.label
                    ))
                }
            }
        };
        if let Some(message) = message {
            errors.push(FieldError {
                field: rule.field,
                message,
            });
        }
    }
    errors
}

/// Per-form validation bookkeeping: once a submit was attempted the form is
/// "validated" (errors render), and the first invalid field is queued for a
/// one-shot focus grab.
#[derive(Debug)]
pub struct FormGuard<K> {
    was_validated: bool,
    pending_focus: Option<K>,
    errors: Vec<FieldError<K>>,
}

impl<K> Default for FormGuard<K> {
    fn default() -> Self {
        Self {
            was_validated: false,
            pending_focus: None,
            errors: Vec::new(),
        }
    }
}

impl<K: Copy + PartialEq> FormGuard<K> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs validation for a submit attempt. Returns true when the form may
    /// proceed; otherwise the submission is cancelled and the first invalid
    /// field is queued for focus.
    pub fn check(&mut self, rules: &[FieldRule<K>], value_of: impl Fn(K) -> String) -> bool {
        let errors = validate_fields(rules, value_of);
        self.was_validated = true;
        self.pending_focus = errors.first().map(|error| error.field);
        let ok = errors.is_empty();
        self.errors = errors;
        ok
    }

    pub fn was_validated(&self) -> bool {
        self.was_validated
    }

    /// The field that should grab focus, handed out once.
    pub fn take_focus(&mut self) -> Option<K> {
        self.pending_focus.take()
    }

    pub fn error_for(&self, field: K) -> Option<&str> {
        self.errors
            .iter()
            .find(|error| error.field == field)
            .map(|error| error.message.as_str())
    }

    pub fn reset(&mut self) {
        self.was_validated = false;
        self.pending_focus = None;
        self.errors.clear();
    }
}

/// Disables a submit control while a request is in flight and swaps its
/// label for a spinner; restored on completion or by the fallback timer.
#[derive(Debug, Default, Clone, Copy)]
pub struct SubmitGuard {
    busy_since: Option<Instant>,
}

impl SubmitGuard {
    pub fn begin(&mut self, now: Instant) -> bool {
        if self.busy_since.is_some() {
            return false;
        }
        self.busy_since = Some(now);
        true
    }

    pub fn finish(&mut self) {
        self.busy_since = None;
    }

    pub fn is_busy(&self) -> bool {
        self.busy_since.is_some()
    }

    /// Fallback restore for dropped responses; returns true when it fired.
    pub fn tick(&mut self, now: Instant) -> bool {
        match self.busy_since {
            Some(since) if now.duration_since(since) >= SUBMIT_FALLBACK => {
                self.busy_since = None;
                tracing::warn!("submit guard restored a button after the fallback window");
                true
            }
            _ => false,
        }
    }
}

/// Withholds a flagged action until the user confirms it.
#[derive(Debug)]
pub struct ConfirmGuard<A> {
    pending: Option<(A, String)>,
}

impl<A> Default for ConfirmGuard<A> {
    fn default() -> Self {
        Self { pending: None }
    }
}

impl<A> ConfirmGuard<A> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn request(&mut self, action: A, message: impl Into<String>) {
        let message = message.into();
        let message = if message.is_empty() {
            DEFAULT_CONFIRM_MESSAGE.to_string()
        } else {
            message
        };
        self.pending = Some((action, message));
    }

    pub fn pending(&self) -> Option<(&A, &str)> {
        self.pending
            .as_ref()
            .map(|(action, message)| (action, message.as_str()))
    }

    pub fn accept(&mut self) -> Option<A> {
        self.pending.take().map(|(action, _)| action)
    }

    pub fn cancel(&mut self) {
        self.pending = None;
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PasswordVisibility {
    revealed: bool,
}

impl PasswordVisibility {
    pub fn toggle(&mut self) {
        self.revealed = !self.revealed;
    }

    pub fn is_revealed(self) -> bool {
        self.revealed
    }

    pub fn icon(self) -> &'static str {
        if self.revealed {
            "eye-slash"
        } else {
            "eye"
        }
    }
}

/// Desired row count for an auto-resizing multiline field.
pub fn auto_resize_rows(text: &str, min_rows: usize, max_rows: usize) -> usize {
    let rows = text.matches('\n').count() + 1;
    rows.clamp(min_rows, max_rows)
}
