//! Debounced search input with a pluggable suggestion provider.

use std::time::{Duration, Instant};

use crate::debounce::Debouncer;

pub const SUGGESTION_DEBOUNCE: Duration = Duration::from_millis(300);
/// Queries shorter than this clear the suggestion list instead of asking
/// the provider.
pub const SUGGESTION_MIN_CHARS: usize = 2;

pub trait SuggestionProvider {
    fn suggest(&self, query: &str) -> Vec<String>;
}

/// Inert provider: never suggests anything and performs no I/O. The
/// debounced wiring around it is real, so a live provider can slot in.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoSuggestions;

impl SuggestionProvider for NoSuggestions {
    fn suggest(&self, _query: &str) -> Vec<String> {
        Vec::new()
    }
}

#[derive(Debug)]
pub struct SearchBox {
    debouncer: Debouncer<String>,
    suggestions: Vec<String>,
}

impl Default for SearchBox {
    fn default() -> Self {
        Self::new()
    }
}

impl SearchBox {
    pub fn new() -> Self {
        Self {
            debouncer: Debouncer::new(SUGGESTION_DEBOUNCE),
            suggestions: Vec::new(),
        }
    }

    pub fn input(&mut self, text: &str, now: Instant) {
        self.debouncer.call(text.to_string(), now);
    }

    /// Returns the settled query once typing quiesces, refreshing the
    /// suggestion list along the way. The caller applies the query to its
    /// own filtering.
    pub fn poll(&mut self, now: Instant, provider: &dyn SuggestionProvider) -> Option<String> {
        let query = self.debouncer.poll(now)?;
        if query.chars().count() < SUGGESTION_MIN_CHARS {
            self.suggestions.clear();
        } else {
            self.suggestions = provider.suggest(&query);
        }
        Some(query)
    }

    pub fn suggestions(&self) -> &[String] {
        &self.suggestions
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct CannedSuggestions(Vec<String>);

    impl SuggestionProvider for CannedSuggestions {
        fn suggest(&self, _query: &str) -> Vec<String> {
            self.0.clone()
        }
    }

    #[test]
    fn typing_settles_into_one_query_with_final_text() {
        let t0 = Instant::now();
        let mut search = SearchBox::new();

        search.input("l", t0);
        search.input("la", t0 + Duration::from_millis(80));
        search.input("laplace", t0 + Duration::from_millis(160));

        let settle = t0 + Duration::from_millis(160) + SUGGESTION_DEBOUNCE;
        assert_eq!(search.poll(settle - Duration::from_millis(1), &NoSuggestions), None);
        assert_eq!(
            search.poll(settle, &NoSuggestions),
            Some("laplace".to_string())
        );
        assert_eq!(search.poll(settle + Duration::from_secs(1), &NoSuggestions), None);
    }

    #[test]
    fn short_queries_clear_suggestions() {
        let t0 = Instant::now();
        let mut search = SearchBox::new();
        let provider = CannedSuggestions(vec!["laplace transforms".to_string()]);

        search.input("la", t0);
        search.poll(t0 + SUGGESTION_DEBOUNCE, &provider);
        assert_eq!(search.suggestions().len(), 1);

        search.input("l", t0 + SUGGESTION_DEBOUNCE);
        search.poll(t0 + SUGGESTION_DEBOUNCE * 2, &provider);
        assert!(search.suggestions().is_empty());
    }

    #[test]
    fn inert_provider_never_suggests() {
        let t0 = Instant::now();
        let mut search = SearchBox::new();
        search.input("laplace", t0);
        search.poll(t0 + SUGGESTION_DEBOUNCE, &NoSuggestions);
        assert!(search.suggestions().is_empty());
    }
}
