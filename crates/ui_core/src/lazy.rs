//! Deferred-source loading. Each entry starts fetching the first time it
//! becomes visible and is never watched again afterwards, whatever the
//! outcome.

use std::collections::HashMap;
use std::hash::Hash;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LazyState {
    #[default]
    NotRequested,
    Loading,
    Ready,
    Failed(String),
}

#[derive(Debug)]
pub struct LazyLoader<K> {
    states: HashMap<K, LazyState>,
}

impl<K> Default for LazyLoader<K> {
    fn default() -> Self {
        Self {
            states: HashMap::new(),
        }
    }
}

impl<K: Copy + Eq + Hash> LazyLoader<K> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Report that `id` is visible. Returns true exactly once per entry,
    /// which is the caller's cue to start the fetch.
    pub fn mark_visible(&mut self, id: K) -> bool {
        match self.states.get(&id) {
            None => {
                self.states.insert(id, LazyState::Loading);
                true
            }
            Some(_) => false,
        }
    }

    pub fn resolve_ready(&mut self, id: K) {
        self.states.insert(id, LazyState::Ready);
    }

    pub fn resolve_failed(&mut self, id: K, reason: impl Into<String>) {
        self.states.insert(id, LazyState::Failed(reason.into()));
    }

    pub fn state_of(&self, id: K) -> &LazyState {
        self.states.get(&id).unwrap_or(&LazyState::NotRequested)
    }
}
