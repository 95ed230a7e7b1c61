//! Application state shared by all handlers.

use std::time::Duration;

use crate::config::Settings;
use crate::flashcard::PracticePolicy;
use crate::loader::DeckLoader;
use crate::session::SessionStore;

/// Application state passed to all handlers
#[derive(Clone)]
pub struct AppState {
    /// Where decks come from (local database or REST backend)
    pub loader: DeckLoader,

    /// Live flashcard sessions keyed by cookie
    pub sessions: SessionStore,

    pub practice_policy: PracticePolicy,

    /// Delay between passing a quiz and resuming learning
    pub completion_delay: Duration,
}

impl AppState {
    pub fn new(loader: DeckLoader, settings: &Settings) -> Self {
        Self {
            loader,
            sessions: SessionStore::new(settings.session_expiry_hours),
            practice_policy: settings.practice_policy,
            completion_delay: settings.completion_delay,
        }
    }
}
