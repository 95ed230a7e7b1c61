//! In-memory storage for flashcard sessions.
//!
//! Sessions are keyed by a random ID (from cookie) and expire after a
//! configurable duration of inactivity. Dropping a session cancels its
//! pending practice completion.

use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::config;
use crate::flashcard::{CompletionTimer, FlashcardSession};

/// Session entry with last access time for expiration
struct SessionEntry {
  session: FlashcardSession,
  last_access: DateTime<Utc>,
}

#[derive(Clone)]
pub struct SessionStore {
  sessions: Arc<Mutex<HashMap<String, SessionEntry>>>,
  expiry: Duration,
}

impl SessionStore {
  pub fn new(expiry_hours: i64) -> Self {
    Self {
      sessions: Arc::new(Mutex::new(HashMap::new())),
      expiry: Duration::hours(expiry_hours),
    }
  }

  fn lock(&self) -> MutexGuard<'_, HashMap<String, SessionEntry>> {
    // Sessions hold no invariants that a panicking holder could break halfway
    self.sessions.lock().unwrap_or_else(PoisonError::into_inner)
  }

  /// Store a new session and return its ID
  pub fn insert(&self, session: FlashcardSession) -> String {
    let id = generate_session_id();
    let mut sessions = self.lock();

    // Clean up expired sessions occasionally (~10% chance)
    if rand::random::<u8>() < config::SESSION_CLEANUP_THRESHOLD {
      self.cleanup_expired(&mut sessions);
    }

    sessions.insert(
      id.clone(),
      SessionEntry {
        session,
        last_access: Utc::now(),
      },
    );
    id
  }

  /// Run `f` against a live session. Returns `None` for unknown or expired IDs.
  pub fn with_session<T>(&self, id: &str, f: impl FnOnce(&mut FlashcardSession) -> T) -> Option<T> {
    let mut sessions = self.lock();
    let now = Utc::now();

    let expired = sessions
      .get(id)
      .is_some_and(|entry| entry.last_access <= now - self.expiry);
    if expired {
      sessions.remove(id);
      return None;
    }

    let entry = sessions.get_mut(id)?;
    entry.last_access = now;
    Some(f(&mut entry.session))
  }

  /// Tear a session down. Any pending completion timer is cancelled.
  pub fn remove(&self, id: &str) -> bool {
    self.lock().remove(id).is_some()
  }

  pub fn len(&self) -> usize {
    self.lock().len()
  }

  pub fn is_empty(&self) -> bool {
    self.lock().is_empty()
  }

  /// After `delay`, leave the passed quiz `batch_id` of session `id`.
  ///
  /// The timer lives inside the session, so removing or expiring the session
  /// cancels it. A firing that finds the session gone or moved on is a no-op.
  pub fn schedule_completion(&self, id: &str, batch_id: u64, delay: std::time::Duration) -> bool {
    let store = self.clone();
    let session_id = id.to_string();
    let timer = CompletionTimer::start(delay, move || {
      let finished = store.with_session(&session_id, |session| session.finish_practice(batch_id));
      if finished.is_none() {
        tracing::debug!(batch_id, "Practice completion fired for a closed session");
      }
    });

    self
      .with_session(id, |session| session.arm_completion(batch_id, timer))
      .unwrap_or(false)
  }

  fn cleanup_expired(&self, sessions: &mut HashMap<String, SessionEntry>) {
    let cutoff = Utc::now() - self.expiry;
    let before = sessions.len();
    sessions.retain(|_, entry| entry.last_access > cutoff);
    let removed = before - sessions.len();
    if removed > 0 {
      tracing::debug!("Expired {} flashcard sessions", removed);
    }
  }
}

/// Generate a new session ID
pub fn generate_session_id() -> String {
  use rand::Rng;
  let mut rng = rand::rng();
  (0..32)
    .map(|_| {
      let idx = rng.random_range(0..36u8);
      if idx < 10 {
        (b'0' + idx) as char
      } else {
        (b'a' + idx - 10) as char
      }
    })
    .collect()
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::domain::{Card, Deck, SubtopicMeta};
  use crate::flashcard::{Mode, Navigation, PracticePolicy};
  use std::time::Duration as StdDuration;

  fn session() -> FlashcardSession {
    let cards = ["A", "B", "C", "D", "E", "F"]
      .iter()
      .enumerate()
      .map(|(i, w)| Card::new(i as i64 + 1, "/media/x.mp4", "Letters", w, None))
      .collect();
    let meta = SubtopicMeta {
      subtopic_id: 1,
      topic_name: "Alphabet".to_string(),
      subtopic_name: "Letters".to_string(),
    };
    FlashcardSession::new(meta, Deck::new(cards).unwrap(), PracticePolicy::default())
  }

  /// Walk a stored session into a passed quiz and return its batch id
  fn pass_first_quiz(store: &SessionStore, id: &str) -> u64 {
    store
      .with_session(id, |s| {
        let mut rng = rand::rng();
        s.advance(&mut rng);
        let batch_id = match s.advance(&mut rng) {
          Navigation::PracticeStarted(b) => b.id,
          other => panic!("expected practice, got {:?}", other),
        };
        s.select_answer(1, "A");
        s.select_answer(2, "B");
        s.submit();
        batch_id
      })
      .unwrap()
  }

  fn mode_and_index(store: &SessionStore, id: &str) -> (bool, usize) {
    store
      .with_session(id, |s| {
        (s.controller().mode() == &Mode::Learn, s.controller().current_index())
      })
      .unwrap()
  }

  #[test]
  fn test_generate_session_id_shape() {
    let id = generate_session_id();
    assert_eq!(id.len(), 32);
    assert!(id.chars().all(|c| c.is_ascii_digit() || c.is_ascii_lowercase()));
    assert_ne!(id, generate_session_id());
  }

  #[test]
  fn test_insert_and_remove() {
    let store = SessionStore::new(1);
    let id = store.insert(session());
    assert_eq!(store.len(), 1);
    assert_eq!(store.with_session(&id, |s| s.deck().len()), Some(6));

    assert!(store.remove(&id));
    assert!(!store.remove(&id));
    assert!(store.is_empty());
    assert_eq!(store.with_session(&id, |s| s.deck().len()), None);
  }

  #[test]
  fn test_unknown_session() {
    let store = SessionStore::new(1);
    assert!(store.with_session("missing", |_| ()).is_none());
  }

  #[test]
  fn test_expired_session_is_dropped() {
    let store = SessionStore::new(0);
    let id = store.insert(session());
    assert!(store.with_session(&id, |_| ()).is_none());
    assert!(store.is_empty());
  }

  #[tokio::test(start_paused = true)]
  async fn test_completion_fires_after_delay() {
    let store = SessionStore::new(1);
    let id = store.insert(session());
    let batch_id = pass_first_quiz(&store, &id);

    assert!(store.schedule_completion(&id, batch_id, StdDuration::from_millis(1500)));
    assert_eq!(mode_and_index(&store, &id), (false, 1));

    tokio::time::sleep(StdDuration::from_millis(1600)).await;
    assert_eq!(mode_and_index(&store, &id), (true, 2));
  }

  #[tokio::test(start_paused = true)]
  async fn test_teardown_cancels_completion() {
    let store = SessionStore::new(1);
    let id = store.insert(session());
    let batch_id = pass_first_quiz(&store, &id);

    assert!(store.schedule_completion(&id, batch_id, StdDuration::from_millis(1500)));
    assert!(store.remove(&id));

    tokio::time::sleep(StdDuration::from_secs(5)).await;
    assert!(store.is_empty());
  }

  #[tokio::test(start_paused = true)]
  async fn test_schedule_refused_for_unpassed_quiz() {
    let store = SessionStore::new(1);
    let id = store.insert(session());
    store
      .with_session(&id, |s| {
        let mut rng = rand::rng();
        s.advance(&mut rng);
        s.advance(&mut rng);
      })
      .unwrap();

    assert!(!store.schedule_completion(&id, 1, StdDuration::from_millis(10)));
    tokio::time::sleep(StdDuration::from_secs(1)).await;
    assert_eq!(mode_and_index(&store, &id), (false, 1));
  }

  #[tokio::test(start_paused = true)]
  async fn test_schedule_for_missing_session() {
    let store = SessionStore::new(1);
    assert!(!store.schedule_completion("gone", 1, StdDuration::from_millis(10)));
  }
}
