//! Learn/practice navigation state machine.
//!
//! The controller decides which card is shown and when learning is
//! interrupted by a practice quiz. Practice triggers on a forward advance
//! whose target index is a multiple of the practice interval, and the quiz
//! covers the interval's worth of cards just seen.

use std::ops::Range;

use serde::Serialize;

use crate::config;
use crate::domain::{Card, Deck};

/// Spacing between practice quizzes for a deck of `deck_len` cards.
/// Zero means practice never triggers.
pub fn practice_interval(deck_len: usize) -> usize {
  deck_len / config::PRACTICE_INTERVAL_DIVISOR
}

/// Options that change when practice triggers
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PracticePolicy {
  /// Also trigger when advancing from the last card lands on a multiple of
  /// the interval, quizzing the final batch before wrapping to index 0.
  pub practice_on_wrap: bool,
}

/// Contiguous run of recently viewed cards quizzed together
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PracticeBatch {
  pub id: u64,
  pub start: usize,
  pub end: usize,
}

impl PracticeBatch {
  pub fn indices(&self) -> Range<usize> {
    self.start..self.end
  }

  pub fn len(&self) -> usize {
    self.end - self.start
  }

  pub fn is_empty(&self) -> bool {
    self.start == self.end
  }

  pub fn cards<'a>(&self, deck: &'a Deck) -> &'a [Card] {
    &deck.cards()[self.indices()]
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
  Learn,
  Practice(PracticeBatch),
}

impl Mode {
  pub fn is_practice(&self) -> bool {
    matches!(self, Mode::Practice(_))
  }

  pub fn as_str(&self) -> &'static str {
    match self {
      Mode::Learn => "learn",
      Mode::Practice(_) => "practice",
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionState {
  pub current_index: usize,
  pub is_flipped: bool,
  pub mode: Mode,
}

/// Result of a navigation request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigation {
  Moved { index: usize },
  PracticeStarted(PracticeBatch),
  /// Navigation is disabled while a quiz is open
  Blocked,
}

#[derive(Debug, Clone)]
pub struct SessionController {
  deck_len: usize,
  interval: usize,
  policy: PracticePolicy,
  state: SessionState,
  next_batch_id: u64,
}

impl SessionController {
  /// Start at the first card in learn mode. Takes the deck so an empty
  /// session cannot be constructed.
  pub fn new(deck: &Deck, policy: PracticePolicy) -> Self {
    Self {
      deck_len: deck.len(),
      interval: practice_interval(deck.len()),
      policy,
      state: SessionState {
        current_index: 0,
        is_flipped: false,
        mode: Mode::Learn,
      },
      next_batch_id: 1,
    }
  }

  pub fn state(&self) -> &SessionState {
    &self.state
  }

  pub fn current_index(&self) -> usize {
    self.state.current_index
  }

  pub fn is_flipped(&self) -> bool {
    self.state.is_flipped
  }

  pub fn mode(&self) -> &Mode {
    &self.state.mode
  }

  pub fn interval(&self) -> usize {
    self.interval
  }

  pub fn deck_len(&self) -> usize {
    self.deck_len
  }

  /// The batch that advancing to `next_index` would quiz, if any
  fn practice_range(&self, next_index: usize) -> Option<Range<usize>> {
    if self.interval == 0 || next_index % self.interval != 0 {
      return None;
    }
    let in_deck = next_index < self.deck_len;
    let at_wrap = self.policy.practice_on_wrap && next_index == self.deck_len;
    if in_deck || at_wrap {
      Some(next_index - self.interval..next_index)
    } else {
      None
    }
  }

  pub fn advance(&mut self) -> Navigation {
    if self.state.mode.is_practice() {
      return Navigation::Blocked;
    }

    let next_index = self.state.current_index + 1;
    if let Some(range) = self.practice_range(next_index) {
      let batch = PracticeBatch {
        id: self.next_batch_id,
        start: range.start,
        end: range.end,
      };
      self.next_batch_id += 1;
      self.state.mode = Mode::Practice(batch.clone());
      return Navigation::PracticeStarted(batch);
    }

    self.state.current_index = next_index % self.deck_len;
    self.state.is_flipped = false;
    Navigation::Moved {
      index: self.state.current_index,
    }
  }

  pub fn retreat(&mut self) -> Navigation {
    if self.state.mode.is_practice() {
      return Navigation::Blocked;
    }

    self.state.current_index = (self.state.current_index + self.deck_len - 1) % self.deck_len;
    self.state.is_flipped = false;
    Navigation::Moved {
      index: self.state.current_index,
    }
  }

  /// Toggle the card face. Returns the new flip state, or `None` during practice.
  pub fn flip(&mut self) -> Option<bool> {
    if self.state.mode.is_practice() {
      return None;
    }
    self.state.is_flipped = !self.state.is_flipped;
    Some(self.state.is_flipped)
  }

  /// Leave practice and move past the card that triggered it.
  /// Returns false if no practice was open.
  pub fn complete_practice(&mut self) -> bool {
    if !self.state.mode.is_practice() {
      return false;
    }
    self.state.mode = Mode::Learn;
    self.state.current_index = (self.state.current_index + 1) % self.deck_len;
    self.state.is_flipped = false;
    true
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn deck_of(n: usize) -> Deck {
    let cards = (0..n)
      .map(|i| Card::new(i as i64 + 1, "/media/x.mp4", "title", &format!("w{}", i), None))
      .collect();
    Deck::new(cards).unwrap()
  }

  fn controller(n: usize) -> SessionController {
    SessionController::new(&deck_of(n), PracticePolicy::default())
  }

  #[test]
  fn test_practice_interval_values() {
    assert_eq!(practice_interval(0), 0);
    assert_eq!(practice_interval(2), 0);
    assert_eq!(practice_interval(3), 1);
    assert_eq!(practice_interval(8), 2);
    assert_eq!(practice_interval(9), 3);
  }

  #[test]
  fn test_new_starts_in_learn_at_zero() {
    let c = controller(5);
    assert_eq!(c.current_index(), 0);
    assert!(!c.is_flipped());
    assert_eq!(c.mode(), &Mode::Learn);
  }

  #[test]
  fn test_small_decks_never_practice() {
    for n in 1..=2 {
      let mut c = controller(n);
      for _ in 0..10 {
        assert!(matches!(c.advance(), Navigation::Moved { .. }));
        assert!(c.current_index() < n);
      }
      assert_eq!(c.mode(), &Mode::Learn);
    }
  }

  #[test]
  fn test_nine_cards_practice_on_third_advance() {
    let mut c = controller(9);

    assert_eq!(c.advance(), Navigation::Moved { index: 1 });
    assert_eq!(c.advance(), Navigation::Moved { index: 2 });

    match c.advance() {
      Navigation::PracticeStarted(batch) => {
        assert_eq!(batch.indices(), 0..3);
        assert_eq!(batch.id, 1);
      }
      other => panic!("expected practice, got {:?}", other),
    }
    // Index is not advanced while practicing
    assert_eq!(c.current_index(), 2);
    assert!(c.mode().is_practice());
  }

  #[test]
  fn test_navigation_blocked_during_practice() {
    let mut c = controller(9);
    c.advance();
    c.advance();
    c.advance();

    assert_eq!(c.advance(), Navigation::Blocked);
    assert_eq!(c.retreat(), Navigation::Blocked);
    assert_eq!(c.flip(), None);
    assert_eq!(c.current_index(), 2);
  }

  #[test]
  fn test_complete_practice_resumes_learning() {
    let mut c = controller(6);
    c.advance();
    assert!(matches!(c.advance(), Navigation::PracticeStarted(ref b) if b.indices() == (0..2)));

    assert!(c.complete_practice());
    assert_eq!(c.mode(), &Mode::Learn);
    assert_eq!(c.current_index(), 2);
    assert!(!c.is_flipped());
  }

  #[test]
  fn test_complete_practice_without_practice_is_noop() {
    let mut c = controller(6);
    assert!(!c.complete_practice());
    assert_eq!(c.current_index(), 0);
  }

  #[test]
  fn test_batch_ids_increase() {
    let mut c = controller(6);
    c.advance();
    let first = match c.advance() {
      Navigation::PracticeStarted(b) => b,
      other => panic!("expected practice, got {:?}", other),
    };
    c.complete_practice();
    c.advance();
    let second = match c.advance() {
      Navigation::PracticeStarted(b) => b,
      other => panic!("expected practice, got {:?}", other),
    };
    assert_eq!(second.indices(), 2..4);
    assert!(second.id > first.id);
  }

  #[test]
  fn test_wraparound_does_not_trigger_by_default() {
    let mut c = controller(6);
    // Walk to the last card, completing the quizzes along the way
    while c.current_index() != 5 {
      if let Navigation::PracticeStarted(_) = c.advance() {
        c.complete_practice();
      }
    }
    assert_eq!(c.advance(), Navigation::Moved { index: 0 });
    assert_eq!(c.mode(), &Mode::Learn);
  }

  #[test]
  fn test_wraparound_triggers_with_policy() {
    let policy = PracticePolicy {
      practice_on_wrap: true,
    };
    let mut c = SessionController::new(&deck_of(6), policy);
    while c.current_index() != 5 {
      if let Navigation::PracticeStarted(_) = c.advance() {
        c.complete_practice();
      }
    }

    match c.advance() {
      Navigation::PracticeStarted(batch) => assert_eq!(batch.indices(), 4..6),
      other => panic!("expected practice, got {:?}", other),
    }
    c.complete_practice();
    assert_eq!(c.current_index(), 0);
  }

  #[test]
  fn test_wrap_policy_needs_multiple_of_interval() {
    // 7 cards, interval 2: 7 is not a multiple, so no quiz at the wrap
    let policy = PracticePolicy {
      practice_on_wrap: true,
    };
    let mut c = SessionController::new(&deck_of(7), policy);
    while c.current_index() != 6 {
      if let Navigation::PracticeStarted(_) = c.advance() {
        c.complete_practice();
      }
    }
    assert_eq!(c.advance(), Navigation::Moved { index: 0 });
  }

  #[test]
  fn test_retreat_wraps_to_last() {
    let mut c = controller(4);
    assert_eq!(c.retreat(), Navigation::Moved { index: 3 });
    assert_eq!(c.retreat(), Navigation::Moved { index: 2 });
  }

  #[test]
  fn test_retreat_never_triggers_practice() {
    let mut c = controller(9);
    for _ in 0..20 {
      assert!(matches!(c.retreat(), Navigation::Moved { .. }));
    }
    assert_eq!(c.mode(), &Mode::Learn);
  }

  #[test]
  fn test_navigation_resets_flip() {
    let mut c = controller(4);
    c.flip();
    assert!(c.is_flipped());
    c.advance();
    assert!(!c.is_flipped());
    c.flip();
    c.retreat();
    assert!(!c.is_flipped());
  }

  #[test]
  fn test_double_flip_is_identity() {
    let mut c = controller(3);
    let before = c.is_flipped();
    c.flip();
    c.flip();
    assert_eq!(c.is_flipped(), before);
  }

  #[test]
  fn test_index_stays_in_bounds() {
    for n in 1..=10 {
      let mut c = controller(n);
      for step in 0..50 {
        let nav = if step % 3 == 2 { c.retreat() } else { c.advance() };
        if let Navigation::PracticeStarted(batch) = nav {
          assert!(batch.end <= n);
          assert_eq!(batch.len(), c.interval());
          c.complete_practice();
        }
        assert!(c.current_index() < n, "index {} out of bounds for {}", c.current_index(), n);
      }
    }
  }

  #[test]
  fn test_batch_cards_slice() {
    let deck = deck_of(9);
    let batch = PracticeBatch { id: 1, start: 3, end: 6 };
    let words: Vec<&str> = batch.cards(&deck).iter().map(|c| c.word()).collect();
    assert_eq!(words, vec!["w3", "w4", "w5"]);
  }
}
