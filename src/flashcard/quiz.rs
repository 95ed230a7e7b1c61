//! Multiple-choice practice quiz over a batch of recently seen cards.

use std::collections::HashMap;

use rand::Rng;
use rand::seq::SliceRandom;
use serde::Serialize;

use crate::config;
use crate::domain::{Card, Deck};

use super::controller::PracticeBatch;

/// Build the answer options for one card: its own word plus up to
/// `DISTRACTOR_COUNT` other words from the deck, in random order.
///
/// Distractors are de-duplicated and never equal the correct word, so the
/// correct word appears exactly once. Decks with few distinct words yield
/// fewer options rather than repeats.
pub fn generate_options<R: Rng + ?Sized>(card: &Card, deck: &[Card], rng: &mut R) -> Vec<String> {
  let correct = card.back.word.clone();

  let mut distractors: Vec<String> = deck
    .iter()
    .filter(|c| c.id != card.id && c.back.word != correct)
    .map(|c| c.back.word.clone())
    .collect();
  distractors.sort();
  distractors.dedup();
  distractors.shuffle(rng);
  distractors.truncate(config::DISTRACTOR_COUNT);

  let mut options = vec![correct];
  options.extend(distractors);
  options.shuffle(rng);
  options
}

/// All-or-nothing check: every card needs a selection equal to its word
pub fn grade(cards: &[Card], selections: &HashMap<i64, String>) -> bool {
  cards
    .iter()
    .all(|card| selections.get(&card.id).is_some_and(|w| *w == card.back.word))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuizQuestion {
  pub card_id: i64,
  pub media_url: String,
  pub title: String,
  pub options: Vec<String>,
}

/// One open quiz. Options are fixed when the quiz is built so they stay in
/// place across renders and failed attempts.
#[derive(Debug, Clone)]
pub struct PracticeQuiz {
  batch_id: u64,
  cards: Vec<Card>,
  questions: Vec<QuizQuestion>,
  selections: HashMap<i64, String>,
  attempts: u32,
  last_result: Option<bool>,
}

impl PracticeQuiz {
  pub fn build<R: Rng + ?Sized>(batch: &PracticeBatch, deck: &Deck, rng: &mut R) -> Self {
    let cards = batch.cards(deck).to_vec();
    let questions = cards
      .iter()
      .map(|card| QuizQuestion {
        card_id: card.id,
        media_url: card.front.media_url.clone(),
        title: card.front.title.clone(),
        options: generate_options(card, deck.cards(), rng),
      })
      .collect();

    Self {
      batch_id: batch.id,
      cards,
      questions,
      selections: HashMap::new(),
      attempts: 0,
      last_result: None,
    }
  }

  pub fn batch_id(&self) -> u64 {
    self.batch_id
  }

  pub fn questions(&self) -> &[QuizQuestion] {
    &self.questions
  }

  pub fn selection(&self, card_id: i64) -> Option<&str> {
    self.selections.get(&card_id).map(|s| s.as_str())
  }

  pub fn attempts(&self) -> u32 {
    self.attempts
  }

  /// Result of the most recent submit, if any
  pub fn last_result(&self) -> Option<bool> {
    self.last_result
  }

  pub fn is_passed(&self) -> bool {
    self.last_result == Some(true)
  }

  /// Record the learner's choice for a card, replacing any earlier one.
  /// Ignored for cards outside this quiz and once the quiz has passed.
  pub fn select_answer(&mut self, card_id: i64, word: &str) -> bool {
    if self.is_passed() || !self.cards.iter().any(|c| c.id == card_id) {
      return false;
    }
    self.selections.insert(card_id, word.to_string());
    true
  }

  /// Grade the current selections. A passed quiz stays passed.
  pub fn submit(&mut self) -> bool {
    if self.is_passed() {
      return true;
    }
    self.attempts += 1;
    let passed = grade(&self.cards, &self.selections);
    self.last_result = Some(passed);
    passed
  }
}
