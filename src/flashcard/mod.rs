//! Flashcard learn/practice sessions.
//!
//! [`FlashcardSession`] owns a loaded deck together with its
//! [`SessionController`], the open [`PracticeQuiz`] and the pending completion
//! timer. Everything the rendering layer needs comes out of [`SessionView`].

pub mod controller;
pub mod quiz;
pub mod timer;

use rand::Rng;
use serde::Serialize;

use crate::domain::{Card, Deck, SubtopicMeta};

pub use controller::{
  Mode, Navigation, PracticeBatch, PracticePolicy, SessionController, SessionState,
  practice_interval,
};
pub use quiz::{PracticeQuiz, QuizQuestion, generate_options, grade};
pub use timer::CompletionTimer;

/// Outcome of submitting the open quiz
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
  Passed { batch_id: u64 },
  Failed,
  NoQuiz,
}

#[derive(Debug)]
struct PendingCompletion {
  batch_id: u64,
  _timer: CompletionTimer,
}

#[derive(Debug)]
pub struct FlashcardSession {
  meta: SubtopicMeta,
  deck: Deck,
  controller: SessionController,
  quiz: Option<PracticeQuiz>,
  completion: Option<PendingCompletion>,
}

impl FlashcardSession {
  pub fn new(meta: SubtopicMeta, deck: Deck, policy: PracticePolicy) -> Self {
    let controller = SessionController::new(&deck, policy);
    Self {
      meta,
      deck,
      controller,
      quiz: None,
      completion: None,
    }
  }

  pub fn meta(&self) -> &SubtopicMeta {
    &self.meta
  }

  pub fn deck(&self) -> &Deck {
    &self.deck
  }

  pub fn controller(&self) -> &SessionController {
    &self.controller
  }

  pub fn quiz(&self) -> Option<&PracticeQuiz> {
    self.quiz.as_ref()
  }

  pub fn current_card(&self) -> &Card {
    // current_index < deck.len() is upheld by the controller
    &self.deck.cards()[self.controller.current_index()]
  }

  /// Move forward, opening a quiz when the controller enters practice.
  /// Options are generated here, once per batch.
  pub fn advance<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Navigation {
    let nav = self.controller.advance();
    if let Navigation::PracticeStarted(ref batch) = nav {
      tracing::info!(
        subtopic_id = self.meta.subtopic_id,
        batch_id = batch.id,
        start = batch.start,
        end = batch.end,
        "Practice started"
      );
      self.quiz = Some(PracticeQuiz::build(batch, &self.deck, rng));
      self.completion = None;
    }
    nav
  }

  pub fn retreat(&mut self) -> Navigation {
    self.controller.retreat()
  }

  pub fn flip(&mut self) -> Option<bool> {
    self.controller.flip()
  }

  pub fn select_answer(&mut self, card_id: i64, word: &str) -> bool {
    match self.quiz.as_mut() {
      Some(quiz) => quiz.select_answer(card_id, word),
      None => false,
    }
  }

  pub fn submit(&mut self) -> SubmitOutcome {
    let Some(quiz) = self.quiz.as_mut() else {
      return SubmitOutcome::NoQuiz;
    };

    if quiz.submit() {
      tracing::info!(
        subtopic_id = self.meta.subtopic_id,
        batch_id = quiz.batch_id(),
        attempts = quiz.attempts(),
        "Practice passed"
      );
      SubmitOutcome::Passed {
        batch_id: quiz.batch_id(),
      }
    } else {
      tracing::debug!(
        batch_id = quiz.batch_id(),
        attempts = quiz.attempts(),
        "Practice answers incorrect"
      );
      SubmitOutcome::Failed
    }
  }

  /// Whether a completion for `batch_id` would be honoured right now
  fn is_completable(&self, batch_id: u64) -> bool {
    let in_batch = matches!(self.controller.mode(), Mode::Practice(b) if b.id == batch_id);
    let passed = self
      .quiz
      .as_ref()
      .is_some_and(|q| q.batch_id() == batch_id && q.is_passed());
    in_batch && passed
  }

  #[cfg(test)]
  fn has_pending_completion(&self) -> bool {
    self.completion.is_some()
  }

  /// Keep `timer` alive for the passed quiz of `batch_id`. Returns false and
  /// drops (cancels) the timer if the batch is not completable or a timer is
  /// already pending for it.
  pub fn arm_completion(&mut self, batch_id: u64, timer: CompletionTimer) -> bool {
    if !self.is_completable(batch_id) {
      return false;
    }
    if self.completion.as_ref().is_some_and(|p| p.batch_id == batch_id) {
      return false;
    }
    self.completion = Some(PendingCompletion {
      batch_id,
      _timer: timer,
    });
    true
  }

  /// Leave the passed quiz for `batch_id` and resume learning. A stale call
  /// for another batch, or for a quiz that has not passed, does nothing.
  pub fn finish_practice(&mut self, batch_id: u64) -> bool {
    if !self.is_completable(batch_id) {
      tracing::debug!(batch_id, "Ignoring stale practice completion");
      return false;
    }
    self.controller.complete_practice();
    self.quiz = None;
    self.completion = None;
    tracing::info!(
      subtopic_id = self.meta.subtopic_id,
      batch_id,
      index = self.controller.current_index(),
      "Practice completed"
    );
    true
  }

  pub fn view(&self) -> SessionView {
    let quiz = match (self.controller.mode(), self.quiz.as_ref()) {
      (Mode::Practice(_), Some(quiz)) => Some(QuizView::from_quiz(quiz)),
      _ => None,
    };

    SessionView {
      subtopic_id: self.meta.subtopic_id,
      topic_name: self.meta.topic_name.clone(),
      subtopic_name: self.meta.subtopic_name.clone(),
      current_index: self.controller.current_index(),
      position: self.controller.current_index() + 1,
      total: self.deck.len(),
      card: self.current_card().clone(),
      is_flipped: self.controller.is_flipped(),
      mode: self.controller.mode().as_str(),
      quiz,
    }
  }
}

/// Render-ready snapshot of a session
#[derive(Debug, Clone, Serialize)]
pub struct SessionView {
  pub subtopic_id: i64,
  pub topic_name: String,
  pub subtopic_name: String,
  pub current_index: usize,
  /// 1-based, for display
  pub position: usize,
  pub total: usize,
  pub card: Card,
  pub is_flipped: bool,
  pub mode: &'static str,
  pub quiz: Option<QuizView>,
}

impl SessionView {
  pub fn in_practice(&self) -> bool {
    self.quiz.is_some()
  }
}

#[derive(Debug, Clone, Serialize)]
pub struct QuizView {
  pub batch_id: u64,
  pub questions: Vec<QuestionView>,
  pub attempts: u32,
  pub last_result: Option<bool>,
  pub passed: bool,
  pub failed: bool,
}

impl QuizView {
  fn from_quiz(quiz: &PracticeQuiz) -> Self {
    let questions = quiz
      .questions()
      .iter()
      .map(|q| {
        let selected = quiz.selection(q.card_id);
        QuestionView {
          card_id: q.card_id,
          media_url: q.media_url.clone(),
          title: q.title.clone(),
          options: q
            .options
            .iter()
            .map(|word| OptionView {
              word: word.clone(),
              selected: selected == Some(word.as_str()),
            })
            .collect(),
          selected: selected.map(|s| s.to_string()),
        }
      })
      .collect();

    Self {
      batch_id: quiz.batch_id(),
      questions,
      attempts: quiz.attempts(),
      last_result: quiz.last_result(),
      passed: quiz.is_passed(),
      failed: quiz.last_result() == Some(false),
    }
  }
}

#[derive(Debug, Clone, Serialize)]
pub struct QuestionView {
  pub card_id: i64,
  pub media_url: String,
  pub title: String,
  pub options: Vec<OptionView>,
  pub selected: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct OptionView {
  pub word: String,
  pub selected: bool,
}
