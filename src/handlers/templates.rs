//! Template and form structs for page handlers.

use askama::Template;
use serde::Deserialize;

use crate::db::SubtopicSummary;
use crate::flashcard::SessionView;

#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexTemplate {
  pub subtopics: Vec<SubtopicSummary>,
  pub load_failed: bool,
}

/// Full flashcard page for a freshly loaded deck
#[derive(Template)]
#[template(path = "flashcards.html")]
pub struct FlashcardsTemplate {
  pub view: SessionView,
  pub completion_delay_ms: u64,
}

/// The swappable part of the flashcard page: either the current card with
/// navigation, or the open practice quiz
#[derive(Template)]
#[template(path = "flashcard_panel.html")]
pub struct FlashcardPanelTemplate {
  pub view: SessionView,
  pub completion_delay_ms: u64,
}

#[derive(Template)]
#[template(path = "empty_deck.html")]
pub struct EmptyDeckTemplate {
  pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct FlashcardQuery {
  pub subtopic: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct SelectAnswerForm {
  pub card_id: i64,
  pub word: String,
}
