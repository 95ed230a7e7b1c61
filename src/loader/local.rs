//! Decks from the local SQLite database

use crate::db::{self, DbPool, SubtopicSummary};
use crate::domain::Deck;
use crate::error::LoadError;

use super::LoadedDeck;

pub fn load_deck(pool: &DbPool, subtopic_id: i64) -> Result<LoadedDeck, LoadError> {
  let conn = db::try_lock(pool)?;

  let meta = db::get_subtopic_meta(&conn, subtopic_id)?.ok_or(LoadError::SubtopicNotFound(subtopic_id))?;
  let cards = db::get_subtopic_cards(&conn, subtopic_id)?;
  let deck = Deck::new(cards).ok_or(LoadError::EmptyDeck(subtopic_id))?;

  Ok(LoadedDeck { meta, deck })
}

pub fn list_subtopics(pool: &DbPool) -> Result<Vec<SubtopicSummary>, LoadError> {
  let conn = db::try_lock(pool)?;
  Ok(db::list_subtopics(&conn)?)
}
