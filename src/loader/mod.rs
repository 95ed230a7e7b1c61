//! Deck loading behind a single injectable interface.
//!
//! Handlers only see [`DeckLoader`]; whether cards come from the local
//! database or a REST backend is decided once from configuration.

pub mod local;
pub mod remote;

use crate::config::{DeckSourceSettings, Settings};
use crate::db::{DbPool, SubtopicSummary};
use crate::domain::{Deck, SubtopicMeta};
use crate::error::LoadError;

pub use remote::RemoteDeckClient;

/// A deck with the names to show above it
#[derive(Debug, Clone)]
pub struct LoadedDeck {
  pub meta: SubtopicMeta,
  pub deck: Deck,
}

#[derive(Debug, Clone)]
pub enum DeckLoader {
  Local(DbPool),
  Remote(RemoteDeckClient),
}

impl DeckLoader {
  pub fn from_settings(settings: &Settings, pool: DbPool) -> Result<Self, LoadError> {
    match &settings.deck_source {
      DeckSourceSettings::Local => Ok(Self::Local(pool)),
      DeckSourceSettings::Remote { base_url, timeout } => {
        tracing::info!("Loading decks from {}", base_url);
        Ok(Self::Remote(RemoteDeckClient::new(base_url, *timeout)?))
      }
    }
  }

  pub async fn load_deck(&self, subtopic_id: i64) -> Result<LoadedDeck, LoadError> {
    match self {
      Self::Local(pool) => local::load_deck(pool, subtopic_id),
      Self::Remote(client) => client.load_deck(subtopic_id).await,
    }
  }

  pub async fn list_subtopics(&self) -> Result<Vec<SubtopicSummary>, LoadError> {
    match self {
      Self::Local(pool) => local::list_subtopics(pool),
      Self::Remote(client) => client.list_subtopics().await,
    }
  }
}
