//! Decks from a REST backend.
//!
//! Endpoints, relative to the configured base URL:
//! - `GET /subtopics` → `[SubtopicSummary]`
//! - `GET /subtopics/{id}/flashcards` → `{ "subtopic": SubtopicMeta, "flashcards": [Card] }`

use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};

use crate::db::SubtopicSummary;
use crate::domain::{Card, Deck, SubtopicMeta};
use crate::error::LoadError;

use super::LoadedDeck;

/// Body of `GET /subtopics/{id}/flashcards`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlashcardsResponse {
  pub subtopic: SubtopicMeta,
  pub flashcards: Vec<Card>,
}

#[derive(Debug, Clone)]
pub struct RemoteDeckClient {
  client: Client,
  base_url: String,
}

impl RemoteDeckClient {
  pub fn new(base_url: &str, timeout: Duration) -> Result<Self, LoadError> {
    let client = Client::builder().timeout(timeout).build()?;
    Ok(Self {
      client,
      base_url: base_url.trim_end_matches('/').to_string(),
    })
  }

  pub fn base_url(&self) -> &str {
    &self.base_url
  }

  pub async fn load_deck(&self, subtopic_id: i64) -> Result<LoadedDeck, LoadError> {
    let url = format!("{}/subtopics/{}/flashcards", self.base_url, subtopic_id);
    tracing::debug!("Fetching deck from {}", url);

    let response = self.client.get(&url).send().await?;
    match response.status() {
      StatusCode::NOT_FOUND => return Err(LoadError::SubtopicNotFound(subtopic_id)),
      status if !status.is_success() => return Err(LoadError::Status(status.as_u16())),
      _ => {}
    }

    let body: FlashcardsResponse = response.json().await?;
    let deck = Deck::new(body.flashcards).ok_or(LoadError::EmptyDeck(subtopic_id))?;
    Ok(LoadedDeck {
      meta: body.subtopic,
      deck,
    })
  }

  pub async fn list_subtopics(&self) -> Result<Vec<SubtopicSummary>, LoadError> {
    let url = format!("{}/subtopics", self.base_url);
    let response = self.client.get(&url).send().await?;
    if !response.status().is_success() {
      return Err(LoadError::Status(response.status().as_u16()));
    }
    Ok(response.json().await?)
  }
}
