use serde::{Deserialize, Serialize};

/// What the learner sees first: the sign media and a short title
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardFront {
  pub media_url: String,
  pub title: String,
}

/// The word being signed, plus an optional explanation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardBack {
  pub word: String,
  pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
  pub id: i64,
  pub front: CardFront,
  pub back: CardBack,
}

impl Card {
  pub fn new(id: i64, media_url: &str, title: &str, word: &str, description: Option<&str>) -> Self {
    Self {
      id,
      front: CardFront {
        media_url: media_url.to_string(),
        title: title.to_string(),
      },
      back: CardBack {
        word: word.to_string(),
        description: description.map(|s| s.to_string()),
      },
    }
  }

  pub fn word(&self) -> &str {
    &self.back.word
  }
}

/// Ordered, non-empty set of cards for one subtopic.
///
/// A deck is fixed for the lifetime of a session. The empty case is rejected
/// at construction so everything downstream can index without checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deck {
  cards: Vec<Card>,
}

impl Deck {
  /// Returns `None` for an empty card list
  pub fn new(cards: Vec<Card>) -> Option<Self> {
    if cards.is_empty() {
      None
    } else {
      Some(Self { cards })
    }
  }

  pub fn len(&self) -> usize {
    self.cards.len()
  }

  /// Always false for a constructed deck
  pub fn is_empty(&self) -> bool {
    self.cards.is_empty()
  }

  pub fn cards(&self) -> &[Card] {
    &self.cards
  }
}

/// Names shown above the deck
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubtopicMeta {
  pub subtopic_id: i64,
  pub topic_name: String,
  pub subtopic_name: String,
}
