pub mod card;

pub use card::{Card, CardBack, CardFront, Deck, SubtopicMeta};
