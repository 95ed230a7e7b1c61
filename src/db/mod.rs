pub mod decks;
pub mod schema;

use rusqlite::{Connection, Result};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::error::LogOnError;

// Re-export all public items from submodules
pub use decks::*;
pub use schema::run_migrations;

pub type DbPool = Arc<Mutex<Connection>>;

/// Error returned when database lock cannot be acquired
#[derive(Debug)]
pub struct DbLockError;

impl std::fmt::Display for DbLockError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Database unavailable")
    }
}

impl std::error::Error for DbLockError {}

/// Try to acquire the database lock, returning an error if poisoned
pub fn try_lock(pool: &DbPool) -> std::result::Result<MutexGuard<'_, Connection>, DbLockError> {
    pool.lock().map_err(|_: PoisonError<_>| {
        tracing::error!("Database mutex poisoned - a thread panicked while holding the lock");
        DbLockError
    })
}

pub fn init_db(path: &Path) -> Result<DbPool> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).log_warn("Failed to create database directory");
    }

    let conn = Connection::open(path)?;
    run_migrations(&conn)?;
    Ok(Arc::new(Mutex::new(conn)))
}

/// Insert the demo deck when the database has no topics yet
pub fn seed_sample_deck(conn: &Connection) -> Result<()> {
    let count: i64 = conn.query_row("SELECT COUNT(*) FROM topics", [], |row| row.get(0))?;
    if count > 0 {
        return Ok(());
    }

    for (topic, subtopics) in sample_data() {
        let topic_id = insert_topic(conn, topic)?;
        for (subtopic, words) in subtopics {
            let subtopic_id = insert_subtopic(conn, topic_id, subtopic)?;
            for (position, (word, description)) in words.iter().enumerate() {
                let media_url = format!("/media/{}.mp4", word.to_lowercase().replace(' ', "-"));
                let vocab = NewVocabulary {
                    word: *word,
                    description: Some(*description),
                    media_url: &media_url,
                    front_title: subtopic,
                };
                insert_vocabulary(conn, subtopic_id, position as i64, &vocab)?;
            }
        }
    }

    tracing::info!("Seeded sample deck");
    Ok(())
}

type SampleWords = &'static [(&'static str, &'static str)];

const EVERYDAY_PHRASES: SampleWords = &[
    ("Hello", "Flat hand moves outward from the forehead"),
    ("Goodbye", "Open hand folds fingers down repeatedly"),
    ("Thank you", "Fingertips touch the chin and move forward"),
    ("Please", "Flat hand circles on the chest"),
    ("Sorry", "Fist circles on the chest"),
    ("Yes", "Fist nods up and down"),
    ("No", "Index and middle finger tap the thumb"),
    ("Good morning", "Sign GOOD then MORNING with the rising arm"),
    ("Good night", "Sign GOOD then NIGHT over the forearm"),
];

const PARENTS: SampleWords = &[
    ("Mother", "Thumb of open hand taps the chin"),
    ("Father", "Thumb of open hand taps the forehead"),
    ("Parents", "Sign MOTHER then FATHER"),
];

const SIBLINGS: SampleWords = &[
    ("Brother", "L-hand from forehead lands on the other L-hand"),
    ("Sister", "L-hand from the chin lands on the other L-hand"),
    ("Twin", "T-hand touches each side of the chin"),
    ("Baby", "Arms cradle and rock"),
    ("Cousin", "C-hand shakes beside the head"),
    ("Family", "F-hands circle outward to meet"),
];

fn sample_data() -> Vec<(&'static str, Vec<(&'static str, SampleWords)>)> {
    vec![
        ("Greetings", vec![("Everyday phrases", EVERYDAY_PHRASES)]),
        ("Family", vec![("Parents", PARENTS), ("Siblings", SIBLINGS)]),
    ]
}
