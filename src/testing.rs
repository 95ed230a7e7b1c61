//! Test utilities for database setup.
//!
//! Reuses the authoritative schema initialization so tests never carry
//! their own copy of the tables.

use rusqlite::Connection;
use std::path::Path;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

use crate::db::{self, DbPool, NewVocabulary};

/// Test environment with a file-backed database in a temporary directory.
pub struct TestEnv {
    /// Temporary directory (kept alive for database file persistence)
    pub temp: TempDir,
    /// Connection with all migrations applied
    pub conn: Connection,
}

impl TestEnv {
    pub fn new() -> rusqlite::Result<Self> {
        let temp =
            TempDir::new().map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))?;

        let conn = Connection::open(temp.path().join("signdeck.db"))?;
        db::run_migrations(&conn)?;

        Ok(Self { temp, conn })
    }

    /// Get the temporary directory path for creating test files.
    pub fn path(&self) -> &Path {
        self.temp.path()
    }

    /// Hand the connection over as a shared pool. The returned directory
    /// must outlive the pool.
    pub fn into_pool(self) -> (TempDir, DbPool) {
        (self.temp, Arc::new(Mutex::new(self.conn)))
    }

    /// Insert a topic with one subtopic holding `words` in order.
    /// Returns the subtopic id.
    pub fn add_subtopic(&self, topic: &str, subtopic: &str, words: &[&str]) -> rusqlite::Result<i64> {
        let topic_id = db::insert_topic(&self.conn, topic)?;
        let subtopic_id = db::insert_subtopic(&self.conn, topic_id, subtopic)?;
        for (position, word) in words.iter().enumerate() {
            let media_url = format!("/media/{}.mp4", word);
            let vocab = NewVocabulary {
                word: *word,
                description: None,
                media_url: &media_url,
                front_title: subtopic,
            };
            db::insert_vocabulary(&self.conn, subtopic_id, position as i64, &vocab)?;
        }
        Ok(subtopic_id)
    }
}
