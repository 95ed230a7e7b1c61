use rusqlite::{Connection, Result};

pub fn run_migrations(conn: &Connection) -> Result<()> {
  conn.execute_batch(
    r#"
    PRAGMA foreign_keys = ON;

    CREATE TABLE IF NOT EXISTS topics (
      id INTEGER PRIMARY KEY AUTOINCREMENT,
      name TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS subtopics (
      id INTEGER PRIMARY KEY AUTOINCREMENT,
      topic_id INTEGER NOT NULL,
      name TEXT NOT NULL,
      FOREIGN KEY (topic_id) REFERENCES topics(id)
    );

    CREATE TABLE IF NOT EXISTS vocabularies (
      id INTEGER PRIMARY KEY AUTOINCREMENT,
      subtopic_id INTEGER NOT NULL,
      word TEXT NOT NULL,
      description TEXT,
      media_url TEXT NOT NULL,
      front_title TEXT NOT NULL,
      position INTEGER NOT NULL DEFAULT 0,
      FOREIGN KEY (subtopic_id) REFERENCES subtopics(id)
    );

    CREATE INDEX IF NOT EXISTS idx_subtopics_topic ON subtopics(topic_id);
    CREATE INDEX IF NOT EXISTS idx_vocabularies_subtopic ON vocabularies(subtopic_id, position);
    "#,
  )?;

  Ok(())
}
