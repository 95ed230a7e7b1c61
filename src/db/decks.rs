//! Topic, subtopic and vocabulary queries

use rusqlite::{Connection, OptionalExtension, Result, params};
use serde::{Deserialize, Serialize};

use crate::domain::{Card, SubtopicMeta};

/// One row of the subtopic listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubtopicSummary {
    pub id: i64,
    pub topic_name: String,
    pub name: String,
    pub card_count: i64,
}

/// New vocabulary entry, before it has an id
#[derive(Debug, Clone)]
pub struct NewVocabulary<'a> {
    pub word: &'a str,
    pub description: Option<&'a str>,
    pub media_url: &'a str,
    pub front_title: &'a str,
}

pub fn insert_topic(conn: &Connection, name: &str) -> Result<i64> {
    conn.execute("INSERT INTO topics (name) VALUES (?1)", params![name])?;
    Ok(conn.last_insert_rowid())
}

pub fn insert_subtopic(conn: &Connection, topic_id: i64, name: &str) -> Result<i64> {
    conn.execute(
        "INSERT INTO subtopics (topic_id, name) VALUES (?1, ?2)",
        params![topic_id, name],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn insert_vocabulary(
    conn: &Connection,
    subtopic_id: i64,
    position: i64,
    vocab: &NewVocabulary<'_>,
) -> Result<i64> {
    conn.execute(
        r#"
    INSERT INTO vocabularies (subtopic_id, word, description, media_url, front_title, position)
    VALUES (?1, ?2, ?3, ?4, ?5, ?6)
    "#,
        params![
            subtopic_id,
            vocab.word,
            vocab.description,
            vocab.media_url,
            vocab.front_title,
            position,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn list_subtopics(conn: &Connection) -> Result<Vec<SubtopicSummary>> {
    let mut stmt = conn.prepare(
        r#"
    SELECT s.id, t.name, s.name,
           (SELECT COUNT(*) FROM vocabularies v WHERE v.subtopic_id = s.id)
    FROM subtopics s
    JOIN topics t ON t.id = s.topic_id
    ORDER BY t.name, s.name
    "#,
    )?;

    let rows = stmt
        .query_map([], |row| {
            Ok(SubtopicSummary {
                id: row.get(0)?,
                topic_name: row.get(1)?,
                name: row.get(2)?,
                card_count: row.get(3)?,
            })
        })?
        .collect::<Result<Vec<_>>>()?;

    Ok(rows)
}

pub fn get_subtopic_meta(conn: &Connection, subtopic_id: i64) -> Result<Option<SubtopicMeta>> {
    conn.query_row(
        r#"
    SELECT s.id, t.name, s.name
    FROM subtopics s
    JOIN topics t ON t.id = s.topic_id
    WHERE s.id = ?1
    "#,
        params![subtopic_id],
        |row| {
            Ok(SubtopicMeta {
                subtopic_id: row.get(0)?,
                topic_name: row.get(1)?,
                subtopic_name: row.get(2)?,
            })
        },
    )
    .optional()
}

/// Cards of a subtopic in deck order
pub fn get_subtopic_cards(conn: &Connection, subtopic_id: i64) -> Result<Vec<Card>> {
    let mut stmt = conn.prepare(
        r#"
    SELECT id, media_url, front_title, word, description
    FROM vocabularies
    WHERE subtopic_id = ?1
    ORDER BY position, id
    "#,
    )?;

    let cards = stmt
        .query_map(params![subtopic_id], |row| {
            let id: i64 = row.get(0)?;
            let media_url: String = row.get(1)?;
            let title: String = row.get(2)?;
            let word: String = row.get(3)?;
            let description: Option<String> = row.get(4)?;
            Ok(Card::new(id, &media_url, &title, &word, description.as_deref()))
        })?
        .collect::<Result<Vec<_>>>()?;

    Ok(cards)
}
