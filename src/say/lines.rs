//! Line reads and writes.
//!
//! A line records its mood name and, for user moods, the mood row id. Catalog
//! moods are stored by name only (`mood_id` is NULL), so the name keeps
//! rendering the way it did when the line was written.

use rusqlite::{params, Connection, OptionalExtension, Row};

use super::catalog;
use super::conversations::find_conversation;
use super::delete::{delete_row, no_referrers, Target};
use super::error::{SayError, SayResult, StoreContext};
use super::ids::{insert_with_unique_id, IdSource, LINE_PREFIX};
use super::moods::get_mood;
use super::types::{Line, Mood, NewLine};

const INSERT_LINE: &str = "\
INSERT INTO lines (public_id, animal, think, text, mood_name, mood_id, conversation_id)
VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)";

const GET_LINE: &str = "\
SELECT lines.public_id, animal, think, text, mood_name, mood_id, moods.eyes, moods.tongue
FROM lines
LEFT JOIN moods ON lines.mood_id = moods.id
INNER JOIN conversations ON lines.conversation_id = conversations.id
WHERE conversations.public_id = ?2
  AND conversations.user_id = ?1
  AND lines.public_id = ?3";

const DELETE_LINE: &str = "\
DELETE FROM lines
WHERE public_id = ?3
  AND conversation_id IN (
    SELECT id FROM conversations WHERE user_id = ?1 AND public_id = ?2
  )";

/// Where a stored line's mood comes from, decided once from the joined
/// columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum StoredMood {
    /// No joined mood row: the name refers to the catalog.
    Catalog { name: String },
    /// The line points at a user mood row.
    User {
        seq: i64,
        name: String,
        eyes: String,
        tongue: String,
    },
}

impl StoredMood {
    fn from_columns(
        name: String,
        seq: Option<i64>,
        eyes: Option<String>,
        tongue: Option<String>,
    ) -> Self {
        match (seq, eyes, tongue) {
            (Some(seq), Some(eyes), Some(tongue)) => Self::User {
                seq,
                name,
                eyes,
                tongue,
            },
            _ => Self::Catalog { name },
        }
    }

    fn resolve(self) -> Option<Mood> {
        match self {
            Self::User {
                seq,
                name,
                eyes,
                tongue,
            } => Some(Mood {
                name,
                eyes,
                tongue,
                user_defined: true,
                seq: Some(seq),
            }),
            Self::Catalog { name } => catalog::find(&name).map(|m| m.to_mood()),
        }
    }
}

/// A line as read from the store, before mood resolution.
#[derive(Debug, Clone)]
pub(crate) struct StoredLine {
    id: String,
    animal: String,
    think: bool,
    text: String,
    mood: StoredMood,
}

impl StoredLine {
    /// Attach the resolved mood. A mood that resolves nowhere breaks the
    /// write-time invariant and is fatal.
    pub(crate) fn resolve(self) -> SayResult<Line> {
        let mood_name = match &self.mood {
            StoredMood::Catalog { name } | StoredMood::User { name, .. } => name.clone(),
        };
        let Some(mood) = self.mood.resolve() else {
            tracing::error!(line = %self.id, mood = %mood_name, "line has no valid mood");
            return Err(SayError::Integrity(format!(
                "line {} does not have a valid mood ({mood_name:?})",
                self.id
            )));
        };

        Ok(Line {
            id: self.id,
            animal: self.animal,
            think: self.think,
            text: self.text,
            mood,
        })
    }
}

/// Map a row shaped `public_id, animal, think, text, mood_name, mood_id,
/// eyes, tongue`.
pub(crate) fn line_from_row(row: &Row<'_>) -> rusqlite::Result<StoredLine> {
    Ok(StoredLine {
        id: row.get(0)?,
        animal: row.get(1)?,
        think: row.get(2)?,
        text: row.get(3)?,
        mood: StoredMood::from_columns(row.get(4)?, row.get(5)?, row.get(6)?, row.get(7)?),
    })
}

/// Append a line to one of the owner's conversations.
///
/// The mood name is resolved now, against the catalog first and then the
/// owner's moods.
pub fn insert_line(
    conn: &Connection,
    ids: &dyn IdSource,
    owner: &str,
    conversation_id: &str,
    new: &NewLine,
) -> SayResult<Line> {
    let convo = find_conversation(conn, owner, conversation_id)?.ok_or_else(|| {
        SayError::NotFound {
            entity: "conversation",
            id: conversation_id.to_string(),
        }
    })?;
    let mood = get_mood(conn, owner, &new.mood)?;

    let (id, ()) = insert_with_unique_id(ids, LINE_PREFIX, "line", owner, |public_id| {
        conn.prepare_cached(INSERT_LINE)?.execute(params![
            public_id,
            new.animal,
            new.think,
            new.text,
            mood.name,
            mood.seq,
            convo.seq,
        ])?;
        Ok(())
    })?;

    tracing::debug!(owner, conversation = conversation_id, id = %id, "line inserted");

    Ok(Line {
        id,
        animal: new.animal.clone(),
        think: new.think,
        text: new.text.clone(),
        mood,
    })
}

/// Fetch one line of one of the owner's conversations.
pub fn get_line(
    conn: &Connection,
    owner: &str,
    conversation_id: &str,
    line_id: &str,
) -> SayResult<Line> {
    let stored = conn
        .prepare_cached(GET_LINE)
        .and_then(|mut stmt| {
            stmt.query_row(params![owner, conversation_id, line_id], line_from_row)
                .optional()
        })
        .store_context(|| {
            format!("getting line {line_id:?} of conversation {conversation_id:?} for owner {owner:?}")
        })?;

    stored
        .ok_or_else(|| SayError::NotFound {
            entity: "line",
            id: line_id.to_string(),
        })?
        .resolve()
}

/// Delete one line of one of the owner's conversations.
pub fn delete_line(
    conn: &Connection,
    owner: &str,
    conversation_id: &str,
    line_id: &str,
) -> SayResult<()> {
    let target = Target {
        entity: "line",
        owner,
        id: line_id,
    };
    delete_row(
        conn,
        DELETE_LINE,
        params![owner, conversation_id, line_id],
        target,
        no_referrers,
    )
}
