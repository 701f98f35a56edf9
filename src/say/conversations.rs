//! Conversation reads and writes.

use rusqlite::{params, Connection, OptionalExtension, Row};

use super::delete::{delete_row, no_referrers, Target};
use super::error::{SayError, SayResult, StoreContext};
use super::ids::{insert_with_unique_id, IdSource, CONVERSATION_PREFIX};
use super::lines::{line_from_row, StoredLine};
use super::paginate::ListArgs;
use super::types::{Conversation, Line, Page};

const LIST_CONVERSATIONS_ASC: &str = "\
SELECT id, public_id, heading
FROM conversations
WHERE user_id = ?1 AND (?2 IS NULL OR id > ?2)
ORDER BY id ASC
LIMIT ?3";

const LIST_CONVERSATIONS_DESC: &str = "\
SELECT id, public_id, heading
FROM conversations
WHERE user_id = ?1 AND (?2 IS NULL OR id < ?2)
ORDER BY id DESC
LIMIT ?3";

const INSERT_CONVERSATION: &str = "\
INSERT INTO conversations (public_id, user_id, heading)
VALUES (?1, ?2, ?3)";

const GET_CONVERSATION: &str = "\
SELECT id, public_id, heading
FROM conversations
WHERE user_id = ?1 AND public_id = ?2";

const DELETE_CONVERSATION: &str = "\
DELETE FROM conversations
WHERE user_id = ?1 AND public_id = ?2";

const CONVERSATION_LINES: &str = "\
SELECT lines.public_id, animal, think, text, mood_name, mood_id, moods.eyes, moods.tongue
FROM lines
LEFT JOIN moods ON lines.mood_id = moods.id
WHERE conversation_id = ?1
ORDER BY lines.id ASC";

fn conversation_from_row(row: &Row<'_>) -> rusqlite::Result<Conversation> {
    Ok(Conversation {
        seq: row.get(0)?,
        id: row.get(1)?,
        heading: row.get(2)?,
        lines: None,
    })
}

/// List the owner's conversations by creation order.
pub fn list_conversations(
    conn: &Connection,
    owner: &str,
    args: &ListArgs,
) -> SayResult<Page<Conversation>> {
    args.validate()?;

    let direction = args.direction();
    let cursor_id = match args.cursor() {
        None => None,
        Some(public_id) => match find_conversation(conn, owner, public_id)? {
            Some(convo) => Some(convo.seq),
            None => {
                return Err(SayError::CursorNotFound {
                    cursor: public_id.to_string(),
                })
            }
        },
    };

    let op = || format!("listing conversations for owner {owner:?}");
    let mut stmt = conn
        .prepare_cached(direction.pick(LIST_CONVERSATIONS_ASC, LIST_CONVERSATIONS_DESC))
        .store_context(op)?;
    let convos = stmt
        .query_map(
            params![owner, cursor_id, args.limit as i64 + 1],
            conversation_from_row,
        )
        .store_context(op)?
        .collect::<rusqlite::Result<Vec<_>>>()
        .store_context(op)?;

    Ok(Page::from_overfetch(convos, args.limit))
}

/// Create an empty conversation with a fresh public id.
pub fn new_conversation(
    conn: &Connection,
    ids: &dyn IdSource,
    owner: &str,
    heading: &str,
) -> SayResult<Conversation> {
    let (id, seq) = insert_with_unique_id(ids, CONVERSATION_PREFIX, "conversation", owner, |public_id| {
        conn.prepare_cached(INSERT_CONVERSATION)?
            .execute(params![public_id, owner, heading])?;
        Ok(conn.last_insert_rowid())
    })?;

    tracing::debug!(owner, id = %id, "conversation created");

    Ok(Conversation {
        id,
        heading: heading.to_string(),
        lines: None,
        seq,
    })
}

/// Look up the owner's conversation without its lines.
pub(crate) fn find_conversation(
    conn: &Connection,
    owner: &str,
    public_id: &str,
) -> SayResult<Option<Conversation>> {
    conn.prepare_cached(GET_CONVERSATION)
        .and_then(|mut stmt| {
            stmt.query_row(params![owner, public_id], conversation_from_row)
                .optional()
        })
        .store_context(|| format!("finding conversation {public_id:?} for owner {owner:?}"))
}

/// Fetch a conversation with all of its lines in insertion order.
pub fn get_conversation(conn: &Connection, owner: &str, public_id: &str) -> SayResult<Conversation> {
    let mut convo = find_conversation(conn, owner, public_id)?.ok_or_else(|| SayError::NotFound {
        entity: "conversation",
        id: public_id.to_string(),
    })?;

    let op = || format!("retrieving lines for conversation {public_id:?}");
    let mut stmt = conn.prepare_cached(CONVERSATION_LINES).store_context(op)?;
    let stored = stmt
        .query_map(params![convo.seq], line_from_row)
        .store_context(op)?
        .collect::<rusqlite::Result<Vec<StoredLine>>>()
        .store_context(op)?;

    let lines = stored
        .into_iter()
        .map(StoredLine::resolve)
        .collect::<SayResult<Vec<Line>>>()?;

    convo.lines = Some(lines);
    Ok(convo)
}

/// Delete a conversation and, by cascade, its lines.
pub fn delete_conversation(conn: &Connection, owner: &str, public_id: &str) -> SayResult<()> {
    let target = Target {
        entity: "conversation",
        owner,
        id: public_id,
    };
    delete_row(
        conn,
        DELETE_CONVERSATION,
        params![owner, public_id],
        target,
        no_referrers,
    )
}
