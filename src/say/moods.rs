//! Mood reads and writes.
//!
//! User moods live in the `moods` table, keyed by owner and lowercased name.
//! Catalog names always win on read and can never be written.

use rusqlite::{params, Connection, OptionalExtension, Row};

use super::catalog::{self, CatalogPartition};
use super::delete::{delete_row, Target};
use super::error::{SayError, SayResult, StoreContext};
use super::paginate::{self, Direction, ListArgs, Partition};
use super::types::{Mood, Page};

const LIST_MOODS_ASC: &str = "\
SELECT id, name, eyes, tongue
FROM moods
WHERE user_id = ?1 AND (?2 IS NULL OR id > ?2)
ORDER BY id ASC
LIMIT ?3";

const LIST_MOODS_DESC: &str = "\
SELECT id, name, eyes, tongue
FROM moods
WHERE user_id = ?1 AND (?2 IS NULL OR id < ?2)
ORDER BY id DESC
LIMIT ?3";

const FIND_MOOD: &str = "\
SELECT id, name, eyes, tongue
FROM moods
WHERE user_id = ?1 AND name = ?2";

const SET_MOOD: &str = "\
INSERT INTO moods (user_id, name, eyes, tongue)
VALUES (?1, ?2, ?3, ?4)
ON CONFLICT (user_id, name) DO UPDATE SET eyes = excluded.eyes, tongue = excluded.tongue
RETURNING id, name";

const DELETE_MOOD: &str = "\
DELETE FROM moods
WHERE user_id = ?1 AND name = ?2";

const MOOD_LINES: &str = "\
SELECT lines.public_id
FROM lines
INNER JOIN moods ON lines.mood_id = moods.id
WHERE moods.user_id = ?1 AND moods.name = ?2
ORDER BY lines.id ASC";

fn mood_from_row(row: &Row<'_>) -> rusqlite::Result<Mood> {
    Ok(Mood {
        seq: Some(row.get(0)?),
        name: row.get(1)?,
        eyes: row.get(2)?,
        tongue: row.get(3)?,
        user_defined: true,
    })
}

/// List the owner's moods followed by the catalog (reversed for `before`).
pub fn list_moods(conn: &Connection, owner: &str, args: &ListArgs) -> SayResult<Page<Mood>> {
    let store = StorePartition { conn, owner };
    paginate::merge(args, &store, &CatalogPartition)
}

/// The owner's moods as a pagination partition.
struct StorePartition<'a> {
    conn: &'a Connection,
    owner: &'a str,
}

impl Partition<Mood> for StorePartition<'_> {
    fn label(&self) -> &'static str {
        "user"
    }

    fn page(&self, direction: Direction, cursor: Option<&str>, limit: usize) -> SayResult<Page<Mood>> {
        list_user_moods(self.conn, self.owner, direction, cursor, limit)
    }
}

fn list_user_moods(
    conn: &Connection,
    owner: &str,
    direction: Direction,
    cursor: Option<&str>,
    limit: usize,
) -> SayResult<Page<Mood>> {
    let cursor_id = match cursor {
        None => None,
        Some(name) => match find_user_mood(conn, owner, name)? {
            Some(mood) => mood.seq,
            None => {
                return Err(SayError::CursorNotFound {
                    cursor: name.to_string(),
                })
            }
        },
    };

    let op = || format!("listing user moods for owner {owner:?}");
    let mut stmt = conn
        .prepare_cached(direction.pick(LIST_MOODS_ASC, LIST_MOODS_DESC))
        .store_context(op)?;
    let moods = stmt
        .query_map(params![owner, cursor_id, limit as i64 + 1], mood_from_row)
        .store_context(op)?
        .collect::<rusqlite::Result<Vec<_>>>()
        .store_context(op)?;

    Ok(Page::from_overfetch(moods, limit))
}

/// Find one of the owner's stored moods, ignoring the catalog.
pub(crate) fn find_user_mood(conn: &Connection, owner: &str, name: &str) -> SayResult<Option<Mood>> {
    let name = fold_name(name);
    let op = || format!("finding mood {name:?} for owner {owner:?}");
    conn.prepare_cached(FIND_MOOD)
        .store_context(op)?
        .query_row(params![owner, name], mood_from_row)
        .optional()
        .store_context(op)
}

/// Resolve a mood name: catalog first, then the owner's moods.
pub fn get_mood(conn: &Connection, owner: &str, name: &str) -> SayResult<Mood> {
    if let Some(builtin) = catalog::find(name) {
        return Ok(builtin.to_mood());
    }

    find_user_mood(conn, owner, name)?.ok_or_else(|| SayError::NotFound {
        entity: "mood",
        id: name.to_string(),
    })
}

/// Stored mood names are Unicode-lowercased, so lookups fold the same way.
fn fold_name(name: &str) -> String {
    name.to_lowercase()
}

fn validate_display(field: &str, value: &str) -> SayResult<()> {
    let len = value.chars().count();
    if len != 2 {
        return Err(SayError::InvalidArgument(format!(
            "{field} must be exactly 2 characters, got {len}"
        )));
    }
    Ok(())
}

/// Create or update one of the owner's moods. Updating keeps the row, so the
/// mood keeps its place in listings.
pub fn set_mood(
    conn: &Connection,
    owner: &str,
    name: &str,
    eyes: &str,
    tongue: &str,
) -> SayResult<Mood> {
    if catalog::is_builtin(name) {
        return Err(SayError::BuiltinProtected {
            name: name.to_string(),
        });
    }
    if name.trim().is_empty() {
        return Err(SayError::InvalidArgument("mood name must not be empty".into()));
    }
    validate_display("eyes", eyes)?;
    validate_display("tongue", tongue)?;
    let name = fold_name(name);

    let (seq, stored_name): (i64, String) = conn
        .prepare_cached(SET_MOOD)
        .and_then(|mut stmt| {
            stmt.query_row(params![owner, name, eyes, tongue], |row| {
                Ok((row.get(0)?, row.get(1)?))
            })
        })
        .store_context(|| format!("upserting mood {name:?} for owner {owner:?}"))?;

    tracing::debug!(owner, name = %stored_name, "mood stored");

    Ok(Mood {
        name: stored_name,
        eyes: eyes.to_string(),
        tongue: tongue.to_string(),
        user_defined: true,
        seq: Some(seq),
    })
}

/// Delete one of the owner's moods.
///
/// Catalog names are rejected before touching the store. A mood still used by
/// lines yields [`SayError::Conflict`] listing those lines.
pub fn delete_mood(conn: &Connection, owner: &str, name: &str) -> SayResult<()> {
    if catalog::is_builtin(name) {
        return Err(SayError::BuiltinProtected {
            name: name.to_string(),
        });
    }

    let folded = fold_name(name);
    let target = Target {
        entity: "mood",
        owner,
        id: name,
    };
    delete_row(conn, DELETE_MOOD, params![owner, folded], target, |conn| {
        mood_lines(conn, owner, &folded)
    })
}

/// Public ids of the owner's lines that use mood `name` (already folded),
/// oldest first.
fn mood_lines(conn: &Connection, owner: &str, name: &str) -> SayResult<Vec<String>> {
    let op = || format!("listing lines for mood {name:?} and owner {owner:?}");
    let mut stmt = conn.prepare_cached(MOOD_LINES).store_context(op)?;
    let ids = stmt
        .query_map(params![owner, name], |row| row.get(0))
        .store_context(op)?
        .collect::<rusqlite::Result<Vec<String>>>()
        .store_context(op)?;
    Ok(ids)
}
