//! Moods, conversations, and lines.
//!
//! Every operation exists twice: as a free function over a
//! `&rusqlite::Connection` (in the submodules) and as a method on
//! [`Repository`], which checks a connection out of the pool and delegates.
//! All operations are scoped by an opaque owner id.

pub mod catalog;
pub mod conversations;
mod delete;
pub mod error;
pub mod ids;
pub mod lines;
pub mod moods;
pub mod paginate;
pub mod types;

use std::sync::Arc;

use r2d2::PooledConnection;
use r2d2_sqlite::SqliteConnectionManager;

use crate::db::DbPool;

pub use error::{SayError, SayResult, Violation};
pub use ids::{IdSource, OsRandomIds};
pub use paginate::{Direction, ListArgs, MAX_LIMIT};
pub use types::{Conversation, Line, Mood, NewLine, Page};

/// Entry point for the HTTP layer.
///
/// Cheap to clone; clones share the pool and the id source.
#[derive(Clone)]
pub struct Repository {
    pool: DbPool,
    ids: Arc<dyn IdSource>,
}

impl Repository {
    /// Repository drawing public ids from the OS RNG.
    pub fn new(pool: DbPool) -> Self {
        Self::with_id_source(pool, Arc::new(OsRandomIds))
    }

    pub fn with_id_source(pool: DbPool, ids: Arc<dyn IdSource>) -> Self {
        Self { pool, ids }
    }

    fn conn(&self, op: &str, owner: &str) -> SayResult<PooledConnection<SqliteConnectionManager>> {
        self.pool.get().map_err(|source| SayError::Pool {
            op: format!("{op} for owner {owner:?}"),
            source,
        })
    }

    pub fn list_moods(&self, owner: &str, args: &ListArgs) -> SayResult<Page<Mood>> {
        tracing::debug!(owner, ?args, "list_moods");
        let conn = self.conn("list_moods", owner)?;
        moods::list_moods(&conn, owner, args)
    }

    pub fn get_mood(&self, owner: &str, name: &str) -> SayResult<Mood> {
        tracing::debug!(owner, name, "get_mood");
        let conn = self.conn("get_mood", owner)?;
        moods::get_mood(&conn, owner, name)
    }

    pub fn set_mood(&self, owner: &str, name: &str, eyes: &str, tongue: &str) -> SayResult<Mood> {
        tracing::debug!(owner, name, "set_mood");
        let conn = self.conn("set_mood", owner)?;
        moods::set_mood(&conn, owner, name, eyes, tongue)
    }

    pub fn delete_mood(&self, owner: &str, name: &str) -> SayResult<()> {
        tracing::debug!(owner, name, "delete_mood");
        let conn = self.conn("delete_mood", owner)?;
        moods::delete_mood(&conn, owner, name)
    }

    pub fn list_conversations(&self, owner: &str, args: &ListArgs) -> SayResult<Page<Conversation>> {
        tracing::debug!(owner, ?args, "list_conversations");
        let conn = self.conn("list_conversations", owner)?;
        conversations::list_conversations(&conn, owner, args)
    }

    pub fn new_conversation(&self, owner: &str, heading: &str) -> SayResult<Conversation> {
        tracing::debug!(owner, "new_conversation");
        let conn = self.conn("new_conversation", owner)?;
        conversations::new_conversation(&conn, self.ids.as_ref(), owner, heading)
    }

    pub fn get_conversation(&self, owner: &str, id: &str) -> SayResult<Conversation> {
        tracing::debug!(owner, id, "get_conversation");
        let conn = self.conn("get_conversation", owner)?;
        conversations::get_conversation(&conn, owner, id)
    }

    pub fn delete_conversation(&self, owner: &str, id: &str) -> SayResult<()> {
        tracing::debug!(owner, id, "delete_conversation");
        let conn = self.conn("delete_conversation", owner)?;
        conversations::delete_conversation(&conn, owner, id)
    }

    pub fn insert_line(&self, owner: &str, conversation_id: &str, line: &NewLine) -> SayResult<Line> {
        tracing::debug!(owner, conversation = conversation_id, mood = %line.mood, "insert_line");
        let conn = self.conn("insert_line", owner)?;
        lines::insert_line(&conn, self.ids.as_ref(), owner, conversation_id, line)
    }

    pub fn get_line(&self, owner: &str, conversation_id: &str, line_id: &str) -> SayResult<Line> {
        tracing::debug!(owner, conversation = conversation_id, line = line_id, "get_line");
        let conn = self.conn("get_line", owner)?;
        lines::get_line(&conn, owner, conversation_id, line_id)
    }

    pub fn delete_line(&self, owner: &str, conversation_id: &str, line_id: &str) -> SayResult<()> {
        tracing::debug!(owner, conversation = conversation_id, line = line_id, "delete_line");
        let conn = self.conn("delete_line", owner)?;
        lines::delete_line(&conn, owner, conversation_id, line_id)
    }
}
