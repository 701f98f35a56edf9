//! Error taxonomy for the data-access layer.
//!
//! Every repository operation returns [`SayError`] via [`SayResult`]. Storage
//! failures are never swallowed: they are wrapped in [`SayError::Store`] along
//! with the operation and its scoping parameters. Constraint failures are
//! classified once, at the storage boundary, by [`Violation::of`].

use rusqlite::{ffi, ErrorCode};
use thiserror::Error;

/// Alias for `Result<T, SayError>`.
pub type SayResult<T> = Result<T, SayError>;

/// Errors surfaced to the HTTP layer.
#[derive(Debug, Error)]
pub enum SayError {
    /// A scoped lookup or delete matched zero rows.
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    /// The pagination boundary did not resolve in either partition.
    #[error("invalid cursor: {cursor}")]
    CursorNotFound { cursor: String },

    /// A mutation was attempted on a built-in mood.
    #[error("cannot modify built-in mood: {name}")]
    BuiltinProtected { name: String },

    /// A delete was blocked by live references. `ids` is diagnostic only and
    /// may be stale under concurrent modification.
    #[error("operation failed due to conflicts with: [{}]", .ids.join(", "))]
    Conflict { ids: Vec<String> },

    /// Every generated public id collided with an existing row.
    #[error("unable to insert a new, unique {entity} after {attempts} attempts")]
    GenerationExhausted {
        entity: &'static str,
        attempts: usize,
    },

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Stored data breaks a write-time invariant.
    #[error("data integrity violation: {0}")]
    Integrity(String),

    #[error("{op}: {source}")]
    Store {
        op: String,
        #[source]
        source: rusqlite::Error,
    },

    /// No pooled connection could be checked out.
    #[error("{op}: connection pool: {source}")]
    Pool {
        op: String,
        #[source]
        source: r2d2::Error,
    },

    #[error("{op}: {source}")]
    Random {
        op: String,
        #[source]
        source: rand::Error,
    },
}

/// Constraint signals the repository reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Violation {
    /// A `UNIQUE` or primary key constraint rejected the write.
    Uniqueness,
    /// A foreign key constraint rejected the write.
    Referential,
}

impl Violation {
    /// Classify a storage error, or `None` if it is not a constraint signal.
    pub fn of(err: &rusqlite::Error) -> Option<Self> {
        match err {
            rusqlite::Error::SqliteFailure(e, _) if e.code == ErrorCode::ConstraintViolation => {
                match e.extended_code {
                    ffi::SQLITE_CONSTRAINT_UNIQUE | ffi::SQLITE_CONSTRAINT_PRIMARYKEY => {
                        Some(Self::Uniqueness)
                    }
                    ffi::SQLITE_CONSTRAINT_FOREIGNKEY => Some(Self::Referential),
                    _ => None,
                }
            }
            _ => None,
        }
    }
}

/// Attach operation context to a raw storage result.
pub(crate) trait StoreContext<T> {
    fn store_context<F>(self, op: F) -> SayResult<T>
    where
        F: FnOnce() -> String;
}

impl<T> StoreContext<T> for rusqlite::Result<T> {
    fn store_context<F>(self, op: F) -> SayResult<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|source| SayError::Store { op: op(), source })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::Connection;

    fn test_db() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        conn.pragma_update(None, "foreign_keys", "ON").unwrap();
        conn.execute_batch(
            "CREATE TABLE parent (id INTEGER PRIMARY KEY, tag TEXT UNIQUE);
             CREATE TABLE child (id INTEGER PRIMARY KEY, parent_id INTEGER REFERENCES parent(id));
             INSERT INTO parent (id, tag) VALUES (1, 'a');
             INSERT INTO child (id, parent_id) VALUES (1, 1);",
        )
        .unwrap();
        conn
    }

    #[test]
    fn classifies_unique_violation() {
        let conn = test_db();
        let err = conn
            .execute("INSERT INTO parent (id, tag) VALUES (2, 'a')", [])
            .unwrap_err();
        assert_eq!(Violation::of(&err), Some(Violation::Uniqueness));
    }

    #[test]
    fn classifies_primary_key_violation() {
        let conn = test_db();
        let err = conn
            .execute("INSERT INTO parent (id, tag) VALUES (1, 'b')", [])
            .unwrap_err();
        assert_eq!(Violation::of(&err), Some(Violation::Uniqueness));
    }

    #[test]
    fn classifies_foreign_key_violation() {
        let conn = test_db();
        let err = conn.execute("DELETE FROM parent WHERE id = 1", []).unwrap_err();
        assert_eq!(Violation::of(&err), Some(Violation::Referential));
    }

    #[test]
    fn other_errors_are_not_violations() {
        let conn = test_db();
        let err = conn.execute("SELECT * FROM missing", []).unwrap_err();
        assert_eq!(Violation::of(&err), None);
        assert_eq!(Violation::of(&rusqlite::Error::QueryReturnedNoRows), None);
    }

    #[test]
    fn conflict_lists_ids() {
        let err = SayError::Conflict {
            ids: vec!["ln_1".into(), "ln_2".into()],
        };
        assert_eq!(
            err.to_string(),
            "operation failed due to conflicts with: [ln_1, ln_2]"
        );
    }

    #[test]
    fn store_context_wraps_source() {
        let result: rusqlite::Result<()> = Err(rusqlite::Error::QueryReturnedNoRows);
        let err = result
            .store_context(|| "finding mood \"x\" for owner \"u\"".to_string())
            .unwrap_err();
        assert!(matches!(err, SayError::Store { .. }));
        assert!(err.to_string().starts_with("finding mood \"x\" for owner \"u\""));
    }
}
