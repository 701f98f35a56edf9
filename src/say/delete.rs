//! Scoped deletes that tell "missing" apart from "still referenced".
//!
//! No transaction wraps the delete and the follow-up referrer lookup. The
//! referrer list attached to [`SayError::Conflict`] is diagnostic and may be
//! stale if rows change in between.

use rusqlite::{Connection, Params};

use super::error::{SayError, SayResult, StoreContext, Violation};

/// Identifies the row a delete targets, for errors and logs.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Target<'a> {
    pub entity: &'static str,
    pub owner: &'a str,
    pub id: &'a str,
}

/// Execute a single-row delete.
///
/// Zero affected rows is [`SayError::NotFound`]. A foreign key violation runs
/// `referrers` on the same connection and returns [`SayError::Conflict`] with
/// its result.
pub(crate) fn delete_row<P, F>(
    conn: &Connection,
    sql: &str,
    params: P,
    target: Target<'_>,
    referrers: F,
) -> SayResult<()>
where
    P: Params,
    F: FnOnce(&Connection) -> SayResult<Vec<String>>,
{
    let op = || {
        format!(
            "deleting {} {:?} for owner {:?}",
            target.entity, target.id, target.owner
        )
    };

    let result = conn.prepare_cached(sql).store_context(op)?.execute(params);

    match result {
        Ok(0) => Err(SayError::NotFound {
            entity: target.entity,
            id: target.id.to_string(),
        }),
        Ok(_) => {
            tracing::debug!(entity = target.entity, id = target.id, owner = target.owner, "deleted");
            Ok(())
        }
        Err(e) if Violation::of(&e) == Some(Violation::Referential) => {
            let ids = referrers(conn)?;
            tracing::warn!(
                entity = target.entity,
                id = target.id,
                owner = target.owner,
                referrers = ids.len(),
                "delete blocked by references"
            );
            Err(SayError::Conflict { ids })
        }
        Err(source) => Err(SayError::Store { op: op(), source }),
    }
}

/// Referrer lookup for rows nothing can reference.
pub(crate) fn no_referrers(_: &Connection) -> SayResult<Vec<String>> {
    Ok(Vec::new())
}
