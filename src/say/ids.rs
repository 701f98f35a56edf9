//! Public identifier generation.
//!
//! Ids are `<prefix><base36 of a random 63-bit integer>`. Uniqueness is
//! arbitrated by the store's `UNIQUE` constraint: [`insert_with_unique_id`]
//! retries on a uniqueness violation and gives up after
//! [`MAX_INSERT_ATTEMPTS`]. No lock is held between attempts.

use rand::rngs::OsRng;
use rand::RngCore;

use super::error::{SayError, SayResult, Violation};

/// Upper bound on insert attempts per new row.
pub const MAX_INSERT_ATTEMPTS: usize = 16;

pub const CONVERSATION_PREFIX: &str = "cv_";
pub const LINE_PREFIX: &str = "ln_";

/// Source of random id values.
///
/// Values must fit in 63 bits. Implementations must be safe to share across
/// threads.
pub trait IdSource: Send + Sync {
    fn next_value(&self) -> Result<u64, rand::Error>;
}

/// Id source backed by the operating system RNG.
#[derive(Debug, Default, Clone, Copy)]
pub struct OsRandomIds;

impl IdSource for OsRandomIds {
    fn next_value(&self) -> Result<u64, rand::Error> {
        let mut buf = [0u8; 8];
        OsRng.try_fill_bytes(&mut buf)?;
        Ok(u64::from_le_bytes(buf) & i64::MAX as u64)
    }
}

/// Render `value` in lowercase base 36 after `prefix`.
pub fn format_id(prefix: &str, mut value: u64) -> String {
    const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

    if value == 0 {
        return format!("{prefix}0");
    }

    let mut digits = Vec::with_capacity(13);
    while value > 0 {
        digits.push(DIGITS[(value % 36) as usize]);
        value /= 36;
    }
    digits.reverse();

    let mut id = String::with_capacity(prefix.len() + digits.len());
    id.push_str(prefix);
    // DIGITS is ASCII.
    id.extend(digits.into_iter().map(char::from));
    id
}

/// Run `insert` with freshly generated ids until one is accepted.
///
/// `insert` receives the candidate public id. A uniqueness violation triggers
/// another attempt; any other error aborts. Returns the accepted id together
/// with whatever `insert` produced. `owner` only scopes error messages.
pub(crate) fn insert_with_unique_id<T, F>(
    ids: &dyn IdSource,
    prefix: &str,
    entity: &'static str,
    owner: &str,
    mut insert: F,
) -> SayResult<(String, T)>
where
    F: FnMut(&str) -> rusqlite::Result<T>,
{
    for attempt in 1..=MAX_INSERT_ATTEMPTS {
        let value = ids.next_value().map_err(|source| SayError::Random {
            op: format!("generating {entity} id for owner {owner:?}"),
            source,
        })?;
        let public_id = format_id(prefix, value);

        match insert(&public_id) {
            Ok(out) => return Ok((public_id, out)),
            Err(e) if Violation::of(&e) == Some(Violation::Uniqueness) => {
                tracing::debug!(entity, attempt, id = %public_id, "public id collision, retrying");
            }
            Err(source) => {
                return Err(SayError::Store {
                    op: format!("inserting {entity} {public_id:?} for owner {owner:?}"),
                    source,
                })
            }
        }
    }

    tracing::warn!(entity, attempts = MAX_INSERT_ATTEMPTS, "exhausted public id attempts");
    Err(SayError::GenerationExhausted {
        entity,
        attempts: MAX_INSERT_ATTEMPTS,
    })
}
