//! Cursor pagination over one or two ordered sources.
//!
//! Moods come from two partitions: the owner's rows in the store and the
//! built-in catalog. They are not interleaved by key. Ascending listings walk
//! the store partition and then the catalog; descending listings walk the
//! catalog (backwards) and then the store (backwards). A cursor that does not
//! resolve in the first partition is handed to the second unchanged, since
//! the boundary item may live there.

use super::error::{SayError, SayResult};
use super::types::Page;

/// Largest page a caller may request.
pub const MAX_LIMIT: usize = 100;

/// Traversal order, derived from which cursor is set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Ascending,
    Descending,
}

impl Direction {
    /// Pick between two per-direction variants of a statement.
    pub(crate) fn pick<'a>(self, asc: &'a str, desc: &'a str) -> &'a str {
        match self {
            Self::Ascending => asc,
            Self::Descending => desc,
        }
    }
}

/// Listing parameters. At most one of `after` / `before` may be set; empty
/// strings count as unset.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListArgs {
    pub after: Option<String>,
    pub before: Option<String>,
    pub limit: usize,
}

impl ListArgs {
    /// First page in ascending order.
    pub fn first(limit: usize) -> Self {
        Self {
            limit,
            ..Self::default()
        }
    }

    pub fn after(cursor: impl Into<String>, limit: usize) -> Self {
        Self {
            after: Some(cursor.into()),
            before: None,
            limit,
        }
    }

    pub fn before(cursor: impl Into<String>, limit: usize) -> Self {
        Self {
            after: None,
            before: Some(cursor.into()),
            limit,
        }
    }

    fn after_cursor(&self) -> Option<&str> {
        self.after.as_deref().filter(|c| !c.is_empty())
    }

    fn before_cursor(&self) -> Option<&str> {
        self.before.as_deref().filter(|c| !c.is_empty())
    }

    /// Ascending unless only `before` is set.
    pub fn direction(&self) -> Direction {
        if self.after_cursor().is_some() || self.before_cursor().is_none() {
            Direction::Ascending
        } else {
            Direction::Descending
        }
    }

    /// The cursor that applies to [`Self::direction`].
    pub fn cursor(&self) -> Option<&str> {
        match self.direction() {
            Direction::Ascending => self.after_cursor(),
            Direction::Descending => self.before_cursor(),
        }
    }

    pub(crate) fn validate(&self) -> SayResult<()> {
        if self.limit > MAX_LIMIT {
            return Err(SayError::InvalidArgument(format!(
                "limit must be between 0 and {MAX_LIMIT}, got {}",
                self.limit
            )));
        }
        if self.after_cursor().is_some() && self.before_cursor().is_some() {
            return Err(SayError::InvalidArgument(
                "only one of after and before may be set".into(),
            ));
        }
        Ok(())
    }
}

/// One ordered source of items.
///
/// `page` must return at most `limit` items and report overflow in
/// `has_more`. An unresolvable cursor is reported as
/// [`SayError::CursorNotFound`].
pub(crate) trait Partition<T> {
    fn label(&self) -> &'static str;

    fn page(&self, direction: Direction, cursor: Option<&str>, limit: usize) -> SayResult<Page<T>>;
}

/// Concatenate the store and catalog partitions into one page.
pub(crate) fn merge<T>(
    args: &ListArgs,
    store: &dyn Partition<T>,
    catalog: &dyn Partition<T>,
) -> SayResult<Page<T>> {
    args.validate()?;

    let direction = args.direction();
    let (first, second) = match direction {
        Direction::Ascending => (store, catalog),
        Direction::Descending => (catalog, store),
    };

    let mut items = Vec::new();
    let mut remaining = args.limit;
    let mut cursor = args.cursor();

    match first.page(direction, cursor, remaining) {
        Ok(page) => {
            if page.items.len() == args.limit {
                return Ok(Page {
                    items: page.items,
                    has_more: true,
                });
            }
            remaining -= page.items.len();
            items = page.items;
            // The first partition is exhausted; the second starts at its edge.
            cursor = None;
        }
        Err(SayError::CursorNotFound { .. }) => {
            tracing::debug!(
                partition = first.label(),
                cursor = ?cursor,
                "cursor not in first partition, trying second"
            );
        }
        Err(e) => return Err(e),
    }

    let page = second.page(direction, cursor, remaining)?;
    items.extend(page.items);

    Ok(Page {
        items,
        has_more: page.has_more,
    })
}
