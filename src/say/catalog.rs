//! Built-in moods.
//!
//! The catalog is fixed at compile time and never persisted. Names are
//! reserved for every owner and compared case-insensitively.

use super::error::{SayError, SayResult};
use super::paginate::{Direction, Partition};
use super::types::{Mood, Page};

/// A built-in mood.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogMood {
    pub name: &'static str,
    pub eyes: &'static str,
    pub tongue: &'static str,
}

impl CatalogMood {
    const fn new(name: &'static str, eyes: &'static str, tongue: &'static str) -> Self {
        Self { name, eyes, tongue }
    }

    pub fn to_mood(&self) -> Mood {
        Mood {
            name: self.name.to_string(),
            eyes: self.eyes.to_string(),
            tongue: self.tongue.to_string(),
            user_defined: false,
            seq: None,
        }
    }
}

/// Catalog in declared order. Listing order follows this array.
pub const BUILTIN_MOODS: [CatalogMood; 8] = [
    CatalogMood::new("default", "oo", "  "),
    CatalogMood::new("borg", "==", "  "),
    CatalogMood::new("dead", "xx", "U "),
    CatalogMood::new("greedy", "$$", "  "),
    CatalogMood::new("stoned", "**", "U "),
    CatalogMood::new("tired", "--", "  "),
    CatalogMood::new("wired", "OO", "  "),
    CatalogMood::new("young", "..", "  "),
];

/// Look up a built-in mood by name, ignoring case.
pub fn find(name: &str) -> Option<&'static CatalogMood> {
    BUILTIN_MOODS
        .iter()
        .find(|m| m.name.eq_ignore_ascii_case(name))
}

pub fn is_builtin(name: &str) -> bool {
    find(name).is_some()
}

/// Scan the catalog in `direction`, starting just past `cursor` if given.
pub fn page(direction: Direction, cursor: Option<&str>, limit: usize) -> SayResult<Page<Mood>> {
    let capacity = limit + 1;
    let mut found = cursor.is_none();
    let mut moods = Vec::new();

    for i in 0..BUILTIN_MOODS.len() {
        let mood = match direction {
            Direction::Ascending => &BUILTIN_MOODS[i],
            Direction::Descending => &BUILTIN_MOODS[BUILTIN_MOODS.len() - 1 - i],
        };

        if found {
            moods.push(mood.to_mood());
            if moods.len() == capacity {
                break;
            }
        } else if cursor.is_some_and(|c| mood.name.eq_ignore_ascii_case(c)) {
            found = true;
        }
    }

    if !found {
        return Err(SayError::CursorNotFound {
            cursor: cursor.unwrap_or_default().to_string(),
        });
    }

    Ok(Page::from_overfetch(moods, limit))
}

/// The catalog as a pagination partition.
pub(crate) struct CatalogPartition;

impl Partition<Mood> for CatalogPartition {
    fn label(&self) -> &'static str {
        "built-in"
    }

    fn page(&self, direction: Direction, cursor: Option<&str>, limit: usize) -> SayResult<Page<Mood>> {
        page(direction, cursor, limit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(page: &Page<Mood>) -> Vec<&str> {
        page.items.iter().map(|m| m.name.as_str()).collect()
    }

    #[test]
    fn find_ignores_case() {
        assert_eq!(find("BoRg").map(|m| m.eyes), Some("=="));
        assert!(is_builtin("Default"));
        assert!(!is_builtin("happy"));
    }

    #[test]
    fn catalog_moods_are_not_user_defined() {
        for m in BUILTIN_MOODS {
            let mood = m.to_mood();
            assert!(!mood.user_defined);
            assert_eq!(mood.seq, None);
            assert_eq!(mood.eyes.chars().count(), 2);
            assert_eq!(mood.tongue.chars().count(), 2);
        }
    }

    #[test]
    fn ascending_without_cursor() {
        let page = super::page(Direction::Ascending, None, 3).unwrap();
        assert_eq!(names(&page), vec!["default", "borg", "dead"]);
        assert!(page.has_more);
    }

    #[test]
    fn descending_without_cursor() {
        let page = super::page(Direction::Descending, None, 2).unwrap();
        assert_eq!(names(&page), vec!["young", "wired"]);
        assert!(page.has_more);
    }

    #[test]
    fn cursor_is_exclusive() {
        let page = super::page(Direction::Ascending, Some("stoned"), 10).unwrap();
        assert_eq!(names(&page), vec!["tired", "wired", "young"]);
        assert!(!page.has_more);

        let page = super::page(Direction::Descending, Some("borg"), 10).unwrap();
        assert_eq!(names(&page), vec!["default"]);
    }

    #[test]
    fn cursor_at_edge_yields_empty_page() {
        let page = super::page(Direction::Ascending, Some("young"), 10).unwrap();
        assert!(page.items.is_empty());
        assert!(!page.has_more);
    }

    #[test]
    fn exact_fit_has_no_more() {
        let page = super::page(Direction::Ascending, None, BUILTIN_MOODS.len()).unwrap();
        assert_eq!(page.items.len(), BUILTIN_MOODS.len());
        assert!(!page.has_more);
    }

    #[test]
    fn unknown_cursor_fails() {
        let err = super::page(Direction::Ascending, Some("happy"), 10).unwrap_err();
        assert!(matches!(err, SayError::CursorNotFound { cursor } if cursor == "happy"));
    }
}
