#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use saypi::db::{self, DbPool};
use saypi::say::{IdSource, Mood, NewLine, Page, Repository};

pub const OWNER: &str = "user-1";
pub const OTHER_OWNER: &str = "user-2";

/// Built-in mood names in declared order.
pub const CATALOG: [&str; 8] = [
    "default", "borg", "dead", "greedy", "stoned", "tired", "wired", "young",
];

/// Open a fresh in-memory database and a repository over it.
pub fn test_repo() -> (DbPool, Repository) {
    let pool = db::open_memory_database().unwrap();
    let repo = Repository::new(pool.clone());
    (pool, repo)
}

/// Like [`test_repo`] but with a caller-supplied id source.
pub fn test_repo_with_ids(ids: Arc<dyn IdSource>) -> (DbPool, Repository) {
    let pool = db::open_memory_database().unwrap();
    let repo = Repository::with_id_source(pool.clone(), ids);
    (pool, repo)
}

/// Create user moods for `owner` in the given order.
pub fn seed_moods(repo: &Repository, owner: &str, names: &[&str]) {
    for name in names {
        repo.set_mood(owner, name, "^^", "  ").unwrap();
    }
}

pub fn names(page: &Page<Mood>) -> Vec<String> {
    page.items.iter().map(|m| m.name.clone()).collect()
}

pub fn new_line(mood: &str, text: &str) -> NewLine {
    NewLine {
        animal: "default".into(),
        think: false,
        mood: mood.into(),
        text: text.into(),
    }
}

/// Id source that always yields the same value and counts how often it was
/// asked.
pub struct FixedIds {
    value: u64,
    calls: AtomicUsize,
}

impl FixedIds {
    pub fn new(value: u64) -> Arc<Self> {
        Arc::new(Self {
            value,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl IdSource for FixedIds {
    fn next_value(&self) -> Result<u64, rand::Error> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.value)
    }
}

/// True if `id` is `prefix` followed by one or more lowercase base-36 digits.
pub fn is_public_id(id: &str, prefix: &str) -> bool {
    match id.strip_prefix(prefix) {
        Some(rest) => {
            !rest.is_empty()
                && rest
                    .chars()
                    .all(|c| c.is_ascii_digit() || c.is_ascii_lowercase())
        }
        None => false,
    }
}
