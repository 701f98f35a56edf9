//! SQL DDL for all saypi tables.
//!
//! Defines `moods`, `conversations`, and `lines`. Every table has an
//! `AUTOINCREMENT` key so sequence ids only grow and are never reused. All DDL
//! uses `IF NOT EXISTS` for idempotent initialization.

use rusqlite::Connection;

const SCHEMA_SQL: &str = r#"
-- User-defined moods; names are stored lowercased
CREATE TABLE IF NOT EXISTS moods (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id TEXT NOT NULL,
    name TEXT NOT NULL,
    eyes TEXT NOT NULL,
    tongue TEXT NOT NULL,
    UNIQUE (user_id, name)
);

CREATE TABLE IF NOT EXISTS conversations (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    public_id TEXT NOT NULL UNIQUE,
    user_id TEXT NOT NULL,
    heading TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_conversations_user ON conversations(user_id, id);

-- mood_id is NULL for catalog moods; mood_name is always set
CREATE TABLE IF NOT EXISTS lines (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    public_id TEXT NOT NULL UNIQUE,
    conversation_id INTEGER NOT NULL REFERENCES conversations(id) ON DELETE CASCADE,
    animal TEXT NOT NULL,
    think INTEGER NOT NULL DEFAULT 0,
    text TEXT NOT NULL,
    mood_name TEXT NOT NULL,
    mood_id INTEGER REFERENCES moods(id)
);

CREATE INDEX IF NOT EXISTS idx_lines_conversation ON lines(conversation_id, id);
CREATE INDEX IF NOT EXISTS idx_lines_mood ON lines(mood_id);
"#;

/// Initialize all schema tables. Idempotent (uses IF NOT EXISTS).
pub fn init_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(SCHEMA_SQL)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_db() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        conn.pragma_update(None, "foreign_keys", "ON").unwrap();
        init_schema(&conn).unwrap();
        conn
    }

    #[test]
    fn schema_creates_all_tables() {
        let conn = test_db();

        let tables: Vec<String> = conn
            .prepare("SELECT name FROM sqlite_master WHERE type='table' ORDER BY name")
            .unwrap()
            .query_map([], |row| row.get(0))
            .unwrap()
            .collect::<Result<Vec<_>, _>>()
            .unwrap();

        assert!(tables.contains(&"moods".to_string()));
        assert!(tables.contains(&"conversations".to_string()));
        assert!(tables.contains(&"lines".to_string()));
    }

    #[test]
    fn schema_is_idempotent() {
        let conn = test_db();
        init_schema(&conn).unwrap(); // second call should not error
    }

    #[test]
    fn mood_names_unique_per_user() {
        let conn = test_db();
        conn.execute(
            "INSERT INTO moods (user_id, name, eyes, tongue) VALUES ('u', 'happy', '^^', '  ')",
            [],
        )
        .unwrap();
        conn.execute(
            "INSERT INTO moods (user_id, name, eyes, tongue) VALUES ('v', 'happy', '^^', '  ')",
            [],
        )
        .unwrap();

        let dup = conn.execute(
            "INSERT INTO moods (user_id, name, eyes, tongue) VALUES ('u', 'happy', '..', '  ')",
            [],
        );
        assert!(dup.is_err(), "same owner and name should be rejected");
    }

    #[test]
    fn sequence_ids_are_not_reused() {
        let conn = test_db();
        conn.execute(
            "INSERT INTO conversations (public_id, user_id, heading) VALUES ('cv_a', 'u', 'a')",
            [],
        )
        .unwrap();
        let first = conn.last_insert_rowid();
        conn.execute("DELETE FROM conversations", []).unwrap();
        conn.execute(
            "INSERT INTO conversations (public_id, user_id, heading) VALUES ('cv_b', 'u', 'b')",
            [],
        )
        .unwrap();
        assert!(conn.last_insert_rowid() > first);
    }
}
