//! CLI command handlers. Each prints its result to stdout as pretty JSON.

use anyhow::{Context, Result};
use serde::Serialize;

use saypi::config::SaypiConfig;
use saypi::db;
use saypi::say::{ListArgs, NewLine, Repository};

/// An open repository plus the owner every command acts for.
pub struct Session {
    repo: Repository,
    owner: String,
    default_limit: usize,
}

impl Session {
    pub fn open(config: &SaypiConfig, owner: String) -> Result<Self> {
        let db_path = config.resolved_db_path();
        let pool = db::open_database(&db_path, config.storage.pool_size)
            .with_context(|| format!("failed to open database at {}", db_path.display()))?;

        Ok(Self {
            repo: Repository::new(pool),
            owner,
            default_limit: config.pagination.default_limit,
        })
    }

    fn list_args(&self, after: Option<String>, before: Option<String>, limit: Option<usize>) -> ListArgs {
        ListArgs {
            after,
            before,
            limit: limit.unwrap_or(self.default_limit),
        }
    }

    pub fn list_moods(&self, after: Option<String>, before: Option<String>, limit: Option<usize>) -> Result<()> {
        let args = self.list_args(after, before, limit);
        print_json(&self.repo.list_moods(&self.owner, &args)?)
    }

    pub fn get_mood(&self, name: &str) -> Result<()> {
        print_json(&self.repo.get_mood(&self.owner, name)?)
    }

    pub fn set_mood(&self, name: &str, eyes: &str, tongue: &str) -> Result<()> {
        print_json(&self.repo.set_mood(&self.owner, name, eyes, tongue)?)
    }

    pub fn delete_mood(&self, name: &str) -> Result<()> {
        self.repo.delete_mood(&self.owner, name)?;
        print_json(&serde_json::json!({ "deleted": name }))
    }

    pub fn list_conversations(
        &self,
        after: Option<String>,
        before: Option<String>,
        limit: Option<usize>,
    ) -> Result<()> {
        let args = self.list_args(after, before, limit);
        print_json(&self.repo.list_conversations(&self.owner, &args)?)
    }

    pub fn new_conversation(&self, heading: &str) -> Result<()> {
        print_json(&self.repo.new_conversation(&self.owner, heading)?)
    }

    pub fn get_conversation(&self, id: &str) -> Result<()> {
        print_json(&self.repo.get_conversation(&self.owner, id)?)
    }

    pub fn delete_conversation(&self, id: &str) -> Result<()> {
        self.repo.delete_conversation(&self.owner, id)?;
        print_json(&serde_json::json!({ "deleted": id }))
    }

    pub fn insert_line(&self, conversation: &str, line: NewLine) -> Result<()> {
        print_json(&self.repo.insert_line(&self.owner, conversation, &line)?)
    }

    pub fn get_line(&self, conversation: &str, line: &str) -> Result<()> {
        print_json(&self.repo.get_line(&self.owner, conversation, line)?)
    }

    pub fn delete_line(&self, conversation: &str, line: &str) -> Result<()> {
        self.repo.delete_line(&self.owner, conversation, line)?;
        print_json(&serde_json::json!({ "deleted": line }))
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
