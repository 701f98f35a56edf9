//! Value objects returned to the HTTP layer.
//!
//! Internal sequence ids ride along on the entities as crate-private,
//! never-serialized fields. Only the store writes them.

use serde::Serialize;

/// Display parameters for a cow. Either built-in or owned by a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Mood {
    pub name: String,
    pub eyes: String,
    pub tongue: String,
    /// `false` for catalog moods.
    pub user_defined: bool,
    #[serde(skip)]
    pub(crate) seq: Option<i64>,
}

/// A titled, ordered sequence of lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Conversation {
    pub id: String,
    pub heading: String,
    /// Populated by `get_conversation` only; listings leave it `None`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lines: Option<Vec<Line>>,
    #[serde(skip)]
    pub(crate) seq: i64,
}

/// One utterance in a conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Line {
    pub id: String,
    pub animal: String,
    pub think: bool,
    pub text: String,
    /// Mood resolved at read time. Serialized as its name; the renderer reads
    /// `eyes` and `tongue` from it.
    #[serde(rename = "mood", serialize_with = "serialize_mood_name")]
    pub mood: Mood,
}

fn serialize_mood_name<S>(mood: &Mood, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.serialize_str(&mood.name)
}

/// Input for `insert_line`. `mood` names either a catalog or a user mood.
#[derive(Debug, Clone)]
pub struct NewLine {
    pub animal: String,
    pub think: bool,
    pub mood: String,
    pub text: String,
}

/// One page of results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub has_more: bool,
}

impl<T> Page<T> {
    /// Build a page from a source that was asked for `limit + 1` rows.
    pub(crate) fn from_overfetch(mut items: Vec<T>, limit: usize) -> Self {
        let has_more = items.len() > limit;
        items.truncate(limit);
        Self { items, has_more }
    }
}
