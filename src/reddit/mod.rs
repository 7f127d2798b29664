pub mod comment;
pub mod submission;

use serde::{Deserialize, Deserializer};

pub use comment::{Comment, CommentThing, More};
pub use submission::{Edited, Submission};

/// The name the API substitutes for removed accounts.
pub const DELETED_AUTHOR: &str = "[deleted]";

/// `{ "kind": "Listing", "data": { "after": ..., "children": [...] } }`
#[derive(Debug, Clone, Deserialize)]
pub struct Listing<T> {
    pub data: ListingData<T>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ListingData<T> {
    #[serde(default)]
    pub after: Option<String>,
    #[serde(default = "Vec::new")]
    pub children: Vec<T>,
}

impl<T> Listing<T> {
    pub fn into_children(self) -> Vec<T> {
        self.data.children
    }
}

/// A single-kind thing wrapper, `{ "kind": "t3", "data": {...} }`.
#[derive(Debug, Clone, Deserialize)]
pub struct Thing<T> {
    #[allow(unused)]
    pub kind: String,
    pub data: T,
}

/// Deleted accounts arrive either as `null` or as the literal `[deleted]`.
pub(crate) fn deserialize_author<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let author = Option::<String>::deserialize(deserializer)?;
    Ok(author.filter(|name| !name.is_empty() && name != DELETED_AUTHOR))
}

pub fn fullname(kind: &str, id: &str) -> String {
    format!("{}_{}", kind, id)
}
