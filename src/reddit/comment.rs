use serde::{Deserialize, Deserializer};

use super::{deserialize_author, Listing};

/// Children of a comment listing: real comments or "load more" placeholders.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", content = "data")]
pub enum CommentThing {
    #[serde(rename = "t1")]
    Comment(Box<Comment>),
    #[serde(rename = "more")]
    More(More),
}

#[derive(Debug, Clone, Deserialize)]
pub struct Comment {
    pub id: String,
    /// Fullname of the parent, `t1_*` for replies and `t3_*` for top level comments.
    pub parent_id: String,
    #[serde(default, deserialize_with = "deserialize_author")]
    pub author: Option<String>,
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub score: i64,
    pub created_utc: f64,
    #[serde(default)]
    pub upvote_ratio: Option<f64>,
    #[serde(default)]
    pub total_awards_received: Option<u64>,
    #[serde(default, deserialize_with = "deserialize_replies")]
    pub replies: Vec<CommentThing>,
}

/// A "load more comments" placeholder.
///
/// An empty `children` list (with id `_`) is a "continue this thread" link,
/// which can only be resolved by fetching the parent comment's subtree.
#[derive(Debug, Clone, Deserialize)]
pub struct More {
    pub id: String,
    pub parent_id: String,
    #[serde(default)]
    pub count: u64,
    #[serde(default)]
    pub children: Vec<String>,
}

impl More {
    pub fn is_continue_thread(&self) -> bool {
        self.children.is_empty()
    }
    pub fn key(&self) -> String {
        format!("{}/{}", self.parent_id, self.id)
    }
}

/// `replies` is an empty string when a comment has no children.
fn deserialize_replies<'de, D>(deserializer: D) -> Result<Vec<CommentThing>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Replies {
        Listing(Listing<CommentThing>),
        Empty(String),
    }

    Ok(match Option::<Replies>::deserialize(deserializer)? {
        Some(Replies::Listing(listing)) => listing.into_children(),
        Some(Replies::Empty(_)) | None => vec![],
    })
}

/// Body of `/api/morechildren?api_type=json`.
#[derive(Debug, Clone, Deserialize)]
pub struct MoreChildren {
    pub json: MoreChildrenJson,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MoreChildrenJson {
    #[serde(default)]
    pub errors: Vec<serde_json::Value>,
    #[serde(default)]
    pub data: Option<MoreChildrenData>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MoreChildrenData {
    #[serde(default)]
    pub things: Vec<CommentThing>,
}
