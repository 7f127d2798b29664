use serde::Deserialize;
use serde_json::Value;

use super::deserialize_author;

/// A `t3` thing as returned by subreddit listings.
#[derive(Debug, Clone, Deserialize)]
pub struct Submission {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub selftext: String,
    pub score: i64,
    #[serde(default)]
    pub upvote_ratio: Option<f64>,
    #[serde(default)]
    pub url: String,
    #[serde(default, deserialize_with = "deserialize_author")]
    pub author: Option<String>,
    pub created_utc: f64,
    #[serde(default)]
    pub num_comments: u64,
    #[serde(default)]
    pub link_flair_text: Option<String>,
    #[serde(default)]
    pub distinguished: Option<String>,
    #[serde(default)]
    pub edited: Edited,
    #[serde(default)]
    pub total_awards_received: Option<u64>,
    #[serde(default)]
    pub gilded: Option<u64>,
    /// Only present on crossposts.
    #[serde(default)]
    pub crosspost_parent_list: Option<Vec<Value>>,
}

impl Submission {
    pub fn is_moderator_post(&self) -> bool {
        self.distinguished.as_deref() == Some("moderator")
    }
}

/// `edited` is `false` for untouched posts and the edit time otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Edited {
    Flag(bool),
    At(f64),
}

impl Default for Edited {
    fn default() -> Self {
        Edited::Flag(false)
    }
}

impl Edited {
    pub fn is_edited(&self) -> bool {
        match self {
            Edited::Flag(flag) => *flag,
            Edited::At(_) => true,
        }
    }
    pub fn at(&self) -> Option<f64> {
        match self {
            Edited::Flag(_) => None,
            Edited::At(at) => Some(*at),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn decode_minimal_submission() {
        let submission: Submission = serde_json::from_value(json!({
            "id": "abc",
            "title": "M6 at dusk",
            "score": 42,
            "created_utc": 1700000000.0,
            "author": null,
        }))
        .unwrap();

        assert_eq!(submission.id, "abc");
        assert_eq!(submission.author, None);
        assert_eq!(submission.edited, Edited::Flag(false));
        assert_eq!(submission.total_awards_received, None);
        assert_eq!(submission.upvote_ratio, None);
        assert!(submission.crosspost_parent_list.is_none());
        assert!(!submission.is_moderator_post());
    }

    #[test]
    fn decode_edited_and_distinguished() {
        let submission: Submission = serde_json::from_value(json!({
            "id": "abc",
            "title": "Weekly thread",
            "score": 1,
            "created_utc": 1700000000,
            "author": "AutoModerator",
            "distinguished": "moderator",
            "edited": 1700000500.5,
            "crosspost_parent_list": [{ "id": "xyz" }],
            "link_flair_text": "Discussion",
        }))
        .unwrap();

        assert!(submission.is_moderator_post());
        assert!(submission.edited.is_edited());
        assert_eq!(submission.edited.at(), Some(1700000500.5));
        assert_eq!(submission.crosspost_parent_list.map(|l| l.len()), Some(1));
        assert_eq!(submission.link_flair_text.as_deref(), Some("Discussion"));
    }
}
