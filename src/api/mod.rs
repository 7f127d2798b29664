pub mod reddit;

use std::future::Future;

use reqwest::StatusCode;
use thiserror::Error;

use crate::{
    config::Sort,
    reddit::{CommentThing, Listing, Submission, Thing},
};

pub use reddit::RedditClient;

/// Largest page the listing endpoints serve.
pub const LISTING_PAGE_LIMIT: usize = 100;
/// Largest number of ids `/api/morechildren` accepts at once.
pub const MORE_CHILDREN_LIMIT: usize = 100;

/// Read access to the parts of the Reddit API the harvester needs.
pub trait RedditApi {
    /// One page of a subreddit listing, starting after the `after` fullname.
    fn listing(
        &self,
        subreddit: &str,
        sort: Sort,
        limit: usize,
        after: Option<&str>,
    ) -> impl Future<Output = Result<Listing<Thing<Submission>>, ApiError>> + Send;

    /// The comment tree of a submission, or only the subtree below `comment`.
    fn comments(
        &self,
        submission: &str,
        comment: Option<&str>,
    ) -> impl Future<Output = Result<Vec<CommentThing>, ApiError>> + Send;

    /// Resolve the ids listed by a "load more comments" placeholder.
    fn more_children(
        &self,
        link_id: &str,
        children: &[String],
    ) -> impl Future<Output = Result<Vec<CommentThing>, ApiError>> + Send;
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("{url} returned {status}: {body}")]
    Status {
        status: StatusCode,
        url: String,
        body: String,
    },
    #[error("authentication rejected: {0} (tips: check your client id and secret)")]
    Auth(String),
    #[error("failed to decode {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("{0}")]
    Api(String),
}
