use log::{debug, info};

use crate::{
    api::{ApiError, RedditApi, LISTING_PAGE_LIMIT},
    comment::{harvest_comments, CommentRecord},
    config::Sort,
    reddit::{Edited, Submission},
};

/// A harvested submission together with its flattened comments.
#[derive(Debug, Clone, PartialEq)]
pub struct PostRecord {
    pub id: String,
    pub title: String,
    pub body: String,
    pub score: i64,
    pub upvote_ratio: Option<f64>,
    pub url: String,
    pub author: Option<String>,
    pub created_utc: f64,
    pub num_comments: u64,
    pub flair: Option<String>,
    pub is_moderator_post: bool,
    pub edited: Edited,
    pub awards: Option<u64>,
    pub gilded: Option<u64>,
    pub crossposts: Option<usize>,
    pub comments: Vec<CommentRecord>,
}

impl PostRecord {
    pub fn new(submission: Submission, comments: Vec<CommentRecord>) -> Self {
        Self {
            is_moderator_post: submission.is_moderator_post(),
            crossposts: submission.crosspost_parent_list.as_ref().map(Vec::len),
            id: submission.id,
            title: submission.title,
            body: submission.selftext,
            score: submission.score,
            upvote_ratio: submission.upvote_ratio,
            url: submission.url,
            author: submission.author,
            created_utc: submission.created_utc,
            num_comments: submission.num_comments,
            flair: submission.link_flair_text,
            edited: submission.edited,
            awards: submission.total_awards_received,
            gilded: submission.gilded,
            comments,
        }
    }
}

/// Page through a subreddit listing and harvest every submission's comments.
///
/// Stops after `limit` submissions, at the end of the listing, or on an empty page.
pub async fn harvest_posts(
    api: &impl RedditApi,
    subreddit: &str,
    sort: Sort,
    limit: Option<usize>,
) -> Result<Vec<PostRecord>, ApiError> {
    let mut posts: Vec<PostRecord> = vec![];
    let mut after: Option<String> = None;

    loop {
        let remaining = limit.map(|limit| limit.saturating_sub(posts.len()));
        if remaining == Some(0) {
            break;
        }
        let page_size = remaining.unwrap_or(LISTING_PAGE_LIMIT).min(LISTING_PAGE_LIMIT);

        let listing = api.listing(subreddit, sort, page_size, after.as_deref()).await?;
        after = listing.data.after.clone();
        let page = listing.into_children();
        debug!("page of {} submissions (after: {:?})", page.len(), after);
        if page.is_empty() {
            break;
        }

        for thing in page.into_iter().take(remaining.unwrap_or(usize::MAX)) {
            let submission = thing.data;
            info!("Scraping submission: {}", submission.title);
            let comments = harvest_comments(api, &submission.id).await?;
            info!(" + {} comments", comments.len());
            posts.push(PostRecord::new(submission, comments));
        }

        if after.is_none() {
            break;
        }
    }

    Ok(posts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::{submission_json, FakeReddit};

    fn subreddit(count: usize) -> FakeReddit {
        (0..count).fold(FakeReddit::new(), |api, i| {
            api.submission(submission_json(&format!("s{}", i), &format!("post {}", i), Some("alice")))
        })
    }

    #[tokio::test]
    async fn limit_caps_a_single_page() {
        let api = subreddit(5);

        let posts = harvest_posts(&api, "Leica", Sort::Hot, Some(3)).await.unwrap();
        let ids: Vec<&str> = posts.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["s0", "s1", "s2"]);

        let calls = api.calls();
        assert_eq!(calls.listing, vec![(3, None)]);
        assert_eq!(calls.comments.len(), 3);
    }

    #[tokio::test]
    async fn limit_spans_pages() {
        let api = subreddit(250);

        let posts = harvest_posts(&api, "Leica", Sort::New, Some(120)).await.unwrap();
        assert_eq!(posts.len(), 120);
        assert_eq!(posts[119].id, "s119");

        let calls = api.calls();
        assert_eq!(calls.listing, vec![(100, None), (20, Some("t3_s99".to_string()))]);
        assert_eq!(calls.comments.len(), 120);
    }

    #[tokio::test]
    async fn no_limit_reads_whole_listing() {
        let api = subreddit(150);

        let posts = harvest_posts(&api, "Leica", Sort::Hot, None).await.unwrap();
        assert_eq!(posts.len(), 150);
        assert_eq!(api.calls().listing.len(), 2);
    }

    #[tokio::test]
    async fn zero_limit_fetches_nothing() {
        let api = subreddit(5);

        let posts = harvest_posts(&api, "Leica", Sort::Hot, Some(0)).await.unwrap();
        assert!(posts.is_empty());
        assert!(api.calls().listing.is_empty());
    }

    #[test]
    fn record_keeps_optional_fields_unresolved() {
        let mut json = submission_json("p1", "Crosspost", None);
        json["total_awards_received"] = serde_json::Value::Null;
        json["crosspost_parent_list"] = serde_json::json!([{ "id": "x" }, { "id": "y" }]);
        json["distinguished"] = serde_json::json!("moderator");
        let submission: Submission = serde_json::from_value(json).unwrap();

        let post = PostRecord::new(submission, vec![]);
        assert_eq!(post.author, None);
        assert_eq!(post.awards, None);
        assert_eq!(post.crossposts, Some(2));
        assert!(post.is_moderator_post);
    }
}
