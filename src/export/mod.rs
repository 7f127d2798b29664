use std::{
    fs,
    io,
    path::{Path, PathBuf},
};

use log::{debug, info};
use serde::Serialize;
use thiserror::Error;

use crate::{
    comment::CommentRecord, post::PostRecord, reddit::DELETED_AUTHOR, utils::format_date,
};

/// One CSV row per post, without its comments.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PostRow {
    pub post_id: String,
    pub title: String,
    pub post_body: String,
    pub score: i64,
    pub upvote_ratio: Option<f64>,
    pub url: String,
    pub author: String,
    pub created_utc: f64,
    pub created_date: Option<String>,
    pub num_comments: u64,
    pub post_flair: Option<String>,
    pub is_moderator_post: bool,
    pub is_edited: bool,
    pub edited_utc: Option<f64>,
    pub awards: u64,
    pub gilded: u64,
    pub crosspost_count: usize,
}

impl PostRow {
    pub const HEADERS: [&'static str; 17] = [
        "post_id",
        "title",
        "post_body",
        "score",
        "upvote_ratio",
        "url",
        "author",
        "created_utc",
        "created_date",
        "num_comments",
        "post_flair",
        "is_moderator_post",
        "is_edited",
        "edited_utc",
        "awards",
        "gilded",
        "crosspost_count",
    ];
}

impl From<PostRecord> for PostRow {
    fn from(post: PostRecord) -> Self {
        Self {
            created_date: format_date(post.created_utc),
            is_edited: post.edited.is_edited(),
            edited_utc: post.edited.at(),
            post_id: post.id,
            title: post.title,
            post_body: post.body,
            score: post.score,
            upvote_ratio: post.upvote_ratio,
            url: post.url,
            author: author_or_deleted(post.author),
            created_utc: post.created_utc,
            num_comments: post.num_comments,
            post_flair: post.flair,
            is_moderator_post: post.is_moderator_post,
            awards: post.awards.unwrap_or_default(),
            gilded: post.gilded.unwrap_or_default(),
            crosspost_count: post.crossposts.unwrap_or_default(),
        }
    }
}

/// One CSV row per comment, joined to its post by `post_id`.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CommentRow {
    pub comment_id: String,
    pub comment_author: String,
    pub comment_body: String,
    pub comment_score: i64,
    pub comment_created_utc: f64,
    pub comment_created_date: Option<String>,
    pub comment_upvote_ratio: Option<f64>,
    pub comment_awards: u64,
    pub post_id: String,
}

impl CommentRow {
    pub const HEADERS: [&'static str; 9] = [
        "comment_id",
        "comment_author",
        "comment_body",
        "comment_score",
        "comment_created_utc",
        "comment_created_date",
        "comment_upvote_ratio",
        "comment_awards",
        "post_id",
    ];

    pub fn new(comment: CommentRecord, post_id: &str) -> Self {
        Self {
            comment_created_date: format_date(comment.created_utc),
            comment_id: comment.id,
            comment_author: author_or_deleted(comment.author),
            comment_body: comment.body,
            comment_score: comment.score,
            comment_created_utc: comment.created_utc,
            comment_upvote_ratio: comment.upvote_ratio,
            comment_awards: comment.awards.unwrap_or_default(),
            post_id: post_id.to_string(),
        }
    }
}

fn author_or_deleted(author: Option<String>) -> String {
    author.unwrap_or_else(|| DELETED_AUTHOR.to_string())
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct Tables {
    pub posts: Vec<PostRow>,
    pub comments: Vec<CommentRow>,
}

/// Split posts and their nested comments into two tables.
pub fn flatten(posts: Vec<PostRecord>) -> Tables {
    let mut tables = Tables::default();
    for mut post in posts {
        let comments = std::mem::take(&mut post.comments);
        tables
            .comments
            .extend(comments.into_iter().map(|comment| CommentRow::new(comment, &post.id)));
        tables.posts.push(post.into());
    }
    tables
}

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to write {}: {source}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}

/// File names used for a subreddit, `(posts, comments)`.
pub fn file_names(subreddit: &str) -> (String, String) {
    let prefix = subreddit.to_lowercase();
    (
        format!("{}_subreddit_posts.csv", prefix),
        format!("{}_subreddit_comments.csv", prefix),
    )
}

/// Write both tables into `output`, replacing existing files.
pub fn export(
    tables: &Tables,
    output: &Path,
    subreddit: &str,
) -> Result<(PathBuf, PathBuf), ExportError> {
    fs::create_dir_all(output).map_err(|source| ExportError::Io {
        path: output.to_path_buf(),
        source,
    })?;

    let (posts_file, comments_file) = file_names(subreddit);
    let posts_path = output.join(posts_file);
    let comments_path = output.join(comments_file);

    write_csv(&posts_path, &PostRow::HEADERS, &tables.posts)?;
    info!("{} posts -> {}", tables.posts.len(), posts_path.display());
    write_csv(&comments_path, &CommentRow::HEADERS, &tables.comments)?;
    info!("{} comments -> {}", tables.comments.len(), comments_path.display());

    Ok((posts_path, comments_path))
}

/// The header row is written explicitly so empty tables still carry it.
pub fn write_csv<T: Serialize>(
    path: &Path,
    headers: &[&str],
    rows: &[T],
) -> Result<(), ExportError> {
    let csv_error = |source: csv::Error| ExportError::Csv {
        path: path.to_path_buf(),
        source,
    };

    debug!("Writing {}", path.display());
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(path)
        .map_err(csv_error)?;

    writer.write_record(headers).map_err(csv_error)?;
    for row in rows {
        writer.serialize(row).map_err(csv_error)?;
    }
    writer.flush().map_err(|source| ExportError::Io {
        path: path.to_path_buf(),
        source,
    })
}
