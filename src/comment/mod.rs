use std::collections::{HashMap, HashSet, VecDeque};

use log::debug;

use crate::{
    api::{ApiError, RedditApi, MORE_CHILDREN_LIMIT},
    reddit::{self, fullname, CommentThing, More},
};

/// A harvested comment, detached from its tree.
#[derive(Debug, Clone, PartialEq)]
pub struct CommentRecord {
    pub id: String,
    pub author: Option<String>,
    pub body: String,
    pub score: i64,
    pub created_utc: f64,
    pub upvote_ratio: Option<f64>,
    pub awards: Option<u64>,
}

impl From<&reddit::Comment> for CommentRecord {
    fn from(comment: &reddit::Comment) -> Self {
        Self {
            id: comment.id.clone(),
            author: comment.author.clone(),
            body: comment.body.clone(),
            score: comment.score,
            created_utc: comment.created_utc,
            upvote_ratio: comment.upvote_ratio,
            awards: comment.total_awards_received,
        }
    }
}

/// Comments of one submission, stored flat and linked by parent fullname.
#[derive(Debug)]
pub struct CommentForest {
    submission: String,
    comments: Vec<reddit::Comment>,
    known: HashSet<String>,
    children: HashMap<String, Vec<usize>>,
    pending: Vec<More>,
    seen_more: HashSet<String>,
}

impl CommentForest {
    pub fn new(submission: &str) -> Self {
        Self {
            submission: submission.to_string(),
            comments: vec![],
            known: HashSet::new(),
            children: HashMap::new(),
            pending: vec![],
            seen_more: HashSet::new(),
        }
    }

    pub fn link_id(&self) -> String {
        fullname("t3", &self.submission)
    }

    /// Merge comment things (and their nested replies) into the forest.
    ///
    /// Comments that are already known are skipped, their replies are not.
    pub fn insert(&mut self, things: Vec<CommentThing>) {
        for thing in things {
            match thing {
                CommentThing::Comment(mut comment) => {
                    let replies = std::mem::take(&mut comment.replies);
                    if self.known.insert(comment.id.clone()) {
                        self.children
                            .entry(comment.parent_id.clone())
                            .or_default()
                            .push(self.comments.len());
                        self.comments.push(*comment);
                    }
                    self.insert(replies);
                }
                CommentThing::More(more) => {
                    if self.seen_more.insert(more.key()) {
                        self.pending.push(more);
                    }
                }
            }
        }
    }

    pub fn has_more(&self) -> bool {
        !self.pending.is_empty()
    }

    pub fn len(&self) -> usize {
        self.comments.len()
    }

    /// Resolve every "load more comments" placeholder, including the ones
    /// uncovered while resolving others. Returns the number resolved.
    pub async fn replace_more(&mut self, api: &impl RedditApi) -> Result<usize, ApiError> {
        let mut resolved = 0;
        while let Some(more) = self.next_more() {
            if more.is_continue_thread() {
                let Some(parent) = more.parent_id.strip_prefix("t1_") else {
                    debug!(" skipping placeholder below {}", more.parent_id);
                    continue;
                };
                debug!(" continuing thread below {}", parent);
                let things = api.comments(&self.submission, Some(parent)).await?;
                self.insert(things);
            } else {
                debug!(" loading {} more below {}", more.children.len(), more.parent_id);
                let link_id = self.link_id();
                for chunk in more.children.chunks(MORE_CHILDREN_LIMIT) {
                    let things = api.more_children(&link_id, chunk).await?;
                    self.insert(things);
                }
            }
            resolved += 1;
        }
        Ok(resolved)
    }

    /// The largest placeholder goes first.
    fn next_more(&mut self) -> Option<More> {
        let index = self
            .pending
            .iter()
            .enumerate()
            .max_by_key(|(_, more)| more.count)
            .map(|(index, _)| index)?;
        Some(self.pending.swap_remove(index))
    }

    /// Comments in breadth-first order, top level first.
    pub fn list(&self) -> Vec<&reddit::Comment> {
        let mut listed = vec![false; self.comments.len()];
        let mut list = Vec::with_capacity(self.comments.len());

        let mut queue: VecDeque<usize> = self
            .children
            .get(&self.link_id())
            .map(|roots| roots.iter().copied().collect())
            .unwrap_or_default();
        while let Some(index) = queue.pop_front() {
            let comment = &self.comments[index];
            listed[index] = true;
            list.push(comment);
            if let Some(replies) = self.children.get(&fullname("t1", &comment.id)) {
                queue.extend(replies.iter().copied());
            }
        }

        // replies whose parent never arrived
        for (index, comment) in self.comments.iter().enumerate() {
            if !listed[index] {
                list.push(comment);
            }
        }
        list
    }
}

/// Fetch the fully expanded comment tree of a submission, flattened.
pub async fn harvest_comments(
    api: &impl RedditApi,
    submission: &str,
) -> Result<Vec<CommentRecord>, ApiError> {
    let mut forest = CommentForest::new(submission);
    forest.insert(api.comments(submission, None).await?);

    let resolved = if forest.has_more() {
        forest.replace_more(api).await?
    } else {
        0
    };
    debug!(" {} comments, {} placeholders resolved", forest.len(), resolved);

    Ok(forest.list().into_iter().map(CommentRecord::from).collect())
}
