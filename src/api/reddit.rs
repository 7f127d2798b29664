use log::{debug, log_enabled, trace};
use reqwest::{header::HeaderMap, Client};
use serde::{de::DeserializeOwned, Deserialize};
use serde_json::Value;

use crate::{
    config::{Credentials, Sort},
    reddit::{comment::MoreChildren, fullname, CommentThing, Listing, Submission, Thing},
};

use super::{ApiError, RedditApi};

const ACCESS_TOKEN_URL: &str = "https://www.reddit.com/api/v1/access_token";
const OAUTH_URL: &str = "https://oauth.reddit.com";
const COMMENT_LIMIT: &str = "500";

/// Application-only OAuth client.
#[derive(Debug, Clone)]
pub struct RedditClient {
    client: Client,
    token: String,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum TokenResponse {
    Token { access_token: String },
    Error { error: Value },
}

impl RedditClient {
    /// Authenticate with the `client_credentials` grant.
    pub async fn connect(credentials: &Credentials) -> Result<Self, ApiError> {
        let client = Client::builder()
            .user_agent(credentials.user_agent.as_str())
            .build()?;

        debug!("POST {}", ACCESS_TOKEN_URL);
        let response = client
            .post(ACCESS_TOKEN_URL)
            .basic_auth(&credentials.client_id, Some(&credentials.client_secret))
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await?;

        let status = response.status();
        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(ApiError::Auth(status.to_string()));
        }
        if !status.is_success() {
            return Err(ApiError::Status {
                status,
                url: ACCESS_TOKEN_URL.to_string(),
                body: response.text().await?,
            });
        }

        match response.json::<TokenResponse>().await? {
            TokenResponse::Token { access_token } => Ok(Self {
                client,
                token: access_token,
            }),
            TokenResponse::Error { error } => Err(ApiError::Auth(match error {
                Value::String(error) => error,
                error => error.to_string(),
            })),
        }
    }

    pub async fn fetch<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T, ApiError> {
        let response = self
            .client
            .get(format!("{}{}", OAUTH_URL, path))
            .bearer_auth(&self.token)
            .query(&[("raw_json", "1")])
            .query(query)
            .send()
            .await?;

        let url = response.url().to_string();
        let status = response.status();
        debug!("GET {} ({})", url, status);
        log_rate_limit(response.headers());

        let body = response.text().await?;
        if !status.is_success() {
            return Err(ApiError::Status { status, url, body });
        }

        if log_enabled!(log::Level::Trace) {
            if let Ok(value) = serde_json::from_str::<Value>(&body) {
                trace!("{}", serde_json::to_string_pretty(&value).unwrap_or_default());
            }
        }

        serde_json::from_str(&body).map_err(|source| ApiError::Decode { url, source })
    }
}

fn log_rate_limit(headers: &HeaderMap) {
    let header = |name: &str| {
        headers
            .get(name)
            .and_then(|value| value.to_str().ok())
            .unwrap_or("?")
            .to_string()
    };
    if headers.contains_key("x-ratelimit-remaining") {
        debug!(
            " rate limit: {} used, {} remaining, reset in {}s",
            header("x-ratelimit-used"),
            header("x-ratelimit-remaining"),
            header("x-ratelimit-reset")
        );
    }
}

impl RedditApi for RedditClient {
    async fn listing(
        &self,
        subreddit: &str,
        sort: Sort,
        limit: usize,
        after: Option<&str>,
    ) -> Result<Listing<Thing<Submission>>, ApiError> {
        let path = format!("/r/{}/{}", subreddit, sort);
        let limit = limit.to_string();
        let mut query = vec![("limit", limit.as_str())];
        if let Some(after) = after {
            query.push(("after", after));
        }
        self.fetch(&path, &query).await
    }

    async fn comments(
        &self,
        submission: &str,
        comment: Option<&str>,
    ) -> Result<Vec<CommentThing>, ApiError> {
        let path = match comment {
            Some(comment) => format!("/comments/{}/_/{}", submission, comment),
            None => format!("/comments/{}", submission),
        };
        let (_, comments): (Listing<Thing<Submission>>, Listing<CommentThing>) =
            self.fetch(&path, &[("limit", COMMENT_LIMIT)]).await?;
        Ok(comments.into_children())
    }

    async fn more_children(
        &self,
        link_id: &str,
        children: &[String],
    ) -> Result<Vec<CommentThing>, ApiError> {
        let children = children.join(",");
        let link_id = if link_id.starts_with("t3_") {
            link_id.to_string()
        } else {
            fullname("t3", link_id)
        };
        let response: MoreChildren = self
            .fetch(
                "/api/morechildren",
                &[
                    ("api_type", "json"),
                    ("link_id", link_id.as_str()),
                    ("children", children.as_str()),
                    ("limit_children", "false"),
                ],
            )
            .await?;

        if !response.json.errors.is_empty() {
            let errors: Vec<String> = response.json.errors.iter().map(Value::to_string).collect();
            return Err(ApiError::Api(format!("morechildren failed: {}", errors.join(", "))));
        }
        Ok(response.json.data.map(|data| data.things).unwrap_or_default())
    }
}
