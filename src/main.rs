mod api;
mod comment;
mod config;
mod export;
mod post;
mod reddit;
mod utils;


use std::error::Error;

use api::RedditClient;
use config::Config;
use export::{export, flatten};
use log::info;
use post::harvest_posts;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let config = Config::parse();
    config.init_logger();
    info!("# Subreddit Harvest #");
    info!("");

    let credentials = config.credentials()?;
    let client = unit_short!("Authenticating", RedditClient::connect(&credentials).await?);
    info!("");

    info!("Subreddit: r/{}", config.subreddit());
    info!("Sort: {}", config.sort());
    match config.limit() {
        Some(limit) => info!("Limit: {} submissions", limit),
        None => info!("Limit: none"),
    }
    info!("");

    let posts = unit!(
        "Harvesting",
        harvest_posts(&client, config.subreddit(), config.sort(), config.limit()).await?
    );

    let tables = flatten(posts);
    unit!("Exporting", export(&tables, config.output(), config.subreddit())?);

    info!("All done!");
    Ok(())
}
