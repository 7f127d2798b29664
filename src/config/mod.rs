pub mod sort;

use clap::Parser;
use clap_verbosity_flag::{InfoLevel, Verbosity};
use dotenv::dotenv;
use std::{fmt, path::PathBuf};
use thiserror::Error;

pub use sort::Sort;

pub const CLIENT_ID_VAR: &str = "REDDIT_CLIENT_ID";
pub const CLIENT_SECRET_VAR: &str = "REDDIT_CLIENT_SECRET";
pub const USER_AGENT_VAR: &str = "REDDIT_AGENT";

#[derive(Debug, Clone, Parser)]
#[command(version, about)]
pub struct Config {
    /// Your Reddit application client id
    #[arg(long, env = "REDDIT_CLIENT_ID", hide_env_values = true)]
    client_id: Option<String>,
    /// Your Reddit application client secret
    #[arg(long, env = "REDDIT_CLIENT_SECRET", hide_env_values = true)]
    client_secret: Option<String>,
    /// User agent sent with every request
    #[arg(long, env = "REDDIT_AGENT")]
    user_agent: Option<String>,
    /// Which subreddit you want to harvest
    #[arg(short, long, default_value = "Leica", env = "REDDIT_SUBREDDIT")]
    subreddit: String,
    /// Listing order
    #[arg(long, default_value = "hot")]
    sort: Sort,
    /// Maximum number of submissions [default: no limit]
    #[arg(short, long)]
    limit: Option<usize>,
    /// Which directory you want to save the CSV files to
    #[arg(short, long, default_value = ".", env = "OUTPUT")]
    output: PathBuf,
    #[command(flatten)]
    pub verbose: Verbosity<InfoLevel>,
}

impl Config {
    /// Parse the configuration from the environment and command line arguments
    pub fn parse() -> Self {
        dotenv().ok();
        <Self as Parser>::parse()
    }
    /// Create a logger with the configured verbosity level
    pub fn init_logger(&self) {
        env_logger::Builder::new()
            .filter_level(self.verbose.log_level_filter())
            .format_target(false)
            .init();
    }
    /// Get the application credentials, failing on any missing value
    pub fn credentials(&self) -> Result<Credentials, ConfigError> {
        fn required(value: &Option<String>, var: &'static str) -> Result<String, ConfigError> {
            match value.as_deref().map(str::trim) {
                Some(value) if !value.is_empty() => Ok(value.to_string()),
                _ => Err(ConfigError::Missing(var)),
            }
        }

        Ok(Credentials {
            client_id: required(&self.client_id, CLIENT_ID_VAR)?,
            client_secret: required(&self.client_secret, CLIENT_SECRET_VAR)?,
            user_agent: required(&self.user_agent, USER_AGENT_VAR)?,
        })
    }

    pub fn subreddit(&self) -> &str {
        &self.subreddit
    }
    pub const fn sort(&self) -> Sort {
        self.sort
    }
    pub const fn limit(&self) -> Option<usize> {
        self.limit
    }
    pub const fn output(&self) -> &PathBuf {
        &self.output
    }
}

#[derive(Clone)]
pub struct Credentials {
    pub client_id: String,
    pub client_secret: String,
    pub user_agent: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"***")
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing configuration: set the `{0}` environment variable")]
    Missing(&'static str),
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use clap::{
        builder::{OsStr, Resettable},
        CommandFactory, FromArgMatches,
    };

    use super::*;

    /// Parse arguments with every environment fallback switched off.
    fn parse(args: &[&str]) -> Config {
        let mut command = Config::command();
        for id in ["client_id", "client_secret", "user_agent", "subreddit", "output"] {
            command = command.mut_arg(id, |arg| arg.env(Resettable::<OsStr>::Reset));
        }
        let matches = command
            .try_get_matches_from(std::iter::once("subreddit-harvest").chain(args.iter().copied()))
            .unwrap();
        Config::from_arg_matches(&matches).unwrap()
    }

    #[test]
    fn credentials_from_arguments() {
        let config = parse(&[
            "--client-id",
            "id",
            "--client-secret",
            "secret",
            "--user-agent",
            "harvest/0.1",
        ]);
        let credentials = config.credentials().unwrap();
        assert_eq!(credentials.client_id, "id");
        assert_eq!(credentials.client_secret, "secret");
        assert_eq!(credentials.user_agent, "harvest/0.1");
        assert!(!format!("{:?}", credentials).contains("secret\""));
    }

    #[test]
    fn empty_credential_is_a_config_error() {
        let config = parse(&[
            "--client-id",
            "",
            "--client-secret",
            "secret",
            "--user-agent",
            "harvest/0.1",
        ]);
        let error = config.credentials().unwrap_err();
        assert!(matches!(error, ConfigError::Missing(CLIENT_ID_VAR)));
        assert!(error.to_string().contains("REDDIT_CLIENT_ID"));
    }

    #[test]
    fn unset_credential_is_a_config_error() {
        let config = parse(&["--client-secret", "secret", "--user-agent", "harvest/0.1"]);
        let error = config.credentials().unwrap_err();
        assert!(matches!(error, ConfigError::Missing(CLIENT_ID_VAR)));

        let config = parse(&["--client-id", "id", "--client-secret", "secret"]);
        assert!(matches!(
            config.credentials().unwrap_err(),
            ConfigError::Missing(USER_AGENT_VAR)
        ));
    }

    #[test]
    fn defaults_without_flags() {
        let config = parse(&[]);
        assert_eq!(config.subreddit(), "Leica");
        assert_eq!(config.output(), Path::new("."));
        assert_eq!(config.sort(), Sort::Hot);
        assert_eq!(config.limit(), None);
    }

    #[test]
    fn listing_options() {
        let config = parse(&["--subreddit", "analog", "--sort", "top", "--limit", "25"]);
        assert_eq!(config.subreddit(), "analog");
        assert_eq!(config.sort(), Sort::Top);
        assert_eq!(config.limit(), Some(25));

        let config = parse(&["--subreddit", "analog"]);
        assert_eq!(config.sort(), Sort::Hot);
        assert_eq!(config.limit(), None);
    }
}
