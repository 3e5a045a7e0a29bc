use clap::{Parser, Subcommand};
use clap_verbosity_flag::{InfoLevel, Verbosity};
use dotenv::dotenv;
use std::{path::PathBuf, time::Duration};

#[derive(Debug, Clone, Parser)]
pub struct Config {
    /// Content API endpoint, e.g. `https://<repo>.cdn.prismic.io/api/v2`
    #[arg(long, env = "PRISMIC_API_ENDPOINT")]
    endpoint: String,
    /// Access token of a private repository
    #[arg(long, env = "PRISMIC_ACCESS_TOKEN", hide_env_values = true)]
    access_token: Option<String>,
    /// Where generated pages are stored
    #[arg(short, long, default_value = "./out", env = "OUTPUT", global = true)]
    output: PathBuf,
    /// Request timeout in seconds
    #[arg(long, default_value = "30")]
    timeout: u64,
    #[command(subcommand)]
    command: Command,
    #[command(flatten)]
    pub verbose: Verbosity<InfoLevel>,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Generate the listing and every known post
    Build,
    /// Show the listing and load more posts on demand
    List,
    /// Show one post, generating it first if needed
    Post {
        /// Uid (slug) of the post
        uid: String,
    },
}

/// Everything the CMS client needs. Built once, never changed afterwards.
#[derive(Debug, Clone)]
pub struct CmsConfig {
    pub endpoint: String,
    pub access_token: Option<String>,
    pub timeout: Duration,
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
            .format_timestamp(None)
            .init();
    }
    pub fn cms(&self) -> CmsConfig {
        CmsConfig {
            endpoint: self.endpoint.clone(),
            access_token: self.access_token.clone().filter(|t| !t.is_empty()),
            timeout: self.timeout(),
        }
    }
    pub const fn output(&self) -> &PathBuf {
        &self.output
    }
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }
    pub const fn command(&self) -> &Command {
        &self.command
    }
}
