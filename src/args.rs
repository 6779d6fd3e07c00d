use clap::{Parser, ValueEnum};

use crate::relay::{DEFAULT_ENDPOINT, DEFAULT_PROXY, DEFAULT_RELAY_HEADER};
use crate::username::DEFAULT_MAX_LENGTH;

#[derive(Parser, Debug)]
#[command(
    name = "leetstats",
    about = "Show a LeetCode user's solved problems and submission totals",
    version,
    long_about = None
)]
pub struct Args {
    /// Username to look up; prompts for usernames when omitted
    pub username: Option<String>,

    /// GraphQL endpoint of the stats API
    #[arg(long, default_value = DEFAULT_ENDPOINT)]
    pub endpoint: String,

    /// How requests reach the endpoint
    #[arg(long, value_enum, default_value_t = RelayKind::Prefix)]
    pub relay: RelayKind,

    /// Proxy base URL used by the prefix and header relays
    #[arg(long, default_value = DEFAULT_PROXY)]
    pub proxy: String,

    /// Header naming the target URL for the header relay
    #[arg(long, default_value = DEFAULT_RELAY_HEADER)]
    pub relay_header: String,

    /// Longest accepted username
    #[arg(long, default_value_t = DEFAULT_MAX_LENGTH)]
    pub max_length: usize,

    /// Draw final values without the count-up animation
    #[arg(long)]
    pub no_animate: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum RelayKind {
    /// Post to the endpoint without a proxy
    Direct,
    /// Append the endpoint URL to the proxy URL
    Prefix,
    /// Post to the proxy and pass the endpoint in a header
    Header,
}
