use anyhow::Result;
use tracing::info;

use crate::args::{Args, RelayKind};
use crate::relay::Relay;
use crate::utils::validate_args;

/// Settings for a session, resolved from the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub endpoint: String,
    pub relay: Relay,
    pub max_length: usize,
    pub animate: bool,
}

impl Config {
    pub fn from_args(args: &Args) -> Result<Self> {
        validate_args(args)?;

        let relay = match args.relay {
            RelayKind::Direct => Relay::Direct,
            RelayKind::Prefix => Relay::Prefix(args.proxy.trim().to_string()),
            RelayKind::Header => Relay::Header {
                base: args.proxy.trim().to_string(),
                header: args.relay_header.trim().to_string(),
            },
        };

        let config = Self {
            endpoint: args.endpoint.trim().to_string(),
            relay,
            max_length: args.max_length,
            animate: !args.no_animate,
        };
        info!(action = "resolve", component = "config", endpoint = %config.endpoint, relay = ?config.relay, max_length = config.max_length, animate = config.animate, "Configuration resolved");
        Ok(config)
    }
}
