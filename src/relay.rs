//! Proxy relay routing.
//!
//! The stats endpoint does not serve cross-origin callers, so requests are
//! normally bounced through a public relay. Relays differ in how they learn
//! the target, and all of that lives here.

use crate::client::HttpRequest;

pub const DEFAULT_ENDPOINT: &str = "https://leetcode.com/graphql/";
pub const DEFAULT_PROXY: &str = "https://api.allorigins.win/raw?url=";
pub const DEFAULT_RELAY_HEADER: &str = "x-target-url";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Relay {
    /// Post straight to the target.
    Direct,
    /// Append the target URL verbatim to the proxy base.
    Prefix(String),
    /// Post to the proxy base and name the target in a header; the proxy
    /// rewrites the request on its way through.
    Header { base: String, header: String },
}

impl Default for Relay {
    fn default() -> Self {
        Relay::Prefix(DEFAULT_PROXY.to_string())
    }
}

impl Relay {
    /// Starts a request for `target` addressed the way this relay expects.
    pub fn route(&self, target: &str) -> HttpRequest {
        match self {
            Relay::Direct => HttpRequest::new(target),
            Relay::Prefix(base) => HttpRequest::new(format!("{}{}", base, target)),
            Relay::Header { base, header } => {
                let mut request = HttpRequest::new(base.clone());
                request.headers.push((header.clone(), target.to_string()));
                request
            }
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Relay::Direct => "direct",
            Relay::Prefix(_) => "prefix",
            Relay::Header { .. } => "header",
        }
    }
}
