pub mod args;
pub mod client;
pub mod config;
pub mod counter;
pub mod error;
pub mod pipeline;
pub mod query;
pub mod relay;
pub mod render;
pub mod stats;
pub mod username;
pub mod utils;

pub use args::Args;
pub use client::{HttpClient, HttpRequest, HttpResponse, ReqwestClient};
pub use config::Config;
pub use error::{FetchError, SearchError, ValidationError};
pub use pipeline::{Outcome, StatsPipeline};
pub use relay::Relay;
pub use render::{Card, RecordingSink, RenderSink, TerminalSink};
pub use stats::{Difficulty, Progress, UserStats};
pub use username::{validate, validate_with_max_length, Username};
