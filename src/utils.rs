use anyhow::Context;
use time::macros::format_description;
use tracing_subscriber::fmt::time::LocalTime;
use tracing_subscriber::EnvFilter;
use url::Url;

use crate::args::{Args, RelayKind};

/// Logs go to stderr so they never interleave with the rendered stats.
/// `RUST_LOG` applies unless `--verbose` asks for everything at info.
pub fn setup_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("error"))
    };
    let timer = LocalTime::new(format_description!(
        "[hour]:[minute]:[second].[subsecond digits:3]"
    ));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_timer(timer)
        .with_writer(std::io::stderr)
        .init();
}

pub fn format_number(num: u64) -> String {
    num.to_string()
        .as_bytes()
        .rchunks(3)
        .rev()
        .map(|chunk| String::from_utf8_lossy(chunk))
        .collect::<Vec<_>>()
        .join(",")
}

pub fn validate_args(args: &Args) -> anyhow::Result<()> {
    if args.max_length == 0 {
        anyhow::bail!("--max-length must be greater than 0");
    }

    Url::parse(args.endpoint.trim())
        .with_context(|| format!("--endpoint is not a valid URL: {}", args.endpoint))?;

    if args.relay != RelayKind::Direct {
        Url::parse(args.proxy.trim())
            .with_context(|| format!("--proxy is not a valid URL: {}", args.proxy))?;
    }

    if args.relay == RelayKind::Header && args.relay_header.trim().is_empty() {
        anyhow::bail!("--relay-header must not be empty");
    }

    Ok(())
}
