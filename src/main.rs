use anyhow::{Context, Result};
use clap::Parser;
use std::io::Write;
use std::process::ExitCode;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{error, info};

use leetstats::render::trigger_label;
use leetstats::utils::setup_logging;
use leetstats::{
    validate_with_max_length, Args, Config, Outcome, ReqwestClient, SearchError, StatsPipeline,
    TerminalSink,
};

type Pipeline = StatsPipeline<ReqwestClient, TerminalSink>;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<ExitCode> {
    let args = Args::parse();
    setup_logging(args.verbose);

    let config = Config::from_args(&args)?;
    let client = ReqwestClient::new().context("Failed to build HTTP client")?;
    let pipeline = StatsPipeline::new(
        client,
        TerminalSink::new(config.animate),
        config.relay.clone(),
        config.endpoint.clone(),
    );

    match args.username.as_deref() {
        Some(raw) => Ok(search(&pipeline, raw, config.max_length).await),
        None => run_prompt(&pipeline, config.max_length).await,
    }
}

/// One activation of the search trigger.
async fn search(pipeline: &Pipeline, raw: &str, max_length: usize) -> ExitCode {
    let username = match validate_with_max_length(raw, max_length) {
        Ok(username) => username,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::from(2);
        }
    };

    println!("\n--- LeetCode progress for {} ---", username);
    match pipeline.fetch_and_render(&username).await {
        Ok(Outcome::Rendered(_)) | Ok(Outcome::NotFound) => ExitCode::SUCCESS,
        Ok(Outcome::Failed(e)) => {
            error!("Error: {}", e);
            ExitCode::FAILURE
        }
        Err(SearchError::Busy) => {
            eprintln!("{}", SearchError::Busy);
            ExitCode::FAILURE
        }
    }
}

async fn run_prompt(pipeline: &Pipeline, max_length: usize) -> Result<ExitCode> {
    info!(action = "start", component = "prompt", "Reading usernames from stdin");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        print!("[{}] username: ", trigger_label(pipeline.is_busy()));
        std::io::stdout().flush()?;

        let Some(line) = lines
            .next_line()
            .await
            .context("Failed to read from stdin")?
        else {
            println!();
            break;
        };
        search(pipeline, &line, max_length).await;
    }

    Ok(ExitCode::SUCCESS)
}
