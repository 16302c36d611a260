//! issue-bot entry point.
//!
//! This binary is the composition root. Responsibilities:
//!
//! 1. **Parse inputs**: flags or the `INPUT_*` variables set by the Actions
//!    runner, plus repository, token and endpoints from `GITHUB_*`.
//! 2. **Wire observability**: `tracing-subscriber` on stderr, text or JSON.
//! 3. **Construct infrastructure**: one [`github::GithubClient`] per run,
//!    handed by reference to the [`engine::Orchestrator`].
//! 4. **Report**: the new issue number as the `issue-number` step output on
//!    success; a `::error::` annotation and exit status 1 on failure.

mod args;
mod logging;
mod output;

use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use engine::Orchestrator;
use github::GithubClient;
use tracing::{error, info};

use crate::args::Cli;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init_tracing(cli.verbose, cli.log_format);

    match run(&cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let message = output::error_message(&err);
            error!(error = %message, "issue-bot failed");
            println!("{}", output::error_annotation(&message));
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: &Cli) -> Result<()> {
    let inputs = cli.raw_inputs()?;
    let client = GithubClient::new(cli.github_config()?)
        .context("failed to construct the GitHub client")?;

    let outcome = Orchestrator::new(&client).run(&inputs).await?;
    info!(
        issue = %outcome.issue.number,
        previous = ?outcome.previous.as_ref().map(|previous| previous.number),
        assignees = ?outcome.assignees,
        "issue created"
    );

    output::emit_issue_number(outcome.issue.number, cli.github_output.as_deref())
}
