//! depbump - package.json dependency upgrade CLI tool
//!
//! Upgrades one library in a Bitbucket repository's package.json and opens
//! a pull request with the change.

use clap::Parser;
use depbump::cli::CliArgs;
use depbump::orchestrator::Workflow;
use depbump::output::{OutputFormatter, TextFormatter, Verbosity};
use depbump::remote::{BitbucketApiClient, BitbucketHost};
use std::io::{self, Write};
use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    let args = CliArgs::parse();

    // Run the main logic and handle errors
    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

/// Main application logic
async fn run(args: CliArgs) -> anyhow::Result<()> {
    // Fail on missing inputs before any network or file activity
    let inputs = args.validate()?;
    let config = args.workflow_config();

    if args.verbose {
        eprintln!("depbump v{}", env!("CARGO_PKG_VERSION"));
        eprintln!("Repository: {}/{}", inputs.workspace, inputs.repo_slug);
        eprintln!(
            "Library: {}; version: {}",
            inputs.library, inputs.library_version
        );
        if args.dry_run {
            eprintln!("Mode: dry-run");
        }
    }

    let client = BitbucketApiClient::new(&inputs.access_token, &args.base_url)?;
    let host = BitbucketHost::new(client);
    let repo = host.get_repo(&inputs.workspace, &inputs.repo_slug).await?;

    let workflow = Workflow::new(config);
    let outcome = workflow
        .run(&repo, &inputs.library, &inputs.library_version)
        .await?;

    let formatter = TextFormatter::new(Verbosity::from_flags(args.verbose, args.quiet));
    let mut stdout = io::stdout().lock();
    formatter.format(&outcome, &mut stdout)?;
    stdout.flush()?;

    Ok(())
}
