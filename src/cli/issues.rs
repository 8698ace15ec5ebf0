//! Issue listing command

use colored::Colorize;

use crate::cache::client::qualify_repo;
use crate::cli::args::GlobalOptions;
use crate::cli::{CommandContext, OutputFormat};
use crate::error::Result;
use crate::models::IssueDisplay;
use crate::output::{Formattable, print_json, progress};

/// Run the issues command
pub async fn run(opts: &GlobalOptions, repo: &str, limit: usize) -> Result<()> {
    let ctx = CommandContext::new(opts)?;
    let repo = qualify_repo(repo);

    let spinner = progress::spinner(ctx.format, &format!("Fetching issues of {}...", repo));
    let fetched = ctx.source.repo_issues(&repo, limit).await;
    progress::finish(spinner);

    if let Some(error) = fetched.error() {
        eprintln!("{} Could not fetch issues: {}", "⚠".yellow(), error);
    }
    let issues = fetched.into_value();

    match ctx.format {
        OutputFormat::Json => print_json(&issues),
        _ => issues
            .iter()
            .map(IssueDisplay::from)
            .collect::<Vec<_>>()
            .print(ctx.format),
    }
}
