//! Repository listing command

use colored::Colorize;
use log::debug;

use crate::cli::CommandContext;
use crate::cli::OutputFormat;
use crate::cli::args::GlobalOptions;
use crate::client::models::Repository;
use crate::error::Result;
use crate::models::RepoDisplay;
use crate::output::{Formattable, print_json, progress};

/// Run the repos command
///
/// Lists the user's repositories enriched with language bytes and detected
/// tech stack. Repositories with nothing to analyze are left out.
pub async fn run(opts: &GlobalOptions, username: &str, limit: Option<usize>) -> Result<()> {
    let ctx = CommandContext::new(opts)?;
    let limit = limit.unwrap_or(ctx.settings.repo_limit);

    let spinner = progress::spinner(
        ctx.format,
        &format!("Fetching repositories of {}...", username),
    );
    let repos = ctx.source.enriched_repositories(username, limit).await;
    progress::finish(spinner);

    debug!("Fetched {} enriched repositories", repos.len());

    match ctx.format {
        OutputFormat::Json => print_json(&repos),
        OutputFormat::Table => repos
            .iter()
            .map(RepoDisplay::from)
            .collect::<Vec<_>>()
            .print(ctx.format),
        OutputFormat::Pretty => {
            print_pretty(&repos);
            Ok(())
        }
    }
}

fn print_pretty(repos: &[Repository]) {
    if repos.is_empty() {
        println!("No results found.");
        return;
    }

    for repo in repos {
        println!(
            "{}  {} {}",
            repo.name.bold(),
            format!("★ {}", repo.stars).yellow(),
            format!("⑂ {}", repo.forks).dimmed()
        );
        if let Some(description) = repo.description.as_deref().filter(|d| !d.is_empty()) {
            println!("  {}", description);
        }
        if !repo.topics.is_empty() {
            println!("  {} {}", "Topics:".dimmed(), repo.topics.join(", "));
        }

        let shares = repo.language_shares();
        if !shares.is_empty() {
            let line = shares
                .iter()
                .map(|(lang, pct)| format!("{} {:.1}%", lang, pct))
                .collect::<Vec<_>>()
                .join(", ");
            println!("  {} {}", "Languages:".dimmed(), line);
        }

        for (tech, evidence) in &repo.detected_tech_stack {
            println!(
                "  {} {} {}",
                "•".cyan(),
                tech,
                format!("({})", evidence.join(", ")).dimmed()
            );
        }
        println!();
    }
}
