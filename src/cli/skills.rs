//! Skills command: the tech profile built from a user's footprint

use log::debug;

use crate::cli::args::GlobalOptions;
use crate::cli::{CommandContext, OutputFormat};
use crate::error::{Error, Result};
use crate::models::SkillDisplay;
use crate::output::{Formattable, print_json, progress};
use crate::profile;

/// Run the skills command
pub async fn run(opts: &GlobalOptions, username: &str, repo_limit: Option<usize>) -> Result<()> {
    let ctx = CommandContext::new(opts)?;
    let limit = repo_limit.unwrap_or(ctx.settings.repo_limit);

    let spinner = progress::spinner(ctx.format, &format!("Analyzing {}...", username));
    let analysis = profile::analyze_user(&ctx.source, username, limit).await;
    progress::finish(spinner);

    let Some(analysis) = analysis else {
        return Err(Error::NotFound(format!("user {}", username)));
    };
    debug!(
        "{} skills from {} repositories",
        analysis.tech.len(),
        analysis.repositories.len()
    );

    match ctx.format {
        OutputFormat::Json => print_json(&analysis.tech),
        _ => SkillDisplay::rows(&analysis.tech).print(ctx.format),
    }
}
