//! Rate-limit command: remaining GitHub quota

use colored::Colorize;
use serde_json::json;

use crate::cli::args::GlobalOptions;
use crate::cli::{CommandContext, OutputFormat};
use crate::client::GitHubApi;
use crate::error::Result;
use crate::output::formatters::{format_epoch_local, format_wait};
use crate::output::print_json;

/// Run the rate-limit command
///
/// Queries the quota directly; the response is never cached.
pub async fn run(opts: &GlobalOptions) -> Result<()> {
    let ctx = CommandContext::new(opts)?;
    let state = ctx.source.inner().rate_limit().await?;
    let resets_in = (state.reset_at - ctx.clock.now()).num_seconds();

    match ctx.format {
        OutputFormat::Json => print_json(&json!({
            "limit": state.limit,
            "remaining": state.remaining,
            "resetAt": state.reset_at.to_rfc3339(),
            "resetsInSecs": resets_in.max(0),
        })),
        _ => {
            let remaining = state.remaining.to_string();
            let remaining = if state.remaining < ctx.settings.low_water_mark {
                remaining.red()
            } else {
                remaining.green()
            };
            println!("{}", "GitHub API quota".bold());
            println!("Remaining:  {} / {}", remaining, state.limit);
            println!(
                "Resets at:  {} (in {})",
                format_epoch_local(state.reset_at.timestamp()),
                format_wait(resets_in)
            );
            Ok(())
        }
    }
}
