//! Status command implementation

use colored::Colorize;

use crate::cli::OutputFormat;
use crate::cli::args::GlobalOptions;
use crate::cli::context::load_settings;
use crate::config::Settings;
use crate::error::Result;
use crate::output::print_json;

/// Run the status command to display configuration status
pub fn run(opts: &GlobalOptions) -> Result<()> {
    let settings = load_settings(opts)?;

    if opts.format == OutputFormat::Json {
        return print_json(&serde_json::json!({
            "configPath": settings.config_path.display().to_string(),
            "configFileExists": settings.config_path.exists(),
            "githubToken": settings.github_token.is_some(),
            "llmApiKey": settings.llm_api_key.is_some(),
            "githubApiUrl": settings.github_api_url,
            "llmApiUrl": settings.llm_api_url,
            "cacheDir": settings.cache_dir.as_ref().map(|d| d.display().to_string()),
            "cacheEnabled": !opts.no_cache,
            "cacheTtlSecs": settings.cache_ttl.as_secs(),
            "minScore": settings.min_score,
            "limit": settings.limit,
            "issuesFile": settings.issues_file.display().to_string(),
        }));
    }

    print_pretty(&settings, opts.no_cache);
    Ok(())
}

fn print_pretty(settings: &Settings, no_cache: bool) {
    println!("{}\n", "skillmatch Configuration Status".bold());

    let path = settings.config_path.display().to_string();
    if settings.config_path.exists() {
        println!("Config file: {}", path.cyan());
    } else {
        println!("Config file: {} {}", path.cyan(), "(not present, using defaults)".dimmed());
    }
    println!();

    if settings.github_token.is_some() {
        println!("{} GitHub token configured", "✓".green());
    } else {
        println!("{} GitHub token not configured", "✗".red());
        println!("  → Set GITHUB_TOKEN or `github_token` in the config file");
    }

    if settings.llm_api_key.is_some() {
        println!("{} LLM API key configured", "✓".green());
    } else {
        println!("{} LLM API key not configured", "✗".red());
        println!("  → Set GEMINI_API_KEY to use `recommend` and `profile --assess`");
    }

    if settings.github_api_url != crate::client::github::DEFAULT_API_URL {
        println!(
            "{} Custom GitHub API: {}",
            "○".dimmed(),
            settings.github_api_url.cyan()
        );
    }

    match (&settings.cache_dir, no_cache) {
        (_, true) => println!("{} Cache disabled (--no-cache)", "○".dimmed()),
        (Some(dir), false) => println!(
            "{} Cache: {} (TTL {}s)",
            "✓".green(),
            dir.display(),
            settings.cache_ttl.as_secs()
        ),
        (None, false) => println!("{} No cache directory available", "⚠".yellow()),
    }

    println!();
    println!("{}", "Matching".bold());
    println!("  Minimum score:     {:.1}", settings.min_score);
    println!("  Recommendations:   {}", settings.limit);
    println!("  Repositories:      {}", settings.repo_limit);
    println!(
        "  Extraction delay:  {}ms",
        settings.extraction_delay.as_millis()
    );
    println!("  Issues file:       {}", settings.issues_file.display());
    println!(
        "  Quota threshold:   {} (margin {}s)",
        settings.low_water_mark,
        settings.safety_margin.as_secs()
    );
    println!();
}
