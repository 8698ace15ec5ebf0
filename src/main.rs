//! skillmatch - match a developer's GitHub footprint against open issues

use clap::{CommandFactory, Parser};

mod cache;
mod cli;
mod client;
mod clock;
mod config;
mod error;
mod llm;
mod models;
mod output;
mod profile;
mod recommend;

use cli::recommend::RecommendArgs;
use cli::{CacheCommands, Cli, Commands, GlobalOptions};
use error::Result;

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("Error: {}", err);
        std::process::exit(1);
    }
}

/// `warn` by default, `debug` with --debug; `RUST_LOG` overrides both
fn init_logging(debug: bool) {
    let default = if debug { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default))
        .format_timestamp(None)
        .init();
}

async fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.debug);

    let opts = GlobalOptions::from_cli(&cli);

    match cli.command {
        Commands::Status => cli::status::run(&opts),
        Commands::Version => {
            println!("skillmatch version {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        Commands::Profile {
            username,
            assess,
            repo_limit,
        } => cli::profile::run(&opts, &username, assess, repo_limit).await,
        Commands::Repos { username, limit } => cli::repo::run(&opts, &username, limit).await,
        Commands::Skills {
            username,
            repo_limit,
        } => cli::skills::run(&opts, &username, repo_limit).await,
        Commands::Issues { repo, limit } => cli::issues::run(&opts, &repo, limit).await,
        Commands::Recommend {
            username,
            repo,
            issues_file,
            issue_limit,
            limit,
            min_score,
            repo_limit,
        } => {
            let args = RecommendArgs {
                username,
                repo,
                issues_file,
                issue_limit,
                limit,
                min_score,
                repo_limit,
            };
            cli::recommend::run(&opts, args).await
        }
        Commands::RateLimit => cli::rate_limit::run(&opts).await,
        Commands::Cache(cache_cmd) => match cache_cmd {
            CacheCommands::Status => cli::cache::status(&opts),
            CacheCommands::Clear => cli::cache::clear(&opts),
            CacheCommands::Path => cli::cache::path(&opts),
        },
        Commands::Completion { shell } => {
            clap_complete::generate(
                shell,
                &mut Cli::command(),
                "skillmatch",
                &mut std::io::stdout(),
            );
            Ok(())
        }
    }
}
