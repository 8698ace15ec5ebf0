//! Recommend command: rank issues by fit to a user's skills

use std::path::PathBuf;

use colored::Colorize;

use crate::cli::args::GlobalOptions;
use crate::cli::{CommandContext, OutputFormat};
use crate::error::{Error, Result};
use crate::models::{RecommendationDisplay, SkillDisplay};
use crate::output::formatters::join_or_dash;
use crate::output::table::format_table_or;
use crate::output::{Formattable, print_json, progress};
use crate::recommend::{self, AnalysisReport, IssueSource, RankedRecommendation, Recommender};

/// Arguments of the recommend command
#[derive(Debug, Clone, Default)]
pub struct RecommendArgs {
    pub username: String,
    pub repo: Option<String>,
    pub issues_file: Option<PathBuf>,
    pub issue_limit: usize,
    pub limit: Option<usize>,
    pub min_score: Option<f64>,
    pub repo_limit: Option<usize>,
}

/// Run the recommend command
pub async fn run(opts: &GlobalOptions, args: RecommendArgs) -> Result<()> {
    let ctx = CommandContext::new(opts)?;
    let skills = ctx.skill_service()?;

    if let Some(min_score) = args.min_score
        && !(0.0..=10.0).contains(&min_score)
    {
        return Err(Error::Other(format!(
            "--min-score must be between 0 and 10, got {}",
            min_score
        )));
    }

    let issues = match (args.repo, args.issues_file) {
        (Some(repo), _) => IssueSource::Repository {
            repo,
            limit: args.issue_limit,
        },
        (None, Some(path)) => IssueSource::File(path),
        (None, None) => IssueSource::File(ctx.settings.issues_file.clone()),
    };

    let options = ctx.rank_options(args.limit, args.min_score);
    let recommender = Recommender::new(&skills, &skills, ctx.clock.as_ref(), options);
    let repo_limit = args.repo_limit.unwrap_or(ctx.settings.repo_limit);

    let spinner = progress::spinner(
        ctx.format,
        &format!("Matching issues for {}...", args.username),
    );
    let report = recommend::analyze(
        &ctx.source,
        &recommender,
        &args.username,
        &issues,
        repo_limit,
    )
    .await;
    progress::finish(spinner);

    let Some(report) = report else {
        return Err(Error::NotFound(format!("user {}", args.username)));
    };

    match ctx.format {
        OutputFormat::Json => print_json(&report),
        OutputFormat::Table => report
            .recommendations
            .iter()
            .map(RecommendationDisplay::from)
            .collect::<Vec<_>>()
            .print(ctx.format),
        OutputFormat::Pretty => {
            print_pretty(&report);
            Ok(())
        }
    }
}

fn print_pretty(report: &AnalysisReport) {
    println!("{} {}\n", "Tech profile of".bold(), report.username.bold().cyan());
    let rows = SkillDisplay::rows(&report.tech_profile);
    println!("{}\n", format_table_or(&rows, "No skills detected"));

    println!(
        "{} of {} issues matched\n",
        report.recommendations.len().to_string().bold(),
        report.analyzed_issues
    );

    for (rank, rec) in report.recommendations.iter().enumerate() {
        print_recommendation(rank + 1, rec);
    }
}

fn print_recommendation(rank: usize, rec: &RankedRecommendation) {
    let score = format!("{:.1}/10", rec.match_score);
    let score = if rec.match_score >= 7.0 {
        score.green()
    } else if rec.match_score >= 5.0 {
        score.yellow()
    } else {
        score.normal()
    };

    println!(
        "{}. {} {}#{}  {}",
        rank,
        score.bold(),
        rec.repo_name.cyan(),
        rec.issue_number,
        rec.title.bold()
    );
    println!("   {}", rec.url.dimmed());
    println!(
        "   {} ({:.1}%), experience: {}",
        rec.match_level, rec.match_percentage, rec.experience_match
    );
    println!(
        "   {} {}",
        "✓".green(),
        join_or_dash(&rec.matching_skills)
    );
    if !rec.missing_skills.is_empty() {
        println!("   {} {}", "✗".red(), rec.missing_skills.join(", "));
    }
    if !rec.labels.is_empty() {
        println!("   {} {}", "Labels:".dimmed(), rec.labels.join(", "));
    }
    println!();
}
