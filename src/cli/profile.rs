//! Profile command implementation

use colored::Colorize;
use log::debug;
use serde::Serialize;

use crate::cli::args::GlobalOptions;
use crate::cli::{CommandContext, OutputFormat};
use crate::client::models::UserProfile;
use crate::error::{Error, Result};
use crate::llm::{ProfileAssessment, SkillExtractor};
use crate::models::EventDisplay;
use crate::output::formatters::{format_date, join_or_dash};
use crate::output::table::format_table_or;
use crate::output::{print_json, progress};

/// Maximum events listed in pretty output
const SHOWN_EVENTS: usize = 10;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ProfileReport<'a> {
    #[serde(flatten)]
    profile: &'a UserProfile,
    #[serde(skip_serializing_if = "Option::is_none")]
    assessment: Option<&'a ProfileAssessment>,
}

/// Run the profile command
pub async fn run(
    opts: &GlobalOptions,
    username: &str,
    assess: bool,
    repo_limit: Option<usize>,
) -> Result<()> {
    let ctx = CommandContext::new(opts)?;
    // Fail on a missing key before any GitHub traffic
    let skills = if assess {
        Some(ctx.skill_service()?)
    } else {
        None
    };

    let spinner = progress::spinner(ctx.format, &format!("Fetching profile of {}...", username));
    let Some(profile) = ctx.source.user_profile(username).await else {
        progress::finish(spinner);
        return Err(Error::NotFound(format!("user {}", username)));
    };

    let assessment = match &skills {
        Some(skills) => {
            progress::set_message(&spinner, "Assessing skills...");
            let limit = repo_limit.unwrap_or(ctx.settings.repo_limit);
            let repos = ctx.source.user_repositories(username, limit).await.into_value();
            debug!("Assessing {} with {} repositories", username, repos.len());
            skills.assess_profile(&profile, &repos).await?
        }
        None => None,
    };
    progress::finish(spinner);

    match ctx.format {
        OutputFormat::Json => print_json(&ProfileReport {
            profile: &profile,
            assessment: assessment.as_ref(),
        }),
        _ => {
            print_profile(&profile);
            if assess {
                print_assessment(assessment.as_ref());
            }
            Ok(())
        }
    }
}

fn print_profile(profile: &UserProfile) {
    let user = &profile.user;
    match &user.name {
        Some(name) => println!("{} ({})", name.bold(), profile.username.cyan()),
        None => println!("{}", profile.username.bold()),
    }
    if let Some(bio) = &user.bio {
        println!("{}", bio.dimmed());
    }
    println!();

    for (label, value) in [
        ("Company", user.company.as_deref()),
        ("Location", user.location.as_deref()),
    ] {
        if let Some(value) = value {
            println!("{:<14}{}", format!("{}:", label), value);
        }
    }
    println!("{:<14}{}", "Public repos:", user.public_repos);
    if let Some(followers) = user.followers {
        println!("{:<14}{}", "Followers:", followers);
    }
    if user.created_at.is_some() {
        println!(
            "{:<14}{}",
            "Joined:",
            format_date(user.created_at.as_deref())
        );
    }

    if !profile.pinned_repositories.is_empty() {
        println!("\n{}", "Pinned repositories".bold());
        for pinned in &profile.pinned_repositories {
            println!(
                "  {} {}",
                pinned.name.cyan(),
                format!("[{}]", join_or_dash(&pinned.languages)).dimmed()
            );
            if let Some(description) = &pinned.description {
                println!("    {}", description);
            }
        }
    }

    let readme = if profile.profile_readme.is_some() {
        "✓".green()
    } else {
        "○".dimmed()
    };
    println!(
        "\n{} Profile README    {} gists",
        readme,
        profile.gists.len()
    );

    println!("\n{}", "Recent activity".bold());
    let rows: Vec<EventDisplay> = profile
        .recent_events
        .iter()
        .take(SHOWN_EVENTS)
        .map(EventDisplay::from)
        .collect();
    println!("{}", format_table_or(&rows, "No recent public activity"));
}

fn print_assessment(assessment: Option<&ProfileAssessment>) {
    println!("\n{}", "Skill assessment".bold());
    let Some(assessment) = assessment else {
        println!("{} The model returned no usable assessment", "⚠".yellow());
        return;
    };

    for (label, items) in [
        ("Languages", &assessment.primary_languages),
        ("Frameworks", &assessment.frameworks),
        ("Tools", &assessment.tools),
        ("Domains", &assessment.domains),
    ] {
        println!("  {:<12}{}", format!("{}:", label), join_or_dash(items));
    }
    if !assessment.skill_levels.is_empty() {
        println!("  Levels:");
        for (skill, level) in &assessment.skill_levels {
            println!("    {:<20}{}", skill, level);
        }
    }
}
