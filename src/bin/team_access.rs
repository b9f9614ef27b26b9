//! CLI for the team-access tool.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use team_access::grant::{grant_team_access, repo_names_from_csv};
use team_access::report::write_teams_report;
use team_access::{GitHubClient, Permission, TeamAccessError};

#[derive(Parser)]
#[command(name = "team-access")]
#[command(author, version, about = "GitHub repository team management", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Add a GitHub team to one or more repositories
    AddTeam {
        /// GitHub organization name
        #[arg(long)]
        org: String,

        /// GitHub personal access token
        #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
        token: String,

        /// Slug of the GitHub team
        #[arg(long)]
        team_slug: String,

        /// Name of the repository
        #[arg(long)]
        repo_name: Option<String>,

        /// CSV file whose first column holds repository names
        #[arg(long)]
        csv_file: Option<PathBuf>,

        /// Roles: admin, maintain, write, triage, read
        #[arg(long, default_value = "read")]
        permission: Permission,

        /// Base URL of the GitHub API (for GitHub Enterprise)
        #[arg(long, default_value = "https://api.github.com")]
        api_url: String,

        /// Cap on rate-limit waits per request (unbounded when omitted)
        #[arg(long)]
        max_rate_limit_waits: Option<u32>,
    },

    /// Report team/role associations for all repositories in the organization
    ListTeams {
        /// GitHub organization name
        #[arg(long)]
        org: String,

        /// GitHub personal access token
        #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
        token: String,

        /// Base URL of the GitHub API (for GitHub Enterprise)
        #[arg(long, default_value = "https://api.github.com")]
        api_url: String,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::AddTeam {
            org,
            token,
            team_slug,
            repo_name,
            csv_file,
            permission,
            api_url,
            max_rate_limit_waits,
        } => {
            let repos = if let Some(path) = csv_file {
                repo_names_from_csv(&path)
                    .with_context(|| format!("reading repository names from {}", path.display()))?
            } else if let Some(name) = repo_name {
                vec![name]
            } else {
                error!("you must provide either --repo-name or --csv-file");
                std::process::exit(1);
            };

            let mut client = GitHubClient::with_enterprise(token, api_url);
            if let Some(waits) = max_rate_limit_waits {
                client = client.max_rate_limit_waits(waits);
            }

            cmd_add_team(&client, &org, &team_slug, &repos, permission)
        }
        Commands::ListTeams {
            org,
            token,
            api_url,
        } => {
            let client = GitHubClient::with_enterprise(token, api_url);
            cmd_list_teams(&client, &org)
        }
    }
}

fn cmd_add_team(
    client: &GitHubClient,
    org: &str,
    team_slug: &str,
    repos: &[String],
    permission: Permission,
) -> Result<()> {
    match grant_team_access(client, org, team_slug, repos, permission) {
        Ok(summary) => {
            info!(
                granted = summary.granted,
                messages = summary.messages,
                failed = summary.failed,
                "bulk grant finished"
            );
            Ok(())
        }
        Err(TeamAccessError::TeamNotFound { org, team }) => {
            println!("Team '{team}' does not exist in organization '{org}'.");
            Ok(())
        }
        Err(err) => Err(err.into()),
    }
}

fn cmd_list_teams(client: &GitHubClient, org: &str) -> Result<()> {
    let csv_filename = format!("{org}_teams_roles.csv");
    write_teams_report(client, org, Path::new(&csv_filename))
        .with_context(|| format!("generating report {csv_filename}"))?;
    Ok(())
}
