//! Org-wide team permission report.

use std::path::Path;

use tracing::{error, info};

use crate::error::Result;
use crate::github::{GitHubClient, RepoOps, TeamOps};

/// Counts from one report run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReportSummary {
    /// Repositories discovered in the organization.
    pub repos: usize,
    /// Association rows written.
    pub rows: usize,
    /// Repositories whose team listing failed.
    pub failures: usize,
}

/// Write a CSV snapshot of every team-repository association in `org`.
///
/// The header row is `Repository,Team,Role`, followed by one row per
/// association in discovery order. A repository with no teams writes no
/// rows. A repository whose team listing fails is logged and skipped; the
/// report covers the rest.
pub fn write_teams_report(client: &GitHubClient, org: &str, path: &Path) -> Result<ReportSummary> {
    let repos = client.list_org_repos(org)?;

    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(["Repository", "Team", "Role"])?;

    let mut summary = ReportSummary {
        repos: repos.len(),
        ..Default::default()
    };

    for repo in &repos {
        match client.list_teams_for_repo(org, repo) {
            Ok(teams) => {
                if teams.is_empty() {
                    info!(repo = %repo, "no teams associated with repository");
                }
                for team in teams {
                    info!(repo = %repo, team = %team.name, role = %team.permission, "team association");
                    writer.write_record([repo.as_str(), team.name.as_str(), team.permission.as_str()])?;
                    summary.rows += 1;
                }
            }
            Err(err) => {
                error!(repo = %repo, %err, "failed to list teams for repository");
                summary.failures += 1;
            }
        }
    }

    writer.flush()?;
    info!(
        path = %path.display(),
        rows = summary.rows,
        failures = summary.failures,
        "CSV report generated"
    );

    Ok(summary)
}
