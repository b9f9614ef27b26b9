//! Bulk grant of a team permission across repositories.

use std::path::Path;

use tracing::{error, info, warn};

use crate::error::{Result, TeamAccessError};
use crate::github::{GitHubClient, GrantResponse, Permission, TeamOps};

/// Per-repository outcome counts from one bulk grant run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GrantSummary {
    /// Repositories the team was added to.
    pub granted: usize,
    /// Repositories where the API answered with its own message body.
    pub messages: usize,
    /// Repositories abandoned after a hard error.
    pub failed: usize,
}

/// Grant `team_slug` a permission level on every repository in `repos`.
///
/// The team lookup happens once, before the loop; an unknown team means no
/// grant request is issued at all. Failures are isolated per repository: a
/// hard error on one repository is logged and the loop moves on to the next.
pub fn grant_team_access(
    client: &GitHubClient,
    org: &str,
    team_slug: &str,
    repos: &[String],
    permission: Permission,
) -> Result<GrantSummary> {
    if !client.team_exists(org, team_slug)? {
        return Err(TeamAccessError::TeamNotFound {
            org: org.to_string(),
            team: team_slug.to_string(),
        });
    }

    let mut summary = GrantSummary::default();
    for repo in repos {
        match client.add_team_to_repo(org, team_slug, repo, permission) {
            Ok(GrantResponse::Added) => {
                info!(
                    team = team_slug,
                    repo = %repo,
                    permission = permission.as_api_str(),
                    "team added to repository"
                );
                summary.granted += 1;
            }
            Ok(GrantResponse::Api(message)) => {
                warn!(
                    team = team_slug,
                    repo = %repo,
                    %message,
                    "grant not confirmed, API returned a message"
                );
                summary.messages += 1;
            }
            Err(err) => {
                error!(repo = %repo, %err, "failed to add team to repository");
                summary.failed += 1;
            }
        }
    }

    Ok(summary)
}

/// Read repository names from the first column of a CSV file.
///
/// Rows are untyped and there is no header to skip. Rows with an empty
/// first field are ignored.
pub fn repo_names_from_csv(path: &Path) -> Result<Vec<String>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)?;

    let mut names = Vec::new();
    for record in reader.records() {
        let record = record?;
        match record.get(0) {
            Some(name) if !name.trim().is_empty() => names.push(name.to_string()),
            _ => {}
        }
    }

    Ok(names)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::{HttpMethod, HttpResponse, MockTransport};

    fn test_client(mock: &MockTransport) -> GitHubClient {
        GitHubClient::with_transport(
            "test-token",
            "https://api.example.com",
            Box::new(mock.clone()),
        )
    }

    fn response(status: u16, body: &[u8]) -> HttpResponse {
        HttpResponse {
            status,
            headers: Vec::new(),
            body: body.to_vec(),
        }
    }

    const TEAM_URL: &str = "https://api.example.com/orgs/acme/teams/platform";

    fn grant_url(repo: &str) -> String {
        format!("https://api.example.com/orgs/acme/teams/platform/repos/acme/{repo}")
    }

    #[test]
    fn unknown_team_issues_no_grant_requests() {
        let mock = MockTransport::new();
        mock.push_response(HttpMethod::Get, TEAM_URL, response(404, b"{}"));

        let repos = vec!["r1".to_string(), "r2".to_string()];
        let err = grant_team_access(&test_client(&mock), "acme", "platform", &repos, Permission::Read)
            .unwrap_err();
        assert!(matches!(err, TeamAccessError::TeamNotFound { .. }));

        // Only the existence lookup went out.
        assert_eq!(mock.requests().len(), 1);
    }

    #[test]
    fn one_failed_repository_does_not_abort_the_batch() {
        let mock = MockTransport::new();
        mock.push_response(HttpMethod::Get, TEAM_URL, response(200, b"{}"));
        mock.push_response(HttpMethod::Put, grant_url("r1"), response(502, b"bad gateway"));
        mock.push_response(HttpMethod::Put, grant_url("r2"), response(204, b""));

        let repos = vec!["r1".to_string(), "r2".to_string()];
        let summary = grant_team_access(
            &test_client(&mock),
            "acme",
            "platform",
            &repos,
            Permission::Write,
        )
        .unwrap();

        assert_eq!(summary.granted, 1);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.messages, 0);

        // Lookup plus one grant attempt per repository.
        assert_eq!(mock.requests().len(), 3);
    }

    #[test]
    fn api_message_bodies_are_surfaced_not_raised() {
        let mock = MockTransport::new();
        mock.push_response(HttpMethod::Get, TEAM_URL, response(200, b"{}"));
        mock.push_response(
            HttpMethod::Put,
            grant_url("r1"),
            response(403, br#"{"message":"Resource not accessible"}"#),
        );

        let repos = vec!["r1".to_string()];
        let summary = grant_team_access(
            &test_client(&mock),
            "acme",
            "platform",
            &repos,
            Permission::Admin,
        )
        .unwrap();

        assert_eq!(summary.messages, 1);
        assert_eq!(summary.granted, 0);
        assert_eq!(summary.failed, 0);
    }

    #[test]
    fn rate_limited_grants_are_retried_until_they_land() {
        let mock = MockTransport::new();
        mock.push_response(HttpMethod::Get, TEAM_URL, response(200, b"{}"));
        mock.push_response(
            HttpMethod::Put,
            grant_url("r1"),
            HttpResponse {
                status: 403,
                headers: vec![
                    ("x-ratelimit-remaining".to_string(), "0".to_string()),
                    ("x-ratelimit-reset".to_string(), "0".to_string()),
                ],
                body: br#"{"message":"API rate limit exceeded"}"#.to_vec(),
            },
        );
        mock.push_response(HttpMethod::Put, grant_url("r1"), response(204, b""));

        let repos = vec!["r1".to_string()];
        let summary = grant_team_access(
            &test_client(&mock),
            "acme",
            "platform",
            &repos,
            Permission::Read,
        )
        .unwrap();

        assert_eq!(summary.granted, 1);
        // Lookup, rate-limited attempt, identical retry.
        assert_eq!(mock.requests().len(), 3);
        let requests = mock.requests();
        assert_eq!(requests[1], requests[2]);
    }
}
