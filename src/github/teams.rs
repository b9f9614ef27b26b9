//! Team lookup, grant and listing operations.

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

use super::client::api_error;
use crate::error::{Result, TeamAccessError};
use crate::github::GitHubClient;
use crate::http::HttpMethod;

/// An access level grantable to a team on a repository.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Permission {
    Read,
    Write,
    Admin,
    Maintain,
    Triage,
}

impl Permission {
    /// The value transmitted to the API. Read and write travel as the
    /// legacy `pull`/`push` vocabulary; the rest pass through unchanged.
    #[must_use]
    pub fn as_api_str(self) -> &'static str {
        match self {
            Permission::Read => "pull",
            Permission::Write => "push",
            Permission::Admin => "admin",
            Permission::Maintain => "maintain",
            Permission::Triage => "triage",
        }
    }
}

impl FromStr for Permission {
    type Err = TeamAccessError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "read" => Ok(Permission::Read),
            "write" => Ok(Permission::Write),
            "admin" => Ok(Permission::Admin),
            "maintain" => Ok(Permission::Maintain),
            "triage" => Ok(Permission::Triage),
            _ => Err(TeamAccessError::InvalidPermission(s.to_string())),
        }
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Permission::Read => "read",
            Permission::Write => "write",
            Permission::Admin => "admin",
            Permission::Maintain => "maintain",
            Permission::Triage => "triage",
        };
        write!(f, "{name}")
    }
}

/// A team association on a repository, as returned by the teams endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RepoTeam {
    pub name: String,
    pub permission: String,
}

/// Outcome of a single grant request.
#[derive(Debug, Clone, PartialEq)]
pub enum GrantResponse {
    /// 204 No Content: the team now has access.
    Added,
    /// The API answered with its own JSON message body instead.
    Api(serde_json::Value),
}

/// Team operations.
pub trait TeamOps {
    /// Whether a team with this slug exists in the organization.
    ///
    /// True only on a 200 from the team lookup endpoint. Any other status,
    /// including forbidden or rate-limited lookups, reads as absent.
    fn team_exists(&self, org: &str, team_slug: &str) -> Result<bool>;

    /// Grant the team a permission level on one repository.
    fn add_team_to_repo(
        &self,
        org: &str,
        team_slug: &str,
        repo: &str,
        permission: Permission,
    ) -> Result<GrantResponse>;

    /// List the teams associated with a repository and their roles.
    fn list_teams_for_repo(&self, org: &str, repo: &str) -> Result<Vec<RepoTeam>>;
}

impl TeamOps for GitHubClient {
    fn team_exists(&self, org: &str, team_slug: &str) -> Result<bool> {
        let url = format!("{}/orgs/{}/teams/{}", self.base_url(), org, team_slug);
        // Single attempt: existence checks do not wait out rate limits.
        let response = self.send_raw(self.request(HttpMethod::Get, url))?;
        Ok(response.status == 200)
    }

    fn add_team_to_repo(
        &self,
        org: &str,
        team_slug: &str,
        repo: &str,
        permission: Permission,
    ) -> Result<GrantResponse> {
        let url = format!(
            "{}/orgs/{}/teams/{}/repos/{}/{}",
            self.base_url(),
            org,
            team_slug,
            org,
            repo
        );
        let mut request = self.request(HttpMethod::Put, url);
        request
            .headers
            .push(("Content-Type".to_string(), "application/json".to_string()));
        request.body =
            serde_json::to_vec(&serde_json::json!({ "permission": permission.as_api_str() }))?;

        let response = self.send(request)?;

        if response.status == 204 {
            return Ok(GrantResponse::Added);
        }
        // Anything else with a JSON body is surfaced as the API's own
        // message; a body that is not JSON is a hard failure.
        match serde_json::from_slice(&response.body) {
            Ok(value) => Ok(GrantResponse::Api(value)),
            Err(_) => Err(api_error(&response)),
        }
    }

    fn list_teams_for_repo(&self, org: &str, repo: &str) -> Result<Vec<RepoTeam>> {
        let url = format!("{}/repos/{}/{}/teams", self.base_url(), org, repo);
        let response = self.send(self.request(HttpMethod::Get, url))?;
        if !response.is_success() {
            return Err(api_error(&response));
        }
        Ok(serde_json::from_slice(&response.body)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::{HttpResponse, MockTransport, header_get};

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

    #[test]
    fn read_and_write_map_to_the_legacy_api_vocabulary() {
        assert_eq!(Permission::Read.as_api_str(), "pull");
        assert_eq!(Permission::Write.as_api_str(), "push");
        assert_eq!(Permission::Admin.as_api_str(), "admin");
        assert_eq!(Permission::Maintain.as_api_str(), "maintain");
        assert_eq!(Permission::Triage.as_api_str(), "triage");
    }

    #[test]
    fn permission_parses_case_insensitively() {
        assert_eq!("READ".parse::<Permission>().unwrap(), Permission::Read);
        assert_eq!("Write".parse::<Permission>().unwrap(), Permission::Write);
        assert!(matches!(
            "owner".parse::<Permission>(),
            Err(TeamAccessError::InvalidPermission(_))
        ));
    }

    #[test]
    fn team_exists_only_on_200() {
        let url = "https://api.example.com/orgs/acme/teams/platform";
        for (status, expected) in [(200, true), (404, false), (403, false), (500, false)] {
            let mock = MockTransport::new();
            mock.push_response(HttpMethod::Get, url, response(status, b"{}"));
            let exists = test_client(&mock).team_exists("acme", "platform").unwrap();
            assert_eq!(exists, expected, "status {status}");
        }
    }

    #[test]
    fn add_team_to_repo_puts_the_normalized_permission() {
        let mock = MockTransport::new();
        let url = "https://api.example.com/orgs/acme/teams/platform/repos/acme/widgets";
        mock.push_response(HttpMethod::Put, url, response(204, b""));

        let result = test_client(&mock)
            .add_team_to_repo("acme", "platform", "widgets", Permission::Write)
            .unwrap();
        assert_eq!(result, GrantResponse::Added);

        let requests = mock.requests();
        assert_eq!(requests.len(), 1);
        let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
        assert_eq!(body, serde_json::json!({ "permission": "push" }));
        assert_eq!(
            header_get(&requests[0].headers, "content-type"),
            Some("application/json")
        );
    }

    #[test]
    fn add_team_to_repo_surfaces_json_error_bodies() {
        let mock = MockTransport::new();
        let url = "https://api.example.com/orgs/acme/teams/platform/repos/acme/widgets";
        mock.push_response(
            HttpMethod::Put,
            url,
            response(422, br#"{"message":"Validation Failed"}"#),
        );

        let result = test_client(&mock)
            .add_team_to_repo("acme", "platform", "widgets", Permission::Read)
            .unwrap();
        assert_eq!(
            result,
            GrantResponse::Api(serde_json::json!({ "message": "Validation Failed" }))
        );
    }

    #[test]
    fn add_team_to_repo_fails_hard_on_non_json_bodies() {
        let mock = MockTransport::new();
        let url = "https://api.example.com/orgs/acme/teams/platform/repos/acme/widgets";
        mock.push_response(HttpMethod::Put, url, response(502, b"bad gateway"));

        let err = test_client(&mock)
            .add_team_to_repo("acme", "platform", "widgets", Permission::Read)
            .unwrap_err();
        assert!(matches!(err, TeamAccessError::Api { status: 502, .. }));
    }

    #[test]
    fn list_teams_for_repo_deserializes_names_and_permissions() {
        let mock = MockTransport::new();
        let url = "https://api.example.com/repos/acme/widgets/teams";
        mock.push_response(
            HttpMethod::Get,
            url,
            response(
                200,
                br#"[{"name":"platform","permission":"push"},{"name":"sec","permission":"admin"}]"#,
            ),
        );

        let teams = test_client(&mock)
            .list_teams_for_repo("acme", "widgets")
            .unwrap();
        assert_eq!(
            teams,
            vec![
                RepoTeam {
                    name: "platform".to_string(),
                    permission: "push".to_string()
                },
                RepoTeam {
                    name: "sec".to_string(),
                    permission: "admin".to_string()
                },
            ]
        );
    }

    #[test]
    fn list_teams_for_repo_raises_on_non_2xx() {
        let mock = MockTransport::new();
        let url = "https://api.example.com/repos/acme/widgets/teams";
        mock.push_response(HttpMethod::Get, url, response(404, b"{}"));

        let err = test_client(&mock)
            .list_teams_for_repo("acme", "widgets")
            .unwrap_err();
        assert!(matches!(err, TeamAccessError::Api { status: 404, .. }));
    }
}
