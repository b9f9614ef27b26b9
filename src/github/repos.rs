//! Repository listing operations.

use serde::Deserialize;

use super::client::{api_error, next_link};
use crate::error::Result;
use crate::github::GitHubClient;
use crate::http::HttpMethod;

/// Repository listing entry from the GitHub API.
#[derive(Debug, Clone, Deserialize)]
pub struct OrgRepo {
    pub name: String,
    #[serde(default)]
    pub archived: bool,
    #[serde(rename = "private", default)]
    pub is_private: bool,
}

/// Repository listing operations.
pub trait RepoOps {
    /// List the names of all repositories in an organization, in page order.
    fn list_org_repos(&self, org: &str) -> Result<Vec<String>>;
}

impl RepoOps for GitHubClient {
    fn list_org_repos(&self, org: &str) -> Result<Vec<String>> {
        let mut names = Vec::new();
        let mut next = Some(format!(
            "{}/orgs/{}/repos?per_page=100",
            self.base_url(),
            org
        ));

        // Each page advertises its successor in the Link header; the last
        // page carries no "next" relation.
        while let Some(url) = next {
            let response = self.send(self.request(HttpMethod::Get, url))?;
            if !response.is_success() {
                return Err(api_error(&response));
            }
            next = next_link(&response.headers);
            let page: Vec<OrgRepo> = serde_json::from_slice(&response.body)?;
            names.extend(page.into_iter().map(|r| r.name));
        }

        Ok(names)
    }
}
