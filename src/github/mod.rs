//! GitHub API integration for team access management.
//!
//! This module provides a client for interacting with the GitHub API to:
//! - Check that a team exists in an organization
//! - Grant a team a permission level on repositories
//! - List all repositories in an organization
//! - List the teams associated with a repository
//!
//! # Example
//!
//! ```rust,no_run
//! use team_access::github::{GitHubClient, RepoOps};
//!
//! let client = GitHubClient::new("ghp_your_token_here");
//!
//! // List all repos in an organization
//! let repos = client.list_org_repos("my-org")?;
//!
//! for name in repos {
//!     println!("{name}");
//! }
//! # Ok::<(), team_access::error::TeamAccessError>(())
//! ```

mod client;
mod repos;
mod teams;

pub use client::GitHubClient;
pub use repos::{OrgRepo, RepoOps};
pub use teams::{GrantResponse, Permission, RepoTeam, TeamOps};
