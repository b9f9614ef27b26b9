//! # Team Access
//!
//! GitHub organization team-to-repository access management.
//!
//! This crate automates permission management through the GitHub REST API:
//! - Grant a team a permission level on one or many repositories, with
//!   rate-limit-aware request sequencing
//! - Report every team-repository association in an organization to a CSV
//!   file
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use team_access::grant::grant_team_access;
//! use team_access::{GitHubClient, Permission};
//!
//! let client = GitHubClient::new("ghp_your_token_here");
//!
//! let repos = vec!["widget-service".to_string(), "gadget-api".to_string()];
//! let summary = grant_team_access(&client, "my-org", "platform", &repos, Permission::Write)?;
//!
//! println!("granted on {} repositories", summary.granted);
//! # Ok::<(), team_access::TeamAccessError>(())
//! ```
//!
//! ## Reporting
//!
//! ```rust,no_run
//! use std::path::Path;
//! use team_access::GitHubClient;
//! use team_access::report::write_teams_report;
//!
//! let client = GitHubClient::from_env()?;
//! write_teams_report(&client, "my-org", Path::new("my-org_teams_roles.csv"))?;
//! # Ok::<(), team_access::TeamAccessError>(())
//! ```

pub mod error;
pub mod github;
pub mod grant;
pub mod http;
pub mod report;

pub use error::{Result, TeamAccessError};
pub use github::{GitHubClient, GrantResponse, Permission, RepoOps, RepoTeam, TeamOps};
