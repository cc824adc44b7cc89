//! # changelog-registry
//!
//! Release registry access for changelog-action.
//!
//! The base reference of a changelog is, by default, the tag of the most
//! recent published release. This crate abstracts where releases come from.
//!
//! ## Key Types
//!
//! - [`ReleaseRegistry`] - Async trait with `latest_release` / `list_releases`
//! - [`GitHubRegistry`] - GitHub Releases REST implementation
//! - [`InMemoryRegistry`] - Deterministic implementation for tests
//! - [`RepoId`] - `owner/repo` identifier
//!
//! ## Usage
//!
//! ```rust,ignore
//! use changelog_registry::{GitHubRegistry, ReleaseRegistry, RepoId};
//!
//! let registry = GitHubRegistry::new(Some(token));
//! let repo: RepoId = "octocat/hello-world".parse()?;
//!
//! if let Some(release) = registry.latest_release(&repo).await? {
//!     println!("latest: {}", release.tag_name);
//! }
//! ```

pub mod github;
mod memory;
mod traits;

pub use github::GitHubRegistry;
pub use memory::{InMemoryRegistry, RegistryOperation};
pub use traits::{Release, ReleaseRegistry, RegistryError, RepoId};
