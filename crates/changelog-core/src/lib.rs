//! # changelog-core
//!
//! Reference resolution and output filtering for changelog-action.
//!
//! A run has two stages:
//!
//! 1. [`ReferenceResolver`] picks the head (input or current commit) and the
//!    base (input, latest release, or first release matching a tag glob).
//! 2. [`ChangelogPipeline`] hands both to an external generator, treats empty
//!    stdout as failure, and optionally keeps only lines matching a glob.
//!
//! [`ChangelogRunner`] chains the two and turns any error into a terminal
//! [`ChangelogResult`].

mod config;
mod error;
mod outcome;
pub mod pattern;
mod pipeline;
mod resolver;
mod runner;

pub use config::RunConfig;
pub use error::ChangelogError;
pub use outcome::ChangelogResult;
pub use pattern::MatchPattern;
pub use pipeline::ChangelogPipeline;
pub use resolver::{ReferenceResolver, ResolvedRefs};
pub use runner::ChangelogRunner;
