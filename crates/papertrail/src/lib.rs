//! Scheduled arXiv digest: fetch, merge, verify and render.
//!
//! `papertrail` keeps a rolling collection of recent arXiv papers matching a set of keyword and
//! category filters, and publishes it as a static HTML page, a Markdown summary, and a JSON
//! snapshot that doubles as the backup for the next run.
//!
//! # Features
//!
//! - **Retrieval**: keyword queries against the arXiv Atom API, scoped by category and recency
//! - **Merging**: de-duplication against the previous snapshot, fresh metadata wins
//! - **Link verification**: HEAD probes with reconstruction of broken canonical links
//! - **Rendering**: filterable HTML table and Markdown summary
//!
//! # Getting Started
//!
//! ```no_run
//! use papertrail::{
//!   config::Config,
//!   pipeline::{Mode, Pipeline},
//!   prelude::*,
//! };
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!   let config = Config::load(Config::default_path())?;
//!   let summary = Pipeline::new(config)?.run(Mode::Update).await?;
//!   println!("Retained {} papers", summary.retained);
//!   Ok(())
//! }
//! ```
//!
//! # Module Organization
//!
//! - [`paper`]: The paper record and identifier handling
//! - [`config`]: TOML configuration
//! - [`retriever`]: arXiv queries and Atom feed parsing
//! - [`merge`]: Identifier-keyed collections and snapshot merging
//! - [`verify`]: Link reachability checks and repair
//! - [`render`]: HTML and Markdown output
//! - [`snapshot`]: Persisted record set
//! - [`pipeline`]: The stages wired together per run mode

#![warn(missing_docs, clippy::missing_docs_in_private_items)]

use std::{
  collections::HashMap,
  fmt::Display,
  path::{Path, PathBuf},
  time::Duration,
};

use chrono::{DateTime, Datelike, Utc};
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, trace, warn};
#[cfg(test)]
use {tempfile::tempdir, tracing_test::traced_test};

pub mod config;
pub mod error;
pub mod format;
pub mod merge;
pub mod paper;
pub mod pipeline;
pub mod render;
pub mod retriever;
pub mod snapshot;
pub mod verify;

use crate::{config::*, error::*, format::*, merge::*, paper::*};

/// Common traits and types for ergonomic imports.
///
/// ```no_run
/// use papertrail::prelude::*;
///
/// fn example() -> Result<(), PapertrailError> { Ok(()) }
/// ```
pub mod prelude {
  pub use crate::{error::PapertrailError, paper::Paper, pipeline::Mode};
}
