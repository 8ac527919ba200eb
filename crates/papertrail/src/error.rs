//! Error types for the papertrail library.
//!
//! Most stages of the pipeline tolerate failure locally (a failed keyword query is skipped, an
//! unreachable link is counted as broken, an unreadable snapshot is treated as empty). The
//! variants here cover what is left: failures that should stop a run.
//!
//! # Examples
//!
//! ```no_run
//! use papertrail::{config::Config, error::PapertrailError};
//!
//! match Config::load("papertrail.toml") {
//!   Err(PapertrailError::Path(e)) => println!("Could not read config: {e}"),
//!   Err(PapertrailError::TomlDe(e)) => println!("Malformed config: {e}"),
//!   Err(e) => println!("Other error: {e}"),
//!   Ok(_) => println!("Loaded!"),
//! }
//! ```

use thiserror::Error;

/// Error type alias used for the [`papertrail`](crate) crate.
pub type Result<T> = core::result::Result<T, PapertrailError>;

/// Errors that can occur while fetching, merging, verifying or rendering papers.
#[derive(Error, Debug)]
pub enum PapertrailError {
  /// The remote entry id could not be turned into a paper identifier.
  #[error("Invalid identifier format: {0}")]
  InvalidIdentifier(String),

  /// A network request failed.
  ///
  /// This can occur when:
  /// - The network is unavailable
  /// - The server is unreachable
  /// - The request times out
  /// - TLS/SSL errors occur
  #[error(transparent)]
  Network(#[from] reqwest::Error),

  /// The remote index answered with an error, either as a non-success status or as an error
  /// entry inside an otherwise well-formed feed.
  #[error("API error: {0}")]
  ApiError(String),

  /// A file system operation failed.
  #[error(transparent)]
  Path(#[from] std::io::Error),

  /// Reading or writing a JSON document (snapshot, verification log) failed.
  #[error(transparent)]
  Json(#[from] serde_json::Error),

  /// The Atom feed could not be deserialized.
  #[error(transparent)]
  Xml(#[from] quick_xml::DeError),

  /// The configuration file is not valid TOML for [`Config`](crate::config::Config).
  #[error(transparent)]
  TomlDe(#[from] toml::de::Error),

  /// The configuration could not be serialized.
  #[error(transparent)]
  TomlSer(#[from] toml::ser::Error),

  /// A configured URL could not be parsed.
  #[error(transparent)]
  Url(#[from] url::ParseError),

  /// The configuration is well-formed but unusable.
  #[error("{0}")]
  Config(String),
}
