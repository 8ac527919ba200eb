use std::{error::Error, path::Path};

use chrono::{DateTime, TimeZone, Utc};
use papertrail::{
  config::{Config, Keyword},
  pipeline::{Mode, Pipeline, RunOutcome},
  prelude::*,
  snapshot::Snapshot,
  verify::{LinkStatus, LinkVerifier},
};
use tempfile::tempdir;
use tracing_test::traced_test;
use wiremock::{
  matchers::{method, path, query_param},
  Mock, MockServer, ResponseTemplate,
};

mod retrieval;
mod verification;
mod workflows;

pub type TestResult<T> = Result<T, Box<dyn Error>>;

/// Three entries: two from early 2024 and one from January 2023.
pub const FEED: &str = include_str!("fixtures/feed.xml");

/// Query the retriever sends for [`Keyword::phrase`]`("symplectic")` scoped to `math.SG`.
pub const SYMPLECTIC_QUERY: &str = "(symplectic) AND (cat:math.SG)";

/// Query the retriever sends for the keyword the mock server rejects.
pub const BROKEN_QUERY: &str = "(broken) AND (cat:math.SG)";

/// The moment every test run pretends to happen at.
pub fn now() -> DateTime<Utc> { Utc.with_ymd_and_hms(2024, 3, 10, 0, 0, 0).unwrap() }

/// A configuration pointing every remote at `server` and every output into `dir`, with no pause
/// between queries.
pub fn test_config(server: &MockServer, dir: &Path) -> Config {
  let uri = server.uri();
  let mut config = Config::default()
    .with_output_dir(dir)
    .with_api_url(format!("{uri}/api/query"))
    .with_link_templates(format!("{uri}/abs/{{identifier}}"), format!("{uri}/pdf/{{identifier}}"));
  config.query.request_delay_secs = 0;
  config.query.categories = vec!["math.SG".into()];
  config.query.keywords = vec![Keyword::phrase("symplectic"), Keyword::phrase("broken")];
  config.links.timeout_secs = 2;
  config
}

/// Serves [`FEED`] for the symplectic query and a server error for the broken one.
pub async fn mount_feed(server: &MockServer) {
  Mock::given(method("GET"))
    .and(path("/api/query"))
    .and(query_param("search_query", SYMPLECTIC_QUERY))
    .respond_with(ResponseTemplate::new(200).set_body_string(FEED))
    .mount(server)
    .await;

  Mock::given(method("GET"))
    .and(path("/api/query"))
    .and(query_param("search_query", BROKEN_QUERY))
    .respond_with(ResponseTemplate::new(500))
    .mount(server)
    .await;
}

/// Answers `HEAD route` with `status`.
pub async fn mount_head(server: &MockServer, route: &str, status: u16) {
  Mock::given(method("HEAD"))
    .and(path(route))
    .respond_with(ResponseTemplate::new(status))
    .mount(server)
    .await;
}
