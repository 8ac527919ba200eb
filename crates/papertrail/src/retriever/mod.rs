//! Keyword queries against the arXiv API.
//!
//! The [`Retriever`] issues one query per configured [`Keyword`], scoped to the configured
//! categories and sorted by submission date, newest first. Results are accumulated into a
//! [`PaperSet`], so a paper matched by several keywords is kept once (the last match wins) and
//! filed under the topic of every keyword that matched it.
//!
//! Queries run one after another with a fixed pause in between, to stay polite towards the
//! remote index. A failing query is logged and skipped; the remaining keywords still run.
//!
//! # Examples
//!
//! ```no_run
//! use chrono::Utc;
//! use papertrail::{config::QueryConfig, retriever::Retriever};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let retriever = Retriever::new(QueryConfig::default())?;
//! let fetched = retriever.fetch_recent(Utc::now()).await;
//! println!("{} papers from {} queries", fetched.papers.len(), fetched.queries);
//! # Ok(())
//! # }
//! ```

use chrono::NaiveDate;

use super::*;

mod xml;

pub use self::xml::parse_feed;

/// Papers collected by one retrieval pass.
#[derive(Debug, Default)]
pub struct Fetched {
  /// Everything fetched, keyed by identifier
  pub papers:   PaperSet,
  /// Queries issued
  pub queries:  usize,
  /// Queries that failed and were skipped
  pub failures: usize,
}

/// Client for keyword queries against the arXiv API.
#[derive(Debug)]
pub struct Retriever {
  /// Internal web client used to connect to the API.
  client: reqwest::Client,
  /// Keywords, categories and limits
  config: QueryConfig,
}

/// Inclusive submission date window for a query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubmittedRange {
  /// First day included
  pub from:    NaiveDate,
  /// Last day included
  pub through: NaiveDate,
}

impl SubmittedRange {
  /// The whole calendar year `year`, if it is representable.
  pub fn year(year: i32) -> Option<Self> {
    Some(Self {
      from:    NaiveDate::from_ymd_opt(year, 1, 1)?,
      through: NaiveDate::from_ymd_opt(year, 12, 31)?,
    })
  }
}

impl Retriever {
  /// Creates a retriever with an HTTP client configured from `config`.
  ///
  /// # Errors
  ///
  /// Fails if the API URL does not parse or the HTTP client cannot be built.
  pub fn new(config: QueryConfig) -> Result<Self> {
    url::Url::parse(&config.api_url)?;
    let client = reqwest::Client::builder()
      .timeout(config.timeout())
      .user_agent(config.user_agent.clone())
      .build()?;
    Ok(Self { client, config })
  }

  /// Runs every keyword query and keeps papers published at or after `now - recency_days`.
  pub async fn fetch_recent(&self, now: DateTime<Utc>) -> Fetched {
    let cutoff = now - chrono::Duration::days(i64::from(self.config.recency_days));
    info!(
      "Fetching papers for {} keywords published since {}",
      self.config.keywords.len(),
      cutoff.format("%Y-%m-%d")
    );

    let mut fetched = Fetched::default();
    for (position, keyword) in self.config.keywords.iter().enumerate() {
      if position > 0 {
        self.pause().await;
      }

      let query = build_query(keyword, &self.config.categories, None);
      fetched.queries += 1;
      match self.search(&query, self.config.max_results).await {
        Ok(papers) => {
          let total = papers.len();
          let recent = published_since(papers, cutoff);
          info!("Keyword \"{}\": {} results, {} recent", keyword.topic, total, recent.len());
          fetched.papers.extend(tag_topic(recent, keyword));
        },
        Err(e) => {
          warn!("Keyword \"{}\" failed, skipping: {e}", keyword.topic);
          fetched.failures += 1;
        },
      }
    }
    fetched
  }

  /// Runs every keyword query once per year from `start_year` through `end_year`, without a
  /// recency cutoff.
  pub async fn fetch_historical(&self, start_year: i32, end_year: i32) -> Fetched {
    info!("Starting historical collection from {start_year} to {end_year}");

    let mut fetched = Fetched::default();
    for year in start_year..=end_year {
      let Some(range) = SubmittedRange::year(year) else {
        warn!("Skipping unrepresentable year {year}");
        continue;
      };

      let before = fetched.papers.len();
      for keyword in &self.config.keywords {
        if fetched.queries > 0 {
          self.pause().await;
        }

        let query = build_query(keyword, &self.config.categories, Some(range));
        fetched.queries += 1;
        match self.search(&query, self.config.historical_max_per_year).await {
          Ok(papers) => fetched.papers.extend(tag_topic(papers, keyword)),
          Err(e) => {
            error!("Year {year}, keyword \"{}\" failed, skipping: {e}", keyword.topic);
            fetched.failures += 1;
          },
        }
      }
      info!("Year {year} completed, {} new papers", fetched.papers.len() - before);
    }

    info!("Historical collection completed, {} papers in total", fetched.papers.len());
    fetched
  }

  /// Issues a single search query and parses the returned feed.
  ///
  /// # Errors
  ///
  /// Returns an error if the request fails, the server answers with a non-success status, or the
  /// response is not a valid feed.
  pub async fn search(&self, query: &str, max_results: usize) -> Result<Vec<Paper>> {
    let url = search_url(&self.config.api_url, query, max_results)?;
    debug!("Fetching from arXiv via: {url}");

    let response = self.client.get(url).send().await?;
    let status = response.status();
    if !status.is_success() {
      return Err(PapertrailError::ApiError(format!("arXiv returned status {status}")));
    }

    let data = response.bytes().await?;
    trace!("arXiv response: {}", String::from_utf8_lossy(&data));
    parse_feed(&data)
  }

  /// Waits the configured time between two remote queries.
  async fn pause(&self) {
    let delay = self.config.request_delay();
    if !delay.is_zero() {
      trace!("Sleeping {delay:?} before the next query");
      tokio::time::sleep(delay).await;
    }
  }
}

/// Builds the arXiv `search_query` for one keyword.
///
/// Phrases are OR-ed, multi-word phrases are quoted, and categories form an any-of scope:
///
/// ```
/// use papertrail::{config::Keyword, retriever::build_query};
///
/// let keyword = Keyword {
///   topic:   "SG".into(),
///   filters: vec!["symplectic geometry".into(), "symplectomorphism".into()],
/// };
/// let categories = vec!["math.SG".to_string(), "math.DG".to_string()];
/// assert_eq!(
///   build_query(&keyword, &categories, None),
///   r#"("symplectic geometry" OR symplectomorphism) AND (cat:math.SG OR cat:math.DG)"#
/// );
/// ```
pub fn build_query(
  keyword: &Keyword,
  categories: &[String],
  submitted: Option<SubmittedRange>,
) -> String {
  let phrases = keyword
    .phrases()
    .into_iter()
    .map(str::trim)
    .filter(|phrase| !phrase.is_empty())
    .map(|phrase| {
      if phrase.split_whitespace().count() > 1 {
        format!("\"{phrase}\"")
      } else {
        phrase.to_owned()
      }
    })
    .collect::<Vec<_>>()
    .join(" OR ");

  let mut query = format!("({phrases})");
  if !categories.is_empty() {
    let scope = categories.iter().map(|c| format!("cat:{c}")).collect::<Vec<_>>().join(" OR ");
    query.push_str(&format!(" AND ({scope})"));
  }
  if let Some(range) = submitted {
    query.push_str(&format!(
      " AND submittedDate:[{}0000 TO {}2359]",
      range.from.format("%Y%m%d"),
      range.through.format("%Y%m%d")
    ));
  }
  query
}

/// Full request URL for `query`, newest submissions first.
pub fn search_url(api_url: &str, query: &str, max_results: usize) -> Result<url::Url> {
  let max_results = max_results.to_string();
  Ok(url::Url::parse_with_params(api_url, &[
    ("search_query", query),
    ("start", "0"),
    ("max_results", max_results.as_str()),
    ("sortBy", "submittedDate"),
    ("sortOrder", "descending"),
  ])?)
}

/// Keeps the papers published at or after `cutoff`.
pub fn published_since(papers: Vec<Paper>, cutoff: DateTime<Utc>) -> Vec<Paper> {
  papers.into_iter().filter(|paper| paper.published >= cutoff).collect()
}

/// Files every paper under the topic of the keyword whose query returned it.
fn tag_topic(papers: Vec<Paper>, keyword: &Keyword) -> impl Iterator<Item = Paper> + '_ {
  papers.into_iter().map(|paper| paper.with_topics([keyword.topic.clone()]))
}
