//! Run configuration, read from a TOML file.
//!
//! Every field has a default, so a configuration file only needs the values that differ:
//!
//! ```toml
//! [query]
//! categories = ["math.SG", "math.DG"]
//! recency_days = 14
//!
//! [[query.keywords]]
//! topic = "Symplectic Geometry"
//! filters = ["symplectic geometry", "symplectic manifold"]
//!
//! [output]
//! html_path = "docs/index.html"
//! max_papers = 500
//! ```

use super::*;

/// Placeholder substituted with a paper identifier in link templates.
pub const IDENTIFIER_PLACEHOLDER: &str = "{identifier}";

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
  /// What to ask the remote index for
  pub query:  QueryConfig,
  /// How links are checked and rebuilt
  pub links:  LinkConfig,
  /// Where results go and how they are presented
  pub output: OutputConfig,
}

/// A named group of search phrases that are OR-ed into one query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Keyword {
  /// Display name, also the search phrase when `filters` is empty
  pub topic:   String,
  /// Search phrases
  #[serde(default)]
  pub filters: Vec<String>,
}

/// `[query]` section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryConfig {
  /// Any-of category scope applied to every query
  pub categories:              Vec<String>,
  /// Only papers published within this many days are kept from a regular update
  pub recency_days:            u32,
  /// Upper bound on results per query
  pub max_results:             usize,
  /// Upper bound on results per keyword and year during a historical collection
  pub historical_max_per_year: usize,
  /// Pause between consecutive remote queries
  pub request_delay_secs:      u64,
  /// Per-request timeout
  pub timeout_secs:            u64,
  /// arXiv API endpoint
  pub api_url:                 String,
  /// `User-Agent` header sent with every request
  pub user_agent:              String,
  /// One remote query is issued per keyword
  pub keywords:                Vec<Keyword>,
}

/// `[links]` section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LinkConfig {
  /// Canonical URL template, `{identifier}` is replaced with the paper id
  pub abs_template: String,
  /// Document URL template, `{identifier}` is replaced with the paper id
  pub pdf_template: String,
  /// Per-probe timeout
  pub timeout_secs: u64,
}

/// `[output]` section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
  /// JSON snapshot, read at start and rewritten at the end of a run
  pub snapshot_path:         PathBuf,
  /// JSON report written by link verification
  pub verification_log_path: PathBuf,
  /// Rendered HTML page
  pub html_path:             PathBuf,
  /// Rendered Markdown summary
  pub markdown_path:         PathBuf,
  /// Maximum number of papers retained across runs
  pub max_papers:            usize,
  /// Number of most recent papers listed in the Markdown summary
  pub markdown_top:          usize,
  /// Page and document heading
  pub title:                 String,
  /// Author lists longer than this are shortened with "et al."
  pub max_display_authors:   usize,
  /// Titles longer than this many characters are shortened in the HTML table
  pub max_title_chars:       usize,
  /// Emit Jekyll front matter at the top of the Markdown summary
  pub front_matter:          bool,
}

impl Config {
  /// Reads a configuration file.
  ///
  /// # Errors
  ///
  /// Returns [`PapertrailError::Path`] if the file cannot be read, [`PapertrailError::TomlDe`] if
  /// it is not a valid configuration, and [`PapertrailError::Config`] if the values cannot be
  /// used (see [`Config::validate`]).
  pub fn load(path: impl AsRef<Path>) -> Result<Self> {
    let path = path.as_ref();
    debug!("Loading configuration from {}", path.display());
    let content = std::fs::read_to_string(path)?;
    Self::from_toml(&content)
  }

  /// Parses a configuration from a TOML string.
  pub fn from_toml(content: &str) -> Result<Self> {
    let config: Self = toml::from_str(content)?;
    config.validate()?;
    Ok(config)
  }

  /// Serializes this configuration to TOML.
  pub fn to_toml(&self) -> Result<String> { Ok(toml::to_string_pretty(self)?) }

  /// Writes this configuration to `path`, creating parent directories.
  pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    create_parent_dir(path)?;
    std::fs::write(path, self.to_toml()?)?;
    Ok(())
  }

  /// Checks the values a run cannot work without.
  pub fn validate(&self) -> Result<()> {
    for (name, value) in [
      ("output.max_papers", self.output.max_papers),
      ("output.markdown_top", self.output.markdown_top),
      ("output.max_title_chars", self.output.max_title_chars),
    ] {
      if value == 0 {
        return Err(PapertrailError::Config(format!("{name} must be at least 1")));
      }
    }
    if self.query.max_results == 0 {
      return Err(PapertrailError::Config("query.max_results must be at least 1".into()));
    }
    for (name, template) in
      [("links.abs_template", &self.links.abs_template), ("links.pdf_template", &self.links.pdf_template)]
    {
      if !template.contains(IDENTIFIER_PLACEHOLDER) {
        return Err(PapertrailError::Config(format!(
          "{name} must contain the {IDENTIFIER_PLACEHOLDER} placeholder"
        )));
      }
    }
    url::Url::parse(&self.query.api_url)?;
    Ok(())
  }

  /// Returns the default path for the configuration file.
  ///
  /// The path is constructed as follows:
  /// - On Unix: `~/.config/papertrail/config.toml`
  /// - On macOS: `~/Library/Application Support/papertrail/config.toml`
  /// - On Windows: `%APPDATA%\papertrail\config.toml`
  /// - Fallback: `./papertrail/config.toml`
  pub fn default_path() -> PathBuf {
    dirs::config_dir().unwrap_or_else(|| PathBuf::from(".")).join("papertrail").join("config.toml")
  }

  /// Sets every output file to live under `dir`, keeping the default file names.
  pub fn with_output_dir(mut self, dir: impl AsRef<Path>) -> Self {
    let dir = dir.as_ref();
    self.output.snapshot_path = dir.join("papers.json");
    self.output.verification_log_path = dir.join("link_verification.json");
    self.output.html_path = dir.join("index.html");
    self.output.markdown_path = dir.join("README.md");
    self
  }

  /// Points the retriever at a different API endpoint.
  pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
    self.query.api_url = api_url.into();
    self
  }

  /// Replaces both link templates.
  pub fn with_link_templates(
    mut self,
    abs_template: impl Into<String>,
    pdf_template: impl Into<String>,
  ) -> Self {
    self.links.abs_template = abs_template.into();
    self.links.pdf_template = pdf_template.into();
    self
  }
}

impl Keyword {
  /// A keyword searched for as a single phrase.
  pub fn phrase(topic: impl Into<String>) -> Self { Self { topic: topic.into(), filters: vec![] } }

  /// The phrases to search for, falling back to the topic itself.
  pub fn phrases(&self) -> Vec<&str> {
    if self.filters.is_empty() {
      vec![self.topic.as_str()]
    } else {
      self.filters.iter().map(String::as_str).collect()
    }
  }
}

impl QueryConfig {
  /// Pause between consecutive remote queries.
  pub fn request_delay(&self) -> Duration { Duration::from_secs(self.request_delay_secs) }

  /// Per-request timeout.
  pub fn timeout(&self) -> Duration { Duration::from_secs(self.timeout_secs) }
}

impl LinkConfig {
  /// Canonical landing page for `identifier`.
  pub fn canonical_url(&self, identifier: &str) -> String {
    self.abs_template.replace(IDENTIFIER_PLACEHOLDER, identifier)
  }

  /// Direct document link for `identifier`.
  pub fn document_url(&self, identifier: &str) -> String {
    self.pdf_template.replace(IDENTIFIER_PLACEHOLDER, identifier)
  }

  /// Per-probe timeout.
  pub fn timeout(&self) -> Duration { Duration::from_secs(self.timeout_secs) }
}

impl Default for QueryConfig {
  fn default() -> Self {
    Self {
      categories:              ["math.SG", "math.DG", "math.AG", "math-ph", "math.QA"]
        .map(String::from)
        .to_vec(),
      recency_days:            30,
      max_results:             100,
      historical_max_per_year: 500,
      request_delay_secs:      3,
      timeout_secs:            30,
      api_url:                 "http://export.arxiv.org/api/query".into(),
      user_agent:              concat!("papertrail/", env!("CARGO_PKG_VERSION")).into(),
      keywords:                vec![
        Keyword {
          topic:   "Symplectic Geometry".into(),
          filters: vec!["symplectic geometry".into(), "symplectic manifold".into()],
        },
        Keyword::phrase("Floer homology"),
        Keyword::phrase("Hamiltonian dynamics"),
        Keyword::phrase("contact geometry"),
        Keyword::phrase("Lagrangian submanifold"),
      ],
    }
  }
}

impl Default for LinkConfig {
  fn default() -> Self {
    Self {
      abs_template: "https://arxiv.org/abs/{identifier}".into(),
      pdf_template: "https://arxiv.org/pdf/{identifier}".into(),
      timeout_secs: 5,
    }
  }
}

impl Default for OutputConfig {
  fn default() -> Self {
    Self {
      snapshot_path:         PathBuf::from("docs/papers.json"),
      verification_log_path: PathBuf::from("docs/link_verification.json"),
      html_path:             PathBuf::from("docs/index.html"),
      markdown_path:         PathBuf::from("README.md"),
      max_papers:            1000,
      markdown_top:          100,
      title:                 "Collection of Articles on Symplectic Geometry".into(),
      max_display_authors:   3,
      max_title_chars:       120,
      front_matter:          false,
    }
  }
}

/// Creates the directory `path` will be written into, if it has one.
pub(crate) fn create_parent_dir(path: &Path) -> Result<()> {
  if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
    std::fs::create_dir_all(parent)?;
  }
  Ok(())
}
