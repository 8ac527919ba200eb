//! Atom feed parsing for arXiv API responses.
//!
//! Namespace prefixes (`arxiv:`, `opensearch:`) are stripped before deserializing, so
//! `<arxiv:primary_category>` is read as `primary_category` and so on.

use quick_xml::de::from_str;

use super::*;

/// Internal representation of the arXiv API's Atom feed response.
#[derive(Debug, Deserialize)]
struct Feed {
  /// Zero or more result entries
  #[serde(rename = "entry", default)]
  entries: Vec<Entry>,
}

/// Internal representation of one paper entry from arXiv's API response.
#[derive(Debug, Deserialize)]
struct Entry {
  /// Versioned abstract URL, e.g. `http://arxiv.org/abs/2301.07041v2`
  id:               String,
  /// Paper title (may contain LaTeX markup and hard line breaks)
  #[serde(default)]
  title:            String,
  /// Abstract
  #[serde(default)]
  summary:          String,
  /// First submission
  #[serde(default)]
  published:        Option<DateTime<Utc>>,
  /// Latest revision
  #[serde(default)]
  updated:          Option<DateTime<Utc>>,
  /// Listed authors
  #[serde(rename = "author", default)]
  authors:          Vec<AuthorEntry>,
  /// Landing page, PDF and DOI links
  #[serde(rename = "link", default)]
  links:            Vec<Link>,
  /// All category tags
  #[serde(rename = "category", default)]
  categories:       Vec<Category>,
  /// The category listed first by arXiv
  #[serde(default)]
  primary_category: Option<Category>,
  /// Author comment
  #[serde(default)]
  comment:          Option<String>,
}

/// Internal representation of an author from arXiv's API response.
#[derive(Debug, Deserialize)]
struct AuthorEntry {
  /// Author's full name
  name: String,
}

/// An Atom `<link>` element.
#[derive(Debug, Deserialize)]
struct Link {
  /// Target URL
  #[serde(rename = "@href")]
  href:       String,
  /// Link relation, `alternate` for the landing page
  #[serde(rename = "@rel", default)]
  rel:        Option<String>,
  /// arXiv labels the document link with `pdf`
  #[serde(rename = "@title", default)]
  title:      Option<String>,
  /// MIME type of the target
  #[serde(rename = "@type", default)]
  media_type: Option<String>,
}

/// An Atom `<category>` element.
#[derive(Debug, Deserialize)]
struct Category {
  /// Category tag, e.g. `math.SG`
  #[serde(rename = "@term")]
  term: String,
}

/// Parses an arXiv Atom response into paper records.
///
/// Entries that cannot be turned into a record (no usable identifier, no publication date) are
/// logged and skipped.
///
/// # Errors
///
/// Returns [`PapertrailError::Xml`] if the document is not a feed, and
/// [`PapertrailError::ApiError`] if arXiv answered with its error entry (for example for a
/// malformed query).
pub fn parse_feed(data: &[u8]) -> Result<Vec<Paper>> {
  let xml = strip_xml_namespaces(&String::from_utf8_lossy(data));
  let feed: Feed = from_str(&xml)?;

  let mut papers = Vec::with_capacity(feed.entries.len());
  for entry in feed.entries {
    if entry.id.contains("/api/errors") {
      return Err(PapertrailError::ApiError(collapse_whitespace(&entry.summary)));
    }
    match entry.into_paper() {
      Ok(paper) => papers.push(paper),
      Err(e) => warn!("Skipping feed entry: {e}"),
    }
  }
  Ok(papers)
}

impl Entry {
  /// Converts the raw entry into a [`Paper`].
  fn into_paper(self) -> Result<Paper> {
    let id = identifier_from_entry_id(&self.id)?;
    let published = self
      .published
      .ok_or_else(|| PapertrailError::ApiError(format!("Entry {id} has no publication date")))?;

    let url = self
      .links
      .iter()
      .find(|link| link.rel.as_deref() == Some("alternate"))
      .map_or_else(|| self.id.trim().to_owned(), |link| link.href.clone());
    let pdf_url = self
      .links
      .iter()
      .find(|link| {
        link.title.as_deref() == Some("pdf") || link.media_type.as_deref() == Some("application/pdf")
      })
      .map(|link| link.href.clone());

    let authors: Vec<String> =
      self.authors.iter().map(|author| collapse_whitespace(&author.name)).collect();

    Ok(Paper {
      title: collapse_whitespace(&self.title),
      author_display: author_display(&authors),
      authors,
      updated: self.updated.unwrap_or(published),
      published,
      summary: collapse_whitespace(&self.summary),
      categories: self.categories.into_iter().map(|c| c.term).collect(),
      primary_category: self.primary_category.map(|c| c.term),
      comment: self.comment.map(|c| collapse_whitespace(&c)).filter(|c| !c.is_empty()),
      topics: Vec::new(),
      url,
      pdf_url,
      id,
    })
  }
}

/// Removes namespace declarations and element prefixes.
fn strip_xml_namespaces(xml: &str) -> String {
  lazy_static! {
    static ref DECLARATION: Regex = Regex::new(r#"\s+xmlns(?::\w+)?="[^"]*""#).unwrap();
    static ref PREFIX: Regex = Regex::new(r"(</?)[A-Za-z_][\w.-]*:").unwrap();
  }
  let without_declarations = DECLARATION.replace_all(xml, "");
  PREFIX.replace_all(&without_declarations, "$1").into_owned()
}
