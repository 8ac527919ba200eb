//! HTML and Markdown output.
//!
//! Both renderers are pure functions from a record list to a document string; [`write_outputs`]
//! writes them to the configured paths, replacing whatever was there.

use super::*;

pub mod html;
pub mod markdown;

pub use self::{html::render_html, markdown::render_markdown};

/// Everything the renderers need besides the records themselves.
#[derive(Debug, Clone)]
pub struct RenderOptions {
  /// Page and document heading
  pub title:               String,
  /// Timestamp shown as the last update
  pub updated_at:          DateTime<Utc>,
  /// Author lists longer than this are shortened
  pub max_display_authors: usize,
  /// Titles longer than this are shortened in the HTML table
  pub max_title_chars:     usize,
  /// Number of records listed in the Markdown table
  pub markdown_top:        usize,
  /// Emit Jekyll front matter in the Markdown summary
  pub front_matter:        bool,
  /// Category tags listed in the Markdown statistics
  pub categories:          Vec<String>,
  /// Keyword topics listed in the Markdown statistics
  pub keywords:            Vec<String>,
}

impl RenderOptions {
  /// Collects render settings from a full configuration.
  pub fn from_config(config: &Config, updated_at: DateTime<Utc>) -> Self {
    Self {
      title: config.output.title.clone(),
      updated_at,
      max_display_authors: config.output.max_display_authors,
      max_title_chars: config.output.max_title_chars,
      markdown_top: config.output.markdown_top,
      front_matter: config.output.front_matter,
      categories: config.query.categories.clone(),
      keywords: config.query.keywords.iter().map(|k| k.topic.clone()).collect(),
    }
  }
}

impl Default for RenderOptions {
  fn default() -> Self { Self::from_config(&Config::default(), Utc::now()) }
}

/// Renders both documents and writes them to the configured paths.
///
/// Returns the paths written, HTML first.
pub fn write_outputs(
  papers: &[Paper],
  output: &OutputConfig,
  options: &RenderOptions,
) -> Result<Vec<PathBuf>> {
  let documents = [
    (&output.html_path, render_html(papers, options)),
    (&output.markdown_path, render_markdown(papers, options)),
  ];

  let mut written = Vec::with_capacity(documents.len());
  for (path, document) in documents {
    create_parent_dir(path)?;
    std::fs::write(path, document)?;
    info!("Rendered {} papers to {}", papers.len(), path.display());
    written.push(path.clone());
  }
  Ok(written)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_write_outputs_creates_files() {
    let dir = tempdir().unwrap();
    let config = Config::default().with_output_dir(dir.path().join("site"));
    let papers = vec![Paper::new("2401.00001", "A title", vec!["A. Author".into()], Utc::now())];

    let written =
      write_outputs(&papers, &config.output, &RenderOptions::from_config(&config, Utc::now()))
        .unwrap();

    assert_eq!(written, vec![config.output.html_path.clone(), config.output.markdown_path.clone()]);
    let html = std::fs::read_to_string(&config.output.html_path).unwrap();
    assert!(html.contains("A title"));
    let markdown = std::fs::read_to_string(&config.output.markdown_path).unwrap();
    assert!(markdown.contains("2401.00001"));
  }

  #[test]
  fn test_options_from_config() {
    let config = Config::default();
    let options = RenderOptions::from_config(&config, Utc::now());
    assert_eq!(options.title, config.output.title);
    assert_eq!(options.keywords.len(), config.query.keywords.len());
    assert_eq!(options.keywords[1], "Floer homology");
  }
}
