//! Markdown summary, suitable as a repository README or a Jekyll page.

use super::*;

/// Renders the Markdown summary for `papers`.
///
/// The "Latest Papers" table lists at most `options.markdown_top` records. It is followed by one
/// section per keyword topic in `options.keywords` that has papers filed under it, each listing at
/// most `options.markdown_top` of them, and a collapsible table of contents links the sections.
///
/// ```
/// use papertrail::render::{render_markdown, RenderOptions};
///
/// let markdown = render_markdown(&[], &RenderOptions::default());
/// assert!(markdown.contains("| Date | Title | Authors | Links |"));
/// assert!(markdown.contains("No papers"));
/// ```
pub fn render_markdown(papers: &[Paper], options: &RenderOptions) -> String {
  let shown = top(papers.iter(), options.markdown_top);
  let sections: Vec<(&str, Vec<&Paper>)> = options
    .keywords
    .iter()
    .map(|topic| {
      let filed = top(papers.iter().filter(|paper| paper.has_topic(topic)), options.markdown_top);
      (topic.as_str(), filed)
    })
    .filter(|(_, filed)| !filed.is_empty())
    .collect();
  let mut markdown = String::new();

  if options.front_matter {
    markdown.push_str("---\nlayout: default\n---\n\n");
  }
  markdown.push_str(&format!("# {}\n\n", options.title));
  markdown.push_str(&format!(
    "Automatically updated on {}.\n\n",
    options.updated_at.format("%Y-%m-%d")
  ));

  markdown.push_str("## Statistics\n\n");
  markdown.push_str(&format!("- Total papers: {}\n", papers.len()));
  markdown.push_str(&format!("- Papers shown: {}\n", shown.len()));
  markdown.push_str(&format!("- Categories: {}\n", list_or_none(&options.categories)));
  markdown.push_str(&format!("- Keywords: {}\n\n", list_or_none(&options.keywords)));

  if !sections.is_empty() {
    markdown.push_str("<details>\n  <summary>Table of Contents</summary>\n  <ol>\n");
    for heading in std::iter::once(LATEST).chain(sections.iter().map(|(topic, _)| *topic)) {
      markdown.push_str(&format!("    <li><a href=\"#{}\">{heading}</a></li>\n", anchor(heading)));
    }
    markdown.push_str("  </ol>\n</details>\n\n");
  }

  markdown.push_str(&format!("## {LATEST}\n\n"));
  push_table(&mut markdown, &shown, options);
  if papers.is_empty() {
    markdown.push_str("\nNo papers found.\n");
  }

  for (topic, filed) in &sections {
    markdown.push_str(&format!("\n## {topic}\n\n"));
    push_table(&mut markdown, filed, options);
  }
  markdown
}

/// Heading of the table of the newest papers overall.
const LATEST: &str = "Latest Papers";

/// The first `n` papers of `papers`.
fn top<'a>(papers: impl Iterator<Item = &'a Paper>, n: usize) -> Vec<&'a Paper> {
  papers.take(n).collect()
}

/// Appends a table header and one row per paper.
fn push_table(markdown: &mut String, papers: &[&Paper], options: &RenderOptions) {
  markdown.push_str("| Date | Title | Authors | Links |\n");
  markdown.push_str("|:-----|:------|:--------|:------|\n");
  for paper in papers {
    markdown.push_str(&table_row(paper, options));
  }
}

/// One table row for `paper`.
fn table_row(paper: &Paper, options: &RenderOptions) -> String {
  let title = escape_markdown_cell(&pretty_math(&paper.title));
  let authors = escape_markdown_cell(&format_authors(&paper.authors, options.max_display_authors));
  let mut links = format!("[{}]({})", paper.id, paper.url);
  if let Some(pdf_url) = &paper.pdf_url {
    links.push_str(&format!(" [PDF]({pdf_url})"));
  }
  if let Some(comment) = &paper.comment {
    links.push_str(&format!(", {}", escape_markdown_cell(comment)));
  }
  format!("| {} | **{title}** | {authors} | {links} |\n", paper.published.format("%Y-%m-%d"))
}

/// GitHub-style heading anchor for `heading`.
fn anchor(heading: &str) -> String {
  heading
    .to_lowercase()
    .chars()
    .filter(|c| !matches!(c, ',' | '(' | ')'))
    .map(|c| if c == ' ' { '-' } else { c })
    .collect()
}

/// Comma-separated `items`, or "none".
fn list_or_none(items: &[String]) -> String {
  if items.is_empty() {
    "none".to_owned()
  } else {
    items.join(", ")
  }
}
