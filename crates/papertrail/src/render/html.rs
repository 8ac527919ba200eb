//! Standalone HTML page with a filterable paper table.

use super::*;

/// Inline stylesheet for the page.
const STYLE: &str = r#"
    body { font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", Helvetica, Arial, sans-serif; margin: 2em auto; max-width: 1200px; padding: 0 1em; color: #24292e; }
    h1 { margin-bottom: 0.2em; }
    .meta { color: #586069; margin-bottom: 1em; }
    #filter { width: 100%; padding: 0.5em; margin-bottom: 1em; font-size: 1em; box-sizing: border-box; }
    table { border-collapse: collapse; width: 100%; }
    th, td { border-bottom: 1px solid #e1e4e8; padding: 0.4em 0.6em; text-align: left; vertical-align: top; }
    th { background: #f6f8fa; }
    td.date { white-space: nowrap; }
    .empty { color: #586069; font-style: italic; }
    .comment { color: #586069; }
"#;

/// Hides every row whose text does not contain the filter input, ignoring case.
const FILTER_SCRIPT: &str = r#"
    document.getElementById('filter').addEventListener('input', function () {
      var needle = this.value.toLowerCase();
      document.querySelectorAll('#papers tbody tr').forEach(function (row) {
        row.style.display = row.textContent.toLowerCase().indexOf(needle) === -1 ? 'none' : '';
      });
    });
"#;

/// Renders the full HTML document for `papers`.
///
/// Every piece of record text is escaped. A record set with no papers still yields a complete
/// page with an empty table body.
pub fn render_html(papers: &[Paper], options: &RenderOptions) -> String {
  let title = escape_html(&options.title);
  let mut html = String::new();

  html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
  html.push_str("  <meta charset=\"utf-8\">\n");
  html.push_str("  <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
  html.push_str(&format!("  <title>{title}</title>\n"));
  html.push_str(&format!("  <style>{STYLE}  </style>\n"));
  html.push_str("</head>\n<body>\n");

  html.push_str(&format!("  <h1>{title}</h1>\n"));
  html.push_str(&format!(
    "  <p class=\"meta\">Last updated: {} &middot; {} papers</p>\n",
    options.updated_at.format("%Y-%m-%d %H:%M UTC"),
    papers.len()
  ));
  html.push_str(
    "  <input type=\"text\" id=\"filter\" placeholder=\"Filter by title, author, date or \
     identifier\" aria-label=\"Filter papers\">\n",
  );

  html.push_str("  <table id=\"papers\">\n    <thead>\n");
  html.push_str("      <tr><th>Date</th><th>Authors</th><th>Title</th><th>Link</th></tr>\n");
  html.push_str("    </thead>\n    <tbody>\n");
  for paper in papers {
    html.push_str(&table_row(paper, options));
  }
  html.push_str("    </tbody>\n  </table>\n");
  if papers.is_empty() {
    html.push_str("  <p class=\"empty\">No papers found.</p>\n");
  }

  html.push_str(&format!("  <script>{FILTER_SCRIPT}  </script>\n"));
  html.push_str("</body>\n</html>\n");
  html
}

/// One `<tr>` for `paper`.
fn table_row(paper: &Paper, options: &RenderOptions) -> String {
  let authors = format_authors(&paper.authors, options.max_display_authors);
  let mut title_cell = escape_html(&format_title(&paper.title, Some(options.max_title_chars)));
  if let Some(comment) = &paper.comment {
    title_cell.push_str(&format!("<br><small class=\"comment\">{}</small>", escape_html(comment)));
  }

  let mut links = format!(
    "<a href=\"{}\" target=\"_blank\" rel=\"noopener\">{}</a>",
    escape_html(&paper.url),
    escape_html(&paper.id)
  );
  if let Some(pdf_url) = &paper.pdf_url {
    links.push_str(&format!(
      " <a href=\"{}\" target=\"_blank\" rel=\"noopener\">PDF</a>",
      escape_html(pdf_url)
    ));
  }

  format!(
    "      <tr><td class=\"date\">{}</td><td>{}</td><td title=\"{}\">{}</td><td>{}</td></tr>\n",
    paper.published.format("%Y-%m-%d"),
    escape_html(&authors),
    escape_html(&paper.title),
    title_cell,
    links
  )
}
