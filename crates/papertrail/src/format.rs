//! Text helpers shared by the renderers.

use super::*;

/// Collapses every run of whitespace (including the hard line breaks arXiv puts in titles and
/// abstracts) into a single space.
///
/// ```
/// use papertrail::format::collapse_whitespace;
///
/// assert_eq!(collapse_whitespace("On the\n  Size of  Pairings "), "On the Size of Pairings");
/// ```
pub fn collapse_whitespace(text: &str) -> String { text.split_whitespace().collect::<Vec<_>>().join(" ") }

/// Shortens `title` to at most `max_chars` characters, ending in an ellipsis when cut.
///
/// Cuts on a character boundary, never inside a multi-byte character.
///
/// ```
/// use papertrail::format::format_title;
///
/// assert_eq!(format_title("Floer homology", Some(40)), "Floer homology");
/// assert_eq!(format_title("Floer homology and the Arnold conjecture", Some(15)), "Floer homology…");
/// ```
pub fn format_title(title: &str, max_chars: Option<usize>) -> String {
  match max_chars {
    Some(max) if title.chars().count() > max => {
      let cut: String = title.chars().take(max.saturating_sub(1)).collect();
      format!("{}…", cut.trim_end())
    },
    _ => title.to_owned(),
  }
}

/// Joins at most `max_authors` names, appending "et al." when the list is longer.
///
/// ```
/// use papertrail::format::format_authors;
///
/// let authors = ["A. One", "B. Two", "C. Three"].map(String::from);
/// assert_eq!(format_authors(&authors, 2), "A. One, B. Two et al.");
/// assert_eq!(format_authors(&authors, 3), "A. One, B. Two, C. Three");
/// ```
pub fn format_authors(authors: &[String], max_authors: usize) -> String {
  if max_authors > 0 && authors.len() > max_authors {
    format!("{} et al.", author_display(&authors[..max_authors]))
  } else {
    author_display(authors)
  }
}

/// Escapes text for use in HTML element content and quoted attribute values.
pub fn escape_html(text: &str) -> String {
  text
    .replace('&', "&amp;")
    .replace('<', "&lt;")
    .replace('>', "&gt;")
    .replace('"', "&quot;")
    .replace('\'', "&#39;")
}

/// Makes text safe to place inside a Markdown table cell.
pub fn escape_markdown_cell(text: &str) -> String {
  collapse_whitespace(text).replace('|', "\\|")
}

/// Pads the math in `text` with spaces so Markdown renderers pick it up, and trims whitespace
/// just inside the dollars.
///
/// The span runs from the first `$` to the last one, so several inline formulas are padded as a
/// whole on their outer sides.
///
/// ```
/// use papertrail::format::pretty_math;
///
/// assert_eq!(pretty_math("The$ SU(2) $case"), "The $SU(2)$ case");
/// assert_eq!(pretty_math("a$x$ and $y$b"), "a $x$ and $y$ b");
/// assert_eq!(pretty_math("No math here"), "No math here");
/// ```
pub fn pretty_math(text: &str) -> String {
  lazy_static! {
    static ref MATH_SPAN: Regex = Regex::new(r"\$.*\$").unwrap();
  }

  let Some(found) = MATH_SPAN.find(text) else {
    return text.to_owned();
  };
  let (before, after) = (&text[..found.start()], &text[found.end()..]);
  let span = found.as_str();
  let inner = span[1..span.len() - 1].trim();

  let lead = match before.chars().last() {
    Some(c) if c != ' ' && c != '*' => " ",
    _ => "",
  };
  let trail = match after.chars().next() {
    Some(c) if c != ' ' && c != '*' => " ",
    _ => "",
  };
  format!("{before}{lead}${inner}${trail}{after}")
}
