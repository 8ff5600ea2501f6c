//! Header and footer splicing.

use std::sync::LazyLock;

use regex::Regex;

/// Closing frontmatter fence followed by a blank line.
const FRONTMATTER_END: &str = "---\n\n";

/// Second-level heading starting with an ASCII word character.
static FIRST_SUBHEADER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n## [0-9A-Za-z_]").unwrap());

/// Byte offset where header fragments are inserted.
///
/// The newline before the first `## ` heading wins. Otherwise the position
/// right after the closing `---\n` of the frontmatter, or 0 without one.
pub fn insertion_point(code: &str) -> usize {
    if let Some(m) = FIRST_SUBHEADER.find(code) {
        return m.start();
    }
    code.find(FRONTMATTER_END)
        .map(|idx| idx + FRONTMATTER_END.len() - 1)
        .unwrap_or(0)
}

/// Insert `headers` at the insertion point and append `footers`.
///
/// The result always ends with one extra newline.
pub fn combine_markdown(code: &str, headers: &[String], footers: &[String]) -> String {
    let mut out = String::with_capacity(code.len() + 256);

    if headers.is_empty() {
        out.push_str(code);
    } else {
        let at = insertion_point(code);
        out.push_str(&code[..at]);
        out.push_str(&headers.join("\n"));
        out.push_str(&code[at..]);
    }

    out.push_str(&footers.join("\n"));
    out.push('\n');
    out
}
