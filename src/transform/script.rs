//! `<vp-script setup>` extraction and `<script setup>` wrapping.

use std::sync::LazyLock;

use regex::Regex;

use super::Append;

/// Inline setup block: `<vp-script setup>...</vp-script>`, attributes allowed
/// on either side of `setup`. The body is greedy up to the last closing tag.
static VP_SCRIPT_SETUP: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"<vp-script\s(.*\s)?setup(\s.*)?>([\s\S]*)</vp-script>").unwrap()
});

/// Remove the first `<vp-script setup>` block from `code`.
///
/// A non-empty body is queued on `append.script_setups`. Without a block the
/// code comes back untouched.
pub fn extract_script_setup(code: String, append: &mut Append) -> String {
    let Some(caps) = VP_SCRIPT_SETUP.captures(&code) else {
        return code;
    };

    let whole = caps.get(0).map(|m| m.range()).unwrap_or_default();
    let body = caps.get(3).map(|m| m.as_str()).unwrap_or_default();
    if !body.is_empty() {
        append.script_setups.push(body.to_string());
    }

    let mut stripped = String::with_capacity(code.len() - whole.len());
    stripped.push_str(&code[..whole.start]);
    stripped.push_str(&code[whole.end..]);
    stripped
}

/// Wrap collected fragments into a single `<script setup>` block.
pub fn combine_script_setup(codes: &[String]) -> String {
    format!("\n<script setup>\n{}\n</script>\n", codes.join("\n"))
}
