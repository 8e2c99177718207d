//! Fields computed from the post body.

use std::sync::LazyLock;

use regex::Regex;

/// Average reading speed used for estimates.
pub const WORDS_PER_MINUTE: usize = 200;
/// Longest auto-generated excerpt before truncation.
pub const EXCERPT_MAX_CHARS: usize = 160;
/// Opening paragraphs this short are not used as excerpts.
pub const EXCERPT_MIN_CHARS: usize = 50;

static EMPHASIS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[#*_`]").expect("emphasis regex is valid"));
static WHITESPACE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("whitespace regex is valid"));

/// Estimates reading time as `"N min read"`.
///
/// Returns `None` for a body without words so callers keep the previous value.
#[must_use]
pub fn estimate_read_time(body: &str) -> Option<String> {
    let words = body.split_whitespace().count();
    if words == 0 {
        return None;
    }
    let minutes = words.div_ceil(WORDS_PER_MINUTE);
    Some(format!("{minutes} min read"))
}

/// Builds an excerpt from the first paragraph of a Markdown body.
///
/// Emphasis markers are stripped and the text is cut at
/// [`EXCERPT_MAX_CHARS`] with a trailing ellipsis. Paragraphs of
/// [`EXCERPT_MIN_CHARS`] characters or fewer yield `None`.
#[must_use]
pub fn auto_excerpt(body: &str) -> Option<String> {
    let first_paragraph = body.split("\n\n").next().unwrap_or_default();
    let stripped = EMPHASIS_RE.replace_all(first_paragraph, "");
    let collapsed = WHITESPACE_RE.replace_all(stripped.trim(), " ");

    let length = collapsed.chars().count();
    if length <= EXCERPT_MIN_CHARS {
        return None;
    }

    if length > EXCERPT_MAX_CHARS {
        let cut: String = collapsed.chars().take(EXCERPT_MAX_CHARS).collect();
        Some(format!("{}...", cut.trim_end()))
    } else {
        Some(collapsed.into_owned())
    }
}
