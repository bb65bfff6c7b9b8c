//! Caret placeholder and `${a:b}` range resolution

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Sentinel the renderer emits where the caret may go
pub const CARET_PLACEHOLDER: &str = "{%::zen-caret::%}";

static RANGE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{(-?\d+):([^}]*)\}").expect("valid range pattern"));

/// How many `${a:b}` ranges are replaced in one pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RangeReplace {
    #[default]
    All,
    First,
}

/// Replace `${a:b}` tokens with `b`
pub fn resolve_ranges(text: &str, mode: RangeReplace) -> Cow<'_, str> {
    match mode {
        RangeReplace::All => RANGE.replace_all(text, "$2"),
        RangeReplace::First => RANGE.replace(text, "$2"),
    }
}

/// Resolve ranges, then strip every placeholder and report the first one's byte offset
pub fn resolve_caret(rendered: &str, placeholder: &str) -> (String, Option<usize>) {
    resolve_caret_with(rendered, placeholder, RangeReplace::All)
}

pub fn resolve_caret_with(
    rendered: &str,
    placeholder: &str,
    mode: RangeReplace,
) -> (String, Option<usize>) {
    let text = resolve_ranges(rendered, mode);
    if placeholder.is_empty() {
        return (text.into_owned(), None);
    }

    let caret = text.find(placeholder);
    let text = match caret {
        Some(_) => text.replace(placeholder, ""),
        None => text.into_owned(),
    };
    (text, caret)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_placeholder_offset_and_all_removed() {
        let rendered = format!("<a href=\"{CARET_PLACEHOLDER}\">{CARET_PLACEHOLDER}</a>");
        let (text, caret) = resolve_caret(&rendered, CARET_PLACEHOLDER);
        assert_eq!(text, "<a href=\"\"></a>");
        assert_eq!(caret, Some(9));
    }

    #[test]
    fn test_no_placeholder() {
        let (text, caret) = resolve_caret("<br>", CARET_PLACEHOLDER);
        assert_eq!(text, "<br>");
        assert_eq!(caret, None);
    }

    #[test]
    fn test_ranges_all_and_first() {
        let input = "${1:one} and ${2:two}";
        assert_eq!(resolve_ranges(input, RangeReplace::All), "one and two");
        assert_eq!(resolve_ranges(input, RangeReplace::First), "one and ${2:two}");
    }

    #[test]
    fn test_ranges_run_before_placeholder() {
        let rendered = format!("${{1:abc}}{CARET_PLACEHOLDER}");
        let (text, caret) = resolve_caret(&rendered, CARET_PLACEHOLDER);
        assert_eq!(text, "abc");
        assert_eq!(caret, Some(3));
    }

    #[test]
    fn test_non_numeric_range_is_untouched() {
        assert_eq!(resolve_ranges("${x:y}", RangeReplace::All), "${x:y}");
    }

    #[test]
    fn test_empty_placeholder_is_ignored() {
        let (text, caret) = resolve_caret("abc", "");
        assert_eq!(text, "abc");
        assert_eq!(caret, None);
    }
}
