//! Wrap-with-abbreviation mode
//!
//! The selection goes inside the deepest, rightmost element of the expanded
//! tree, followed by the caret. Abbreviations without elements get the
//! selection appended after their text.

use tracing::debug;

use crate::Result;
use crate::builder::{Limits, parse};
use crate::profile::Profile;
use crate::render::{RenderOptions, render_with};
use crate::tree::Node;

/// Wrap `selected` with the expansion of `abbreviation`
///
/// The result still carries the caret placeholder.
pub fn wrap(abbreviation: &str, selected: &str, profile: &Profile) -> Result<String> {
    wrap_with_limits(abbreviation, selected, profile, Limits::default())
}

pub fn wrap_with_limits(
    abbreviation: &str,
    selected: &str,
    profile: &Profile,
    limits: Limits,
) -> Result<String> {
    let mut tree = parse(abbreviation, limits)?;
    let content = unindent(selected);

    let mut inserted = Vec::with_capacity(2);
    if !content.is_empty() {
        inserted.push(Node::verbatim(content));
    }
    inserted.push(Node::caret());

    match tree.innermost_last_element_mut() {
        Some(element) => {
            debug!(element = ?element.name(), "Wrapping selection");
            element.self_closing = false;
            element.children.extend(inserted);
        }
        None => tree.children.extend(inserted),
    }

    Ok(render_with(
        &tree,
        profile,
        RenderOptions { empty_caret: false },
    ))
}

/// Strip the indentation shared by all non-blank lines and trailing line breaks
pub fn unindent(text: &str) -> String {
    let text = text.replace("\r\n", "\n");
    let text = text.trim_end_matches('\n');

    let common = text
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| line.len() - line.trim_start().len())
        .min()
        .unwrap_or(0);

    text.lines()
        .map(|line| line.get(common..).unwrap_or_else(|| line.trim_start()))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::caret::{CARET_PLACEHOLDER, resolve_caret};
    use crate::error::{ParseErrorKind, ZenError};

    fn wrapped(abbreviation: &str, selected: &str) -> (String, Option<usize>) {
        let rendered = wrap(abbreviation, selected, &Profile::html()).unwrap();
        resolve_caret(&rendered, CARET_PLACEHOLDER)
    }

    #[test]
    fn test_wraps_innermost_element() {
        let (text, caret) = wrapped("div>p", "hello");
        assert_eq!(text, "<div>\n\t<p>hello</p>\n</div>");
        assert_eq!(caret, Some(text.find("</p>").unwrap()));
    }

    #[test]
    fn test_only_target_gets_caret() {
        let rendered = wrap("div+a[href]", "x", &Profile::html()).unwrap();
        assert_eq!(rendered.matches(CARET_PLACEHOLDER).count(), 1);
        assert!(rendered.contains(r#"<a href="">x"#));
    }

    #[test]
    fn test_multiline_selection_is_unindented() {
        let (text, _) = wrapped("ul>li", "    one\n      two\n\n");
        assert_eq!(text, "<ul>\n\t<li>\n\t\tone\n\t\t  two\n\t</li>\n</ul>");
    }

    #[test]
    fn test_selection_is_not_numbered() {
        let (text, _) = wrapped("p*2", "cost $5");
        assert_eq!(text, "<p></p>\n<p>cost $5</p>");
    }

    #[test]
    fn test_void_target_is_opened() {
        let (text, _) = wrapped("br", "x");
        assert_eq!(text, "<br>x</br>");
    }

    #[test]
    fn test_text_only_abbreviation_appends() {
        let (text, caret) = wrapped("{Note: }", "body");
        assert_eq!(text, "Note: body");
        assert_eq!(caret, Some(10));
    }

    #[test]
    fn test_empty_selection_keeps_shell() {
        let (text, caret) = wrapped("div", "");
        assert_eq!(text, "<div></div>");
        assert_eq!(caret, Some(5));
    }

    #[test]
    fn test_blank_abbreviation() {
        let err = wrap("  ", "x", &Profile::html()).unwrap_err();
        assert_eq!(err.parse_kind(), Some(ParseErrorKind::EmptyAbbreviation));
        assert!(matches!(err, ZenError::Parse { .. }));
    }

    #[test]
    fn test_unindent() {
        assert_eq!(unindent("\t\ta\n\t\t\tb\n"), "a\n\tb");
        assert_eq!(unindent("a\r\nb\r\n"), "a\nb");
        assert_eq!(unindent(""), "");
    }
}
