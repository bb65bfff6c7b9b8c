//! Recognizing the abbreviation that ends at the cursor

use std::sync::LazyLock;

use regex::Regex;

/// An HTML tag ending exactly at the end of the haystack
static TRAILING_TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"</?[\w:\-]+(?:\s+[\w\-:]+(?:\s*=\s*(?:"[^"]*"|'[^']*'|[^>\s]+))?)*\s*/?>$"#,
    )
    .expect("valid tag pattern")
});

fn is_abbreviation_char(c: char) -> bool {
    c.is_alphanumeric()
        || matches!(
            c,
            '#' | '.' | '>' | '+' | '*' | ':' | '$' | '_' | '!' | '@' | '(' | ')' | '^' | '/' | '-'
        )
}

/// Find the abbreviation ending at the end of `line`
///
/// Returns its byte offset in `line` and the abbreviation text, or `None` when
/// nothing that looks like an abbreviation precedes the end.
pub fn extract_abbreviation(line: &str) -> Option<(usize, &str)> {
    let mut start = line.len();
    let mut brackets = 0i32;
    let mut braces = 0i32;

    for (index, c) in line.char_indices().rev() {
        match c {
            ']' if braces == 0 => brackets += 1,
            '[' if braces == 0 => {
                brackets -= 1;
                if brackets < 0 {
                    break;
                }
            }
            '}' if brackets == 0 => braces += 1,
            '{' if brackets == 0 => {
                braces -= 1;
                if braces < 0 {
                    break;
                }
            }
            _ if brackets > 0 || braces > 0 => {}
            '>' if TRAILING_TAG.is_match(&line[..=index]) => break,
            c if is_abbreviation_char(c) => {}
            _ => break,
        }
        start = index;
    }

    if brackets != 0 || braces != 0 {
        return None;
    }

    let abbreviation = &line[start..];
    (!abbreviation.is_empty()).then_some((start, abbreviation))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_whole_line() {
        assert_eq!(extract_abbreviation("ul>li*3"), Some((0, "ul>li*3")));
    }

    #[test]
    fn test_stops_at_whitespace() {
        assert_eq!(
            extract_abbreviation("    some text div.box"),
            Some((14, "div.box"))
        );
    }

    #[test]
    fn test_brackets_and_braces_may_hold_anything() {
        assert_eq!(
            extract_abbreviation("x a[title='hi there']{click me}"),
            Some((2, "a[title='hi there']{click me}"))
        );
    }

    #[test]
    fn test_stops_after_html_tag() {
        assert_eq!(extract_abbreviation("<p>ul>li"), Some((3, "ul>li")));
        assert_eq!(
            extract_abbreviation(r#"<div class="x">p+p"#),
            Some((15, "p+p"))
        );
    }

    #[test]
    fn test_nothing_to_expand() {
        assert_eq!(extract_abbreviation(""), None);
        assert_eq!(extract_abbreviation("text "), None);
        assert_eq!(extract_abbreviation("<p>"), None);
    }

    #[test]
    fn test_unbalanced_bracket_is_no_match() {
        assert_eq!(extract_abbreviation("div]"), None);
    }
}
