//! `$` numbering
//!
//! A run of `$` is replaced by the repetition number, zero-padded to the run
//! length. The run may be followed by `@N` to change the base, `@-` to count
//! down, or `@-N` for both. `\$` produces a literal dollar and `${` is never a
//! counter so range markers survive until caret resolution.

use std::borrow::Cow;

use crate::tree::Repetition;

/// Substitute numbering markers in `input` for the given repetition
pub fn substitute(input: &str, repetition: Repetition) -> Cow<'_, str> {
    if !input.contains('$') {
        return Cow::Borrowed(input);
    }

    let bytes = input.as_bytes();
    let mut output = String::with_capacity(input.len() + 4);
    let mut copied = 0;
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'\\' if bytes.get(i + 1) == Some(&b'$') => {
                output.push_str(&input[copied..i]);
                output.push('$');
                i += 2;
                copied = i;
            }
            b'$' if bytes.get(i + 1) == Some(&b'{') => {
                i += 2;
            }
            b'$' => {
                output.push_str(&input[copied..i]);
                let run_start = i;
                while bytes.get(i) == Some(&b'$') {
                    i += 1;
                }
                let width = i - run_start;

                let mut base = Some(1usize);
                let mut reverse = false;
                if bytes.get(i) == Some(&b'@') {
                    let mut j = i + 1;
                    if bytes.get(j) == Some(&b'-') {
                        reverse = true;
                        j += 1;
                    }
                    let digits = bytes[j..].iter().take_while(|b| b.is_ascii_digit()).count();
                    if digits > 0 {
                        base = input[j..j + digits].parse().ok();
                    }
                    if reverse || digits > 0 {
                        i = j + digits;
                    }
                }

                let step = if reverse {
                    repetition
                        .count
                        .saturating_sub(repetition.index)
                        .saturating_sub(1)
                } else {
                    repetition.index
                };
                // A number that does not fit is left as written
                match base.and_then(|base| step.checked_add(base)) {
                    Some(number) => output.push_str(&format!("{number:0width$}")),
                    None => output.push_str(&input[run_start..i]),
                }
                copied = i;
            }
            _ => i += 1,
        }
    }

    output.push_str(&input[copied..]);
    Cow::Owned(output)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nth(input: &str, index: usize, count: usize) -> String {
        substitute(input, Repetition::new(index, count)).into_owned()
    }

    #[test]
    fn test_plain_counter() {
        assert_eq!(nth("item$", 0, 3), "item1");
        assert_eq!(nth("item$", 2, 3), "item3");
        assert_eq!(nth("$-$", 1, 2), "2-2");
    }

    #[test]
    fn test_padding() {
        assert_eq!(nth("i$$$", 4, 10), "i005");
        assert_eq!(nth("$$", 11, 12), "12");
    }

    #[test]
    fn test_base_and_reverse() {
        assert_eq!(nth("$@3", 0, 5), "3");
        assert_eq!(nth("$@-", 0, 5), "5");
        assert_eq!(nth("$@-", 4, 5), "1");
        assert_eq!(nth("$@-10", 0, 3), "12");
        assert_eq!(nth("$$@0", 0, 3), "00");
    }

    #[test]
    fn test_base_overflow_is_left_literal() {
        let marker = format!("$@{}", usize::MAX);
        assert_eq!(nth(&marker, 0, 2), usize::MAX.to_string());
        assert_eq!(nth(&marker, 1, 2), marker);
        assert_eq!(nth("$@-99999999999999999999999", 0, 2), "$@-99999999999999999999999");
    }

    #[test]
    fn test_at_without_modifier_is_literal() {
        assert_eq!(nth("$@x", 0, 1), "1@x");
    }

    #[test]
    fn test_escaped_dollar_and_range_marker() {
        assert_eq!(nth(r"\$$", 1, 2), "$2");
        assert_eq!(nth("${1:name}$", 0, 1), "${1:name}1");
    }

    #[test]
    fn test_default_repetition() {
        assert_eq!(nth("x$", 0, 1), "x1");
        assert!(matches!(
            substitute("plain", Repetition::default()),
            Cow::Borrowed("plain")
        ));
    }
}
