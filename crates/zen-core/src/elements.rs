//! HTML element tables used by the builder and renderer
//!
//! Lookups are ASCII case-insensitive so `BR` and `br` behave the same.

/// Elements that never have content and render as a single tag
pub const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "command", "embed", "hr", "img", "input", "keygen", "link",
    "meta", "param", "source", "track", "wbr",
];

/// Elements laid out inline by the `decide` line-break policy
pub const INLINE_ELEMENTS: &[&str] = &[
    "a", "abbr", "acronym", "applet", "b", "basefont", "bdo", "big", "br", "button", "cite",
    "code", "del", "dfn", "em", "font", "i", "iframe", "img", "input", "ins", "kbd", "label",
    "map", "object", "q", "s", "samp", "select", "small", "span", "strike", "strong", "sub",
    "sup", "textarea", "tt", "u", "var",
];

/// Tag used for `#id` / `.class` / `[attr]` elements written without a name
pub const DEFAULT_IMPLICIT_TAG: &str = "div";

fn contains(table: &[&str], name: &str) -> bool {
    table.iter().any(|entry| entry.eq_ignore_ascii_case(name))
}

pub fn is_void(name: &str) -> bool {
    contains(VOID_ELEMENTS, name)
}

pub fn is_inline(name: &str) -> bool {
    contains(INLINE_ELEMENTS, name)
}

pub fn is_block(name: &str) -> bool {
    !is_inline(name)
}

/// Resolve the tag of a nameless element from its nearest element ancestor
pub fn implicit_tag(parent: Option<&str>) -> &'static str {
    let Some(parent) = parent else {
        return DEFAULT_IMPLICIT_TAG;
    };

    match parent.to_ascii_lowercase().as_str() {
        "ul" | "ol" => "li",
        "table" | "thead" | "tbody" | "tfoot" => "tr",
        "tr" => "td",
        "select" | "optgroup" => "option",
        other if is_inline(other) => "span",
        _ => DEFAULT_IMPLICIT_TAG,
    }
}
