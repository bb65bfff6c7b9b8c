//! Output profiles
//!
//! A profile is the set of formatting options the renderer follows: letter
//! case, quoting, line breaks, indentation and self-closing style. Four
//! profiles are built in; more can be loaded from files and kept in a
//! [`ProfileRegistry`].

mod loader;
mod registry;

pub use loader::{ProfileDefinition, ProfileFile, load_profile_file, load_profiles_dir};
pub use registry::ProfileRegistry;

use serde::{Deserialize, Serialize};

/// Names of the built-in profiles, in listing order
pub const BUILTIN_PROFILES: &[&str] = &["plain", "html", "xhtml", "xml"];

/// Letter case applied to tag or attribute names
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Case {
    #[default]
    Lower,
    Upper,
    /// Keep the case written in the abbreviation
    #[serde(alias = "leave", alias = "as-is")]
    AsIs,
}

impl Case {
    pub fn apply(self, name: &str) -> String {
        match self {
            Case::Lower => name.to_lowercase(),
            Case::Upper => name.to_uppercase(),
            Case::AsIs => name.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuoteStyle {
    Single,
    #[default]
    Double,
}

impl QuoteStyle {
    pub fn as_char(self) -> char {
        match self {
            QuoteStyle::Single => '\'',
            QuoteStyle::Double => '"',
        }
    }
}

/// When children of an element go on their own lines
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineBreaks {
    Always,
    Never,
    /// Break around block children, or when inline children pile up
    #[default]
    Decide,
}

/// How empty self-closing elements end
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SelfClosingStyle {
    /// `<br>`
    Html,
    /// `<br/>`
    Xml,
    /// `<br />`
    #[default]
    Xhtml,
}

impl SelfClosingStyle {
    pub fn terminator(self) -> &'static str {
        match self {
            SelfClosingStyle::Html => ">",
            SelfClosingStyle::Xml => "/>",
            SelfClosingStyle::Xhtml => " />",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub name: String,
    pub tag_case: Case,
    pub attr_case: Case,
    pub attr_quotes: QuoteStyle,
    pub tag_nl: LineBreaks,
    /// Emit caret placeholders for empty elements and attribute values
    pub place_cursor: bool,
    /// Indent nested lines
    pub indent: bool,
    /// One level of indentation
    pub indentation: String,
    /// Inline siblings at which `decide` starts breaking lines (0 disables)
    pub inline_break: usize,
    pub self_closing_tag: SelfClosingStyle,
    /// Close every childless element as self-closing
    pub force_self_closing: bool,
}

impl Default for Profile {
    fn default() -> Self {
        Self::xhtml()
    }
}

impl Profile {
    pub fn xhtml() -> Self {
        Self {
            name: "xhtml".to_string(),
            tag_case: Case::Lower,
            attr_case: Case::Lower,
            attr_quotes: QuoteStyle::Double,
            tag_nl: LineBreaks::Decide,
            place_cursor: true,
            indent: true,
            indentation: "\t".to_string(),
            inline_break: 3,
            self_closing_tag: SelfClosingStyle::Xhtml,
            force_self_closing: false,
        }
    }

    pub fn html() -> Self {
        Self {
            name: "html".to_string(),
            self_closing_tag: SelfClosingStyle::Html,
            ..Self::xhtml()
        }
    }

    pub fn xml() -> Self {
        Self {
            name: "xml".to_string(),
            tag_nl: LineBreaks::Always,
            self_closing_tag: SelfClosingStyle::Xml,
            ..Self::xhtml()
        }
    }

    pub fn plain() -> Self {
        Self {
            name: "plain".to_string(),
            tag_nl: LineBreaks::Never,
            place_cursor: false,
            indent: false,
            ..Self::xhtml()
        }
    }

    /// Built-in profile by name
    pub fn builtin(name: &str) -> Option<Self> {
        match name {
            "plain" => Some(Self::plain()),
            "html" => Some(Self::html()),
            "xhtml" => Some(Self::xhtml()),
            "xml" => Some(Self::xml()),
            _ => None,
        }
    }

    /// Indentation for one nesting level, empty when indenting is off
    pub fn indent_unit(&self) -> &str {
        if self.indent { &self.indentation } else { "" }
    }
}
