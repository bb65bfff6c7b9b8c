//! Output formatting
//!
//! Human output prints the expanded text with the caret shown as `|`; JSON
//! output serializes the result structures for editor integrations.

use colored::*;
use serde::Serialize;
use zen_core::{Expansion, Profile, RenderResult};

use crate::OutputFormat;

/// Marker shown at the caret position in human output
const CARET_MARK: &str = "|";

/// Output formatter for different formats
pub struct OutputFormatter {
    format: OutputFormat,
    use_colors: bool,
}

impl OutputFormatter {
    pub fn new(format: OutputFormat, use_colors: bool) -> Self {
        Self { format, use_colors }
    }

    pub fn print_expansion(&self, expansion: &Expansion) -> anyhow::Result<()> {
        match self.format {
            OutputFormat::Human => {
                println!("{}", self.mark_caret(&expansion.text, expansion.caret));
                Ok(())
            }
            OutputFormat::Json => print_json(expansion),
        }
    }

    pub fn print_render(&self, result: &RenderResult) -> anyhow::Result<()> {
        match self.format {
            OutputFormat::Human => {
                println!("{}", self.mark_caret(&result.text, result.caret));
                Ok(())
            }
            OutputFormat::Json => print_json(result),
        }
    }

    pub fn print_profiles(&self, names: &[String], default: &str) -> anyhow::Result<()> {
        match self.format {
            OutputFormat::Human => {
                println!("{}", "Profiles:".bold());
                for name in names {
                    let builtin = zen_core::BUILTIN_PROFILES.contains(&name.as_str());
                    let mut line = format!("  {name}");
                    if builtin {
                        line.push_str(&format!(" {}", "(built-in)".dimmed()));
                    }
                    if name == default {
                        line.push_str(&format!(" {}", "[default]".green()));
                    }
                    println!("{line}");
                }
                Ok(())
            }
            OutputFormat::Json => print_json(&serde_json::json!({
                "profiles": names,
                "default": default,
            })),
        }
    }

    pub fn print_profile(&self, profile: &Profile) -> anyhow::Result<()> {
        match self.format {
            OutputFormat::Human => {
                println!("{} {}", "Profile:".bold(), profile.name.cyan());
                let rows = [
                    ("tag_case", format!("{:?}", profile.tag_case)),
                    ("attr_case", format!("{:?}", profile.attr_case)),
                    ("attr_quotes", format!("{:?}", profile.attr_quotes)),
                    ("tag_nl", format!("{:?}", profile.tag_nl)),
                    ("place_cursor", profile.place_cursor.to_string()),
                    ("indent", profile.indent.to_string()),
                    ("indentation", format!("{:?}", profile.indentation)),
                    ("inline_break", profile.inline_break.to_string()),
                    (
                        "self_closing_tag",
                        format!("{:?}", profile.self_closing_tag.terminator()),
                    ),
                    ("force_self_closing", profile.force_self_closing.to_string()),
                ];
                for (key, value) in rows {
                    println!("  {key:<20} {value}");
                }
                Ok(())
            }
            OutputFormat::Json => print_json(profile),
        }
    }

    /// Insert the caret marker at its byte offset
    fn mark_caret(&self, text: &str, caret: Option<usize>) -> String {
        let Some(offset) = caret.filter(|&offset| text.is_char_boundary(offset)) else {
            return text.to_string();
        };

        let mark = if self.use_colors {
            CARET_MARK.bright_green().bold().to_string()
        } else {
            CARET_MARK.to_string()
        };
        format!("{}{}{}", &text[..offset], mark, &text[offset..])
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
