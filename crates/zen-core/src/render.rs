//! Profile renderer
//!
//! Serializes an expanded tree depth-first. Each container decides once
//! whether its children go on separate lines; when they do, every child
//! starts on a new line indented one level deeper than the container and the
//! closing tag returns to the container's level.

use crate::caret::CARET_PLACEHOLDER;
use crate::elements;
use crate::numbering::substitute;
use crate::profile::{LineBreaks, Profile};
use crate::tree::{Node, NodeKind, Repetition};

#[derive(Debug, Clone, Copy)]
pub(crate) struct RenderOptions {
    /// Put a caret placeholder into empty elements and attribute values
    pub empty_caret: bool,
}

/// Render a tree with the given profile
///
/// The output still contains caret placeholders and `${a:b}` ranges; see
/// [`crate::caret::resolve_caret`].
pub fn render(tree: &Node, profile: &Profile) -> String {
    render_with(
        tree,
        profile,
        RenderOptions {
            empty_caret: profile.place_cursor,
        },
    )
}

pub(crate) fn render_with(tree: &Node, profile: &Profile, options: RenderOptions) -> String {
    let renderer = Renderer {
        profile,
        empty_caret: options.empty_caret && profile.place_cursor,
    };
    let mut out = String::new();

    match tree.kind {
        NodeKind::Root => renderer.render_top_level(&mut out, &tree.children),
        _ => renderer.render_node(&mut out, tree, 0, Repetition::default(), false),
    }

    out
}

struct Renderer<'a> {
    profile: &'a Profile,
    empty_caret: bool,
}

impl Renderer<'_> {
    fn render_top_level(&self, out: &mut String, children: &[Node]) {
        let broken = self.breaks_lines(children);
        let mut first = true;
        for child in children {
            if broken && !first && child.kind != NodeKind::Caret {
                out.push('\n');
            }
            self.render_node(out, child, 0, Repetition::default(), broken);
            first = false;
        }
    }

    fn render_node(
        &self,
        out: &mut String,
        node: &Node,
        depth: usize,
        inherited: Repetition,
        broken: bool,
    ) {
        let repetition = node.repetition.unwrap_or(inherited);

        match &node.kind {
            NodeKind::Element(name) => self.render_element(out, node, name, depth, repetition),
            NodeKind::Text(text) => {
                self.push_text(out, &substitute(text, repetition), depth, broken)
            }
            NodeKind::Verbatim(text) => self.push_text(out, text, depth, broken),
            NodeKind::Caret => {
                if self.profile.place_cursor {
                    out.push_str(CARET_PLACEHOLDER);
                }
            }
            NodeKind::Root => {
                for child in &node.children {
                    self.render_node(out, child, depth, repetition, broken);
                }
            }
        }
    }

    fn render_element(
        &self,
        out: &mut String,
        node: &Node,
        name: &str,
        depth: usize,
        repetition: Repetition,
    ) {
        let tag = self.profile.tag_case.apply(&substitute(name, repetition));
        let quote = self.profile.attr_quotes.as_char();

        out.push('<');
        out.push_str(&tag);
        for (key, value) in &node.attributes {
            out.push(' ');
            out.push_str(&self.profile.attr_case.apply(&substitute(key, repetition)));
            out.push('=');
            out.push(quote);
            if value.is_empty() {
                if self.empty_caret {
                    out.push_str(CARET_PLACEHOLDER);
                }
            } else {
                out.push_str(&substitute(value, repetition));
            }
            out.push(quote);
        }

        if node.children.is_empty() && (node.self_closing || self.profile.force_self_closing) {
            out.push_str(self.profile.self_closing_tag.terminator());
            return;
        }
        out.push('>');

        if node.children.is_empty() {
            if self.empty_caret {
                out.push_str(CARET_PLACEHOLDER);
            }
        } else {
            let broken = self.breaks_lines(&node.children);
            for child in &node.children {
                if broken && child.kind != NodeKind::Caret {
                    self.newline(out, depth + 1);
                }
                self.render_node(out, child, depth + 1, repetition, broken);
            }
            if broken {
                self.newline(out, depth);
            }
        }

        out.push_str("</");
        out.push_str(&tag);
        out.push('>');
    }

    fn push_text(&self, out: &mut String, text: &str, depth: usize, broken: bool) {
        if !broken || !text.contains('\n') {
            out.push_str(text);
            return;
        }

        for (index, line) in text.split('\n').enumerate() {
            if index > 0 {
                if line.is_empty() {
                    out.push('\n');
                } else {
                    self.newline(out, depth);
                }
            }
            out.push_str(line);
        }
    }

    fn newline(&self, out: &mut String, depth: usize) {
        out.push('\n');
        let unit = self.profile.indent_unit();
        for _ in 0..depth {
            out.push_str(unit);
        }
    }

    /// Whether `children` are laid out one per line
    fn breaks_lines(&self, children: &[Node]) -> bool {
        let multiline_text = || {
            children.iter().any(|child| {
                matches!(&child.kind, NodeKind::Text(text) | NodeKind::Verbatim(text) if text.contains('\n'))
            })
        };

        match self.profile.tag_nl {
            LineBreaks::Never => false,
            LineBreaks::Always => children.iter().any(Node::is_element) || multiline_text(),
            LineBreaks::Decide => {
                let mut inline = 0;
                for name in children.iter().filter_map(Node::name) {
                    if elements::is_block(name) {
                        return true;
                    }
                    inline += 1;
                }
                multiline_text()
                    || (self.profile.inline_break > 0 && inline >= self.profile.inline_break)
            }
        }
    }
}
