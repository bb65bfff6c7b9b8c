//! Tree builder
//!
//! Building happens in two passes. The first pass walks the token stream and
//! lays out a draft arena: one draft per written element, text literal or
//! group, each carrying its multiplier. The second pass checks the expanded
//! size against the node ceiling and then materialises the drafts into a
//! [`Node`] tree, cloning multiplied subtrees into numbered siblings.

use indexmap::IndexMap;
use tracing::debug;

use crate::Result;
use crate::elements;
use crate::error::{BuildErrorKind, ParseErrorKind, ZenError};
use crate::lexer::{OperatorKind, ShorthandKind, Token, TokenKind};
use crate::tree::{Node, Repetition};

/// Default ceiling on the number of nodes a single abbreviation may expand to
pub const DEFAULT_MAX_NODES: usize = 10_000;

/// Default ceiling on element and group nesting
pub const DEFAULT_MAX_DEPTH: usize = 256;

/// Ceilings checked while building a tree
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    pub max_nodes: usize,
    /// Deepest allowed chain of nested elements and groups
    pub max_depth: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_nodes: DEFAULT_MAX_NODES,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

type DraftId = usize;

const ROOT: DraftId = 0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DraftKind {
    Root,
    Element,
    Text,
    Group,
}

#[derive(Debug)]
struct Draft {
    kind: DraftKind,
    name: String,
    attributes: IndexMap<String, String>,
    text: Option<String>,
    count: usize,
    multiplied: bool,
    self_close: bool,
    parent: Option<DraftId>,
    depth: usize,
    children: Vec<DraftId>,
}

impl Draft {
    fn new(kind: DraftKind, parent: Option<DraftId>, depth: usize) -> Self {
        Self {
            kind,
            name: String::new(),
            attributes: IndexMap::new(),
            text: None,
            count: 1,
            multiplied: false,
            self_close: false,
            parent,
            depth,
            children: Vec::new(),
        }
    }
}

/// Build a tree with the default limits
pub fn build(tokens: &[Token]) -> Result<Node> {
    build_with_limits(tokens, Limits::default())
}

/// Build a tree within `limits`
///
/// Nesting deeper than `max_depth` fails with
/// [`BuildErrorKind::NestingTooDeep`] as soon as it is seen; more than
/// `max_nodes` expanded nodes fails with [`ZenError::ExpansionTooLarge`]
/// before anything is cloned.
pub fn build_with_limits(tokens: &[Token], limits: Limits) -> Result<Node> {
    let mut builder = TreeBuilder::new(limits.max_depth);
    let mut pos = 0;
    builder.parse_sequence(tokens, &mut pos, ROOT)?;

    let nodes = builder.expanded_size(ROOT);
    if nodes > limits.max_nodes {
        return Err(ZenError::ExpansionTooLarge {
            nodes,
            limit: limits.max_nodes,
        });
    }

    debug!(
        drafts = builder.drafts.len(),
        nodes, "Expanding abbreviation tree"
    );

    let mut root = Node::root();
    for &child in &builder.drafts[ROOT].children {
        root.children.extend(builder.materialize(child));
    }
    Ok(root)
}

/// Operator waiting for its right-hand operand
#[derive(Debug, Clone, Copy)]
struct Pending {
    op: OperatorKind,
    offset: usize,
}

struct TreeBuilder {
    drafts: Vec<Draft>,
    max_depth: usize,
}

impl TreeBuilder {
    fn new(max_depth: usize) -> Self {
        Self {
            drafts: vec![Draft::new(DraftKind::Root, None, 0)],
            max_depth,
        }
    }

    fn add(&mut self, kind: DraftKind, parent: DraftId, offset: usize) -> Result<DraftId> {
        // Every later pass recurses once per level
        let depth = self.drafts[parent].depth + 1;
        if depth > self.max_depth {
            return Err(ZenError::build_error(
                BuildErrorKind::NestingTooDeep,
                offset,
            ));
        }

        let id = self.drafts.len();
        self.drafts.push(Draft::new(kind, Some(parent), depth));
        self.drafts[parent].children.push(id);
        Ok(id)
    }

    fn add_element(
        &mut self,
        name: Option<&str>,
        parent: DraftId,
        offset: usize,
    ) -> Result<DraftId> {
        let name = match name {
            Some(name) => name.to_string(),
            None => elements::implicit_tag(self.nearest_element_name(parent)).to_string(),
        };
        let id = self.add(DraftKind::Element, parent, offset)?;
        self.drafts[id].name = name;
        Ok(id)
    }

    fn nearest_element_name(&self, mut id: DraftId) -> Option<&str> {
        loop {
            let draft = &self.drafts[id];
            match draft.kind {
                DraftKind::Element => return Some(&draft.name),
                DraftKind::Root => return None,
                _ => id = draft.parent?,
            }
        }
    }

    /// Where `>` after `id` descends to
    fn descent_target(&self, id: DraftId) -> Option<DraftId> {
        let draft = &self.drafts[id];
        match draft.kind {
            DraftKind::Element => Some(id),
            DraftKind::Group => draft
                .children
                .iter()
                .rev()
                .find(|&&child| self.drafts[child].kind == DraftKind::Element)
                .copied(),
            _ => None,
        }
    }

    /// Parse tokens into drafts under `container` until end of input or `)`
    fn parse_sequence(
        &mut self,
        tokens: &[Token],
        pos: &mut usize,
        container: DraftId,
    ) -> Result<()> {
        let mut parent = container;
        let mut ancestors: Vec<DraftId> = Vec::new();
        let mut last: Option<DraftId> = None;
        // Element or text still accepting modifiers (no operator seen since)
        let mut open: Option<DraftId> = None;
        let mut pending: Option<Pending> = None;

        while let Some(token) = tokens.get(*pos) {
            let offset = token.span.start;

            match &token.kind {
                TokenKind::Operator(OperatorKind::GroupClose) => break,
                TokenKind::Operator(OperatorKind::GroupOpen) => {
                    *pos += 1;
                    let group = self.add(DraftKind::Group, parent, offset)?;
                    self.parse_sequence(tokens, pos, group)?;
                    // The tokenizer guarantees the matching `)`
                    *pos += 1;
                    if let Some(Token {
                        kind: TokenKind::Multiplier(count),
                        ..
                    }) = tokens.get(*pos)
                    {
                        self.drafts[group].count = *count;
                        self.drafts[group].multiplied = true;
                        *pos += 1;
                    }
                    last = Some(group);
                    open = None;
                    pending = None;
                    continue;
                }
                TokenKind::Operator(op) => {
                    if let Some(previous) = pending
                        && previous.op != OperatorKind::ClimbUp
                    {
                        return Err(ZenError::build_error(
                            BuildErrorKind::DanglingOperator,
                            previous.offset,
                        ));
                    }
                    if pending.is_some() && *op != OperatorKind::ClimbUp {
                        return Err(ZenError::build_error(
                            BuildErrorKind::DanglingOperator,
                            offset,
                        ));
                    }

                    match op {
                        OperatorKind::Child => {
                            if let Some(target) = last.and_then(|id| self.descent_target(id)) {
                                ancestors.push(parent);
                                parent = target;
                            }
                        }
                        OperatorKind::Sibling => {}
                        OperatorKind::ClimbUp => {
                            // Climbing above the sequence root pins there
                            if let Some(up) = ancestors.pop() {
                                parent = up;
                            }
                        }
                        OperatorKind::GroupOpen | OperatorKind::GroupClose => unreachable!(),
                    }

                    open = None;
                    if last.is_some() {
                        pending = Some(Pending { op: *op, offset });
                    }
                }
                TokenKind::Element(name) => {
                    let id = self.add_element(Some(name), parent, offset)?;
                    last = Some(id);
                    open = Some(id);
                    pending = None;
                }
                TokenKind::IdClass(..) | TokenKind::Attribute(..) => {
                    let id = match open.filter(|&id| self.drafts[id].kind == DraftKind::Element) {
                        Some(id) => id,
                        None => {
                            let id = self.add_element(None, parent, offset)?;
                            last = Some(id);
                            open = Some(id);
                            pending = None;
                            id
                        }
                    };
                    self.apply_modifier(id, &token.kind);
                }
                TokenKind::Multiplier(count) => {
                    let Some(id) = open else {
                        return Err(ZenError::parse_error(
                            ParseErrorKind::UnexpectedCharacter('*'),
                            offset,
                        ));
                    };
                    self.drafts[id].count = *count;
                    self.drafts[id].multiplied = true;
                }
                TokenKind::Text(text) => match open {
                    Some(id) if self.drafts[id].kind == DraftKind::Element => {
                        self.drafts[id]
                            .text
                            .get_or_insert_with(String::new)
                            .push_str(text);
                    }
                    _ => {
                        let id = self.add(DraftKind::Text, parent, offset)?;
                        self.drafts[id].text = Some(text.clone());
                        last = Some(id);
                        open = Some(id);
                        pending = None;
                    }
                },
                TokenKind::SelfClose => match open {
                    Some(id) if self.drafts[id].kind == DraftKind::Element => {
                        self.drafts[id].self_close = true;
                    }
                    _ => {
                        return Err(ZenError::parse_error(
                            ParseErrorKind::UnexpectedCharacter('/'),
                            offset,
                        ));
                    }
                },
            }

            *pos += 1;
        }

        if let Some(pending) = pending
            && pending.op != OperatorKind::ClimbUp
        {
            return Err(ZenError::build_error(
                BuildErrorKind::DanglingOperator,
                pending.offset,
            ));
        }

        Ok(())
    }

    fn apply_modifier(&mut self, id: DraftId, kind: &TokenKind) {
        let attributes = &mut self.drafts[id].attributes;
        match kind {
            TokenKind::IdClass(ShorthandKind::Id, value) => {
                attributes.insert("id".to_string(), value.clone());
            }
            TokenKind::IdClass(ShorthandKind::Class, value) => add_classes(attributes, value),
            TokenKind::Attribute(name, value) if name == "class" => {
                add_classes(attributes, value)
            }
            TokenKind::Attribute(name, value) => {
                attributes.insert(name.clone(), value.clone());
            }
            _ => {}
        }
    }

    /// Node count after multiplier expansion, saturating on overflow
    fn expanded_size(&self, id: DraftId) -> usize {
        let draft = &self.drafts[id];
        let own = match draft.kind {
            DraftKind::Element => 1 + usize::from(draft.text.is_some()),
            DraftKind::Text => 1,
            DraftKind::Root | DraftKind::Group => 0,
        };
        let children = draft
            .children
            .iter()
            .fold(0usize, |acc, &child| acc.saturating_add(self.expanded_size(child)));
        let mut size = own.saturating_add(children);
        // An empty group still costs one step per copy
        if draft.kind == DraftKind::Group {
            size = size.max(1);
        }
        size.saturating_mul(draft.count)
    }

    fn materialize(&self, id: DraftId) -> Vec<Node> {
        let draft = &self.drafts[id];
        let mut copies = Vec::with_capacity(draft.count);

        for index in 0..draft.count {
            let repetition = draft
                .multiplied
                .then(|| Repetition::new(index, draft.count));

            match draft.kind {
                DraftKind::Element => copies.push(self.materialize_element(draft, repetition)),
                DraftKind::Text => {
                    let mut node = Node::text(draft.text.clone().unwrap_or_default());
                    node.repetition = repetition;
                    copies.push(node);
                }
                DraftKind::Group => {
                    for &child in &draft.children {
                        for mut node in self.materialize(child) {
                            if node.repetition.is_none() {
                                node.repetition = repetition;
                            }
                            copies.push(node);
                        }
                    }
                }
                DraftKind::Root => {}
            }
        }

        copies
    }

    fn materialize_element(&self, draft: &Draft, repetition: Option<Repetition>) -> Node {
        let mut node = Node::element(draft.name.clone());
        node.attributes = draft.attributes.clone();
        node.repetition = repetition;

        if let Some(text) = &draft.text
            && !text.is_empty()
        {
            node.children.push(Node::text(text.clone()));
        }
        for &child in &draft.children {
            node.children.extend(self.materialize(child));
        }

        node.self_closing = node.children.is_empty()
            && (draft.self_close || elements::is_void(&draft.name));
        node
    }
}

/// Append space-separated class names, skipping ones already present
fn add_classes(attributes: &mut IndexMap<String, String>, value: &str) {
    let classes = attributes.entry("class".to_string()).or_default();
    for class in value.split_whitespace() {
        if !classes.split_whitespace().any(|existing| existing == class) {
            if !classes.is_empty() {
                classes.push(' ');
            }
            classes.push_str(class);
        }
    }
}

/// Tokenize and build in one step
pub fn parse(abbreviation: &str, limits: Limits) -> Result<Node> {
    let tokens = crate::lexer::tokenize(abbreviation)?;
    build_with_limits(&tokens, limits)
}
