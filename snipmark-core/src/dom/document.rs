//! Arena-backed in-memory document.

use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt::Write as _;

use super::find::TextIndex;
use super::{Boundary, ContentDocument, FindOptions, NodeId, ScrollOptions, TextRange, WrapError};

/// Tags that start a new line of rendered text.
const BLOCK_TAGS: &[&str] = &[
    "ADDRESS", "ARTICLE", "ASIDE", "BLOCKQUOTE", "BODY", "DD", "DIV", "DL", "DT", "FIGURE",
    "FOOTER", "H1", "H2", "H3", "H4", "H5", "H6", "HEADER", "HR", "LI", "MAIN", "NAV", "OL", "P",
    "PRE", "SECTION", "TABLE", "TBODY", "TD", "TH", "THEAD", "TR", "UL",
];

/// Tags whose text is never rendered.
const HIDDEN_TAGS: &[&str] = &["SCRIPT", "STYLE", "TEMPLATE", "NOSCRIPT"];

pub fn is_block_tag(tag: &str) -> bool {
    BLOCK_TAGS.contains(&tag)
}

pub(super) fn is_hidden_tag(tag: &str) -> bool {
    HIDDEN_TAGS.contains(&tag)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) enum NodeData {
    Element {
        tag: String,
        style: BTreeMap<String, String>,
    },
    Text(String),
}

#[derive(Debug, Clone)]
struct Node {
    data: NodeData,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// Where the page was last scrolled to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ScrollTarget {
    pub node: NodeId,
    pub options: ScrollOptions,
}

/// A page: a `<body>` tree plus selection, find position and scroll state.
///
/// Nodes are never freed; nodes removed from the tree stay in the arena with no
/// parent and are invisible to traversal.
#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<Node>,
    body: NodeId,
    title: String,
    selection: Option<TextRange>,
    find_cursor: usize,
    scrolled_to: Option<ScrollTarget>,
}

impl Document {
    /// Create an empty document with a `<body>` root.
    pub fn new(title: impl Into<String>) -> Self {
        let mut doc = Self {
            nodes: Vec::new(),
            body: NodeId(0),
            title: title.into(),
            selection: None,
            find_cursor: 0,
            scrolled_to: None,
        };
        doc.body = doc.create_element("body");
        doc
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn body(&self) -> NodeId {
        self.body
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Building
    // ─────────────────────────────────────────────────────────────────────────

    /// Create a detached element.
    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.push(NodeData::Element {
            tag: tag.to_ascii_uppercase(),
            style: BTreeMap::new(),
        })
    }

    /// Create a detached text node.
    pub fn create_text(&mut self, text: &str) -> NodeId {
        self.push(NodeData::Text(text.to_string()))
    }

    /// Move `child` to the end of `parent`'s children.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        self.detach(child);
        self.nodes[parent.index()].children.push(child);
        self.nodes[child.index()].parent = Some(parent);
    }

    pub fn append_element(&mut self, parent: NodeId, tag: &str) -> NodeId {
        let el = self.create_element(tag);
        self.append_child(parent, el);
        el
    }

    pub fn append_text(&mut self, parent: NodeId, text: &str) -> NodeId {
        let node = self.create_text(text);
        self.append_child(parent, node);
        node
    }

    /// Append an element holding a single text node.
    pub fn append_block(&mut self, parent: NodeId, tag: &str, text: &str) -> NodeId {
        let el = self.append_element(parent, tag);
        self.append_text(el, text);
        el
    }

    fn push(&mut self, data: NodeData) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            data,
            parent: None,
            children: Vec::new(),
        });
        id
    }

    fn detach(&mut self, node: NodeId) {
        if let Some(parent) = self.nodes[node.index()].parent.take() {
            self.nodes[parent.index()].children.retain(|c| *c != node);
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Inspection
    // ─────────────────────────────────────────────────────────────────────────

    pub(super) fn data(&self, node: NodeId) -> Option<&NodeData> {
        self.nodes.get(node.index()).map(|n| &n.data)
    }

    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes.get(node.index()).and_then(|n| n.parent)
    }

    pub fn children(&self, node: NodeId) -> &[NodeId] {
        self.nodes
            .get(node.index())
            .map(|n| n.children.as_slice())
            .unwrap_or(&[])
    }

    /// Text of a text node.
    pub fn text(&self, node: NodeId) -> Option<&str> {
        match self.data(node)? {
            NodeData::Text(text) => Some(text),
            NodeData::Element { .. } => None,
        }
    }

    /// Inline style property of an element.
    pub fn style(&self, node: NodeId, property: &str) -> Option<&str> {
        match self.data(node)? {
            NodeData::Element { style, .. } => style.get(property).map(String::as_str),
            NodeData::Text(_) => None,
        }
    }

    /// Whether `node` is still reachable from `<body>`.
    pub fn is_attached(&self, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(id) = current {
            if id == self.body {
                return true;
            }
            current = self.parent(id);
        }
        false
    }

    /// All attached nodes below `root` in document order, `root` included.
    pub fn descendants(&self, root: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            out.push(id);
            stack.extend(self.children(id).iter().rev());
        }
        out
    }

    /// `<mark>` elements currently in the tree.
    pub fn marks(&self) -> Vec<NodeId> {
        self.descendants(self.body)
            .into_iter()
            .filter(|id| self.tag_name(*id) == Some("MARK"))
            .collect()
    }

    /// Elements carrying a highlight background, marks and blocks alike.
    pub fn highlighted(&self) -> Vec<NodeId> {
        self.descendants(self.body)
            .into_iter()
            .filter(|id| self.style(*id, "background-color").is_some())
            .collect()
    }

    /// Concatenated text below `node`, unnormalised.
    pub fn text_content(&self, node: NodeId) -> String {
        self.descendants(node)
            .into_iter()
            .filter_map(|id| self.text(id))
            .collect()
    }

    /// Rendered text: whitespace collapsed, one line per block.
    pub fn inner_text(&self) -> String {
        let mut raw = String::new();
        self.collect_inner_text(self.body, &mut raw);
        raw.lines()
            .map(|line| line.split_whitespace().collect::<Vec<_>>().join(" "))
            .filter(|line| !line.is_empty())
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn collect_inner_text(&self, node: NodeId, out: &mut String) {
        match self.data(node) {
            Some(NodeData::Text(text)) => {
                out.extend(text.chars().map(|c| if c.is_whitespace() { ' ' } else { c }));
            }
            Some(NodeData::Element { tag, .. }) => {
                if is_hidden_tag(tag) {
                    return;
                }
                let block = is_block_tag(tag);
                if block {
                    out.push('\n');
                }
                for child in self.children(node) {
                    self.collect_inner_text(*child, out);
                }
                if block {
                    out.push('\n');
                }
            }
            None => {}
        }
    }

    /// Last element scrolled into view.
    pub fn scrolled_to(&self) -> Option<ScrollTarget> {
        self.scrolled_to
    }

    /// Deterministic serialisation of the tree, one node per line.
    ///
    /// Two documents with equal snapshots are structurally equal; selection and
    /// scroll state are not part of it.
    pub fn snapshot(&self) -> String {
        let mut out = String::new();
        self.write_snapshot(self.body, 0, &mut out);
        out
    }

    fn write_snapshot(&self, node: NodeId, depth: usize, out: &mut String) {
        let indent = "  ".repeat(depth);
        match self.data(node) {
            Some(NodeData::Text(text)) => {
                let _ = writeln!(out, "{indent}{text:?}");
            }
            Some(NodeData::Element { tag, style }) => {
                let tag = tag.to_ascii_lowercase();
                if style.is_empty() {
                    let _ = writeln!(out, "{indent}<{tag}>");
                } else {
                    let decls: Vec<String> =
                        style.iter().map(|(k, v)| format!("{k}: {v}")).collect();
                    let _ = writeln!(out, "{indent}<{tag} style=\"{}\">", decls.join("; "));
                }
                for child in self.children(node) {
                    self.write_snapshot(*child, depth + 1, out);
                }
            }
            None => {}
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Range Helpers
    // ─────────────────────────────────────────────────────────────────────────

    fn text_at(&self, boundary: Boundary) -> Result<&str, WrapError> {
        let text = self.text(boundary.node).ok_or(WrapError::InvalidRange)?;
        if boundary.offset > text.len() || !text.is_char_boundary(boundary.offset) {
            return Err(WrapError::InvalidRange);
        }
        Ok(text)
    }

    fn set_text(&mut self, node: NodeId, value: String) {
        if let Some(n) = self.nodes.get_mut(node.index()) {
            n.data = NodeData::Text(value);
        }
    }

    fn child_index(&self, parent: NodeId, child: NodeId) -> Option<usize> {
        self.children(parent).iter().position(|c| *c == child)
    }

    /// Replace `parent.children[range]` with `replacement`, fixing parent links.
    fn splice_children(
        &mut self,
        parent: NodeId,
        range: std::ops::RangeInclusive<usize>,
        replacement: Vec<NodeId>,
    ) {
        let removed: Vec<NodeId> = self.nodes[parent.index()]
            .children
            .splice(range, replacement.iter().copied())
            .collect();
        for node in removed {
            self.nodes[node.index()].parent = None;
        }
        for node in replacement {
            self.nodes[node.index()].parent = Some(parent);
        }
    }
}

impl ContentDocument for Document {
    fn find(&mut self, phrase: &str, options: FindOptions) -> Option<TextRange> {
        let index = TextIndex::build(self, options.case_sensitive);
        let (range, next) = index.search(phrase, self.find_cursor, options.wrap_around)?;
        self.selection = Some(range);
        self.find_cursor = next;
        Some(range)
    }

    fn selection(&self) -> Option<TextRange> {
        self.selection
    }

    fn clear_selection(&mut self) {
        self.selection = None;
    }

    fn surround_contents(&mut self, range: &TextRange, tag: &str) -> Result<NodeId, WrapError> {
        let start_text = self.text_at(range.start)?.to_string();
        let end_text = self.text_at(range.end)?.to_string();
        let parent = self.parent(range.start.node).ok_or(WrapError::InvalidRange)?;
        if self.parent(range.end.node) != Some(parent) {
            return Err(WrapError::PartialElement);
        }

        let start_pos = self
            .child_index(parent, range.start.node)
            .ok_or(WrapError::InvalidRange)?;
        let end_pos = self
            .child_index(parent, range.end.node)
            .ok_or(WrapError::InvalidRange)?;

        if range.start.node == range.end.node {
            if range.start.offset > range.end.offset {
                return Err(WrapError::InvalidRange);
            }
            let mark = self.create_element(tag);
            let before = &start_text[..range.start.offset];
            let inner = &start_text[range.start.offset..range.end.offset];
            let after = &start_text[range.end.offset..];

            let inner_node = self.create_text(inner);
            self.append_child(mark, inner_node);

            let mut replacement = Vec::with_capacity(3);
            if !before.is_empty() {
                self.set_text(range.start.node, before.to_string());
                replacement.push(range.start.node);
            }
            replacement.push(mark);
            if !after.is_empty() {
                replacement.push(self.create_text(after));
            }
            self.splice_children(parent, start_pos..=start_pos, replacement);
            self.selection = None;
            Ok(mark)
        } else {
            if start_pos >= end_pos {
                return Err(WrapError::InvalidRange);
            }
            let mark = self.create_element(tag);
            let before = &start_text[..range.start.offset];
            let head = &start_text[range.start.offset..];
            let tail = &end_text[..range.end.offset];
            let after = &end_text[range.end.offset..];

            let middle: Vec<NodeId> = self.children(parent)[start_pos + 1..end_pos].to_vec();
            if !head.is_empty() {
                let node = self.create_text(head);
                self.append_child(mark, node);
            }
            for node in middle {
                self.append_child(mark, node);
            }
            if !tail.is_empty() {
                let node = self.create_text(tail);
                self.append_child(mark, node);
            }

            // Positions shifted: the middle children now live under the mark.
            let end_pos = start_pos + 1;
            let mut replacement = Vec::with_capacity(3);
            if !before.is_empty() {
                self.set_text(range.start.node, before.to_string());
                replacement.push(range.start.node);
            }
            replacement.push(mark);
            if !after.is_empty() {
                self.set_text(range.end.node, after.to_string());
                replacement.push(range.end.node);
            }
            self.splice_children(parent, start_pos..=end_pos, replacement);
            self.selection = None;
            Ok(mark)
        }
    }

    fn parent_element(&self, node: NodeId) -> Option<NodeId> {
        self.parent(node)
    }

    fn tag_name(&self, node: NodeId) -> Option<&str> {
        match self.data(node)? {
            NodeData::Element { tag, .. } => Some(tag),
            NodeData::Text(_) => None,
        }
    }

    fn set_style(&mut self, node: NodeId, property: &str, value: &str) {
        if let Some(Node {
            data: NodeData::Element { style, .. },
            ..
        }) = self.nodes.get_mut(node.index())
        {
            style.insert(property.to_string(), value.to_string());
        }
    }

    fn scroll_into_view(&mut self, node: NodeId, options: ScrollOptions) {
        self.scrolled_to = Some(ScrollTarget { node, options });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> (Document, NodeId) {
        let mut doc = Document::new("Sample");
        let body = doc.body();
        doc.append_block(body, "h1", "A Title");
        let p = doc.append_element(body, "p");
        doc.append_text(p, "The quick ");
        let b = doc.append_element(p, "b");
        doc.append_text(b, "brown");
        doc.append_text(p, " fox jumps.");
        (doc, p)
    }

    #[test]
    fn test_tags_are_uppercase() {
        let (doc, p) = sample();
        assert_eq!(doc.tag_name(p), Some("P"));
        assert_eq!(doc.tag_name(doc.body()), Some("BODY"));
    }

    #[test]
    fn test_inner_text_one_line_per_block() {
        let (doc, _) = sample();
        assert_eq!(doc.inner_text(), "A Title\nThe quick brown fox jumps.");
    }

    #[test]
    fn test_snapshot_format() {
        let mut doc = Document::new("t");
        let p = doc.append_block(doc.body(), "p", "hi");
        doc.set_style(p, "padding", "4px");
        assert_eq!(
            doc.snapshot(),
            "<body>\n  <p style=\"padding: 4px\">\n    \"hi\"\n"
        );
    }

    #[test]
    fn test_surround_within_one_text_node() {
        let mut doc = Document::new("t");
        let p = doc.append_block(doc.body(), "p", "hello big world");
        let text = doc.children(p)[0];
        let range = TextRange {
            start: Boundary { node: text, offset: 6 },
            end: Boundary { node: text, offset: 9 },
        };

        let mark = doc.surround_contents(&range, "mark").unwrap();
        assert_eq!(doc.text_content(mark), "big");
        assert_eq!(doc.text_content(p), "hello big world");
        assert_eq!(doc.children(p).len(), 3);
        assert_eq!(doc.parent(mark), Some(p));
    }

    #[test]
    fn test_surround_whole_text_node_leaves_no_empty_siblings() {
        let mut doc = Document::new("t");
        let p = doc.append_block(doc.body(), "p", "whole");
        let text = doc.children(p)[0];
        let range = TextRange {
            start: Boundary { node: text, offset: 0 },
            end: Boundary { node: text, offset: 5 },
        };

        let mark = doc.surround_contents(&range, "mark").unwrap();
        assert_eq!(doc.children(p), &[mark]);
        assert!(!doc.is_attached(text));
    }

    #[test]
    fn test_surround_across_siblings_moves_inline_element() {
        let (mut doc, p) = sample();
        let first = doc.children(p)[0];
        let last = doc.children(p)[2];
        let range = TextRange {
            start: Boundary { node: first, offset: 4 },
            end: Boundary { node: last, offset: 4 },
        };

        let mark = doc.surround_contents(&range, "mark").unwrap();
        assert_eq!(doc.text_content(mark), "quick brown fox");
        assert_eq!(doc.text_content(p), "The quick brown fox jumps.");
        assert_eq!(doc.children(p).len(), 3);
        let b = doc.children(mark)[1];
        assert_eq!(doc.tag_name(b), Some("B"));
        assert_eq!(doc.parent(b), Some(mark));
    }

    #[test]
    fn test_surround_partial_element_fails_and_leaves_tree() {
        let (mut doc, p) = sample();
        let b = doc.children(p)[1];
        let inside_b = doc.children(b)[0];
        let last = doc.children(p)[2];
        let before = doc.snapshot();

        let range = TextRange {
            start: Boundary { node: inside_b, offset: 1 },
            end: Boundary { node: last, offset: 4 },
        };
        assert_eq!(
            doc.surround_contents(&range, "mark"),
            Err(WrapError::PartialElement)
        );
        assert_eq!(doc.snapshot(), before);
    }

    #[test]
    fn test_surround_rejects_bad_offsets() {
        let mut doc = Document::new("t");
        let p = doc.append_block(doc.body(), "p", "née");
        let text = doc.children(p)[0];
        let range = TextRange {
            start: Boundary { node: text, offset: 2 },
            end: Boundary { node: text, offset: 4 },
        };
        assert_eq!(
            doc.surround_contents(&range, "mark"),
            Err(WrapError::InvalidRange)
        );
    }

    #[test]
    fn test_append_child_reparents() {
        let mut doc = Document::new("t");
        let a = doc.append_element(doc.body(), "div");
        let b = doc.append_element(doc.body(), "div");
        let t = doc.append_text(a, "x");
        doc.append_child(b, t);
        assert!(doc.children(a).is_empty());
        assert_eq!(doc.children(b), &[t]);
    }

    #[test]
    fn test_hidden_text_not_rendered() {
        let mut doc = Document::new("t");
        doc.append_block(doc.body(), "script", "var x = 1;");
        doc.append_block(doc.body(), "p", "shown");
        assert_eq!(doc.inner_text(), "shown");
    }
}
