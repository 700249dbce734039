//! Find-and-select over rendered text.
//!
//! Text nodes are flattened in document order into one character stream with
//! whitespace runs collapsed to a single space and a virtual space at every
//! block boundary. Each real character remembers the text node and byte range
//! it came from so a match maps straight back to a [`TextRange`].

use super::document::{is_block_tag, is_hidden_tag, Document, NodeData};
use super::{Boundary, NodeId, TextRange};

#[derive(Debug, Clone, Copy)]
struct Origin {
    node: NodeId,
    offset: usize,
    len: usize,
}

#[derive(Debug, Clone, Copy)]
struct IndexedChar {
    ch: char,
    origin: Option<Origin>,
}

/// Flattened, searchable view of a document's text.
pub(super) struct TextIndex {
    chars: Vec<IndexedChar>,
    case_sensitive: bool,
}

impl TextIndex {
    pub(super) fn build(doc: &Document, case_sensitive: bool) -> Self {
        let mut index = Self {
            chars: Vec::new(),
            case_sensitive,
        };
        let mut pending_space = false;
        index.walk(doc, doc.body(), &mut pending_space);
        index
    }

    fn walk(&mut self, doc: &Document, node: NodeId, pending_space: &mut bool) {
        match doc.data(node) {
            Some(NodeData::Text(text)) => {
                for (offset, ch) in text.char_indices() {
                    if ch.is_whitespace() {
                        *pending_space = true;
                        continue;
                    }
                    if *pending_space && !self.chars.is_empty() {
                        self.chars.push(IndexedChar {
                            ch: ' ',
                            origin: None,
                        });
                    }
                    *pending_space = false;
                    let origin = Origin {
                        node,
                        offset,
                        len: ch.len_utf8(),
                    };
                    for folded in self.fold(ch) {
                        self.chars.push(IndexedChar {
                            ch: folded,
                            origin: Some(origin),
                        });
                    }
                }
            }
            Some(NodeData::Element { tag, .. }) => {
                if is_hidden_tag(tag) {
                    return;
                }
                let block = is_block_tag(tag);
                if block {
                    *pending_space = true;
                }
                for child in doc.children(node) {
                    self.walk(doc, *child, pending_space);
                }
                if block {
                    *pending_space = true;
                }
            }
            None => {}
        }
    }

    fn fold(&self, ch: char) -> Vec<char> {
        if self.case_sensitive {
            vec![ch]
        } else {
            ch.to_lowercase().collect()
        }
    }

    fn normalize(&self, phrase: &str) -> Vec<char> {
        phrase
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
            .chars()
            .flat_map(|ch| self.fold(ch))
            .collect()
    }

    /// Find `phrase` at or after `cursor`, wrapping to the start if allowed.
    ///
    /// Returns the matched range and the cursor position after it.
    pub(super) fn search(
        &self,
        phrase: &str,
        cursor: usize,
        wrap_around: bool,
    ) -> Option<(TextRange, usize)> {
        let needle = self.normalize(phrase);
        let len = needle.len();
        if len == 0 || len > self.chars.len() {
            return None;
        }

        let last_start = self.chars.len() - len;
        let cursor = cursor.min(last_start + 1);
        let wrapped = if wrap_around { 0..cursor } else { 0..0 };

        for start in (cursor..=last_start).chain(wrapped) {
            if !self.matches_at(start, &needle) {
                continue;
            }
            let (Some(first), Some(last)) = (
                self.chars[start].origin,
                self.chars[start + len - 1].origin,
            ) else {
                continue;
            };
            let range = TextRange {
                start: Boundary {
                    node: first.node,
                    offset: first.offset,
                },
                end: Boundary {
                    node: last.node,
                    offset: last.offset + last.len,
                },
            };
            return Some((range, start + len));
        }
        None
    }

    fn matches_at(&self, start: usize, needle: &[char]) -> bool {
        self.chars[start..start + needle.len()]
            .iter()
            .zip(needle)
            .all(|(c, n)| c.ch == *n)
    }
}
