//! Snippet relocation and highlight injection.
//!
//! Runs inside a content surface. Tries the candidate phrases of a snippet in
//! order with the host's find primitive, highlights the first match and scrolls
//! it into view. Nothing is returned across the surface boundary except the
//! [`RelocationOutcome`]; failures never escape as errors.
//!
//! ## Highlight scopes
//!
//! ```text
//! ExactSpan        <p>The <mark>quick brown fox</mark> jumps</p>
//! ContainingBlock  <p style="background-color: ...">The quick brown fox jumps</p>
//! ```

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::RelocatorConfig;
use crate::dom::{ContentDocument, FindOptions, NodeId, ScrollOptions, TextRange};
use crate::phrase::candidate_phrases;
use crate::types::HighlightScope;

/// Ancestors that count as "the containing block" of a match.
pub const BLOCK_ANCESTOR_TAGS: &[&str] = &[
    "P", "LI", "TD", "H1", "H2", "H3", "H4", "H5", "H6", "BLOCKQUOTE",
];

/// Inline style applied to a highlight.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighlightStyle {
    pub background_color: String,
    pub padding: String,
    pub border_radius: String,
}

impl HighlightStyle {
    /// Style of a `<mark>` around the exact match.
    pub fn mark() -> Self {
        Self {
            background_color: "#faec5a".to_string(),
            padding: "2px 4px".to_string(),
            border_radius: "3px".to_string(),
        }
    }

    /// Style of a highlighted containing block.
    pub fn block() -> Self {
        Self {
            background_color: "#faec5a".to_string(),
            padding: "4px".to_string(),
            border_radius: "4px".to_string(),
        }
    }

    fn apply<D: ContentDocument + ?Sized>(&self, doc: &mut D, node: NodeId) {
        doc.set_style(node, "background-color", &self.background_color);
        doc.set_style(node, "padding", &self.padding);
        doc.set_style(node, "border-radius", &self.border_radius);
    }
}

/// What a relocation attempt did to the page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum RelocationOutcome {
    /// The match was wrapped in a `<mark>`.
    Marked { node: NodeId, phrase: String },
    /// The match's containing block was styled.
    Block { node: NodeId, phrase: String },
    /// A match was found but could not be highlighted; the page was only scrolled.
    ScrolledOnly { node: NodeId, phrase: String },
    /// No candidate phrase matched. The page is untouched.
    NotFound,
}

impl RelocationOutcome {
    pub fn is_found(&self) -> bool {
        !matches!(self, RelocationOutcome::NotFound)
    }

    /// The phrase that matched.
    pub fn phrase(&self) -> Option<&str> {
        match self {
            RelocationOutcome::Marked { phrase, .. }
            | RelocationOutcome::Block { phrase, .. }
            | RelocationOutcome::ScrolledOnly { phrase, .. } => Some(phrase),
            RelocationOutcome::NotFound => None,
        }
    }

    /// The element scrolled into view.
    pub fn node(&self) -> Option<NodeId> {
        match self {
            RelocationOutcome::Marked { node, .. }
            | RelocationOutcome::Block { node, .. }
            | RelocationOutcome::ScrolledOnly { node, .. } => Some(*node),
            RelocationOutcome::NotFound => None,
        }
    }
}

/// Phrase search plus highlight, parameterised by [`HighlightScope`].
#[derive(Debug, Clone)]
pub struct Relocator {
    mark_style: HighlightStyle,
    block_style: HighlightStyle,
    find_options: FindOptions,
}

impl Default for Relocator {
    fn default() -> Self {
        Self {
            mark_style: HighlightStyle::mark(),
            block_style: HighlightStyle::block(),
            find_options: FindOptions::default(),
        }
    }
}

impl Relocator {
    pub fn new(config: &RelocatorConfig) -> Self {
        Self {
            mark_style: config.mark_style.clone(),
            block_style: config.block_style.clone(),
            find_options: FindOptions::default(),
        }
    }

    /// Whether the snippet was found on the page.
    pub fn highlight<D: ContentDocument + ?Sized>(
        &self,
        doc: &mut D,
        snippet: &str,
        scope: HighlightScope,
    ) -> bool {
        self.locate(doc, snippet, scope).is_found()
    }

    /// Find the snippet, highlight it and scroll to it.
    ///
    /// The first candidate that matches wins; at most one highlight is applied.
    pub fn locate<D: ContentDocument + ?Sized>(
        &self,
        doc: &mut D,
        snippet: &str,
        scope: HighlightScope,
    ) -> RelocationOutcome {
        let candidates = candidate_phrases(snippet);
        if candidates.is_empty() {
            debug!("Snippet has no significant words, skipping search");
            return RelocationOutcome::NotFound;
        }

        for candidate in &candidates {
            let Some(range) = doc.find(&candidate.text, self.find_options) else {
                debug!(kind = ?candidate.kind, phrase = %candidate.text, "No match");
                continue;
            };
            if range.is_collapsed() {
                continue;
            }

            debug!(kind = ?candidate.kind, phrase = %candidate.text, "Phrase matched");
            let phrase = candidate.text.clone();
            let outcome = match scope {
                HighlightScope::ExactSpan => self.mark_span(doc, &range, phrase),
                HighlightScope::ContainingBlock => self.mark_block(doc, &range, phrase),
            };

            doc.clear_selection();
            if let Some(node) = outcome.node() {
                doc.scroll_into_view(node, ScrollOptions::default());
            }
            return outcome;
        }

        debug!(candidates = candidates.len(), "Snippet not found");
        RelocationOutcome::NotFound
    }

    fn mark_span<D: ContentDocument + ?Sized>(
        &self,
        doc: &mut D,
        range: &TextRange,
        phrase: String,
    ) -> RelocationOutcome {
        match doc.surround_contents(range, "mark") {
            Ok(mark) => {
                self.mark_style.apply(doc, mark);
                RelocationOutcome::Marked { node: mark, phrase }
            }
            Err(e) => {
                debug!("Cannot wrap match ({}), scrolling only", e);
                RelocationOutcome::ScrolledOnly {
                    node: scroll_anchor(doc, range),
                    phrase,
                }
            }
        }
    }

    fn mark_block<D: ContentDocument + ?Sized>(
        &self,
        doc: &mut D,
        range: &TextRange,
        phrase: String,
    ) -> RelocationOutcome {
        let mut current = doc.parent_element(range.start.node);
        while let Some(el) = current {
            if doc
                .tag_name(el)
                .is_some_and(|tag| BLOCK_ANCESTOR_TAGS.contains(&tag))
            {
                self.block_style.apply(doc, el);
                return RelocationOutcome::Block { node: el, phrase };
            }
            current = doc.parent_element(el);
        }

        debug!("Match has no block ancestor, scrolling only");
        RelocationOutcome::ScrolledOnly {
            node: scroll_anchor(doc, range),
            phrase,
        }
    }
}

fn scroll_anchor<D: ContentDocument + ?Sized>(doc: &D, range: &TextRange) -> NodeId {
    doc.parent_element(range.start.node)
        .unwrap_or(range.start.node)
}
