//! Content document model.
//!
//! The relocator runs inside a content surface and only touches the page
//! through the primitives in [`ContentDocument`]: native find-and-select,
//! range wrapping, ancestor traversal, inline style mutation and
//! scroll-into-view. [`Document`] is the in-process implementation used by
//! [`MemoryHost`](crate::host::MemoryHost), the CLI and the tests.
//!
//! ## Layout
//!
//! ```text
//! Document
//!   ├─► nodes: arena of element / text nodes (NodeId = index)
//!   ├─► selection: Option<TextRange>      (set by find, cleared by caller)
//!   ├─► find cursor                        (next search starts here)
//!   └─► scrolled_to: Option<ScrollTarget>  (last scroll_into_view)
//! ```

mod document;
mod find;
mod markup;

pub use document::*;

use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Index of a node in a [`Document`] arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct NodeId(usize);

impl NodeId {
    pub(crate) fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "node#{}", self.0)
    }
}

/// A position inside a text node. `offset` is a byte offset into the node's text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Boundary {
    pub node: NodeId,
    pub offset: usize,
}

/// A selected run of text, start inclusive, end exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TextRange {
    pub start: Boundary,
    pub end: Boundary,
}

impl TextRange {
    pub fn is_collapsed(&self) -> bool {
        self.start == self.end
    }
}

/// Options for [`ContentDocument::find`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FindOptions {
    pub case_sensitive: bool,
    pub wrap_around: bool,
}

impl Default for FindOptions {
    fn default() -> Self {
        Self {
            case_sensitive: false,
            wrap_around: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ScrollBehavior {
    Auto,
    #[default]
    Smooth,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ScrollBlock {
    Start,
    #[default]
    Center,
    End,
    Nearest,
}

/// Options for [`ContentDocument::scroll_into_view`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct ScrollOptions {
    pub behavior: ScrollBehavior,
    pub block: ScrollBlock,
}

/// Why a range could not be wrapped in a single element.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WrapError {
    #[error("range partially selects an element")]
    PartialElement,

    #[error("range does not point into live text")]
    InvalidRange,
}

/// Host primitives the relocator needs from a content surface.
pub trait ContentDocument {
    /// Search for `phrase` starting at the current find position and select the
    /// first match. Returns the selected range, or `None` when nothing matched.
    fn find(&mut self, phrase: &str, options: FindOptions) -> Option<TextRange>;

    /// The current text selection, if any.
    fn selection(&self) -> Option<TextRange>;

    fn clear_selection(&mut self);

    /// Wrap `range` in a new element with the given tag and return it.
    fn surround_contents(&mut self, range: &TextRange, tag: &str) -> Result<NodeId, WrapError>;

    /// Nearest element ancestor of `node`.
    fn parent_element(&self, node: NodeId) -> Option<NodeId>;

    /// Upper-case tag name of an element, `None` for text nodes.
    fn tag_name(&self, node: NodeId) -> Option<&str>;

    fn set_style(&mut self, node: NodeId, property: &str, value: &str);

    fn scroll_into_view(&mut self, node: NodeId, options: ScrollOptions);
}
