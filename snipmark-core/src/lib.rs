//! snipmark-core - Core library for snipmark
//!
//! Re-finds a previously captured text snippet inside a freshly loaded content
//! surface and highlights it:
//!
//! - **types**: Message contract and backend boundary types
//! - **phrase**: Candidate phrase derivation from a snippet
//! - **dom**: Content document model and the host primitives the relocator uses
//! - **relocator**: Phrase search and highlight injection
//! - **host**: Content surface host seam (open, readiness events, injection)
//! - **orchestrator**: Open-then-wait-then-inject lifecycle per surface
//! - **client**: Search/index backend client
//! - **status**: Human-facing status line
//! - **config**: Configuration loading

#[cfg(feature = "client")]
pub mod client;
pub mod config;
pub mod dom;
pub mod error;
pub mod host;
pub mod orchestrator;
pub mod phrase;
pub mod relocator;
pub mod status;
pub mod types;

// Re-export commonly used types
pub use config::Config;
pub use dom::{ContentDocument, Document};
pub use error::{Error, Result};
pub use orchestrator::{Orchestrator, OrchestratorHandle};
pub use relocator::{RelocationOutcome, Relocator};
pub use types::{HighlightScope, RelocationRequest, SurfaceId, TargetAddress};
