//! Code completion for Phel forms
//!
//! This module provides:
//! - Cursor context detection (new form vs. inside an expression)
//! - Structural templates for new forms
//! - Local symbol and registry function candidates in a deterministic order
//! - Conversion to LSP completion items with snippet insertion text

pub mod builder;
pub mod candidate;
pub mod context;
pub mod ranking;
pub mod templates;

pub use builder::{CompletionBuilder, LOCAL_TAIL_TEXT};
pub use candidate::{CandidateKind, CompletionCandidate, InsertTemplate, Placeholder};
pub use context::{CompletionMode, CursorContext};
pub use ranking::{namespace_rank, rank_library_candidates, LOCAL_SYMBOL_PRIORITY, NAMESPACE_ORDER};
pub use templates::template_candidates;
