//! Completion and documentation engine for the Phel language
//!
//! Given a syntax tree produced by an external parser and the Phel function
//! registry, the engine classifies symbols by their syntactic position,
//! builds ranked completion candidates and renders hover documentation.
//!
//! ```rust,ignore
//! let engine = PhelEngine::builtin().with_config(&EngineConfig::from_env_or_default());
//! let candidates = engine.provide_completions(&tree, offset);
//! ```

pub mod analysis;
pub mod config;
pub mod ir;
pub mod logging;
pub mod lsp;
pub mod registry;

pub use config::EngineConfig;
pub use lsp::engine::PhelEngine;
pub use registry::{FunctionEntry, FunctionRegistry};
