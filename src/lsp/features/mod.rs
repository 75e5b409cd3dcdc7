//! Editor features over a Phel syntax tree
//!
//! - `node_finder.rs` - Offset to node lookup
//! - `completion/` - Context-aware completion candidates
//! - `documentation.rs` - Documentation records (HTML and markdown)
//! - `hover.rs` - Hover tooltips built from documentation records

pub mod completion;
pub mod documentation;
pub mod hover;
pub mod node_finder;

pub use documentation::{DocRecord, DocumentationRenderer};
pub use hover::GenericHover;
pub use node_finder::{find_node_at_offset, find_symbol_at_offset};
