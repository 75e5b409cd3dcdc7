pub mod generator;
pub mod reader;

pub use generator::{PhelForm, PhelProgram};
pub use reader::{read, read_fixture, Fixture, NodeKind, ReadNode};
