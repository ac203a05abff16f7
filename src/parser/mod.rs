// src/parser/mod.rs
//! Single-pass translation of Simple source into the Sea-of-Nodes graph.

pub mod son_parser;

pub use son_parser::{ParsedProgram, SonParser};
