// src/lib.rs
//! # sonrs
//!
//! A single-pass compiler front-end for the tiny imperative language
//! Simple. Source is translated directly into a Sea-of-Nodes intermediate
//! representation — there is no AST — and every node is peephole-optimized
//! the moment it is constructed.
//!
//! Important modules:
//! * `lexer` / `tokens` - logos-based tokenization of Simple source
//! * `parser` - the recursive-descent graph builder
//! * `son` - the node graph: arena, type lattice, peephole engine, scopes
//! * `printers` - Graphviz output
//! * `error` - error types and terminal reporting
//! * `cli` - command-line interface

pub mod cli;
pub mod error;
pub mod lexer;
pub mod location;
pub mod parser;
pub mod printers;
pub mod son;
pub mod time;
pub mod tokens;
