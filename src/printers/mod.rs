// src/printers/mod.rs
//! Read-only output formats for the graph.

pub mod dot_printer;
