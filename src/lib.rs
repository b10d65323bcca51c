//! SystemVerilog language server reporting tree-sitter syntax errors as LSP diagnostics.

pub mod config;
pub mod document;
pub mod log;
pub mod lsp;
pub mod parser;
