//! Parser layer
//! - traits.rs: Parser and SyntaxNode traits, ParseError
//! - systemverilog.rs: tree-sitter SystemVerilog parser

pub mod systemverilog;
pub mod traits;

pub use systemverilog::SystemVerilogParser;
pub use traits::{ERROR_KIND, ParseError, Parser, SyntaxNode};
