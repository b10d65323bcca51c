//! SystemVerilog parser backed by tree-sitter

use tower_lsp::lsp_types::{Position, Range};
use tracing::warn;

use crate::parser::traits::{ParseError, Parser, SyntaxNode};

/// Parser for SystemVerilog source files
pub struct SystemVerilogParser;

impl SystemVerilogParser {
    pub fn new() -> Self {
        Self
    }
}

impl Default for SystemVerilogParser {
    fn default() -> Self {
        Self::new()
    }
}

impl Parser for SystemVerilogParser {
    fn parse(&self, content: &str) -> Result<tree_sitter::Tree, ParseError> {
        let mut parser = tree_sitter::Parser::new();
        let language = tree_sitter_verilog::LANGUAGE;
        parser.set_language(&language.into()).map_err(|e| {
            warn!("Failed to set SystemVerilog language for tree-sitter: {}", e);
            ParseError::TreeSitter(e.to_string())
        })?;

        parser.parse(content, None).ok_or_else(|| {
            warn!("Failed to parse SystemVerilog content");
            ParseError::ParseFailed("tree-sitter returned no tree".to_string())
        })
    }
}

impl SyntaxNode for tree_sitter::Node<'_> {
    fn kind(&self) -> &str {
        tree_sitter::Node::kind(self)
    }

    fn span(&self) -> Range {
        let start = self.start_position();
        let end = self.end_position();
        Range::new(
            Position::new(start.row as u32, start.column as u32),
            Position::new(end.row as u32, end.column as u32),
        )
    }

    fn byte_range(&self) -> std::ops::Range<usize> {
        tree_sitter::Node::byte_range(self)
    }

    fn is_missing(&self) -> bool {
        tree_sitter::Node::is_missing(self)
    }

    fn children(&self) -> Vec<Self> {
        let mut cursor = self.walk();
        tree_sitter::Node::children(self, &mut cursor).collect()
    }
}
