use thiserror::Error;
use tower_lsp::lsp_types::Range;

/// Kind tag tree-sitter gives to regions it could not match against the grammar
pub const ERROR_KIND: &str = "ERROR";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("Failed to load grammar: {0}")]
    TreeSitter(String),

    #[error("Parse failed: {0}")]
    ParseFailed(String),
}

/// Parses source text into a tree-sitter syntax tree
pub trait Parser: Send + Sync {
    /// Parses `content` from scratch.
    ///
    /// # Returns
    /// * `Ok(Tree)` - The syntax tree, which may contain error and missing nodes
    /// * `Err(ParseError)` - If the grammar could not be loaded or no tree was produced
    fn parse(&self, content: &str) -> Result<tree_sitter::Tree, ParseError>;
}

/// The parts of a syntax tree node that diagnostics are built from
pub trait SyntaxNode: Sized {
    fn kind(&self) -> &str;

    /// Start and end as reported by the parser
    fn span(&self) -> Range;

    /// Byte range into the parsed source
    fn byte_range(&self) -> std::ops::Range<usize>;

    fn is_missing(&self) -> bool;

    /// Children in source order
    fn children(&self) -> Vec<Self>;

    fn is_error(&self) -> bool {
        self.kind() == ERROR_KIND
    }
}
