//! Turns syntax trees into LSP diagnostics

use tower_lsp::lsp_types::{Diagnostic, DiagnosticSeverity, Position, Range};
use tracing::{debug, info, warn};

use crate::config::{DIAGNOSTIC_SOURCE, PARSE_FAILURE_MESSAGE};
use crate::parser::traits::{ParseError, SyntaxNode};

/// Builds the diagnostics for one parse of `content`.
///
/// A failed parse yields a single diagnostic at the start of the document.
/// Otherwise every ERROR and missing node in the tree is reported.
pub fn diagnostics_from_parse(
    result: &Result<tree_sitter::Tree, ParseError>,
    content: &str,
) -> Vec<Diagnostic> {
    let tree = match result {
        Ok(tree) => tree,
        Err(e) => {
            warn!("Parse failed, reporting parser unavailable: {}", e);
            return vec![parse_failure_diagnostic()];
        }
    };

    let root = tree.root_node();
    debug!(
        "Parsed document. Root node: {}, has error: {}",
        root.kind(),
        root.has_error()
    );

    let diagnostics = collect_syntax_errors(&root, content);

    // has_error is also set for ambiguities the grammar recovered from, so an
    // empty walk is not turned into a generic diagnostic.
    if diagnostics.is_empty() && root.has_error() {
        warn!(
            "Tree has error flag but no error nodes were found. Root node type: {}",
            root.kind()
        );
    }

    diagnostics
}

/// Walks the tree in pre-order and reports every error and missing node.
///
/// A node that is both an ERROR node and missing is only reported once, as a
/// syntax error. The walk keeps its own stack, so tree depth is bounded by
/// heap rather than by the thread stack.
pub fn collect_syntax_errors<N: SyntaxNode>(root: &N, content: &str) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();
    let mut pending = root.children();
    pending.reverse();
    check_node(root, content, &mut diagnostics);

    while let Some(node) = pending.pop() {
        check_node(&node, content, &mut diagnostics);
        // Reversed so the first child is popped next.
        pending.extend(node.children().into_iter().rev());
    }

    info!("Found {} syntax errors", diagnostics.len());
    diagnostics
}

fn check_node<N: SyntaxNode>(node: &N, content: &str, diagnostics: &mut Vec<Diagnostic>) {
    if node.is_error() {
        let error_text = source_text(content, node.byte_range());
        debug!(
            "Found ERROR node: '{}' at {:?}-{:?}",
            error_text,
            node.span().start,
            node.span().end
        );
        diagnostics.push(error_diagnostic(
            node.span(),
            format!("Syntax error: '{}'", error_text),
        ));
    } else if node.is_missing() {
        debug!(
            "Found missing node at {:?}-{:?}",
            node.span().start,
            node.span().end
        );
        diagnostics.push(error_diagnostic(node.span(), "Missing token".to_string()));
    }
}

/// Source text covered by `range`, lossy if the range splits a UTF-8 sequence.
fn source_text(content: &str, range: std::ops::Range<usize>) -> String {
    let end = range.end.min(content.len());
    let start = range.start.min(end);
    match content.get(start..end) {
        Some(text) => text.to_string(),
        None => String::from_utf8_lossy(&content.as_bytes()[start..end]).into_owned(),
    }
}

fn parse_failure_diagnostic() -> Diagnostic {
    error_diagnostic(
        Range::new(Position::new(0, 0), Position::new(0, 0)),
        PARSE_FAILURE_MESSAGE.to_string(),
    )
}

fn error_diagnostic(range: Range, message: String) -> Diagnostic {
    Diagnostic {
        range,
        severity: Some(DiagnosticSeverity::ERROR),
        source: Some(DIAGNOSTIC_SOURCE.to_string()),
        message,
        ..Default::default()
    }
}
