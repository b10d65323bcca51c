//! Applies LSP change batches to a text snapshot.
//!
//! Range edits are applied bottom-up: the batch is sorted by descending start
//! position so that applying one edit never shifts the coordinates of an edit
//! that has not been applied yet. Positions are zero-based lines and UTF-16
//! character offsets, as sent by LSP clients.

use tower_lsp::lsp_types::{Position, Range, TextDocumentContentChangeEvent};
use tracing::warn;

use crate::document::error::EditError;

/// One entry of a client change batch
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditOperation {
    /// Replaces the whole document
    FullReplace { text: String },
    /// Replaces the text between `range.start` and `range.end`
    RangeReplace { range: Range, text: String },
}

impl EditOperation {
    pub fn full(text: impl Into<String>) -> Self {
        Self::FullReplace { text: text.into() }
    }

    pub fn range(start: (u32, u32), end: (u32, u32), text: impl Into<String>) -> Self {
        Self::RangeReplace {
            range: Range::new(Position::new(start.0, start.1), Position::new(end.0, end.1)),
            text: text.into(),
        }
    }
}

impl From<&TextDocumentContentChangeEvent> for EditOperation {
    fn from(change: &TextDocumentContentChangeEvent) -> Self {
        match change.range {
            Some(range) => Self::RangeReplace {
                range,
                text: change.text.clone(),
            },
            None => Self::FullReplace {
                text: change.text.clone(),
            },
        }
    }
}

/// Folds `edits` onto `text` and returns the new snapshot.
///
/// The first full replacement in the batch wins outright. Otherwise all range
/// edits are applied in descending start order against one line-split copy of
/// `text`. Positions outside the document are clamped rather than rejected.
pub fn apply_edits(text: &str, edits: &[EditOperation]) -> Result<String, EditError> {
    if edits.is_empty() {
        return Err(EditError::EmptyBatch);
    }

    let full = edits.iter().find_map(|edit| match edit {
        EditOperation::FullReplace { text } => Some(text),
        EditOperation::RangeReplace { .. } => None,
    });
    if let Some(full) = full {
        return Ok(full.clone());
    }

    let mut ranged: Vec<(&Range, &str)> = edits
        .iter()
        .filter_map(|edit| match edit {
            EditOperation::RangeReplace { range, text } => Some((range, text.as_str())),
            EditOperation::FullReplace { .. } => None,
        })
        .collect();
    // Stable: edits sharing a start position keep their batch order.
    ranged.sort_by(|(a, _), (b, _)| {
        (b.start.line, b.start.character).cmp(&(a.start.line, a.start.character))
    });

    let mut lines: Vec<String> = text.split('\n').map(str::to_string).collect();
    for (range, new_text) in ranged {
        splice(&mut lines, range, new_text);
    }

    Ok(lines.join("\n"))
}

/// Line index plus byte offset into that line
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct Offset {
    line: usize,
    byte: usize,
}

fn splice(lines: &mut Vec<String>, range: &Range, new_text: &str) {
    let start = resolve(lines, range.start);
    let end = resolve(lines, range.end).max(start);

    let before = &lines[start.line][..start.byte];
    let after = &lines[end.line][end.byte..];

    if start.line == end.line {
        let line = format!("{before}{new_text}{after}");
        lines[start.line] = line;
    } else {
        let combined = format!("{before}{new_text}{after}");
        let replacement: Vec<String> = combined.split('\n').map(str::to_string).collect();
        lines.splice(start.line..=end.line, replacement);
    }
}

/// Maps an LSP position onto `lines`, clamping anything past the end.
fn resolve(lines: &[String], position: Position) -> Offset {
    // `str::split` always yields at least one line.
    let last = lines.len() - 1;
    let line = position.line as usize;

    if line > last {
        warn!(
            "Edit position {}:{} is past the last line {}, clamping to end of document",
            position.line, position.character, last
        );
        return Offset {
            line: last,
            byte: utf16_to_byte(&lines[last], usize::MAX).0,
        };
    }

    let (byte, clamped) = utf16_to_byte(&lines[line], position.character as usize);
    if clamped {
        warn!(
            "Edit position {}:{} is past the end of the line, clamping to line end",
            position.line, position.character
        );
    }

    Offset { line, byte }
}

/// Converts a UTF-16 column into a byte offset on a char boundary.
///
/// A column inside a surrogate pair rounds down to the start of the char. A
/// trailing `\r` belongs to the line ending, so columns past the end of the
/// line clamp to before it; the flag is set in that case.
fn utf16_to_byte(line: &str, character: usize) -> (usize, bool) {
    let content = line.strip_suffix('\r').unwrap_or(line);
    let mut units = 0;
    for (idx, ch) in content.char_indices() {
        if units + ch.len_utf16() > character {
            return (idx, false);
        }
        units += ch.len_utf16();
    }
    (content.len(), units < character)
}
