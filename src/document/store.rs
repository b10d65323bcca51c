use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::Mutex as AsyncMutex;
use tower_lsp::lsp_types::{TextDocumentContentChangeEvent, Url};
use tracing::debug;

use crate::document::edit::{EditOperation, apply_edits};
use crate::document::error::EditError;

/// Text buffer of one open document
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    text: String,
    version: i32,
}

impl Document {
    pub fn new(text: String, version: i32) -> Self {
        Self { text, version }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn version(&self) -> i32 {
        self.version
    }

    /// Applies one `didChange` batch.
    ///
    /// A first change without a range replaces the whole text and the rest of
    /// the batch is ignored; otherwise every change is applied as a range edit.
    /// On error the document is left untouched.
    pub fn apply_changes(
        &mut self,
        changes: &[TextDocumentContentChangeEvent],
        version: i32,
    ) -> Result<(), EditError> {
        let first = changes.first().ok_or(EditError::EmptyBatch)?;

        self.text = if first.range.is_none() {
            debug!("Received full document update");
            first.text.clone()
        } else {
            debug!("Received {} incremental changes", changes.len());
            let edits: Vec<EditOperation> = changes.iter().map(EditOperation::from).collect();
            apply_edits(&self.text, &edits)?
        };
        self.version = version;

        Ok(())
    }
}

/// Shared handle to a document; holding its lock serializes work on that URI.
pub type DocumentHandle = Arc<AsyncMutex<Document>>;

/// Open documents keyed by URI.
///
/// The map lock is only held to look up, insert or remove a handle. Edits,
/// parsing and publishing happen under the per-document lock, so different
/// documents never wait on each other.
#[derive(Debug, Default)]
pub struct DocumentStore {
    documents: Mutex<HashMap<Url, DocumentHandle>>,
}

impl DocumentStore {
    pub fn new() -> Self {
        Self {
            documents: Mutex::new(HashMap::new()),
        }
    }

    /// Returns the handle for `uri`, inserting an empty document if it is unknown.
    pub fn entry(&self, uri: &Url) -> DocumentHandle {
        let mut documents = self.lock();
        documents
            .entry(uri.clone())
            .or_insert_with(|| {
                debug!("Creating document entry for {}", uri);
                Arc::new(AsyncMutex::new(Document::default()))
            })
            .clone()
    }

    pub fn get(&self, uri: &Url) -> Option<DocumentHandle> {
        self.lock().get(uri).cloned()
    }

    pub fn remove(&self, uri: &Url) -> Option<DocumentHandle> {
        self.lock().remove(uri)
    }

    /// Snapshot of the current text of `uri`
    pub async fn text(&self, uri: &Url) -> Option<String> {
        let handle = self.get(uri)?;
        let document = handle.lock().await;
        Some(document.text().to_string())
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<Url, DocumentHandle>> {
        self.documents.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
