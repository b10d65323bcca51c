use tower_lsp::jsonrpc::Result;
use tower_lsp::lsp_types::*;
use tower_lsp::{Client, LanguageServer};
use tracing::{debug, info, warn};

use crate::config::SERVER_NAME;
use crate::document::store::{Document, DocumentStore};
use crate::lsp::diagnostics::diagnostics_from_parse;
use crate::parser::SystemVerilogParser;
use crate::parser::traits::Parser;

pub struct Backend {
    client: Client,
    documents: DocumentStore,
    parser: Box<dyn Parser>,
}

impl Backend {
    pub fn new(client: Client) -> Self {
        Self::build(client, Box::new(SystemVerilogParser::new()))
    }

    /// Creates a backend with a specific parser.
    pub fn build(client: Client, parser: Box<dyn Parser>) -> Self {
        Self {
            client,
            documents: DocumentStore::new(),
            parser,
        }
    }

    pub fn documents(&self) -> &DocumentStore {
        &self.documents
    }

    pub fn server_capabilities() -> ServerCapabilities {
        ServerCapabilities {
            text_document_sync: Some(TextDocumentSyncCapability::Options(
                TextDocumentSyncOptions {
                    open_close: Some(true),
                    // Incremental batches are still merged if a client sends them.
                    change: Some(TextDocumentSyncKind::FULL),
                    save: Some(TextDocumentSyncSaveOptions::Supported(false)),
                    ..Default::default()
                },
            )),
            diagnostic_provider: Some(DiagnosticServerCapabilities::Options(DiagnosticOptions {
                identifier: Some(SERVER_NAME.to_string()),
                inter_file_dependencies: false,
                workspace_diagnostics: false,
                work_done_progress_options: WorkDoneProgressOptions::default(),
            })),
            ..Default::default()
        }
    }

    fn analyze(&self, content: &str) -> Vec<Diagnostic> {
        let result = self.parser.parse(content);
        let diagnostics = diagnostics_from_parse(&result, content);
        info!("Generated {} diagnostics", diagnostics.len());
        diagnostics
    }

    /// Parses `document` and replaces the client's diagnostics for `uri`.
    ///
    /// Callers hold the document lock, so the published set always matches
    /// the stored text.
    async fn publish(&self, uri: Url, document: &Document) {
        let diagnostics = self.analyze(document.text());

        debug!("Publishing {} diagnostics for {}", diagnostics.len(), uri);

        self.client
            .publish_diagnostics(uri, diagnostics, Some(document.version()))
            .await;
    }
}

#[tower_lsp::async_trait]
impl LanguageServer for Backend {
    async fn initialize(&self, _params: InitializeParams) -> Result<InitializeResult> {
        self.client
            .log_message(MessageType::INFO, "LSP server initializing")
            .await;
        Ok(InitializeResult {
            capabilities: Self::server_capabilities(),
            server_info: Some(ServerInfo {
                name: SERVER_NAME.to_string(),
                version: Some(env!("CARGO_PKG_VERSION").to_string()),
            }),
        })
    }

    async fn initialized(&self, _params: InitializedParams) {
        self.client
            .log_message(MessageType::INFO, "LSP server initialized")
            .await;
    }

    async fn shutdown(&self) -> Result<()> {
        self.client
            .log_message(MessageType::INFO, "LSP server shutting down")
            .await;
        Ok(())
    }

    async fn did_open(&self, params: DidOpenTextDocumentParams) {
        let uri = params.text_document.uri;
        info!("Opened document: {}", uri);

        let handle = self.documents.entry(&uri);
        let mut document = handle.lock().await;
        *document = Document::new(params.text_document.text, params.text_document.version);

        self.publish(uri, &document).await;
    }

    async fn did_change(&self, params: DidChangeTextDocumentParams) {
        let uri = params.text_document.uri;
        info!(
            "Document changed: {}, Changes: {}",
            uri,
            params.content_changes.len()
        );

        if params.content_changes.is_empty() {
            warn!("Received didChange with no content changes for {}", uri);
            return;
        }

        let handle = self.documents.entry(&uri);
        let mut document = handle.lock().await;
        if let Err(e) =
            document.apply_changes(&params.content_changes, params.text_document.version)
        {
            warn!("Failed to apply changes to {}: {}", uri, e);
            return;
        }

        self.publish(uri, &document).await;
    }

    async fn did_close(&self, params: DidCloseTextDocumentParams) {
        let uri = params.text_document.uri;
        info!("Closed document: {}", uri);

        if let Some(handle) = self.documents.remove(&uri) {
            // Let an in-flight change finish publishing before clearing.
            let _document = handle.lock().await;
        }

        self.client.publish_diagnostics(uri, Vec::new(), None).await;
    }

    async fn diagnostic(
        &self,
        params: DocumentDiagnosticParams,
    ) -> Result<DocumentDiagnosticReportResult> {
        let items = match self.documents.get(&params.text_document.uri) {
            Some(handle) => {
                let document = handle.lock().await;
                self.analyze(document.text())
            }
            None => Vec::new(),
        };

        Ok(DocumentDiagnosticReportResult::Report(
            DocumentDiagnosticReport::Full(RelatedFullDocumentDiagnosticReport {
                related_documents: None,
                full_document_diagnostic_report: FullDocumentDiagnosticReport {
                    result_id: None,
                    items,
                },
            }),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_capabilities_request_full_sync_without_save() {
        let capabilities = Backend::server_capabilities();

        let Some(TextDocumentSyncCapability::Options(sync)) = capabilities.text_document_sync
        else {
            panic!("expected text document sync options");
        };
        assert_eq!(sync.open_close, Some(true));
        assert_eq!(sync.change, Some(TextDocumentSyncKind::FULL));
        assert_eq!(sync.save, Some(TextDocumentSyncSaveOptions::Supported(false)));
    }

    #[test]
    fn server_capabilities_advertise_document_scoped_diagnostics() {
        let capabilities = Backend::server_capabilities();

        let Some(DiagnosticServerCapabilities::Options(options)) = capabilities.diagnostic_provider
        else {
            panic!("expected diagnostic options");
        };
        assert!(!options.inter_file_dependencies);
        assert!(!options.workspace_diagnostics);
    }

    #[test]
    fn server_capabilities_leave_other_features_disabled() {
        let capabilities = Backend::server_capabilities();

        assert!(capabilities.completion_provider.is_none());
        assert!(capabilities.hover_provider.is_none());
        assert!(capabilities.document_formatting_provider.is_none());
    }
}
