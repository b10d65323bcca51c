//! Helpers for driving the language server through `LspService` in tests
#![allow(dead_code)]

use std::time::Duration;

use futures::StreamExt;
use serde_json::{Value, json};
use tokio::sync::mpsc;
use tower_lsp::ClientSocket;
use tower_lsp::jsonrpc::Request;
use tower_lsp::lsp_types::PublishDiagnosticsParams;
use systemverilog_lsp::parser::traits::{ParseError, Parser};

const NOTIFICATION_TIMEOUT: Duration = Duration::from_secs(5);

pub fn create_initialize_request(id: i64) -> Request {
    Request::build("initialize")
        .params(json!({ "capabilities": {} }))
        .id(id)
        .finish()
}

pub fn create_initialized_notification() -> Request {
    Request::build("initialized").params(json!({})).finish()
}

pub fn create_did_open_notification(uri: &str, text: &str) -> Request {
    Request::build("textDocument/didOpen")
        .params(json!({
            "textDocument": {
                "uri": uri,
                "languageId": "systemverilog",
                "version": 1,
                "text": text,
            }
        }))
        .finish()
}

/// `changes` is the raw `contentChanges` array
pub fn create_did_change_notification(uri: &str, version: i32, changes: Value) -> Request {
    Request::build("textDocument/didChange")
        .params(json!({
            "textDocument": { "uri": uri, "version": version },
            "contentChanges": changes,
        }))
        .finish()
}

pub fn create_did_close_notification(uri: &str) -> Request {
    Request::build("textDocument/didClose")
        .params(json!({ "textDocument": { "uri": uri } }))
        .finish()
}

pub fn create_diagnostic_request(id: i64, uri: &str) -> Request {
    Request::build("textDocument/diagnostic")
        .params(json!({ "textDocument": { "uri": uri } }))
        .id(id)
        .finish()
}

/// Range change event as sent by an incremental-sync client
pub fn range_change(start: (u32, u32), end: (u32, u32), text: &str) -> Value {
    json!({
        "range": {
            "start": { "line": start.0, "character": start.1 },
            "end": { "line": end.0, "character": end.1 },
        },
        "text": text,
    })
}

pub fn full_change(text: &str) -> Value {
    json!({ "text": text })
}

/// Forwards every server-to-client message into a channel.
pub fn spawn_notification_collector(socket: ClientSocket) -> mpsc::UnboundedReceiver<Request> {
    let (tx, rx) = mpsc::unbounded_channel();
    tokio::spawn(async move {
        let mut socket = socket;
        while let Some(request) = socket.next().await {
            if tx.send(request).is_err() {
                break;
            }
        }
    });
    rx
}

/// Waits for the next message named `method`, skipping any others.
pub async fn wait_for_notification(
    rx: &mut mpsc::UnboundedReceiver<Request>,
    method: &str,
) -> Option<Request> {
    wait_for_notification_within(rx, method, NOTIFICATION_TIMEOUT).await
}

pub async fn wait_for_notification_within(
    rx: &mut mpsc::UnboundedReceiver<Request>,
    method: &str,
    timeout: Duration,
) -> Option<Request> {
    tokio::time::timeout(timeout, async {
        while let Some(request) = rx.recv().await {
            if request.method() == method {
                return Some(request);
            }
        }
        None
    })
    .await
    .ok()
    .flatten()
}

pub async fn wait_for_diagnostics(
    rx: &mut mpsc::UnboundedReceiver<Request>,
) -> PublishDiagnosticsParams {
    let notification = wait_for_notification(rx, "textDocument/publishDiagnostics")
        .await
        .expect("Expected publishDiagnostics notification");
    serde_json::from_value(notification.params().unwrap().clone()).unwrap()
}

/// Parser whose grammar never loads
pub struct FailingParser;

impl Parser for FailingParser {
    fn parse(&self, _content: &str) -> Result<tree_sitter::Tree, ParseError> {
        Err(ParseError::TreeSitter("grammar unavailable".to_string()))
    }
}
