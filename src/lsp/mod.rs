// LSP protocol layer
// - server.rs: stdio server bootstrap
// - backend.rs: LanguageServer trait implementation
// - diagnostics.rs: Diagnostics generation

pub mod backend;
pub mod diagnostics;
pub mod server;
