use std::path::PathBuf;

/// Name reported in `serverInfo` and used for the data directory.
pub const SERVER_NAME: &str = "systemverilog-lsp";

/// Value of the `source` field on every published diagnostic.
pub const DIAGNOSTIC_SOURCE: &str = "systemverilog-lsp";

/// Message of the single diagnostic published when the parser cannot produce a tree.
pub const PARSE_FAILURE_MESSAGE: &str =
    "Failed to parse SystemVerilog code - tree-sitter parser not available";

/// Returns the path to the data directory for systemverilog-lsp.
/// Uses $XDG_DATA_HOME/systemverilog-lsp if XDG_DATA_HOME is set,
/// otherwise falls back to ~/.local/share/systemverilog-lsp,
/// or ./systemverilog-lsp if neither is available.
pub fn data_dir() -> PathBuf {
    data_dir_with_env(std::env::var("XDG_DATA_HOME").ok(), dirs::home_dir())
}

/// Returns the path to the log file.
pub fn log_path() -> PathBuf {
    data_dir().join("systemverilog-lsp.log")
}

fn data_dir_with_env(xdg_data_home: Option<String>, home_dir: Option<PathBuf>) -> PathBuf {
    let data_dir = xdg_data_home
        .filter(|dir| !dir.is_empty())
        .map(PathBuf::from)
        .or_else(|| home_dir.map(|home| home.join(".local/share")))
        .unwrap_or_else(|| PathBuf::from("."));

    data_dir.join(SERVER_NAME)
}
