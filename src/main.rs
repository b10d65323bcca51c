use clap::Parser;

use systemverilog_lsp::lsp::server::run_server;

/// Language server reporting SystemVerilog syntax errors
#[derive(Debug, Parser)]
#[command(name = "systemverilog-lsp", version, about)]
struct Cli {
    /// Communicate over stdin/stdout (the only supported transport)
    #[arg(long)]
    stdio: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _cli = Cli::parse();
    run_server().await
}
