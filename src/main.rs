use abs_mcp::mcp::catalog::tool_catalog;
use abs_mcp::services::logger::{LogLevel, Logger};
use clap::Parser;

/// MCP server exposing the Audiobookshelf REST API over stdio.
#[derive(Debug, Parser)]
#[command(name = "abs-mcp", version)]
struct Cli {
    /// Overrides LOG_LEVEL (error, warn, info, debug).
    #[arg(long)]
    log_level: Option<LogLevel>,

    /// Print the tool names and exit.
    #[arg(long)]
    list_tools: bool,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if cli.list_tools {
        match tool_catalog() {
            Ok(tools) => {
                for tool in tools {
                    println!("{}\t{}", tool.name, tool.description);
                }
                return;
            }
            Err(err) => {
                eprintln!("abs-mcp: {}", err);
                std::process::exit(1);
            }
        }
    }

    let logger = match cli.log_level {
        Some(level) => Logger::with_level("abs-mcp", level),
        None => Logger::new("abs-mcp"),
    };
    if let Err(err) = abs_mcp::mcp::server::run_stdio(logger).await {
        eprintln!("abs-mcp: {}", err);
        std::process::exit(1);
    }
}
