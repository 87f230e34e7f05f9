//! Wirepad terminal client
//!
//! Opens a shared text pad in the terminal, addressed by the same URL a
//! browser viewer would use.

use anyhow::Result;
use clap::Parser;

use wirepad_core::SessionConfig;

mod tui;

#[derive(Parser)]
#[command(name = "wirepad")]
#[command(about = "Shared text pads, synchronized live over WebSocket")]
#[command(version)]
struct Cli {
    /// Page URL of the pad, e.g. http://localhost:8080/room1
    url: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = SessionConfig::from_page_url(&cli.url)?;
    tui::run(config).await
}
