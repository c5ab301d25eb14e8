//! WebRTC signaling server.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin kaigi-server -- --port 3000
//! ```

use clap::Parser;
use kaigi_server::config::{ServerArgs, ServerConfig};
use kaigi_shared::logger::setup_logger;

#[tokio::main]
async fn main() {
    let args = ServerArgs::parse();

    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), &args.log_level);

    // Run the server
    if let Err(e) = kaigi_server::run_server(ServerConfig::from(args)).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
