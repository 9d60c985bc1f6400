//! Chat API Server entry point
//!
//! Run with:
//! ```bash
//! cargo run -p chat-api
//! ```
//!
//! Configuration is loaded from environment variables.

use chat_common::{init_tracing_for, try_init_tracing, AppConfig};
use tracing::{error, info};

#[tokio::main]
async fn main() {
    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            let _ = try_init_tracing();
            error!(error = %e, "Failed to load configuration");
            std::process::exit(1);
        }
    };

    if let Err(e) = init_tracing_for(config.app.env) {
        eprintln!("Warning: Failed to initialize tracing: {e}");
    }

    info!(
        env = ?config.app.env,
        address = %config.api.address(),
        "Starting Chat API Server..."
    );

    if let Err(e) = chat_api::run(config).await {
        error!(error = %e, "Server failed to start");
        std::process::exit(1);
    }
}
