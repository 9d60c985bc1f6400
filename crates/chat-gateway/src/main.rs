//! Chat Gateway Server entry point
//!
//! Run with:
//! ```bash
//! cargo run -p chat-gateway
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

    if let Err(e) = run(config).await {
        error!(error = %e, "Gateway failed to start");
        std::process::exit(1);
    }
}

async fn run(config: AppConfig) -> Result<(), chat_common::AppError> {
    info!(
        env = ?config.app.env,
        address = %config.gateway.server.address(),
        delivery = ?config.gateway.delivery,
        "Starting Chat Gateway Server..."
    );

    chat_gateway::run(config).await
}
