//! Blog web server entry point
//!
//! Run with:
//! ```bash
//! cargo run -p blog-web
//! ```
//!
//! Configuration is read from the environment (a `.env` file is honoured).

use blog_common::{try_init_tracing_with_config, AppConfig, TracingConfig};
use tracing::{error, info};

#[tokio::main]
async fn main() {
    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = try_init_tracing_with_config(TracingConfig::for_environment(config.app.env)) {
        eprintln!("Warning: Failed to initialize tracing: {e}");
    }

    info!(
        env = ?config.app.env,
        address = %config.server.address(),
        "Configuration loaded"
    );

    if let Err(e) = blog_web::run(config).await {
        error!(error = %e, "Server failed");
        std::process::exit(1);
    }
}
