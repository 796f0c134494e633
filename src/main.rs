//! Customer service binary.
//!
//! Run with:
//!   RUST_LOG=debug cargo run -- --bind 127.0.0.1:2001
//!
//! Try:
//!   curl -i -X POST http://localhost:2001/spring/customers
//!   curl -i http://localhost:2001/spring/customers/1
//!   curl -i -X PUT -H 'content-type: application/json' \
//!        -d '{"Name":"Max"}' http://localhost:2001/spring/customers/1
//!   curl -i -X DELETE http://localhost:2001/spring/customers/1
//!   curl -i http://localhost:2001/spring/customers

use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use customers::{resource, Config, CustomerStore, Server};

#[tokio::main]
async fn main() -> ExitCode {
    let config = Config::parse();

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true))
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.log_filter)),
        )
        .init();

    info!(bind = %config.bind, base_path = %config.base_path, "starting customer service");

    let store = Arc::new(CustomerStore::new());
    let app = resource::router(store, &config.base_path);

    match Server::bind(config.bind).serve(app).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("server error: {e}");
            ExitCode::FAILURE
        }
    }
}
