use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use tracing::{error, warn};

use dashagpt::chart::ChartEngine;
use dashagpt::config::Config;
use dashagpt::{Server, app, telemetry};

#[tokio::main]
async fn main() -> ExitCode {
    let config = Config::parse();
    telemetry::init(config.log_format);

    if config.secret_key.is_default() {
        warn!("SECRET_KEY is not set; using the development placeholder");
    }

    let router = app::router(&config, Arc::new(ChartEngine::default()));

    let result = match Server::bind(&config.listen_addr()) {
        Ok(server) => server.serve(router).await,
        Err(e) => Err(e),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("server error: {e}");
            ExitCode::FAILURE
        }
    }
}
