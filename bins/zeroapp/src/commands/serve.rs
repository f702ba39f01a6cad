//! `zeroapp serve`

use anyhow::{Context, Result};
use zeroapp_core::config::Config;
use zeroapp_core::error::exit_codes;

use crate::server::{self, AppState};

/// Run the HTTP API until interrupted
pub fn run(config: &Config, host: Option<String>, port: Option<u16>) -> Result<i32> {
    let mut server_config = config.schema.server.clone();
    if let Some(host) = host {
        server_config.host = host;
    }
    if let Some(port) = port {
        server_config.port = port;
    }

    let state = AppState::new(&config.schema)?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("Failed to start async runtime")?;
    runtime.block_on(server::serve(state, &server_config))?;

    Ok(exit_codes::SUCCESS)
}
