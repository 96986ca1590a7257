//! Serve command implementation.

use crate::config::AppConfig;
use crate::error::Result;
use crate::server::Server;

/// Execute the serve command: run the HTTP server until shutdown.
///
/// # Errors
///
/// Returns an error if the runtime cannot start, the address cannot be
/// bound, or the server fails.
pub fn execute(config: &AppConfig) -> Result<()> {
    tracing::info!(
        data = %config.data_path.display(),
        addr = %config.addr,
        "Starting issue API"
    );

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    runtime.block_on(Server::from_app_config(config).run())
}
