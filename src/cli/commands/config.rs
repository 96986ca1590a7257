//! Config command implementation.

use crate::config::AppConfig;
use crate::error::Result;

/// Execute the config command: print the resolved configuration.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn execute(config: &AppConfig, json: bool) -> Result<()> {
    if json {
        let payload = serde_json::to_string_pretty(config)?;
        println!("{payload}");
        return Ok(());
    }

    println!("data: {}", config.data_path.display());
    println!("addr: {}", config.addr);
    println!("cors: {}", config.cors);
    println!("log-json: {}", config.log_json);
    Ok(())
}
