//! Interactive mode for the server.
//!
//! Prompts the user for bind address, port, and map adapter before
//! starting the server.

use dialoguer::{Confirm, Input, Select};
use flood_map_map::AdapterKind;

use crate::config::{DEFAULT_BIND_ADDR, DEFAULT_PORT, ServerConfig};

/// Runs the server in interactive mode, prompting for configuration.
///
/// Starts from [`ServerConfig::from_env`] (falling back to the defaults
/// when the environment is invalid), asks for the bind address, port, and
/// map adapter, and delegates to [`crate::run_server`].
///
/// # Errors
///
/// Returns an `std::io::Result` error if the underlying server fails to
/// start.
#[allow(clippy::future_not_send)]
pub async fn run() -> std::io::Result<()> {
    println!("Singapore Flood Risk Map Server");
    println!();

    let mut config = ServerConfig::from_env().unwrap_or_else(|e| {
        log::warn!("Ignoring invalid environment: {e}");
        ServerConfig::default()
    });

    config.bind_addr = Input::new()
        .with_prompt("Bind address")
        .default(config.bind_addr.clone())
        .interact_text()
        .unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string());

    config.port = Input::new()
        .with_prompt("Port")
        .default(config.port)
        .interact_text()
        .unwrap_or(DEFAULT_PORT);

    let adapters = AdapterKind::all();
    let labels: Vec<String> = adapters.iter().map(ToString::to_string).collect();
    let current = adapters
        .iter()
        .position(|kind| *kind == config.adapter)
        .unwrap_or(0);
    let idx = Select::new()
        .with_prompt("Map adapter")
        .items(&labels)
        .default(current)
        .interact()
        .unwrap_or(current);
    config.adapter = adapters[idx];

    if !Confirm::new()
        .with_prompt(format!(
            "Start server on {}:{} with the {} map?",
            config.bind_addr, config.port, config.adapter
        ))
        .default(true)
        .interact()
        .unwrap_or(true)
    {
        println!("Cancelled.");
        return Ok(());
    }

    crate::run_server(config).await
}
