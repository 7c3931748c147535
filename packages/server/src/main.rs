#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Flood map server binary.
//!
//! Reads configuration from the environment and serves the page on
//! `BIND_ADDR:PORT`.

use flood_map_server::{ServerConfig, run_server};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let config = ServerConfig::from_env().map_err(std::io::Error::other)?;
    run_server(config).await
}
