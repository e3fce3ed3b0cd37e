/// Daisy Player - headless client
///
/// Wires the player, library, storage and catalog crates together behind a
/// command line. A simulated audio backend stands in for the platform
/// decoder, so every transport feature can be exercised without a device.
pub mod account;
pub mod app;
pub mod commands;
pub mod config;
pub mod error;

pub use app::App;
pub use config::AppConfig;
