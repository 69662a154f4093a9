#[cfg(feature = "cli")]
pub mod cli;
pub mod snapshot;
pub mod toml_config;

#[cfg(feature = "cli")]
pub use cli::CliConfig;
