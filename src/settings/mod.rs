//! Layered settings: a TOML file picked by `--settings`, then environment overrides.

mod cli;
pub use clap::Parser;
pub use cli::*;

mod settings;
pub use settings::*;
