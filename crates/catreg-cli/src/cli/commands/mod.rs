//! CLI command handlers, one file per command.

mod config;
mod container;
mod preview;
mod register;
mod session;

pub use config::run_config;
pub use container::run_container;
pub use preview::run_preview;
pub use register::run_register;
pub use session::PublishOptions;
