//! Command handlers for CLI subcommands
//!
//! Each subcommand has its own module; this module re-exports the entry points.

mod completions;
mod config;
mod kinds;
mod process;
mod utils;
mod validate;

pub use completions::handle_completions;
pub use config::handle_config;
pub use kinds::handle_kinds;
pub use process::handle_process;
pub use validate::handle_validate;
