mod commands;
mod watcher;

pub use commands::{Cli, Command, OutputFormat};
pub use watcher::LayoutWatcher;
