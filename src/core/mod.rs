//! Process-wide state shared by the server, the watcher and the CLI.

mod state;

pub use state::{is_shutdown, register_server, setup_shutdown_handler};
