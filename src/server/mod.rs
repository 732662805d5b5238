// Server module entry
// Listener setup, the accept loop, and interrupt handling.

pub mod listener;
pub mod signal;

// `loop` is a keyword, so the module is declared as server_loop.
#[path = "loop.rs"]
pub mod server_loop;

pub use listener::create_reusable_listener;
pub use server_loop::run_accept_loop;
pub use signal::{start_signal_handler, SignalHandler};
