// Request handling module entry

pub mod listing;
pub mod router;
pub mod static_files;

pub use router::handle_request;
