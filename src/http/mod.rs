//! HTTP module entry
//!
//! Response building, content-type guessing, date handling, and the
//! no-cache header set.

pub mod date;
pub mod mime;
pub mod nocache;
pub mod response;

pub use response::{
    build_304_response, build_404_response, build_405_response, build_500_response,
    build_file_response, build_html_response, build_options_response, build_redirect_response,
};
