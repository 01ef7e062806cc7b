//! URL handling module for Ideia-Crawler
//!
//! This module provides seed URL validation, resolution of `href` values
//! found in pages, and the `page=` query helpers used by pagination.

mod parse;
mod query;
mod resolve;

// Re-export main functions
pub use parse::parse_http_url;
pub use query::{page_number, with_page, PAGE_PARAM};
pub use resolve::resolve_href;
