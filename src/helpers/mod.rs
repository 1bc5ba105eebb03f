//! Helper functions for templates
//!
//! Date formatting and URL building shared by the generator and the
//! development server.

mod date;
mod url;

pub use date::*;
pub use url::*;
