//! Request handler module
//!
//! Responsible for request routing dispatch; the endpoints themselves live in `api`.

pub mod router;

// Re-export main entry point
pub use router::handle_request;
