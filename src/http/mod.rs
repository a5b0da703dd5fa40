//! HTTP protocol layer module
//!
//! Response builders and header helpers shared by the router and API handlers.

pub mod response;

// Re-export commonly used builders
pub use response::{
    apply_cors, build_404_response, build_error_response, build_json_response,
    build_options_response, build_serialized_response, build_text_response,
};
