//! # Quill Shared
//!
//! Types exchanged between the server and the front end that renders the
//! pages: request bodies, JSON page models and response envelopes.

pub mod dto;
pub mod response;
pub mod text;

pub use response::{ApiResponse, ErrorResponse};
