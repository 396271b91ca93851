//! HTTP plumbing: client construction and response error classification.

mod client;
mod error;

pub use client::{build_client, mask_token, user_agent};
pub use error::{ApiError, check_status};
