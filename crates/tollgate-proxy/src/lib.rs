//! Relay of prompts to the upstream completion API
//!
//! The inbound body becomes the `prompt` of a fixed-shape completion
//! payload. The upstream status and body are handed back untouched.

#![allow(clippy::missing_errors_doc, clippy::must_use_candidate)]

mod error;
mod forwarder;
mod payload;

pub use error::ForwardError;
pub use forwarder::{ProxyForwarder, UpstreamResponse};
pub use payload::CompletionPayload;
