use std::borrow::Cow;

use serde::Serialize;

/// Body sent to the upstream completion endpoint
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompletionPayload<'a> {
    pub prompt: Cow<'a, str>,
    pub model: &'a str,
    pub temperature: f64,
    pub max_tokens: u32,
}
