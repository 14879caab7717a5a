//! Remote model provider.
//!
//! Both calls are single blocking HTTPS JSON requests with a bearer token.
//! There is no retry: failures go straight back to the caller.

use crate::Result;

#[cfg(feature = "remote")]
mod ark;
#[cfg(feature = "remote")]
pub use ark::ArkClient;

/// What the popup needs from a model provider
pub trait ModelProvider: Send + Sync {
    /// Summarize `text`, returning the summary
    fn summarize(&self, text: &str) -> Result<String>;

    /// Generate a picture for `prompt`, returning its URL
    fn generate_image(&self, prompt: &str) -> Result<String>;
}
