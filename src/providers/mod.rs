/*!
 * Provider implementations for translation services.
 *
 * This module contains the client used to reach the hosted model and the
 * narrow `Translator` seam the rest of the crate depends on:
 * - OpenAI: Azure OpenAI deployments and OpenAI-compatible chat completions
 * - Mock: scripted translator for tests
 */

use async_trait::async_trait;
use std::fmt::Debug;

use crate::errors::{ProviderError, TranslationError};

/// Common trait for all LLM providers
///
/// This trait defines the wire-level interface of a provider: typed request
/// in, typed response out.
#[async_trait]
pub trait Provider: Send + Sync + Debug {
    /// The request type for this provider
    type Request: Send + Sync;

    /// The response type for this provider
    type Response: Send + Sync;

    /// Complete a request using this provider
    ///
    /// # Arguments
    /// * `request` - The request to complete
    ///
    /// # Returns
    /// * `Result<Self::Response, ProviderError>` - The response from the provider or an error
    async fn complete(&self, request: Self::Request) -> Result<Self::Response, ProviderError>;

    /// Extract text from the provider response
    ///
    /// # Arguments
    /// * `response` - The response from the provider
    ///
    /// # Returns
    /// * `Option<String>` - The extracted text, if the response carried any
    fn extract_text(response: &Self::Response) -> Option<String>;
}

/// Turns one chunk of Markdown into the target language
///
/// One call is one remote request. Implementations do not retry; any
/// failure is returned to the caller and is fatal for the current file.
#[async_trait]
pub trait Translator: Send + Sync + Debug {
    /// Translate `text` following the system `instructions`
    async fn translate(&self, instructions: &str, text: &str) -> Result<String, TranslationError>;

    /// Short label for logs, e.g. provider and model
    fn describe(&self) -> String;
}

pub mod mock;
pub mod openai;
