/*!
 * Mock translator implementations for testing.
 *
 * This module provides a scripted translator that simulates different behaviors:
 * - `MockTranslator::identity()` - Returns the chunk unchanged
 * - `MockTranslator::working()` - Tags every prose line, keeps placeholders
 * - `MockTranslator::dropping_placeholders()` - Loses every code placeholder
 * - `MockTranslator::failing()` - Always fails with an API error
 */

use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::errors::{ProviderError, TranslationError};
use crate::providers::Translator;
use crate::translation::fences::PLACEHOLDER_PREFIX;

/// Prefix the working mock puts in front of translated lines
pub const TRANSLATED_TAG: &str = "[TRANSLATED] ";

/// One recorded call
#[derive(Debug, Clone)]
pub struct MockCall {
    /// System instructions received
    pub instructions: String,
    /// Chunk received
    pub text: String,
}

/// Behavior mode for the mock translator
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MockBehavior {
    /// Echo the chunk back
    Identity,
    /// Prefix every non-blank, non-placeholder line with `[TRANSLATED] `
    Working,
    /// Like `Working` but removes placeholder lines
    DropPlaceholders,
    /// Always fails with an error
    Failing,
    /// Fails only for chunks containing the given text
    FailOn(&'static str),
    /// Returns an empty response
    Empty,
}

/// Mock translator for testing the pipeline without network access
#[derive(Debug)]
pub struct MockTranslator {
    /// Behavior mode
    behavior: MockBehavior,
    /// Number of calls received, shared between clones
    call_count: Arc<AtomicUsize>,
    /// Every call received, shared between clones
    calls: Arc<Mutex<Vec<MockCall>>>,
}

impl MockTranslator {
    /// Create a new mock translator with the specified behavior
    pub fn new(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            call_count: Arc::new(AtomicUsize::new(0)),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Create a mock that echoes every chunk
    pub fn identity() -> Self {
        Self::new(MockBehavior::Identity)
    }

    /// Create a mock that tags prose lines as translated
    pub fn working() -> Self {
        Self::new(MockBehavior::Working)
    }

    /// Create a mock that loses code placeholders
    pub fn dropping_placeholders() -> Self {
        Self::new(MockBehavior::DropPlaceholders)
    }

    /// Create a failing mock that always errors
    pub fn failing() -> Self {
        Self::new(MockBehavior::Failing)
    }

    /// Number of translate calls so far
    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }

    /// Snapshot of every call received
    pub fn calls(&self) -> Vec<MockCall> {
        self.calls.lock().clone()
    }

    /// Apply the working transformation to a chunk
    pub fn tag_lines(text: &str, keep_placeholders: bool) -> String {
        text.split('\n')
            .filter(|line| keep_placeholders || !line.trim().starts_with(PLACEHOLDER_PREFIX))
            .map(|line| {
                if line.trim().is_empty() || line.trim().starts_with(PLACEHOLDER_PREFIX) {
                    line.to_string()
                } else {
                    format!("{}{}", TRANSLATED_TAG, line)
                }
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl Clone for MockTranslator {
    fn clone(&self) -> Self {
        Self {
            behavior: self.behavior,
            call_count: Arc::clone(&self.call_count),
            calls: Arc::clone(&self.calls),
        }
    }
}

#[async_trait]
impl Translator for MockTranslator {
    async fn translate(&self, instructions: &str, text: &str) -> Result<String, TranslationError> {
        let count = self.call_count.fetch_add(1, Ordering::SeqCst);
        self.calls.lock().push(MockCall {
            instructions: instructions.to_string(),
            text: text.to_string(),
        });

        match self.behavior {
            MockBehavior::Identity => Ok(text.to_string()),
            MockBehavior::Working => Ok(Self::tag_lines(text, true)),
            MockBehavior::DropPlaceholders => Ok(Self::tag_lines(text, false)),
            MockBehavior::Failing => Err(ProviderError::ApiError {
                status_code: 500,
                message: format!("Simulated provider failure (request #{})", count + 1),
            }
            .into()),
            MockBehavior::FailOn(needle) if text.contains(needle) => Err(ProviderError::ConnectionError(
                format!("Simulated failure for chunk containing '{}'", needle),
            )
            .into()),
            MockBehavior::FailOn(_) => Ok(Self::tag_lines(text, true)),
            MockBehavior::Empty => Err(TranslationError::EmptyResponse),
        }
    }

    fn describe(&self) -> String {
        format!("Mock - {:?}", self.behavior)
    }
}
