/*!
 * Core document translation.
 *
 * `DocumentTranslator` runs one Markdown document through the whole
 * pipeline: protect code blocks, chunk, translate chunk by chunk, stitch the
 * result back together and restore the code.
 */

use log::debug;
use std::path::{Component, Path};
use std::sync::Arc;

use crate::app_config::Config;
use crate::errors::AppError;
use crate::providers::Translator;

use super::chunker::Chunker;
use super::fences::{extract_code_blocks, ExtractedDocument};

/// Front matter that keeps translated pages out of the site search index
pub const SEARCH_EXCLUSION: &str = "---\nsearch:\n  exclude: true\n---\n";

/// Directory name of shared fragments, which never get front matter
pub const INCLUDES_DIR: &str = "includes";

/// Translates whole documents through a `Translator`
#[derive(Debug, Clone)]
pub struct DocumentTranslator {
    /// Remote translator
    translator: Arc<dyn Translator>,
    /// Swap fenced code for placeholders before translating
    protect_code_blocks: bool,
    /// How documents are cut into requests
    chunker: Chunker,
}

impl DocumentTranslator {
    /// Create a document translator from explicit settings
    pub fn new(translator: Arc<dyn Translator>, protect_code_blocks: bool, chunker: Chunker) -> Self {
        Self {
            translator,
            protect_code_blocks,
            chunker,
        }
    }

    /// Create a document translator using the configured toggles
    pub fn from_config(translator: Arc<dyn Translator>, config: &Config) -> Self {
        Self::new(
            translator,
            config.enable_code_snippet_exclusion,
            Chunker::from_settings(config.enable_small_chunk_translation, config.max_chunk_lines),
        )
    }

    /// Translate a Markdown document
    ///
    /// Chunks are sent one after another in document order; the result is
    /// only assembled once every chunk is back. Blank chunks are kept as they
    /// are without a request.
    pub async fn translate_document(&self, content: &str, instructions: &str) -> Result<String, AppError> {
        let document = if self.protect_code_blocks {
            extract_code_blocks(content)?
        } else {
            ExtractedDocument::passthrough(content)
        };

        let chunks = self.chunker.split(&document.lines);
        debug!(
            "Document has {} code block(s), {} chunk(s)",
            document.code_blocks.len(),
            chunks.len()
        );

        let mut translated = Vec::with_capacity(chunks.len());
        for (index, chunk) in chunks.iter().enumerate() {
            if chunk.trim().is_empty() {
                translated.push(chunk.clone());
                continue;
            }
            debug!("Translating chunk {}/{} ({} lines)", index + 1, chunks.len(), chunk.lines().count());
            translated.push(self.translator.translate(instructions, chunk).await?);
        }

        Ok(document.restore(&translated.join("\n"))?)
    }
}

/// Whether a path relative to the source root lies inside an `includes` folder
pub fn is_include_path(relative: &Path) -> bool {
    relative
        .components()
        .any(|c| matches!(c, Component::Normal(name) if name == INCLUDES_DIR))
}

/// Prepend the search exclusion block unless the page is an include fragment
pub fn finalize_output(relative: &Path, body: String) -> String {
    if is_include_path(relative) {
        body
    } else {
        format!("{}{}", SEARCH_EXCLUSION, body)
    }
}
