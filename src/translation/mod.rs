/*!
 * Markdown document translation.
 *
 * This module contains everything that happens to a single document:
 *
 * - `fences`: code block extraction and restoration
 * - `chunker`: heading-aligned splitting into requests
 * - `instructions`: system prompt construction
 * - `core`: the per-document pipeline tying them together
 */

// Re-export main types for easier usage
pub use self::chunker::Chunker;
pub use self::core::{finalize_output, is_include_path, DocumentTranslator, SEARCH_EXCLUSION};
pub use self::fences::{extract_code_blocks, placeholder, ExtractedDocument};
pub use self::instructions::build_instructions;

// Submodules
pub mod chunker;
pub mod core;
pub mod fences;
pub mod instructions;
