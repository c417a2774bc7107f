/*!
 * # docs-translate
 *
 * Translate a Markdown documentation tree into other languages with a hosted
 * language model.
 *
 * ## Features
 *
 * - Mirror `docs/<path>.md` to `docs/<lang>/<path>.md` for every configured language
 * - Keep fenced code blocks out of the model's reach with `CODE_BLOCK_NN` placeholders
 * - Optional heading-aligned chunking of long pages
 * - Per-language prompt rules: do-not-translate terms, term mappings, typography
 * - Timestamp-based incremental runs and a bounded worker pool
 * - Relocation of translated include fragments to `docs/includes/<lang>/`
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management
 * - `translation`: Single-document pipeline:
 *   - `translation::fences`: Code block protection
 *   - `translation::chunker`: Heading-aligned chunking
 *   - `translation::instructions`: Prompt construction
 *   - `translation::core`: Document translator
 * - `providers`: Model clients (`openai`) and a test double (`mock`)
 * - `file_utils`: File system operations
 * - `includes`: Include fragment relocation
 * - `app_controller`: Main application controller
 * - `language_utils`: ISO language code utilities
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod app_controller;
pub mod errors;
pub mod file_utils;
pub mod includes;
pub mod language_utils;
pub mod providers;
pub mod translation;

// Re-export main types for easier usage
pub use app_config::{Config, ConfigOverrides, LanguageTarget, LogLevel};
pub use app_controller::{Controller, JobOutcome, RunSummary, TranslationJob};
pub use errors::{AppError, DocumentError, ProviderError, TranslationError};
pub use includes::{relocate_includes, Relocation};
pub use language_utils::{get_language_name, normalize_to_part2t};
pub use providers::Translator;
pub use translation::{build_instructions, extract_code_blocks, Chunker, DocumentTranslator};
