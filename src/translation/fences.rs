/*!
 * Code fence protection.
 *
 * Fenced code blocks are swapped for opaque `CODE_BLOCK_NN` lines before a
 * document goes to the model and put back afterwards. Lines are split on
 * `\n` only, so a `\r` stays part of its line and CRLF documents survive the
 * round trip untouched.
 */

use once_cell::sync::Lazy;
use regex::Regex;

use crate::errors::DocumentError;

/// Prefix shared by every placeholder token
pub const PLACEHOLDER_PREFIX: &str = "CODE_BLOCK_";

static PLACEHOLDER_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"CODE_BLOCK_([0-9]{2,})").expect("placeholder pattern is valid"));

/// Marker that opened a fenced block
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FenceMarker {
    /// ```
    Backtick,
    /// ~~~
    Tilde,
}

/// Return the fence marker a line starts with, ignoring surrounding whitespace
pub fn fence_marker(line: &str) -> Option<FenceMarker> {
    let trimmed = line.trim();
    if trimmed.starts_with("```") {
        Some(FenceMarker::Backtick)
    } else if trimmed.starts_with("~~~") {
        Some(FenceMarker::Tilde)
    } else {
        None
    }
}

/// Placeholder token for the block at `index`
pub fn placeholder(index: usize) -> String {
    format!("{}{:02}", PLACEHOLDER_PREFIX, index)
}

/// A document whose code blocks have been swapped for placeholders
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedDocument {
    /// Translatable lines, one placeholder line per code block
    pub lines: Vec<String>,
    /// Original block text (fences included), indexed by placeholder number
    pub code_blocks: Vec<String>,
    /// Whether the source ended with a newline
    pub trailing_newline: bool,
    /// False when extraction was switched off and the text passed through
    protected: bool,
}

impl ExtractedDocument {
    /// Wrap a document without touching its code blocks
    pub fn passthrough(content: &str) -> Self {
        let (lines, trailing_newline) = split_lines(content);
        Self {
            lines,
            code_blocks: Vec::new(),
            trailing_newline,
            protected: false,
        }
    }

    /// The placeholder-substituted text that is sent for translation
    pub fn text(&self) -> String {
        self.lines.join("\n")
    }

    /// Put the original code blocks back into a translated text
    ///
    /// Every block must be referenced exactly once. Anything else means the
    /// model dropped, duplicated, altered or invented a placeholder and the
    /// output would lose code, so it is reported instead of written.
    ///
    /// The trailing newlines of the result always follow the source, however
    /// many the model added or dropped at the end of its reply.
    pub fn restore(&self, translated: &str) -> Result<String, DocumentError> {
        let restored = if self.protected {
            self.substitute_blocks(translated)?
        } else {
            translated.to_string()
        };

        let mut restored = restored.trim_end_matches('\n').to_string();
        for _ in 0..self.trailing_newlines() {
            restored.push('\n');
        }
        Ok(restored)
    }

    /// Number of `\n` the source ended with
    fn trailing_newlines(&self) -> usize {
        let text = self.text();
        let in_text = text.len() - text.trim_end_matches('\n').len();
        in_text + usize::from(self.trailing_newline)
    }

    fn substitute_blocks(&self, translated: &str) -> Result<String, DocumentError> {
        let mut seen = vec![0usize; self.code_blocks.len()];
        let mut unknown = Vec::new();
        let mut altered = Vec::new();

        let restored = PLACEHOLDER_PATTERN.replace_all(translated, |caps: &regex::Captures| {
            let token = &caps[0];
            match caps[1].parse::<usize>() {
                Ok(index) if index < self.code_blocks.len() => {
                    seen[index] += 1;
                    self.code_blocks[index].clone()
                }
                Ok(index) => {
                    unknown.push(index);
                    token.to_string()
                }
                Err(_) => {
                    altered.push(token.to_string());
                    token.to_string()
                }
            }
        });

        let missing: Vec<usize> = (0..seen.len()).filter(|&i| seen[i] == 0).collect();
        let duplicated: Vec<usize> = (0..seen.len()).filter(|&i| seen[i] > 1).collect();
        unknown.sort_unstable();
        unknown.dedup();

        if missing.is_empty() && duplicated.is_empty() && unknown.is_empty() && altered.is_empty() {
            Ok(restored.into_owned())
        } else {
            Err(DocumentError::PlaceholderMismatch {
                missing,
                duplicated,
                unknown,
                altered,
            })
        }
    }
}

/// Split on `\n`, remembering whether the text ended with one
fn split_lines(content: &str) -> (Vec<String>, bool) {
    let lines = content.split_terminator('\n').map(str::to_string).collect();
    (lines, content.ends_with('\n'))
}

/// Replace every fenced code block with a placeholder line
///
/// A block opened with backticks only closes on a backtick fence and a
/// tilde block only on a tilde fence; the other marker inside a block is
/// ordinary content. Indented (four-space) code is not a fence and stays
/// translatable.
pub fn extract_code_blocks(content: &str) -> Result<ExtractedDocument, DocumentError> {
    let (source_lines, trailing_newline) = split_lines(content);

    let mut lines = Vec::with_capacity(source_lines.len());
    let mut code_blocks = Vec::new();
    let mut current_block: Vec<String> = Vec::new();
    let mut open: Option<(FenceMarker, usize)> = None;

    for (index, line) in source_lines.into_iter().enumerate() {
        let marker = fence_marker(&line);

        match open {
            Some((opened_with, _)) => {
                current_block.push(line);
                if marker == Some(opened_with) {
                    code_blocks.push(current_block.join("\n"));
                    current_block.clear();
                    lines.push(placeholder(code_blocks.len() - 1));
                    open = None;
                }
            }
            None => {
                if let Some(marker) = marker {
                    current_block.push(line);
                    open = Some((marker, index + 1));
                    continue;
                }
                if let Some(found) = PLACEHOLDER_PATTERN.find(&line) {
                    return Err(DocumentError::PlaceholderCollision {
                        line: index + 1,
                        token: found.as_str().to_string(),
                    });
                }
                lines.push(line);
            }
        }
    }

    if let Some((_, line)) = open {
        return Err(DocumentError::UnterminatedFence {
            line,
            captured: current_block.len(),
        });
    }

    Ok(ExtractedDocument {
        lines,
        code_blocks,
        trailing_newline,
        protected: true,
    })
}
