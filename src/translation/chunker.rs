/*!
 * Heading-aligned document chunking.
 */

use super::fences::{fence_marker, FenceMarker};

/// Splits a placeholder-substituted document into request-sized pieces
#[derive(Debug, Clone, Copy)]
pub struct Chunker {
    /// Lines a chunk must reach before a heading may start the next one
    min_lines: usize,
    /// When false the whole document is a single chunk
    enabled: bool,
}

impl Chunker {
    /// Create a chunker that splits at headings once `min_lines` is reached
    pub fn new(min_lines: usize) -> Self {
        Self {
            min_lines: min_lines.max(1),
            enabled: true,
        }
    }

    /// Create a chunker that never splits
    pub fn disabled() -> Self {
        Self {
            min_lines: usize::MAX,
            enabled: false,
        }
    }

    /// Build from the two configuration knobs
    pub fn from_settings(enabled: bool, min_lines: usize) -> Self {
        if enabled {
            Self::new(min_lines)
        } else {
            Self::disabled()
        }
    }

    /// Split `lines` into ordered chunks
    ///
    /// Joining the result with `\n` gives back `lines.join("\n")`. An empty
    /// document yields no chunks at all. Fence state is tracked here too, so
    /// a `#` comment inside a code block that was not swapped out never
    /// starts a chunk.
    pub fn split(&self, lines: &[String]) -> Vec<String> {
        if lines.is_empty() {
            return Vec::new();
        }
        if !self.enabled {
            return vec![lines.join("\n")];
        }

        let mut chunks = Vec::new();
        let mut current: Vec<&str> = Vec::new();
        let mut open: Option<FenceMarker> = None;

        for line in lines {
            if open.is_none() && current.len() >= self.min_lines && line.starts_with('#') {
                chunks.push(current.join("\n"));
                current.clear();
            }

            if let Some(marker) = fence_marker(line) {
                open = match open {
                    None => Some(marker),
                    Some(opened_with) if opened_with == marker => None,
                    still_open => still_open,
                };
            }

            current.push(line);
        }

        if !current.is_empty() {
            chunks.push(current.join("\n"));
        }

        chunks
    }
}
