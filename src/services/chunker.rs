//! Chunker - service layer
//!
//! Splits extracted document text into ordered, non-overlapping word chunks.

use crate::models::Chunk;
use tracing::debug;

/// Default chunk size in characters
pub const DEFAULT_TARGET_SIZE: usize = 1000;

/// Word-based chunker
///
/// Each word counts its length plus one for the separator. A chunk closes as
/// soon as the running total reaches `target_size`, so a chunk may overshoot
/// the target by up to one word.
#[derive(Debug, Clone, Copy)]
pub struct Chunker {
    target_size: usize,
}

impl Chunker {
    pub fn new(target_size: usize) -> Self {
        Self {
            target_size: target_size.max(1),
        }
    }

    pub fn target_size(&self) -> usize {
        self.target_size
    }

    /// Split `text` into chunks
    ///
    /// Empty or whitespace-only input yields no chunks.
    pub fn chunk(&self, text: &str) -> Vec<Chunk> {
        let mut chunks = Vec::new();
        let mut current: Vec<&str> = Vec::new();
        let mut current_len = 0usize;

        for word in text.split_whitespace() {
            current_len += word.chars().count() + 1;
            current.push(word);

            if current_len >= self.target_size {
                chunks.push(Chunk::new(chunks.len(), current.join(" ")));
                current.clear();
                current_len = 0;
            }
        }

        if !current.is_empty() {
            chunks.push(Chunk::new(chunks.len(), current.join(" ")));
        }

        debug!(
            "chunked {} chars into {} chunks (target {})",
            text.len(),
            chunks.len(),
            self.target_size
        );

        chunks
    }
}

impl Default for Chunker {
    fn default() -> Self {
        Self::new(DEFAULT_TARGET_SIZE)
    }
}

/// Shorthand for `Chunker::new(target_size).chunk(text)`
pub fn chunk(text: &str, target_size: usize) -> Vec<Chunk> {
    Chunker::new(target_size).chunk(text)
}
