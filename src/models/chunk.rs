use serde::{Deserialize, Serialize};

/// A contiguous slice of a document's word stream
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chunk {
    /// Position of the chunk inside its document (0-based)
    pub index: usize,
    /// Words of the slice joined by single spaces
    pub content: String,
}

impl Chunk {
    pub fn new(index: usize, content: impl Into<String>) -> Self {
        Self {
            index,
            content: content.into(),
        }
    }

    /// Character count of the content
    pub fn char_count(&self) -> usize {
        self.content.chars().count()
    }
}

/// A chunk paired with its relevance score for one query
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RankedResult<'a> {
    pub chunk: &'a Chunk,
    pub score: f64,
}
