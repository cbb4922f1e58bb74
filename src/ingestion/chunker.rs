//! Word-window text chunking

use crate::errors::{DeskError, Result};

/// Default window length in words
pub const DEFAULT_CHUNK_SIZE: usize = 500;

/// Default number of words shared by consecutive windows
pub const DEFAULT_CHUNK_OVERLAP: usize = 50;

/// Splits text into overlapping fixed-size word windows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Chunker {
    size: usize,
    overlap: usize,
}

impl Chunker {
    /// Create a chunker; `overlap` must be smaller than a non-zero `size`
    pub fn new(size: usize, overlap: usize) -> Result<Self> {
        if size == 0 || overlap >= size {
            return Err(DeskError::InvalidChunking { size, overlap });
        }
        Ok(Self { size, overlap })
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn overlap(&self) -> usize {
        self.overlap
    }

    /// Words each window advances by
    pub fn step(&self) -> usize {
        self.size - self.overlap
    }

    /// Split `text` into windows of at most `size` words
    ///
    /// The final window may be shorter than `size`. Windows that are empty
    /// after trimming are not emitted.
    pub fn chunk(&self, text: &str) -> Vec<String> {
        let words: Vec<&str> = text.split_whitespace().collect();
        let mut chunks = Vec::new();

        let mut start = 0;
        while start < words.len() {
            let end = (start + self.size).min(words.len());
            let window = words[start..end].join(" ");
            if !window.trim().is_empty() {
                chunks.push(window);
            }
            start += self.step();
        }

        chunks
    }
}

impl Default for Chunker {
    fn default() -> Self {
        Self {
            size: DEFAULT_CHUNK_SIZE,
            overlap: DEFAULT_CHUNK_OVERLAP,
        }
    }
}

/// Chunk `text` with an ad-hoc window configuration
pub fn chunk(text: &str, size: usize, overlap: usize) -> Result<Vec<String>> {
    Ok(Chunker::new(size, overlap)?.chunk(text))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn numbered_words(count: usize) -> String {
        (0..count)
            .map(|i| format!("w{}", i))
            .collect::<Vec<_>>()
            .join(" ")
    }

    #[test]
    fn test_default_window() {
        let chunker = Chunker::default();
        assert_eq!(chunker.size(), 500);
        assert_eq!(chunker.overlap(), 50);
        assert_eq!(chunker.step(), 450);
    }

    #[test]
    fn test_1200_words_overlap_exactly_50() {
        let text = numbered_words(1200);
        let chunks = chunk(&text, 500, 50).unwrap();

        let lengths: Vec<usize> = chunks.iter().map(|c| c.split_whitespace().count()).collect();
        assert_eq!(lengths, vec![500, 500, 300]);

        for pair in chunks.windows(2) {
            let first: Vec<&str> = pair[0].split_whitespace().collect();
            let second: Vec<&str> = pair[1].split_whitespace().collect();
            assert_eq!(&first[first.len() - 50..], &second[..50]);
        }
    }

    #[test]
    fn test_short_text_single_window() {
        let chunks = chunk("just a few words", 500, 50).unwrap();
        assert_eq!(chunks, vec!["just a few words".to_string()]);
    }

    #[test]
    fn test_whitespace_only_text_yields_nothing() {
        assert!(chunk("   \n\t ", 10, 2).unwrap().is_empty());
        assert!(chunk("", 10, 2).unwrap().is_empty());
    }

    #[test]
    fn test_collapses_internal_whitespace() {
        let chunks = chunk("a\n\nb   c", 10, 0).unwrap();
        assert_eq!(chunks, vec!["a b c".to_string()]);
    }

    #[test]
    fn test_overlap_not_smaller_than_size_is_rejected() {
        assert!(matches!(
            Chunker::new(50, 50),
            Err(DeskError::InvalidChunking { size: 50, overlap: 50 })
        ));
        assert!(Chunker::new(10, 20).is_err());
        assert!(Chunker::new(0, 0).is_err());
    }

    #[test]
    fn test_zero_overlap_partitions_words() {
        let text = numbered_words(25);
        let chunks = chunk(&text, 10, 0).unwrap();
        assert_eq!(chunks.len(), 3);
        assert!(chunks[2].starts_with("w20"));
    }
}
