//! Recursive-boundary text splitting.
//!
//! Splits a transcript into overlapping chunks, preferring to break at
//! paragraph, then line, then word boundaries before falling back to raw
//! character positions. The overlap keeps sentence-boundary context from
//! being lost at chunk edges.
//!
//! Splitting is deterministic: the same text always yields the same chunks.

use std::collections::VecDeque;

/// Boundary preference order. The empty separator means character-level.
const SEPARATORS: &[&str] = &["\n\n", "\n", " ", ""];

/// Recursive character splitter with a target chunk size and inter-chunk
/// overlap, both measured in characters.
#[derive(Debug, Clone)]
pub struct RecursiveCharacterSplitter {
    chunk_size: usize,
    chunk_overlap: usize,
}

impl RecursiveCharacterSplitter {
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Self {
        assert!(chunk_size > 0, "chunk_size must be positive");
        assert!(
            chunk_overlap < chunk_size,
            "chunk_overlap must be smaller than chunk_size"
        );
        Self {
            chunk_size,
            chunk_overlap,
        }
    }

    /// Split text into an ordered sequence of chunks.
    pub fn split(&self, text: &str) -> Vec<String> {
        if text.is_empty() {
            return Vec::new();
        }
        self.split_recursive(text, SEPARATORS)
    }

    fn split_recursive(&self, text: &str, separators: &[&str]) -> Vec<String> {
        // Pick the first separator that occurs in the text; the final ""
        // always matches and splits into characters.
        let (position, separator) = separators
            .iter()
            .enumerate()
            .find(|(_, sep)| sep.is_empty() || text.contains(**sep))
            .map(|(i, sep)| (i, *sep))
            .unwrap_or((separators.len() - 1, ""));
        let remaining = &separators[position + 1..];

        let splits: Vec<String> = if separator.is_empty() {
            text.chars().map(|c| c.to_string()).collect()
        } else {
            text.split(separator)
                .filter(|s| !s.is_empty())
                .map(|s| s.to_string())
                .collect()
        };

        let mut final_chunks = Vec::new();
        let mut good_splits: Vec<String> = Vec::new();

        for piece in splits {
            if piece.chars().count() < self.chunk_size {
                good_splits.push(piece);
            } else {
                // Flush accumulated small pieces, then recurse into the
                // oversized one with finer separators.
                if !good_splits.is_empty() {
                    final_chunks.extend(self.merge_splits(&good_splits, separator));
                    good_splits.clear();
                }
                if remaining.is_empty() {
                    final_chunks.push(piece);
                } else {
                    final_chunks.extend(self.split_recursive(&piece, remaining));
                }
            }
        }

        if !good_splits.is_empty() {
            final_chunks.extend(self.merge_splits(&good_splits, separator));
        }

        final_chunks
    }

    /// Greedily merge small pieces into chunks up to `chunk_size`, carrying
    /// a tail of up to `chunk_overlap` characters into the next chunk.
    fn merge_splits(&self, splits: &[String], separator: &str) -> Vec<String> {
        let sep_len = separator.chars().count();
        let mut chunks = Vec::new();
        let mut current: VecDeque<&String> = VecDeque::new();
        let mut total = 0usize;

        for piece in splits {
            let piece_len = piece.chars().count();
            let join_len = if current.is_empty() { 0 } else { sep_len };

            if total + piece_len + join_len > self.chunk_size && !current.is_empty() {
                if let Some(chunk) = join_pieces(&current, separator) {
                    chunks.push(chunk);
                }
                // Drop leading pieces until what remains fits the overlap
                // and leaves room for the incoming piece.
                while total > self.chunk_overlap
                    || (!current.is_empty()
                        && total + piece_len + if current.is_empty() { 0 } else { sep_len }
                            > self.chunk_size)
                {
                    match current.pop_front() {
                        Some(first) => {
                            let extra = if current.is_empty() { 0 } else { sep_len };
                            total -= first.chars().count() + extra;
                        }
                        None => break,
                    }
                }
            }

            let join_len = if current.is_empty() { 0 } else { sep_len };
            total += piece_len + join_len;
            current.push_back(piece);
        }

        if let Some(chunk) = join_pieces(&current, separator) {
            chunks.push(chunk);
        }

        chunks
    }
}

/// Join pieces with the separator, skipping all-whitespace results.
fn join_pieces(pieces: &VecDeque<&String>, separator: &str) -> Option<String> {
    if pieces.is_empty() {
        return None;
    }
    let joined = pieces
        .iter()
        .map(|s| s.as_str())
        .collect::<Vec<_>>()
        .join(separator);
    if joined.trim().is_empty() {
        None
    } else {
        Some(joined)
    }
}
