//! Recursive character text splitter.
//!
//! Splits on the coarsest separator that appears in the text (paragraph,
//! line, word, character), recursing into finer separators for any piece
//! that is still larger than the chunk size, then merges pieces into chunks
//! with a sliding overlap window.

use std::collections::VecDeque;

/// Separator cascade, coarsest first. The empty string is the character-level
/// fallback and always matches.
const SEPARATORS: &[&str] = &["\n\n", "\n", " ", ""];

const DEFAULT_CHUNK_SIZE: usize = 500;
const DEFAULT_CHUNK_OVERLAP: usize = 50;

pub struct RecursiveCharacterSplitter {
    chunk_size: usize,
    chunk_overlap: usize,
}

impl Default for RecursiveCharacterSplitter {
    fn default() -> Self {
        Self::new(DEFAULT_CHUNK_SIZE, DEFAULT_CHUNK_OVERLAP)
    }
}

impl RecursiveCharacterSplitter {
    /// `chunk_overlap` must be smaller than `chunk_size`.
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Self {
        debug_assert!(chunk_overlap < chunk_size);
        Self {
            chunk_size,
            chunk_overlap,
        }
    }

    pub fn split_text(&self, text: &str) -> Vec<String> {
        self.split_with(text, SEPARATORS)
    }

    fn split_with(&self, text: &str, separators: &[&str]) -> Vec<String> {
        // Coarsest separator that occurs in the text wins; the rest are kept
        // for recursion into oversized pieces.
        let mut separator = *separators.last().unwrap_or(&"");
        let mut remaining: &[&str] = &[];
        for (i, sep) in separators.iter().enumerate() {
            if sep.is_empty() || text.contains(sep) {
                separator = sep;
                remaining = &separators[i + 1..];
                break;
            }
        }

        let splits: Vec<String> = if separator.is_empty() {
            text.chars().map(String::from).collect()
        } else {
            text.split(separator)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect()
        };

        let mut chunks = Vec::new();
        let mut good: Vec<String> = Vec::new();
        for piece in splits {
            if char_len(&piece) < self.chunk_size {
                good.push(piece);
            } else {
                if !good.is_empty() {
                    chunks.extend(self.merge(&good, separator));
                    good.clear();
                }
                if remaining.is_empty() {
                    chunks.push(piece);
                } else {
                    chunks.extend(self.split_with(&piece, remaining));
                }
            }
        }
        if !good.is_empty() {
            chunks.extend(self.merge(&good, separator));
        }
        chunks
    }

    /// Greedily packs pieces into chunks of at most `chunk_size`, carrying
    /// a trailing window of at most `chunk_overlap` into the next chunk.
    fn merge(&self, splits: &[String], separator: &str) -> Vec<String> {
        let sep_len = char_len(separator);
        let mut docs: Vec<String> = Vec::new();
        let mut current: VecDeque<&String> = VecDeque::new();
        let mut total = 0usize;

        for piece in splits {
            let len = char_len(piece);
            let joined_len = total + len + if current.is_empty() { 0 } else { sep_len };
            if joined_len > self.chunk_size && !current.is_empty() {
                push_doc(&mut docs, &current, separator);
                // Shrink the window until the overlap budget holds and the
                // incoming piece fits.
                while total > self.chunk_overlap
                    || (total + len + if current.is_empty() { 0 } else { sep_len }
                        > self.chunk_size
                        && total > 0)
                {
                    let Some(first) = current.pop_front() else {
                        break;
                    };
                    total -= char_len(first) + if current.is_empty() { 0 } else { sep_len };
                }
            }
            total += len + if current.is_empty() { 0 } else { sep_len };
            current.push_back(piece);
        }

        push_doc(&mut docs, &current, separator);
        docs
    }
}

fn char_len(s: &str) -> usize {
    s.chars().count()
}

fn push_doc(docs: &mut Vec<String>, pieces: &VecDeque<&String>, separator: &str) {
    let doc = pieces
        .iter()
        .map(|s| s.as_str())
        .collect::<Vec<_>>()
        .join(separator)
        .trim()
        .to_string();
    if !doc.is_empty() {
        docs.push(doc);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_text_is_one_chunk() {
        let splitter = RecursiveCharacterSplitter::default();
        let chunks = splitter.split_text("A short resume line.");
        assert_eq!(chunks, vec!["A short resume line.".to_string()]);
    }

    #[test]
    fn test_chunks_respect_size_limit() {
        let splitter = RecursiveCharacterSplitter::new(50, 10);
        let text = "word ".repeat(100);
        for chunk in splitter.split_text(&text) {
            assert!(chunk.chars().count() <= 50, "oversized chunk: {chunk:?}");
        }
    }

    #[test]
    fn test_paragraph_boundaries_preferred() {
        let splitter = RecursiveCharacterSplitter::new(30, 0);
        let chunks = splitter.split_text("first paragraph\n\nsecond paragraph");
        assert_eq!(chunks, vec!["first paragraph", "second paragraph"]);
    }

    #[test]
    fn test_no_content_lost() {
        let splitter = RecursiveCharacterSplitter::new(40, 8);
        let text = "Rust Go Python Java Kotlin Swift Erlang Elixir Haskell OCaml";
        let chunks = splitter.split_text(text);
        let combined = chunks.join(" ");
        for word in text.split(' ') {
            assert!(combined.contains(word), "missing word: {word}");
        }
    }

    #[test]
    fn test_overlap_carries_tail_forward() {
        let splitter = RecursiveCharacterSplitter::new(20, 8);
        let chunks = splitter.split_text("aaaa bbbb cccc dddd eeee ffff");
        assert!(chunks.len() >= 2);
        for pair in chunks.windows(2) {
            let tail_word = pair[0].split(' ').last().unwrap();
            assert!(
                pair[1].starts_with(tail_word),
                "no overlap between {:?} and {:?}",
                pair[0],
                pair[1]
            );
        }
    }

    #[test]
    fn test_unbroken_run_falls_back_to_characters() {
        let splitter = RecursiveCharacterSplitter::new(10, 2);
        let chunks = splitter.split_text(&"x".repeat(35));
        assert!(chunks.len() > 1);
        for chunk in &chunks {
            assert!(chunk.chars().count() <= 10);
        }
    }

    #[test]
    fn test_empty_text_yields_no_chunks() {
        let splitter = RecursiveCharacterSplitter::default();
        assert!(splitter.split_text("").is_empty());
        assert!(splitter.split_text("   \n\n  ").is_empty());
    }
}
