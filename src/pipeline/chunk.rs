//! Text chunking: recursive character splitting with overlap.
//!
//! Splits the extracted document into bounded, ordered, overlapping chunks
//! so each summarization request stays within per-request size limits. The
//! algorithm is recursive character splitting: try paragraph breaks first,
//! then line breaks, then spaces, and finally fall back to splitting between
//! arbitrary characters — no semantic boundary awareness beyond that
//! best-effort delimiter ladder.
//!
//! Lengths are measured in `char`s, not bytes, so multi-byte text never
//! splits inside a code point.

/// Delimiters tried in order; the empty string always matches and splits
/// between individual characters.
const SEPARATORS: [&str; 4] = ["\n\n", "\n", " ", ""];

/// Splits text into chunks of at most `chunk_size` characters, neighbouring
/// chunks sharing roughly `chunk_overlap` characters.
///
/// Invariants:
/// * non-empty input yields a non-empty chunk list,
/// * chunk order follows document order,
/// * concatenating the chunks (minus overlaps) reconstructs the document,
///   modulo whitespace consumed by the delimiters split upon.
#[derive(Debug, Clone)]
pub struct TextSplitter {
    chunk_size: usize,
    chunk_overlap: usize,
}

impl TextSplitter {
    /// `chunk_overlap` must be smaller than `chunk_size`; the config layer
    /// validates this before a splitter is ever constructed.
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Self {
        debug_assert!(chunk_overlap < chunk_size);
        Self {
            chunk_size: chunk_size.max(1),
            chunk_overlap: chunk_overlap.min(chunk_size.saturating_sub(1)),
        }
    }

    /// Split `text` into ordered chunks.
    pub fn split(&self, text: &str) -> Vec<String> {
        if text.is_empty() {
            return Vec::new();
        }
        let chunks = self.split_with(text, &SEPARATORS);
        if chunks.is_empty() {
            // Whitespace-only input: every candidate chunk trimmed to nothing.
            // Non-empty input must still yield one chunk.
            vec![text.to_string()]
        } else {
            chunks
        }
    }

    fn split_with(&self, text: &str, separators: &[&str]) -> Vec<String> {
        // Pick the first separator that occurs in the text; "" always matches.
        let (sep_idx, separator) = separators
            .iter()
            .enumerate()
            .find(|(_, s)| s.is_empty() || text.contains(**s))
            .map(|(i, s)| (i, *s))
            .unwrap_or((separators.len() - 1, ""));
        let remaining = &separators[sep_idx + 1..];

        let splits: Vec<&str> = if separator.is_empty() {
            text.split("").filter(|s| !s.is_empty()).collect()
        } else {
            text.split(separator).collect()
        };

        let mut chunks = Vec::new();
        let mut fitting: Vec<&str> = Vec::new();

        for piece in splits {
            if char_len(piece) < self.chunk_size {
                fitting.push(piece);
                continue;
            }
            // An oversized piece: flush what fits, then re-split it with the
            // finer-grained separators.
            if !fitting.is_empty() {
                chunks.extend(self.merge(&fitting, separator));
                fitting.clear();
            }
            if remaining.is_empty() {
                chunks.push(piece.to_string());
            } else {
                let sub = self.split_with(piece, remaining);
                chunks.extend(sub);
            }
        }
        if !fitting.is_empty() {
            chunks.extend(self.merge(&fitting, separator));
        }
        chunks
    }

    /// Greedily pack `splits` into chunks of at most `chunk_size`, carrying
    /// `chunk_overlap` trailing characters into the next chunk.
    fn merge(&self, splits: &[&str], separator: &str) -> Vec<String> {
        let sep_len = char_len(separator);
        let mut chunks: Vec<String> = Vec::new();
        let mut window: Vec<&str> = Vec::new();
        let mut total = 0usize;

        for piece in splits {
            let len = char_len(piece);
            let joiner = if window.is_empty() { 0 } else { sep_len };

            if total + len + joiner > self.chunk_size && !window.is_empty() {
                if let Some(chunk) = join_trimmed(&window, separator) {
                    chunks.push(chunk);
                }
                // Slide the window forward until the retained tail fits the
                // overlap budget and leaves room for the incoming piece.
                while total > self.chunk_overlap
                    || (!window.is_empty()
                        && total + len + if window.is_empty() { 0 } else { sep_len }
                            > self.chunk_size)
                {
                    let head = char_len(window[0]);
                    total -= head + if window.len() > 1 { sep_len } else { 0 };
                    window.remove(0);
                    if window.is_empty() {
                        break;
                    }
                }
            }

            window.push(piece);
            total += len + if window.len() > 1 { sep_len } else { 0 };
        }

        if let Some(chunk) = join_trimmed(&window, separator) {
            chunks.push(chunk);
        }
        chunks
    }
}

fn char_len(s: &str) -> usize {
    s.chars().count()
}

/// Join pieces with the separator and trim; `None` if nothing remains.
fn join_trimmed(pieces: &[&str], separator: &str) -> Option<String> {
    let joined = pieces.join(separator);
    let trimmed = joined.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_input_is_a_single_chunk() {
        let splitter = TextSplitter::new(2000, 20);
        let chunks = splitter.split("A. B. C.");
        assert_eq!(chunks, vec!["A. B. C.".to_string()]);
    }

    #[test]
    fn empty_input_yields_no_chunks() {
        let splitter = TextSplitter::new(100, 10);
        assert!(splitter.split("").is_empty());
    }

    #[test]
    fn whitespace_only_input_still_yields_a_chunk() {
        let splitter = TextSplitter::new(100, 10);
        let chunks = splitter.split("   \n\n   ");
        assert_eq!(chunks.len(), 1);
    }

    #[test]
    fn every_chunk_respects_the_size_bound() {
        let para = "The quick brown fox jumps over the lazy dog. ".repeat(40);
        let text = format!("{para}\n\n{para}\n\n{para}");
        let splitter = TextSplitter::new(200, 20);
        let chunks = splitter.split(&text);
        assert!(chunks.len() > 1);
        for chunk in &chunks {
            assert!(
                chunk.chars().count() <= 200,
                "chunk exceeded bound: {} chars",
                chunk.chars().count()
            );
        }
    }

    #[test]
    fn chunks_preserve_document_order() {
        let text = (0..50)
            .map(|i| format!("paragraph number {i} with some filler words"))
            .collect::<Vec<_>>()
            .join("\n\n");
        let splitter = TextSplitter::new(120, 10);
        let chunks = splitter.split(&text);

        // Each numbered paragraph must appear no earlier than the previous one.
        let mut last_seen = 0usize;
        for i in 0..50 {
            let marker = format!("paragraph number {i} ");
            if let Some(pos) = chunks.iter().position(|c| c.contains(&marker)) {
                assert!(pos >= last_seen, "paragraph {i} appeared out of order");
                last_seen = pos;
            }
        }
    }

    #[test]
    fn all_content_survives_the_split() {
        let text = (0..30)
            .map(|i| format!("sentence-{i}"))
            .collect::<Vec<_>>()
            .join(" ");
        let splitter = TextSplitter::new(60, 12);
        let chunks = splitter.split(&text);
        let rejoined = chunks.join(" ");
        for i in 0..30 {
            assert!(
                rejoined.contains(&format!("sentence-{i}")),
                "sentence-{i} lost during splitting"
            );
        }
    }

    #[test]
    fn neighbouring_chunks_overlap() {
        let text = (0..40)
            .map(|i| format!("w{i:02}"))
            .collect::<Vec<_>>()
            .join(" ");
        let splitter = TextSplitter::new(40, 12);
        let chunks = splitter.split(&text);
        assert!(chunks.len() > 1);

        for pair in chunks.windows(2) {
            // The tail of one chunk must reappear at the head of the next.
            let tail: String = pair[0]
                .chars()
                .rev()
                .take(8)
                .collect::<Vec<_>>()
                .into_iter()
                .rev()
                .collect();
            assert!(
                pair[1].contains(tail.trim()),
                "expected overlap between {:?} and {:?}",
                pair[0],
                pair[1]
            );
        }
    }

    #[test]
    fn oversized_unbroken_token_falls_back_to_character_splitting() {
        let blob = "x".repeat(500);
        let splitter = TextSplitter::new(100, 10);
        let chunks = splitter.split(&blob);
        assert!(chunks.len() >= 5);
        for chunk in &chunks {
            assert!(chunk.chars().count() <= 100);
        }
    }

    #[test]
    fn multibyte_text_never_splits_inside_a_code_point() {
        let text = "研究 論文 ".repeat(200);
        let splitter = TextSplitter::new(50, 5);
        let chunks = splitter.split(&text);
        assert!(!chunks.is_empty());
        // If a char had been split, the chunk would not be valid UTF-8 and the
        // String could not exist; verify bounds in chars, not bytes.
        for chunk in &chunks {
            assert!(chunk.chars().count() <= 50);
        }
    }

    #[test]
    fn defaults_match_document_constants() {
        // 1700/20 are the production constants; a sanity run over realistic prose.
        let text = "Attention mechanisms have become an integral part of sequence \
                    modeling and transduction models. "
            .repeat(120);
        let splitter = TextSplitter::new(1700, 20);
        let chunks = splitter.split(&text);
        assert!(!chunks.is_empty());
        for chunk in &chunks {
            assert!(chunk.chars().count() <= 1700);
        }
    }
}
