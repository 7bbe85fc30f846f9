//! Text chunking with layered separators and configurable overlap.
//!
//! Splits a document into bounded-size passages. Each window prefers to
//! end on a paragraph break, then a line break, then a space, and only
//! falls back to a raw character boundary when no separator fits. Spans
//! are exact substrings of the input, so concatenating them minus the
//! overlapping prefixes reproduces the original text.

use crate::types::{DocumentName, Passage};

/// Break preference, coarsest first.
const SEPARATORS: [&str; 3] = ["\n\n", "\n", " "];

/// Splitter configuration: maximum span length and overlap between
/// consecutive spans, both in characters.
#[derive(Debug, Clone, Copy)]
pub struct Chunker {
    chunk_size: usize,
    overlap: usize,
}

impl Default for Chunker {
    fn default() -> Self {
        Self::new(1000, 200)
    }
}

impl Chunker {
    pub fn new(chunk_size: usize, overlap: usize) -> Self {
        Self {
            chunk_size: chunk_size.max(1),
            overlap,
        }
    }

    /// Split `text` into a lazy, restartable sequence of spans in reading
    /// order. Chunking never fails: empty input yields an empty sequence,
    /// and input no longer than the budget yields a single span equal to
    /// the full text.
    pub fn chunk<'a>(&self, text: &'a str) -> Chunks<'a> {
        Chunks {
            text,
            chunk_size: self.chunk_size,
            overlap: self.overlap,
            start: 0,
            done: text.is_empty(),
        }
    }

    /// Split a document into passages tagged with its identity.
    pub fn chunk_document(&self, source: &DocumentName, text: &str) -> Vec<Passage> {
        let passages: Vec<Passage> = self
            .chunk(text)
            .enumerate()
            .map(|(position, span)| Passage {
                source: source.clone(),
                position: position as u32,
                text: span.text.to_string(),
            })
            .collect();

        tracing::debug!(
            document = %source,
            passages = passages.len(),
            chunk_size = self.chunk_size,
            overlap = self.overlap,
            "chunked document"
        );

        passages
    }
}

/// A span of the source text: the chunk content plus its byte offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span<'a> {
    pub text: &'a str,
    pub start: usize,
}

/// Lazy iterator over chunk spans.
pub struct Chunks<'a> {
    text: &'a str,
    chunk_size: usize,
    overlap: usize,
    start: usize,
    done: bool,
}

impl<'a> Chunks<'a> {
    /// Pick the end of the chunk starting at `start`, given the hard
    /// window limit `window_end`. Prefers the latest separator inside the
    /// window, but never one so early that the next chunk would not
    /// advance past `start`.
    fn break_point(&self, start: usize, window_end: usize) -> usize {
        let floor = advance_chars(self.text, start, self.overlap + 1);
        if floor >= window_end {
            return window_end;
        }

        let window = &self.text[floor..window_end];
        for sep in SEPARATORS {
            if let Some(pos) = window.rfind(sep) {
                return floor + pos + sep.len();
            }
        }

        window_end
    }
}

impl<'a> Iterator for Chunks<'a> {
    type Item = Span<'a>;

    fn next(&mut self) -> Option<Span<'a>> {
        if self.done {
            return None;
        }

        let start = self.start;
        let window_end = advance_chars(self.text, start, self.chunk_size);

        if window_end >= self.text.len() {
            self.done = true;
            return Some(Span {
                text: &self.text[start..],
                start,
            });
        }

        let end = self.break_point(start, window_end);
        let span = Span {
            text: &self.text[start..end],
            start,
        };

        let mut next = retreat_chars(self.text, end, self.overlap);
        if next <= start {
            // Forward progress wins over overlap for pathological inputs
            next = end;
        }
        self.start = next;

        Some(span)
    }
}

/// Byte offset after advancing `n` characters from `from`.
fn advance_chars(text: &str, from: usize, n: usize) -> usize {
    text[from..]
        .char_indices()
        .nth(n)
        .map(|(i, _)| from + i)
        .unwrap_or(text.len())
}

/// Byte offset after retreating `n` characters from `from`.
fn retreat_chars(text: &str, from: usize, n: usize) -> usize {
    let mut idx = from;
    for _ in 0..n {
        match text[..idx].char_indices().next_back() {
            Some((i, _)) => idx = i,
            None => return 0,
        }
    }
    idx
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Rebuild the original text from spans by dropping each span's
    /// overlapping prefix, computed from the recorded offsets.
    fn reconstruct(text: &str, spans: &[Span<'_>]) -> String {
        let mut result = String::new();
        let mut covered = 0;
        for span in spans {
            result.push_str(&span.text[covered - span.start..]);
            covered = span.start + span.text.len();
        }
        result
    }

    #[test]
    fn test_empty_text_yields_no_spans() {
        let chunker = Chunker::new(100, 10);
        assert_eq!(chunker.chunk("").count(), 0);
    }

    #[test]
    fn test_short_text_yields_single_full_span() {
        let chunker = Chunker::new(100, 10);
        let spans: Vec<_> = chunker.chunk("short document").collect();
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].text, "short document");
    }

    #[test]
    fn test_text_shorter_than_overlap_still_yields_one_span() {
        let chunker = Chunker::new(10, 8);
        let spans: Vec<_> = chunker.chunk("abc").collect();
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].text, "abc");
    }

    #[test]
    fn test_spans_respect_budget() {
        let chunker = Chunker::new(10, 2);
        let text = "alpha beta. gamma delta.";
        for span in chunker.chunk(text) {
            assert!(
                span.text.chars().count() <= 10,
                "span too long: {:?}",
                span.text
            );
        }
    }

    #[test]
    fn test_breaks_prefer_spaces() {
        let chunker = Chunker::new(10, 2);
        let spans: Vec<_> = chunker.chunk("alpha beta. gamma delta.").collect();
        // Every non-final span should end right after a space rather than
        // mid-word.
        for span in &spans[..spans.len() - 1] {
            assert!(span.text.ends_with(' '), "mid-word break: {:?}", span.text);
        }
    }

    #[test]
    fn test_breaks_prefer_paragraphs_over_spaces() {
        let chunker = Chunker::new(30, 4);
        let text = "first paragraph here\n\nsecond paragraph follows after";
        let spans: Vec<_> = chunker.chunk(text).collect();
        assert!(spans[0].text.ends_with("\n\n"));
    }

    #[test]
    fn test_reconstruction_round_trip() {
        let chunker = Chunker::new(10, 2);
        let text = "alpha beta. gamma delta.";
        let spans: Vec<_> = chunker.chunk(text).collect();
        assert_eq!(reconstruct(text, &spans), text);
    }

    #[test]
    fn test_reconstruction_without_separators() {
        // No separators at all: degrade to raw character splitting
        let chunker = Chunker::new(50, 10);
        let text = "x".repeat(500);
        let spans: Vec<_> = chunker.chunk(&text).collect();
        assert!(spans.len() > 1);
        for span in &spans {
            assert!(span.text.chars().count() <= 50);
        }
        assert_eq!(reconstruct(&text, &spans), text);
    }

    #[test]
    fn test_consecutive_spans_overlap() {
        let chunker = Chunker::new(10, 2);
        let text = "alpha beta. gamma delta.";
        let spans: Vec<_> = chunker.chunk(text).collect();
        for pair in spans.windows(2) {
            let prev_end = pair[0].start + pair[0].text.len();
            assert!(pair[1].start < prev_end, "no overlap between spans");
            assert!(pair[1].start > pair[0].start, "no forward progress");
        }
    }

    #[test]
    fn test_iterator_is_restartable() {
        let chunker = Chunker::new(10, 2);
        let text = "alpha beta. gamma delta.";
        let first: Vec<_> = chunker.chunk(text).collect();
        let second: Vec<_> = chunker.chunk(text).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_multibyte_boundaries() {
        let chunker = Chunker::new(8, 2);
        let text = "àéîõü ".repeat(20);
        let spans: Vec<_> = chunker.chunk(&text).collect();
        for span in &spans {
            assert!(span.text.chars().count() <= 8);
        }
        assert_eq!(reconstruct(&text, &spans), text);
    }

    #[test]
    fn test_chunk_document_positions() {
        let chunker = Chunker::new(10, 2);
        let source = DocumentName::from("a");
        let passages = chunker.chunk_document(&source, "alpha beta. gamma delta.");

        assert!(!passages.is_empty());
        for (i, passage) in passages.iter().enumerate() {
            assert_eq!(passage.position, i as u32);
            assert_eq!(passage.source, source);
        }
    }

    #[test]
    fn test_chunk_document_empty() {
        let chunker = Chunker::default();
        let passages = chunker.chunk_document(&DocumentName::from("a"), "");
        assert!(passages.is_empty());
    }
}
