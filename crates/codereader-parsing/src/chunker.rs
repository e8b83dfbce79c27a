//! Token-bounded, boundary-aligned, overlapping chunking. See spec.md §4.4.

use crate::boundaries::is_boundary_line;
use crate::error::ParsingResult;
use crate::tokenizer::tokenizer;

/// How many lines the boundary search looks back before giving up and splitting at
/// the overflow line itself.
const BOUNDARY_LOOKBACK: usize = 20;

/// A chunk of a file's text paired with 1-based, inclusive line metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkSpan {
    pub content: String,
    pub start_line: u64,
    pub end_line: u64,
    pub token_count: u32,
}

/// Chunk `content` (from `relative_path`, written in `language`) into boundary-aligned,
/// size-bounded, overlapping spans.
///
/// # Errors
/// Returns `ParsingError::Tokenizer` if the process-wide tokenizer fails to load.
pub fn chunk(
    content: &str,
    language: &str,
    chunk_size: u32,
    chunk_overlap: u32,
) -> ParsingResult<Vec<ChunkSpan>> {
    if content.trim().is_empty() {
        return Ok(Vec::new());
    }

    let tok = tokenizer()?;
    let lines: Vec<&str> = content.lines().collect();
    #[allow(clippy::cast_possible_truncation)]
    let token_counts: Vec<u32> = lines.iter().map(|l| tok.count(l) as u32).collect();

    let mut spans = Vec::new();
    let mut start = 0usize;
    let mut i = 0usize;
    let mut current_tokens: u32 = 0;
    // Floor for boundary search and the forced fallback split: the end of the last
    // emitted chunk's new (non-overlap) content. Search never looks at or before this
    // line, and `overlap_start` is clamped to it, so `split_at` strictly increases
    // and the overlap rewind of `start` can never reproduce a previous split point
    // and cycle forever.
    let mut floor = 0usize;

    while i < lines.len() {
        let line_tokens = token_counts[i];

        if current_tokens == 0 && line_tokens > chunk_size {
            push_span(&mut spans, &lines, start, i + 1, &token_counts);
            i += 1;
            start = i;
            floor = i;
            current_tokens = 0;
            continue;
        }

        if current_tokens > 0 && current_tokens + line_tokens > chunk_size {
            if i == floor {
                // The overlap carried over from the previous split already fills (or
                // exceeds) the budget on its own — happens when `chunk_overlap` is
                // close to `chunk_size`. Force this line in anyway so every split
                // consumes at least one new line and `floor` keeps advancing.
                current_tokens += line_tokens;
                i += 1;
                continue;
            }

            let split_at = find_boundary(floor, i, language, &lines).unwrap_or(i);
            push_span(&mut spans, &lines, start, split_at, &token_counts);

            let overlap_start = overlap_start(split_at, &token_counts, chunk_overlap).max(floor);
            start = overlap_start;
            i = split_at;
            floor = split_at;
            current_tokens = token_counts[start..i].iter().sum();
            continue;
        }

        current_tokens += line_tokens;
        i += 1;
    }

    if current_tokens > 0 || start < lines.len() {
        push_span(&mut spans, &lines, start, lines.len(), &token_counts);
    }

    Ok(spans)
}

fn push_span(
    spans: &mut Vec<ChunkSpan>,
    lines: &[&str],
    start: usize,
    end: usize,
    token_counts: &[u32],
) {
    if end <= start {
        return;
    }
    let text = lines[start..end].join("\n");
    if text.trim().is_empty() {
        return;
    }
    let token_count = token_counts[start..end].iter().sum();
    spans.push(ChunkSpan {
        content: text,
        start_line: (start + 1) as u64,
        end_line: end as u64,
        token_count,
    });
}

fn find_boundary(start: usize, i: usize, language: &str, lines: &[&str]) -> Option<usize> {
    if i == 0 {
        return None;
    }
    let lookback_limit = i.saturating_sub(BOUNDARY_LOOKBACK).max(start + 1);
    (lookback_limit..i)
        .rev()
        .find(|&candidate| is_boundary_line(language, lines[candidate]))
}

fn overlap_start(split_at: usize, token_counts: &[u32], chunk_overlap: u32) -> usize {
    if chunk_overlap == 0 {
        return split_at;
    }
    let mut idx = split_at;
    let mut total: u32 = 0;
    while idx > 0 {
        let candidate = token_counts[idx - 1];
        if total + candidate > chunk_overlap {
            break;
        }
        total += candidate;
        idx -= 1;
    }
    idx
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_yields_no_chunks() {
        assert_eq!(chunk("", "rust", 1000, 100).expect("chunks"), Vec::new());
    }

    #[test]
    fn whitespace_only_input_yields_no_chunks() {
        assert_eq!(
            chunk("   \n\t\n  ", "rust", 1000, 100).expect("chunks"),
            Vec::new()
        );
    }

    #[test]
    fn small_file_is_a_single_chunk() {
        let content = "fn main() {\n    println!(\"hi\");\n}\n";
        let spans = chunk(content, "rust", 1000, 100).expect("chunks");
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].start_line, 1);
        assert_eq!(spans[0].end_line, 3);
    }

    #[test]
    fn oversized_single_line_is_emitted_alone() {
        let long_line = "x".repeat(5000);
        let spans = chunk(&long_line, "rust", 10, 0).expect("chunks");
        assert_eq!(spans.len(), 1);
        assert!(spans[0].token_count > 10);
    }

    #[test]
    fn large_file_splits_into_multiple_chunks() {
        let mut content = String::new();
        for i in 0..200 {
            content.push_str(&format!("fn function_{i}() {{\n    let x = {i};\n}}\n"));
        }
        let spans = chunk(&content, "rust", 50, 10).expect("chunks");
        assert!(spans.len() > 1);
        for span in &spans {
            assert!(span.start_line <= span.end_line);
            assert!(span.token_count > 0);
            assert!(!span.content.trim().is_empty());
        }
    }

    #[test]
    fn consecutive_chunks_overlap_when_overlap_budget_is_nonzero() {
        let mut content = String::new();
        for i in 0..100 {
            content.push_str(&format!("fn f{i}() {{ let v = {i}; }}\n"));
        }
        let spans = chunk(&content, "rust", 30, 15).expect("chunks");
        assert!(spans.len() > 1);
        // Overlap means the second chunk's start is not strictly after the first's end.
        assert!(spans[1].start_line <= spans[0].end_line + 1);
    }

    #[test]
    fn terminates_when_overlap_exceeds_chunk_size_with_short_lines() {
        // Every line is a single cheap token; with `chunk_overlap` at least as large as
        // `chunk_size`, the overlap rewind alone would otherwise pin `start` at or before
        // `floor` forever, making `find_boundary` return the same `split_at` every pass.
        // What must hold for termination is that `end_line` (== `split_at`) strictly
        // increases every chunk; `start_line` may legitimately repeat across the first
        // couple of chunks when overlap swallows an entire small chunk's own content.
        let mut content = String::new();
        for i in 0..500 {
            content.push_str(&format!("x{i}\n"));
        }
        let spans = chunk(&content, "rust", 10, 10).expect("chunks");
        assert!(spans.len() > 1);
        for window in spans.windows(2) {
            assert!(window[1].end_line > window[0].end_line);
            assert!(window[1].start_line >= window[0].start_line);
        }
    }
}
