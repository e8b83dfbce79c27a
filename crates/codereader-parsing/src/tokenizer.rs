//! A process-wide handle to a fixed BPE-compatible tokenizer, matching the encoding
//! used by OpenAI's small text-embedding models. Grounded in the teacher's
//! `TiktokenCounter` (codetriever-parsing/src/chunking/tiktoken_counter.rs).

use crate::error::{ParsingError, ParsingResult};
use std::sync::OnceLock;
use tiktoken_rs::CoreBPE;

/// Pure, reusable BPE token counter. The encoder is acquired once at first use and
/// lives for the process's lifetime (released implicitly on shutdown).
pub struct Tokenizer {
    encoder: CoreBPE,
}

static TOKENIZER: OnceLock<Tokenizer> = OnceLock::new();

impl Tokenizer {
    /// Count the tokens in `text`.
    #[must_use]
    pub fn count(&self, text: &str) -> usize {
        self.encoder.encode_ordinary(text).len()
    }

    /// Count tokens for every text in `texts`, preserving order.
    #[must_use]
    pub fn count_batch(&self, texts: &[&str]) -> Vec<usize> {
        texts.iter().map(|text| self.count(text)).collect()
    }
}

/// The process-wide tokenizer handle, initialized lazily on first call.
///
/// # Errors
/// Returns `ParsingError::Tokenizer` if the encoder cannot be loaded.
pub fn tokenizer() -> ParsingResult<&'static Tokenizer> {
    if let Some(tokenizer) = TOKENIZER.get() {
        return Ok(tokenizer);
    }
    let encoder = tiktoken_rs::cl100k_base()
        .map_err(|err| ParsingError::Tokenizer(err.to_string()))?;
    Ok(TOKENIZER.get_or_init(|| Tokenizer { encoder }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_nonzero_tokens_for_simple_text() {
        let tokenizer = tokenizer().expect("tokenizer loads");
        assert!(tokenizer.count("Hello, world!") > 0);
    }

    #[test]
    fn empty_text_counts_to_zero() {
        let tokenizer = tokenizer().expect("tokenizer loads");
        assert_eq!(tokenizer.count(""), 0);
    }

    #[test]
    fn batch_counting_preserves_order_and_length() {
        let tokenizer = tokenizer().expect("tokenizer loads");
        let counts = tokenizer.count_batch(&["Hello", "a slightly longer sentence here"]);
        assert_eq!(counts.len(), 2);
        assert!(counts[1] > counts[0]);
    }
}
