//! Reads a file's bytes, rejects binary content, computes a content hash and detects
//! language by extension. See spec.md §4.3.

use sha2::{Digest, Sha256};
use std::path::Path;

/// The first N bytes inspected for a null byte when classifying a file as binary.
const BINARY_SNIFF_LEN: usize = 8192;

/// The extracted, decoded content of a source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedFile {
    pub content: String,
    pub language: String,
    pub content_hash: String,
    pub line_count: u64,
    pub size_bytes: u64,
}

/// Extract `bytes` read from a file at `relative_path`.
///
/// Returns `None` if the content is classified as binary (a null byte appears in the
/// first 8 KiB).
#[must_use]
pub fn extract(bytes: &[u8], relative_path: &str) -> Option<ExtractedFile> {
    let sniff_len = bytes.len().min(BINARY_SNIFF_LEN);
    if bytes[..sniff_len].contains(&0u8) {
        return None;
    }

    let content = String::from_utf8_lossy(bytes).into_owned();
    let content_hash = hex_sha256(&content);
    let line_count = content.lines().count() as u64;
    let language = detect_language(relative_path);

    Some(ExtractedFile {
        content,
        language,
        content_hash,
        line_count,
        size_bytes: bytes.len() as u64,
    })
}

fn hex_sha256(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    let digest = hasher.finalize();
    digest.iter().map(|b| format!("{b:02x}")).collect()
}

/// Derive a language name from a lowercased file extension. Unknown extensions map to
/// `"unknown"`.
#[must_use]
pub fn detect_language(relative_path: &str) -> String {
    let ext = Path::new(relative_path)
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase);

    match ext.as_deref() {
        Some("js" | "jsx" | "mjs" | "cjs") => "javascript",
        Some("ts" | "tsx") => "typescript",
        Some("py") => "python",
        Some("go") => "go",
        Some("rs") => "rust",
        Some("java") => "java",
        Some("cpp" | "cc" | "cxx") => "cpp",
        Some("c") => "c",
        Some("h" | "hpp") => "c_header",
        Some("md" | "markdown") => "markdown",
        Some("json") => "json",
        Some("yaml" | "yml") => "yaml",
        _ => "unknown",
    }
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_content_with_null_byte_in_first_8kib() {
        let mut bytes = vec![b'a'; 100];
        bytes[50] = 0;
        assert!(extract(&bytes, "bin.exe").is_none());
    }

    #[test]
    fn accepts_text_content_and_computes_metadata() {
        let extracted = extract(b"line one\nline two\n", "src/lib.rs").expect("not binary");
        assert_eq!(extracted.language, "rust");
        assert_eq!(extracted.line_count, 2);
        assert_eq!(extracted.content_hash.len(), 64);
    }

    #[test]
    fn invalid_utf8_is_replaced_with_replacement_character() {
        let bytes = vec![b'a', 0xFF, b'b'];
        let extracted = extract(&bytes, "weird.txt").expect("not binary");
        assert!(extracted.content.contains('\u{FFFD}'));
    }

    #[test]
    fn unknown_extension_maps_to_unknown() {
        assert_eq!(detect_language("file.xyz"), "unknown");
        assert_eq!(detect_language("noext"), "unknown");
    }

    #[test]
    fn same_content_hashes_identically() {
        let a = extract(b"same content", "a.rs").expect("not binary");
        let b = extract(b"same content", "b.rs").expect("not binary");
        assert_eq!(a.content_hash, b.content_hash);
    }
}
