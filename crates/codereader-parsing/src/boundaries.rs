//! Per-language regexes matching the first non-space of a line that begins a
//! top-level declaration (function/class/struct/type/trait/heading/etc.). Repurposed
//! from the teacher's `function_keywords`/`class_keywords` tables
//! (codetriever-parsing/src/parsing/languages.rs), which paired each keyword list with
//! a tree-sitter grammar; here the keyword lists alone drive a regex match, dropping
//! the grammar dependency entirely.
//!
//! These tables are heuristic: a regex cannot substitute for parsing, and
//! over-matching on common keywords (e.g. Java's leading `public` alone) is expected.
//! Chunk quality is not a correctness property.

use once_cell::sync::Lazy;
use regex::Regex;

fn boundary_regex(pattern: &str) -> Regex {
    Regex::new(pattern).unwrap_or_else(|err| {
        unreachable!("boundary regex {pattern:?} must compile: {err}")
    })
}

static RUST_BOUNDARY: Lazy<Regex> =
    Lazy::new(|| boundary_regex(r"^\s*(pub(\([^)]*\))?\s+)?(async\s+)?(fn|struct|enum|trait|impl|mod)\b"));
static PYTHON_BOUNDARY: Lazy<Regex> = Lazy::new(|| boundary_regex(r"^\s*(async\s+)?(def|class)\b"));
static JAVASCRIPT_BOUNDARY: Lazy<Regex> = Lazy::new(|| {
    boundary_regex(r"^\s*(export\s+)?(default\s+)?(async\s+)?(function|class)\b")
});
static TYPESCRIPT_BOUNDARY: Lazy<Regex> = Lazy::new(|| {
    boundary_regex(r"^\s*(export\s+)?(default\s+)?(async\s+)?(function|class|interface|type|enum)\b")
});
static GO_BOUNDARY: Lazy<Regex> = Lazy::new(|| boundary_regex(r"^\s*func\b|^\s*type\b"));
static JAVA_BOUNDARY: Lazy<Regex> = Lazy::new(|| {
    boundary_regex(r"^\s*(public|private|protected)\b.*\b(class|interface|enum)\b|^\s*(public|private|protected)\b")
});
static CPP_BOUNDARY: Lazy<Regex> = Lazy::new(|| boundary_regex(r"^\s*(class|struct|namespace)\b"));
static MARKDOWN_BOUNDARY: Lazy<Regex> = Lazy::new(|| boundary_regex(r"^#{1,6}\s"));

/// Return the boundary regex for `language`, if one is tabled.
pub fn boundary_regex_for(language: &str) -> Option<&'static Regex> {
    match language {
        "rust" => Some(&RUST_BOUNDARY),
        "python" => Some(&PYTHON_BOUNDARY),
        "javascript" => Some(&JAVASCRIPT_BOUNDARY),
        "typescript" => Some(&TYPESCRIPT_BOUNDARY),
        "go" => Some(&GO_BOUNDARY),
        "java" => Some(&JAVA_BOUNDARY),
        "cpp" | "c" | "c_header" => Some(&CPP_BOUNDARY),
        "markdown" => Some(&MARKDOWN_BOUNDARY),
        _ => None,
    }
}

/// Whether `line` begins a top-level declaration for `language`.
#[must_use]
pub fn is_boundary_line(language: &str, line: &str) -> bool {
    boundary_regex_for(language).is_some_and(|re| re.is_match(line))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rust_function_is_a_boundary() {
        assert!(is_boundary_line("rust", "fn main() {"));
        assert!(is_boundary_line("rust", "pub fn run() {"));
        assert!(!is_boundary_line("rust", "    let x = 1;"));
    }

    #[test]
    fn python_class_and_def_are_boundaries() {
        assert!(is_boundary_line("python", "def foo():"));
        assert!(is_boundary_line("python", "class Foo:"));
        assert!(!is_boundary_line("python", "    return 1"));
    }

    #[test]
    fn unknown_language_has_no_boundary_regex() {
        assert!(boundary_regex_for("unknown").is_none());
        assert!(!is_boundary_line("unknown", "fn main() {"));
    }

    #[test]
    fn markdown_heading_is_a_boundary() {
        assert!(is_boundary_line("markdown", "## Section"));
        assert!(!is_boundary_line("markdown", "plain text"));
    }
}
