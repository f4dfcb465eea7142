//! Prompt assembly and extraction of the generated code from model output

use std::sync::OnceLock;
use regex::Regex;

pub const CONTEXT_MARKER: &str = "// MINECRAFT CONTEXT";
pub const REQUEST_MARKER: &str = "// USER REQUEST";
pub const CODE_MARKER: &str = "// GENERATED JAVA CODE";
const END_MARKERS: [&str; 3] = ["// END", REQUEST_MARKER, CONTEXT_MARKER];

/// Default cap on compressed context length, in characters
pub const DEFAULT_CONTEXT_LIMIT: usize = 2000;

fn whitespace_run() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\s+").expect("static regex is valid"))
}

/// Strip comments and redundant whitespace, keeping at most `limit` characters
pub fn compress_context(context: &str, limit: usize) -> String {
    let joined = context
        .lines()
        .map(|line| match line.find("//") {
            Some(pos) => line[..pos].trim(),
            None => line.trim(),
        })
        .collect::<Vec<_>>()
        .join(" ");

    let mut compressed = joined;
    while let Some(start) = compressed.find("/*") {
        match compressed[start..].find("*/") {
            Some(offset) => compressed.replace_range(start..start + offset + 2, ""),
            None => break,
        }
    }

    let collapsed = whitespace_run().replace_all(compressed.trim(), " ");
    collapsed.chars().take(limit).collect()
}

/// Assemble the three-section prompt sent to the model
pub fn build_prompt(context: &str, request: &str) -> String {
    format!("{CONTEXT_MARKER}\n{context}\n\n{REQUEST_MARKER}\n{request}\n\n{CODE_MARKER}\n")
}

/// Pull the generated code out of a full model transcript
///
/// Models served in raw completion mode often echo the prompt; everything up
/// to the code marker is dropped and anything after a trailing marker is cut.
pub fn extract_generated_code(output: &str) -> String {
    let Some(start) = output.find(CODE_MARKER) else {
        return output.trim().to_string();
    };

    let code = output[start + CODE_MARKER.len()..].trim();
    let end = END_MARKERS
        .iter()
        .filter_map(|marker| code.find(marker))
        .min()
        .unwrap_or(code.len());
    code[..end].trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compress_strips_comments_and_whitespace() {
        let context = "// header\nimport a.B;   // trailing\n/* block\n comment */ class  C {}\n";
        assert_eq!(compress_context(context, 2000), "import a.B; class C {}");
    }

    #[test]
    fn test_compress_respects_limit() {
        let context = "x ".repeat(5000);
        assert_eq!(compress_context(&context, 10).chars().count(), 10);
    }

    #[test]
    fn test_compress_unterminated_block_comment_is_kept() {
        assert_eq!(compress_context("a /* b", 100), "a /* b");
    }

    #[test]
    fn test_build_prompt_sections_in_order() {
        let prompt = build_prompt("ctx", "make a block");
        let context_at = prompt.find(CONTEXT_MARKER).unwrap();
        let request_at = prompt.find(REQUEST_MARKER).unwrap();
        let code_at = prompt.find(CODE_MARKER).unwrap();
        assert!(context_at < request_at && request_at < code_at);
        assert!(prompt.ends_with("// GENERATED JAVA CODE\n"));
    }

    #[test]
    fn test_extract_after_echoed_prompt() {
        let transcript = format!("{}public class A {{}}\n// END\nnoise", build_prompt("ctx", "req"));
        assert_eq!(extract_generated_code(&transcript), "public class A {}");
    }

    #[test]
    fn test_extract_without_marker_returns_trimmed_output() {
        assert_eq!(extract_generated_code("  public class A {}\n"), "public class A {}");
    }

    #[test]
    fn test_extract_cuts_at_repeated_request_marker() {
        let output = "// GENERATED JAVA CODE\nclass A {}\n// USER REQUEST\nagain";
        assert_eq!(extract_generated_code(output), "class A {}");
    }
}
