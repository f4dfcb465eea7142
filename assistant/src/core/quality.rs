//! Post-hoc quality scoring and advisory suggestions
//!
//! Substring presence checks only; a high score says nothing about whether
//! the generated code compiles.

use shared::Category;

const BASE_SCORE: f64 = 0.5;

/// Markers rewarded by `score`, with their increments
const SCORE_MARKERS: [(&str, f64); 5] = [
    ("package ", 0.1),
    ("import ", 0.1),
    ("class ", 0.2),
    ("/**", 0.15),
    ("public ", 0.05),
];

const DOC_MARKER: &str = "/**";
const REGISTRATION_MARKER: &str = "Registry.register";

/// Score generated text in `[0.5, 1.0]`
pub fn score(text: &str) -> f64 {
    let total = SCORE_MARKERS
        .iter()
        .filter(|(marker, _)| text.contains(marker))
        .fold(BASE_SCORE, |acc, (_, increment)| acc + increment);
    total.min(1.0)
}

/// Fixed advice triggered by missing markers
pub fn suggest(text: &str, category: Category) -> Vec<String> {
    let mut suggestions = Vec::new();

    if !text.contains(DOC_MARKER) {
        suggestions.push("Consider adding Javadoc documentation".to_string());
    }

    if !text.contains(REGISTRATION_MARKER) {
        match category {
            Category::Block => suggestions.push("Don't forget to register your block in your mod initializer".to_string()),
            Category::Item => suggestions.push("Don't forget to register your item in your mod initializer".to_string()),
            Category::Entity | Category::General => {}
        }
    }

    suggestions
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::templates;

    #[test]
    fn test_empty_text_scores_base() {
        assert_eq!(score(""), 0.5);
    }

    #[test]
    fn test_partial_markers() {
        let text = "package a; class B {}";
        assert!((score(text) - 0.8).abs() < 1e-9);
    }

    #[test]
    fn test_score_is_clamped() {
        let code = templates::render(Category::Block, "DiamondBlock", "diamond");
        let value = score(&code);
        assert!(value <= 1.0);
        assert!((value - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_suggestions_for_rendered_block() {
        let code = templates::render(Category::Block, "DiamondBlock", "diamond");
        let suggestions = suggest(&code, Category::Block);
        assert_eq!(suggestions, vec!["Don't forget to register your block in your mod initializer".to_string()]);
    }

    #[test]
    fn test_suggestions_without_docs() {
        let suggestions = suggest("public class Foo {}", Category::General);
        assert_eq!(suggestions, vec!["Consider adding Javadoc documentation".to_string()]);

        let registered = suggest("/** doc */ Registry.register(x);", Category::Item);
        assert!(registered.is_empty());
    }
}
