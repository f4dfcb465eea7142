//! Keyword-based request classification

use shared::Category;

/// Keywords counted for each category, in enumeration order
const CATEGORY_KEYWORDS: [(Category, &[&str]); 4] = [
    (Category::Block, &["block", "blocks", "stone", "wood", "ore"]),
    (Category::Item, &["item", "items", "tool", "weapon", "sword"]),
    (Category::Entity, &["entity", "mob", "creature"]),
    (Category::General, &["mod", "class", "general"]),
];

/// Number of keywords of `category` found as substrings of `text`
pub fn keyword_score(text: &str, category: Category) -> usize {
    let lowered = text.to_lowercase();
    CATEGORY_KEYWORDS
        .iter()
        .find(|(c, _)| *c == category)
        .map(|(_, keywords)| keywords.iter().filter(|k| lowered.contains(*k)).count())
        .unwrap_or(0)
}

/// Pick the best-scoring category for a request
///
/// Ties go to the category listed first; no hits at all yields `General`.
pub fn classify(text: &str) -> Category {
    let mut best = (Category::General, 0usize);

    for category in Category::ALL {
        let score = keyword_score(text, category);
        if score > best.1 {
            best = (category, score);
        }
    }

    best.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_block_request() {
        assert_eq!(classify("create a diamond ore block"), Category::Block);
    }

    #[test]
    fn test_classify_item_and_entity() {
        assert_eq!(classify("make an emerald sword"), Category::Item);
        assert_eq!(classify("a hostile creature mob"), Category::Entity);
    }

    #[test]
    fn test_classify_empty_and_unmatched_is_general() {
        assert_eq!(classify(""), Category::General);
        assert_eq!(classify("hello world"), Category::General);
    }

    #[test]
    fn test_tie_breaks_to_first_category() {
        // One block keyword, one item keyword
        assert_eq!(classify("stone tool"), Category::Block);
        // One item keyword, one entity keyword
        assert_eq!(classify("sword for a mob"), Category::Item);
    }

    #[test]
    fn test_keyword_substring_counting() {
        // "blocks" also contains "block"
        assert_eq!(keyword_score("many blocks", Category::Block), 2);
        assert_eq!(keyword_score("CREATE A MOD CLASS", Category::General), 2);
        assert_eq!(classify("a WOODEN STONE thing"), Category::Block);
    }

    #[test]
    fn test_classify_picks_highest_keyword_score() {
        let text = "a mob with a sword item and a tool";
        assert_eq!(keyword_score(text, Category::Item), 3);
        assert_eq!(keyword_score(text, Category::Entity), 1);
        assert_eq!(classify(text), Category::Item);
    }
}
