//! Static Fabric source templates used when no model is available
//!
//! Substitution is verbatim: the request text lands in a Javadoc comment
//! unescaped, so a request containing `*/` produces malformed Java.

use std::sync::OnceLock;
use regex::Regex;
use shared::Category;

/// Base name used when the request has no usable word
pub const FALLBACK_BASE_NAME: &str = "Generated";

const BLOCK_TEMPLATE: &str = r#"package com.example.mod.blocks;

import net.minecraft.block.Block;
import net.minecraft.block.Material;
import net.minecraft.sound.BlockSoundGroup;
import net.fabricmc.fabric.api.object.builder.v1.block.FabricBlockSettings;

/**
 * {class_name} - Generated for: {user_input}
 */
public class {class_name} extends Block {

    public {class_name}() {
        super(FabricBlockSettings.of(Material.STONE)
            .strength(3.0f, 3.0f)
            .sounds(BlockSoundGroup.STONE)
        );
    }
}"#;

const ITEM_TEMPLATE: &str = r#"package com.example.mod.items;

import net.minecraft.item.Item;
import net.minecraft.item.ItemGroup;
import net.fabricmc.fabric.api.item.v1.FabricItemSettings;

/**
 * {class_name} - Generated for: {user_input}
 */
public class {class_name} extends Item {

    public {class_name}() {
        super(new FabricItemSettings()
            .group(ItemGroup.MISC)
        );
    }
}"#;

const ENTITY_TEMPLATE: &str = r#"package com.example.mod.entities;

import net.minecraft.entity.EntityType;
import net.minecraft.entity.mob.PathAwareEntity;
import net.minecraft.world.World;

/**
 * {class_name} - Generated for: {user_input}
 */
public class {class_name} extends PathAwareEntity {

    public {class_name}(EntityType<? extends PathAwareEntity> entityType, World world) {
        super(entityType, world);
    }
}"#;

const GENERAL_TEMPLATE: &str = r#"package com.example.mod;

/**
 * {class_name} - Generated for: {user_input}
 */
public class {class_name} {

    public {class_name}() {
        // Constructor implementation
    }

    // Add your implementation here
}"#;

fn capitalized_word() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\b[A-Z][a-zA-Z]*\b").expect("static regex is valid"))
}

fn template_for(category: Category) -> &'static str {
    match category {
        Category::Block => BLOCK_TEMPLATE,
        Category::Item => ITEM_TEMPLATE,
        Category::Entity => ENTITY_TEMPLATE,
        Category::General => GENERAL_TEMPLATE,
    }
}

/// Render the category's template for `class_name`
pub fn render(category: Category, class_name: &str, original_text: &str) -> String {
    template_for(category)
        .replace("{class_name}", class_name)
        .replace("{user_input}", original_text)
}

/// Derive a class name from free text plus the category suffix
pub fn derive_name(text: &str, category: Category) -> String {
    let base_name = match capitalized_word().find(text) {
        Some(word) => word.as_str().to_string(),
        None => text
            .split_whitespace()
            .next()
            .map(capitalize)
            .unwrap_or_else(|| FALLBACK_BASE_NAME.to_string()),
    };

    match category.class_suffix() {
        Some(suffix) if !base_name.ends_with(suffix) => format!("{base_name}{suffix}"),
        _ => base_name,
    }
}

/// Upper-case the first character and lower-case the rest
fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(|c| c.to_lowercase())).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derive_name_prefers_capitalized_word() {
        assert_eq!(derive_name("create a Diamond ore block", Category::Block), "DiamondBlock");
        assert_eq!(derive_name("make Ruby", Category::Item), "RubyItem");
    }

    #[test]
    fn test_derive_name_capitalizes_first_token() {
        assert_eq!(derive_name("diamond ore block", Category::Block), "DiamondBlock");
        assert_eq!(derive_name("zOMBIE horde", Category::Entity), "ZombieEntity");
        assert_eq!(derive_name("helper utilities", Category::General), "Helper");
    }

    #[test]
    fn test_derive_name_fallback_and_existing_suffix() {
        assert_eq!(derive_name("", Category::General), "Generated");
        assert_eq!(derive_name("   ", Category::Item), "GeneratedItem");
        assert_eq!(derive_name("the GlowBlock please", Category::Block), "GlowBlock");
    }

    #[test]
    fn test_render_substitutes_every_placeholder() {
        let code = render(Category::Block, "DiamondBlock", "create a diamond ore block");

        assert!(code.starts_with("package com.example.mod.blocks;"));
        assert!(code.contains("public class DiamondBlock extends Block {"));
        assert!(code.contains("public DiamondBlock() {"));
        assert!(code.contains("Generated for: create a diamond ore block"));
        assert!(!code.contains("{class_name}"));
        assert!(!code.contains("{user_input}"));
    }

    #[test]
    fn test_render_is_deterministic() {
        for category in Category::ALL {
            let first = render(category, "Thing", "make a thing");
            let second = render(category, "Thing", "make a thing");
            assert_eq!(first, second);
        }
    }

    #[test]
    fn test_render_does_not_escape_input() {
        let code = render(Category::General, "Broken", "oops */ class");
        assert!(code.contains("Generated for: oops */ class"));
    }

    #[test]
    fn test_entity_template_constructor() {
        let code = render(Category::Entity, "GoblinEntity", "goblin mob");
        assert!(code.contains("public GoblinEntity(EntityType<? extends PathAwareEntity> entityType, World world)"));
    }
}
