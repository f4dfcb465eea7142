//! Reference snippets handed to the model alongside a request

use std::collections::HashMap;
use shared::Category;

const TRUNCATION_MARKER: &str = "\n// ... (truncated)";

const BLOCK_CONTEXT: &str = r#"
// Block creation context for Fabric 1.20.1
import net.minecraft.block.Block;
import net.minecraft.block.Material;
import net.fabricmc.fabric.api.object.builder.v1.block.FabricBlockSettings;

// Basic block pattern:
public class ExampleBlock extends Block {
    public ExampleBlock() {
        super(FabricBlockSettings.of(Material.STONE).strength(3.0f, 3.0f));
    }
}
"#;

const ITEM_CONTEXT: &str = r#"
// Item creation context for Fabric 1.20.1
import net.minecraft.item.Item;
import net.minecraft.item.ItemGroup;
import net.fabricmc.fabric.api.item.v1.FabricItemSettings;

// Basic item pattern:
public class ExampleItem extends Item {
    public ExampleItem() {
        super(new FabricItemSettings().group(ItemGroup.MISC));
    }
}
"#;

const GENERAL_CONTEXT: &str = r#"
// General Fabric mod context
package com.example.mod;

import net.fabricmc.api.ModInitializer;
import net.minecraft.registry.Registry;
import net.minecraft.util.Identifier;

public class ExampleMod implements ModInitializer {
    public static final String MOD_ID = "example_mod";

    @Override
    public void onInitialize() {
        // Mod initialization
    }
}
"#;

/// Per-category context snippets
#[derive(Debug, Clone)]
pub struct ContextLibrary {
    contexts: HashMap<Category, String>,
}

impl ContextLibrary {
    /// Library holding the built-in block, item and general snippets
    pub fn new() -> Self {
        let mut contexts = HashMap::new();
        contexts.insert(Category::Block, BLOCK_CONTEXT.to_string());
        contexts.insert(Category::Item, ITEM_CONTEXT.to_string());
        contexts.insert(Category::General, GENERAL_CONTEXT.to_string());
        Self { contexts }
    }

    /// Replace or add the snippet for a category
    pub fn insert(&mut self, category: Category, context: impl Into<String>) {
        self.contexts.insert(category, context.into());
    }

    /// Snippet for `category`, falling back to the general one
    ///
    /// With `max_size`, longer snippets are cut at that many characters and
    /// marked as truncated.
    pub fn context_for(&self, category: Category, max_size: Option<usize>) -> String {
        let context = self
            .contexts
            .get(&category)
            .or_else(|| self.contexts.get(&Category::General))
            .map(String::as_str)
            .unwrap_or_default();

        match max_size {
            Some(limit) if context.chars().count() > limit => {
                let mut truncated: String = context.chars().take(limit).collect();
                truncated.push_str(TRUNCATION_MARKER);
                truncated
            }
            _ => context.to_string(),
        }
    }

    pub fn len(&self) -> usize {
        self.contexts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contexts.is_empty()
    }
}

impl Default for ContextLibrary {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_contexts() {
        let library = ContextLibrary::new();
        assert_eq!(library.len(), 3);
        assert!(library.context_for(Category::Block, None).contains("ExampleBlock"));
        assert!(library.context_for(Category::Item, None).contains("ExampleItem"));
    }

    #[test]
    fn test_entity_falls_back_to_general() {
        let library = ContextLibrary::new();
        assert_eq!(
            library.context_for(Category::Entity, None),
            library.context_for(Category::General, None)
        );
    }

    #[test]
    fn test_truncation() {
        let library = ContextLibrary::new();
        let context = library.context_for(Category::Block, Some(20));
        assert!(context.ends_with("// ... (truncated)"));
        assert_eq!(context.chars().count(), 20 + TRUNCATION_MARKER.chars().count());

        let untouched = library.context_for(Category::Block, Some(100_000));
        assert!(!untouched.contains("truncated"));
    }

    #[test]
    fn test_insert_overrides() {
        let mut library = ContextLibrary::new();
        library.insert(Category::Entity, "// mobs");
        assert_eq!(library.context_for(Category::Entity, None), "// mobs");
    }
}
