//! Compiled-in configuration defaults, one document per group

use serde_json::{json, Value};
use shared::ConfigGroup;

/// Default document for a configuration group
pub fn default_group(group: ConfigGroup) -> Value {
    match group {
        ConfigGroup::Main => json!({
            "model_path": "./models/CodeLlama-7b-hf",
            "model_endpoint": "",
            "workspace_path": "./workspace",
            "memory_dir": "data/memory_db",
            "context_file": "data/minecraft_api/fabric_context.txt",
            "max_memory_entries": 1000,
            "auto_backup": true,
            "safe_mode": true,
            "debug_mode": false,
            "minecraft_version": "1.20.1",
            "forge_version": "47.2.0"
        }),
        ConfigGroup::Performance => json!({
            "generation_settings": {
                "max_new_tokens": 256,
                "temperature": 0.7,
                "top_p": 0.9,
                "top_k": 50,
                "repetition_penalty": 1.1,
                "do_sample": true
            },
            "model_optimization": {
                "use_gpu": true,
                "cache_enabled": true,
                "request_timeout_secs": 120,
                "max_context_chars": 2000
            },
            "engine": {
                "completed_history_limit": 256
            }
        }),
        ConfigGroup::Security => json!({
            "file_operations": {
                "allowed_directories": ["src/main/java", "generated"],
                "blocked_directories": ["/etc", "/usr", "/bin", "C:/Windows"],
                "allowed_extensions": [".java"],
                "max_file_size_mb": 5,
                "enable_backup_before_overwrite": true
            },
            "code_execution": {
                "enable_sandbox": true
            }
        }),
        ConfigGroup::Learning => json!({
            "ai_learning": {
                "enable_learning": true,
                "pattern_recognition_threshold": 0.8
            },
            "feedback_system": {
                "enable_user_feedback": true
            }
        }),
        ConfigGroup::Preferences => json!({
            "ui_preferences": {
                "theme": "dark",
                "font_family": "JetBrains Mono"
            },
            "generation_preferences": {
                "include_comments": true
            },
            "workflow": {
                "auto_save": false,
                "confirm_overwrites": true
            }
        }),
    }
}
