//! Command surface helpers shared by the binary: wiring and report formatting

use std::fmt::Write as _;
use std::io::{BufRead, Write as _};
use std::path::Path;
use std::sync::Arc;

use shared::{component_info, Component};
use crate::engine::Engine;
use crate::error::AssistantResult;
use crate::services::{LocalModelClient, RealInteractionLog};
use crate::settings::Settings;
use crate::traits::{CompletionClient, OverwriteConsent};
use crate::types::{EngineStatistics, GenerationResult, SimilarInteraction};

/// Environment variable overriding the configured model endpoint
pub const ENDPOINT_ENV: &str = "MODFORGE_MODEL_ENDPOINT";

/// Characters of generated code shown in reports
pub const PREVIEW_CHARS: usize = 1000;

pub const HELP_TEXT: &str = "\
Describe what to generate, for example:
  create a diamond ore block
  make a ruby sword item
  add a friendly mob entity

Commands:
  help         show this message
  stats        show engine statistics
  exit, quit   leave the session";

/// One line of interactive input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplCommand {
    Help,
    Stats,
    Exit,
    Empty,
    Request(String),
}

impl ReplCommand {
    pub fn parse(line: &str) -> Self {
        let trimmed = line.trim();
        match trimmed.to_lowercase().as_str() {
            "" => Self::Empty,
            "help" => Self::Help,
            "stats" => Self::Stats,
            "exit" | "quit" => Self::Exit,
            _ => Self::Request(trimmed.to_string()),
        }
    }
}

/// Parse a `KEY=VALUE` context entry from the command line
pub fn parse_context_entry(entry: &str) -> Result<(String, String), String> {
    match entry.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => Ok((key.trim().to_string(), value.trim().to_string())),
        _ => Err(format!("expected KEY=VALUE, got '{}'", entry)),
    }
}

/// Read a y/n answer; anything else asks again
pub fn parse_consent(answer: &str) -> Option<bool> {
    match answer.trim().to_lowercase().as_str() {
        "y" | "yes" => Some(true),
        "n" | "no" => Some(false),
        _ => None,
    }
}

/// Consent hook prompting on the terminal
pub struct StdinConsent;

impl OverwriteConsent for StdinConsent {
    fn confirm(&self, path: &Path, exists: bool) -> bool {
        let action = if exists { "Overwrite existing file" } else { "Create new file at" };
        println!("{}: {}", action, path.display());

        let stdin = std::io::stdin();
        let mut answer = String::new();
        loop {
            print!("Allow this action? (y/n): ");
            if std::io::stdout().flush().is_err() {
                return false;
            }

            answer.clear();
            match stdin.lock().read_line(&mut answer) {
                Ok(0) | Err(_) => return false,
                Ok(_) => {}
            }
            if let Some(allowed) = parse_consent(&answer) {
                return allowed;
            }
        }
    }
}

/// Wire the engine from a settings snapshot
pub async fn build_engine(settings: Arc<Settings>) -> AssistantResult<Engine<RealInteractionLog>> {
    let completion = LocalModelClient::from_settings(&settings.model)
        .await?
        .map(|client| Box::new(client) as Box<dyn CompletionClient>);

    match settings.model.endpoint.as_deref() {
        Some(endpoint) => component_info!(Component::Cli, "Using completion server at {}", endpoint),
        None => component_info!(Component::Cli, "No completion server configured, using templates"),
    }

    let interaction_log = RealInteractionLog::open(
        settings.learning.memory_dir.clone(),
        settings.learning.max_memory_entries,
    )
    .await?;

    Ok(Engine::new(settings, completion, interaction_log))
}

/// First `PREVIEW_CHARS` characters, marked when cut
pub fn preview(output: &str) -> String {
    let mut shown: String = output.chars().take(PREVIEW_CHARS).collect();
    if output.chars().count() > PREVIEW_CHARS {
        shown.push_str("\n...");
    }
    shown
}

pub fn format_result(result: &GenerationResult) -> String {
    let mut report = String::new();

    if !result.success {
        let _ = writeln!(report, "Generation failed: {}", result.error.as_deref().unwrap_or("unknown error"));
        return report;
    }

    let _ = writeln!(report, "{}", preview(&result.output));
    let _ = writeln!(report);
    let _ = writeln!(report, "Category: {}", result.metadata.category);
    if let Some(collaborator) = &result.metadata.collaborator {
        let _ = writeln!(report, "Generated by: {}", collaborator);
    }
    if let Some(score) = result.metadata.quality_score {
        let _ = writeln!(report, "Quality: {:.2}", score);
    }
    let _ = writeln!(report, "Time: {:.2}s", result.duration.as_secs_f64());
    if !result.metadata.suggestions.is_empty() {
        let _ = writeln!(report, "Suggestions:");
        for suggestion in &result.metadata.suggestions {
            let _ = writeln!(report, "  - {}", suggestion);
        }
    }
    report
}

pub fn format_statistics(stats: &EngineStatistics) -> String {
    format!(
        "Tasks completed: {}\nSuccess rate: {:.1}%\nAverage time: {:.0} ms\nActive: {}  Retained: {}  Pending: {}\nCompletion server: {}",
        stats.tasks_completed,
        stats.success_rate * 100.0,
        stats.average_duration_ms,
        stats.active_tasks,
        stats.completed_tasks,
        stats.pending_tasks,
        if stats.has_completion { "configured" } else { "none" },
    )
}

pub fn format_similar(matches: &[SimilarInteraction]) -> String {
    if matches.is_empty() {
        return "No similar past requests".to_string();
    }

    let mut report = String::from("Similar past requests:\n");
    for found in matches {
        let _ = writeln!(report, "  [{:.2}] {} ({})", found.similarity, found.record.input, found.record.id);
    }
    report
}
