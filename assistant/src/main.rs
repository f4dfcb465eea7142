//! Main entry point for the modforge binary
//!
//! One-shot mode when a request is given on the command line, otherwise an
//! interactive session reading requests from stdin.

use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use anyhow::Context;
use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};

use assistant::cli::{self, ReplCommand, StdinConsent, ENDPOINT_ENV, HELP_TEXT};
use assistant::{ConfigStore, Engine, GenerationRequest, InteractionLog, OutputWriter};
use shared::{component_warn, logging, Category, Component, Priority};

/// Minecraft modding assistant generating Fabric Java skeletons
#[derive(Parser)]
#[command(name = "modforge")]
#[command(about = "Generate Minecraft mod code from plain-language requests")]
pub struct Args {
    /// Request to run once, e.g. "create a diamond ore block"
    pub command: Vec<String>,

    /// Write the generated code to this file
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Force a category (block, item, entity, general) instead of classifying
    #[arg(long)]
    pub category: Option<String>,

    /// Scheduling priority (low, normal, high, critical)
    #[arg(long, default_value = "normal")]
    pub priority: String,

    /// Extra context for the completion server, as KEY=VALUE (repeatable)
    #[arg(long = "context", value_parser = cli::parse_context_entry)]
    pub context: Vec<(String, String)>,

    /// Skip output path checks
    #[arg(long = "unsafe")]
    pub unsafe_mode: bool,

    /// Directory holding the configuration documents
    #[arg(long, default_value = "config")]
    pub config_dir: PathBuf,

    /// Completion server base URL (overrides config and environment)
    #[arg(long)]
    pub model_endpoint: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    pub log_level: String,

    /// List similar past requests before generating
    #[arg(long)]
    pub similar: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    logging::init_tracing(Some(&args.log_level));
    logging::log_startup(Component::Cli, &format!("config dir {}", args.config_dir.display()));

    let store = ConfigStore::open(&args.config_dir)
        .await
        .with_context(|| format!("loading configuration from {}", args.config_dir.display()))?;

    let mut settings = store.snapshot();
    let endpoint = args
        .model_endpoint
        .clone()
        .or_else(|| std::env::var(ENDPOINT_ENV).ok())
        .or_else(|| settings.model.endpoint.clone());
    settings = settings.with_endpoint(endpoint);
    if args.unsafe_mode {
        settings.safe_mode = false;
    }
    let settings = Arc::new(settings);

    let options = RequestOptions {
        category: args.category.as_deref().map(Category::from_name).transpose()?,
        priority: Priority::from_name(&args.priority)?,
        context: args.context.clone(),
    };

    let engine = cli::build_engine(Arc::clone(&settings)).await?;

    if args.command.is_empty() {
        run_interactive(&engine, &options, args.similar).await
    } else {
        let text = args.command.join(" ");
        run_once(&engine, &text, &options, &args).await
    }
}

/// Per-request settings taken from the command line
struct RequestOptions {
    category: Option<Category>,
    priority: Priority,
    context: Vec<(String, String)>,
}

impl RequestOptions {
    fn request(&self, text: impl Into<String>) -> GenerationRequest {
        let mut request = GenerationRequest::new(text).with_priority(self.priority);
        if let Some(category) = self.category {
            request = request.with_category(category);
        }
        for (key, value) in &self.context {
            request = request.with_context(key.as_str(), value.as_str());
        }
        request
    }
}

async fn run_once<L: InteractionLog>(
    engine: &Engine<L>,
    text: &str,
    options: &RequestOptions,
    args: &Args,
) -> anyhow::Result<()> {
    if args.similar {
        println!("{}", cli::format_similar(&engine.find_similar(text).await?));
    }

    engine.enqueue(options.request(text)).await;
    let result = engine
        .run_pending()
        .await?
        .pop()
        .context("queued request produced no result")?;
    print!("{}", cli::format_result(&result));

    if let (Some(path), true) = (&args.output, result.success) {
        let settings = engine.settings();
        let writer = OutputWriter::in_current_dir(settings.file_policy.clone(), settings.safe_mode)?
            .with_consent(Box::new(StdinConsent), settings.confirm_overwrites);
        match writer.write(path, &result.output).await? {
            Some(written) => {
                logging::log_success(Component::Output, &format!("Saved to {}", written.display()));
                println!("Saved to {}", written.display());
            }
            None => println!("File creation canceled"),
        }
    }

    println!("{}", cli::format_statistics(&engine.statistics().await));

    if !result.success {
        anyhow::bail!("generation failed");
    }
    Ok(())
}

async fn run_interactive<L: InteractionLog>(
    engine: &Engine<L>,
    options: &RequestOptions,
    show_similar: bool,
) -> anyhow::Result<()> {
    println!("modforge interactive session. Type 'help' for commands.");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        print!("modforge> ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };

        match ReplCommand::parse(&line) {
            ReplCommand::Empty => continue,
            ReplCommand::Help => println!("{}", HELP_TEXT),
            ReplCommand::Stats => println!("{}", cli::format_statistics(&engine.statistics().await)),
            ReplCommand::Exit => break,
            ReplCommand::Request(text) => {
                if show_similar {
                    match engine.find_similar(&text).await {
                        Ok(matches) => println!("{}", cli::format_similar(&matches)),
                        Err(e) => component_warn!(Component::Cli, "Similarity lookup failed: {}", e),
                    }
                }

                match engine.generate(options.request(text)).await {
                    Ok(result) => print!("{}", cli::format_result(&result)),
                    Err(e) => logging::log_error(Component::Cli, "Generation could not be saved", &e),
                }
            }
        }
    }

    println!("Goodbye");
    Ok(())
}
