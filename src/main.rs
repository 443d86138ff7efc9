mod agent;
mod cli;
mod config;
mod llm;
mod logging;
mod session;
mod tools;

use std::io::{self, BufRead, BufReader, Write};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::{ArgAction, Parser};
use dotenvy::dotenv;
use tracing::info;

use crate::agent::TurnOrchestrator;
use crate::cli::Command;
use crate::config::AppConfig;
use crate::llm::{ModelGateway, OpenAIClient};
use crate::session::ConversationStore;
use crate::tools::ToolRegistry;

#[derive(Parser, Debug, Clone, Default)]
#[command(
    name = "seo-agent",
    version,
    about = "SEO & content assistant with single-step local tool calls"
)]
pub struct Cli {
    /// OpenAI-compatible API base URL
    #[arg(long)]
    base_url: Option<String>,

    /// Model identifier
    #[arg(long)]
    model: Option<String>,

    /// API token (TOKEN in .seo-agent/secrets.toml or the environment recommended)
    #[arg(long)]
    api_key: Option<String>,

    /// Maximum tokens per completion
    #[arg(long)]
    max_tokens: Option<u32>,

    /// Sampling temperature
    #[arg(long)]
    temperature: Option<f64>,

    /// Advertise tools as native function definitions and honour structured tool calls
    #[arg(long, action = ArgAction::SetTrue)]
    native_tools: bool,

    /// Log level or filter directive (default: $SEO_AGENT_LOG, then info)
    #[arg(long)]
    log_level: Option<String>,

    /// Write logs to this file instead of stderr
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Run a single turn with this message and exit
    #[arg(long, short)]
    prompt: Option<String>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    dotenv().ok();
    let cli = Cli::parse();
    let level = cli
        .log_level
        .clone()
        .or_else(|| std::env::var("SEO_AGENT_LOG").ok())
        .unwrap_or_else(|| "info".to_string());
    logging::init_logging(&level, cli.log_file.as_deref())?;

    let cfg = AppConfig::from_cli(&cli)?;
    info!(
        base_url = %cfg.base_url,
        model = %cfg.model,
        max_tokens = cfg.max_tokens,
        native_tools = cfg.native_tools,
        "app config"
    );

    let client = OpenAIClient::with_llm_config(
        cfg.base_url.clone(),
        cfg.api_key.clone(),
        cfg.llm.clone(),
    )?;
    let registry = Arc::new(ToolRegistry::with_defaults());
    let orchestrator = TurnOrchestrator::new(client, registry, cfg.turn_settings());

    match cli.prompt.as_deref() {
        Some(prompt) => run_once(&orchestrator, prompt).await,
        None => run_cli_loop(&orchestrator).await,
    }
}

async fn run_once<G: ModelGateway>(
    orchestrator: &TurnOrchestrator<G>,
    prompt: &str,
) -> Result<()> {
    let mut store = ConversationStore::new();
    match store.submit(prompt, orchestrator).await {
        Ok(Some(added)) => {
            for m in added.iter().skip(1) {
                println!("{}", cli::render_message(m));
            }
            Ok(())
        }
        Ok(None) => Ok(()),
        Err(e) => Err(anyhow::Error::new(e).context("agent error")),
    }
}

async fn run_cli_loop<G: ModelGateway>(orchestrator: &TurnOrchestrator<G>) -> Result<()> {
    println!("AI SEO & Content Generator - type /help for commands");
    let mut store = ConversationStore::new();
    let mut lines = BufReader::new(io::stdin()).lines();

    loop {
        print!("> ");
        io::stdout().flush()?;
        let Some(line) = lines.next() else {
            break;
        };
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        if let Some(cmd) = cli::parse_command(&line) {
            match cmd {
                Command::Help => cli::print_help(),
                Command::Tools => println!("{}", cli::render_tools(orchestrator.tools())),
                Command::Calls => println!("{}", cli::render_tool_calls(store.tool_calls())),
                Command::History => {
                    for m in store.messages() {
                        println!("{}", cli::render_message(m));
                    }
                }
                Command::Reset => {
                    store.reset();
                    println!("Started a new conversation.");
                }
                Command::Clear => cli::clear_screen(),
                Command::Quit => break,
                Command::Unknown(c) => eprintln!("unknown command: {c} (try /help)"),
            }
            continue;
        }

        match store.submit(&line, orchestrator).await {
            Ok(Some(added)) => {
                for m in added.iter().skip(1) {
                    println!("{}", cli::render_message(m));
                }
            }
            Ok(None) => {}
            Err(e) => eprintln!("Agent error: {e}"),
        }
    }

    Ok(())
}
