//! # climate-qa: A CLI for the climate education assistant
//!
//! This is the main entry point for the `climate-qa` command-line interface.

use anyhow::Result;
use clap::{Parser, Subcommand};
use climate_qa::{config::get_config, Assistant, Session};
use climate_qa_cli::{chat, commands};
use std::{fs::File, io};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

// --- CLI Definition ---

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Path to the configuration file
    #[arg(long, global = true, env = "CONFIG_PATH")]
    config: Option<String>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Start an interactive chat session
    Chat(ChatArgs),
    /// Answer a single question and exit
    Ask(AskArgs),
    /// Show how a question would be routed, without generating an answer
    Classify(ClassifyArgs),
}

#[derive(Parser, Debug)]
struct ChatArgs {
    /// Resume under this session id instead of a random one
    #[arg(long)]
    session_id: Option<String>,
}

#[derive(Parser, Debug)]
struct AskArgs {
    /// The question to answer
    #[arg(required = true)]
    question: String,
    /// Print the reply with its routing metadata as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Parser, Debug)]
struct ClassifyArgs {
    /// The utterance to classify
    #[arg(required = true)]
    question: String,
}

// --- Main Application Entry ---

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    // Setup logging to a file
    let log_file = File::create("climate-qa-cli.log")?;
    let subscriber = fmt::Subscriber::builder()
        .with_writer(log_file)
        .with_env_filter(EnvFilter::from_default_env())
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let cli = Cli::parse();
    let config_path = cli.config.as_deref();

    // Handle the command
    match &cli.command {
        Commands::Chat(args) => {
            if let Err(e) = handle_chat(config_path, args).await {
                eprintln!("Chat failed: {e}");
                std::process::exit(1);
            }
        }
        Commands::Ask(args) => {
            if let Err(e) = handle_ask(config_path, args).await {
                eprintln!("Ask failed: {e}");
                std::process::exit(1);
            }
        }
        Commands::Classify(args) => {
            if let Err(e) = handle_classify(config_path, args) {
                eprintln!("Classify failed: {e}");
                std::process::exit(1);
            }
        }
    }

    Ok(())
}

// --- Command Handlers ---

fn build_assistant(config_path: Option<&str>) -> Result<Assistant> {
    let config = get_config(config_path)?;
    info!(provider = %config.generator.provider, "Configuration loaded");
    Ok(Assistant::from_config(&config)?)
}

async fn handle_chat(config_path: Option<&str>, args: &ChatArgs) -> Result<()> {
    let assistant = build_assistant(config_path)?;
    let mut session = match &args.session_id {
        Some(id) => Session::with_id(id.clone()),
        None => Session::new(),
    };
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    chat::run_chat(&assistant, &mut session, stdin.lock(), &mut stdout).await?;
    Ok(())
}

async fn handle_ask(config_path: Option<&str>, args: &AskArgs) -> Result<()> {
    let assistant = build_assistant(config_path)?;
    commands::ask(&assistant, &args.question, args.json, &mut io::stdout()).await
}

fn handle_classify(config_path: Option<&str>, args: &ClassifyArgs) -> Result<()> {
    let router = commands::load_router(config_path)?;
    commands::classify(&router, &args.question, &mut io::stdout())?;
    Ok(())
}
