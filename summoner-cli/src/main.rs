//! Summoner CLI - chat with the League of Legends assistant

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

use summoner_core::assistant::composers;
use summoner_core::prelude::*;

#[derive(Parser)]
#[command(name = "summoner")]
#[command(about = "Assistant League of Legends en français", long_about = None)]
#[command(version)]
struct Cli {
    /// Extra configuration file, merged before environment overrides
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive conversation
    Chat,
    /// Ask a single question
    Ask {
        /// The question
        #[arg(required = true, num_args = 1..)]
        question: Vec<String>,
    },
    /// Show derived statistics for a champion
    Champion {
        /// Champion name
        name: String,
        /// Print the enriched record as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print the effective configuration
    Config,
    /// Version information
    Version,
}

const BANNER: &str = "Assistant League of Legends
Posez vos questions en français, par exemple :
- Quelles sont les stats d'Ahri ?
- Quel est le Q de Lee Sin ?
- Quels sont les counters de Yasuo en mid ?
- C'est quoi le rôle de jungler ?
Tapez 'quit' ou 'exit' pour quitter.";

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        tracing_subscriber::EnvFilter::new("summoner_core=debug,summoner=debug,info")
    } else {
        tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(path: Option<&PathBuf>) -> Result<SummonerConfig> {
    if let Some(path) = path {
        anyhow::ensure!(path.exists(), "configuration file not found: {}", path.display());
    }
    SummonerConfig::load_with(path).context("failed to load configuration")
}

async fn chat(assistant: Arc<Assistant>, config: &SummonerConfig) -> Result<()> {
    let mut session = Session::from_config(&config.session);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    println!("{}", BANNER);
    if !assistant.has_fallback() {
        println!("(aucun modèle de langage configuré : réponses structurées uniquement)");
    }

    loop {
        stdout.write_all(b"\nVous : ").await?;
        stdout.flush().await?;

        let Some(line) = lines.next_line().await? else {
            println!();
            break;
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if matches!(line.to_lowercase().as_str(), "quit" | "exit") {
            break;
        }

        // Ctrl-C aborts the turn in flight, not the program
        session.rearm();
        let token = session.cancellation();
        let watcher = tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                token.cancel();
            }
        });

        let reply = assistant.respond(&mut session, line).await;
        watcher.abort();

        println!("\nAssistant : {}", reply);
    }

    tracing::debug!(session = %session.id(), turns = session.history().len(), "chat ended");
    println!("À bientôt, invocateur !");
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Version => {
            println!("summoner {}", env!("CARGO_PKG_VERSION"));
            println!("summoner-core {}", summoner_core::VERSION);
        }
        Commands::Config => {
            let config = load_config(cli.config.as_ref())?;
            println!("{}", serde_json::to_string_pretty(&config.redacted())?);
        }
        Commands::Champion { name, json } => {
            let config = load_config(cli.config.as_ref())?;
            let assistant = Assistant::from_config(&config)?;
            let enriched = assistant
                .champion(&name)
                .await
                .with_context(|| format!("no data for champion '{}'", name))?;

            if json {
                println!("{}", serde_json::to_string_pretty(&enriched)?);
            } else {
                let text = composers::stats(&enriched)
                    .context("incomplete level projections")?;
                println!("{}", text);
            }
        }
        Commands::Ask { question } => {
            let config = load_config(cli.config.as_ref())?;
            let assistant = Assistant::from_config(&config)?;
            let mut session = Session::from_config(&config.session);
            let reply = assistant.respond(&mut session, &question.join(" ")).await;
            println!("{}", reply);
        }
        Commands::Chat => {
            let config = load_config(cli.config.as_ref())?;
            let assistant = Arc::new(Assistant::from_config(&config)?);
            chat(assistant, &config).await?;
        }
    }

    Ok(())
}
