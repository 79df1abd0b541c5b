//! Syllabus Control - CLI client for the Syllabus daemon
//!
//! Talks to syllabusd over HTTP: one-shot generation, listings, health and an
//! interactive intake chat.

mod client;
mod commands;
mod repl;

use anyhow::Result;
use clap::{Parser, Subcommand};
use client::SyllabusClient;
use syllabus_shared::rpc::DEFAULT_LIST_LIMIT;
use syllabus_shared::{Language, VERSION};

#[derive(Parser)]
#[command(name = "syllabusctl")]
#[command(about = "Syllabus - course scenario assistant", long_about = None)]
#[command(version = VERSION)]
struct Cli {
    /// Base URL of syllabusd
    #[arg(long, global = true, env = "SYLLABUS_URL", default_value = "http://127.0.0.1:7870")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Chat through the intake questionnaire
    Chat {
        /// Conversation language (en, ar)
        #[arg(long, default_value = "en")]
        lang: Language,
    },

    /// Generate a scenario for a course title
    Generate {
        title: String,

        /// Target level (defaults to intermediate)
        #[arg(long)]
        level: Option<String>,
    },

    /// List the most recent scenarios
    Scenarios {
        #[arg(long, default_value_t = DEFAULT_LIST_LIMIT)]
        limit: usize,
    },

    /// List distinct course titles
    Titles,

    /// Show daemon and backend health
    Health,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let client = SyllabusClient::new(&cli.url)?;

    match cli.command {
        Commands::Chat { lang } => repl::start_repl(&client, lang).await,
        Commands::Generate { title, level } => {
            commands::generate(&client, &title, level.as_deref()).await
        }
        Commands::Scenarios { limit } => commands::scenarios(&client, limit).await,
        Commands::Titles => commands::titles(&client).await,
        Commands::Health => commands::health(&client).await,
    }
}
