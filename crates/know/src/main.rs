// SPDX-FileCopyrightText: 2026 Know Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! know - Query your knowledge base through routed AI models.
//!
//! This is the binary entry point for the know CLI.

mod health;
mod models;
mod output;
mod query;
mod remember;

use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use know_config::model::KnowConfig;
use know_core::{Adapter, KnowError, Tier};
use know_opencode::OpenCodeClient;
use know_prefrontal::PrefrontalClient;
use know_router::ModelRouter;
use know_service::KnowledgeAiService;
use tracing::error;

use crate::models::ModelsOptions;
use crate::output::Painter;
use crate::query::QueryOptions;

/// know - Query your knowledge base through routed AI models.
#[derive(Parser, Debug)]
#[command(name = "know", version, about, long_about = None)]
struct Cli {
    /// Read configuration from this file instead of the standard locations.
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Disable colored output.
    #[arg(long, global = true)]
    plain: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Query your knowledge base with AI enrichment.
    Query {
        /// The question to ask.
        question: String,
        /// Explicit model (e.g. grok, claude, gemini, anthropic/claude-opus-4-6).
        #[arg(long)]
        model: Option<String>,
        /// Query several models and compare.
        #[arg(long)]
        consensus: bool,
        /// Skip knowledge fetching, pure AI query.
        #[arg(long)]
        no_context: bool,
        /// Output as JSON.
        #[arg(long)]
        json: bool,
        /// Max knowledge entries to include as context.
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Query several AI models and compare their responses.
    Consensus {
        /// The question to ask.
        question: String,
        /// Models to query (default: claude, grok, gemini).
        #[arg(long = "models", value_name = "MODEL", value_delimiter = ',')]
        models: Vec<String>,
        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },
    /// List the model routing table.
    Models {
        /// Filter by provider.
        #[arg(long)]
        provider: Option<String>,
        /// Filter by tier (fast, balanced, premium, custom).
        #[arg(long)]
        tier: Option<Tier>,
        /// Show only the intent routing table.
        #[arg(long)]
        routes: bool,
        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Check health of all connected services.
    Health {
        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Store a new knowledge entry.
    Remember {
        /// The knowledge to store.
        content: String,
        /// Title for the entry (default: first line of the content).
        #[arg(long)]
        title: Option<String>,
        /// Tags for categorization.
        #[arg(long = "tags", value_name = "TAG", value_delimiter = ',')]
        tags: Vec<String>,
        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let loaded = match &cli.config {
        Some(path) => know_config::load_and_validate_path(path),
        None => know_config::load_and_validate(),
    };
    let config = match loaded {
        Ok(config) => config,
        Err(errors) => {
            know_config::render_errors(&errors);
            return ExitCode::FAILURE;
        }
    };

    init_tracing(&config.general.log_level);

    let painter = Painter::detect(cli.plain);
    match run(cli.command, &config, painter).await {
        Ok(code) => code,
        Err(e) => {
            error!(error = %e, "command failed");
            eprintln!("know: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(
    command: Commands,
    config: &KnowConfig,
    painter: Painter,
) -> Result<ExitCode, KnowError> {
    let mut stdout = io::stdout().lock();
    let out = &mut stdout;

    let code = match command {
        Commands::Query {
            question,
            model,
            consensus,
            no_context,
            json,
            limit,
        } => {
            let service = build_service(config)?;
            let opts = QueryOptions {
                model,
                consensus,
                no_context,
                json,
                limit,
            };
            query::run_query(&service, &question, &opts, painter, out).await
        }
        Commands::Consensus {
            question,
            models,
            json,
        } => {
            let service = build_service(config)?;
            query::run_consensus(&service, &question, &models, json, painter, out).await
        }
        Commands::Models {
            provider,
            tier,
            routes,
            json,
        } => {
            let router = ModelRouter::from_config(&config.routing)?;
            let opts = ModelsOptions {
                provider,
                tier,
                routes_only: routes,
                json,
            };
            models::run_models(&router, &opts, painter, out)
        }
        Commands::Health { json } => {
            let opencode = OpenCodeClient::from_config(&config.opencode)?;
            let prefrontal = PrefrontalClient::from_config(&config.prefrontal)?;
            let adapters: [&dyn Adapter; 2] = [&opencode, &prefrontal];
            health::run_health(&adapters, json, painter, out).await
        }
        Commands::Remember {
            content,
            title,
            tags,
            json,
        } => {
            let prefrontal = PrefrontalClient::from_config(&config.prefrontal)?;
            remember::run_remember(&prefrontal, &content, title, tags, json, painter, out).await
        }
    };

    code.map_err(|e| KnowError::Internal(format!("failed to write output: {e}")))
}

fn build_service(config: &KnowConfig) -> Result<KnowledgeAiService, KnowError> {
    let backend = Arc::new(OpenCodeClient::from_config(&config.opencode)?);
    let knowledge = Arc::new(PrefrontalClient::from_config(&config.prefrontal)?);
    KnowledgeAiService::from_config(config, backend, knowledge)
}

/// Initialize the tracing subscriber on stderr so stdout stays clean for `--json`.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("know={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(true)
        .init();
}
