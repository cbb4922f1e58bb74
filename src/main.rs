//! supportdesk - Main CLI Entry Point

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use tracing_subscriber::EnvFilter;

use supportdesk::cli::display::{batch_progress, print_classification, print_response, print_status};
use supportdesk::cli::{Args, Commands, Verbosity};
use supportdesk::classifier::TicketClassifier;
use supportdesk::config::Config;
use supportdesk::models::ModelContext;
use supportdesk::triage::TriageService;
use supportdesk::types::{combine_text, load_tickets, Ticket, Topic};

fn init_tracing(verbosity: Verbosity) {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(verbosity.filter_directive())),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Load configuration, applying `--offline` on top
fn load_config(args: &Args) -> Result<Config> {
    let mut config = Config::load(args.config.clone()).context("Failed to load configuration")?;
    if args.offline {
        config.generator.enabled = false;
        config.embedding.enabled = false;
        config.scrape.enabled = false;
    }
    Ok(config)
}

async fn load_models(config: &Config, verbosity: Verbosity) -> ModelContext {
    let models = ModelContext::load(config).await;
    if verbosity.show_progress() {
        print_status(models.status());
        println!();
    }
    models
}

async fn run_classify(config: &Config, verbosity: Verbosity, subject: &str, description: &str) -> Result<()> {
    let models = load_models(config, verbosity).await;
    let classifier = TicketClassifier::new(models, &config.classifier);
    let classification = classifier.classify(subject, description).await;
    print_classification(&classification);
    Ok(())
}

async fn run_batch(config: &Config, verbosity: Verbosity, path: &std::path::Path) -> Result<()> {
    let tickets = load_tickets(path)
        .with_context(|| format!("Failed to load tickets from {}", path.display()))?;
    // Stdout carries the JSON result only
    let models = ModelContext::load(config).await;
    let classifier = TicketClassifier::new(models, &config.classifier);

    let pb = verbosity.show_progress().then(|| batch_progress(tickets.len()));
    let mut results = Vec::with_capacity(tickets.len());
    for ticket in &tickets {
        results.push(classifier.classify_ticket(ticket).await);
        if let Some(pb) = &pb {
            pb.inc(1);
        }
    }
    if let Some(pb) = pb {
        pb.finish_and_clear();
    }

    println!("{}", serde_json::to_string_pretty(&results)?);
    Ok(())
}

async fn run_ask(config: &Config, verbosity: Verbosity, query: &str, topics: Vec<Topic>) -> Result<()> {
    let models = load_models(config, verbosity).await;
    let service = TriageService::with_models(config, models)
        .await
        .context("Failed to build knowledge store")?;

    let topics = if topics.is_empty() {
        let classification = service.classifier().classify(query, "").await;
        print_classification(&classification);
        println!();
        classification.topic_tags
    } else {
        topics
    };

    let response = service.responder().generate_response(query, &topics).await;
    print_response(&response);
    Ok(())
}

async fn run_triage(config: &Config, verbosity: Verbosity, subject: &str, description: &str) -> Result<()> {
    let models = load_models(config, verbosity).await;
    let service = TriageService::with_models(config, models)
        .await
        .context("Failed to build knowledge store")?;

    let ticket = Ticket::new(subject, description);
    tracing::debug!(text = %combine_text(subject, description), "triaging ticket");
    let outcome = service.handle(&ticket).await;

    print_classification(&outcome.classification);
    println!();
    if outcome.was_routed() {
        println!("{}", "Routed".bold().yellow());
    }
    print_response(&outcome.response);
    Ok(())
}

fn run_config(args: &Args, config: &Config) -> Result<()> {
    let path = args.config.clone().or_else(Config::default_path);
    if let Some(path) = path {
        println!("{} {}", "# Config file:".dimmed(), path.display().to_string().dimmed());
    }
    let mut shown = config.clone();
    if shown.generator.api_key.is_some() {
        shown.generator.api_key = Some("********".to_string());
    }
    println!("{}", toml::to_string_pretty(&shown).context("Failed to render configuration")?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let verbosity = args.verbosity();
    init_tracing(verbosity);

    let config = load_config(&args)?;

    match &args.command {
        Commands::Classify { subject, description } => {
            run_classify(&config, verbosity, subject, description).await
        }
        Commands::Batch { path } => run_batch(&config, verbosity, path).await,
        Commands::Ask { query, topics } => run_ask(&config, verbosity, query, topics.clone()).await,
        Commands::Triage { subject, description } => {
            run_triage(&config, verbosity, subject, description).await
        }
        Commands::Config => run_config(&args, &config),
    }
}
