//! CLI binary for wikifit.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;
use wikifit::bmi::{self, HeightUnit};
use wikifit::{AnswerExtractor, Source, SourceResult, Topic, WikiFitConfig};

/// WikiFit: health and fitness knowledge from Wikimedia.
#[derive(Parser)]
#[command(name = "wikifit", version, about)]
struct Cli {
    /// Path to TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Subcommand to run.
    #[command(subcommand)]
    command: Command,
}

/// Available commands.
#[derive(Subcommand)]
enum Command {
    /// Look a term up across all Wikimedia sources.
    Search {
        /// The term to look up.
        term: String,

        /// Print the raw result as JSON.
        #[arg(long)]
        json: bool,

        /// Query a single source (e.g. wikipedia, commons, wikidata).
        #[arg(long)]
        source: Option<Source>,
    },

    /// Ask a question about one of the built-in topics.
    Ask {
        /// Topic whose passage the answer is taken from.
        #[arg(long, default_value = "general")]
        topic: Topic,

        /// The question.
        question: String,
    },

    /// Compute Body Mass Index.
    Bmi {
        /// Weight in kilograms.
        weight_kg: f64,

        /// Height in the chosen unit.
        height: f64,

        /// Height unit: m, cm or ft (5.7 ft = 5 ft 7 in).
        #[arg(long, default_value = "m")]
        unit: HeightUnit,
    },

    /// List the question-answering topics.
    Topics,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Users can override with RUST_LOG=debug to see everything.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new("wikifit=info,wikifit_sources=info,hf_hub=warn,ort=warn")
        }))
        .init();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Command::Search { term, json, source } => run_search(&config, &term, json, source).await,
        Command::Ask { topic, question } => run_ask(config, topic, question).await,
        Command::Bmi {
            weight_kg,
            height,
            unit,
        } => {
            run_bmi(weight_kg, height, unit);
            Ok(())
        }
        Command::Topics => {
            list_topics();
            Ok(())
        }
    }
}

/// Explicit path, else the default path if present, else defaults.
fn load_config(path: Option<&std::path::Path>) -> anyhow::Result<WikiFitConfig> {
    let config = match path {
        Some(path) => WikiFitConfig::from_file(path)?,
        None => {
            let default = WikiFitConfig::default_config_path();
            if default.exists() {
                info!("using config {}", default.display());
                WikiFitConfig::from_file(&default)?
            } else {
                WikiFitConfig::default()
            }
        }
    };
    config.validate()?;
    Ok(config)
}

async fn run_search(
    config: &WikiFitConfig,
    term: &str,
    json: bool,
    source: Option<Source>,
) -> anyhow::Result<()> {
    if let Some(source) = source {
        let result = wikifit::sources::fetch_source(source, term, &config.sources).await;
        if json {
            println!("{}", serde_json::to_string_pretty(&result)?);
        } else {
            print_section(source, &result);
        }
        return Ok(());
    }

    let aggregated = wikifit::sources::aggregate(term, &config.sources).await;
    if json {
        println!("{}", serde_json::to_string_pretty(&aggregated)?);
        return Ok(());
    }

    println!("Results for {}", aggregated.term);
    for (source, result) in aggregated.iter() {
        print_section(source, result);
    }
    Ok(())
}

fn print_section(source: Source, result: &SourceResult) {
    println!("\n== {source} ==");
    match result {
        SourceResult::Text(text) => println!("{text}"),
        SourceResult::Error(message) => println!("{message}"),
        SourceResult::Images(images) if images.is_empty() => {
            println!("{}", wikifit::sources::adapter::empty_message(source));
        }
        SourceResult::Images(images) => {
            for image in images {
                println!("- {} <{}>", image.title, image.thumbnail_url);
                if !image.description.is_empty() {
                    println!("  {}", image.description);
                }
            }
        }
        SourceResult::Snippets(snippets) if snippets.is_empty() => {
            println!("{}", wikifit::sources::adapter::empty_message(source));
        }
        SourceResult::Snippets(snippets) => {
            for snippet in snippets {
                println!("- {}: {}", snippet.title, snippet.snippet);
            }
        }
        SourceResult::Entity(entity) => {
            println!("{}: {}", entity.label, entity.description);
            for property in &entity.properties {
                println!("  {}: {}", property.name, property.values.join(", "));
            }
        }
    }
}

async fn run_ask(config: WikiFitConfig, topic: Topic, question: String) -> anyhow::Result<()> {
    // Loading may download the model and inference is blocking.
    let answer = tokio::task::spawn_blocking(move || {
        AnswerExtractor::shared(&config.qa).answer(&question, topic.passage())
    })
    .await?;

    println!("Answer: {answer}");
    println!("\n{}", topic.disclaimer());
    Ok(())
}

fn run_bmi(weight_kg: f64, height: f64, unit: HeightUnit) {
    match bmi::calculate(weight_kg, height, unit) {
        Some(reading) => {
            println!("Your BMI: {:.2}", reading.value);
            println!("Category: {}", reading.category);
        }
        None => println!("Please enter a positive weight and height."),
    }
}

fn list_topics() {
    for topic in Topic::all() {
        println!("{} ({})", topic.name(), topic.id());
        for line in topic.passage().lines() {
            println!("  {line}");
        }
        println!();
    }
}
