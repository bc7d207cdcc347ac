//! PicNGo CLI - analyze a food photo or look up an ingredient.

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use picngo::prelude::*;
use picngo::settings::default_settings_path;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::Level;
use tracing_subscriber::EnvFilter;

/// PicNGo - nutritional assessment of food photos
#[derive(Parser)]
#[command(name = "picngo")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Settings file path
    #[arg(long, env = "PICNGO_SETTINGS", global = true)]
    settings: Option<PathBuf>,

    /// API key for this run, overriding the stored one
    #[arg(long, env = "OPENAI_API_KEY", global = true, hide_env_values = true)]
    api_key: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze a food photo
    Analyze(AnalyzeArgs),

    /// Look up details for a single ingredient
    Ingredient(IngredientArgs),

    /// Show or change stored settings
    #[command(subcommand)]
    Settings(SettingsCommand),
}

#[derive(Args)]
struct AnalyzeArgs {
    /// JPEG, PNG, GIF or WebP image
    image: PathBuf,

    /// Also look up every detected ingredient
    #[arg(short, long)]
    details: bool,

    /// Print the decoded result as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
struct IngredientArgs {
    /// Ingredient name, e.g. "turmeric"
    name: String,

    /// Print the decoded result as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Subcommand)]
enum SettingsCommand {
    /// Show the stored settings
    Show,
    /// Store the OpenAI API key
    SetKey { key: String },
    /// Remove the stored API key
    ClearKey,
    /// Set the response language (en, ja, zh)
    SetLanguage { language: Language },
}

fn main() -> ExitCode {
    dotenv::dotenv().ok();
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("failed to create tokio runtime: {e}");
            return ExitCode::FAILURE;
        }
    };

    match rt.block_on(run(cli)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            eprintln!("Run the same command again to retry.");
            ExitCode::FAILURE
        }
    }
}

/// Initialize logging with the given verbosity level.
fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => Level::WARN,
        1 => Level::INFO,
        _ => Level::DEBUG,
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("picngo={level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(verbosity >= 2)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let store = SettingsStore::open(cli.settings.unwrap_or_else(default_settings_path));

    match cli.command {
        Commands::Settings(command) => cmd_settings(&store, command),
        Commands::Analyze(args) => {
            let settings = snapshot(&store, cli.api_key)?;
            cmd_analyze(args, &settings).await
        }
        Commands::Ingredient(args) => {
            let settings = snapshot(&store, cli.api_key)?;
            cmd_ingredient(args, &settings).await
        }
    }
}

/// Stored settings, with the key replaced by `--api-key` when given
fn snapshot(store: &SettingsStore, api_key: Option<String>) -> anyhow::Result<Settings> {
    let mut settings = store
        .load()
        .with_context(|| format!("failed to load settings from {}", store.path().display()))?;
    if let Some(key) = api_key.filter(|key| !key.trim().is_empty()) {
        settings.api_key = key;
    }
    Ok(settings)
}

async fn cmd_analyze(args: AnalyzeArgs, settings: &Settings) -> anyhow::Result<()> {
    let analyzer = FoodAnalyzer::openai(OpenAIConfig::default())?;

    eprintln!("Analyzing {} ...", args.image.display());
    let result = analyzer.analyze_food_file(&args.image, settings).await?;

    let details = if args.details {
        let lookups = result
            .ingredients
            .iter()
            .map(|name| analyzer.analyze_ingredient(name, settings));
        futures::future::join_all(lookups).await
    } else {
        Vec::new()
    };

    if args.json {
        let details: Vec<_> = result
            .ingredients
            .iter()
            .zip(&details)
            .map(|(name, detail)| match detail {
                Ok(analysis) => serde_json::json!({"name": name, "analysis": analysis}),
                Err(e) => serde_json::json!({"name": name, "error": e.to_string()}),
            })
            .collect();
        let mut output = serde_json::to_value(&result)?;
        if args.details {
            output["ingredient_details"] = serde_json::Value::Array(details);
        }
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    print_food(&result);
    for (name, detail) in result.ingredients.iter().zip(&details) {
        println!();
        println!("── {name} ──");
        match detail {
            Ok(analysis) => print_ingredient(analysis),
            Err(e) => println!("  Could not look up ingredient: {e}"),
        }
    }
    Ok(())
}

async fn cmd_ingredient(args: IngredientArgs, settings: &Settings) -> anyhow::Result<()> {
    let analyzer = FoodAnalyzer::openai(OpenAIConfig::default())?;
    let analysis = analyzer.analyze_ingredient(&args.name, settings).await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&analysis)?);
    } else {
        println!("{}", args.name);
        print_ingredient(&analysis);
    }
    Ok(())
}

fn cmd_settings(store: &SettingsStore, command: SettingsCommand) -> anyhow::Result<()> {
    let settings = match command {
        SettingsCommand::Show => store.load()?,
        SettingsCommand::SetKey { key } => store.set_api_key(&key)?,
        SettingsCommand::ClearKey => store.clear_api_key()?,
        SettingsCommand::SetLanguage { language } => store.set_language(language)?,
    };

    println!("Settings file: {}", store.path().display());
    if settings.has_valid_key() {
        println!("API key:       {}", settings.masked_key());
    } else {
        println!("API key:       (not set)");
    }
    println!("Language:      {} ({})", settings.language, settings.language.code());
    println!("Model:         {}", picngo::llm::DEFAULT_MODEL);
    Ok(())
}

fn print_food(result: &FoodAnalysisResult) {
    println!("{}", result.food_name);
    if result.has_recognized_rating() {
        println!("{}", result.health_level());
    } else {
        println!(
            "{} (model returned unrecognized rating \"{}\")",
            result.health_level(),
            result.health_rating
        );
    }
    println!();
    println!("Health Assessment");
    println!("  {}", result.health_assessment);
    println!();
    println!("Calories");
    println!("  {}", result.calories_estimate);
    print_list("Ingredients", &result.ingredients);
    print_list("Health Tips", &result.tips);
}

fn print_ingredient(analysis: &IngredientAnalysis) {
    println!("What is it?");
    println!("  {}", analysis.what_it_is);
    print_list("Nutritional Highlights", &analysis.nutritional_highlights);
    print_list("Health Benefits", &analysis.health_benefits);
    print_list("Health Concerns", &analysis.health_concerns);
    println!();
    println!("Recommended Amount");
    println!("  {}", analysis.recommended_amount);
}

fn print_list(title: &str, items: &[String]) {
    if items.is_empty() {
        return;
    }
    println!();
    println!("{title}");
    for item in items {
        println!("  • {item}");
    }
}
