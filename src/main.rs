//! go-gen CLI entrypoint
//! Parses command-line arguments and dispatches to the model generators.
#![deny(unsafe_code)]

// Internal imports (std, crate)
use go_gen::core::config::{Config, DEFAULT_TEMPLATE};
use go_gen::generator::{BaseGenerator, Generator, MongoGenerator};

// External imports (alphabetized)
use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use tracing::{Level, info};
use tracing_subscriber::EnvFilter;

const VERSION: &str = env!("CARGO_PKG_VERSION");
const COMMIT: &str = match option_env!("GO_GEN_COMMIT") {
    Some(commit) => commit,
    None => "none",
};
const BUILD_DATE: &str = match option_env!("GO_GEN_BUILD_DATE") {
    Some(date) => date,
    None => "unknown",
};

#[derive(Parser)]
#[command(name = "go-gen")]
#[command(author, version, about = "A code generation tool for Go projects")]
#[command(
    long_about = "A flexible code generation tool that supports multiple generators.\nIt can generate code for different purposes like models, services, and more."
)]
struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate model code
    #[command(long_about = "Generate model code for different databases like MongoDB, MySQL, etc.")]
    Model(ModelArgs),
    /// Print the version number
    Version,
}

#[derive(Args, Debug)]
pub struct ModelArgs {
    #[command(subcommand)]
    pub backend: ModelBackend,

    /// Model type name (required)
    #[arg(long = "type", global = true)]
    pub type_name: Option<String>,

    /// Output directory (required)
    #[arg(long, global = true)]
    pub dir: Option<String>,

    /// Template directory or Git repository URL
    #[arg(long, global = true, long_help = format!("Template directory or Git repository URL (default: {DEFAULT_TEMPLATE}, override with GO_GEN_TEMPLATE)"))]
    pub template: Option<String>,

    /// File naming style (snake|camel|pascal|kebab)
    #[arg(long, global = true, default_value = "snake")]
    pub file_style: String,
}

#[derive(Subcommand, Debug)]
pub enum ModelBackend {
    /// Generate MongoDB model code
    #[command(long_about = "Generate MongoDB model code with specified type and naming style.")]
    Mongo,
}

fn main() -> anyhow::Result<()> {
    // Initialize logging with default level INFO
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(Level::INFO.into()))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Model(args) => generate_model(args)?,
        Commands::Version => {
            println!("version: {VERSION}\ncommit: {COMMIT}\nbuilt at: {BUILD_DATE}");
        }
    }
    Ok(())
}

/// Generate model code for the selected backend
fn generate_model(args: ModelArgs) -> anyhow::Result<()> {
    let config = Config::load().context("Failed to load configuration")?;
    let template = args
        .template
        .unwrap_or_else(|| config.default_template.clone());

    let base = BaseGenerator::new(
        args.type_name.unwrap_or_default(),
        args.dir.unwrap_or_default(),
        template,
        args.file_style,
    );

    let generator: Box<dyn Generator> = match args.backend {
        ModelBackend::Mongo => {
            info!(type_name = %base.type_name, "Generating MongoDB model");
            Box::new(MongoGenerator::new(base, &config))
        }
    };

    generator
        .generate()
        .context("Failed to generate model code")?;

    info!("Model code generated successfully");
    Ok(())
}
