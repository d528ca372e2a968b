use crate::api::ApiParser;
use crate::config::Config;
use crate::naming::NamingStrategy;
use crate::serializer::{serialize_json, serialize_yaml, write_to_file};
use anyhow::Result;
use clap::{Parser, ValueEnum};
use log::{debug, info};
use std::path::PathBuf;

/// Generate an OpenAPI document from annotated doc comments in Rust sources
#[derive(Parser, Debug)]
#[command(name = "openapi-from-annotations")]
#[command(author, version, about, long_about = None)]
pub struct CliArgs {
    /// Directory to scan for annotated Rust files
    #[arg(value_name = "SEARCH_DIR")]
    pub search_dir: PathBuf,

    /// File holding the general API info, relative to SEARCH_DIR
    #[arg(short = 'g', long = "general-info", default_value = "src/main.rs")]
    pub general_info: PathBuf,

    /// Output format (yaml or json)
    #[arg(short = 'f', long = "format", value_enum, default_value = "yaml")]
    pub output_format: OutputFormat,

    /// Output file path (if not specified, outputs to stdout)
    #[arg(short = 'o', long = "output", value_name = "FILE")]
    pub output_path: Option<PathBuf>,

    /// Directory of <tag>.md files that replace inline tag descriptions
    #[arg(long = "markdown-dir", value_name = "DIR")]
    pub markdown_dir: Option<PathBuf>,

    /// Property naming strategy for fields without serde renames
    #[arg(short = 'p', long = "property-strategy", value_enum)]
    pub property_strategy: Option<NamingStrategy>,

    /// YAML or JSON configuration file
    #[arg(short = 'c', long = "config", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Directory to skip while scanning (repeatable)
    #[arg(long = "exclude", value_name = "DIR")]
    pub exclude: Vec<PathBuf>,

    /// Enable verbose output
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,
}

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Yaml,
    Json,
}

/// Validate and log already-parsed arguments
pub fn parse_args_from_parsed(args: CliArgs) -> Result<CliArgs> {
    debug!("Parsed arguments: {:?}", args);

    if !args.search_dir.exists() {
        anyhow::bail!("Search directory does not exist: {}", args.search_dir.display());
    }
    if !args.search_dir.is_dir() {
        anyhow::bail!("Search directory is not a directory: {}", args.search_dir.display());
    }
    if let Some(dir) = &args.markdown_dir {
        if !dir.is_dir() {
            anyhow::bail!("Markdown directory is not a directory: {}", dir.display());
        }
    }

    info!("Search directory: {}", args.search_dir.display());
    info!("General info: {}", args.general_info.display());
    info!("Output format: {:?}", args.output_format);
    match &args.output_path {
        Some(output) => info!("Output file: {}", output.display()),
        None => info!("Output: stdout"),
    }

    Ok(args)
}

/// Merge the config file (if any) with command-line overrides.
pub fn load_config(args: &CliArgs) -> Result<Config> {
    let mut config = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };

    if let Some(strategy) = args.property_strategy {
        config.property_naming = Some(strategy);
    }
    if let Some(dir) = &args.markdown_dir {
        config.markdown_dir = Some(dir.clone());
    }

    Ok(config)
}

/// Run the main workflow
pub fn run(args: CliArgs) -> Result<()> {
    info!("Starting OpenAPI document generation...");

    let ctx = load_config(&args)?.into_context();
    let document = ApiParser::new(ctx)
        .with_excludes(args.exclude.clone())
        .parse_api(&args.search_dir, &args.general_info)?;

    info!("Serializing to {:?} format...", args.output_format);
    let content = match args.output_format {
        OutputFormat::Yaml => serialize_yaml(&document)?,
        OutputFormat::Json => serialize_json(&document)?,
    };

    if let Some(output_path) = &args.output_path {
        info!("Writing output to: {}", output_path.display());
        write_to_file(&content, output_path)?;
        info!("Successfully wrote OpenAPI document to {}", output_path.display());
    } else {
        println!("{}", content);
    }

    info!("Generation complete!");
    info!("  - Paths: {}", document.paths.len());
    info!("  - Tags: {}", document.tags.len());

    Ok(())
}
