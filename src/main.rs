//! openapi-from-annotations - generate an OpenAPI document from annotated doc comments.
//!
//! # Usage
//!
//! ```bash
//! openapi-from-annotations [OPTIONS] <SEARCH_DIR>
//! ```
//!
//! # Examples
//!
//! Generate YAML documentation:
//! ```bash
//! openapi-from-annotations ./my-api -o openapi.yaml
//! ```
//!
//! Read tag descriptions from markdown files and camelCase property keys:
//! ```bash
//! openapi-from-annotations ./my-api --markdown-dir docs/tags -p camelcase -f json
//! ```

use anyhow::Result;
use clap::Parser;
use log::info;
use openapi_from_annotations::cli;

fn main() -> Result<()> {
    let args = cli::CliArgs::parse();

    let log_level = if args.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    env_logger::Builder::new()
        .filter_level(log_level)
        .parse_default_env()
        .init();

    info!("openapi-from-annotations starting...");

    let args = cli::parse_args_from_parsed(args)?;
    cli::run(args)?;

    info!("OpenAPI document generation completed successfully");

    Ok(())
}
