//! Optional configuration file.
//!
//! ```yaml
//! property_naming: camelcase
//! markdown_dir: docs/tags
//! known_types:
//!   rust_decimal::Decimal:
//!     type: string
//!     format: decimal
//!   Duration:
//!     type: integer
//!     format: int64
//! ```
//!
//! JSON files work as well since the parser is YAML.

use crate::classifier::{SchemaType, SchemaTypeTriple};
use crate::context::ParserContext;
use crate::naming::NamingStrategy;
use anyhow::{Context, Result};
use indexmap::IndexMap;
use log::debug;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Casing of property keys for fields without serde renames
    pub property_naming: Option<NamingStrategy>,
    /// Directory holding `<tag>.md` documents
    pub markdown_dir: Option<PathBuf>,
    /// Extra known types, added to the built-in seeds
    pub known_types: IndexMap<String, KnownTypeConfig>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct KnownTypeConfig {
    #[serde(rename = "type")]
    pub schema_type: SchemaType,
    /// Defaults to `type`
    #[serde(default)]
    pub array_type: Option<SchemaType>,
    #[serde(default)]
    pub format: Option<String>,
}

impl KnownTypeConfig {
    pub fn triple(&self) -> SchemaTypeTriple {
        let triple = SchemaTypeTriple::new(
            self.schema_type,
            self.array_type.unwrap_or(self.schema_type),
        );
        match &self.format {
            Some(format) => triple.with_format(format.clone()),
            None => triple,
        }
    }
}

impl Config {
    /// Load a YAML or JSON configuration file.
    pub fn load(path: &Path) -> Result<Self> {
        debug!("Loading configuration from {}", path.display());

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        serde_yaml::from_str(&content)
            .with_context(|| format!("Invalid config file: {}", path.display()))
    }

    /// Build the parser context. Unset values keep the context defaults.
    pub fn into_context(self) -> ParserContext {
        let mut ctx = ParserContext::new();
        if let Some(strategy) = self.property_naming {
            ctx = ctx.with_naming_strategy(strategy);
        }
        if let Some(dir) = self.markdown_dir {
            ctx = ctx.with_markdown_dir(dir);
        }
        ctx.with_known_types(
            self.known_types
                .into_iter()
                .map(|(name, known)| (name, known.triple())),
        )
    }
}
