//! Shared configuration for one parse run.

use crate::classifier::SchemaTypeTriple;
use crate::naming::NamingStrategy;
use crate::registry::KnownTypeRegistry;
use crate::tags::MarkdownDirectory;
use std::path::{Path, PathBuf};

/// Configuration carried by reference through classification and tag loading.
///
/// Built once with the `with_*` methods, then shared immutably (it is `Send + Sync`).
///
/// # Example
///
/// ```
/// use openapi_from_annotations::context::ParserContext;
/// use openapi_from_annotations::naming::NamingStrategy;
///
/// let ctx = ParserContext::new()
///     .with_naming_strategy(NamingStrategy::CamelCase)
///     .with_markdown_dir("docs/tags");
/// assert!(ctx.markdown_dir().is_some());
/// ```
#[derive(Debug, Clone, Default)]
pub struct ParserContext {
    naming_strategy: NamingStrategy,
    registry: KnownTypeRegistry,
    markdown_dir: Option<PathBuf>,
}

impl ParserContext {
    /// Create a context with the seeded registry, default naming and no markdown directory.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_naming_strategy(mut self, strategy: NamingStrategy) -> Self {
        self.naming_strategy = strategy;
        self
    }

    /// Set the tag document directory. An empty path disables document augmentation.
    pub fn with_markdown_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        self.markdown_dir = if dir.as_os_str().is_empty() {
            None
        } else {
            Some(dir)
        };
        self
    }

    /// Replace the whole registry, e.g. with [`KnownTypeRegistry::empty`].
    pub fn with_registry(mut self, registry: KnownTypeRegistry) -> Self {
        self.registry = registry;
        self
    }

    pub fn with_known_type(mut self, name: &str, triple: SchemaTypeTriple) -> Self {
        self.registry.register(name, triple);
        self
    }

    pub fn with_known_types<I, S>(mut self, entries: I) -> Self
    where
        I: IntoIterator<Item = (S, SchemaTypeTriple)>,
        S: AsRef<str>,
    {
        for (name, triple) in entries {
            self.registry.register(name.as_ref(), triple);
        }
        self
    }

    pub fn naming_strategy(&self) -> NamingStrategy {
        self.naming_strategy
    }

    pub fn registry(&self) -> &KnownTypeRegistry {
        &self.registry
    }

    pub fn markdown_dir(&self) -> Option<&Path> {
        self.markdown_dir.as_deref()
    }

    /// The filesystem document source for tag descriptions, if one is configured.
    pub fn document_source(&self) -> Option<MarkdownDirectory> {
        self.markdown_dir
            .as_ref()
            .map(|dir| MarkdownDirectory::new(dir.clone()))
    }
}
