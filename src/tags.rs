//! Tag loader: resolves declared tags into the ordered tag list of the document.
//!
//! Each declared tag may be backed by a long-form document named after it (`<name>.md`
//! in the configured markdown directory). When one exists its contents replace the
//! inline description.

use crate::context::ParserContext;
use crate::error::{Error, Result};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

/// A tag declaration as it appears in the scanned source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagDeclaration {
    pub name: String,
    pub description: String,
}

impl TagDeclaration {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
        }
    }
}

/// OpenAPI Tag object
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagSpec {
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
}

/// Where long-form tag descriptions come from.
pub trait DocumentSource {
    /// Read the document for `tag`. A missing document is `Ok(None)`.
    fn read_document(&self, tag: &str) -> Result<Option<String>>;
}

/// Documents stored as `<tag>.md` files in one directory.
#[derive(Debug, Clone)]
pub struct MarkdownDirectory {
    root: PathBuf,
}

impl MarkdownDirectory {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl DocumentSource for MarkdownDirectory {
    fn read_document(&self, tag: &str) -> Result<Option<String>> {
        if tag.contains(['/', '\\']) || tag == ".." {
            warn!("Tag name {:?} cannot name a document file", tag);
            return Ok(None);
        }

        let path = self.root.join(format!("{}.md", tag));
        match fs::read_to_string(&path) {
            Ok(content) => {
                debug!("Loaded description for tag {} from {}", tag, path.display());
                Ok(Some(content))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(source) => Err(Error::DocumentReadFailure {
                tag: tag.to_string(),
                path,
                source,
            }),
        }
    }
}

/// Resolve declared tags using the context's markdown directory.
///
/// The result keeps first-encounter order. Duplicate names fail the whole load.
pub fn load_tags(ctx: &ParserContext, declared: &[TagDeclaration]) -> Result<Vec<TagSpec>> {
    let source = ctx.document_source();
    load_tags_from(source.as_ref().map(|s| s as &dyn DocumentSource), declared)
}

/// Resolve declared tags against an explicit document source.
pub fn load_tags_from(
    source: Option<&dyn DocumentSource>,
    declared: &[TagDeclaration],
) -> Result<Vec<TagSpec>> {
    debug!("Loading {} declared tags", declared.len());

    let mut seen = HashSet::new();
    for declaration in declared {
        if declaration.name.trim().is_empty() {
            return Err(Error::directive(
                "general info",
                "tag.name",
                "tag name must not be empty",
            ));
        }
        if !seen.insert(declaration.name.as_str()) {
            return Err(Error::DuplicateTagName(declaration.name.clone()));
        }
    }

    declared
        .iter()
        .map(|declaration| {
            let document = match source {
                Some(source) => source.read_document(&declaration.name)?,
                None => None,
            };
            let description = match document {
                Some(document) => document.trim_end().to_string(),
                None => declaration.description.clone(),
            };
            Ok(TagSpec {
                name: declaration.name.clone(),
                description,
            })
        })
        .collect()
}
