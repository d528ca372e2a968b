//! General API information declared in the doc comments of the general-info file.
//!
//! ```text
//! //! @title Petstore
//! //! @version 2.0
//! //! @description Sample server.
//! //! @tag.name dogs
//! //! @tag.description Dogs are cool
//! //! @tag.name cats
//! //! @tag.description.markdown
//! ```

use crate::directive::{tokenize_all, Directive};
use crate::error::{Error, Result};
use crate::parser::{doc_lines, ParsedFile};
use crate::tags::TagDeclaration;
use log::debug;
use serde::{Deserialize, Serialize};

/// OpenAPI Info object
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiInfo {
    pub title: String,
    pub version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Default for ApiInfo {
    fn default() -> Self {
        Self {
            title: "Generated API".to_string(),
            version: "1.0.0".to_string(),
            description: None,
        }
    }
}

/// Everything declared in the general-info file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GeneralInfo {
    pub info: ApiInfo,
    /// Declared tags in source order, duplicates included
    pub tags: Vec<TagDeclaration>,
}

/// Read the crate-level `//!` docs of `parsed`, then the docs of its `fn main`.
pub fn parse_general_info(parsed: &ParsedFile) -> Result<GeneralInfo> {
    let mut lines = doc_lines(&parsed.syntax_tree.attrs);

    let main_fn = parsed.syntax_tree.items.iter().find_map(|item| match item {
        syn::Item::Fn(item_fn) if item_fn.sig.ident == "main" => Some(item_fn),
        _ => None,
    });
    if let Some(main_fn) = main_fn {
        lines.extend(doc_lines(&main_fn.attrs));
    }

    from_lines(&parsed.path.display().to_string(), &lines)
}

/// Interpret general-info directives. `location` is used in error messages.
pub fn from_lines<S: AsRef<str>>(location: &str, lines: &[S]) -> Result<GeneralInfo> {
    let mut general = GeneralInfo::default();
    let mut descriptions = Vec::new();

    for directive in tokenize_all(lines) {
        let name = directive.name();
        match name.as_str() {
            "title" => general.info.title = required_value(location, &directive)?,
            "version" => general.info.version = required_value(location, &directive)?,
            "description" => descriptions.push(directive.value),
            "tag.name" => {
                let tag_name = required_value(location, &directive)?;
                general.tags.push(TagDeclaration::new(tag_name, ""));
            }
            "tag.description" => {
                let tag = current_tag(&mut general.tags, location, &name)?;
                tag.description = directive.value;
            }
            "tag.description.markdown" => {
                let tag = current_tag(&mut general.tags, location, &name)?;
                debug!("Tag {} takes its description from a document", tag.name);
            }
            _ => debug!("Ignoring @{} in {}", name, location),
        }
    }

    if !descriptions.is_empty() {
        general.info.description = Some(descriptions.join("\n"));
    }

    debug!(
        "General info: {} v{}, {} tags declared",
        general.info.title,
        general.info.version,
        general.tags.len()
    );
    Ok(general)
}

fn required_value(location: &str, directive: &Directive) -> Result<String> {
    if directive.value.is_empty() {
        return Err(Error::directive(location, directive.name(), "missing value"));
    }
    Ok(directive.value.clone())
}

fn current_tag<'t>(
    tags: &'t mut [TagDeclaration],
    location: &str,
    name: &str,
) -> Result<&'t mut TagDeclaration> {
    tags.last_mut()
        .ok_or_else(|| Error::directive(location, name, "must follow a @tag.name"))
}
