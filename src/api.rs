//! End-to-end driver: from a source tree to an [`OpenApiDocument`].

use crate::context::ParserContext;
use crate::general_info::parse_general_info;
use crate::openapi_builder::{OpenApiBuilder, OpenApiDocument};
use crate::operation::collect_operations;
use crate::parser::{AstParser, ParsedFile};
use crate::scanner::FileScanner;
use crate::schema_generator::SchemaGenerator;
use crate::tags::load_tags;
use crate::type_resolver::TypeResolver;
use anyhow::{Context, Result};
use log::{debug, info, warn};
use std::path::{Path, PathBuf};

/// Parses an annotated source tree with a fixed [`ParserContext`].
///
/// # Example
///
/// ```no_run
/// use openapi_from_annotations::api::ApiParser;
/// use openapi_from_annotations::context::ParserContext;
/// use std::path::Path;
///
/// let document = ApiParser::new(ParserContext::new())
///     .parse_api(Path::new("./my-api"), Path::new("src/main.rs"))
///     .unwrap();
/// println!("{} paths", document.paths.len());
/// ```
pub struct ApiParser {
    ctx: ParserContext,
    excludes: Vec<PathBuf>,
}

impl ApiParser {
    pub fn new(ctx: ParserContext) -> Self {
        Self {
            ctx,
            excludes: Vec::new(),
        }
    }

    /// Directories to leave out of the scan, relative to the search directory or absolute.
    pub fn with_excludes(mut self, excludes: Vec<PathBuf>) -> Self {
        self.excludes = excludes;
        self
    }

    pub fn context(&self) -> &ParserContext {
        &self.ctx
    }

    /// Scan `search_dir` and assemble the document.
    ///
    /// `general_info_file` is resolved against `search_dir` when relative. Files that
    /// fail to parse are skipped with a warning; annotation errors abort the run.
    pub fn parse_api(&self, search_dir: &Path, general_info_file: &Path) -> Result<OpenApiDocument> {
        info!("Scanning {}...", search_dir.display());
        let scan_result = FileScanner::new(search_dir.to_path_buf())
            .with_excludes(self.excludes.clone())
            .scan()?;
        info!("Found {} Rust files", scan_result.rust_files.len());

        let parsed_files: Vec<ParsedFile> = AstParser::parse_files(&scan_result.rust_files)
            .into_iter()
            .filter_map(|result| result.ok())
            .collect();
        info!("Successfully parsed {} files", parsed_files.len());

        let general_info_path = if general_info_file.is_absolute() {
            general_info_file.to_path_buf()
        } else {
            search_dir.join(general_info_file)
        };
        let general = match parsed_files.iter().find(|f| f.path == general_info_path) {
            Some(parsed) => parse_general_info(parsed),
            None => {
                debug!("General info file was not scanned, parsing it directly");
                let parsed = AstParser::parse_file(&general_info_path)
                    .context("Cannot read general API info")?;
                parse_general_info(&parsed)
            }
        }
        .with_context(|| format!("Invalid general info in {}", general_info_path.display()))?;

        let tags = load_tags(&self.ctx, &general.tags).context("Failed to load tags")?;
        info!("Loaded {} tags", tags.len());

        let resolver = TypeResolver::new(&parsed_files);
        let mut schema_gen = SchemaGenerator::new(&self.ctx, &resolver);
        let mut builder = OpenApiBuilder::new().with_info(general.info).with_tags(tags);

        let mut operation_count = 0;
        for parsed in &parsed_files {
            for operation in collect_operations(parsed)? {
                builder.add_operation(&operation, &mut schema_gen)?;
                operation_count += 1;
            }
        }

        if operation_count == 0 {
            warn!("No documented operations found under {}", search_dir.display());
        }
        info!(
            "Documented {} operations with {} component schemas",
            operation_count,
            schema_gen.schemas().len()
        );

        Ok(builder.build(schema_gen))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use std::fs;
    use tempfile::TempDir;

    fn write(root: &Path, relative: &str, content: &str) {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    #[test]
    fn test_parse_minimal_project() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        write(
            root,
            "src/main.rs",
            r#"
            //! @title Minimal
            //! @version 0.1

            /// @Summary Health check
            /// @Success 204
            /// @Router /health [get]
            async fn health() {}

            fn main() {}
            "#,
        );

        let doc = ApiParser::new(ParserContext::new())
            .parse_api(root, Path::new("src/main.rs"))
            .unwrap();

        assert_eq!(doc.info.title, "Minimal");
        let get = doc.paths["/health"].get.as_ref().unwrap();
        assert_eq!(get.summary.as_deref(), Some("Health check"));
        assert_eq!(get.responses["204"].description, "No Content");
    }

    #[test]
    fn test_unparsable_files_are_skipped() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        write(root, "src/main.rs", "fn main() {}");
        write(root, "src/broken.rs", "fn broken( {");

        let doc = ApiParser::new(ParserContext::new())
            .parse_api(root, Path::new("src/main.rs"))
            .unwrap();
        assert!(doc.paths.is_empty());
    }

    #[test]
    fn test_excluded_general_info_file_is_still_read() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        write(root, "docs/info.rs", "//! @title From docs\n");
        write(root, "src/lib.rs", "");

        let doc = ApiParser::new(ParserContext::new())
            .with_excludes(vec![PathBuf::from("docs")])
            .parse_api(root, Path::new("docs/info.rs"))
            .unwrap();
        assert_eq!(doc.info.title, "From docs");
    }

    #[test]
    fn test_duplicate_tags_abort() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        write(
            root,
            "src/main.rs",
            "//! @tag.name dogs\n//! @tag.name dogs\nfn main() {}\n",
        );

        let err = ApiParser::new(ParserContext::new())
            .parse_api(root, Path::new("src/main.rs"))
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<Error>(),
            Some(Error::DuplicateTagName(name)) if name == "dogs"
        ));
    }

    #[test]
    fn test_missing_general_info_file() {
        let temp_dir = TempDir::new().unwrap();
        write(temp_dir.path(), "src/lib.rs", "");

        let result = ApiParser::new(ParserContext::new())
            .parse_api(temp_dir.path(), Path::new("src/main.rs"));
        assert!(result.is_err());
    }
}
