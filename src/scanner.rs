use anyhow::{Context, Result};
use log::{debug, warn};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// File scanner collecting the Rust sources whose annotations will be read.
///
/// The walk skips `target`, hidden entries and any configured exclusions, and visits
/// directory entries sorted by file name so that the order in which declarations are
/// first encountered is the same on every run.
///
/// # Example
///
/// ```no_run
/// use openapi_from_annotations::scanner::FileScanner;
/// use std::path::PathBuf;
///
/// let scanner = FileScanner::new(PathBuf::from("./my-api"))
///     .with_excludes(vec![PathBuf::from("./my-api/vendor")]);
/// let result = scanner.scan().unwrap();
/// println!("Found {} Rust files", result.rust_files.len());
/// ```
pub struct FileScanner {
    root_path: PathBuf,
    excludes: Vec<PathBuf>,
}

/// Result of a directory scan.
pub struct ScanResult {
    /// Discovered `.rs` files in walk order
    pub rust_files: Vec<PathBuf>,
    /// Warning messages for entries that could not be accessed
    pub warnings: Vec<String>,
}

impl FileScanner {
    pub fn new(root_path: PathBuf) -> Self {
        Self {
            root_path,
            excludes: Vec::new(),
        }
    }

    /// Skip these directories. Relative paths are resolved against the scan root.
    pub fn with_excludes(mut self, excludes: Vec<PathBuf>) -> Self {
        self.excludes = excludes
            .into_iter()
            .map(|dir| {
                if dir.is_absolute() || dir.starts_with(&self.root_path) {
                    dir
                } else {
                    self.root_path.join(dir)
                }
            })
            .collect();
        self
    }

    fn is_excluded(&self, path: &Path) -> bool {
        self.excludes.iter().any(|excluded| path == excluded)
    }

    /// Walks the tree and collects all `.rs` files.
    ///
    /// # Errors
    ///
    /// Returns an error if the root directory itself is not accessible. Problems with
    /// individual entries below it become warnings.
    pub fn scan(&self) -> Result<ScanResult> {
        std::fs::metadata(&self.root_path)
            .with_context(|| format!("Cannot access search directory: {}", self.root_path.display()))?;

        let mut rust_files = Vec::new();
        let mut warnings = Vec::new();

        let walker = WalkDir::new(&self.root_path)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| {
                if e.path() == self.root_path {
                    return true;
                }

                let file_name = e.file_name().to_string_lossy();
                if file_name.starts_with('.') || file_name == "target" {
                    return false;
                }
                if self.is_excluded(e.path()) {
                    debug!("Excluding {}", e.path().display());
                    return false;
                }
                true
            });

        for entry in walker {
            match entry {
                Ok(entry) => {
                    let path = entry.path();
                    if entry.file_type().is_file()
                        && path.extension().and_then(|s| s.to_str()) == Some("rs")
                    {
                        rust_files.push(path.to_path_buf());
                    }
                }
                Err(e) => {
                    let warning = format!("Failed to access path: {}", e);
                    warn!("{}", warning);
                    warnings.push(warning);
                }
            }
        }

        debug!(
            "Scanned {}: {} Rust files",
            self.root_path.display(),
            rust_files.len()
        );

        Ok(ScanResult {
            rust_files,
            warnings,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn relative_names(root: &Path, files: &[PathBuf]) -> Vec<String> {
        files
            .iter()
            .map(|p| {
                p.strip_prefix(root)
                    .unwrap()
                    .to_string_lossy()
                    .replace('\\', "/")
            })
            .collect()
    }

    #[test]
    fn test_scan_filters_non_rust_files() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();

        fs::write(root.join("main.rs"), "fn main() {}").unwrap();
        fs::write(root.join("lib.rs"), "pub fn test() {}").unwrap();
        fs::write(root.join("readme.md"), "# README").unwrap();
        fs::write(root.join("config.toml"), "[package]").unwrap();

        let result = FileScanner::new(root.to_path_buf()).scan().unwrap();

        assert_eq!(relative_names(root, &result.rust_files), vec!["lib.rs", "main.rs"]);
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_scan_empty_directory() {
        let temp_dir = TempDir::new().unwrap();

        let result = FileScanner::new(temp_dir.path().to_path_buf()).scan().unwrap();

        assert!(result.rust_files.is_empty());
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_scan_order_is_deterministic() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();

        fs::create_dir_all(root.join("src/models")).unwrap();
        fs::write(root.join("src/zoo.rs"), "").unwrap();
        fs::write(root.join("src/models/user.rs"), "").unwrap();
        fs::write(root.join("src/models/account.rs"), "").unwrap();
        fs::write(root.join("src/main.rs"), "").unwrap();

        let result = FileScanner::new(root.to_path_buf()).scan().unwrap();

        assert_eq!(
            relative_names(root, &result.rust_files),
            vec![
                "src/main.rs",
                "src/models/account.rs",
                "src/models/user.rs",
                "src/zoo.rs"
            ]
        );
    }

    #[test]
    fn test_scan_skips_target_and_hidden_directories() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();

        fs::create_dir(root.join("target")).unwrap();
        fs::write(root.join("target/build.rs"), "fn main() {}").unwrap();
        fs::create_dir(root.join(".git")).unwrap();
        fs::write(root.join(".git/config.rs"), "// config").unwrap();
        fs::write(root.join("main.rs"), "fn main() {}").unwrap();

        let result = FileScanner::new(root.to_path_buf()).scan().unwrap();

        assert_eq!(relative_names(root, &result.rust_files), vec!["main.rs"]);
    }

    #[test]
    fn test_scan_honours_excludes() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();

        fs::create_dir_all(root.join("vendor/dep")).unwrap();
        fs::write(root.join("vendor/dep/lib.rs"), "").unwrap();
        fs::create_dir(root.join("src")).unwrap();
        fs::write(root.join("src/main.rs"), "").unwrap();

        let result = FileScanner::new(root.to_path_buf())
            .with_excludes(vec![PathBuf::from("vendor")])
            .scan()
            .unwrap();

        assert_eq!(relative_names(root, &result.rust_files), vec!["src/main.rs"]);
    }

    #[test]
    fn test_scan_missing_root_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("missing");

        assert!(FileScanner::new(missing).scan().is_err());
    }
}
