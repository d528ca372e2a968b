//! Doc-comment directive tokenizer.
//!
//! A directive line looks like `@keyword value` or `@keyword.attribute value`, e.g.
//! `@Summary Get a user` or `@tag.description.markdown`.

use once_cell::sync::Lazy;
use regex::Regex;

static DIRECTIVE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*@([A-Za-z][\w-]*)((?:\.[A-Za-z][\w-]*)*)(?:\s+(.*?))?\s*$")
        .expect("directive regex is valid")
});

/// A single tokenized directive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Directive {
    /// Lowercased keyword (`summary`, `param`, `tag`, ...)
    pub keyword: String,
    /// Dotted suffix after the keyword, lowercased (`description.markdown` for `@tag.description.markdown`)
    pub attribute: Option<String>,
    /// The remaining argument string, trimmed
    pub value: String,
}

impl Directive {
    /// The full directive name as written after `@`, lowercased.
    pub fn name(&self) -> String {
        match &self.attribute {
            Some(attribute) => format!("{}.{}", self.keyword, attribute),
            None => self.keyword.clone(),
        }
    }
}

/// Split one doc-comment line into a directive. Lines without a leading `@keyword` yield `None`.
pub fn tokenize(line: &str) -> Option<Directive> {
    let captures = DIRECTIVE_REGEX.captures(line)?;
    let keyword = captures.get(1)?.as_str().to_ascii_lowercase();
    let attribute = captures
        .get(2)
        .map(|m| m.as_str().trim_start_matches('.'))
        .filter(|attr| !attr.is_empty())
        .map(str::to_ascii_lowercase);
    let value = captures
        .get(3)
        .map(|m| m.as_str().to_string())
        .unwrap_or_default();

    Some(Directive {
        keyword,
        attribute,
        value,
    })
}

/// Tokenize every directive line of a doc comment, in order.
pub fn tokenize_all<S: AsRef<str>>(lines: &[S]) -> Vec<Directive> {
    lines.iter().filter_map(|line| tokenize(line.as_ref())).collect()
}
