//! Property-key casing: the context-wide naming strategy and serde `rename_all` rules.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// How Rust field names are cased when used as schema property keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NamingStrategy {
    /// `user_name` becomes `userName`
    #[value(name = "camelcase")]
    CamelCase,
    /// `user_name` becomes `UserName`
    #[value(name = "pascalcase")]
    PascalCase,
    /// Field names are kept as written, matching serde's default
    #[default]
    #[value(name = "snakecase")]
    SnakeCase,
}

impl NamingStrategy {
    pub fn apply(&self, field: &str) -> String {
        match self {
            NamingStrategy::CamelCase => RenameRule::CamelCase.apply_to_field(field),
            NamingStrategy::PascalCase => RenameRule::PascalCase.apply_to_field(field),
            NamingStrategy::SnakeCase => field.to_string(),
        }
    }
}

/// A `#[serde(rename_all = "...")]` rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenameRule {
    LowerCase,
    UpperCase,
    PascalCase,
    CamelCase,
    SnakeCase,
    ScreamingSnakeCase,
    KebabCase,
    ScreamingKebabCase,
}

impl RenameRule {
    pub fn from_serde(value: &str) -> Option<Self> {
        match value {
            "lowercase" => Some(RenameRule::LowerCase),
            "UPPERCASE" => Some(RenameRule::UpperCase),
            "PascalCase" => Some(RenameRule::PascalCase),
            "camelCase" => Some(RenameRule::CamelCase),
            "snake_case" => Some(RenameRule::SnakeCase),
            "SCREAMING_SNAKE_CASE" => Some(RenameRule::ScreamingSnakeCase),
            "kebab-case" => Some(RenameRule::KebabCase),
            "SCREAMING-KEBAB-CASE" => Some(RenameRule::ScreamingKebabCase),
            _ => None,
        }
    }

    /// Rename a snake_case struct field.
    pub fn apply_to_field(&self, field: &str) -> String {
        match self {
            RenameRule::LowerCase | RenameRule::SnakeCase => field.to_string(),
            RenameRule::UpperCase | RenameRule::ScreamingSnakeCase => field.to_ascii_uppercase(),
            RenameRule::PascalCase => field.split('_').map(capitalize).collect(),
            RenameRule::CamelCase => {
                let pascal = RenameRule::PascalCase.apply_to_field(field);
                lowercase_first(&pascal)
            }
            RenameRule::KebabCase => field.replace('_', "-"),
            RenameRule::ScreamingKebabCase => field.replace('_', "-").to_ascii_uppercase(),
        }
    }

    /// Rename a PascalCase enum variant.
    pub fn apply_to_variant(&self, variant: &str) -> String {
        match self {
            RenameRule::PascalCase => variant.to_string(),
            RenameRule::LowerCase => variant.to_ascii_lowercase(),
            RenameRule::UpperCase => variant.to_ascii_uppercase(),
            RenameRule::CamelCase => lowercase_first(variant),
            RenameRule::SnakeCase => snake_from_pascal(variant),
            RenameRule::ScreamingSnakeCase => snake_from_pascal(variant).to_ascii_uppercase(),
            RenameRule::KebabCase => snake_from_pascal(variant).replace('_', "-"),
            RenameRule::ScreamingKebabCase => snake_from_pascal(variant)
                .replace('_', "-")
                .to_ascii_uppercase(),
        }
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn lowercase_first(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn snake_from_pascal(variant: &str) -> String {
    let mut snake = String::with_capacity(variant.len() + 4);
    for (i, ch) in variant.char_indices() {
        if ch.is_uppercase() && i > 0 {
            snake.push('_');
        }
        snake.extend(ch.to_lowercase());
    }
    snake
}
