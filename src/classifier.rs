//! Type classifier: maps a [`TypeExpr`] to a normalized [`SchemaTypeTriple`].
//!
//! Resolution order:
//!
//! 1. named types found in the known-type registry (or the built-in seeds when no
//!    context is supplied)
//! 2. primitive identifiers
//! 3. pointers are transparent
//! 4. arrays carry the element's primary type as their secondary type
//! 5. maps, 6. anonymous structs and interfaces are opaque objects
//! 7. channels, functions and unmapped shapes are rejected
//!
//! Classification is a pure function of the expression and the registry snapshot.

use crate::context::ParserContext;
use crate::error::{Error, Result};
use crate::registry::builtin_known_type;
use crate::type_expr::TypeExpr;
use log::debug;
use serde::{Deserialize, Serialize};
use std::fmt;

/// OpenAPI primitive schema types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemaType {
    String,
    Number,
    Integer,
    Boolean,
    Array,
    Object,
}

impl SchemaType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SchemaType::String => "string",
            SchemaType::Number => "number",
            SchemaType::Integer => "integer",
            SchemaType::Boolean => "boolean",
            SchemaType::Array => "array",
            SchemaType::Object => "object",
        }
    }
}

impl fmt::Display for SchemaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The classifier's output: primary type, array-element type and an optional format.
///
/// For non-array results `secondary` mirrors `primary`, except for registry entries
/// that say otherwise (decimals are NUMBER/STRING).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SchemaTypeTriple {
    pub primary: SchemaType,
    pub secondary: SchemaType,
    /// Empty when no refinement applies
    #[serde(default)]
    pub format: String,
}

impl SchemaTypeTriple {
    pub fn new(primary: SchemaType, secondary: SchemaType) -> Self {
        Self {
            primary,
            secondary,
            format: String::new(),
        }
    }

    /// A triple whose secondary type mirrors the primary one.
    pub fn uniform(schema_type: SchemaType) -> Self {
        Self::new(schema_type, schema_type)
    }

    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.format = format.into();
        self
    }
}

impl fmt::Display for SchemaTypeTriple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{{}, {}", self.primary, self.secondary)?;
        if !self.format.is_empty() {
            write!(f, ", {}", self.format)?;
        }
        write!(f, "}}")
    }
}

/// Classify a type expression.
///
/// `declaring` names the entity the expression belongs to and is only used in error
/// messages. Without a context, only the built-in seeds and structural rules apply.
pub fn classify(
    ctx: Option<&ParserContext>,
    declaring: &str,
    expr: &TypeExpr,
) -> Result<SchemaTypeTriple> {
    match expr {
        TypeExpr::Ident(_) | TypeExpr::Qualified { .. } => Ok(lookup_named(ctx, expr)
            .unwrap_or_else(|| {
                debug!("{}: {} is a user-defined type", declaring, expr);
                SchemaTypeTriple::uniform(SchemaType::Object)
            })),
        TypeExpr::Pointer(inner) => classify(ctx, declaring, inner),
        TypeExpr::Array(element) => {
            let element = classify(ctx, declaring, element)?;
            Ok(SchemaTypeTriple::new(SchemaType::Array, element.primary))
        }
        TypeExpr::Map { .. } | TypeExpr::Struct | TypeExpr::Interface => {
            Ok(SchemaTypeTriple::uniform(SchemaType::Object))
        }
        TypeExpr::Channel(_) => Err(unsupported(declaring, "channel")),
        TypeExpr::Function => Err(unsupported(declaring, "function")),
        TypeExpr::Unsupported(kind) => Err(unsupported(declaring, kind)),
    }
}

/// Resolve a named type through the registry and primitive rules.
///
/// Returns `None` for user-defined types and for non-named expressions.
pub fn lookup_named(ctx: Option<&ParserContext>, expr: &TypeExpr) -> Option<SchemaTypeTriple> {
    let (package, name) = match expr {
        TypeExpr::Ident(name) => (None, name.as_str()),
        TypeExpr::Qualified { package, name } => (Some(package.as_str()), name.as_str()),
        _ => return None,
    };

    let known = match ctx {
        Some(ctx) => ctx.registry().resolve(package, name).cloned(),
        None => builtin_known_type(name),
    };

    known.or_else(|| primitive_type(name).map(SchemaTypeTriple::uniform))
}

/// Map a primitive identifier to its schema type.
pub fn primitive_type(name: &str) -> Option<SchemaType> {
    match name {
        "String" | "str" | "char" | "string" => Some(SchemaType::String),
        "i8" | "i16" | "i32" | "i64" | "i128" | "isize" | "u8" | "u16" | "u32" | "u64"
        | "u128" | "usize" | "integer" => Some(SchemaType::Integer),
        "f32" | "f64" | "number" => Some(SchemaType::Number),
        "bool" | "boolean" => Some(SchemaType::Boolean),
        _ => None,
    }
}

fn unsupported(declaring: &str, kind: &str) -> Error {
    Error::UnsupportedTypeKind {
        declaring: declaring.to_string(),
        kind: kind.to_string(),
    }
}
