//! Generate OpenAPI 3 documents from annotations written in Rust doc comments.
//!
//! Handlers carry `@Summary`, `@Param`, `@Success`, `@Router` and similar directives
//! in their `///` comments; the crate-level `//!` docs of the general-info file carry
//! `@title`, `@version` and `@tag.*` declarations. Types named in annotations are
//! classified into OpenAPI schema types, and structs or enums defined in the scanned
//! sources become component schemas.
//!
//! # Architecture
//!
//! 1. [`scanner`] - finds the Rust files under the search directory
//! 2. [`parser`] - parses them with `syn` and extracts doc-comment lines
//! 3. [`directive`] - tokenizes `@keyword value` lines
//! 4. [`general_info`] and [`tags`] - API info and the ordered tag list
//! 5. [`operation`] - one operation per `@Router` handler
//! 6. [`type_expr`], [`classifier`], [`registry`] - type classification
//! 7. [`type_resolver`] and [`schema_generator`] - component schemas
//! 8. [`openapi_builder`] and [`serializer`] - document assembly and output
//!
//! [`api::ApiParser`] runs the whole pipeline with a [`context::ParserContext`].
//!
//! # Example Usage
//!
//! ```no_run
//! use openapi_from_annotations::api::ApiParser;
//! use openapi_from_annotations::context::ParserContext;
//! use openapi_from_annotations::naming::NamingStrategy;
//! use openapi_from_annotations::serializer::serialize_yaml;
//! use std::path::Path;
//!
//! let ctx = ParserContext::new()
//!     .with_naming_strategy(NamingStrategy::CamelCase)
//!     .with_markdown_dir("docs/tags");
//! let document = ApiParser::new(ctx)
//!     .parse_api(Path::new("./my-api"), Path::new("src/main.rs"))
//!     .unwrap();
//! println!("{}", serialize_yaml(&document).unwrap());
//! ```
//!
//! # Command-Line Interface
//!
//! For command-line usage, see the [`cli`] module.

pub mod api;
pub mod classifier;
pub mod cli;
pub mod config;
pub mod context;
pub mod directive;
pub mod error;
pub mod general_info;
pub mod naming;
pub mod openapi_builder;
pub mod operation;
pub mod parser;
pub mod registry;
pub mod scanner;
pub mod schema_generator;
pub mod serializer;
pub mod tags;
pub mod type_expr;
pub mod type_resolver;
