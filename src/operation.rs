//! Handler annotations: one [`ParsedOperation`] per function documented with `@Router`.
//!
//! ```text
//! /// @Summary Show a pet
//! /// @Tags pets
//! /// @Param id path u64 true "Pet id"
//! /// @Success 200 {object} models::Pet "The pet"
//! /// @Failure 404 "Not found"
//! /// @Router /pets/{id} [get]
//! ```

use crate::directive::{tokenize_all, Directive};
use crate::error::{Error, Result};
use crate::parser::{doc_lines, ParsedFile};
use crate::type_expr::TypeExpr;
use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use syn::visit::{self, Visit};

static PARAM_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"^(\S+)\s+(\S+)\s+(.+?)\s+(true|false)(?:\s+"(.*)")?$"#)
        .expect("param regex is valid")
});

static RESPONSE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"^(\d{3}|default)(?:\s+\{(\w+)\})?(?:\s+([^"]*?))?(?:\s+"(.*)")?$"#)
        .expect("response regex is valid")
});

static ROUTER_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\S+)\s+\[(\w+)\]$").expect("router regex is valid"));

/// HTTP methods accepted by `@Router`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
    Patch,
    Options,
    Head,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "get",
            HttpMethod::Post => "post",
            HttpMethod::Put => "put",
            HttpMethod::Delete => "delete",
            HttpMethod::Patch => "patch",
            HttpMethod::Options => "options",
            HttpMethod::Head => "head",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_str().to_ascii_uppercase())
    }
}

impl FromStr for HttpMethod {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "get" => Ok(HttpMethod::Get),
            "post" => Ok(HttpMethod::Post),
            "put" => Ok(HttpMethod::Put),
            "delete" => Ok(HttpMethod::Delete),
            "patch" => Ok(HttpMethod::Patch),
            "options" => Ok(HttpMethod::Options),
            "head" => Ok(HttpMethod::Head),
            other => Err(Error::InvalidArgument(format!("unknown HTTP method `{}`", other))),
        }
    }
}

/// Where a `@Param` value comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ParamLocation {
    Path,
    Query,
    Header,
    Cookie,
    /// The request body
    Body,
    /// A field of a form-encoded request body
    FormData,
}

impl FromStr for ParamLocation {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "path" => Ok(ParamLocation::Path),
            "query" => Ok(ParamLocation::Query),
            "header" => Ok(ParamLocation::Header),
            "cookie" => Ok(ParamLocation::Cookie),
            "body" => Ok(ParamLocation::Body),
            "formData" => Ok(ParamLocation::FormData),
            other => Err(Error::InvalidArgument(format!(
                "unknown parameter location `{}`",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParamSpec {
    pub name: String,
    pub location: ParamLocation,
    pub ty: TypeExpr,
    pub required: bool,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResponseSpec {
    /// Three-digit status code or `default`
    pub code: String,
    /// Body type, `None` for responses without content
    pub ty: Option<TypeExpr>,
    pub description: Option<String>,
}

/// One documented handler.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedOperation {
    /// Function name of the handler
    pub handler: String,
    /// File the handler was found in
    pub file: PathBuf,
    pub path: String,
    pub method: HttpMethod,
    pub summary: Option<String>,
    pub description: Option<String>,
    pub operation_id: Option<String>,
    pub tags: Vec<String>,
    pub deprecated: bool,
    pub params: Vec<ParamSpec>,
    pub responses: Vec<ResponseSpec>,
}

impl ParsedOperation {
    /// Human-readable location used in error messages.
    pub fn location(&self) -> String {
        format!("{} ({})", self.handler, self.file.display())
    }
}

/// Collect the documented handlers of one file in declaration order.
///
/// Free functions, inherent and trait impl methods are visited, including those in
/// inline modules. Functions without `@Router` are not operations.
pub fn collect_operations(parsed: &ParsedFile) -> Result<Vec<ParsedOperation>> {
    let mut collector = HandlerCollector::default();
    collector.visit_file(&parsed.syntax_tree);

    let mut operations = Vec::new();
    for (handler, lines) in collector.handlers {
        let location = format!("{} ({})", handler, parsed.path.display());
        if let Some(operation) = parse_operation(&handler, &parsed.path, &location, &lines)? {
            debug!(
                "Found operation {} {} in {}",
                operation.method, operation.path, location
            );
            operations.push(operation);
        }
    }
    Ok(operations)
}

#[derive(Default)]
struct HandlerCollector {
    handlers: Vec<(String, Vec<String>)>,
}

impl HandlerCollector {
    fn record(&mut self, ident: &syn::Ident, attrs: &[syn::Attribute]) {
        let lines = doc_lines(attrs);
        if !lines.is_empty() {
            self.handlers.push((ident.to_string(), lines));
        }
    }
}

impl<'ast> Visit<'ast> for HandlerCollector {
    fn visit_item_fn(&mut self, item_fn: &'ast syn::ItemFn) {
        self.record(&item_fn.sig.ident, &item_fn.attrs);
        visit::visit_item_fn(self, item_fn);
    }

    fn visit_impl_item_fn(&mut self, impl_fn: &'ast syn::ImplItemFn) {
        self.record(&impl_fn.sig.ident, &impl_fn.attrs);
        visit::visit_impl_item_fn(self, impl_fn);
    }
}

/// Interpret the directives of one handler. Returns `None` when there is no `@Router`.
pub fn parse_operation<S: AsRef<str>>(
    handler: &str,
    file: &std::path::Path,
    location: &str,
    lines: &[S],
) -> Result<Option<ParsedOperation>> {
    let mut route = None;
    let mut summary = None;
    let mut descriptions = Vec::new();
    let mut operation_id = None;
    let mut tags = Vec::new();
    let mut deprecated = false;
    let mut params = Vec::new();
    let mut responses = Vec::new();

    for directive in tokenize_all(lines) {
        if directive.attribute.is_some() {
            debug!("Ignoring @{} in {}", directive.name(), location);
            continue;
        }
        match directive.keyword.as_str() {
            "router" => {
                if route.is_some() {
                    return Err(Error::directive(location, "Router", "declared more than once"));
                }
                route = Some(parse_router(location, &directive)?);
            }
            "summary" => summary = Some(directive.value),
            "description" => descriptions.push(directive.value),
            "id" => operation_id = Some(required(location, &directive)?.to_string()),
            "tags" => tags.extend(
                directive
                    .value
                    .split(',')
                    .map(str::trim)
                    .filter(|tag| !tag.is_empty())
                    .map(str::to_string),
            ),
            "deprecated" => deprecated = true,
            "param" => params.push(parse_param(location, &directive)?),
            "success" | "failure" | "response" => {
                responses.push(parse_response(location, &directive)?)
            }
            other => debug!("Ignoring @{} in {}", other, location),
        }
    }

    let Some((path, method)) = route else {
        debug!("{} has no @Router, skipping", location);
        return Ok(None);
    };

    Ok(Some(ParsedOperation {
        handler: handler.to_string(),
        file: file.to_path_buf(),
        path,
        method,
        summary: summary.filter(|s| !s.is_empty()),
        description: if descriptions.is_empty() {
            None
        } else {
            Some(descriptions.join("\n"))
        },
        operation_id,
        tags,
        deprecated,
        params,
        responses,
    }))
}

fn required<'d>(location: &str, directive: &'d Directive) -> Result<&'d str> {
    if directive.value.is_empty() {
        return Err(Error::directive(location, directive.name(), "missing value"));
    }
    Ok(&directive.value)
}

fn parse_router(location: &str, directive: &Directive) -> Result<(String, HttpMethod)> {
    let captures = ROUTER_REGEX
        .captures(required(location, directive)?)
        .ok_or_else(|| Error::directive(location, "Router", "expected `/path [method]`"))?;

    let path = captures[1].to_string();
    if !path.starts_with('/') {
        return Err(Error::directive(location, "Router", "path must start with `/`"));
    }
    let method: HttpMethod = captures[2]
        .parse()
        .map_err(|e: Error| Error::directive(location, "Router", e.to_string()))?;
    Ok((path, method))
}

fn parse_param(location: &str, directive: &Directive) -> Result<ParamSpec> {
    let captures = PARAM_REGEX.captures(required(location, directive)?).ok_or_else(|| {
        Error::directive(
            location,
            "Param",
            "expected `name in type required [\"description\"]`",
        )
    })?;

    let name = captures[1].to_string();
    let location_kind: ParamLocation = captures[2]
        .parse()
        .map_err(|e: Error| Error::directive(location, "Param", e.to_string()))?;
    let ty: TypeExpr = captures[3]
        .parse()
        .map_err(|e: Error| Error::directive(location, "Param", e.to_string()))?;

    Ok(ParamSpec {
        name,
        location: location_kind,
        ty,
        required: &captures[4] == "true",
        description: captures.get(5).map(|m| m.as_str().to_string()),
    })
}

fn parse_response(location: &str, directive: &Directive) -> Result<ResponseSpec> {
    let keyword = directive.keyword.as_str();
    let captures = RESPONSE_REGEX
        .captures(required(location, directive)?)
        .ok_or_else(|| {
            Error::directive(
                location,
                keyword,
                "expected `code [{kind}] [Type] [\"description\"]`",
            )
        })?;

    let declared = captures
        .get(3)
        .map(|m| m.as_str().trim())
        .filter(|ty| !ty.is_empty())
        .map(|ty| {
            ty.parse::<TypeExpr>()
                .map_err(|e| Error::directive(location, keyword, e.to_string()))
        })
        .transpose()?;

    let ty = match captures.get(2).map(|m| m.as_str()) {
        None | Some("object") => declared,
        Some("array") => Some(TypeExpr::array(declared.ok_or_else(|| {
            Error::directive(location, keyword, "{array} needs an element type")
        })?)),
        Some(kind @ ("string" | "integer" | "number" | "boolean")) => {
            Some(declared.unwrap_or_else(|| TypeExpr::ident(kind)))
        }
        Some(other) => {
            return Err(Error::directive(
                location,
                keyword,
                format!("unknown response kind `{{{}}}`", other),
            ))
        }
    };

    Ok(ResponseSpec {
        code: captures[1].to_string(),
        ty,
        description: captures.get(4).map(|m| m.as_str().to_string()),
    })
}
