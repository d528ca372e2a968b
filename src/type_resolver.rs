use crate::directive::tokenize;
use crate::naming::RenameRule;
use crate::parser::{doc_lines, ParsedFile};
use crate::type_expr::TypeExpr;
use log::{debug, warn};
use std::collections::HashMap;
use std::path::Path;
use syn::ext::IdentExt;
use syn::visit::{self, Visit};

/// Index of the struct and enum definitions found in the scanned sources.
///
/// Definitions are keyed by bare identifier; nested inline modules are searched too.
/// When two files define the same name, the first one in scan order wins.
pub struct TypeResolver {
    definitions: HashMap<String, TypeDefinition>,
}

/// A named type definition
#[derive(Debug, Clone)]
pub struct TypeDefinition {
    pub name: String,
    pub kind: TypeKind,
    /// Container-level `#[serde(rename_all = "...")]`
    pub rename_all: Option<RenameRule>,
    /// Doc comment text, directive lines excluded
    pub description: Option<String>,
}

#[derive(Debug, Clone)]
pub enum TypeKind {
    Struct(StructDef),
    Enum(EnumDef),
}

#[derive(Debug, Clone)]
pub struct StructDef {
    /// Named fields in declaration order; tuple and unit structs have none
    pub fields: Vec<FieldDef>,
}

#[derive(Debug, Clone)]
pub struct FieldDef {
    /// Field identifier with any `r#` prefix removed
    pub name: String,
    pub ty: TypeExpr,
    /// Whether the field is declared as `Option<T>`
    pub optional: bool,
    pub serde_attrs: SerdeAttributes,
    pub description: Option<String>,
}

#[derive(Debug, Clone)]
pub struct EnumDef {
    /// Serialized variant names, renames applied and skipped variants removed
    pub variants: Vec<String>,
    /// Whether every variant is a unit variant
    pub unit_only: bool,
}

/// Serde attributes that change the serialized shape of a field or variant
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SerdeAttributes {
    pub rename: Option<String>,
    pub skip: bool,
    pub flatten: bool,
    pub default: bool,
}

impl TypeResolver {
    pub fn new(parsed_files: &[ParsedFile]) -> Self {
        let mut definitions = HashMap::new();

        for parsed_file in parsed_files {
            let mut collector = DefinitionCollector {
                definitions: &mut definitions,
                file: &parsed_file.path,
            };
            collector.visit_file(&parsed_file.syntax_tree);
        }

        debug!(
            "Indexed {} type definitions from {} files",
            definitions.len(),
            parsed_files.len()
        );
        Self { definitions }
    }

    /// Find a definition by bare name.
    pub fn resolve(&self, name: &str) -> Option<&TypeDefinition> {
        self.definitions.get(name)
    }

    /// Find the definition a named type expression refers to.
    pub fn resolve_expr(&self, expr: &TypeExpr) -> Option<&TypeDefinition> {
        expr.type_name().and_then(|name| self.resolve(name))
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}

struct DefinitionCollector<'a> {
    definitions: &'a mut HashMap<String, TypeDefinition>,
    file: &'a Path,
}

impl DefinitionCollector<'_> {
    fn insert(&mut self, definition: TypeDefinition) {
        if self.definitions.contains_key(&definition.name) {
            warn!(
                "Duplicate definition of {} in {} ignored",
                definition.name,
                self.file.display()
            );
            return;
        }
        debug!("Found {} in {}", definition.name, self.file.display());
        self.definitions.insert(definition.name.clone(), definition);
    }
}

impl<'ast> Visit<'ast> for DefinitionCollector<'_> {
    fn visit_item_struct(&mut self, item_struct: &'ast syn::ItemStruct) {
        self.insert(parse_struct_definition(item_struct));
        visit::visit_item_struct(self, item_struct);
    }

    fn visit_item_enum(&mut self, item_enum: &'ast syn::ItemEnum) {
        self.insert(parse_enum_definition(item_enum));
        visit::visit_item_enum(self, item_enum);
    }
}

fn parse_struct_definition(item_struct: &syn::ItemStruct) -> TypeDefinition {
    let fields = match &item_struct.fields {
        syn::Fields::Named(named) => named.named.iter().filter_map(parse_field).collect(),
        _ => Vec::new(),
    };

    TypeDefinition {
        name: item_struct.ident.unraw().to_string(),
        kind: TypeKind::Struct(StructDef { fields }),
        rename_all: parse_rename_all(&item_struct.attrs),
        description: description(&item_struct.attrs),
    }
}

fn parse_enum_definition(item_enum: &syn::ItemEnum) -> TypeDefinition {
    let rename_all = parse_rename_all(&item_enum.attrs);
    let unit_only = item_enum
        .variants
        .iter()
        .all(|v| matches!(v.fields, syn::Fields::Unit));

    let variants = item_enum
        .variants
        .iter()
        .filter_map(|variant| {
            let attrs = parse_serde_attributes(&variant.attrs);
            if attrs.skip {
                return None;
            }
            let name = variant.ident.unraw().to_string();
            Some(match (attrs.rename, rename_all) {
                (Some(rename), _) => rename,
                (None, Some(rule)) => rule.apply_to_variant(&name),
                (None, None) => name,
            })
        })
        .collect();

    TypeDefinition {
        name: item_enum.ident.unraw().to_string(),
        kind: TypeKind::Enum(EnumDef {
            variants,
            unit_only,
        }),
        rename_all,
        description: description(&item_enum.attrs),
    }
}

fn parse_field(field: &syn::Field) -> Option<FieldDef> {
    let name = field.ident.as_ref()?.unraw().to_string();

    Some(FieldDef {
        name,
        ty: TypeExpr::from_syn(&field.ty),
        optional: is_option(&field.ty),
        serde_attrs: parse_serde_attributes(&field.attrs),
        description: description(&field.attrs),
    })
}

fn is_option(ty: &syn::Type) -> bool {
    match ty {
        syn::Type::Path(type_path) => type_path
            .path
            .segments
            .last()
            .is_some_and(|segment| segment.ident == "Option"),
        syn::Type::Group(group) => is_option(&group.elem),
        syn::Type::Paren(paren) => is_option(&paren.elem),
        _ => false,
    }
}

/// Doc comment lines that are not directives, joined with newlines.
fn description(attrs: &[syn::Attribute]) -> Option<String> {
    let text = doc_lines(attrs)
        .iter()
        .filter(|line| tokenize(line).is_none())
        .map(|line| line.trim())
        .collect::<Vec<_>>()
        .join("\n");
    let text = text.trim();
    if text.is_empty() {
        None
    } else {
        Some(text.to_string())
    }
}

/// Parse field- or variant-level `#[serde(...)]` attributes.
fn parse_serde_attributes(attrs: &[syn::Attribute]) -> SerdeAttributes {
    let mut serde_attrs = SerdeAttributes::default();

    for attr in attrs.iter().filter(|attr| attr.path().is_ident("serde")) {
        let result = attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("rename") {
                if let Some(rename) = serialize_name(&meta)? {
                    serde_attrs.rename = Some(rename);
                }
            } else if meta.path.is_ident("skip") || meta.path.is_ident("skip_serializing") {
                serde_attrs.skip = true;
            } else if meta.path.is_ident("flatten") {
                serde_attrs.flatten = true;
            } else if meta.path.is_ident("default") {
                serde_attrs.default = true;
                skip_meta_value(&meta)?;
            } else {
                skip_meta_value(&meta)?;
            }
            Ok(())
        });

        if let Err(e) = result {
            debug!("Ignoring unparsable serde attribute: {}", e);
        }
    }

    serde_attrs
}

/// Parse a container-level `#[serde(rename_all = "...")]`.
fn parse_rename_all(attrs: &[syn::Attribute]) -> Option<RenameRule> {
    let mut rule = None;

    for attr in attrs.iter().filter(|attr| attr.path().is_ident("serde")) {
        let result = attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("rename_all") {
                if let Some(value) = serialize_name(&meta)? {
                    rule = RenameRule::from_serde(&value);
                    if rule.is_none() {
                        warn!("Unknown serde rename_all rule: {}", value);
                    }
                }
            } else {
                skip_meta_value(&meta)?;
            }
            Ok(())
        });

        if let Err(e) = result {
            debug!("Ignoring unparsable serde attribute: {}", e);
        }
    }

    rule
}

/// Read `name = "x"` or the `serialize` half of `name(serialize = "x", deserialize = "y")`.
fn serialize_name(meta: &syn::meta::ParseNestedMeta) -> syn::Result<Option<String>> {
    if meta.input.peek(syn::Token![=]) {
        let value: syn::LitStr = meta.value()?.parse()?;
        return Ok(Some(value.value()));
    }

    let mut name = None;
    meta.parse_nested_meta(|inner| {
        let value: syn::LitStr = inner.value()?.parse()?;
        if inner.path.is_ident("serialize") {
            name = Some(value.value());
        }
        Ok(())
    })?;
    Ok(name)
}

/// Consume whatever follows a meta path we do not interpret.
fn skip_meta_value(meta: &syn::meta::ParseNestedMeta) -> syn::Result<()> {
    if meta.input.peek(syn::Token![=]) {
        let _: syn::Expr = meta.value()?.parse()?;
    } else if meta.input.peek(syn::token::Paren) {
        meta.parse_nested_meta(|inner| skip_meta_value(&inner))?;
    }
    Ok(())
}
