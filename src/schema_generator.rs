use crate::classifier::{classify, lookup_named, SchemaType, SchemaTypeTriple};
use crate::context::ParserContext;
use crate::error::Result;
use crate::type_expr::TypeExpr;
use crate::type_resolver::{FieldDef, TypeDefinition, TypeKind, TypeResolver};
use indexmap::IndexMap;
use log::{debug, warn};
use serde::{Deserialize, Serialize};

const SCHEMA_REF_PREFIX: &str = "#/components/schemas/";

/// Schema generator - converts type expressions into OpenAPI schemas.
///
/// Named types go through the known-type registry and primitive rules first. Types
/// defined in the scanned sources become `$ref`s, and their component schema is
/// generated once and collected for the `components` section.
pub struct SchemaGenerator<'a> {
    ctx: &'a ParserContext,
    resolver: &'a TypeResolver,
    /// Component schemas in first-reference order
    schemas: IndexMap<String, Schema>,
    /// Structs currently being flattened into a parent
    flattening: Vec<String>,
}

/// OpenAPI Schema object
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Schema {
    #[serde(rename = "$ref", skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub schema_type: Option<SchemaType>,
    /// e.g. "int32", "int64", "float", "double", "date-time"
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<IndexMap<String, Schema>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<Schema>>,
    #[serde(
        rename = "additionalProperties",
        skip_serializing_if = "Option::is_none"
    )]
    pub additional_properties: Option<Box<Schema>>,
    #[serde(rename = "enum", skip_serializing_if = "Option::is_none")]
    pub enum_values: Option<Vec<String>>,
}

impl Schema {
    pub fn of_type(schema_type: SchemaType) -> Self {
        Self {
            schema_type: Some(schema_type),
            ..Self::default()
        }
    }

    pub fn reference(name: &str) -> Self {
        Self {
            reference: Some(format!("{}{}", SCHEMA_REF_PREFIX, name)),
            ..Self::default()
        }
    }

    /// Render a classifier result. Arrays get an `items` schema of the secondary type.
    pub fn from_triple(triple: &SchemaTypeTriple) -> Self {
        let mut schema = Self::of_type(triple.primary);
        if triple.primary == SchemaType::Array {
            schema.items = Some(Box::new(Self::of_type(triple.secondary)));
        }
        if !triple.format.is_empty() {
            schema.format = Some(triple.format.clone());
        }
        schema
    }
}

/// OpenAPI format refinement for bare numeric primitives.
fn primitive_format(name: &str) -> Option<&'static str> {
    match name {
        "i8" | "i16" | "i32" | "u8" | "u16" | "u32" => Some("int32"),
        "i64" | "i128" | "isize" | "u64" | "u128" | "usize" => Some("int64"),
        "f32" => Some("float"),
        "f64" => Some("double"),
        _ => None,
    }
}

impl<'a> SchemaGenerator<'a> {
    pub fn new(ctx: &'a ParserContext, resolver: &'a TypeResolver) -> Self {
        debug!("Initializing SchemaGenerator");
        Self {
            ctx,
            resolver,
            schemas: IndexMap::new(),
            flattening: Vec::new(),
        }
    }

    /// Generate the schema for `expr`.
    ///
    /// `declaring` names the operation, parameter or field the expression belongs to
    /// and appears in errors for unsupported kinds.
    pub fn schema_for(&mut self, declaring: &str, expr: &TypeExpr) -> Result<Schema> {
        match expr {
            TypeExpr::Pointer(inner) => self.schema_for(declaring, inner),
            TypeExpr::Array(element) => Ok(Schema {
                items: Some(Box::new(self.schema_for(declaring, element)?)),
                ..Schema::of_type(SchemaType::Array)
            }),
            TypeExpr::Map { value, .. } => Ok(Schema {
                additional_properties: Some(Box::new(self.schema_for(declaring, value)?)),
                ..Schema::of_type(SchemaType::Object)
            }),
            TypeExpr::Ident(_) | TypeExpr::Qualified { .. } => self.named_schema(declaring, expr),
            _ => classify(Some(self.ctx), declaring, expr).map(|triple| Schema::from_triple(&triple)),
        }
    }

    fn named_schema(&mut self, declaring: &str, expr: &TypeExpr) -> Result<Schema> {
        if let Some(triple) = lookup_named(Some(self.ctx), expr) {
            let mut schema = Schema::from_triple(&triple);
            if schema.format.is_none() {
                if let TypeExpr::Ident(name) = expr {
                    schema.format = primitive_format(name).map(str::to_string);
                }
            }
            return Ok(schema);
        }

        let resolver = self.resolver;
        match resolver.resolve_expr(expr) {
            Some(definition) => {
                self.generate_component(definition)?;
                Ok(Schema::reference(&definition.name))
            }
            None => {
                debug!("{}: unknown type {}, using object placeholder", declaring, expr);
                classify(Some(self.ctx), declaring, expr).map(|triple| Schema::from_triple(&triple))
            }
        }
    }

    /// Generate a component schema once. The slot is reserved first so that
    /// self-referential types resolve to a `$ref` instead of recursing.
    fn generate_component(&mut self, definition: &'a TypeDefinition) -> Result<()> {
        if self.schemas.contains_key(&definition.name) {
            debug!("Schema for {} already exists", definition.name);
            return Ok(());
        }

        debug!("Generating component schema for: {}", definition.name);
        self.schemas
            .insert(definition.name.clone(), Schema::default());

        let schema = match &definition.kind {
            TypeKind::Struct(struct_def) => self.struct_schema(definition, &struct_def.fields)?,
            TypeKind::Enum(enum_def) if enum_def.unit_only => Schema {
                enum_values: Some(enum_def.variants.clone()),
                description: definition.description.clone(),
                ..Schema::of_type(SchemaType::String)
            },
            TypeKind::Enum(_) => Schema {
                description: definition.description.clone(),
                ..Schema::of_type(SchemaType::Object)
            },
        };

        self.schemas.insert(definition.name.clone(), schema);
        Ok(())
    }

    fn struct_schema(&mut self, definition: &'a TypeDefinition, fields: &'a [FieldDef]) -> Result<Schema> {
        let mut properties = IndexMap::new();
        let mut required = Vec::new();

        for field in fields {
            if field.serde_attrs.skip {
                continue;
            }

            if field.serde_attrs.flatten {
                if let Some(flattened) = self.flatten(field)? {
                    properties.extend(flattened.properties.unwrap_or_default());
                    // An optional or defaulted flatten makes every inner field optional
                    if !field.optional && !field.serde_attrs.default {
                        required.extend(flattened.required.unwrap_or_default());
                    }
                    continue;
                }
            }

            let key = self.property_name(definition, field);
            let declaring = format!("{}.{}", definition.name, field.name);
            let mut schema = self.schema_for(&declaring, &field.ty)?;
            if schema.reference.is_none() {
                schema.description = field.description.clone();
            }

            if !field.optional && !field.serde_attrs.default {
                required.push(key.clone());
            }
            properties.insert(key, schema);
        }

        Ok(Schema {
            description: definition.description.clone(),
            properties: Some(properties),
            required: if required.is_empty() {
                None
            } else {
                Some(required)
            },
            ..Schema::of_type(SchemaType::Object)
        })
    }

    /// Inline the fields of a `#[serde(flatten)]` struct field.
    fn flatten(&mut self, field: &'a FieldDef) -> Result<Option<Schema>> {
        let resolver = self.resolver;
        let Some(definition) = resolver.resolve_expr(strip_pointers(&field.ty)) else {
            return Ok(None);
        };
        let TypeKind::Struct(struct_def) = &definition.kind else {
            return Ok(None);
        };
        if self.flattening.contains(&definition.name) {
            warn!("Recursive flatten of {} ignored", definition.name);
            return Ok(None);
        }

        self.flattening.push(definition.name.clone());
        let schema = self.struct_schema(definition, &struct_def.fields);
        self.flattening.pop();
        schema.map(Some)
    }

    /// Property key precedence: serde rename, then container `rename_all`, then the
    /// context naming strategy.
    fn property_name(&self, definition: &TypeDefinition, field: &FieldDef) -> String {
        if let Some(rename) = &field.serde_attrs.rename {
            return rename.clone();
        }
        match definition.rename_all {
            Some(rule) => rule.apply_to_field(&field.name),
            None => self.ctx.naming_strategy().apply(&field.name),
        }
    }

    pub fn schemas(&self) -> &IndexMap<String, Schema> {
        &self.schemas
    }

    pub fn into_schemas(self) -> IndexMap<String, Schema> {
        self.schemas
    }
}

fn strip_pointers(expr: &TypeExpr) -> &TypeExpr {
    match expr {
        TypeExpr::Pointer(inner) => strip_pointers(inner),
        other => other,
    }
}
