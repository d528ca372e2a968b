use crate::classifier::SchemaType;
use crate::error::{Error, Result};
use crate::general_info::ApiInfo;
use crate::operation::{HttpMethod, ParamLocation, ParsedOperation, ResponseSpec};
use crate::schema_generator::{Schema, SchemaGenerator};
use crate::tags::TagSpec;
use indexmap::IndexMap;
use log::debug;
use serde::{Deserialize, Serialize};

const OPENAPI_VERSION: &str = "3.0.3";
const JSON_MEDIA_TYPE: &str = "application/json";
const FORM_MEDIA_TYPE: &str = "multipart/form-data";

/// OpenAPI document builder
pub struct OpenApiBuilder {
    info: ApiInfo,
    tags: Vec<TagSpec>,
    /// URL path -> PathItem, in the order routes were added
    paths: IndexMap<String, PathItem>,
}

/// OpenAPI PathItem object - represents all operations for a single path
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PathItem {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub get: Option<Operation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub post: Option<Operation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub put: Option<Operation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delete: Option<Operation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub patch: Option<Operation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<Operation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub head: Option<Operation>,
}

impl PathItem {
    fn slot(&mut self, method: HttpMethod) -> &mut Option<Operation> {
        match method {
            HttpMethod::Get => &mut self.get,
            HttpMethod::Post => &mut self.post,
            HttpMethod::Put => &mut self.put,
            HttpMethod::Delete => &mut self.delete,
            HttpMethod::Patch => &mut self.patch,
            HttpMethod::Options => &mut self.options,
            HttpMethod::Head => &mut self.head,
        }
    }

    pub fn operation(&self, method: HttpMethod) -> Option<&Operation> {
        match method {
            HttpMethod::Get => self.get.as_ref(),
            HttpMethod::Post => self.post.as_ref(),
            HttpMethod::Put => self.put.as_ref(),
            HttpMethod::Delete => self.delete.as_ref(),
            HttpMethod::Patch => self.patch.as_ref(),
            HttpMethod::Options => self.options.as_ref(),
            HttpMethod::Head => self.head.as_ref(),
        }
    }
}

/// OpenAPI Operation object - represents a single API operation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Operation {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "operationId")]
    pub operation_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parameters: Option<Vec<Parameter>>,
    #[serde(rename = "requestBody", skip_serializing_if = "Option::is_none")]
    pub request_body: Option<RequestBody>,
    pub responses: IndexMap<String, Response>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub deprecated: bool,
}

/// OpenAPI Parameter object
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,
    #[serde(rename = "in")]
    pub location: ParamLocation,
    pub required: bool,
    pub schema: Schema,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// OpenAPI RequestBody object
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestBody {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub required: bool,
    /// Content types and their schemas
    pub content: IndexMap<String, MediaType>,
}

/// OpenAPI MediaType object
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaType {
    pub schema: Schema,
}

/// OpenAPI Response object
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Response {
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<IndexMap<String, MediaType>>,
}

/// OpenAPI Components object
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Components {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schemas: Option<IndexMap<String, Schema>>,
}

/// Complete OpenAPI document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenApiDocument {
    pub openapi: String,
    pub info: ApiInfo,
    /// Tags in the order the tag loader produced them
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<TagSpec>,
    pub paths: IndexMap<String, PathItem>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub components: Option<Components>,
}

impl OpenApiBuilder {
    /// Create a new OpenApiBuilder with default info
    pub fn new() -> Self {
        debug!("Initializing OpenApiBuilder");
        Self {
            info: ApiInfo::default(),
            tags: Vec::new(),
            paths: IndexMap::new(),
        }
    }

    pub fn with_info(mut self, info: ApiInfo) -> Self {
        self.info = info;
        self
    }

    /// Use the loaded tags as-is; their order is kept.
    pub fn with_tags(mut self, tags: Vec<TagSpec>) -> Self {
        self.tags = tags;
        self
    }

    /// Add an operation to the document.
    ///
    /// # Errors
    ///
    /// Fails when another operation already uses the same path and method, or when a
    /// parameter or response type cannot be represented.
    pub fn add_operation(
        &mut self,
        op: &ParsedOperation,
        schema_gen: &mut SchemaGenerator,
    ) -> Result<()> {
        debug!("Adding operation: {} {}", op.method, op.path);

        let openapi_path = Self::convert_path_format(&op.path);
        let location = op.location();

        if self
            .paths
            .get(&openapi_path)
            .and_then(|item| item.operation(op.method))
            .is_some()
        {
            return Err(Error::directive(
                location,
                "Router",
                format!("{} {} is already documented", op.method, openapi_path),
            ));
        }

        let mut parameters = Vec::new();
        let mut body = None;
        let mut form_fields = Vec::new();

        for param in &op.params {
            let declaring = format!("{}.{}", op.handler, param.name);
            let mut schema = schema_gen.schema_for(&declaring, &param.ty)?;
            match param.location {
                ParamLocation::Body => {
                    if body.is_some() {
                        return Err(Error::directive(
                            location,
                            "Param",
                            "only one body parameter is allowed",
                        ));
                    }
                    body = Some((schema, param));
                }
                ParamLocation::FormData => {
                    if schema.reference.is_none() {
                        schema.description = param.description.clone();
                    }
                    form_fields.push((schema, param));
                }
                _ => parameters.push(Parameter {
                    name: param.name.clone(),
                    location: param.location,
                    required: param.required || param.location == ParamLocation::Path,
                    schema,
                    description: param.description.clone(),
                }),
            }
        }

        let mut content = IndexMap::new();
        let mut body_required = false;
        let mut body_description = None;
        if let Some((schema, param)) = body {
            body_required = param.required;
            body_description = param.description.clone();
            content.insert(JSON_MEDIA_TYPE.to_string(), MediaType { schema });
        }
        if !form_fields.is_empty() {
            let mut form = Schema::of_type(SchemaType::Object);
            let mut required = Vec::new();
            let mut properties = IndexMap::new();
            for (schema, param) in form_fields {
                if param.required {
                    required.push(param.name.clone());
                    body_required = true;
                }
                properties.insert(param.name.clone(), schema);
            }
            form.properties = Some(properties);
            form.required = (!required.is_empty()).then_some(required);
            content.insert(FORM_MEDIA_TYPE.to_string(), MediaType { schema: form });
        }
        let request_body = (!content.is_empty()).then(|| RequestBody {
            description: body_description,
            required: body_required,
            content,
        });

        let mut responses = IndexMap::new();
        for response in &op.responses {
            let declaring = format!("{} response {}", op.handler, response.code);
            let built = Self::build_response(response, &declaring, schema_gen)?;
            responses.insert(response.code.clone(), built);
        }
        if responses.is_empty() {
            // Default response when nothing is documented
            responses.insert(
                "200".to_string(),
                Response {
                    description: "Successful response".to_string(),
                    content: None,
                },
            );
        }

        let operation = Operation {
            tags: op.tags.clone(),
            summary: op.summary.clone(),
            description: op.description.clone(),
            operation_id: op
                .operation_id
                .clone()
                .unwrap_or_else(|| op.handler.clone()),
            parameters: (!parameters.is_empty()).then_some(parameters),
            request_body,
            responses,
            deprecated: op.deprecated,
        };

        let path_item = self.paths.entry(openapi_path).or_default();
        *path_item.slot(op.method) = Some(operation);
        Ok(())
    }

    fn build_response(
        response: &ResponseSpec,
        declaring: &str,
        schema_gen: &mut SchemaGenerator,
    ) -> Result<Response> {
        let content = match &response.ty {
            Some(ty) => {
                let schema = schema_gen.schema_for(declaring, ty)?;
                let mut content = IndexMap::new();
                content.insert(JSON_MEDIA_TYPE.to_string(), MediaType { schema });
                Some(content)
            }
            None => None,
        };

        Ok(Response {
            description: response
                .description
                .clone()
                .unwrap_or_else(|| status_text(&response.code).to_string()),
            content,
        })
    }

    /// Convert path format from :param or {param} to OpenAPI {param} format
    fn convert_path_format(path: &str) -> String {
        path.split('/')
            .map(|part| match part.strip_prefix(':') {
                Some(name) => format!("{{{}}}", name),
                None => part.to_string(),
            })
            .collect::<Vec<_>>()
            .join("/")
    }

    /// Build the final OpenAPI document
    pub fn build(self, schema_gen: SchemaGenerator) -> OpenApiDocument {
        debug!("Building final OpenAPI document");

        let schemas = schema_gen.into_schemas();
        let components = if schemas.is_empty() {
            None
        } else {
            Some(Components {
                schemas: Some(schemas),
            })
        };

        OpenApiDocument {
            openapi: OPENAPI_VERSION.to_string(),
            info: self.info,
            tags: self.tags,
            paths: self.paths,
            components,
        }
    }
}

impl Default for OpenApiBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Reason phrase used when a response has no description.
fn status_text(code: &str) -> &'static str {
    match code {
        "200" => "OK",
        "201" => "Created",
        "202" => "Accepted",
        "204" => "No Content",
        "301" => "Moved Permanently",
        "302" => "Found",
        "304" => "Not Modified",
        "400" => "Bad Request",
        "401" => "Unauthorized",
        "403" => "Forbidden",
        "404" => "Not Found",
        "405" => "Method Not Allowed",
        "409" => "Conflict",
        "415" => "Unsupported Media Type",
        "422" => "Unprocessable Entity",
        "429" => "Too Many Requests",
        "500" => "Internal Server Error",
        "502" => "Bad Gateway",
        "503" => "Service Unavailable",
        "default" => "Default response",
        _ => "Response",
    }
}
