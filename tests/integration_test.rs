use openapi_from_annotations::{
    api::ApiParser,
    context::ParserContext,
    error::Error,
    naming::NamingStrategy,
    openapi_builder::OpenApiDocument,
    serializer::{serialize_json, serialize_yaml},
};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use std::path::Path;
use tempfile::TempDir;

/// Helper function to create a temporary test project
fn create_test_project(files: Vec<(&str, &str)>) -> TempDir {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");

    for (path, content) in files {
        let file_path = temp_dir.path().join(path);
        if let Some(parent) = file_path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent directories");
        }
        std::fs::write(&file_path, content).expect("Failed to write test file");
    }

    temp_dir
}

fn create_petstore() -> TempDir {
    create_test_project(vec![
        ("src/main.rs", include_str!("fixtures/petstore/main.rs")),
        ("src/handlers.rs", include_str!("fixtures/petstore/handlers.rs")),
        ("src/models.rs", include_str!("fixtures/petstore/models.rs")),
        ("docs/tags/cats.md", include_str!("fixtures/petstore/tags/cats.md")),
    ])
}

fn parse_petstore(ctx: ParserContext) -> (TempDir, OpenApiDocument) {
    let project = create_petstore();
    let doc = ApiParser::new(ctx)
        .parse_api(project.path(), Path::new("src/main.rs"))
        .expect("Failed to parse petstore");
    (project, doc)
}

fn to_json(doc: &OpenApiDocument) -> Value {
    serde_json::to_value(doc).expect("Failed to convert document")
}

#[test]
fn test_petstore_info_and_tags() {
    let project = create_petstore();
    let ctx = ParserContext::new().with_markdown_dir(project.path().join("docs/tags"));
    let doc = ApiParser::new(ctx)
        .parse_api(project.path(), Path::new("src/main.rs"))
        .unwrap();
    let json = to_json(&doc);

    assert_eq!(json["openapi"], "3.0.3");
    assert_eq!(
        json["info"],
        json!({
            "title": "Swagger Petstore",
            "version": "1.0",
            "description": "This is a sample server Petstore server.\nPets are sold by the store."
        })
    );
    assert_eq!(
        json["tags"],
        json!([
            { "name": "dogs", "description": "Dogs are cool" },
            { "name": "cats", "description": "Cats are the devil" },
            { "name": "birds" }
        ])
    );
}

#[test]
fn test_petstore_tags_without_markdown_dir() {
    let (_project, doc) = parse_petstore(ParserContext::new());

    let names: Vec<&str> = doc.tags.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names, vec!["dogs", "cats", "birds"]);
    assert_eq!(doc.tags[1].description, "");
}

#[test]
fn test_petstore_paths_and_operations() {
    let (_project, doc) = parse_petstore(ParserContext::new());
    let json = to_json(&doc);

    let paths: Vec<&String> = doc.paths.keys().collect();
    assert_eq!(paths, vec!["/pets", "/pets/{id}", "/pets/counts"]);

    let list = &json["paths"]["/pets"]["get"];
    assert_eq!(list["operationId"], "list_pets");
    assert_eq!(list["tags"], json!(["dogs", "cats"]));
    assert_eq!(
        list["parameters"],
        json!([
            {
                "name": "status",
                "in": "query",
                "required": false,
                "schema": { "$ref": "#/components/schemas/Status" },
                "description": "Filter by status"
            },
            {
                "name": "limit",
                "in": "query",
                "required": false,
                "schema": { "type": "integer", "format": "int32" }
            }
        ])
    );
    assert_eq!(
        list["responses"]["200"],
        json!({
            "description": "All pets",
            "content": {
                "application/json": {
                    "schema": {
                        "type": "array",
                        "items": { "$ref": "#/components/schemas/Pet" }
                    }
                }
            }
        })
    );

    let create = &json["paths"]["/pets"]["post"];
    assert_eq!(
        create["requestBody"],
        json!({
            "description": "Pet to add",
            "required": true,
            "content": {
                "application/json": {
                    "schema": { "$ref": "#/components/schemas/NewPet" }
                }
            }
        })
    );
    assert_eq!(create["responses"]["201"]["description"], "Created");
    assert_eq!(
        create["responses"]["400"]["content"]["application/json"]["schema"]["$ref"],
        "#/components/schemas/ApiError"
    );

    let get = &json["paths"]["/pets/{id}"]["get"];
    assert_eq!(get["operationId"], "getPetById");
    assert_eq!(get["parameters"][0]["schema"], json!({ "type": "string" }));
    assert_eq!(get["responses"]["404"], json!({ "description": "Not Found" }));

    let delete = &json["paths"]["/pets/{id}"]["delete"];
    assert_eq!(delete["deprecated"], true);
    assert_eq!(delete["parameters"][1]["in"], "header");
    assert_eq!(delete["responses"]["204"]["description"], "No Content");

    let counts = &json["paths"]["/pets/counts"]["get"]["responses"]["200"]["content"]
        ["application/json"]["schema"];
    assert_eq!(
        counts,
        &json!({
            "type": "object",
            "additionalProperties": { "type": "integer", "format": "int64" }
        })
    );
}

#[test]
fn test_petstore_component_schemas() {
    let (_project, doc) = parse_petstore(ParserContext::new());
    let json = to_json(&doc);

    let components = doc.components.as_ref().unwrap().schemas.as_ref().unwrap();
    let names: Vec<&String> = components.keys().collect();
    assert_eq!(names, vec!["Status", "Pet", "Tag", "NewPet", "ApiError"]);

    assert_eq!(
        json["components"]["schemas"]["Pet"],
        json!({
            "type": "object",
            "description": "A pet for sale",
            "properties": {
                "id": { "type": "string" },
                "name": { "type": "string" },
                "photoUrls": { "type": "array", "items": { "type": "string" } },
                "price": { "type": "number" },
                "bornAt": { "type": "string" },
                "status": { "$ref": "#/components/schemas/Status" },
                "tags": { "type": "array", "items": { "$ref": "#/components/schemas/Tag" } },
                "litterSizes": {
                    "type": "array",
                    "items": {
                        "type": "array",
                        "items": { "type": "integer", "format": "int32" }
                    }
                },
                "attributes": {
                    "type": "object",
                    "additionalProperties": { "type": "string" }
                }
            },
            "required": [
                "id", "name", "photoUrls", "price", "bornAt", "status", "litterSizes", "attributes"
            ]
        })
    );
    assert_eq!(
        json["components"]["schemas"]["Status"],
        json!({ "type": "string", "enum": ["available", "pending", "sold"] })
    );
    assert_eq!(
        json["components"]["schemas"]["NewPet"]["required"],
        json!(["name"])
    );
    assert_eq!(
        json["components"]["schemas"]["ApiError"]["properties"],
        json!({
            "error_code": { "type": "integer", "format": "int32" },
            "message": { "type": "string" }
        })
    );
}

#[test]
fn test_property_strategy_applies_without_serde_rename() {
    let (_project, doc) =
        parse_petstore(ParserContext::new().with_naming_strategy(NamingStrategy::CamelCase));
    let json = to_json(&doc);

    let error_props = &json["components"]["schemas"]["ApiError"]["properties"];
    assert!(error_props.get("errorCode").is_some());
    assert!(error_props.get("error_code").is_none());

    // rename_all on Pet wins over the strategy either way
    let pet_props = &json["components"]["schemas"]["Pet"]["properties"];
    assert!(pet_props.get("photoUrls").is_some());
}

#[test]
fn test_petstore_serialization_formats() {
    let (_project, doc) = parse_petstore(ParserContext::new());

    let yaml = serialize_yaml(&doc).unwrap();
    assert!(yaml.contains("openapi: 3.0.3"));
    assert!(yaml.contains("operationId: getPetById"));

    let json = serialize_json(&doc).unwrap();
    let reparsed: OpenApiDocument = serde_json::from_str(&json).unwrap();
    assert_eq!(reparsed.paths.len(), 3);
    assert_eq!(reparsed.tags.len(), 3);
}

#[test]
fn test_duplicate_tag_declarations_fail() {
    let project = create_test_project(vec![(
        "src/main.rs",
        "//! @tag.name dogs\n//! @tag.name cats\n//! @tag.name dogs\nfn main() {}\n",
    )]);

    let err = ApiParser::new(ParserContext::new())
        .parse_api(project.path(), Path::new("src/main.rs"))
        .unwrap_err();

    match err.downcast_ref::<Error>() {
        Some(Error::DuplicateTagName(name)) => assert_eq!(name, "dogs"),
        other => panic!("expected DuplicateTagName, got {:?}", other),
    }
}

#[test]
fn test_unreadable_tag_document_fails() {
    let project = create_test_project(vec![(
        "src/main.rs",
        "//! @tag.name cats\n//! @tag.description inline\nfn main() {}\n",
    )]);
    std::fs::create_dir_all(project.path().join("docs/cats.md")).unwrap();

    let ctx = ParserContext::new().with_markdown_dir(project.path().join("docs"));
    let err = ApiParser::new(ctx)
        .parse_api(project.path(), Path::new("src/main.rs"))
        .unwrap_err();

    assert!(matches!(
        err.downcast_ref::<Error>(),
        Some(Error::DocumentReadFailure { .. })
    ));
}

#[test]
fn test_unsupported_type_in_annotation_fails() {
    let project = create_test_project(vec![
        ("src/main.rs", "fn main() {}\n"),
        (
            "src/jobs.rs",
            r#"
            pub struct Job {
                pub on_done: Box<dyn Fn(u32) + Send>,
            }

            /// @Success 200 {object} Job
            /// @Router /jobs [get]
            pub async fn list_jobs() {}
            "#,
        ),
    ]);

    let err = ApiParser::new(ParserContext::new())
        .parse_api(project.path(), Path::new("src/main.rs"))
        .unwrap_err();

    match err.downcast_ref::<Error>() {
        Some(Error::UnsupportedTypeKind { declaring, kind }) => {
            assert_eq!(declaring, "Job.on_done");
            assert_eq!(kind, "function");
        }
        other => panic!("expected UnsupportedTypeKind, got {:?}", other),
    }
}

#[test]
fn test_empty_project_handling() {
    let project = create_test_project(vec![("src/main.rs", "fn main() {}\n")]);

    let doc = ApiParser::new(ParserContext::new())
        .parse_api(project.path(), Path::new("src/main.rs"))
        .unwrap();
    let json = to_json(&doc);

    assert_eq!(json["info"]["title"], "Generated API");
    assert_eq!(json["info"]["version"], "1.0.0");
    assert_eq!(json["paths"], json!({}));
    assert!(json.get("tags").is_none());
    assert!(json.get("components").is_none());
}

#[test]
fn test_duplicate_route_across_files_fails() {
    let project = create_test_project(vec![
        ("src/main.rs", "fn main() {}\n"),
        ("src/a.rs", "/// @Router /users [get]\npub fn first() {}\n"),
        ("src/b.rs", "/// @Router /users [get]\npub fn second() {}\n"),
    ]);

    let err = ApiParser::new(ParserContext::new())
        .parse_api(project.path(), Path::new("src/main.rs"))
        .unwrap_err();

    match err.downcast_ref::<Error>() {
        Some(Error::InvalidDirective { location, .. }) => assert!(location.contains("second")),
        other => panic!("expected InvalidDirective, got {:?}", other),
    }
}
