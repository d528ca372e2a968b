use openapi_from_annotations::{
    classifier::{classify, SchemaType, SchemaTypeTriple},
    context::ParserContext,
    error::Error,
    parser::{AstParser, ParsedFile},
    schema_generator::{Schema, SchemaGenerator},
    type_expr::TypeExpr,
    type_resolver::TypeResolver,
};
use pretty_assertions::assert_eq;
use std::path::Path;

fn parse_sources(files: &[(&str, &str)]) -> Vec<ParsedFile> {
    files
        .iter()
        .map(|(path, content)| AstParser::parse_source(Path::new(path), content).unwrap())
        .collect()
}

fn expr(annotation: &str) -> TypeExpr {
    annotation.parse().unwrap()
}

#[test]
fn test_types_resolve_across_files() {
    let files = parse_sources(&[
        (
            "src/orders.rs",
            r#"
            use crate::items::LineItem;

            /// A customer order
            pub struct Order {
                pub id: u64,
                pub items: Vec<LineItem>,
                pub note: Option<String>,
            }
            "#,
        ),
        (
            "src/items.rs",
            r#"
            pub struct LineItem {
                pub sku: String,
                pub quantity: u16,
            }
            "#,
        ),
    ]);
    let ctx = ParserContext::new();
    let resolver = TypeResolver::new(&files);
    let mut generator = SchemaGenerator::new(&ctx, &resolver);

    let schema = generator.schema_for("test", &expr("orders::Order")).unwrap();
    assert_eq!(schema, Schema::reference("Order"));

    let schemas = generator.into_schemas();
    let names: Vec<&String> = schemas.keys().collect();
    assert_eq!(names, vec!["Order", "LineItem"]);

    let order = &schemas["Order"];
    assert_eq!(order.description.as_deref(), Some("A customer order"));
    assert_eq!(
        order.required,
        Some(vec!["id".to_string(), "items".to_string()])
    );
    let items = order.properties.as_ref().unwrap()["items"].clone();
    assert_eq!(
        items,
        Schema {
            items: Some(Box::new(Schema::reference("LineItem"))),
            ..Schema::of_type(SchemaType::Array)
        }
    );
}

#[test]
fn test_self_referential_type_uses_reference() {
    let files = parse_sources(&[(
        "src/tree.rs",
        r#"
        pub struct Category {
            pub name: String,
            pub parent: Option<Box<Category>>,
            pub children: Vec<Category>,
        }
        "#,
    )]);
    let ctx = ParserContext::new();
    let resolver = TypeResolver::new(&files);
    let mut generator = SchemaGenerator::new(&ctx, &resolver);

    generator.schema_for("test", &expr("Category")).unwrap();

    let category = &generator.schemas()["Category"];
    let properties = category.properties.as_ref().unwrap();
    assert_eq!(properties["parent"], Schema::reference("Category"));
    assert_eq!(
        properties["children"].items.as_deref(),
        Some(&Schema::reference("Category"))
    );
}

#[test]
fn test_known_type_wins_over_source_definition() {
    let files = parse_sources(&[(
        "src/money.rs",
        "pub struct Money { pub cents: i64 }",
    )]);
    let ctx = ParserContext::new().with_known_type(
        "Money",
        SchemaTypeTriple::uniform(SchemaType::Integer).with_format("int64"),
    );
    let resolver = TypeResolver::new(&files);
    let mut generator = SchemaGenerator::new(&ctx, &resolver);

    let schema = generator.schema_for("Invoice.total", &expr("Money")).unwrap();
    assert_eq!(
        schema,
        Schema {
            format: Some("int64".to_string()),
            ..Schema::of_type(SchemaType::Integer)
        }
    );
    assert!(generator.schemas().is_empty());
}

#[test]
fn test_flattened_fields_are_inlined() {
    let files = parse_sources(&[(
        "src/page.rs",
        r#"
        pub struct PageMeta {
            pub page: u32,
            pub total: u64,
        }

        pub struct UserPage {
            #[serde(flatten)]
            pub meta: PageMeta,
            pub users: Vec<String>,
        }
        "#,
    )]);
    let ctx = ParserContext::new();
    let resolver = TypeResolver::new(&files);
    let mut generator = SchemaGenerator::new(&ctx, &resolver);

    generator.schema_for("test", &expr("UserPage")).unwrap();

    let page = &generator.schemas()["UserPage"];
    let keys: Vec<&String> = page.properties.as_ref().unwrap().keys().collect();
    assert_eq!(keys, vec!["page", "total", "users"]);
    assert!(!generator.schemas().contains_key("PageMeta"));
}

#[test]
fn test_annotation_type_strings_classify() {
    let ctx = ParserContext::new();

    assert_eq!(
        classify(Some(&ctx), "test", &expr("*string")).unwrap(),
        SchemaTypeTriple::uniform(SchemaType::String)
    );
    assert_eq!(
        classify(Some(&ctx), "test", &expr("[]*hoge.ObjectId")).unwrap(),
        SchemaTypeTriple::new(SchemaType::Array, SchemaType::String)
    );
    assert_eq!(
        classify(Some(&ctx), "test", &TypeExpr::array(TypeExpr::Struct)).unwrap(),
        SchemaTypeTriple::new(SchemaType::Array, SchemaType::Object)
    );
    assert_eq!(
        classify(Some(&ctx), "test", &expr("HashMap<String, String>")).unwrap(),
        SchemaTypeTriple::uniform(SchemaType::Object)
    );
    assert_eq!(
        classify(None, "test", &expr("rust_decimal::Decimal")).unwrap(),
        SchemaTypeTriple::new(SchemaType::Number, SchemaType::String)
    );
}

#[test]
fn test_unsupported_field_names_declaring_field() {
    let files = parse_sources(&[(
        "src/events.rs",
        r#"
        pub struct Subscription {
            pub topic: String,
            pub events: tokio::sync::mpsc::Receiver<String>,
        }
        "#,
    )]);
    let ctx = ParserContext::new();
    let resolver = TypeResolver::new(&files);
    let mut generator = SchemaGenerator::new(&ctx, &resolver);

    let err = generator
        .schema_for("test", &expr("Subscription"))
        .unwrap_err();
    match err {
        Error::UnsupportedTypeKind { declaring, kind } => {
            assert_eq!(declaring, "Subscription.events");
            assert_eq!(kind, "channel");
        }
        other => panic!("expected UnsupportedTypeKind, got {:?}", other),
    }
}
