//! Closed set of type-expression shapes understood by the classifier.
//!
//! Rust types found in scanned sources are lowered from `syn::Type` into a [`TypeExpr`];
//! type names written inside annotations (e.g. the type column of `@Param`) are parsed
//! with [`str::parse`], which goes through `syn` as well.

use crate::error::{Error, Result};
use std::fmt;
use std::str::FromStr;
use syn::punctuated::Punctuated;
use syn::{GenericArgument, PathArguments, Type, TypeParamBound};

/// Wrappers that are transparent for schema purposes.
const POINTER_WRAPPERS: &[&str] = &[
    "Box", "Rc", "Arc", "Option", "Cow", "Cell", "RefCell", "Mutex", "RwLock",
];

const SEQUENCE_TYPES: &[&str] = &[
    "Vec", "VecDeque", "LinkedList", "BinaryHeap", "HashSet", "BTreeSet", "IndexSet",
];

const MAP_TYPES: &[&str] = &["HashMap", "BTreeMap", "IndexMap"];

const CHANNEL_TYPES: &[&str] = &[
    "Sender", "SyncSender", "Receiver", "UnboundedSender", "UnboundedReceiver",
];

const FN_TRAITS: &[&str] = &["Fn", "FnMut", "FnOnce"];

/// A type expression node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeExpr {
    /// Bare identifier such as `String` or `User`
    Ident(String),
    /// Path-qualified identifier such as `chrono::DateTime`
    Qualified { package: String, name: String },
    /// Reference, raw pointer or transparent smart-pointer wrapper
    Pointer(Box<TypeExpr>),
    /// Slice, array or sequence collection
    Array(Box<TypeExpr>),
    /// Key/value collection
    Map {
        key: Box<TypeExpr>,
        value: Box<TypeExpr>,
    },
    /// Anonymous product type (tuples)
    Struct,
    /// Trait object or `impl Trait`
    Interface,
    /// Channel endpoint carrying the given element type
    Channel(Box<TypeExpr>),
    /// Function pointer or closure trait
    Function,
    /// A syntactic shape with no mapping; the payload names the shape
    Unsupported(String),
}

impl TypeExpr {
    pub fn ident(name: impl Into<String>) -> Self {
        TypeExpr::Ident(name.into())
    }

    pub fn qualified(package: impl Into<String>, name: impl Into<String>) -> Self {
        TypeExpr::Qualified {
            package: package.into(),
            name: name.into(),
        }
    }

    pub fn pointer(inner: TypeExpr) -> Self {
        TypeExpr::Pointer(Box::new(inner))
    }

    pub fn array(element: TypeExpr) -> Self {
        TypeExpr::Array(Box::new(element))
    }

    pub fn map(key: TypeExpr, value: TypeExpr) -> Self {
        TypeExpr::Map {
            key: Box::new(key),
            value: Box::new(value),
        }
    }

    pub fn channel(element: TypeExpr) -> Self {
        TypeExpr::Channel(Box::new(element))
    }

    /// The bare type name for `Ident` and `Qualified` nodes.
    pub fn type_name(&self) -> Option<&str> {
        match self {
            TypeExpr::Ident(name) | TypeExpr::Qualified { name, .. } => Some(name),
            _ => None,
        }
    }

    /// Lower a `syn::Type` into the closed node set.
    pub fn from_syn(ty: &Type) -> Self {
        match ty {
            Type::Reference(reference) => Self::pointer(Self::from_syn(&reference.elem)),
            Type::Ptr(ptr) => Self::pointer(Self::from_syn(&ptr.elem)),
            Type::Slice(slice) => Self::array(Self::from_syn(&slice.elem)),
            Type::Array(array) => Self::array(Self::from_syn(&array.elem)),
            Type::Tuple(_) => TypeExpr::Struct,
            Type::BareFn(_) => TypeExpr::Function,
            Type::TraitObject(object) => Self::from_bounds(&object.bounds),
            Type::ImplTrait(imp) => Self::from_bounds(&imp.bounds),
            Type::Paren(paren) => Self::from_syn(&paren.elem),
            Type::Group(group) => Self::from_syn(&group.elem),
            Type::Path(type_path) if type_path.qself.is_some() => {
                TypeExpr::Unsupported("qualified associated type".to_string())
            }
            Type::Path(type_path) => Self::from_path(&type_path.path),
            Type::Never(_) => TypeExpr::Unsupported("never type".to_string()),
            Type::Infer(_) => TypeExpr::Unsupported("inferred type".to_string()),
            Type::Macro(_) => TypeExpr::Unsupported("macro type".to_string()),
            _ => TypeExpr::Unsupported("verbatim type".to_string()),
        }
    }

    fn from_bounds(bounds: &Punctuated<TypeParamBound, syn::token::Plus>) -> Self {
        let is_closure = bounds.iter().any(|bound| match bound {
            TypeParamBound::Trait(trait_bound) => trait_bound
                .path
                .segments
                .last()
                .is_some_and(|segment| FN_TRAITS.iter().any(|f| segment.ident == f)),
            _ => false,
        });

        if is_closure {
            TypeExpr::Function
        } else {
            TypeExpr::Interface
        }
    }

    fn from_path(path: &syn::Path) -> Self {
        let Some(last) = path.segments.last() else {
            return TypeExpr::Unsupported("empty path".to_string());
        };
        let name = last.ident.to_string();
        let args = type_arguments(&last.arguments);

        match args.as_slice() {
            [inner, ..] if POINTER_WRAPPERS.contains(&name.as_str()) => {
                return Self::pointer(Self::from_syn(inner));
            }
            [key, value, ..] if MAP_TYPES.contains(&name.as_str()) => {
                return Self::map(Self::from_syn(key), Self::from_syn(value));
            }
            [element, ..] if SEQUENCE_TYPES.contains(&name.as_str()) => {
                return Self::array(Self::from_syn(element));
            }
            [element, ..] if CHANNEL_TYPES.contains(&name.as_str()) => {
                return Self::channel(Self::from_syn(element));
            }
            _ => {}
        }

        if path.segments.len() == 1 {
            return TypeExpr::Ident(name);
        }

        let package = path
            .segments
            .iter()
            .take(path.segments.len() - 1)
            .map(|segment| segment.ident.to_string())
            .collect::<Vec<_>>()
            .join("::");
        TypeExpr::Qualified { package, name }
    }
}

/// Type arguments of a path segment, skipping lifetimes and const generics.
fn type_arguments(arguments: &PathArguments) -> Vec<&Type> {
    match arguments {
        PathArguments::AngleBracketed(args) => args
            .args
            .iter()
            .filter_map(|arg| match arg {
                GenericArgument::Type(ty) => Some(ty),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    }
}

impl From<&Type> for TypeExpr {
    fn from(ty: &Type) -> Self {
        TypeExpr::from_syn(ty)
    }
}

/// Parses annotation type strings.
///
/// Accepts Rust syntax (`Vec<Option<String>>`, `chrono::DateTime<Utc>`) as well as the
/// swag shorthands `[]T`, `*T` and `package.Name`.
impl FromStr for TypeExpr {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        if let Some(element) = trimmed.strip_prefix("[]") {
            return Ok(Self::array(element.parse()?));
        }
        if let Some(inner) = trimmed.strip_prefix('*') {
            if !inner.starts_with("const ") && !inner.starts_with("mut ") {
                return Ok(Self::pointer(inner.parse()?));
            }
        }

        let normalized = if is_dotted_path(trimmed) {
            trimmed.replace('.', "::")
        } else {
            trimmed.to_string()
        };

        let ty: Type = syn::parse_str(&normalized).map_err(|e| {
            Error::InvalidArgument(format!("cannot parse type `{}`: {}", trimmed, e))
        })?;
        Ok(Self::from_syn(&ty))
    }
}

/// `package.Name` style: identifier segments joined by single dots, nothing else.
fn is_dotted_path(s: &str) -> bool {
    s.contains('.')
        && s.split('.').all(|segment| {
            segment
                .chars()
                .next()
                .is_some_and(|c| c.is_alphabetic() || c == '_')
                && segment.chars().all(|c| c.is_alphanumeric() || c == '_')
        })
}

impl fmt::Display for TypeExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeExpr::Ident(name) => write!(f, "{}", name),
            TypeExpr::Qualified { package, name } => write!(f, "{}::{}", package, name),
            TypeExpr::Pointer(inner) => write!(f, "&{}", inner),
            TypeExpr::Array(element) => write!(f, "[{}]", element),
            TypeExpr::Map { key, value } => write!(f, "map<{}, {}>", key, value),
            TypeExpr::Struct => write!(f, "struct"),
            TypeExpr::Interface => write!(f, "interface"),
            TypeExpr::Channel(element) => write!(f, "channel<{}>", element),
            TypeExpr::Function => write!(f, "fn"),
            TypeExpr::Unsupported(kind) => write!(f, "<{}>", kind),
        }
    }
}
