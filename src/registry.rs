//! Known-type registry: externally defined named types with a fixed schema type.

use crate::classifier::{SchemaType, SchemaTypeTriple};
use log::debug;
use std::collections::HashMap;

/// Seed entries: (bare type name, primary type, secondary type).
///
/// `Decimal`/`BigDecimal` are NUMBER with a STRING secondary slot; keep it that way.
const DEFAULT_KNOWN_TYPES: &[(&str, SchemaType, SchemaType)] = &[
    ("DateTime", SchemaType::String, SchemaType::String),
    ("NaiveDateTime", SchemaType::String, SchemaType::String),
    ("NaiveDate", SchemaType::String, SchemaType::String),
    ("NaiveTime", SchemaType::String, SchemaType::String),
    ("OffsetDateTime", SchemaType::String, SchemaType::String),
    ("PrimitiveDateTime", SchemaType::String, SchemaType::String),
    ("SystemTime", SchemaType::String, SchemaType::String),
    ("Time", SchemaType::String, SchemaType::String),
    ("ObjectId", SchemaType::String, SchemaType::String),
    ("Uuid", SchemaType::String, SchemaType::String),
    ("UUID", SchemaType::String, SchemaType::String),
    ("Decimal", SchemaType::Number, SchemaType::String),
    ("BigDecimal", SchemaType::Number, SchemaType::String),
];

/// Seed name matching `name` regardless of ASCII case (`uuid`, `ObjectID`).
fn seed_name(name: &str) -> Option<&'static str> {
    DEFAULT_KNOWN_TYPES
        .iter()
        .map(|(known, _, _)| *known)
        .find(|known| known.eq_ignore_ascii_case(name))
}

/// Look up a seed entry by bare name without constructing a registry.
pub(crate) fn builtin_known_type(name: &str) -> Option<SchemaTypeTriple> {
    DEFAULT_KNOWN_TYPES
        .iter()
        .find(|(known, _, _)| known.eq_ignore_ascii_case(name))
        .map(|(_, primary, secondary)| SchemaTypeTriple::new(*primary, *secondary))
}

/// Mapping from a qualified or bare type name to a fixed [`SchemaTypeTriple`].
///
/// Keys use `::` as the path separator; names registered with `.` (`chrono.DateTime`)
/// are normalised.
#[derive(Debug, Clone)]
pub struct KnownTypeRegistry {
    entries: HashMap<String, SchemaTypeTriple>,
}

impl KnownTypeRegistry {
    /// Create a registry seeded with the well-known date/time, UUID, object id and decimal types.
    pub fn new() -> Self {
        let mut registry = Self::empty();
        for (name, primary, secondary) in DEFAULT_KNOWN_TYPES {
            registry.register(name, SchemaTypeTriple::new(*primary, *secondary));
        }
        registry
    }

    /// Create a registry with no entries at all.
    pub fn empty() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Register a type, returning the triple it replaces, if any.
    pub fn register(&mut self, name: &str, triple: SchemaTypeTriple) -> Option<SchemaTypeTriple> {
        let key = normalize_key(name);
        debug!("Registering known type {} as {}", key, triple);
        self.entries.insert(key, triple)
    }

    /// Exact-match lookup.
    pub fn lookup(&self, name: &str) -> Option<&SchemaTypeTriple> {
        self.entries.get(&normalize_key(name))
    }

    /// Resolve a possibly package-qualified name.
    ///
    /// Tries `package::name`, then the bare `name`, then the single registered key that
    /// ends in `::name`. Several keys sharing that suffix are ambiguous and resolve to nothing.
    /// Seed names still registered also match case-insensitively as a last resort.
    pub fn resolve(&self, package: Option<&str>, name: &str) -> Option<&SchemaTypeTriple> {
        if let Some(package) = package {
            let qualified = format!("{}::{}", normalize_key(package), name);
            if let Some(triple) = self.entries.get(&qualified) {
                return Some(triple);
            }
        }

        if let Some(triple) = self.entries.get(name) {
            return Some(triple);
        }

        let suffix = format!("::{}", name);
        let mut candidates = self
            .entries
            .iter()
            .filter(|(key, _)| key.ends_with(&suffix));
        if let (Some((_, triple)), None) = (candidates.next(), candidates.next()) {
            return Some(triple);
        }

        seed_name(name).and_then(|seed| self.entries.get(seed))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for KnownTypeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

fn normalize_key(name: &str) -> String {
    let trimmed = name.trim();
    if trimmed.contains('.') && !trimmed.contains("::") {
        trimmed.replace('.', "::")
    } else {
        trimmed.to_string()
    }
}
