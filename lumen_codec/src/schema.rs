//! Schema templates and the class registry.

use std::fmt;

use indexmap::IndexMap;

use crate::error::UnknownClassError;

/// A recursive template describing the expected shape of a value node.
#[derive(Debug, Clone, PartialEq)]
pub enum Schema {
    /// An integer scalar.
    Int,
    /// A float scalar.
    Float,
    /// A boolean scalar.
    Bool,
    /// A string scalar.
    Str,
    /// A homogeneous sequence with a single inner template.
    Seq(Box<Schema>),
    /// A fixed-size heterogeneous tuple; arity must match exactly.
    Tuple(Vec<Schema>),
    /// A reference to a registered class, resolved polymorphically.
    Class(&'static str),
}

impl Schema {
    /// Shorthand for a sequence template.
    pub fn seq(inner: Schema) -> Self {
        Schema::Seq(Box::new(inner))
    }
}

impl fmt::Display for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Schema::Int => write!(f, "int"),
            Schema::Float => write!(f, "float"),
            Schema::Bool => write!(f, "bool"),
            Schema::Str => write!(f, "str"),
            Schema::Seq(inner) => write!(f, "[{}]", inner),
            Schema::Tuple(items) => {
                write!(
                    f,
                    "({})",
                    items
                        .iter()
                        .map(|item| format!("{}", item))
                        .collect::<Vec<_>>()
                        .join(", ")
                )
            }
            Schema::Class(id) => write!(f, "class {}", id),
        }
    }
}

/// The schema of one registered class: its own fields plus a link to the
/// base class it extends.
#[derive(Debug, Clone)]
pub struct ClassDef {
    /// Fully-qualified class identifier, written to the encoded type tag.
    pub id: &'static str,
    /// Base class whose fields this class inherits.
    pub base: Option<&'static str>,
    /// Own fields, in declaration order.
    pub fields: Vec<(&'static str, Schema)>,
}

/// An ordered registry of class definitions.
///
/// Registration order is declaration order; bases must be registered before
/// their descendants, which also rules out inheritance cycles.
#[derive(Debug, Default)]
pub struct Registry {
    classes: IndexMap<&'static str, ClassDef>,
}

impl Registry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            classes: IndexMap::new(),
        }
    }

    /// Register a class definition.
    ///
    /// # Panics
    ///
    /// Panics if a class with the same id is already registered, or if the
    /// definition names a base class that is not. Both are programmer errors
    /// in the registry construction, not runtime conditions.
    pub fn register(&mut self, def: ClassDef) {
        if let Some(base) = def.base {
            assert!(
                self.classes.contains_key(base),
                "base class '{}' of '{}' is not registered",
                base,
                def.id
            );
        }
        let id = def.id;
        assert!(
            self.classes.insert(id, def).is_none(),
            "class '{}' is registered twice",
            id
        );
    }

    /// Look up a class definition by id.
    pub fn get(&self, id: &str) -> Option<&ClassDef> {
        self.classes.get(id)
    }

    /// Return the full field schema of a class: ancestor fields first, own
    /// fields overriding or extending them.
    pub fn merged_fields(
        &self,
        id: &str,
    ) -> Result<IndexMap<&'static str, &Schema>, UnknownClassError> {
        let def = self.get(id).ok_or_else(|| UnknownClassError {
            id: id.to_string(),
        })?;
        let mut fields = match def.base {
            Some(base) => self.merged_fields(base)?,
            None => IndexMap::new(),
        };
        for (name, schema) in &def.fields {
            fields.insert(name, schema);
        }
        Ok(fields)
    }

    /// Return true if `id` names `ancestor` or one of its registered
    /// descendants.
    pub fn is_compatible(&self, id: &str, ancestor: &str) -> bool {
        let mut current = Some(id);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.get(id).and_then(|def| def.base);
        }
        false
    }

    /// The definitions compatible with `ancestor` whose id equals `tag`.
    ///
    /// Used by decode to resolve a type tag; the caller turns zero or
    /// multiple matches into a decode error.
    pub fn matching_descendants(&self, ancestor: &str, tag: &str) -> Vec<&ClassDef> {
        self.classes
            .values()
            .filter(|def| def.id == tag && self.is_compatible(def.id, ancestor))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shapes_registry() -> Registry {
        let mut reg = Registry::new();
        reg.register(ClassDef {
            id: "test.Shape",
            base: None,
            fields: vec![("label", Schema::Str)],
        });
        reg.register(ClassDef {
            id: "test.Circle",
            base: Some("test.Shape"),
            fields: vec![("radius", Schema::Float)],
        });
        reg.register(ClassDef {
            id: "test.Disc",
            base: Some("test.Circle"),
            fields: vec![("label", Schema::Str), ("filled", Schema::Bool)],
        });
        reg
    }

    #[test]
    fn merged_fields_walk_the_base_chain_ancestors_first() {
        let reg = shapes_registry();
        let fields = reg.merged_fields("test.Disc").unwrap();
        let names: Vec<&str> = fields.keys().copied().collect();
        assert_eq!(names, vec!["label", "radius", "filled"]);
    }

    #[test]
    fn merged_fields_are_idempotent() {
        let reg = shapes_registry();
        let first = reg.merged_fields("test.Disc").unwrap();
        let second = reg.merged_fields("test.Disc").unwrap();
        let a: Vec<&str> = first.keys().copied().collect();
        let b: Vec<&str> = second.keys().copied().collect();
        assert_eq!(a, b);
    }

    #[test]
    fn compatibility_follows_the_base_chain() {
        let reg = shapes_registry();
        assert!(reg.is_compatible("test.Disc", "test.Shape"));
        assert!(reg.is_compatible("test.Circle", "test.Circle"));
        assert!(!reg.is_compatible("test.Shape", "test.Circle"));
    }

    #[test]
    #[should_panic(expected = "registered twice")]
    fn duplicate_registration_panics() {
        let mut reg = shapes_registry();
        reg.register(ClassDef {
            id: "test.Shape",
            base: None,
            fields: vec![],
        });
    }

    #[test]
    #[should_panic(expected = "is not registered")]
    fn unknown_base_panics() {
        let mut reg = Registry::new();
        reg.register(ClassDef {
            id: "test.Orphan",
            base: Some("test.Missing"),
            fields: vec![],
        });
    }
}
