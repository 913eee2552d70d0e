//! schema/registry.rs
//! Name → schema lookup for a set of record types.

use std::collections::BTreeMap;

use crate::schema::types::{RecordSchema, SchemaError};

/// Registry of record schemas keyed by record type name.
#[derive(Debug, Default, Clone)]
pub struct SchemaRegistry {
    types: BTreeMap<&'static str, &'static RecordSchema>,
}

impl SchemaRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate `schema` and register it together with every struct type it
    /// references. Registering the same static twice is a no-op.
    pub fn register(&mut self, schema: &'static RecordSchema) -> Result<(), SchemaError> {
        schema.validate()?;
        for s in schema.reachable() {
            match self.types.get(s.name) {
                Some(existing) if std::ptr::eq(*existing, s) => {}
                Some(_) => return Err(SchemaError::ConflictingRecordType { name: s.name }),
                None => {
                    self.types.insert(s.name, s);
                }
            }
        }
        Ok(())
    }

    pub fn resolve(&self, name: &str) -> Result<&'static RecordSchema, SchemaError> {
        self.types
            .get(name)
            .copied()
            .ok_or_else(|| SchemaError::UnknownRecordType { name: name.to_string() })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.types.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.types.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}
