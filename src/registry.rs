//! In-memory reference registry consulted while ingesting worlds.

use std::collections::BTreeMap;

use crate::error::{IngestError, Result};
use crate::schema::{ordinal_value, ReferenceKind};

/// A single reference row: code, optional ordinal value, optional name and description
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceEntry {
    pub code: char,
    pub value: Option<u8>,
    pub name: Option<String>,
    pub description: String,
}

impl ReferenceEntry {
    pub fn new(code: char, value: Option<u8>, description: impl Into<String>) -> Self {
        Self {
            code,
            value,
            name: None,
            description: description.into(),
        }
    }

    pub fn with_name(self, name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..self
        }
    }
}

/// Lookup tables for the eight UWP attributes.
///
/// Constructed explicitly and handed to the pipeline, so each store (or test)
/// can work with its own set of entries.
#[derive(Debug, Clone, Default)]
pub struct ReferenceRegistry {
    tables: BTreeMap<ReferenceKind, Vec<ReferenceEntry>>,
}

impl ReferenceRegistry {
    /// A registry with no entries in any table
    pub fn empty() -> Self {
        Self::default()
    }

    /// The built-in Traveller tables
    pub fn standard() -> Result<Self> {
        let mut registry = Self::empty();
        for kind in ReferenceKind::ALL {
            for seed in kind.seeds() {
                let entry =
                    ReferenceEntry::new(seed.code, ordinal_value(kind, seed.code), seed.description);
                let entry = match seed.name {
                    Some(name) => entry.with_name(name),
                    None => entry,
                };
                registry.insert(kind, entry)?;
            }
        }
        Ok(registry)
    }

    /// Add an entry; a code may appear only once per table
    pub fn insert(&mut self, kind: ReferenceKind, entry: ReferenceEntry) -> Result<()> {
        let entries = self.tables.entry(kind).or_default();
        if entries.iter().any(|e| e.code == entry.code) {
            return Err(IngestError::DuplicateReferenceCode {
                table: kind.table_name(),
                code: entry.code,
            });
        }
        entries.push(entry);
        Ok(())
    }

    /// Resolve a code in one table. There is no fallback entry.
    pub fn lookup(&self, kind: ReferenceKind, code: char) -> Result<&ReferenceEntry> {
        self.entries(kind)
            .iter()
            .find(|e| e.code == code)
            .ok_or(IngestError::ReferenceLookup {
                table: kind.table_name(),
                code,
            })
    }

    /// Entries of one table in insertion order
    pub fn entries(&self, kind: ReferenceKind) -> &[ReferenceEntry] {
        self.tables.get(&kind).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.tables.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_standard_codes_unique_per_table() {
        let registry = ReferenceRegistry::standard().unwrap();
        for kind in ReferenceKind::ALL {
            let entries = registry.entries(kind);
            let codes: HashSet<char> = entries.iter().map(|e| e.code).collect();
            assert_eq!(codes.len(), entries.len(), "{}", kind.table_name());
            assert_eq!(entries.len(), kind.seeds().len());
        }
    }

    #[test]
    fn test_unknown_code_resolves() {
        let registry = ReferenceRegistry::standard().unwrap();
        for kind in ReferenceKind::ALL {
            let entry = registry.lookup(kind, '?').unwrap();
            assert_eq!(entry.value, None);
        }
    }

    #[test]
    fn test_lookup_values_and_names() {
        let registry = ReferenceRegistry::standard().unwrap();
        let a = registry.lookup(ReferenceKind::Starport, 'A').unwrap();
        assert_eq!(a.value, Some(10));
        assert_eq!(a.name.as_deref(), Some("Class A"));

        let x = registry.lookup(ReferenceKind::Starport, 'X').unwrap();
        assert_eq!(x.value, None);

        let size = registry.lookup(ReferenceKind::Size, '8').unwrap();
        assert_eq!(size.value, Some(8));
        assert_eq!(size.name, None);
    }

    #[test]
    fn test_missing_code_is_lookup_error() {
        let registry = ReferenceRegistry::standard().unwrap();
        let err = registry.lookup(ReferenceKind::Hydrosphere, 'B').unwrap_err();
        assert!(matches!(
            err,
            IngestError::ReferenceLookup {
                table: "hydrospheres",
                code: 'B'
            }
        ));
    }

    #[test]
    fn test_duplicate_insert_rejected() {
        let mut registry = ReferenceRegistry::empty();
        registry
            .insert(ReferenceKind::Starport, ReferenceEntry::new('A', Some(10), "Class A"))
            .unwrap();
        let err = registry
            .insert(ReferenceKind::Starport, ReferenceEntry::new('A', Some(10), "again"))
            .unwrap_err();
        assert!(matches!(err, IngestError::DuplicateReferenceCode { .. }));
        assert_eq!(registry.entries(ReferenceKind::Starport).len(), 1);

        // Same code in another table is fine
        registry
            .insert(ReferenceKind::Size, ReferenceEntry::new('A', Some(10), "10000 miles"))
            .unwrap();
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_empty_registry_resolves_nothing() {
        let registry = ReferenceRegistry::empty();
        assert!(registry.is_empty());
        assert!(registry.lookup(ReferenceKind::TechLevel, '?').is_err());
    }
}
