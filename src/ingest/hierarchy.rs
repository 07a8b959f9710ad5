use rusqlite::{params, Connection, OptionalExtension};
use std::collections::HashMap;
use tracing::{debug, info};

use crate::error::{is_unique_violation, IngestError, Result};
use crate::model::{Milieu, Sector, Subsector};
use crate::parser::CatalogSector;
use crate::writer::Store;

/// The committed milieu/sector/subsector skeleton worlds are attached to
#[derive(Debug, Clone)]
pub struct SectorHierarchy {
    pub milieu: Milieu,
    /// Whether this run created the milieu row
    pub milieu_created: bool,
    pub sector: Sector,
    /// Subsectors keyed by grid letter
    pub subsectors: HashMap<String, Subsector>,
}

impl SectorHierarchy {
    /// Resolve a row's `SS` value
    pub fn subsector(&self, index: &str) -> Result<&Subsector> {
        self.subsectors
            .get(index)
            .ok_or_else(|| IngestError::SubsectorResolution {
                sector: self.sector.name.clone(),
                index: index.to_string(),
            })
    }
}

/// Look a milieu up by name, inserting it when absent.
///
/// Returns the row and whether it was created by this call.
pub fn find_or_create_milieu(conn: &Connection, name: &str) -> Result<(Milieu, bool)> {
    let existing: Option<i64> = conn
        .query_row("SELECT id FROM milieus WHERE name = ?1", [name], |r| r.get(0))
        .optional()?;

    if let Some(id) = existing {
        return Ok((
            Milieu {
                id,
                name: name.to_string(),
            },
            false,
        ));
    }

    conn.execute("INSERT INTO milieus (name) VALUES (?1)", [name])?;
    debug!(milieu = name, "created milieu");
    Ok((
        Milieu {
            id: conn.last_insert_rowid(),
            name: name.to_string(),
        },
        true,
    ))
}

/// Create the sector and its subsectors under a (possibly new) milieu.
///
/// Everything is written in one transaction that commits before any world is
/// ingested. A sector that already exists in the milieu, or a repeated
/// subsector index, is a [`IngestError::HierarchyConflict`] and nothing is kept.
pub fn create_hierarchy(store: &mut Store, catalog: &CatalogSector) -> Result<SectorHierarchy> {
    let tx = store.connection_mut().transaction()?;

    let (milieu, milieu_created) = find_or_create_milieu(&tx, catalog.milieu())?;

    tx.execute(
        "INSERT INTO sectors (name, x, y, milieu_id) VALUES (?1, ?2, ?3, ?4)",
        params![catalog.name(), catalog.x, catalog.y, milieu.id],
    )
    .map_err(|e| conflict_or(e, "sector", catalog.name(), format!("milieu {}", milieu.name)))?;

    let sector = Sector {
        id: tx.last_insert_rowid(),
        name: catalog.name().to_string(),
        x: catalog.x,
        y: catalog.y,
        milieu_id: milieu.id,
    };

    let mut subsectors = HashMap::new();
    {
        let mut stmt = tx.prepare_cached(
            "INSERT INTO subsectors (name, subsector_index, index_number, sector_id)
             VALUES (?1, ?2, ?3, ?4)",
        )?;
        for info in catalog.subsectors() {
            stmt.execute(params![info.name, info.index, info.index_number, sector.id])
                .map_err(|e| {
                    conflict_or(e, "subsector", &info.index, format!("sector {}", sector.name))
                })?;

            subsectors.insert(
                info.index.clone(),
                Subsector {
                    id: tx.last_insert_rowid(),
                    name: info.name.clone(),
                    index: info.index.clone(),
                    sector_id: sector.id,
                },
            );
        }
    }

    tx.commit()?;
    info!(
        sector = %sector.name,
        milieu = %milieu.name,
        x = sector.x,
        y = sector.y,
        subsectors = subsectors.len(),
        "created sector hierarchy"
    );

    Ok(SectorHierarchy {
        milieu,
        milieu_created,
        sector,
        subsectors,
    })
}

fn conflict_or(err: rusqlite::Error, entity: &'static str, name: &str, scope: String) -> IngestError {
    if is_unique_violation(&err) {
        IngestError::HierarchyConflict {
            entity,
            name: name.to_string(),
            scope,
        }
    } else {
        err.into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{SectorName, SubsectorInfo};

    fn catalog(name: &str, milieu: &str, subsectors: &[(&str, &str)]) -> CatalogSector {
        CatalogSector {
            x: -4,
            y: -1,
            milieu: Some(milieu.to_string()),
            abbreviation: None,
            tags: None,
            names: vec![SectorName {
                text: name.to_string(),
                lang: None,
                source: None,
            }],
            subsectors: Some(
                subsectors
                    .iter()
                    .enumerate()
                    .map(|(i, (index, name))| SubsectorInfo {
                        name: name.to_string(),
                        index: index.to_string(),
                        index_number: i as i64,
                    })
                    .collect(),
            ),
            allegiances: None,
            products: None,
            data_file: None,
        }
    }

    #[test]
    fn test_find_or_create_milieu_is_idempotent() {
        let store = Store::open_in_memory().unwrap();
        let (first, created) = find_or_create_milieu(store.connection(), "M1105").unwrap();
        assert!(created);
        let (second, created) = find_or_create_milieu(store.connection(), "M1105").unwrap();
        assert!(!created);
        assert_eq!(first, second);
        assert_eq!(store.count("milieus").unwrap(), 1);
    }

    #[test]
    fn test_create_hierarchy() {
        let mut store = Store::open_in_memory().unwrap();
        let sector = catalog("Spinward Marches", "M1105", &[("A", "Cronor"), ("B", "Jewell")]);

        let hierarchy = create_hierarchy(&mut store, &sector).unwrap();
        assert!(hierarchy.milieu_created);
        assert_eq!(hierarchy.sector.name, "Spinward Marches");
        assert_eq!((hierarchy.sector.x, hierarchy.sector.y), (-4, -1));
        assert_eq!(hierarchy.subsector("B").unwrap().name, "Jewell");
        assert!(matches!(
            hierarchy.subsector("Z"),
            Err(IngestError::SubsectorResolution { .. })
        ));
        assert_eq!(store.count("subsectors").unwrap(), 2);
    }

    #[test]
    fn test_second_sector_reuses_milieu() {
        let mut store = Store::open_in_memory().unwrap();
        let first = create_hierarchy(&mut store, &catalog("Deneb", "M1105", &[])).unwrap();
        let second = create_hierarchy(&mut store, &catalog("Trojan Reach", "M1105", &[])).unwrap();
        assert!(!second.milieu_created);
        assert_eq!(first.milieu.id, second.milieu.id);

        // Same sector name under another milieu is a different sector
        let other = create_hierarchy(&mut store, &catalog("Deneb", "M1900", &[])).unwrap();
        assert_ne!(other.sector.id, first.sector.id);
        assert_eq!(store.count("milieus").unwrap(), 2);
    }

    #[test]
    fn test_repeated_sector_conflicts() {
        let mut store = Store::open_in_memory().unwrap();
        let sector = catalog("Regina-Sector", "M1105", &[("A", "Regina")]);
        create_hierarchy(&mut store, &sector).unwrap();

        let err = create_hierarchy(&mut store, &sector).unwrap_err();
        assert!(matches!(
            err,
            IngestError::HierarchyConflict { entity: "sector", .. }
        ));
        assert!(!err.is_row_local());
        assert_eq!(store.count("sectors").unwrap(), 1);
        assert_eq!(store.count("subsectors").unwrap(), 1);
    }

    #[test]
    fn test_duplicate_subsector_index_rolls_back() {
        let mut store = Store::open_in_memory().unwrap();
        let sector = catalog("Gushemege", "M1105", &[("A", "One"), ("A", "Two")]);

        let err = create_hierarchy(&mut store, &sector).unwrap_err();
        assert!(matches!(
            err,
            IngestError::HierarchyConflict { entity: "subsector", .. }
        ));
        assert_eq!(store.count("sectors").unwrap(), 0);
        assert_eq!(store.count("milieus").unwrap(), 0);
    }
}
