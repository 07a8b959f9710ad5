use rusqlite::params;
use std::fmt;
use std::io::BufRead;
use tracing::{debug, info, warn};

use super::hierarchy::SectorHierarchy;
use crate::error::{is_foreign_key_violation, is_unique_violation, IngestError, Result};
use crate::model::World;
use crate::parser::{TabReader, TabRow, Uwp};
use crate::registry::ReferenceRegistry;
use crate::writer::Store;

/// Where a world row was when it failed.
///
/// A row moves `Decoding -> ReferenceResolution -> Insertion` and is either
/// committed or skipped; it never goes back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowStage {
    Decoding,
    ReferenceResolution,
    Insertion,
}

impl fmt::Display for RowStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RowStage::Decoding => write!(f, "decoding"),
            RowStage::ReferenceResolution => write!(f, "reference resolution"),
            RowStage::Insertion => write!(f, "insertion"),
        }
    }
}

/// A row that was rolled back
#[derive(Debug)]
pub struct SkippedRow {
    pub line: usize,
    pub name: Option<String>,
    pub subsector: Option<String>,
    pub uwp: Option<String>,
    pub stage: RowStage,
    pub error: IngestError,
}

/// Outcome of ingesting one sector's rows
#[derive(Debug, Default)]
pub struct IngestReport {
    pub committed: u64,
    pub skipped: Vec<SkippedRow>,
}

struct RowFailure {
    stage: RowStage,
    error: IngestError,
}

fn at(stage: RowStage) -> impl Fn(IngestError) -> RowFailure {
    move |error| RowFailure { stage, error }
}

/// Inserts worlds into an already-created sector hierarchy, one transaction per row
pub struct WorldIngestor<'a> {
    store: &'a mut Store,
    registry: &'a ReferenceRegistry,
    hierarchy: &'a SectorHierarchy,
}

impl<'a> WorldIngestor<'a> {
    pub fn new(
        store: &'a mut Store,
        registry: &'a ReferenceRegistry,
        hierarchy: &'a SectorHierarchy,
    ) -> Self {
        Self {
            store,
            registry,
            hierarchy,
        }
    }

    /// Ingest every row of a tab-delimited source.
    ///
    /// Row-local failures are logged and recorded in the report; anything else
    /// (I/O, database errors) stops the sector. Rows committed before the
    /// failure stay committed.
    pub fn ingest<R: BufRead>(&mut self, reader: R) -> Result<IngestReport> {
        let mut report = IngestReport::default();

        for row in TabReader::new(reader)? {
            let row = row?;
            match self.ingest_row(&row) {
                Ok(world) => {
                    debug!(world = %world.name, hex = %world.hex_location, uwp = %world.profile(), "committed world");
                    report.committed += 1;
                }
                Err(failure) if failure.error.is_row_local() => {
                    let skipped = SkippedRow {
                        line: row.line,
                        name: row.get("Name").map(str::to_string),
                        subsector: row.get("SS").map(str::to_string),
                        uwp: row.get("UWP").map(str::to_string),
                        stage: failure.stage,
                        error: failure.error,
                    };
                    warn!(
                        sector = %self.hierarchy.sector.name,
                        milieu = %self.hierarchy.milieu.name,
                        subsector = skipped.subsector.as_deref().unwrap_or(""),
                        world = skipped.name.as_deref().unwrap_or(""),
                        uwp = skipped.uwp.as_deref().unwrap_or(""),
                        line = skipped.line,
                        stage = %skipped.stage,
                        error = %skipped.error,
                        "skipped world row"
                    );
                    report.skipped.push(skipped);
                }
                Err(failure) => return Err(failure.error),
            }
        }

        info!(
            sector = %self.hierarchy.sector.name,
            milieu = %self.hierarchy.milieu.name,
            committed = report.committed,
            skipped = report.skipped.len(),
            "ingested worlds"
        );
        Ok(report)
    }

    fn ingest_row(&mut self, row: &TabRow) -> std::result::Result<World, RowFailure> {
        // Decoding
        let decoding = at(RowStage::Decoding);
        let name = row.required("Name").map_err(&decoding)?;
        let index = row.required("SS").map_err(&decoding)?;
        let hex = row.required("Hex").map_err(&decoding)?;
        let uwp = Uwp::decode(row.required("UWP").map_err(&decoding)?).map_err(&decoding)?;

        // Reference resolution
        let resolving = at(RowStage::ReferenceResolution);
        for (kind, code) in uwp.codes() {
            self.registry.lookup(kind, code).map_err(&resolving)?;
        }
        let subsector = self.hierarchy.subsector(index).map_err(&resolving)?;

        // Insertion
        let inserting = at(RowStage::Insertion);
        let trade_codes = row.get("Remarks").filter(|r| !r.trim().is_empty());
        let zone = row.optional("Zone");
        let bases = row.optional("Bases");

        let inserted =
            insert_world(self.store, subsector.id, name, hex, &uwp, trade_codes, zone, bases);
        let id = match inserted {
            Ok(id) => id,
            Err(e) if is_unique_violation(&e) => {
                return Err(inserting(IngestError::DuplicateWorld {
                    subsector: subsector.name.clone(),
                    hex: hex.to_string(),
                }))
            }
            Err(e) if is_foreign_key_violation(&e) => {
                // The store's reference tables need not match the registry
                let missing = self.store.missing_reference(&uwp).map_err(&inserting)?;
                return Err(match missing {
                    Some((kind, code)) => resolving(IngestError::ReferenceLookup {
                        table: kind.table_name(),
                        code,
                    }),
                    None => inserting(e.into()),
                });
            }
            Err(e) => return Err(inserting(e.into())),
        };

        Ok(World {
            id,
            name: name.to_string(),
            subsector_id: subsector.id,
            hex_location: hex.to_string(),
            uwp,
            trade_codes: trade_codes.map(str::to_string),
            zone: zone.to_string(),
            bases: bases.to_string(),
        })
    }
}

/// Insert and commit a single world; the transaction rolls back on any error
#[allow(clippy::too_many_arguments)]
fn insert_world(
    store: &mut Store,
    subsector_id: i64,
    name: &str,
    hex: &str,
    uwp: &Uwp,
    trade_codes: Option<&str>,
    zone: &str,
    bases: &str,
) -> rusqlite::Result<i64> {
    let tx = store.connection_mut().transaction()?;
    tx.execute(
        "INSERT INTO worlds (
            name, subsector_id, hex_location,
            starport, size, atmosphere, hydrosphere,
            population, government, law_level, tech_level,
            trade_codes, zone, bases
         ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)",
        params![
            name,
            subsector_id,
            hex,
            uwp.starport.to_string(),
            uwp.size.to_string(),
            uwp.atmosphere.to_string(),
            uwp.hydrosphere.to_string(),
            uwp.population.to_string(),
            uwp.government.to_string(),
            uwp.law_level.to_string(),
            uwp.tech_level.to_string(),
            trade_codes,
            zone,
            bases,
        ],
    )?;
    let id = tx.last_insert_rowid();
    tx.commit()?;
    Ok(id)
}
