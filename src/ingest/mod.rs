//! Normalizes one sector's catalog record and world rows into the store.

pub mod hierarchy;
pub mod worlds;

pub use hierarchy::*;
pub use worlds::*;

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::error::Result;
use crate::parser::CatalogSector;
use crate::registry::ReferenceRegistry;
use crate::writer::Store;

/// Create the sector's hierarchy, then ingest its tab-delimited world file
pub fn populate_sector(
    store: &mut Store,
    registry: &ReferenceRegistry,
    sector: &CatalogSector,
    tsv_path: &Path,
) -> Result<IngestReport> {
    let hierarchy = create_hierarchy(store, sector)?;
    let reader = BufReader::new(File::open(tsv_path)?);
    WorldIngestor::new(store, registry, &hierarchy).ingest(reader)
}
