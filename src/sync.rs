//! Top-level flows: download the catalog (optionally populating the
//! database as sectors arrive), or populate from an earlier download.

use anyhow::{Context, Result};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};

use crate::download::{OutputLayout, TravellerMapClient, POSTER_SCALES, POSTER_STYLES};
use crate::ingest::populate_sector;
use crate::parser::{CatalogSector, SectorList};
use crate::registry::ReferenceRegistry;
use crate::ui::{Phase, Ui};
use crate::writer::Store;

#[derive(Debug, Clone)]
pub struct SyncOptions {
    pub base_url: String,
    pub tag: String,
    pub output: Option<PathBuf>,
    pub database: Option<PathBuf>,
    pub posters: bool,
    pub populate: bool,
}

/// Run totals. A sector counts toward `sectors` when it completed and toward
/// `failed_sectors` when it was abandoned, never both.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SyncSummary {
    pub sectors: usize,
    pub worlds: u64,
    pub skipped_rows: usize,
    pub failed_sectors: usize,
}

/// A seeded store plus the registry it was seeded from
struct Populator {
    store: Store,
    registry: ReferenceRegistry,
}

impl Populator {
    /// Fresh database with the standard reference tables. Any failure here
    /// aborts the run.
    fn create(database: &Path) -> Result<Self> {
        let mut store = Store::create(database)
            .with_context(|| format!("Failed to create database {:?}", database))?;
        let registry = ReferenceRegistry::standard().context("Invalid reference data")?;
        store
            .seed_registry(&registry)
            .context("Failed to seed reference tables")?;
        Ok(Self { store, registry })
    }

    /// Populate one sector, returning false when it was abandoned. Sector-level
    /// failures are logged; the run moves on to the next sector.
    fn populate(
        &mut self,
        sector: &CatalogSector,
        tsv_path: &Path,
        summary: &mut SyncSummary,
    ) -> bool {
        match populate_sector(&mut self.store, &self.registry, sector, tsv_path) {
            Ok(report) => {
                summary.worlds += report.committed;
                summary.skipped_rows += report.skipped.len();
                true
            }
            Err(e) => {
                error!(
                    sector = sector.name(),
                    milieu = sector.milieu(),
                    error = %e,
                    "sector ingestion aborted"
                );
                false
            }
        }
    }

    fn finish(self) -> Result<()> {
        self.store.finalize().context("Failed to finalize database")
    }
}

/// Download the sector list and every sector's files, populating the
/// database along the way when requested
pub fn sync(options: SyncOptions, ui: &mut impl Ui) -> Result<SyncSummary> {
    let layout = OutputLayout::new(options.output)?;
    let client = TravellerMapClient::new(&options.base_url)?;

    let mut populator = if options.populate {
        let database = options
            .database
            .unwrap_or_else(|| layout.default_database());
        Some(Populator::create(&database)?)
    } else {
        None
    };

    ui.set_phase(Phase::FetchingCatalog);
    let list_json = client.fetch_sector_list(&options.tag)?;
    fs::write(layout.sectors_json(), &list_json).context("Failed to write sector list")?;
    let sectors = SectorList::from_json(&list_json)
        .context("Failed to parse sector list")?
        .sorted();
    info!(count = sectors.len(), tag = %options.tag, "fetched sector list");

    ui.set_phase(Phase::Downloading);
    let total = sectors.len() as u64;
    let mut summary = SyncSummary::default();

    for (i, listed) in sectors.iter().enumerate() {
        let (name, milieu) = (listed.name(), listed.milieu());
        ui.set_progress(
            i as u64,
            total,
            format!("sector {}, milieu {}, at {},{}", name, milieu, listed.x, listed.y),
        );
        layout.ensure_sector_dir(name, milieu)?;

        let text = client.fetch_sector_text(name, milieu)?;
        fs::write(layout.text_path(name, milieu), text)?;

        let metadata_json = client.fetch_metadata(name, milieu)?;
        fs::write(layout.metadata_path(name, milieu), &metadata_json)?;

        let tsv = client.fetch_tab_delimited(name, milieu)?;
        if tsv.is_empty() {
            debug!(sector = name, milieu, "no world data");
            summary.sectors += 1;
            continue;
        }
        let tsv_path = layout.tsv_path(name, milieu);
        fs::write(&tsv_path, tsv)?;

        if options.posters {
            download_posters(&client, &layout, name, milieu)?;
        }

        if let Some(populator) = populator.as_mut() {
            let populated = match CatalogSector::from_metadata(&metadata_json, Some(milieu)) {
                Ok(sector) => populator.populate(&sector, &tsv_path, &mut summary),
                Err(e) => {
                    unusable_metadata(ui, name, milieu, &e);
                    false
                }
            };
            if !populated {
                summary.failed_sectors += 1;
                continue;
            }
        }
        summary.sectors += 1;
    }

    if let Some(populator) = populator {
        populator.finish()?;
    }
    ui.set_progress(total, total, "done");
    ui.set_phase(Phase::Complete);

    Ok(summary)
}

fn unusable_metadata(ui: &mut impl Ui, sector: &str, milieu: &str, error: &dyn fmt::Display) {
    warn!(sector, milieu, error = %error, "unusable sector metadata");
    ui.log(format!("skipping {} ({}): unusable metadata", sector, milieu));
}

fn download_posters(
    client: &TravellerMapClient,
    layout: &OutputLayout,
    sector: &str,
    milieu: &str,
) -> Result<()> {
    for style in POSTER_STYLES {
        for &scale in POSTER_SCALES {
            let path = layout.poster_path(sector, milieu, style, scale);
            if path.exists() {
                continue;
            }
            let pdf = client.fetch_poster(sector, milieu, style, scale)?;
            fs::write(&path, pdf).with_context(|| format!("Failed to write {:?}", path))?;
        }
    }
    Ok(())
}

/// Populate a fresh database from a previously downloaded output directory
pub fn ingest_downloaded(
    layout: &OutputLayout,
    database: &Path,
    ui: &mut impl Ui,
) -> Result<SyncSummary> {
    let list_path = layout.sectors_json();
    let list_json = fs::read_to_string(&list_path)
        .with_context(|| format!("Failed to read {:?}", list_path))?;
    let sectors = SectorList::from_json(&list_json)
        .context("Failed to parse sector list")?
        .sorted();

    let mut populator = Populator::create(database)?;
    ui.set_phase(Phase::Ingesting);
    let total = sectors.len() as u64;
    let mut summary = SyncSummary::default();

    for (i, listed) in sectors.iter().enumerate() {
        let (name, milieu) = (listed.name(), listed.milieu());
        ui.set_progress(i as u64, total, format!("sector {}, milieu {}", name, milieu));

        let tsv_path = layout.tsv_path(name, milieu);
        if !tsv_path.exists() {
            debug!(sector = name, milieu, "no world data on disk");
            continue;
        }

        let metadata_path = layout.metadata_path(name, milieu);
        let sector = match fs::read_to_string(&metadata_path)
            .map_err(anyhow::Error::from)
            .and_then(|json| Ok(CatalogSector::from_metadata(&json, Some(milieu))?))
        {
            Ok(sector) => sector,
            Err(e) => {
                unusable_metadata(ui, name, milieu, &e);
                summary.failed_sectors += 1;
                continue;
            }
        };

        if populator.populate(&sector, &tsv_path, &mut summary) {
            summary.sectors += 1;
        } else {
            summary.failed_sectors += 1;
        }
    }

    populator.finish()?;
    ui.set_progress(total, total, "done");
    ui.set_phase(Phase::Complete);

    Ok(summary)
}
