use rusqlite::{params, Connection, Row};
use std::path::Path;
use tracing::{debug, info};

use super::schema_gen::{generate_create_table, generate_indexes};
use crate::error::{IngestError, Result};
use crate::model::World;
use crate::parser::Uwp;
use crate::registry::ReferenceRegistry;
use crate::schema::{DependencyResolver, ReferenceKind};

/// The relational store the pipeline writes into
pub struct Store {
    conn: Connection,
}

impl Store {
    /// Create a fresh database at `db_path`, replacing any existing file
    pub fn create(db_path: &Path) -> Result<Self> {
        // Remove existing database if present
        if db_path.exists() {
            std::fs::remove_file(db_path)?;
        }
        if let Some(parent) = db_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(db_path)?;
        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous = NORMAL;",
        )?;
        info!(path = %db_path.display(), "created database");

        Self::init(conn)
    }

    /// An empty in-memory database with all tables created
    pub fn open_in_memory() -> Result<Self> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self> {
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        let store = Self { conn };
        store.create_tables()?;
        Ok(store)
    }

    /// Create all tables, parents before children
    fn create_tables(&self) -> Result<()> {
        let tables = DependencyResolver::new()
            .creation_order()
            .map_err(IngestError::Schema)?;
        debug!(count = tables.len(), "creating tables");

        for schema in tables {
            self.conn.execute(&generate_create_table(schema), [])?;

            for index_sql in generate_indexes(schema) {
                self.conn.execute(&index_sql, [])?;
            }
        }

        Ok(())
    }

    /// Write every registry table into the store in one transaction.
    ///
    /// Seeding happens once; a table that already holds rows is an error.
    pub fn seed_registry(&mut self, registry: &ReferenceRegistry) -> Result<usize> {
        let tx = self.conn.transaction()?;
        let mut count = 0;

        for kind in ReferenceKind::ALL {
            let table = kind.table_name();
            let existing: i64 =
                tx.query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |r| r.get(0))?;
            if existing > 0 {
                return Err(IngestError::RegistryAlreadySeeded { table });
            }

            let mut stmt = tx.prepare_cached(&format!(
                "INSERT INTO {} (code, value, name, description) VALUES (?1, ?2, ?3, ?4)",
                table
            ))?;
            for entry in registry.entries(kind) {
                stmt.execute(params![
                    entry.code.to_string(),
                    entry.value,
                    entry.name,
                    entry.description
                ])?;
                count += 1;
            }
        }

        tx.commit()?;
        info!(entries = count, "seeded reference tables");
        Ok(count)
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    pub(crate) fn connection_mut(&mut self) -> &mut Connection {
        &mut self.conn
    }

    /// The first profile code with no row in its reference table, if any
    pub fn missing_reference(&self, uwp: &Uwp) -> Result<Option<(ReferenceKind, char)>> {
        for (kind, code) in uwp.codes() {
            let present: bool = self.conn.query_row(
                &format!("SELECT EXISTS(SELECT 1 FROM {} WHERE code = ?1)", kind.table_name()),
                [code.to_string()],
                |r| r.get(0),
            )?;
            if !present {
                return Ok(Some((kind, code)));
            }
        }
        Ok(None)
    }

    /// Number of rows in a table
    pub fn count(&self, table: &str) -> Result<u64> {
        let n: i64 = self
            .conn
            .query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |r| r.get(0))?;
        Ok(n as u64)
    }

    /// All worlds of a sector, ordered by subsector index then hex
    pub fn worlds_in_sector(&self, sector_id: i64) -> Result<Vec<World>> {
        let mut stmt = self.conn.prepare(
            "SELECT w.id, w.name, w.subsector_id, w.hex_location,
                    w.starport, w.size, w.atmosphere, w.hydrosphere,
                    w.population, w.government, w.law_level, w.tech_level,
                    w.trade_codes, w.zone, w.bases
             FROM worlds w
             JOIN subsectors s ON s.id = w.subsector_id
             WHERE s.sector_id = ?1
             ORDER BY s.subsector_index, w.hex_location",
        )?;
        let worlds = stmt
            .query_map([sector_id], read_world)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(worlds)
    }

    /// Delete a sector; its subsectors and their worlds go with it
    pub fn delete_sector(&mut self, sector_id: i64) -> Result<bool> {
        let deleted = self
            .conn
            .execute("DELETE FROM sectors WHERE id = ?1", [sector_id])?;
        Ok(deleted > 0)
    }

    pub fn finalize(self) -> Result<()> {
        self.conn.execute_batch("PRAGMA optimize;")?;
        Ok(())
    }
}

fn read_world(row: &Row) -> rusqlite::Result<World> {
    Ok(World {
        id: row.get(0)?,
        name: row.get(1)?,
        subsector_id: row.get(2)?,
        hex_location: row.get(3)?,
        uwp: Uwp {
            starport: code_at(row, 4)?,
            size: code_at(row, 5)?,
            atmosphere: code_at(row, 6)?,
            hydrosphere: code_at(row, 7)?,
            population: code_at(row, 8)?,
            government: code_at(row, 9)?,
            law_level: code_at(row, 10)?,
            tech_level: code_at(row, 11)?,
        },
        trade_codes: row.get(12)?,
        zone: row.get(13)?,
        bases: row.get(14)?,
    })
}

fn code_at(row: &Row, idx: usize) -> rusqlite::Result<char> {
    let text: String = row.get(idx)?;
    text.chars().next().ok_or_else(|| {
        rusqlite::Error::InvalidColumnType(idx, "code".to_string(), rusqlite::types::Type::Text)
    })
}
