use thiserror::Error;

/// Errors raised by the ingestion pipeline.
///
/// Row-local variants (see [`IngestError::is_row_local`]) only ever cost the
/// row that produced them; everything else aborts the current sector.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("malformed world profile {uwp:?}: {reason}")]
    MalformedProfile { uwp: String, reason: &'static str },

    #[error("no entry in {table} for code {code:?}")]
    ReferenceLookup { table: &'static str, code: char },

    #[error("subsector index {index:?} is not part of sector {sector}")]
    SubsectorResolution { sector: String, index: String },

    #[error("row is missing required column {column}")]
    MissingColumn { column: &'static str },

    #[error("a world already occupies hex {hex} in subsector {subsector}")]
    DuplicateWorld { subsector: String, hex: String },

    #[error("{entity} {name:?} already exists in {scope}")]
    HierarchyConflict {
        entity: &'static str,
        name: String,
        scope: String,
    },

    #[error("reference table {table} is already seeded")]
    RegistryAlreadySeeded { table: &'static str },

    #[error("duplicate code {code:?} in reference table {table}")]
    DuplicateReferenceCode { table: &'static str, code: char },

    #[error("invalid schema: {0}")]
    Schema(String),

    #[error("invalid catalog data")]
    Catalog(#[from] serde_json::Error),

    #[error(transparent)]
    Database(#[from] rusqlite::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl IngestError {
    /// True for failures that skip a single world row without aborting the sector
    pub fn is_row_local(&self) -> bool {
        matches!(
            self,
            IngestError::MalformedProfile { .. }
                | IngestError::ReferenceLookup { .. }
                | IngestError::SubsectorResolution { .. }
                | IngestError::MissingColumn { .. }
                | IngestError::DuplicateWorld { .. }
        )
    }
}

pub type Result<T, E = IngestError> = std::result::Result<T, E>;

/// True when a rusqlite error is a UNIQUE (or primary key) constraint failure
pub(crate) fn is_unique_violation(err: &rusqlite::Error) -> bool {
    match err {
        rusqlite::Error::SqliteFailure(e, _) => {
            e.code == rusqlite::ErrorCode::ConstraintViolation
                && (e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
                    || e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_PRIMARYKEY)
        }
        _ => false,
    }
}

/// True when a rusqlite error is a FOREIGN KEY constraint failure
pub(crate) fn is_foreign_key_violation(err: &rusqlite::Error) -> bool {
    match err {
        rusqlite::Error::SqliteFailure(e, _) => {
            e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_FOREIGNKEY
        }
        _ => false,
    }
}
