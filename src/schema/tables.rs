//! Table schema definitions for the sector catalog database

use super::types::*;

// =============================================================================
// Reference tables
// =============================================================================

const REFERENCE_COLUMNS: &[Column] = &[
    Column::required("code", ColumnType::Text).primary(),
    Column::new("value", ColumnType::Integer),
    Column::new("name", ColumnType::Text),
    Column::required("description", ColumnType::Text),
];

macro_rules! reference_table {
    ($ident:ident, $name:expr) => {
        pub static $ident: TableSchema = TableSchema {
            name: $name,
            columns: REFERENCE_COLUMNS,
            foreign_keys: &[],
            unique: &[],
        };
    };
}

reference_table!(STARPORTS, "starports");
reference_table!(SIZES, "sizes");
reference_table!(ATMOSPHERES, "atmospheres");
reference_table!(HYDROSPHERES, "hydrospheres");
reference_table!(POPULATIONS, "populations");
reference_table!(GOVERNMENTS, "governments");
reference_table!(LAW_LEVELS, "law_levels");
reference_table!(TECH_LEVELS, "tech_levels");

// =============================================================================
// Hierarchy
// =============================================================================

pub static MILIEUS: TableSchema = TableSchema {
    name: "milieus",
    columns: &[
        Column::required("id", ColumnType::Integer).primary(),
        Column::required("name", ColumnType::Text),
        Column::new("description", ColumnType::Text),
    ],
    foreign_keys: &[],
    unique: &[&["name"]],
};

pub static SECTORS: TableSchema = TableSchema {
    name: "sectors",
    columns: &[
        Column::required("id", ColumnType::Integer).primary(),
        Column::required("name", ColumnType::Text),
        Column::required("x", ColumnType::Integer),
        Column::required("y", ColumnType::Integer),
        Column::required("milieu_id", ColumnType::Integer),
    ],
    foreign_keys: &[ForeignKey::new("milieu_id", "milieus")],
    unique: &[&["name", "milieu_id"]],
};

pub static SUBSECTORS: TableSchema = TableSchema {
    name: "subsectors",
    columns: &[
        Column::required("id", ColumnType::Integer).primary(),
        Column::required("name", ColumnType::Text),
        Column::required("subsector_index", ColumnType::Text),
        Column::new("index_number", ColumnType::Integer),
        Column::required("sector_id", ColumnType::Integer),
    ],
    foreign_keys: &[ForeignKey::new("sector_id", "sectors").cascade()],
    unique: &[&["sector_id", "subsector_index"]],
};

pub static WORLDS: TableSchema = TableSchema {
    name: "worlds",
    columns: &[
        Column::required("id", ColumnType::Integer).primary(),
        Column::required("name", ColumnType::Text),
        Column::required("subsector_id", ColumnType::Integer),
        Column::required("hex_location", ColumnType::Text),
        Column::required("starport", ColumnType::Text),
        Column::required("size", ColumnType::Text),
        Column::required("atmosphere", ColumnType::Text),
        Column::required("hydrosphere", ColumnType::Text),
        Column::required("population", ColumnType::Text),
        Column::required("government", ColumnType::Text),
        Column::required("law_level", ColumnType::Text),
        Column::required("tech_level", ColumnType::Text),
        Column::new("trade_codes", ColumnType::Text),
        Column::required("zone", ColumnType::Text),
        Column::required("bases", ColumnType::Text),
    ],
    foreign_keys: &[
        ForeignKey::new("subsector_id", "subsectors").cascade(),
        ForeignKey::new("starport", "starports").to("code"),
        ForeignKey::new("size", "sizes").to("code"),
        ForeignKey::new("atmosphere", "atmospheres").to("code"),
        ForeignKey::new("hydrosphere", "hydrospheres").to("code"),
        ForeignKey::new("population", "populations").to("code"),
        ForeignKey::new("government", "governments").to("code"),
        ForeignKey::new("law_level", "law_levels").to("code"),
        ForeignKey::new("tech_level", "tech_levels").to("code"),
    ],
    unique: &[&["subsector_id", "hex_location"]],
};

/// All table schemas
pub static ALL_TABLES: &[&TableSchema] = &[
    &MILIEUS,
    &SECTORS,
    &SUBSECTORS,
    &WORLDS,
    &STARPORTS,
    &SIZES,
    &ATMOSPHERES,
    &HYDROSPHERES,
    &POPULATIONS,
    &GOVERNMENTS,
    &LAW_LEVELS,
    &TECH_LEVELS,
];

/// Get table schema by name
pub fn get_table(name: &str) -> Option<&'static TableSchema> {
    ALL_TABLES.iter().find(|t| t.name == name).copied()
}

/// Get all table names
pub fn table_names() -> Vec<&'static str> {
    ALL_TABLES.iter().map(|t| t.name).collect()
}
