//! Rows of the catalog hierarchy as read from and written to the store.

use crate::parser::Uwp;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Milieu {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sector {
    pub id: i64,
    pub name: String,
    pub x: i32,
    pub y: i32,
    pub milieu_id: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subsector {
    pub id: i64,
    pub name: String,
    /// Grid letter `A`-`P`
    pub index: String,
    pub sector_id: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct World {
    pub id: i64,
    pub name: String,
    pub subsector_id: i64,
    pub hex_location: String,
    pub uwp: Uwp,
    pub trade_codes: Option<String>,
    pub zone: String,
    pub bases: String,
}

impl World {
    /// Profile string rebuilt from the stored reference codes
    pub fn profile(&self) -> String {
        self.uwp.profile()
    }
}
