//! Built-in Traveller reference tables for the eight UWP attributes.
//!
//! Descriptions follow the Traveller wiki tables. Ordinal values are not listed
//! here; they are derived from the code with [`ordinal_value`].

use std::fmt;

use super::tables::{
    ATMOSPHERES, GOVERNMENTS, HYDROSPHERES, LAW_LEVELS, POPULATIONS, SIZES, STARPORTS,
    TECH_LEVELS,
};
use super::types::TableSchema;

/// The eight attributes encoded by a UWP, in profile order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ReferenceKind {
    Starport,
    Size,
    Atmosphere,
    Hydrosphere,
    Population,
    Government,
    LawLevel,
    TechLevel,
}

impl ReferenceKind {
    pub const ALL: [ReferenceKind; 8] = [
        ReferenceKind::Starport,
        ReferenceKind::Size,
        ReferenceKind::Atmosphere,
        ReferenceKind::Hydrosphere,
        ReferenceKind::Population,
        ReferenceKind::Government,
        ReferenceKind::LawLevel,
        ReferenceKind::TechLevel,
    ];

    pub fn schema(self) -> &'static TableSchema {
        match self {
            ReferenceKind::Starport => &STARPORTS,
            ReferenceKind::Size => &SIZES,
            ReferenceKind::Atmosphere => &ATMOSPHERES,
            ReferenceKind::Hydrosphere => &HYDROSPHERES,
            ReferenceKind::Population => &POPULATIONS,
            ReferenceKind::Government => &GOVERNMENTS,
            ReferenceKind::LawLevel => &LAW_LEVELS,
            ReferenceKind::TechLevel => &TECH_LEVELS,
        }
    }

    pub fn table_name(self) -> &'static str {
        self.schema().name
    }

    /// Look up a kind by its table name
    pub fn from_table_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.table_name() == name)
    }

    /// Codes that stand for "none" or "unassigned" rather than a magnitude
    pub fn sentinels(self) -> &'static [char] {
        match self {
            ReferenceKind::Starport => &['X', 'Y'],
            ReferenceKind::Government => &['Y', 'Z'],
            _ => &[],
        }
    }

    pub fn seeds(self) -> &'static [ReferenceSeed] {
        match self {
            ReferenceKind::Starport => STARPORT_DATA,
            ReferenceKind::Size => SIZE_DATA,
            ReferenceKind::Atmosphere => ATMOSPHERE_DATA,
            ReferenceKind::Hydrosphere => HYDROSPHERE_DATA,
            ReferenceKind::Population => POPULATION_DATA,
            ReferenceKind::Government => GOVERNMENT_DATA,
            ReferenceKind::LawLevel => LAW_LEVEL_DATA,
            ReferenceKind::TechLevel => TECH_LEVEL_DATA,
        }
    }
}

impl fmt::Display for ReferenceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ReferenceKind::Starport => "Starport",
            ReferenceKind::Size => "Size",
            ReferenceKind::Atmosphere => "Atmosphere",
            ReferenceKind::Hydrosphere => "Hydrosphere",
            ReferenceKind::Population => "Population",
            ReferenceKind::Government => "Government",
            ReferenceKind::LawLevel => "Law level",
            ReferenceKind::TechLevel => "Tech level",
        };
        f.write_str(label)
    }
}

/// Extended-hex digit value (`0-9`, `A-H`, `J-N`, `P-Z`; `I` and `O` are skipped)
pub fn ehex_value(code: char) -> Option<u8> {
    match code {
        '0'..='9' => Some(code as u8 - b'0'),
        'A'..='H' => Some(code as u8 - b'A' + 10),
        'J'..='N' => Some(code as u8 - b'J' + 18),
        'P'..='Z' => Some(code as u8 - b'P' + 23),
        _ => None,
    }
}

/// Ordinal value of a code within a table, `None` for unknown and sentinel codes
pub fn ordinal_value(kind: ReferenceKind, code: char) -> Option<u8> {
    if kind.sentinels().contains(&code) {
        return None;
    }
    ehex_value(code)
}

/// One row of built-in reference data
#[derive(Debug, Clone, Copy)]
pub struct ReferenceSeed {
    pub code: char,
    pub name: Option<&'static str>,
    pub description: &'static str,
}

const fn seed(code: char, description: &'static str) -> ReferenceSeed {
    ReferenceSeed {
        code,
        name: None,
        description,
    }
}

const fn named(code: char, name: &'static str, description: &'static str) -> ReferenceSeed {
    ReferenceSeed {
        code,
        name: Some(name),
        description,
    }
}

// See https://wiki.travellerrpg.com/Starport
pub static STARPORT_DATA: &[ReferenceSeed] = &[
    named('?', "Unknown", "Unknown"),
    named('A', "Class A", "Excellent quality installation. Refined fuel available. Annual maintenance overhaul available. Shipyard capable of constructing starships and non-starships present. Naval base and/or scout base may be present."),
    named('B', "Class B", "Good quality installation. Refined fuel available. Annual maintenance overhaul available. Shipyard capable of constructing non-starships present. Naval base and/or scout base may be present."),
    named('C', "Class C", "Routine quality installation. Only unrefined fuel available. Reasonable repair facilities present. Scout base may be present."),
    named('D', "Class D", "Poor quality installation. Only unrefined fuel available. No repair or shipyard facilities present. Scout base may be present."),
    named('E', "Class E", "Frontier Installation. Essentially a marked spot of bedrock with no fuel, facilities, or bases present."),
    named('X', "Class X", "No starport. No provision is made for any ship landings."),
    named('F', "Spaceport Class F", "Good Quality. Minor damage repairable. Unrefined fuel available."),
    named('G', "Spaceport Class G", "Poor Quality. Superficial repairs possible. Unrefined fuel available."),
    named('H', "Spaceport Class H", "Primitive Quality. No repairs or fuel available."),
    named('Y', "None", "None."),
];

pub static SIZE_DATA: &[ReferenceSeed] = &[
    seed('?', "Unknown"),
    seed('0', "Asteroid/Planetoid Belt."),
    seed('1', "1000 miles (1600 km)."),
    seed('2', "2000 miles (3200 km)."),
    seed('3', "3000 miles (4800 km)."),
    seed('4', "4000 miles (6400 km)."),
    seed('5', "5000 miles (8000 km)."),
    seed('6', "6000 miles (9600 km)."),
    seed('7', "7000 miles (11200 km)."),
    seed('8', "8000 miles (12800 km)."),
    seed('9', "9000 miles (14400 km)."),
    seed('A', "10000 miles (16000 km)."),
    seed('B', "11000 miles (17600 km)."),
    seed('C', "12000 miles (19200 km)."),
    seed('D', "13000 miles (20800 km)."),
    seed('E', "14000 miles (22400 km)."),
    seed('F', "15000 miles (24000 km)."),
];

pub static ATMOSPHERE_DATA: &[ReferenceSeed] = &[
    seed('?', "Unknown"),
    seed('0', "No atmosphere."),
    seed('1', "Trace."),
    seed('2', "Very thin, tainted."),
    seed('3', "Very thin."),
    seed('4', "Thin, tainted."),
    seed('5', "Thin."),
    seed('6', "Standard."),
    seed('7', "Standard, tainted."),
    seed('8', "Dense."),
    seed('9', "Dense, tainted."),
    seed('A', "Exotic."),
    seed('B', "Corrosive."),
    seed('C', "Insidious."),
    seed('D', "Dense, high."),
    seed('E', "Ellipsoid."),
    seed('F', "Thin, low."),
];

pub static HYDROSPHERE_DATA: &[ReferenceSeed] = &[
    seed('?', "Unknown"),
    seed('0', "No water."),
    seed('1', "10% or less water."),
    seed('2', "11-20% water."),
    seed('3', "21-30% water."),
    seed('4', "31-40% water."),
    seed('5', "41-50% water."),
    seed('6', "51-60% water."),
    seed('7', "61-70% water."),
    seed('8', "71-80% water."),
    seed('9', "81-90% water."),
    seed('A', "91-100% water."),
];

pub static POPULATION_DATA: &[ReferenceSeed] = &[
    seed('?', "Unknown"),
    seed('0', "Low population (up to a few dozen)."),
    seed('1', "Tens to hundreds."),
    seed('2', "Hundreds to thousands."),
    seed('3', "Thousands to tens of thousands."),
    seed('4', "Tens of thousands to hundreds of thousands."),
    seed('5', "Hundreds of thousands to millions."),
    seed('6', "Millions to tens of millions."),
    seed('7', "Tens of millions to hundreds of millions."),
    seed('8', "Hundreds of millions to billions."),
    seed('9', "Billions."),
    seed('A', "Tens of billions."),
    seed('B', "Hundreds of billions."),
    seed('C', "Trillions."),
];

pub static GOVERNMENT_DATA: &[ReferenceSeed] = &[
    seed('?', "Unknown."),
    seed('0', "No Government Structure."),
    seed('1', "Company/Corporation."),
    seed('2', "Participating Democracy."),
    seed('3', "Self-Perpetuating Oligarchy."),
    seed('4', "Representative Democracy."),
    seed('5', "Feudal Technocracy."),
    seed('6', "Captive Government / Colony."),
    seed('7', "Balkanization."),
    seed('8', "Civil Service Bureaucracy."),
    seed('9', "Impersonal Bureaucracy."),
    seed('A', "Charismatic Dictator."),
    seed('B', "Non-Charismatic Dictator."),
    seed('C', "Charismatic Oligarchy."),
    seed('D', "Religious Dictatorship."),
    seed('E', "Religious Autocracy."),
    seed('F', "Totalitarian Oligarchy."),
    seed('G', "Small Station or Facility (Aslan)."),
    seed('H', "Split Clan Control (Aslan)."),
    seed('J', "Single On-world Clan Control (Aslan)."),
    seed('K', "Single Multi-world Clan Control (Aslan)."),
    seed('L', "Major Clan Control (Aslan)."),
    seed('M', "Vassal Clan Control (Aslan) or Military Dictatorship / Junta."),
    seed('N', "Major Vassal Clan Control (Aslan)."),
    seed('P', "Small Station or Facility (K'kree)."),
    seed('Q', "Krurruna or Krumanak Rule for Off-world Steppelord (K'kree) or Interim Government."),
    seed('R', "Steppelord On-world Rule (K'kree)."),
    seed('S', "Sept (Hiver) or Slave World."),
    seed('T', "Unsupervised Anarchy (Hiver) or Technologically Elevated Dictator."),
    seed('U', "Supervised Anarchy (Hiver)."),
    seed('V', "Viral Hell."),
    seed('W', "Committee (Hiver)."),
    seed('X', "Droyne Hierarchy (Droyne)."),
    seed('Y', "Unassigned / Undefined."),
    seed('Z', "Unassigned / Undefined."),
];

pub static LAW_LEVEL_DATA: &[ReferenceSeed] = &[
    seed('?', "Unknown"),
    seed('0', "No law."),
    seed('1', "Low law, unrestricted weapons."),
    seed('2', "Some firearm restrictions."),
    seed('3', "Heavy weapon restrictions."),
    seed('4', "Personal concealable weapons banned."),
    seed('5', "No firearms outside home."),
    seed('6', "All firearms banned."),
    seed('7', "All weapons banned."),
    seed('8', "Civilian movement controlled."),
    seed('9', "Extreme social control."),
    seed('A', "Full control of daily life."),
    seed('B', ""),
    seed('C', ""),
    seed('D', ""),
    seed('E', ""),
    seed('F', ""),
    seed('G', ""),
    seed('H', ""),
    seed('I', ""),
    seed('J', ""),
];

pub static TECH_LEVEL_DATA: &[ReferenceSeed] = &[
    named('?', "Unknown", "Unknown technology level."),
    named('0', "Stone Age", "Pre-industrial, no technology."),
    named('1', "Bronze/Iron Age", "Basic metallurgy, sailing ships."),
    named('2', "Renaissance", "Gunpowder, printing, early scientific development."),
    named('3', "Industrial Revolution", "Steam power, railroads, simple factories."),
    named('4', "Late Industrial Age", "Combustion engines, radio, aircraft."),
    named('5', "Early Space Age", "Basic computers, early rockets, satellites."),
    named('6', "Fusion Age", "Nuclear power, early fusion, advanced electronics."),
    named('7', "Interplanetary Age", "Basic space travel, colonization of planets."),
    named('8', "Jump Drive Age", "Basic interstellar travel, jump-1 starships."),
    named('9', "Expanded Star Travel", "Jump-2 technology, advanced shipbuilding."),
    named('A', "Interstellar Society", "Jump-3 technology, high automation."),
    named('B', "Lower Average Imperial", "Jump-4 technology, significant AI and cybernetics."),
    named('C', "Average Imperial", "Jump-5 technology, planetary-scale engineering."),
    named('D', "Above Average Imperial", "Jump-6 technology, advanced artificial intelligence."),
    named('E', "Above Average Imperial", "Highly efficient starships, major genetic engineering."),
    named('F', "Technical Imperial Maximum", "Extremely high technology, nearly self-sufficient systems."),
    named('G', "Robots", "Near-complete automation, and highly efficient energy generation."),
    named('H', "Artificial Intelligence", "Extensive megastructures, and advanced matter manipulation."),
    named('I', "Personal Disintegrators", ""),
    named('J', "", ""),
    named('K', "Plastic Metals", ""),
    named('L', "Magic", "Comprehensible only as technological magic."),
];
