use std::fmt;

use crate::error::{IngestError, Result};
use crate::schema::ReferenceKind;

/// Number of characters a UWP must have: seven codes, a separator, tech level
pub const UWP_LEN: usize = 9;

/// A decoded Universal World Profile.
///
/// Decoding is purely positional; whether each code means anything is decided
/// later by the reference registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Uwp {
    pub starport: char,
    pub size: char,
    pub atmosphere: char,
    pub hydrosphere: char,
    pub population: char,
    pub government: char,
    pub law_level: char,
    pub tech_level: char,
}

impl Uwp {
    /// Decode a profile string such as `A867A67-9`. Characters past the ninth are ignored.
    pub fn decode(raw: &str) -> Result<Self> {
        let chars: Vec<char> = raw.chars().take(UWP_LEN).collect();
        if chars.len() < UWP_LEN {
            return Err(IngestError::MalformedProfile {
                uwp: raw.to_string(),
                reason: "expected at least 9 characters",
            });
        }

        // chars[7] is the separator
        Ok(Self {
            starport: chars[0],
            size: chars[1],
            atmosphere: chars[2],
            hydrosphere: chars[3],
            population: chars[4],
            government: chars[5],
            law_level: chars[6],
            tech_level: chars[8],
        })
    }

    /// The code for one attribute
    pub fn code(&self, kind: ReferenceKind) -> char {
        match kind {
            ReferenceKind::Starport => self.starport,
            ReferenceKind::Size => self.size,
            ReferenceKind::Atmosphere => self.atmosphere,
            ReferenceKind::Hydrosphere => self.hydrosphere,
            ReferenceKind::Population => self.population,
            ReferenceKind::Government => self.government,
            ReferenceKind::LawLevel => self.law_level,
            ReferenceKind::TechLevel => self.tech_level,
        }
    }

    /// `(kind, code)` pairs in profile order
    pub fn codes(&self) -> impl Iterator<Item = (ReferenceKind, char)> + '_ {
        ReferenceKind::ALL.into_iter().map(move |k| (k, self.code(k)))
    }

    /// Canonical profile string, e.g. `C9C4733-9`
    pub fn profile(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Uwp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}{}{}{}{}{}-{}",
            self.starport,
            self.size,
            self.atmosphere,
            self.hydrosphere,
            self.population,
            self.government,
            self.law_level,
            self.tech_level
        )
    }
}
