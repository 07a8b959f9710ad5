//! Sector catalog records returned by the Traveller Map API.

use serde::Deserialize;

use crate::error::Result;

/// Response of the sector list endpoint
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SectorList {
    pub sectors: Vec<CatalogSector>,
}

impl SectorList {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Sectors ordered by Manhattan distance from the origin, then by name
    pub fn sorted(mut self) -> Vec<CatalogSector> {
        self.sectors
            .sort_by(|a, b| a.distance().cmp(&b.distance()).then_with(|| a.name().cmp(b.name())));
        self.sectors
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SectorName {
    pub text: String,
    pub lang: Option<String>,
    pub source: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SubsectorInfo {
    pub name: String,
    /// Grid letter `A`-`P`
    pub index: String,
    pub index_number: i64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Allegiance {
    pub name: Option<String>,
    pub code: Option<String>,
    pub base: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Product {
    pub author: Option<String>,
    pub title: Option<String>,
    pub publisher: Option<String>,
    #[serde(rename = "Ref")]
    pub reference: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DataFile {
    pub source: Option<String>,
    pub milieu: Option<String>,
}

/// One sector, either from the sector list or from its metadata document
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CatalogSector {
    pub x: i32,
    pub y: i32,
    pub milieu: Option<String>,
    pub abbreviation: Option<String>,
    pub tags: Option<String>,
    pub names: Vec<SectorName>,
    pub subsectors: Option<Vec<SubsectorInfo>>,
    pub allegiances: Option<Vec<Allegiance>>,
    pub products: Option<Vec<Product>>,
    pub data_file: Option<DataFile>,
}

impl CatalogSector {
    /// Parse a sector metadata document. The metadata endpoint does not echo
    /// the milieu, so the one the sector was requested under is applied.
    pub fn from_metadata(json: &str, milieu: Option<&str>) -> Result<Self> {
        let mut sector: CatalogSector = serde_json::from_str(json)?;
        if let Some(milieu) = milieu {
            sector.milieu = Some(milieu.to_string());
        }
        Ok(sector)
    }

    /// Primary name (the first listed)
    pub fn name(&self) -> &str {
        self.names.first().map(|n| n.text.as_str()).unwrap_or("")
    }

    pub fn milieu(&self) -> &str {
        self.milieu.as_deref().unwrap_or("")
    }

    pub fn subsectors(&self) -> &[SubsectorInfo] {
        self.subsectors.as_deref().unwrap_or(&[])
    }

    pub fn distance(&self) -> i64 {
        i64::from(self.x).abs() + i64::from(self.y).abs()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LIST: &str = r#"{"Sectors":[
        {"X":-4,"Y":-1,"Milieu":"M1105","Abbreviation":"Spin","Tags":"OTU","Names":[{"Text":"Spinward Marches"}]},
        {"X":0,"Y":0,"Milieu":"M1105","Tags":"OTU Official","Names":[{"Text":"Core","Lang":"en"}]},
        {"X":1,"Y":0,"Milieu":"M1105","Tags":"OTU","Names":[{"Text":"Antares"}]},
        {"X":0,"Y":-1,"Milieu":"M1105","Tags":"OTU","Names":[{"Text":"Ilelish"}]}
    ]}"#;

    #[test]
    fn test_sector_list_sorted_by_distance_then_name() {
        let sectors = SectorList::from_json(LIST).unwrap().sorted();
        let names: Vec<_> = sectors.iter().map(|s| s.name()).collect();
        assert_eq!(names, ["Core", "Antares", "Ilelish", "Spinward Marches"]);
    }

    #[test]
    fn test_metadata_gets_requested_milieu() {
        let json = r#"{
            "X": -4, "Y": -1, "Tags": "OTU",
            "Names": [{"Text": "Spinward Marches", "Lang": "en"}],
            "Subsectors": [
                {"Name": "Cronor", "Index": "A", "IndexNumber": 0},
                {"Name": "Jewell", "Index": "B", "IndexNumber": 1}
            ],
            "Allegiances": [{"Name": "Third Imperium", "Code": "ImDd", "Base": "Im"}],
            "Products": [{"Title": "Spinward Marches", "Ref": "https://example.invalid"}],
            "DataFile": {"Source": "Traveller Map"},
            "Stylesheet": "ignored"
        }"#;
        let sector = CatalogSector::from_metadata(json, Some("M1105")).unwrap();
        assert_eq!(sector.milieu(), "M1105");
        assert_eq!(sector.name(), "Spinward Marches");
        assert_eq!(sector.subsectors().len(), 2);
        assert_eq!(sector.subsectors()[1].index, "B");
        assert_eq!(sector.subsectors()[1].index_number, 1);
        let products = sector.products.as_ref().unwrap();
        assert_eq!(products[0].reference.as_deref(), Some("https://example.invalid"));
    }

    #[test]
    fn test_missing_subsectors_is_empty() {
        let json = r#"{"X": 3, "Y": 2, "Names": [{"Text": "Nowhere"}]}"#;
        let sector = CatalogSector::from_metadata(json, None).unwrap();
        assert!(sector.subsectors().is_empty());
        assert_eq!(sector.milieu(), "");
    }

    #[test]
    fn test_invalid_json_is_catalog_error() {
        let err = SectorList::from_json("{\"Sectors\": 3}").unwrap_err();
        assert!(matches!(err, crate::error::IngestError::Catalog(_)));
    }
}
