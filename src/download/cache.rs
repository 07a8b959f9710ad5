use anyhow::{Context, Result};
use directories::ProjectDirs;
use std::fs;
use std::path::PathBuf;

/// On-disk layout of downloaded artifacts:
///
/// ```text
/// <root>/sectors.json
/// <root>/<sector>/<milieu>/<sector>.txt|.json|.tsv
/// <root>/<sector>/<milieu>/<sector> <style> <scale>.pdf
/// ```
pub struct OutputLayout {
    root: PathBuf,
}

impl OutputLayout {
    pub fn new(custom_dir: Option<PathBuf>) -> Result<Self> {
        let root = match custom_dir {
            Some(dir) => dir,
            None => {
                let proj_dirs = ProjectDirs::from("", "", "travellermap-ingest")
                    .context("Could not determine cache directory")?;
                proj_dirs.cache_dir().to_path_buf()
            }
        };

        fs::create_dir_all(&root)
            .with_context(|| format!("Failed to create output directory {:?}", root))?;

        Ok(Self { root })
    }

    pub fn sectors_json(&self) -> PathBuf {
        self.root.join("sectors.json")
    }

    /// Default database location inside the output directory
    pub fn default_database(&self) -> PathBuf {
        self.root.join("travellermap.db")
    }

    pub fn sector_dir(&self, sector: &str, milieu: &str) -> PathBuf {
        self.root.join(sector).join(milieu)
    }

    /// Create and return the sector's directory
    pub fn ensure_sector_dir(&self, sector: &str, milieu: &str) -> Result<PathBuf> {
        let dir = self.sector_dir(sector, milieu);
        fs::create_dir_all(&dir).with_context(|| format!("Failed to create {:?}", dir))?;
        Ok(dir)
    }

    pub fn text_path(&self, sector: &str, milieu: &str) -> PathBuf {
        self.sector_dir(sector, milieu).join(format!("{}.txt", sector))
    }

    pub fn metadata_path(&self, sector: &str, milieu: &str) -> PathBuf {
        self.sector_dir(sector, milieu).join(format!("{}.json", sector))
    }

    pub fn tsv_path(&self, sector: &str, milieu: &str) -> PathBuf {
        self.sector_dir(sector, milieu).join(format!("{}.tsv", sector))
    }

    pub fn poster_path(&self, sector: &str, milieu: &str, style: &str, scale: u32) -> PathBuf {
        self.sector_dir(sector, milieu)
            .join(format!("{} {} {}.pdf", sector, style, scale))
    }
}
