use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::download::DEFAULT_BASE_URL;

#[derive(Parser, Debug)]
#[command(name = "travellermap-ingest")]
#[command(version, about = "Download the Traveller Map sector catalog and load it into SQLite")]
pub struct Cli {
    /// Increase log verbosity (-v warnings, -vv info, -vvv debug, -vvvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Download sector files, optionally posters, and optionally populate the database
    Sync {
        /// Traveller Map data URL
        #[arg(long, default_value = DEFAULT_BASE_URL)]
        url: String,

        /// Sector list tag
        #[arg(long, default_value = "OTU")]
        tag: String,

        /// Output directory (defaults to the user cache directory)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// SQLite database path (defaults to <output>/travellermap.db)
        #[arg(long)]
        database: Option<PathBuf>,

        /// Download posters as PDF files
        #[arg(short = 'p', long)]
        posters: bool,

        /// Populate the database with world data
        #[arg(short = 'd', long)]
        populate: bool,
    },

    /// Populate a fresh database from a previously downloaded output directory
    Ingest {
        /// Directory written by `sync`
        input_dir: PathBuf,

        /// SQLite database path (defaults to <input_dir>/travellermap.db)
        #[arg(long)]
        database: Option<PathBuf>,
    },

    /// Decode a UWP and describe each attribute
    Decode {
        /// Universal World Profile, e.g. A867A67-9
        uwp: String,
    },

    /// List reference tables, or the entries of one table
    ListReference {
        /// Table name (e.g. starports)
        table: Option<String>,
    },
}

impl Cli {
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
