pub mod cli;
pub mod download;
pub mod error;
pub mod ingest;
pub mod logging;
pub mod model;
pub mod parser;
pub mod registry;
pub mod schema;
pub mod sync;
pub mod ui;
pub mod writer;

pub use cli::{Cli, Commands};
pub use error::IngestError;
pub use registry::{ReferenceEntry, ReferenceRegistry};
pub use ui::{ConsoleUi, Phase, SilentUi, Ui};
