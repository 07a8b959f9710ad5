use anyhow::{bail, Result};
use std::time::Instant;
use travellermap_ingest::{
    cli::{Cli, Commands},
    download::OutputLayout,
    logging::init_logging,
    parser::Uwp,
    registry::ReferenceRegistry,
    schema::ReferenceKind,
    sync::{ingest_downloaded, sync, SyncOptions, SyncSummary},
    ConsoleUi,
};

fn main() -> Result<()> {
    let cli = Cli::parse_args();
    init_logging(cli.verbose, cli.log_json);

    match cli.command {
        Commands::Sync {
            url,
            tag,
            output,
            database,
            posters,
            populate,
        } => {
            let start = Instant::now();
            let mut ui = ConsoleUi::new();

            let summary = sync(
                SyncOptions {
                    base_url: url,
                    tag,
                    output,
                    database,
                    posters,
                    populate,
                },
                &mut ui,
            )?;

            ui.finish(&describe(&summary, start));
        }

        Commands::Ingest {
            input_dir,
            database,
        } => {
            let start = Instant::now();
            let mut ui = ConsoleUi::new();

            let layout = OutputLayout::new(Some(input_dir))?;
            let database = database.unwrap_or_else(|| layout.default_database());
            let summary = ingest_downloaded(&layout, &database, &mut ui)?;

            ui.finish(&format!("{} into {:?}", describe(&summary, start), database));
        }

        Commands::Decode { uwp } => {
            let registry = ReferenceRegistry::standard()?;
            let decoded = Uwp::decode(&uwp)?;

            println!("{}", decoded);
            for (kind, code) in decoded.codes() {
                match registry.lookup(kind, code) {
                    Ok(entry) => {
                        let label = match &entry.name {
                            Some(name) if !name.is_empty() => format!("{} - {}", name, entry.description),
                            _ => entry.description.clone(),
                        };
                        println!("  {:<12} {}  {}", kind.to_string(), code, label);
                    }
                    Err(e) => println!("  {:<12} {}  ({})", kind.to_string(), code, e),
                }
            }
        }

        Commands::ListReference { table } => {
            let registry = ReferenceRegistry::standard()?;

            match table {
                None => {
                    println!("Reference tables:\n");
                    for kind in ReferenceKind::ALL {
                        println!(
                            "  {:<14} {} entries",
                            kind.table_name(),
                            registry.entries(kind).len()
                        );
                    }
                }
                Some(name) => {
                    let Some(kind) = ReferenceKind::from_table_name(&name) else {
                        bail!("Unknown reference table: {}", name);
                    };
                    for entry in registry.entries(kind) {
                        let value = entry
                            .value
                            .map(|v| v.to_string())
                            .unwrap_or_else(|| "-".to_string());
                        println!("  {}  {:>3}  {}", entry.code, value, entry.description);
                    }
                }
            }
        }
    }

    Ok(())
}

fn describe(summary: &SyncSummary, start: Instant) -> String {
    format!(
        "Processed {} sectors: {} worlds stored, {} rows skipped, {} sectors failed in {:.1}s",
        summary.sectors,
        summary.worlds,
        summary.skipped_rows,
        summary.failed_sectors,
        start.elapsed().as_secs_f64()
    )
}
