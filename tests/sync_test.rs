//! `sync` runs against a local catalog server.
//!
//! The server answers the same endpoints as Traveller Map from canned
//! responses and records every request it sees, so tests can check what was
//! fetched and in which order.

use reqwest::Url;
use rusqlite::Connection;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use tempfile::TempDir;
use tiny_http::{Response, Server};

use travellermap_ingest::download::{OutputLayout, POSTER_SCALES, POSTER_STYLES};
use travellermap_ingest::sync::{sync, SyncOptions};
use travellermap_ingest::{Phase, SilentUi};

const MILIEU: &str = "M1105";

const TSV_HEADER: &str = "Sector\tSS\tHex\tName\tUWP\tBases\tRemarks\tZone\n";

// =============================================================================
// Fixture server
// =============================================================================

/// Canned catalog: the sector list plus per-sector responses
#[derive(Default)]
struct Catalog {
    listed: Vec<String>,
    responses: HashMap<String, Vec<u8>>,
}

impl Catalog {
    /// List a sector and serve its metadata and tab-delimited data
    fn sector(mut self, name: &str, x: i32, y: i32, metadata: &str, tsv: &str) -> Self {
        self.listed.push(format!(
            r#"{{"X": {x}, "Y": {y}, "Milieu": "{MILIEU}", "Names": [{{"Text": "{name}"}}]}}"#
        ));
        self.responses
            .insert(format!("text:{name}"), format!("# {name}\n").into_bytes());
        self.responses
            .insert(format!("metadata:{name}"), metadata.as_bytes().to_vec());
        self.responses
            .insert(format!("tsv:{name}"), tsv.as_bytes().to_vec());
        self
    }

    /// A sector with one subsector `A` and one world in it
    fn populated(self, name: &str, x: i32, y: i32) -> Self {
        let tsv = format!("{TSV_HEADER}{name}\tA\t0101\t{name} Prime\tA867A67-9\t\t\tG\n");
        self.sector(name, x, y, &metadata(name, x, y), &tsv)
    }

    fn serve(mut self) -> CatalogServer {
        let list = format!(r#"{{"Sectors": [{}]}}"#, self.listed.join(","));
        self.responses.insert("list".to_string(), list.into_bytes());

        let server = Arc::new(Server::http("127.0.0.1:0").expect("Failed to bind fixture server"));
        let port = server
            .server_addr()
            .to_ip()
            .expect("TCP listener")
            .port();
        let requests = Arc::new(Mutex::new(Vec::new()));

        let handle = {
            let server = Arc::clone(&server);
            let requests = Arc::clone(&requests);
            let responses = self.responses;
            thread::spawn(move || {
                for request in server.incoming_requests() {
                    let key = route_key(request.url());
                    requests.lock().unwrap().push(key.clone());
                    let response = match responses.get(&key) {
                        Some(body) => Response::from_data(body.clone()),
                        None if key.starts_with("poster:") => {
                            Response::from_data(b"%PDF-1.4".to_vec())
                        }
                        None => Response::from_data(Vec::new()).with_status_code(404),
                    };
                    let _ = request.respond(response);
                }
            })
        };

        CatalogServer {
            base_url: format!("http://127.0.0.1:{port}/data"),
            requests,
            server,
            handle: Some(handle),
        }
    }
}

struct CatalogServer {
    base_url: String,
    requests: Arc<Mutex<Vec<String>>>,
    server: Arc<Server>,
    handle: Option<JoinHandle<()>>,
}

impl CatalogServer {
    fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }

    /// Requested keys with the given prefix, prefix stripped
    fn requested(&self, prefix: &str) -> Vec<String> {
        self.requests()
            .iter()
            .filter_map(|key| key.strip_prefix(prefix).map(str::to_string))
            .collect()
    }
}

impl Drop for CatalogServer {
    fn drop(&mut self) {
        self.server.unblock();
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

/// Map a request onto the key its canned response is stored under
fn route_key(raw: &str) -> String {
    let url = Url::parse(&format!("http://fixture{raw}")).unwrap();
    let query: HashMap<String, String> = url.query_pairs().into_owned().collect();
    let param = |name: &str| query.get(name).cloned().unwrap_or_default();
    let segments: Vec<&str> = url.path_segments().map(|s| s.collect()).unwrap_or_default();

    match segments.as_slice() {
        ["data"] => "list".to_string(),
        ["data", "sec"] if param("type") == "TabDelimited" => format!("tsv:{}", param("sector")),
        ["data", "sec"] => format!("text:{}", param("sector")),
        ["data", sector, "metadata"] => format!("metadata:{sector}"),
        ["data", sector, "image"] => {
            format!("poster:{sector}:{}:{}", param("style"), param("scale"))
        }
        _ => format!("unknown:{raw}"),
    }
}

fn metadata(name: &str, x: i32, y: i32) -> String {
    format!(
        r#"{{"X": {x}, "Y": {y}, "Names": [{{"Text": "{name}"}}],
            "Subsectors": [{{"Name": "{name} A", "Index": "A", "IndexNumber": 0}}]}}"#
    )
}

// =============================================================================
// Helpers
// =============================================================================

struct Workspace {
    dir: TempDir,
}

impl Workspace {
    fn new() -> Self {
        Self {
            dir: tempfile::tempdir().expect("Failed to create temp dir"),
        }
    }

    fn output(&self) -> std::path::PathBuf {
        self.dir.path().join("out")
    }

    fn database(&self) -> std::path::PathBuf {
        self.dir.path().join("catalog.db")
    }

    fn layout(&self) -> OutputLayout {
        OutputLayout::new(Some(self.output())).unwrap()
    }

    fn options(&self, server: &CatalogServer, posters: bool, populate: bool) -> SyncOptions {
        SyncOptions {
            base_url: server.base_url.clone(),
            tag: "OTU".to_string(),
            output: Some(self.output()),
            database: Some(self.database()),
            posters,
            populate,
        }
    }
}

fn sector_names(db: &Path) -> Vec<String> {
    let conn = Connection::open(db).unwrap();
    let mut stmt = conn.prepare("SELECT name FROM sectors ORDER BY id").unwrap();
    let names = stmt
        .query_map([], |r| r.get(0))
        .unwrap()
        .collect::<rusqlite::Result<Vec<String>>>()
        .unwrap();
    names
}

// =============================================================================
// Tests
// =============================================================================

#[test]
fn test_sectors_processed_by_distance_then_name() {
    let ws = Workspace::new();
    let server = Catalog::default()
        .populated("Far", 5, -5)
        .populated("Beta", 1, 0)
        .populated("Alpha", 0, -1)
        .populated("Origin", 0, 0)
        .serve();

    let mut ui = SilentUi::new();
    let summary = sync(ws.options(&server, false, true), &mut ui).unwrap();

    assert_eq!(server.requested("metadata:"), ["Origin", "Alpha", "Beta", "Far"]);
    assert_eq!(sector_names(&ws.database()), ["Origin", "Alpha", "Beta", "Far"]);
    assert_eq!(summary.sectors, 4);
    assert_eq!(summary.worlds, 4);
    assert_eq!(summary.failed_sectors, 0);
    assert_eq!(
        ui.phases,
        [Phase::FetchingCatalog, Phase::Downloading, Phase::Complete]
    );
    assert!(ws.layout().sectors_json().exists());
}

#[test]
fn test_empty_world_data_skips_posters_and_population() {
    let ws = Workspace::new();
    let server = Catalog::default()
        .populated("Alpha", 0, 0)
        .sector("Void", 1, 0, &metadata("Void", 1, 0), "")
        .serve();

    let mut ui = SilentUi::new();
    let summary = sync(ws.options(&server, true, true), &mut ui).unwrap();

    let layout = ws.layout();
    assert!(layout.tsv_path("Alpha", MILIEU).exists());
    assert!(!layout.tsv_path("Void", MILIEU).exists());
    assert!(layout.text_path("Void", MILIEU).exists());
    assert!(layout.metadata_path("Void", MILIEU).exists());

    let posters = server.requested("poster:");
    assert_eq!(posters.len(), POSTER_STYLES.len() * POSTER_SCALES.len());
    assert!(posters.iter().all(|p| p.starts_with("Alpha:")));

    assert_eq!(sector_names(&ws.database()), ["Alpha"]);
    assert_eq!(summary.sectors, 2);
    assert_eq!(summary.worlds, 1);
}

#[test]
fn test_posters_on_disk_are_not_fetched_again() {
    let ws = Workspace::new();
    let layout = ws.layout();
    layout.ensure_sector_dir("Alpha", MILIEU).unwrap();
    let existing = layout.poster_path("Alpha", MILIEU, "poster", 64);
    fs::write(&existing, b"kept").unwrap();

    let server = Catalog::default().populated("Alpha", 0, 0).serve();
    let mut ui = SilentUi::new();
    sync(ws.options(&server, true, false), &mut ui).unwrap();

    let posters = server.requested("poster:");
    assert_eq!(posters.len(), POSTER_STYLES.len() * POSTER_SCALES.len() - 1);
    assert!(!posters.contains(&"Alpha:poster:64".to_string()));
    assert_eq!(fs::read(&existing).unwrap(), b"kept");
    assert!(layout.poster_path("Alpha", MILIEU, "atlas", 128).exists());
    assert!(!ws.database().exists());
}

#[test]
fn test_bad_metadata_fails_only_that_sector() {
    let ws = Workspace::new();
    let tsv = format!("{TSV_HEADER}Alpha\tA\t0101\tLost\tA867A67-9\t\t\tG\n");
    let server = Catalog::default()
        .sector("Alpha", 0, 0, "{ broken", &tsv)
        .populated("Beta", 1, 0)
        .serve();

    let mut ui = SilentUi::new();
    let summary = sync(ws.options(&server, false, true), &mut ui).unwrap();

    assert_eq!(summary.sectors, 1);
    assert_eq!(summary.failed_sectors, 1);
    assert_eq!(summary.worlds, 1);
    assert_eq!(ui.messages.len(), 1);
    assert!(ui.messages[0].contains("Alpha"));
    assert_eq!(sector_names(&ws.database()), ["Beta"]);

    // What was downloaded for the failed sector stays on disk
    let layout = ws.layout();
    assert_eq!(
        fs::read_to_string(layout.metadata_path("Alpha", MILIEU)).unwrap(),
        "{ broken"
    );
    assert!(layout.tsv_path("Alpha", MILIEU).exists());
}

#[test]
fn test_bad_metadata_does_not_matter_when_only_downloading() {
    let ws = Workspace::new();
    let tsv = format!("{TSV_HEADER}Alpha\tA\t0101\tLost\tA867A67-9\t\t\tG\n");
    let server = Catalog::default()
        .sector("Alpha", 0, 0, "{ broken", &tsv)
        .populated("Beta", 1, 0)
        .serve();

    let mut ui = SilentUi::new();
    let summary = sync(ws.options(&server, false, false), &mut ui).unwrap();

    assert_eq!(summary.sectors, 2);
    assert_eq!(summary.failed_sectors, 0);
    assert!(ui.messages.is_empty());
    assert!(ws.layout().tsv_path("Beta", MILIEU).exists());
}

#[test]
fn test_hierarchy_conflict_counts_as_failed_sector() {
    let ws = Workspace::new();
    // Listed twice under the same milieu; the second creation conflicts
    let server = Catalog::default()
        .populated("Alpha", 0, 0)
        .populated("Alpha", 3, 3)
        .serve();

    let mut ui = SilentUi::new();
    let summary = sync(ws.options(&server, false, true), &mut ui).unwrap();

    assert_eq!(summary.sectors, 1);
    assert_eq!(summary.failed_sectors, 1);
    assert_eq!(summary.worlds, 1);
    assert_eq!(sector_names(&ws.database()), ["Alpha"]);
    assert_eq!(server.requests()[0], "list");
}
