// Dead code detection breaks here, because the integration test crates all use a disjoint set of
// the helpers.
#![allow(dead_code)]

use std::{
    fs, io,
    path::{Path, PathBuf},
    sync::{
        Arc, Mutex,
        atomic::{AtomicUsize, Ordering},
    },
};

use libdoccov::{DocCovError, DocCoverage, ModuleLoader, ModuleTable, Result};
use tempfile::TempDir;

/// A loader serving a single in-memory module table, counting its loads.
///
/// The table sits behind a shared handle so tests can change the "module"
/// between computations.
#[derive(Clone)]
pub struct FakeLoader {
    table: Arc<Mutex<Option<ModuleTable>>>,
    loads: Arc<AtomicUsize>,
}

impl FakeLoader {
    pub fn new(table: ModuleTable) -> Self {
        Self {
            table: Arc::new(Mutex::new(Some(table))),
            loads: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// A loader for which every module is unavailable.
    pub fn unavailable() -> Self {
        Self {
            table: Arc::new(Mutex::new(None)),
            loads: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn replace(&self, table: ModuleTable) {
        *self.table.lock().unwrap() = Some(table);
    }

    pub fn loads(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }
}

impl ModuleLoader for FakeLoader {
    fn load(&self, name: &str) -> Result<ModuleTable> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        self.table
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| DocCovError::ModuleUnavailable(name.to_string()))
    }
}

/// Builds a module table named `app` defining each of `names`.
pub fn module(names: &[&str]) -> ModuleTable {
    names
        .iter()
        .fold(ModuleTable::new("app"), |table, name| table.with_local(name))
}

/// Writes `body` to a Markdown file inside `dir`.
pub fn write_docs(dir: &TempDir, body: &str) -> PathBuf {
    let path = dir.path().join("app.md");
    fs::write(&path, body).unwrap();
    path
}

/// An analysis of `table` against Markdown documentation `body`.
pub fn analysis(dir: &TempDir, table: ModuleTable, body: &str) -> (DocCoverage, FakeLoader) {
    let loader = FakeLoader::new(table);
    let analysis = DocCoverage::new("app")
        .with_loader(loader.clone())
        .with_doc_from(write_docs(dir, body));
    (analysis, loader)
}

/// Lays out a throwaway library package named `dummy_crate` with `source` as
/// its `lib.rs`.
pub fn write_crate(source: &str) -> TempDir {
    let temp_dir = TempDir::new().unwrap();
    let src = temp_dir.path().join("src");
    fs::create_dir(&src).unwrap();
    fs::write(src.join("lib.rs"), source).unwrap();
    fs::write(
        temp_dir.path().join("Cargo.toml"),
        r#"
            [package]
            name = "dummy_crate"
            version = "0.1.0"
            edition = "2021"
        "#,
    )
    .unwrap();
    temp_dir
}

/// Prebuilt rustdoc JSON for a small crate named `app`.
pub fn fixture_json() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join("app.json")
}

/// An in-memory sink for formatted log events.
#[derive(Clone, Default)]
pub struct LogCapture(Arc<Mutex<Vec<u8>>>);

impl LogCapture {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl io::Write for LogCapture {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Runs `f` with a subscriber recording events, returning its result and the log.
pub fn with_captured_logs<T>(f: impl FnOnce() -> T) -> (T, String) {
    let capture = LogCapture::default();
    let writer = capture.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(move || writer.clone())
        .with_ansi(false)
        .finish();
    let result = tracing::subscriber::with_default(subscriber, f);
    (result, capture.contents())
}
