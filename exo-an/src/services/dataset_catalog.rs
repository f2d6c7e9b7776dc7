//! Dataset catalog and pre-cleaned CSV tables
//!
//! The catalog is static. Each entry's table lives at
//! `<datasets_dir>/<id>_clean.csv` and is read on request; nothing is cached.

use serde_json::{Map, Number, Value};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::models::{DatasetEntry, ModelVariant, Observation};

struct CatalogEntry {
    id: &'static str,
    title: &'static str,
    description: &'static str,
    model: ModelVariant,
}

const CATALOG: [CatalogEntry; 3] = [
    CatalogEntry {
        id: "kepler",
        title: "Kepler Objects of Interest",
        description: "KOIs are well vetted, periodic, transit-like events in the Kepler data. \
                      The Kepler Project identifies these objects from the TCE list for \
                      further vetting. Some objects will be flagged as false positives.",
        model: ModelVariant::Kepler,
    },
    CatalogEntry {
        id: "k2",
        title: "K2 Planets and Candidates",
        description: "Planets and planet candidates identified during the K2 extended mission, \
                      including confirmed planets and candidates awaiting follow-up.",
        model: ModelVariant::Kepler,
    },
    CatalogEntry {
        id: "tess",
        title: "TESS Objects of Interest",
        description: "The TESS Project Candidates table contains a list of TESS Objects of \
                      Interest (TOI), consisting primarily of planetary candidates identified \
                      by TESS, but also containing previously known transiting planets and \
                      false positives detected by TESS.",
        model: ModelVariant::Tess,
    },
];

impl CatalogEntry {
    fn to_entry(&self) -> DatasetEntry {
        DatasetEntry {
            id: self.id.to_string(),
            title: self.title.to_string(),
            description: self.description.to_string(),
            img: String::new(),
            model: self.model,
        }
    }
}

/// All catalog entries, in display order
pub fn catalog() -> Vec<DatasetEntry> {
    CATALOG.iter().map(CatalogEntry::to_entry).collect()
}

/// Catalog entry by id (exact match)
pub fn find(id: &str) -> Option<DatasetEntry> {
    CATALOG.iter().find(|e| e.id == id).map(CatalogEntry::to_entry)
}

/// Reads catalog tables from disk
#[derive(Debug, Clone)]
pub struct DatasetStore {
    datasets_dir: PathBuf,
}

impl DatasetStore {
    pub fn new(datasets_dir: impl Into<PathBuf>) -> Self {
        Self {
            datasets_dir: datasets_dir.into(),
        }
    }

    pub fn datasets_dir(&self) -> &Path {
        &self.datasets_dir
    }

    pub fn csv_path(&self, id: &str) -> PathBuf {
        self.datasets_dir.join(format!("{}_clean.csv", id))
    }

    /// Rows of a catalog table in file order, keyed by header
    pub async fn load_rows(&self, id: &str) -> exo_common::Result<Vec<Observation>> {
        let entry = find(id)
            .ok_or_else(|| exo_common::Error::NotFound(format!("Dataset '{}'", id)))?;
        let path = self.csv_path(&entry.id);
        debug!(dataset = %entry.id, path = %path.display(), "Reading dataset table");

        tokio::task::spawn_blocking(move || read_csv(&path))
            .await
            .map_err(|e| exo_common::Error::Internal(format!("Dataset reader failed: {}", e)))?
    }
}

fn read_csv(path: &Path) -> exo_common::Result<Vec<Observation>> {
    let mut reader = csv::Reader::from_path(path).map_err(|e| csv_error(path, e))?;
    let headers = reader.headers().map_err(|e| csv_error(path, e))?.clone();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| csv_error(path, e))?;
        let row: Map<String, Value> = headers
            .iter()
            .zip(record.iter())
            .map(|(header, cell)| (header.to_string(), parse_cell(cell)))
            .collect();
        rows.push(row);
    }
    Ok(rows)
}

fn csv_error(path: &Path, err: csv::Error) -> exo_common::Error {
    match err.into_kind() {
        csv::ErrorKind::Io(e) => exo_common::Error::Io(e),
        kind => exo_common::Error::Internal(format!(
            "Cannot parse {}: {:?}",
            path.display(),
            kind
        )),
    }
}

/// Empty cell → null, integer or finite float → number, else string
pub fn parse_cell(cell: &str) -> Value {
    let trimmed = cell.trim();
    if trimmed.is_empty() {
        return Value::Null;
    }
    if let Ok(i) = trimmed.parse::<i64>() {
        return Value::Number(i.into());
    }
    if let Some(n) = trimmed.parse::<f64>().ok().and_then(Number::from_f64) {
        return Value::Number(n);
    }
    Value::String(cell.to_string())
}
