use super::{OffenceTable, OffenceTableError};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::{Arc, PoisonError, RwLock};
use tracing::{info, warn};

/// Supplier of complete offence tables (a local file, or a remote mapping
/// service behind the same seam).
pub trait OffenceSource: Send + Sync {
    fn describe(&self) -> String;
    fn fetch(&self) -> Result<OffenceTable, OffenceTableError>;
}

/// Reads the reference table from a CSV file on every fetch.
#[derive(Debug, Clone)]
pub struct FileOffenceSource {
    path: PathBuf,
}

impl FileOffenceSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl OffenceSource for FileOffenceSource {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    fn fetch(&self) -> Result<OffenceTable, OffenceTableError> {
        OffenceTable::from_path(&self.path)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ReloadSummary {
    pub generation: u64,
    pub offences: usize,
}

/// Process-wide holder of the active offence table. Readers take an `Arc`
/// to one generation; reloads replace the pointer, never the contents.
#[derive(Debug, Default)]
pub struct OffenceRegistry {
    active: RwLock<Arc<OffenceTable>>,
}

impl OffenceRegistry {
    pub fn new(table: OffenceTable) -> Self {
        let registry = Self::default();
        registry.install(table);
        registry
    }

    pub fn snapshot(&self) -> Arc<OffenceTable> {
        self.active
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Swaps in a fully built table and returns the installed snapshot.
    pub fn install(&self, mut table: OffenceTable) -> Arc<OffenceTable> {
        let mut guard = self.active.write().unwrap_or_else(PoisonError::into_inner);
        table.set_generation(guard.generation() + 1);
        let installed = Arc::new(table);
        *guard = installed.clone();
        installed
    }

    /// Fetches a new table and installs it. On failure the active table is
    /// left untouched.
    pub fn reload<S>(&self, source: &S) -> Result<ReloadSummary, OffenceTableError>
    where
        S: OffenceSource + ?Sized,
    {
        let table = match source.fetch() {
            Ok(table) => table,
            Err(err) => {
                warn!(
                    source = %source.describe(),
                    active_generation = self.snapshot().generation(),
                    error = %err,
                    "offence table reload rejected"
                );
                return Err(err);
            }
        };

        let installed = self.install(table);
        let summary = ReloadSummary {
            generation: installed.generation(),
            offences: installed.len(),
        };
        info!(
            source = %source.describe(),
            generation = summary.generation,
            offences = summary.offences,
            "offence table reloaded"
        );
        Ok(summary)
    }
}
