use std::sync::{Arc, OnceLock};

use super::error::DataError;
use super::loader::{load_dataset, CsvDirectory, ObservationSource};
use super::model::Dataset;
use crate::config::DashboardConfig;

// ---------------------------------------------------------------------------
// Load-once cache
// ---------------------------------------------------------------------------

/// Holds the unified dataset after the first successful load.
///
/// Sources are read at most once per cache. A failed load stores nothing, so
/// the error surfaces again on the next call. Source changes after the load
/// are not observed.
pub struct DatasetCache<S> {
    source: S,
    dataset: OnceLock<Arc<Dataset>>,
}

impl<S: ObservationSource> DatasetCache<S> {
    pub fn new(source: S) -> Self {
        DatasetCache {
            source,
            dataset: OnceLock::new(),
        }
    }

    /// Return the cached dataset, loading it on first use.
    pub fn get(&self) -> Result<Arc<Dataset>, DataError> {
        if let Some(dataset) = self.dataset.get() {
            log::debug!("Dataset cache hit ({} rows)", dataset.len());
            return Ok(Arc::clone(dataset));
        }
        let loaded = Arc::new(load_dataset(&self.source)?);
        Ok(Arc::clone(self.dataset.get_or_init(|| loaded)))
    }

    /// Whether a dataset has been loaded into this cache.
    pub fn is_loaded(&self) -> bool {
        self.dataset.get().is_some()
    }

    pub fn source(&self) -> &S {
        &self.source
    }
}

// ---------------------------------------------------------------------------
// Process-wide instance
// ---------------------------------------------------------------------------

static PROCESS_CACHE: OnceLock<DatasetCache<CsvDirectory>> = OnceLock::new();

/// Load the unified dataset from `config.data_dir`, once per process.
///
/// The data directory of the first call wins; later calls return the cached
/// table without touching the filesystem.
pub fn load(config: &DashboardConfig) -> Result<Arc<Dataset>, DataError> {
    PROCESS_CACHE
        .get_or_init(|| DatasetCache::new(CsvDirectory::new(&config.data_dir)))
        .get()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::Country;
    use std::io::Read;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingSource {
        opens: AtomicUsize,
    }

    impl ObservationSource for CountingSource {
        fn open(&self, country: Country) -> Result<Box<dyn Read + '_>, DataError> {
            self.opens.fetch_add(1, Ordering::SeqCst);
            let body = match country {
                Country::Benin => "Timestamp,GHI,DNI,DHI,RH\n2023-01-01,1,2,3,4\n",
                _ => "Timestamp,GHI,DNI,DHI,RH\n",
            };
            Ok(Box::new(body.as_bytes()))
        }
    }

    #[test]
    fn second_get_does_not_reopen_sources() {
        let cache = DatasetCache::new(CountingSource {
            opens: AtomicUsize::new(0),
        });
        assert!(!cache.is_loaded());

        let first = cache.get().unwrap();
        let second = cache.get().unwrap();

        assert!(cache.is_loaded());
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(first.len(), 1);
        assert_eq!(cache.source().opens.load(Ordering::SeqCst), Country::ALL.len());
    }
}
