use std::collections::HashMap;
use std::sync::Arc;

use sha2::{Digest, Sha256};

use super::loader::{load_file, SourceFile};
use super::model::RecordSet;
use crate::error::ParseError;

// ---------------------------------------------------------------------------
// Load memoization
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    digest: String,
    /// The same bytes parse differently as CSV.
    csv: bool,
    sheet: Option<String>,
}

impl CacheKey {
    fn new(file: &SourceFile, sheet: Option<&str>) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(&file.bytes);
        let csv = file.is_csv();
        CacheKey {
            digest: format!("{:x}", hasher.finalize()),
            csv,
            // CSV has no worksheets
            sheet: if csv { None } else { sheet.map(str::to_owned) },
        }
    }
}

/// Loaded record sets keyed by file content and sheet. Entries are never
/// modified once inserted; failed loads are not stored.
#[derive(Debug, Default)]
pub struct LoadCache {
    entries: HashMap<CacheKey, Arc<RecordSet>>,
}

impl LoadCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_or_load(&mut self, file: &SourceFile, sheet: Option<&str>) -> Result<Arc<RecordSet>, ParseError> {
        let key = CacheKey::new(file, sheet);
        if let Some(hit) = self.entries.get(&key) {
            log::debug!("load cache hit for '{}'", file.name);
            return Ok(Arc::clone(hit));
        }

        let records = Arc::new(load_file(file, sheet)?);
        log::info!(
            "loaded '{}': {} rows, {} columns",
            file.name,
            records.len(),
            records.columns().len()
        );
        self.entries.insert(key, Arc::clone(&records));
        Ok(records)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn csv_file(name: &str, body: &str) -> SourceFile {
        SourceFile::new(name, body.as_bytes().to_vec())
    }

    #[test]
    fn identical_content_is_loaded_once() {
        let mut cache = LoadCache::new();
        let a = cache.get_or_load(&csv_file("a.csv", "x,y\n1,2\n"), None).unwrap();
        let b = cache.get_or_load(&csv_file("renamed.csv", "x,y\n1,2\n"), None).unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(cache.len(), 1);

        let c = cache.get_or_load(&csv_file("a.csv", "x,y\n1,3\n"), None).unwrap();
        assert!(!Arc::ptr_eq(&a, &c));
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn sheet_name_is_ignored_for_csv() {
        let mut cache = LoadCache::new();
        let file = csv_file("run.csv", "x,y\n1,2\n");
        let first = cache.get_or_load(&file, None).unwrap();
        let named = cache.get_or_load(&file, Some("record")).unwrap();
        assert!(Arc::ptr_eq(&first, &named));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn failures_are_not_cached() {
        let mut cache = LoadCache::new();
        let broken = SourceFile::new("broken.xlsx", b"nope".to_vec());
        assert!(cache.get_or_load(&broken, None).is_err());
        assert!(cache.is_empty());
    }
}
