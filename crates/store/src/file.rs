use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::{RecordStore, Result, StoreError};

/// Record store backed by a plain text file, one record per line.
///
/// Appends go straight to the end of the file. Full rewrites are written to a
/// sibling temporary file that is then renamed over the original, so a crash
/// mid-write leaves the previous snapshot intact.
#[derive(Debug, Clone)]
pub struct FileRecordStore {
    path: PathBuf,
}

impl FileRecordStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self.path.file_name().unwrap_or_default().to_os_string();
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    fn ensure_parent(&self) -> Result<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(|e| StoreError::io(parent, e))?;
        }
        Ok(())
    }
}

impl RecordStore for FileRecordStore {
    fn location(&self) -> String {
        self.path.display().to_string()
    }

    fn read_lines(&self) -> Result<Vec<String>> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(StoreError::io(&self.path, e)),
        };
        // Lossy decoding keeps one corrupted line from hiding the rest.
        Ok(String::from_utf8_lossy(&bytes)
            .lines()
            .map(str::to_string)
            .collect())
    }

    fn append_line(&self, line: &str) -> Result<()> {
        self.ensure_parent()?;
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| StoreError::io(&self.path, e))?;

        let mut record = String::with_capacity(line.len() + 1);
        record.push_str(line);
        record.push('\n');
        file.write_all(record.as_bytes())
            .and_then(|()| file.sync_data())
            .map_err(|e| StoreError::io(&self.path, e))?;

        debug!(path = %self.path.display(), "record appended");
        Ok(())
    }

    fn replace_all(&self, lines: &[String]) -> Result<()> {
        self.ensure_parent()?;
        let temp = self.temp_path();

        let mut contents = String::new();
        for line in lines {
            contents.push_str(line);
            contents.push('\n');
        }

        let mut file = File::create(&temp).map_err(|e| StoreError::io(&temp, e))?;
        file.write_all(contents.as_bytes())
            .and_then(|()| file.sync_all())
            .map_err(|e| StoreError::io(&temp, e))?;
        drop(file);

        fs::rename(&temp, &self.path).map_err(|e| StoreError::io(&self.path, e))?;

        debug!(path = %self.path.display(), records = lines.len(), "snapshot rewritten");
        Ok(())
    }
}

/// Locations of the three store files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorePaths {
    pub catalog: PathBuf,
    pub inventory: PathBuf,
    pub ledger: PathBuf,
}

impl StorePaths {
    pub const CATALOG_FILE: &'static str = "cafe_menu.txt";
    pub const INVENTORY_FILE: &'static str = "cafe_inventory.txt";
    pub const LEDGER_FILE: &'static str = "cafe_orders.txt";

    /// The default file names inside `dir`.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            catalog: dir.join(Self::CATALOG_FILE),
            inventory: dir.join(Self::INVENTORY_FILE),
            ledger: dir.join(Self::LEDGER_FILE),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_reads_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileRecordStore::new(dir.path().join("absent.txt"));
        assert!(store.read_lines().unwrap().is_empty());
        assert!(!store.exists());
    }

    #[test]
    fn append_creates_file_and_parent() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileRecordStore::new(dir.path().join("nested/ledger.txt"));

        store.append_line("one").unwrap();
        store.append_line("two").unwrap();

        assert_eq!(store.read_lines().unwrap(), vec!["one", "two"]);
        assert_eq!(fs::read_to_string(store.path()).unwrap(), "one\ntwo\n");
    }

    #[test]
    fn replace_all_rewrites_and_cleans_up_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileRecordStore::new(dir.path().join("inventory.txt"));
        store.append_line("stale").unwrap();

        store
            .replace_all(&["Coffee,3".to_string(), "Tea,4".to_string()])
            .unwrap();

        assert_eq!(store.read_lines().unwrap(), vec!["Coffee,3", "Tea,4"]);
        assert!(!store.temp_path().exists());
    }

    #[test]
    fn invalid_utf8_does_not_hide_other_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("menu.txt");
        fs::write(&path, b"Coffee,50\n\xff\xfe,1\nTea,30\n").unwrap();

        let lines = FileRecordStore::new(&path).read_lines().unwrap();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "Coffee,50");
        assert_eq!(lines[2], "Tea,30");
    }

    #[test]
    fn paths_in_dir_use_default_names() {
        let paths = StorePaths::in_dir("/data");
        assert_eq!(paths.catalog, PathBuf::from("/data/cafe_menu.txt"));
        assert_eq!(paths.inventory, PathBuf::from("/data/cafe_inventory.txt"));
        assert_eq!(paths.ledger, PathBuf::from("/data/cafe_orders.txt"));
    }
}
