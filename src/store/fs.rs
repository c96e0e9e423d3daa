use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use super::PersistenceStore;
use crate::error::{ToolkitError, ToolkitResult};

/// Directory-backed storage: each key is one `<key>.json` file.
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// File holding `key`. Characters outside `[A-Za-z0-9_-]` become `_`.
    pub fn path_for(&self, key: &str) -> PathBuf {
        let file_name: String = key
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        self.root.join(format!("{file_name}.json"))
    }
}

impl PersistenceStore for FileStore {
    fn read(&self, key: &str) -> ToolkitResult<Option<String>> {
        let path = self.path_for(key);
        match fs::read_to_string(&path) {
            Ok(contents) => Ok(Some(contents)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(ToolkitError::store_unavailable(format!(
                "{}: {}",
                path.display(),
                err
            ))),
        }
    }

    fn write(&mut self, key: &str, value: &str) -> ToolkitResult<()> {
        let path = self.path_for(key);
        let unavailable = |err: std::io::Error| {
            ToolkitError::store_unavailable(format!("{}: {}", path.display(), err))
        };

        fs::create_dir_all(&self.root).map_err(unavailable)?;
        // Written beside the target and renamed into place.
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value).map_err(unavailable)?;
        fs::rename(&tmp, &path).map_err(unavailable)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_key_reads_none() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::new(dir.path());
        assert_eq!(store.read("nothing-here").unwrap(), None);
    }

    #[test]
    fn test_write_creates_directory() {
        let dir = TempDir::new().unwrap();
        let mut store = FileStore::new(dir.path().join("nested").join("store"));

        store.write("mini-production-toolkit-project", "{}").unwrap();
        assert_eq!(
            store.read("mini-production-toolkit-project").unwrap(),
            Some("{}".to_string())
        );
        assert!(store
            .root()
            .join("mini-production-toolkit-project.json")
            .exists());
    }

    #[test]
    fn test_key_is_sanitized() {
        let store = FileStore::new("/tmp/x");
        assert_eq!(
            store.path_for("../evil key"),
            PathBuf::from("/tmp/x/___evil_key.json")
        );
    }

    #[test]
    fn test_unwritable_root_is_store_unavailable() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("file");
        fs::write(&blocker, "not a directory").unwrap();

        let mut store = FileStore::new(&blocker);
        assert!(matches!(
            store.write("k", "v"),
            Err(ToolkitError::StoreUnavailable(_))
        ));
    }
}
