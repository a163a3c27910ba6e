// Storage module: everything that touches the two JSON documents on disk.
// - `InventoryBackend` is the seam between the in-memory inventory and its
//   durable copy. `JsonFileBackend` is the real one, `MemoryBackend` keeps
//   the document in memory for tests and embedding.
// - `CredentialStore` reads the login document fresh on every check.

use crate::error::{InventoryError, Result};
use crate::model::{CredentialDocument, InventoryDocument};
use serde::Serialize;
use std::cell::{Cell, RefCell};
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::debug;

/// Durable home of the inventory document.
///
/// Implementations must treat the document as a single unit: `save`
/// replaces the whole stored copy or nothing at all.
pub trait InventoryBackend {
    /// Read the full document.
    fn load(&self) -> Result<InventoryDocument>;

    /// Replace the stored document with `doc`.
    fn save(&self, doc: &InventoryDocument) -> Result<()>;
}

/// Inventory stored as a pretty-printed JSON file.
#[derive(Debug, Clone)]
pub struct JsonFileBackend {
    path: PathBuf,
}

impl JsonFileBackend {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        JsonFileBackend { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Directory the temporary file is created in, so the final rename
    /// never crosses filesystems.
    fn parent_dir(&self) -> &Path {
        match self.path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => Path::new("."),
        }
    }
}

impl InventoryBackend for JsonFileBackend {
    fn load(&self) -> Result<InventoryDocument> {
        let contents =
            std::fs::read(&self.path).map_err(|e| InventoryError::io(&self.path, e))?;
        let doc: InventoryDocument =
            serde_json::from_slice(&contents).map_err(|e| InventoryError::parse(&self.path, e))?;
        debug!(
            path = %self.path.display(),
            categories = doc.categories.len(),
            products = doc.products.len(),
            "loaded inventory"
        );
        Ok(doc)
    }

    fn save(&self, doc: &InventoryDocument) -> Result<()> {
        let bytes = to_pretty_json(doc).map_err(|e| InventoryError::io(&self.path, e.into()))?;

        // Write next to the target, then rename over it.
        let mut tmp = NamedTempFile::new_in(self.parent_dir())
            .map_err(|e| InventoryError::io(&self.path, e))?;
        tmp.write_all(&bytes)
            .and_then(|_| tmp.as_file().sync_all())
            .map_err(|e| InventoryError::io(&self.path, e))?;
        tmp.persist(&self.path)
            .map_err(|e| InventoryError::io(&self.path, e.error))?;

        debug!(path = %self.path.display(), bytes = bytes.len(), "saved inventory");
        Ok(())
    }
}

/// Serialize with 4-space indentation, keys in struct declaration order.
pub fn to_pretty_json(doc: &InventoryDocument) -> serde_json::Result<Vec<u8>> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    doc.serialize(&mut ser)?;
    Ok(buf)
}

/// In-memory backend. `saves()` counts successful writes and
/// `fail_writes(true)` makes every following `save` fail.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    doc: RefCell<InventoryDocument>,
    saves: Cell<usize>,
    failing: Cell<bool>,
}

impl MemoryBackend {
    pub fn new(doc: InventoryDocument) -> Self {
        MemoryBackend {
            doc: RefCell::new(doc),
            ..Default::default()
        }
    }

    /// The last successfully saved document.
    pub fn stored(&self) -> InventoryDocument {
        self.doc.borrow().clone()
    }

    pub fn saves(&self) -> usize {
        self.saves.get()
    }

    pub fn fail_writes(&self, fail: bool) {
        self.failing.set(fail);
    }
}

impl InventoryBackend for MemoryBackend {
    fn load(&self) -> Result<InventoryDocument> {
        Ok(self.doc.borrow().clone())
    }

    fn save(&self, doc: &InventoryDocument) -> Result<()> {
        if self.failing.get() {
            return Err(InventoryError::io(
                "<memory>",
                std::io::Error::new(std::io::ErrorKind::Other, "write refused"),
            ));
        }
        *self.doc.borrow_mut() = doc.clone();
        self.saves.set(self.saves.get() + 1);
        Ok(())
    }
}

/// Read-only access to the credential document.
#[derive(Debug, Clone)]
pub struct CredentialStore {
    path: PathBuf,
}

impl CredentialStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        CredentialStore { path: path.into() }
    }

    /// Returns true iff the document holds exactly this username and
    /// password (case-sensitive). The file is re-read on every call.
    pub fn authenticate(&self, username: &str, password: &str) -> Result<bool> {
        let contents =
            std::fs::read(&self.path).map_err(|e| InventoryError::io(&self.path, e))?;
        let doc: CredentialDocument =
            serde_json::from_slice(&contents).map_err(|e| InventoryError::parse(&self.path, e))?;
        debug!(path = %self.path.display(), users = doc.users.len(), "read credentials");
        Ok(doc
            .users
            .iter()
            .any(|u| u.username == username && u.password == password))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Category, Product};
    use tempfile::TempDir;

    fn sample() -> InventoryDocument {
        InventoryDocument {
            categories: vec![Category::new(1, "Monitor")],
            products: vec![Product::new(1, 1, "LG Monitor", 200.0)],
        }
    }

    #[test]
    fn save_then_load_file() {
        let dir = TempDir::new().unwrap();
        let backend = JsonFileBackend::new(dir.path().join("Magazzino.json"));
        backend.save(&sample()).unwrap();
        assert_eq!(backend.load().unwrap(), sample());
    }

    #[test]
    fn save_overwrites_previous_document() {
        let dir = TempDir::new().unwrap();
        let backend = JsonFileBackend::new(dir.path().join("Magazzino.json"));
        backend.save(&sample()).unwrap();
        backend.save(&InventoryDocument::default()).unwrap();
        assert_eq!(backend.load().unwrap(), InventoryDocument::default());
        // Only the target is left behind.
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn saved_file_is_indented_with_four_spaces() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("Magazzino.json");
        JsonFileBackend::new(&path).save(&sample()).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("{\n    \"Categoria\": [\n        {\n"));
        assert!(text.find("\"Categoria\"").unwrap() < text.find("\"Prodotto\"").unwrap());
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = TempDir::new().unwrap();
        let backend = JsonFileBackend::new(dir.path().join("nope.json"));
        assert!(matches!(backend.load(), Err(InventoryError::Io { .. })));
    }

    #[test]
    fn malformed_file_is_parse_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("Magazzino.json");
        std::fs::write(&path, "{ not json").unwrap();
        let backend = JsonFileBackend::new(&path);
        assert!(matches!(backend.load(), Err(InventoryError::Parse { .. })));
    }

    #[test]
    fn save_into_missing_directory_fails() {
        let dir = TempDir::new().unwrap();
        let backend = JsonFileBackend::new(dir.path().join("missing").join("Magazzino.json"));
        assert!(matches!(backend.save(&sample()), Err(InventoryError::Io { .. })));
    }

    #[test]
    fn memory_backend_counts_and_refuses_writes() {
        let backend = MemoryBackend::new(sample());
        backend.save(&InventoryDocument::default()).unwrap();
        assert_eq!(backend.saves(), 1);
        backend.fail_writes(true);
        assert!(backend.save(&sample()).is_err());
        assert_eq!(backend.saves(), 1);
        assert_eq!(backend.stored(), InventoryDocument::default());
    }

    #[test]
    fn authenticate_matches_exact_pair() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("Login.json");
        std::fs::write(
            &path,
            r#"{"users":[{"username":"kristian","password":"123456"},{"username":"admin","password":"password"}]}"#,
        )
        .unwrap();
        let creds = CredentialStore::new(&path);
        assert!(creds.authenticate("kristian", "123456").unwrap());
        assert!(creds.authenticate("admin", "password").unwrap());
        assert!(!creds.authenticate("Kristian", "123456").unwrap());
        assert!(!creds.authenticate("kristian", "password").unwrap());
        assert!(!creds.authenticate("", "").unwrap());
    }

    #[test]
    fn authenticate_rereads_the_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("Login.json");
        std::fs::write(&path, r#"{"users":[]}"#).unwrap();
        let creds = CredentialStore::new(&path);
        assert!(!creds.authenticate("kristian", "123456").unwrap());
        std::fs::write(&path, r#"{"users":[{"username":"kristian","password":"123456"}]}"#)
            .unwrap();
        assert!(creds.authenticate("kristian", "123456").unwrap());
    }
}
