use std::path::PathBuf;

/// Errors returned by the inventory core.
///
/// Not-found and duplicate variants are expected outcomes the caller is
/// meant to report to the user; `Io` and `Parse` come from the storage
/// documents.
#[derive(Debug, thiserror::Error)]
pub enum InventoryError {
    /// A storage document could not be read or written.
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A storage document is not well-formed JSON of the expected shape.
    #[error("malformed document {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// No category matches the given id or name.
    #[error("category not found: {0}")]
    CategoryNotFound(String),

    /// No product matches the given name.
    #[error("product not found: {0}")]
    ProductNotFound(String),

    #[error("product already exists (id {id} or name {name:?})")]
    DuplicateProduct { id: i64, name: String },

    #[error("category already exists (id {id} or name {name:?})")]
    DuplicateCategory { id: i64, name: String },

    /// A price, or the percentage applied to one, is NaN or infinite.
    /// JSON has no encoding for such values.
    #[error("price of {name:?} would not be a finite number ({value})")]
    InvalidPrice { name: String, value: f64 },

    /// A new product references a category id that does not exist.
    #[error("product references unknown category id {0}")]
    UnknownCategory(i64),
}

impl InventoryError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        InventoryError::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn parse(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        InventoryError::Parse {
            path: path.into(),
            source,
        }
    }

    /// True for the recoverable outcomes of a domain operation.
    pub fn is_domain(&self) -> bool {
        !matches!(self, InventoryError::Io { .. } | InventoryError::Parse { .. })
    }
}

/// Result alias for inventory operations.
pub type Result<T> = std::result::Result<T, InventoryError>;
