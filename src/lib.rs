// Library root
// -----------
// The inventory core lives here; the binary (`main.rs`) wires it to the
// interactive session in `ui`.
//
// Module responsibilities:
// - `model`: the shapes of the inventory and credential documents.
// - `error`: the error type every core operation returns.
// - `storage`: reading and atomically writing the JSON documents.
// - `inventory`: the in-memory inventory and its lookups and mutations.
// - `config`: where the documents live (environment and CLI flags).
// - `ui`: terminal prompts, menus and colored output.
//
// The core (`inventory`, `storage`) never prints. It returns values and
// `InventoryError`s and leaves the wording to `ui`.
pub mod config;
pub mod error;
pub mod inventory;
pub mod model;
pub mod storage;
pub mod ui;

pub use config::Config;
pub use error::{InventoryError, Result};
pub use inventory::{CascadeDelete, Inventory, PriceChange};
pub use model::{Category, Credential, InventoryDocument, Product};
pub use storage::{CredentialStore, InventoryBackend, JsonFileBackend, MemoryBackend};
