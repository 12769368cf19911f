//! Test fixtures: known characters and temporary vaults.

use crate::builders::CharacterBuilder;
use charvault_snapshot::{CharacterDocument, StorageBackend};
use charvault_storage::JsonStorage;
use std::path::Path;
use tempfile::TempDir;

/// Id of the knight fixture.
pub const KNIGHT_ID: &str = "chr_knight";

/// A knight as first written.
pub fn knight() -> CharacterDocument {
    CharacterBuilder::new(KNIGHT_ID, "Aldric")
        .description("A tall knight.")
        .personality("Stoic.\nLoyal to the crown.")
        .first_message("*bows* Well met, traveler.")
        .tags(["knight", "fantasy"])
        .image("img/aldric-v1.png")
        .build()
}

/// The knight after a round of edits: new description, extra tag, new
/// portrait. Name and personality are untouched.
pub fn knight_revised() -> CharacterDocument {
    CharacterBuilder::new(KNIGHT_ID, "Aldric")
        .description("A tall knight of the crown.")
        .personality("Stoic.\nLoyal to the crown.")
        .first_message("*bows* Well met, traveler.")
        .tags(["knight", "fantasy", "veteran"])
        .image("img/aldric-v2.png")
        .build()
}

/// A temporary directory with a JSON-backed store.
///
/// The directory is removed when the vault is dropped.
pub struct TestVault {
    temp_dir: TempDir,
    backend: StorageBackend<JsonStorage>,
}

impl TestVault {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let backend = StorageBackend::new(JsonStorage::new(temp_dir.path()));
        Self { temp_dir, backend }
    }

    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn backend(&self) -> &StorageBackend<JsonStorage> {
        &self.backend
    }

    /// A second backend over the same directory, for handing out as an
    /// owned store.
    pub fn open_backend(&self) -> StorageBackend<JsonStorage> {
        StorageBackend::new(JsonStorage::new(self.temp_dir.path()))
    }
}

impl Default for TestVault {
    fn default() -> Self {
        Self::new()
    }
}
