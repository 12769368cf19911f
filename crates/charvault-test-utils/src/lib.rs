//! Testing utilities, fixtures, and mocks for charvault.
//!
//! - **Fixtures**: Known characters and temporary on-disk vaults
//! - **Mocks**: Document stores that record, fail, or pause on demand
//! - **Assertions**: Helpers with readable failure output
//! - **Builders**: Fluent construction of character documents
//!
//! # Example Usage
//!
//! ```rust,ignore
//! use charvault_test_utils::{fixtures, mocks::RecordingDocumentStore};
//!
//! #[tokio::test]
//! async fn test_restore() {
//!     let store = RecordingDocumentStore::new().with_document(fixtures::knight());
//!     store.fail_saves("disk full");
//!     // ...
//! }
//! ```

pub mod assertions;
pub mod builders;
pub mod fixtures;
pub mod mocks;

pub use builders::CharacterBuilder;
pub use fixtures::TestVault;
pub use mocks::{RecordingDocumentStore, SaveGate};
