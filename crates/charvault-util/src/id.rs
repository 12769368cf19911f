//! ULID-based identifier generation with prefixes.
//!
//! Identifiers follow the pattern `prefix_ulid`, e.g. `snp_01hqxyz...` for
//! snapshots. The ULID part is lowercase so ids sort lexicographically by
//! creation time.

use ulid::Ulid;

/// Known identifier prefixes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdPrefix {
    Character,
    Snapshot,
}

impl IdPrefix {
    /// Get the string prefix for this identifier type.
    pub fn as_str(&self) -> &'static str {
        match self {
            IdPrefix::Character => "chr",
            IdPrefix::Snapshot => "snp",
        }
    }
}

/// Identifier generation.
pub struct Identifier;

impl Identifier {
    /// Generate a new ascending identifier (newer = larger).
    pub fn ascending(prefix: IdPrefix) -> String {
        let ulid = Ulid::new();
        format!("{}_{}", prefix.as_str(), ulid.to_string().to_lowercase())
    }

    /// Generate a character document ID.
    pub fn character() -> String {
        Self::ascending(IdPrefix::Character)
    }

    /// Generate a snapshot ID.
    pub fn snapshot() -> String {
        Self::ascending(IdPrefix::Snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ascending_id() {
        let id = Identifier::ascending(IdPrefix::Snapshot);
        assert!(id.starts_with("snp_"));
        assert_eq!(id.len(), 30); // "snp_" (4) + ULID (26)
    }

    #[test]
    fn test_ascending_order() {
        let id1 = Identifier::snapshot();
        std::thread::sleep(std::time::Duration::from_millis(2));
        let id2 = Identifier::snapshot();
        assert!(id1 < id2, "Ascending IDs should increase over time");
    }

    #[test]
    fn test_prefixes() {
        assert!(Identifier::character().starts_with("chr_"));
        assert!(Identifier::snapshot().starts_with("snp_"));
        assert_ne!(Identifier::snapshot(), Identifier::snapshot());
    }
}
