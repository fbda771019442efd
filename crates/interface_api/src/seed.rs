//! Startup seed data
//!
//! A seed file is a JSON array of group snapshots in the same shape the
//! store keeps them.

use std::path::Path;

use tracing::{info, warn};

use core_kernel::CoreError;
use domain_settlement::{aggregate_snapshot, GroupSnapshot, InMemoryGroupStore};

/// Reads snapshots from `path`
pub fn read_seed(path: impl AsRef<Path>) -> Result<Vec<GroupSnapshot>, CoreError> {
    let path = path.as_ref();
    let raw = std::fs::read_to_string(path)
        .map_err(|e| CoreError::configuration(format!("cannot read seed file {}: {}", path.display(), e)))?;
    parse_seed(&raw)
}

pub fn parse_seed(raw: &str) -> Result<Vec<GroupSnapshot>, CoreError> {
    serde_json::from_str(raw).map_err(|e| CoreError::configuration(format!("invalid seed file: {}", e)))
}

/// Loads snapshots into `store`, returning how many were stored
///
/// Groups that fail integrity checks are still stored so their problems
/// surface on read, but each one is logged.
pub async fn load_into(store: &InMemoryGroupStore, snapshots: Vec<GroupSnapshot>) -> usize {
    let count = snapshots.len();
    for snapshot in snapshots {
        if let Err(e) = aggregate_snapshot(&snapshot) {
            warn!(group_id = %snapshot.group_id, error = %e, "Seeded group has inconsistent data");
        }
        store.insert(snapshot).await;
    }
    info!(groups = count, "Loaded seed data");
    count
}

#[cfg(test)]
mod tests {
    use super::*;

    const SEED: &str = r#"[
        {
            "group_id": "00000000-0000-0000-0000-0000000006e0",
            "currency": "USD",
            "roster": [
                { "id": "00000000-0000-0000-0000-00000000000a", "displayName": "A" },
                { "id": "00000000-0000-0000-0000-00000000000b", "displayName": "B" }
            ]
        }
    ]"#;

    #[test]
    fn test_parse_seed() {
        let groups = parse_seed(SEED).unwrap();
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].roster.len(), 2);
        assert!(groups[0].expenses.is_empty());
    }

    #[test]
    fn test_invalid_seed_is_configuration_error() {
        assert!(matches!(parse_seed("{"), Err(CoreError::Configuration(_))));
    }

    #[test]
    fn test_missing_seed_file() {
        assert!(read_seed("/nonexistent/seed.json").is_err());
    }

    #[tokio::test]
    async fn test_load_into_store() {
        let store = InMemoryGroupStore::new();
        let loaded = load_into(&store, parse_seed(SEED).unwrap()).await;
        assert_eq!(loaded, 1);
        assert_eq!(store.len().await, 1);
    }
}
