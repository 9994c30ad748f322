//! Step identifier sources

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use uuid::Uuid;

/// Source of step identifiers.
///
/// Implementations are shared by concurrent compilations of one pipeline and
/// must never hand out the same identifier twice.
pub trait IdGenerator: Send + Sync + fmt::Debug {
    /// Returns a fresh identifier
    fn next_id(&self) -> String;
}

/// Time-ordered random identifiers (UUID version 7)
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidV7Ids;

impl IdGenerator for UuidV7Ids {
    fn next_id(&self) -> String {
        Uuid::now_v7().to_string()
    }
}

/// Deterministic, increasing identifiers for tests and reproducible output
#[derive(Debug, Default)]
pub struct SequentialIds {
    next: AtomicU64,
}

impl SequentialIds {
    /// Creates a generator starting at zero
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl IdGenerator for SequentialIds {
    fn next_id(&self) -> String {
        format!("step-{:016}", self.next.fetch_add(1, Ordering::Relaxed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_uuid_ids_are_unique_and_sortable() {
        let ids = UuidV7Ids;
        let generated: Vec<String> = (0..1000).map(|_| ids.next_id()).collect();
        let unique: HashSet<&String> = generated.iter().collect();
        assert_eq!(unique.len(), generated.len());

        let first = Uuid::parse_str(&generated[0]).unwrap();
        assert_eq!(first.get_version_num(), 7);
    }

    #[test]
    fn test_sequential_ids() {
        let ids = SequentialIds::new();
        assert_eq!(ids.next_id(), "step-0000000000000000");
        assert_eq!(ids.next_id(), "step-0000000000000001");
    }

    #[test]
    fn test_sequential_ids_across_threads() {
        let ids = Arc::new(SequentialIds::new());
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let ids = Arc::clone(&ids);
                thread::spawn(move || (0..250).map(|_| ids.next_id()).collect::<Vec<_>>())
            })
            .collect();

        let mut all = HashSet::new();
        for handle in handles {
            for id in handle.join().unwrap() {
                assert!(all.insert(id));
            }
        }
        assert_eq!(all.len(), 1000);
    }
}
