//! Corpus-wide id uniqueness.

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::path::{Path, PathBuf};

/// Ids seen so far in one run, each mapped to the first file that used it.
///
/// Create one per run and pass it to every validation call; entries are
/// only ever added.
#[derive(Debug, Default, Clone)]
pub struct IdRegistry {
    first_seen: HashMap<String, PathBuf>,
}

impl IdRegistry {
    /// Empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `id` for `file`. Returns the earlier file when the id was
    /// already taken; the earlier entry is kept.
    pub fn claim(&mut self, id: &str, file: &Path) -> Result<(), &Path> {
        match self.first_seen.entry(id.to_string()) {
            Entry::Vacant(slot) => {
                slot.insert(file.to_path_buf());
                Ok(())
            }
            Entry::Occupied(slot) => Err(slot.into_mut().as_path()),
        }
    }

    /// Number of distinct ids.
    pub fn len(&self) -> usize {
        self.first_seen.len()
    }

    /// True before any claim.
    pub fn is_empty(&self) -> bool {
        self.first_seen.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_claim_wins() {
        let mut registry = IdRegistry::new();
        assert!(registry.claim("lim-01", Path::new("a.yaml")).is_ok());
        assert_eq!(
            registry.claim("lim-01", Path::new("b.yaml")),
            Err(Path::new("a.yaml"))
        );
        assert_eq!(
            registry.claim("lim-01", Path::new("c.yaml")),
            Err(Path::new("a.yaml"))
        );
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn registries_are_independent() {
        let mut first = IdRegistry::new();
        let mut second = IdRegistry::new();
        assert!(first.claim("x", Path::new("a.yaml")).is_ok());
        assert!(second.claim("x", Path::new("b.yaml")).is_ok());
    }
}
