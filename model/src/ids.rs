use std::collections::BTreeMap;

use anyhow::Result;
use serde::{Deserialize, Serialize};

/// The tracker's own code for an executive, as it appears in raw feeds.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ExecutiveName(pub String);

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ExecutiveID(pub usize);

impl CheapID for ExecutiveID {
    fn new(x: usize) -> Self {
        Self(x)
    }
}

pub trait CheapID: Copy {
    fn new(x: usize) -> Self;
}

#[derive(Serialize, Deserialize)]
pub struct IDMapping<K: Ord, V> {
    orig_to_cheap: BTreeMap<K, V>,
    // We don't need to store the inverse. It's more convenient for each object to own that.
}

impl<K: Clone + std::fmt::Debug + Ord, V: CheapID> IDMapping<K, V> {
    pub fn new() -> Self {
        Self {
            orig_to_cheap: BTreeMap::new(),
        }
    }

    pub fn insert_new(&mut self, orig: K) -> Result<V> {
        let cheap = V::new(self.orig_to_cheap.len());
        if self.orig_to_cheap.insert(orig.clone(), cheap).is_some() {
            bail!("IDMapping::insert_new has duplicate input for {:?}", orig);
        }
        Ok(cheap)
    }

    pub fn insert_idempotent(&mut self, orig: &K) -> V {
        match self.orig_to_cheap.get(orig) {
            Some(x) => *x,
            None => {
                let v = V::new(self.orig_to_cheap.len());
                self.orig_to_cheap.insert(orig.clone(), v);
                v
            }
        }
    }

    pub fn lookup(&self, orig: &K) -> Result<V> {
        match self.orig_to_cheap.get(orig) {
            Some(x) => Ok(*x),
            None => bail!("IDMapping lookup of {:?} failed", orig),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_new_rejects_duplicates() {
        let mut mapping: IDMapping<ExecutiveName, ExecutiveID> = IDMapping::new();
        let id = mapping.insert_new(ExecutiveName("E042".to_string())).unwrap();
        assert_eq!(id, ExecutiveID(0));
        assert!(mapping.insert_new(ExecutiveName("E042".to_string())).is_err());
    }

    #[test]
    fn test_insert_idempotent_is_stable() {
        let mut mapping: IDMapping<ExecutiveName, ExecutiveID> = IDMapping::new();
        let name = ExecutiveName("E042".to_string());
        let first = mapping.insert_idempotent(&name);
        let second = mapping.insert_idempotent(&name);
        assert_eq!(first, second);
        assert_eq!(mapping.lookup(&name).unwrap(), first);
    }
}
