//! Hash collections used across Lucy.
//!
//! Node ids are small integers hashed in tight loops during layout, so the
//! default SipHash is swapped for AHash everywhere.

pub use ahash::{AHashMap as HashMap, AHashSet as HashSet, RandomState};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map_roundtrip() {
        let mut map: HashMap<u64, &str> = HashMap::new();
        map.insert(7, "seven");
        assert_eq!(map.get(&7), Some(&"seven"));
        assert!(map.get(&8).is_none());
    }

    #[test]
    fn test_set_dedup() {
        let mut set = HashSet::new();
        assert!(set.insert(3u64));
        assert!(!set.insert(3u64));
        assert_eq!(set.len(), 1);
    }
}
