//! Specialized collection types

use slotmap::{DefaultKey, Key, KeyData};
pub use slotmap::SlotMap;

/// Handle-based map using slot map for stable references
pub type HandleMap<T> = SlotMap<DefaultKey, T>;

/// Pack a slot map key into the opaque `u64` carried by backend handles
pub fn key_to_raw(key: DefaultKey) -> u64 {
    key.data().as_ffi()
}

/// Recover a slot map key from a raw handle value
pub fn raw_to_key(raw: u64) -> DefaultKey {
    KeyData::from_ffi(raw).into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_key_round_trip_resolves_same_slot() {
        let mut map: HandleMap<&str> = HandleMap::new();
        let key = map.insert("vertex buffer");

        let raw = key_to_raw(key);
        assert_eq!(map.get(raw_to_key(raw)), Some(&"vertex buffer"));
    }

    #[test]
    fn test_stale_raw_key_misses_after_removal() {
        let mut map: HandleMap<u32> = HandleMap::new();
        let raw = key_to_raw(map.insert(1));
        map.remove(raw_to_key(raw));
        map.insert(2);

        assert!(map.get(raw_to_key(raw)).is_none());
    }
}
