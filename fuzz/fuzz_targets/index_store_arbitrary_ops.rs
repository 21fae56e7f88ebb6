#![no_main]

use libfuzzer_sys::fuzz_target;
use rrcache::store::IndexStore;

// Fuzz arbitrary operation sequences on IndexStore
//
// Tests random sequences of put, remove, swap_remove_at, get, clear and
// checks map/vector bookkeeping after every step.
fuzz_target!(|data: &[u8]| {
    if data.is_empty() {
        return;
    }

    let mut store: IndexStore<u8, u32> = IndexStore::new();

    let mut idx = 0;
    while idx + 1 < data.len() {
        let op = data[idx] % 6;
        let key = data[idx + 1];
        let value = u32::from(key) * 3;

        match op {
            0 | 1 => {
                // put
                let was_present = store.contains(&key);
                let old_len = store.len();
                let previous = store.put(key, value);
                assert_eq!(previous.is_some(), was_present);
                assert_eq!(store.get(&key), Some(&value));
                assert_eq!(store.len(), old_len + usize::from(!was_present));
            },
            2 => {
                // remove
                let old_len = store.len();
                if store.remove(&key).is_some() {
                    assert_eq!(store.len(), old_len - 1);
                }
                assert!(!store.contains(&key));
                assert_eq!(store.position_of(&key), None);
            },
            3 => {
                // swap_remove_at
                let old_len = store.len();
                let pos = usize::from(key);
                let expected = store.key_at(pos).copied();
                let removed = store.swap_remove_at(pos);
                assert_eq!(removed.map(|(k, _)| k), expected);
                if expected.is_some() {
                    assert_eq!(store.len(), old_len - 1);
                } else {
                    assert_eq!(store.len(), old_len);
                }
            },
            4 => {
                // read-only
                if let Some(pos) = store.position_of(&key) {
                    assert_eq!(store.key_at(pos), Some(&key));
                }
            },
            5 => {
                if key < 8 {
                    store.clear();
                    assert!(store.is_empty());
                }
            },
            _ => unreachable!(),
        }

        assert!(store.check_invariants().is_ok());
        idx += 2;
    }
});
