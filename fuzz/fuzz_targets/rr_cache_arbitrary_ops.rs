#![no_main]

use libfuzzer_sys::fuzz_target;
use rrcache::policy::random::RrCache;
use rrcache::traits::Admission;

// Fuzz arbitrary operation sequences on RrCache
//
// First byte picks the capacity, the next eight the seed. Every following
// pair of bytes is (op, key) and drives single-key and batch operations.
fuzz_target!(|data: &[u8]| {
    if data.len() < 9 {
        return;
    }

    let capacity = usize::from(data[0] % 32) + 1;
    let mut seed_bytes = [0u8; 8];
    seed_bytes.copy_from_slice(&data[1..9]);
    let seed = u64::from_le_bytes(seed_bytes);

    let mut cache: RrCache<u8, u32> = RrCache::with_seed(capacity, seed);

    let mut idx = 9;
    while idx + 1 < data.len() {
        let op = data[idx] % 9;
        let key = data[idx + 1];
        let value = u32::from(data[idx]) << 8 | u32::from(key);

        match op {
            0..=2 => {
                let mode = match op {
                    0 => Admission::InsertOnly,
                    1 => Admission::UpdateOnly,
                    _ => Admission::InsertOrUpdate,
                };
                let was_present = cache.contains(&key);
                let old_len = cache.len();
                let mutated = cache.insert_with(key, value, mode);

                if was_present {
                    assert_eq!(mutated, mode.allows_update());
                    assert_eq!(cache.len(), old_len);
                } else {
                    assert_eq!(mutated, mode.allows_insert());
                }
                if mutated {
                    assert_eq!(cache.find(&key), Some(&value));
                } else if !was_present {
                    assert_eq!(cache.len(), old_len);
                }
            },
            3 => {
                let was_present = cache.contains(&key);
                let old_len = cache.len();
                assert_eq!(cache.erase(&key), was_present);
                assert!(!cache.contains(&key));
                if was_present {
                    assert_eq!(cache.len(), old_len - 1);
                }
            },
            4 => {
                let _ = cache.find(&key);
            },
            5 => {
                let pairs: Vec<(u8, u32)> = (0..key % 8)
                    .map(|i| (key.wrapping_add(i), value))
                    .collect();
                let count = cache.insert_range(pairs.clone());
                assert_eq!(count, pairs.len());
            },
            6 => {
                let keys: Vec<u8> = (0..key % 8).map(|i| key.wrapping_mul(i)).collect();
                let found = cache.find_range(&keys);
                let mut slots: Vec<(u8, Option<u32>)> = keys.iter().map(|k| (*k, None)).collect();
                cache.find_range_fill(&mut slots);
                assert_eq!(found, slots);
            },
            7 => {
                let keys: Vec<u8> = (0..key % 8).map(|i| key ^ i).collect();
                cache.erase_range(&keys);
                assert!(keys.iter().all(|k| !cache.contains(k)));
            },
            8 => {
                if key == 0 {
                    cache.clear();
                    assert!(cache.is_empty());
                }
            },
            _ => unreachable!(),
        }

        assert!(cache.len() <= capacity);
        idx += 2;
    }

    assert!(cache.check_invariants().is_ok());
});
