//! Walkthrough of the random-replacement cache.
//!
//! Covers admission modes, eviction on a full cache, batch operations and
//! seeded replay.
//!
//! Run with: cargo run --example basic_random

use rrcache::prelude::*;

fn main() {
    println!("=== Random Replacement Cache ===\n");

    let mut cache: RrCache<u64, String> = RrCache::new(2);
    cache.insert(1, "Hello".to_string());
    cache.insert(2, "World".to_string());
    println!("capacity={} len={}", cache.capacity(), cache.len());

    // One of "Hello" or "World" makes room; which one is up to the generator.
    cache.insert(3, "Hola".to_string());
    println!("after inserting 3:");
    for key in 1..=3 {
        println!("  {} -> {:?}", key, cache.find(&key));
    }

    println!("\n=== Admission Modes ===\n");

    let mut cache: RrCache<u64, String> = RrCache::new(4);
    println!(
        "UpdateOnly on absent key 1:    {}",
        cache.insert_with(1, "test".to_string(), Admission::UpdateOnly)
    );
    println!(
        "InsertOnly on absent key 1:    {}",
        cache.insert_with(1, "test".to_string(), Admission::InsertOnly)
    );
    println!(
        "InsertOnly on present key 1:   {}",
        cache.insert_with(1, "test2".to_string(), Admission::InsertOnly)
    );
    println!(
        "UpdateOnly on present key 1:   {}",
        cache.insert_with(1, "test2".to_string(), Admission::UpdateOnly)
    );
    println!("  key 1 now holds {:?}", cache.find(&1));

    println!("\n=== Batch Operations ===\n");

    let batch: Vec<(u64, String)> = (1..=5).map(|k| (k, format!("test{}", k))).collect();
    let applied = cache.insert_range(batch);
    println!("insert_range of 5 pairs applied {} (len={})", applied, cache.len());

    for (key, value) in cache.find_range(&[1, 2, 3, 4, 5]) {
        println!("  find_range {} -> {:?}", key, value);
    }

    let erased = cache.erase_range(&[1, 2, 3]);
    println!("erase_range of [1, 2, 3] removed {} (len={})", erased, cache.len());

    let mut slots: Vec<(u64, Option<String>)> = vec![(4, None), (5, None), (6, None)];
    cache.find_range_fill(&mut slots);
    println!("find_range_fill -> {:?}", slots);

    println!("\n=== Lookups Don't Protect Entries ===\n");

    let mut hot_survived = 0;
    let trials = 1000;
    for seed in 0..trials {
        let mut cache = RrCache::with_seed(2, seed);
        cache.insert("hot", 0);
        cache.insert("cold", 0);
        for _ in 0..100 {
            cache.find(&"hot");
        }
        cache.insert("new", 0);
        if cache.contains(&"hot") {
            hot_survived += 1;
        }
    }
    println!(
        "hot key survived {} of {} trials (expected ~50%)",
        hot_survived, trials
    );

    println!("\n=== Seeded Replay ===\n");

    let mut a = CacheBuilder::new(4).seed(7).build::<u32, u32>();
    let mut b = CacheBuilder::new(4).seed(7).build::<u32, u32>();
    for i in 0..32 {
        a.insert(i, i);
        b.insert(i, i);
    }
    println!("a survivors: {:?}", a.keys());
    println!("b survivors: {:?}", b.keys());
    println!("identical: {}", a.keys() == b.keys());
}
