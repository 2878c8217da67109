#![no_main]

use std::time::Duration;

use libfuzzer_sys::fuzz_target;
use ringtrack::prelude::*;

// Fuzz arbitrary operation sequences on TrackerCore
//
// Header bytes pick buffer size, key bound, staleness threshold, and sweep
// interval. The rest drives get, sweep, remove, and set_max_keys over a small
// key space with a non-decreasing clock. Structural invariants and the key
// bound are checked after every step.
fuzz_target!(|data: &[u8]| {
    if data.len() < 4 {
        return;
    }
    let mut core: TrackerCore<u8> = TrackerBuilder::new()
        .buffer_size(usize::from(data[0] % 8) + 1)
        .max_keys(usize::from(data[1] % 16) + 1)
        .staleness_threshold(Duration::from_millis(u64::from(data[2])))
        .sweep_interval(Duration::from_millis(u64::from(data[3] % 32)))
        .build_core();

    let mut now = 0u64;
    let mut held = Vec::new();

    for pair in data[4..].chunks_exact(2) {
        let op = pair[0] % 5;
        let arg = pair[1];
        let key = format!("k{}", arg % 24);
        now += u64::from(pair[0] >> 4);

        match op {
            0 => {
                let handle = core.get(&key, now).unwrap();
                if handle.is_tracked() {
                    handle.append(arg);
                    assert_eq!(core.last_touched(&key), Some(now));
                    held.push(handle);
                } else {
                    assert!(!core.contains(&key));
                }
            },
            1 => {
                let before = core.number_of_keys();
                let evicted = core.clear_stale_buffers(now);
                assert_eq!(core.number_of_keys(), before - evicted);
            },
            2 => {
                let was_tracked = core.contains(&key);
                assert_eq!(core.remove(&key), was_tracked);
                assert!(!core.contains(&key));
            },
            3 => {
                let bound = usize::from(arg % 16) + 1;
                core.set_max_keys(bound).unwrap();
                assert!(core.number_of_keys() <= bound);
            },
            4 => {
                assert!(core.get("", now).is_err());
            },
            _ => unreachable!(),
        }

        assert_eq!(core.check_invariants(), Ok(()));
        assert!(core.number_of_keys() <= core.max_keys());
        for handle in &held {
            assert!(handle.len() <= core.buffer_size());
            if !handle.is_tracked() {
                assert!(handle.is_empty());
            }
        }
        if held.len() > 64 {
            held.clear();
        }
    }
});
