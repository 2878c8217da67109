#![no_main]

use libfuzzer_sys::fuzz_target;
use ringtrack::ds::SlotArena;

// Fuzz arbitrary operation sequences on SlotArena
//
// Random insert, remove, get_mut, and clear sequences. Stale ids must never
// resolve after their slot is reused.
fuzz_target!(|data: &[u8]| {
    let mut arena: SlotArena<u32> = SlotArena::new();
    let mut all_ids = Vec::new();

    for pair in data.chunks_exact(2) {
        let op = pair[0] % 5;
        let value = u32::from(pair[1]);

        match op {
            0 => {
                let id = arena.insert(value);
                all_ids.push(id);
                assert_eq!(arena.get(id), Some(&value));
            },
            1 => {
                if !all_ids.is_empty() {
                    let id = all_ids[(value as usize) % all_ids.len()];
                    let old_len = arena.len();
                    if arena.remove(id).is_some() {
                        assert_eq!(arena.len(), old_len - 1);
                        assert!(!arena.contains(id));
                    }
                    assert_eq!(arena.remove(id), None);
                }
            },
            2 => {
                if !all_ids.is_empty() {
                    let id = all_ids[(value as usize) % all_ids.len()];
                    if let Some(slot) = arena.get_mut(id) {
                        *slot = value;
                        assert_eq!(arena.get(id), Some(&value));
                    }
                }
            },
            3 => {
                for &id in &all_ids {
                    assert_eq!(arena.contains(id), arena.get(id).is_some());
                }
            },
            4 => {
                arena.clear();
                assert!(arena.is_empty());
                for &id in &all_ids {
                    assert!(!arena.contains(id));
                }
            },
            _ => unreachable!(),
        }

        assert_eq!(arena.iter().count(), arena.len());
    }
});
